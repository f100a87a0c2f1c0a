//! Book domain model.
//!
//! # Responsibility
//! - Define the single catalogue record stored in `libros`.
//! - Provide console rendering.
//!
//! # Invariants
//! - `id` is `None` until the first successful insert and never changes
//!   after the persistence layer assigns it.
//! - `title` and `author` are stored as given; any text is accepted.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier (`libros.id`).
pub type BookId = i64;

/// Catalogue record for one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(skip_deserializing)]
    id: Option<BookId>,
    pub title: String,
    pub author: String,
    /// `true` when the book can be lent, `false` while it is out on loan.
    pub available: bool,
}

impl Book {
    /// Creates a transient book. Storage assigns the id on insert.
    pub fn new(title: impl Into<String>, author: impl Into<String>, available: bool) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            available,
        }
    }

    /// Rebuilds a book read back from storage.
    pub(crate) fn persisted(id: BookId, title: String, author: String, available: bool) -> Self {
        Self {
            id: Some(id),
            title,
            author,
            available,
        }
    }

    /// Returns the storage id, or `None` while the book is transient.
    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    /// Returns whether storage has assigned an id yet.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Records the id assigned by storage.
    ///
    /// Only the first assignment sticks; later calls are ignored so an id
    /// never changes once set.
    pub(crate) fn assign_id(&mut self, id: BookId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => writeln!(f, "Book ID: {id}")?,
            None => writeln!(f, "Book ID: (unsaved)")?,
        }
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        write!(f, "Available: {}", self.available)
    }
}

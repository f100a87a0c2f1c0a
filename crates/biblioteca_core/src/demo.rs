//! Fixed console walkthrough of every catalogue operation.
//!
//! # Responsibility
//! - Seed three books, then list, search, update, delete and list again.
//! - Stop at the first failing operation and hand the error back.
//!
//! # Invariants
//! - The update targets the first seeded book and the delete the second,
//!   addressed by the ids storage assigned to them.

use crate::model::book::{Book, BookId};
use crate::report;
use crate::service::book_service::{BookService, OperationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

/// Author searched for during the walkthrough.
pub const SEARCH_AUTHOR: &str = "Timothy Zahn";

pub type DemoResult<T> = Result<T, DemoError>;

#[derive(Debug)]
pub enum DemoError {
    Operation(OperationError),
    Output(io::Error),
}

impl Display for DemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operation(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Operation(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<OperationError> for DemoError {
    fn from(value: OperationError) -> Self {
        Self::Operation(value)
    }
}

impl From<io::Error> for DemoError {
    fn from(value: io::Error) -> Self {
        Self::Output(value)
    }
}

/// What the walkthrough did, for callers that want more than the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    /// Ids assigned to the seeded books, in insertion order.
    pub inserted: Vec<BookId>,
    /// Catalogue contents after the final step.
    pub remaining: Vec<Book>,
}

/// The three transient books seeded by the walkthrough.
pub fn seed_books() -> [Book; 3] {
    [
        Book::new("Star Wars: Heir to the Empire", SEARCH_AUTHOR, true),
        Book::new("The Fall of Númenor", "J. R. R. Tolkien", true),
        Book::new("Frankenstein; or, The Modern Prometheus", "Mary Shelley", true),
    ]
}

/// Runs the walkthrough against `service`, writing the report to `out`.
pub fn run_demo<W: Write>(service: &BookService<'_>, out: &mut W) -> DemoResult<DemoSummary> {
    let mut inserted = Vec::new();
    for mut book in seed_books() {
        inserted.push(service.insert_book(&mut book)?);
    }

    writeln!(out, "\nBook listing:")?;
    report::write_listing(out, &service.list_books()?)?;

    writeln!(out, "\nSearching books by author: '{SEARCH_AUTHOR}'")?;
    let matches = service.find_books_by_author(SEARCH_AUTHOR)?;
    report::write_author_matches(out, SEARCH_AUTHOR, &matches)?;

    let update_id = inserted[0];
    writeln!(out, "\nUpdating availability of book with ID: {update_id}")?;
    let updated = service.update_availability(update_id, false)?;
    report::write_update_outcome(out, &updated)?;

    let delete_id = inserted[1];
    writeln!(out, "\nDeleting book with ID: {delete_id}")?;
    let deleted = service.delete_book(delete_id)?;
    report::write_delete_outcome(out, &deleted)?;

    writeln!(out, "\nBook listing:")?;
    let remaining = service.list_books()?;
    report::write_listing(out, &remaining)?;
    out.flush()?;

    Ok(DemoSummary {
        inserted,
        remaining,
    })
}

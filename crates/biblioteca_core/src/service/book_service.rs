//! Book use-case service.
//!
//! # Responsibility
//! - Run each catalogue operation in its own unit of work.
//! - Translate repository failures into errors naming the operation.
//!
//! # Invariants
//! - Every call opens exactly one session and releases it before returning,
//!   on success and failure alike.
//! - Mutations run inside a transaction that is committed only after the
//!   whole body succeeds; every other exit path rolls it back.
//! - A missing id on update/delete is an outcome, not an error.

use crate::db::SessionFactory;
use crate::model::book::{Book, BookId};
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type OpResult<T> = Result<T, OperationError>;

/// Catalogue operations exposed by [`BookService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    ListAll,
    FindByAuthor,
    Get,
    UpdateAvailability,
    Delete,
}

impl Operation {
    /// Stable name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "book_insert",
            Self::ListAll => "book_list",
            Self::FindByAuthor => "book_find_by_author",
            Self::Get => "book_get",
            Self::UpdateAvailability => "book_update",
            Self::Delete => "book_delete",
        }
    }

    fn failure_summary(self) -> &'static str {
        match self {
            Self::Insert => "insert the book",
            Self::ListAll => "list the books",
            Self::FindByAuthor => "search books by author",
            Self::Get => "load the book",
            Self::UpdateAvailability => "update the availability",
            Self::Delete => "delete the book",
        }
    }
}

/// Failure of one catalogue operation, carrying the underlying cause.
#[derive(Debug)]
pub struct OperationError {
    pub operation: Operation,
    pub source: RepoError,
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not {}: {}",
            self.operation.failure_summary(),
            self.source
        )
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Result of an update or delete addressed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Row `id` was changed. `book` is the row state after an update, or
    /// the row as it was before a delete.
    Applied { id: BookId, book: Book },
    /// No row has this id; nothing was changed.
    NotFound(BookId),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Use-case service running one unit of work per call.
pub struct BookService<'factory> {
    factory: &'factory SessionFactory,
}

impl<'factory> BookService<'factory> {
    pub fn new(factory: &'factory SessionFactory) -> Self {
        Self { factory }
    }

    /// Inserts a transient book and records the assigned id on it.
    ///
    /// The id is set only after the transaction commits.
    pub fn insert_book(&self, book: &mut Book) -> OpResult<BookId> {
        let started_at = Instant::now();
        let id = finish(Operation::Insert, started_at, self.insert_in_session(book))?;
        book.assign_id(id);
        info!(
            "event=book_insert module=service status=ok id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    /// Lists every stored book ordered by id.
    pub fn list_books(&self) -> OpResult<Vec<Book>> {
        let started_at = Instant::now();
        let books = finish(
            Operation::ListAll,
            started_at,
            self.read(|repo| repo.list_all()),
        )?;
        info!(
            "event=book_list module=service status=ok rows={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }

    /// Lists books whose author matches `author` exactly.
    pub fn find_books_by_author(&self, author: &str) -> OpResult<Vec<Book>> {
        let started_at = Instant::now();
        let books = finish(
            Operation::FindByAuthor,
            started_at,
            self.read(|repo| repo.find_by_author(author)),
        )?;
        info!(
            "event=book_find_by_author module=service status=ok rows={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }

    /// Loads one book by id.
    pub fn get_book(&self, id: BookId) -> OpResult<Option<Book>> {
        let started_at = Instant::now();
        finish(Operation::Get, started_at, self.read(|repo| repo.get(id)))
    }

    /// Sets the availability flag of book `id`.
    ///
    /// Fetches the whole row, changes the flag in memory and merges the
    /// full state back in one transaction.
    pub fn update_availability(&self, id: BookId, available: bool) -> OpResult<MutationOutcome> {
        let started_at = Instant::now();
        let outcome = finish(
            Operation::UpdateAvailability,
            started_at,
            self.update_in_session(id, available),
        )?;
        log_mutation(Operation::UpdateAvailability, id, &outcome, started_at);
        Ok(outcome)
    }

    /// Deletes book `id`.
    pub fn delete_book(&self, id: BookId) -> OpResult<MutationOutcome> {
        let started_at = Instant::now();
        let outcome = finish(Operation::Delete, started_at, self.delete_in_session(id))?;
        log_mutation(Operation::Delete, id, &outcome, started_at);
        Ok(outcome)
    }

    fn read<T>(&self, query: impl FnOnce(&SqliteBookRepository<'_>) -> RepoResult<T>) -> RepoResult<T> {
        let session = self.factory.open_session()?;
        let repo = SqliteBookRepository::new(session.connection());
        query(&repo)
    }

    fn insert_in_session(&self, book: &Book) -> RepoResult<BookId> {
        let mut session = self.factory.open_session()?;
        let tx = session.begin()?;
        let id = SqliteBookRepository::new(&tx).insert(book)?;
        tx.commit()?;
        Ok(id)
    }

    fn update_in_session(&self, id: BookId, available: bool) -> RepoResult<MutationOutcome> {
        let mut session = self.factory.open_session()?;
        let tx = session.begin()?;
        let repo = SqliteBookRepository::new(&tx);

        let Some(mut book) = repo.get(id)? else {
            tx.rollback()?;
            return Ok(MutationOutcome::NotFound(id));
        };
        book.available = available;
        repo.merge(&book)?;
        tx.commit()?;

        Ok(MutationOutcome::Applied { id, book })
    }

    fn delete_in_session(&self, id: BookId) -> RepoResult<MutationOutcome> {
        let mut session = self.factory.open_session()?;
        let tx = session.begin()?;
        let repo = SqliteBookRepository::new(&tx);

        let Some(book) = repo.get(id)? else {
            tx.rollback()?;
            return Ok(MutationOutcome::NotFound(id));
        };
        repo.remove(id)?;
        tx.commit()?;

        Ok(MutationOutcome::Applied { id, book })
    }
}

fn finish<T>(operation: Operation, started_at: Instant, result: RepoResult<T>) -> OpResult<T> {
    result.map_err(|source| {
        error!(
            "event={} module=service status=error duration_ms={} error={}",
            operation.as_str(),
            started_at.elapsed().as_millis(),
            source
        );
        OperationError { operation, source }
    })
}

fn log_mutation(operation: Operation, id: BookId, outcome: &MutationOutcome, started_at: Instant) {
    let status = match outcome {
        MutationOutcome::Applied { .. } => "ok",
        MutationOutcome::NotFound(_) => "not_found",
    };
    info!(
        "event={} module=service status={status} id={id} duration_ms={}",
        operation.as_str(),
        started_at.elapsed().as_millis()
    );
}

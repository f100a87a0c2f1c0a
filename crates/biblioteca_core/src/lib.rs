//! Core library for the Biblioteca book catalogue.
//! Owns the `libros` schema, the session factory, and the CRUD use-cases.

pub mod db;
pub mod demo;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod settings;

pub use db::{DbError, DbResult, Session, SessionFactory, StoreTarget};
pub use demo::{run_demo, DemoError, DemoSummary};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::book::{Book, BookId};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use service::book_service::{
    BookService, MutationOutcome, OpResult, Operation, OperationError,
};
pub use settings::{DatabaseSettings, LoggingSettings, Settings, SettingsError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for catalogue records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories never open or commit transactions; callers own them.

pub mod book_repo;

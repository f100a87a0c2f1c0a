//! Domain model for the book catalogue.
//!
//! # Responsibility
//! - Define the in-memory shape of catalogue records.
//! - Keep identity rules next to the data they protect.
//!
//! # Invariants
//! - Identity is assigned by storage, never by callers.

pub mod book;

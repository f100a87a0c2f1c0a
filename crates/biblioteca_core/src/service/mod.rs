//! Core use-case services.
//!
//! # Responsibility
//! - Own the unit-of-work lifecycle around repository calls.
//! - Keep callers decoupled from sessions, transactions and SQL.

pub mod book_service;

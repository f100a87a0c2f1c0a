//! Unit of work over one SQLite connection.
//!
//! # Responsibility
//! - Scope one connection to one operation call.
//! - Start transactions that roll back unless explicitly committed.
//!
//! # Invariants
//! - A session never outlives the factory that opened it.
//! - Dropping a session closes its connection on every exit path.

use super::DbResult;
use log::debug;
use rusqlite::{Connection, Transaction};
use std::marker::PhantomData;

/// One unit of work bound to a [`super::SessionFactory`].
pub struct Session<'factory> {
    id: u64,
    conn: Connection,
    _factory: PhantomData<&'factory ()>,
}

impl<'factory> Session<'factory> {
    pub(super) fn new(id: u64, conn: Connection) -> Self {
        Self {
            id,
            conn,
            _factory: PhantomData,
        }
    }

    /// Per-factory sequence number, used to correlate log lines.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Read-only access outside of an explicit transaction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begins a deferred transaction.
    ///
    /// The returned transaction rolls back when dropped without `commit`.
    pub fn begin(&mut self) -> DbResult<Transaction<'_>> {
        let tx = self.conn.transaction()?;
        debug!("event=tx_begin module=db status=ok session={}", self.id);
        Ok(tx)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        debug!("event=session_close module=db status=ok session={}", self.id);
    }
}

//! Session factory: the long-lived storage handle.
//!
//! # Responsibility
//! - Resolve the storage target (file or private in-memory store).
//! - Bootstrap the schema once through an anchor connection.
//! - Open one configured connection per session.
//!
//! # Invariants
//! - Every session of one factory observes the same database.
//! - Two in-memory factories never share data.
//! - The anchor connection stays open until `close`, which keeps
//!   in-memory stores alive between sessions.

use super::migrations::apply_migrations;
use super::session::Session;
use super::{DbError, DbResult};
use crate::settings::DatabaseSettings;
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Where a factory's sessions connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// SQLite database file.
    File(PathBuf),
    /// Named shared-cache in-memory database.
    Memory { uri: String },
}

impl StoreTarget {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory { .. } => "memory",
        }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory { uri } => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
    }
}

/// Process-wide source of sessions, constructed once at startup and passed
/// down to every operation.
pub struct SessionFactory {
    target: StoreTarget,
    busy_timeout: Duration,
    anchor: Connection,
    next_session_id: AtomicU64,
}

impl SessionFactory {
    /// Opens the store described by `settings` and applies migrations.
    ///
    /// # Side effects
    /// - Creates the database file when it does not exist yet.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(settings: &DatabaseSettings) -> DbResult<Self> {
        let target = match &settings.path {
            Some(path) => StoreTarget::File(path.clone()),
            None => memory_target(),
        };
        Self::open_target(target, Duration::from_millis(settings.busy_timeout_ms))
    }

    /// Opens (or creates) a SQLite database file and applies migrations.
    pub fn open_file(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::open(&DatabaseSettings::file(path.as_ref()))
    }

    /// Opens a private in-memory database and applies migrations.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&DatabaseSettings::in_memory())
    }

    fn open_target(target: StoreTarget, busy_timeout: Duration) -> DbResult<Self> {
        let started_at = Instant::now();
        let mode = target.mode();
        info!("event=db_open module=db status=start mode={mode}");

        let mut anchor = match target.connect() {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let bootstrap = configure_connection(&anchor, busy_timeout)
            .and_then(|()| apply_migrations(&mut anchor));
        match bootstrap {
            Ok(applied) => {
                info!(
                    "event=db_open module=db status=ok mode={mode} migrations_applied={applied} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    target,
                    busy_timeout,
                    anchor,
                    next_session_id: AtomicU64::new(1),
                })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns the storage target sessions connect to.
    pub fn target(&self) -> &StoreTarget {
        &self.target
    }

    /// Opens a new unit of work bound to this factory.
    ///
    /// The caller owns the session; dropping it closes its connection.
    pub fn open_session(&self) -> DbResult<Session<'_>> {
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let conn = self.target.connect().map_err(|err| {
            error!(
                "event=session_open module=db status=error session={session_id} error_code=connect_failed error={err}"
            );
            DbError::from(err)
        })?;
        configure_connection(&conn, self.busy_timeout)?;
        debug!("event=session_open module=db status=ok session={session_id}");
        Ok(Session::new(session_id, conn))
    }

    /// Releases the factory's anchor connection.
    ///
    /// Consumes the factory; for in-memory targets this discards the data.
    pub fn close(self) -> DbResult<()> {
        let mode = self.target.mode();
        match self.anchor.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=db_close module=db status=error mode={mode} error={err}");
                Err(err.into())
            }
        }
    }
}

fn memory_target() -> StoreTarget {
    StoreTarget::Memory {
        uri: format!(
            "file:biblioteca-{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        ),
    }
}

fn configure_connection(conn: &Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

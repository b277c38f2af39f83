pub mod error;
pub mod models;
pub mod queries;
pub mod schema;
pub mod timestamp;

pub use error::{ParseError, Result, StoreError};
pub use models::{MessageRow, PatchField};

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Message table inside an SQLite database file.
///
/// The store holds at most one connection. It is opened by [`connect`] and
/// released by [`close`]; every other operation fails with
/// [`StoreError::NotConnected`] in between.
///
/// [`connect`]: MessageStore::connect
/// [`close`]: MessageStore::close
pub struct MessageStore {
    path: PathBuf,
    table: String,
    /// `table`, quoted for interpolation into SQL.
    ident: String,
    conn: Mutex<Option<Connection>>,
}

impl MessageStore {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            path: path.into(),
            ident: schema::quote_ident(&table),
            table,
            conn: Mutex::new(None),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Open the database (creating it if needed) and make sure the table
    /// exists. Calling this on a connected store is a no-op.
    pub fn connect(&self) -> Result<()> {
        let mut guard = self.lock();
        if guard.is_some() {
            debug!("Table {} already connected", self.table);
            return Ok(());
        }

        let conn = Connection::open(&self.path).map_err(|source| self.connection_failed(source))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|source| self.connection_failed(source))?;
        schema::ensure(&conn, &self.table).map_err(|source| self.connection_failed(source))?;

        info!("Connected to table {} at {}", self.table, self.path.display());
        *guard = Some(conn);
        Ok(())
    }

    /// Release the connection. Closing twice is an error.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.lock();
        let conn = guard.take().ok_or_else(|| StoreError::CloseFailed {
            table: self.table.clone(),
            reason: "connection already closed".to_string(),
        })?;

        if let Err((conn, err)) = conn.close() {
            // Keep the handle so a later close can retry.
            *guard = Some(conn);
            return Err(StoreError::CloseFailed {
                table: self.table.clone(),
                reason: err.to_string(),
            });
        }

        info!("Connection to table {} closed", self.table);
        Ok(())
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or_else(|| StoreError::NotConnected {
            table: self.table.clone(),
        })?;
        f(conn)
    }

    pub(crate) fn ident(&self) -> &str {
        &self.ident
    }

    pub(crate) fn read_failed(&self, source: rusqlite::Error) -> StoreError {
        StoreError::ReadFailed {
            table: self.table.clone(),
            source,
        }
    }

    pub(crate) fn write_failed(&self, source: rusqlite::Error) -> StoreError {
        StoreError::WriteFailed {
            table: self.table.clone(),
            source,
        }
    }

    fn connection_failed(&self, source: rusqlite::Error) -> StoreError {
        StoreError::ConnectionFailed {
            table: self.table.clone(),
            source,
        }
    }

    // Poisoning is ignored: the guarded value is only the connection handle.
    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

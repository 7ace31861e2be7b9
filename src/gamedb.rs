use rusqlite::Connection;

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod players;
pub mod schema;

pub type DBResult<T> = rusqlite::Result<T>;

/// Handle to the game's SQLite database.
///
/// Opened once at startup, shared between requests, and released with
/// [`GameDb::close`] on shutdown. Every write goes through a single
/// connection, so concurrent saves are serialized by the lock and by SQLite's
/// own upsert.
pub struct GameDb {
    connection: Mutex<Connection>,
}

impl GameDb {
    /// Opens (or creates) the database file at `path` and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> DBResult<Self> {
        log::debug!("[open] Opening database at {}...", path.as_ref().display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database. Nothing is persisted.
    pub fn open_in_memory() -> DBResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> DBResult<Self> {
        let db = Self { connection: Mutex::new(connection) };
        db.initialize()?;
        Ok(db)
    }

    /// Creates the tables if they are missing. Safe to run on every start.
    pub fn initialize(&self) -> DBResult<()> {
        let connection = self.connect();

        log::debug!("[initialize] creating players table...");
        connection.execute(schema::PLAYERS_SCHEMA, [])?;
        connection.execute(schema::PLAYERS_LEADERBOARD_INDEX, [])?;

        Ok(())
    }

    /// Closes the underlying connection, reporting any error SQLite raises
    /// while flushing.
    pub fn close(self) -> DBResult<()> {
        log::debug!("[close] Closing database...");
        self.connection
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .close()
            .map_err(|(_, err)| err)
    }

    /// Locks the connection for the duration of one query.
    // Statements are atomic, so a poisoned lock holds no partial write.
    pub(crate) fn connect(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

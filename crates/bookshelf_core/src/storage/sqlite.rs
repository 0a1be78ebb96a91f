//! SQLite-backed slot storage.
//!
//! # Responsibility
//! - Persist slot payloads in a `slots` table, one row per slot key.
//! - Detect writes made through other connections to the same database.
//!
//! # Invariants
//! - Every save bumps the row version inside one transaction.
//! - Connections are opened with a busy timeout, so concurrent writers
//!   queue instead of failing immediately.
//! - The schema version is guarded through `PRAGMA user_version`.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use rusqlite::{params, Connection};

use crate::model::book::Book;
use crate::storage::{
    decode_collection, encode_collection, ShelfStorage, StorageError, StorageResult,
    DEFAULT_SLOT_KEY,
};

const SCHEMA_VERSION: i64 = 1;

/// Durable storage backend safe for several concurrent writer processes.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    slot_key: String,
    last_seen_version: i64,
}

impl SqliteStorage {
    /// Opens (or creates) a slot database file bound to the default slot.
    ///
    /// # Side effects
    /// - Creates the `slots` table on first open.
    /// - Emits `slot_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_slot_key(path, DEFAULT_SLOT_KEY)
    }

    /// Opens (or creates) a slot database file bound to the named slot.
    pub fn open_with_slot_key(path: impl AsRef<Path>, slot_key: &str) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=slot_open module=storage status=start mode=sqlite slot={}",
            slot_key
        );

        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=slot_open module=storage status=error mode=sqlite slot={} duration_ms={} error={}",
                    slot_key,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match bootstrap_connection(&conn) {
            Ok(()) => {
                info!(
                    "event=slot_open module=storage status=ok mode=sqlite slot={} duration_ms={}",
                    slot_key,
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    conn,
                    slot_key: slot_key.to_string(),
                    last_seen_version: 0,
                })
            }
            Err(err) => {
                error!(
                    "event=slot_open module=storage status=error mode=sqlite slot={} duration_ms={} error={}",
                    slot_key,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Opens a private in-memory slot database, mostly for tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        bootstrap_connection(&conn)?;
        Ok(Self {
            conn,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            last_seen_version: 0,
        })
    }

    fn read_slot(&self) -> StorageResult<Option<(String, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload, version FROM slots WHERE slot_key = ?1;")?;
        let mut rows = stmt.query([self.slot_key.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some((row.get(0)?, row.get(1)?)));
        }
        Ok(None)
    }
}

impl ShelfStorage for SqliteStorage {
    fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn load(&mut self) -> Vec<Book> {
        match self.read_slot() {
            Ok(Some((payload, version))) => {
                self.last_seen_version = version;
                decode_collection(&payload, &self.slot_key)
            }
            Ok(None) => {
                self.last_seen_version = 0;
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=slot_read module=storage status=error slot={} error={}",
                    self.slot_key, err
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, books: &[Book]) -> StorageResult<()> {
        let payload = encode_collection(books)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO slots (slot_key, payload, version)
             VALUES (?1, ?2, 1)
             ON CONFLICT(slot_key)
             DO UPDATE SET payload = excluded.payload, version = slots.version + 1;",
            params![self.slot_key.as_str(), payload.as_str()],
        )?;
        let version: i64 = tx.query_row(
            "SELECT version FROM slots WHERE slot_key = ?1;",
            [self.slot_key.as_str()],
            |row| row.get(0),
        )?;
        tx.commit()?;

        self.last_seen_version = version;
        info!(
            "event=slot_save module=storage status=ok slot={} books={} version={}",
            self.slot_key,
            books.len(),
            version
        );
        Ok(())
    }

    fn external_change_pending(&mut self) -> StorageResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT version FROM slots WHERE slot_key = ?1;")?;
        let mut rows = stmt.query([self.slot_key.as_str()])?;
        let current = match rows.next()? {
            Some(row) => row.get::<_, i64>(0)?,
            None => 0,
        };
        Ok(current != self.last_seen_version)
    }
}

fn bootstrap_connection(conn: &Connection) -> StorageResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    let found: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    match found {
        0 => {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS slots (
                    slot_key TEXT PRIMARY KEY,
                    payload  TEXT NOT NULL,
                    version  INTEGER NOT NULL
                 );
                 PRAGMA user_version = 1;",
            )?;
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        other => Err(StorageError::Schema(other)),
    }
}

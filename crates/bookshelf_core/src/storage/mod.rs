//! Persisted-slot storage contracts and implementations.
//!
//! # Responsibility
//! - Define the storage adapter contract for the persisted collection slot.
//! - Own the single wire codec for the serialized collection.
//! - Detect externally-originated writes to the slot (another window or
//!   process of the app racing this one).
//!
//! # Invariants
//! - `load` never fails: an absent slot or a malformed payload yields an
//!   empty collection (logged, not raised).
//! - `save` writes the full collection, never a partial one.
//! - A handle's own writes are never reported as external changes.

use crate::model::book::Book;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Fixed name of the persisted slot, wire-compatible with collections
/// written by earlier releases of the app.
pub const DEFAULT_SLOT_KEY: &str = "BOOKSHELF_APPS";

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport-level storage failure.
///
/// Decode failures are deliberately absent from this enum: malformed
/// payloads are recovered as empty collections inside `load` and never
/// propagate to callers.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    Serialize(serde_json::Error),
    /// Shared in-memory area lock was poisoned by a panicking writer.
    Poisoned,
    /// Slot database carries a schema version this build does not know.
    Schema(i64),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "slot i/o failed: {err}"),
            Self::Sqlite(err) => write!(f, "slot database failed: {err}"),
            Self::Serialize(err) => write!(f, "collection could not be serialized: {err}"),
            Self::Poisoned => write!(f, "storage area lock poisoned"),
            Self::Schema(found) => write!(f, "unsupported slot schema version: {found}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Poisoned => None,
            Self::Schema(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Storage adapter bound to one named slot.
///
/// Implementations keep track of the slot content they last read or wrote
/// so that `external_change_pending` can tell foreign writes apart from
/// their own.
pub trait ShelfStorage {
    /// The fixed slot name this adapter reads and writes.
    fn slot_key(&self) -> &str;

    /// Reads the persisted collection.
    ///
    /// Fails soft: an absent slot, an unreadable slot and a malformed
    /// payload all yield an empty collection. Also synchronizes the
    /// handle's notion of current slot content.
    fn load(&mut self) -> Vec<Book>;

    /// Serializes and writes the full collection, overwriting the slot.
    fn save(&mut self, books: &[Book]) -> StorageResult<()>;

    /// Returns whether the slot changed under this handle since it last
    /// loaded or saved, i.e. whether a foreign actor wrote it.
    ///
    /// Detection does not consume the pending state; it stays pending
    /// until the handle loads (or overwrites) the foreign content.
    fn external_change_pending(&mut self) -> StorageResult<bool>;
}

/// Encodes a collection into the JSON-array wire payload.
pub fn encode_collection(books: &[Book]) -> StorageResult<String> {
    serde_json::to_string(books).map_err(StorageError::Serialize)
}

/// Decodes a wire payload into a collection.
///
/// Malformed input is logged and substituted with an empty collection;
/// this is the recovery half of the fail-soft `load` contract.
pub fn decode_collection(payload: &str, slot_key: &str) -> Vec<Book> {
    match serde_json::from_str(payload) {
        Ok(books) => books,
        Err(err) => {
            warn!("event=slot_decode module=storage status=error slot={slot_key} error={err}");
            Vec::new()
        }
    }
}

//! JSON slot files on the local filesystem.
//!
//! # Responsibility
//! - Persist the collection payload as `<dir>/<slot key>.json`.
//! - Detect writes made by other processes sharing the same file.
//!
//! # Invariants
//! - A missing slot file reads as an empty collection, never as an error.
//! - The last payload this handle read or wrote is remembered, so a
//!   differing file counts as a pending external change until reloaded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::model::book::Book;
use crate::storage::{
    decode_collection, encode_collection, ShelfStorage, StorageResult, DEFAULT_SLOT_KEY,
};

/// Durable storage backend writing one JSON file per slot.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    slot_key: String,
    last_synced: Option<String>,
}

impl FileStorage {
    /// Opens the default slot under `dir`, creating `dir` when absent.
    ///
    /// # Side effects
    /// - Creates the directory tree.
    /// - Emits `slot_open` logging events.
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_slot_key(dir, DEFAULT_SLOT_KEY)
    }

    /// Opens the named slot under `dir`, creating `dir` when absent.
    pub fn open_with_slot_key(dir: impl AsRef<Path>, slot_key: &str) -> StorageResult<Self> {
        let dir = dir.as_ref();
        if let Err(err) = fs::create_dir_all(dir) {
            error!(
                "event=slot_open module=storage status=error mode=file slot={} error={}",
                slot_key, err
            );
            return Err(err.into());
        }
        let path = dir.join(format!("{slot_key}.json"));
        info!(
            "event=slot_open module=storage status=ok mode=file slot={} path={}",
            slot_key,
            path.display()
        );
        Ok(Self {
            path,
            slot_key: slot_key.to_string(),
            last_synced: None,
        })
    }

    /// Full path of the slot file backing this handle.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ShelfStorage for FileStorage {
    fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn load(&mut self) -> Vec<Book> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => {
                debug!(
                    "event=slot_read module=storage status=ok slot={} bytes={}",
                    self.slot_key,
                    payload.len()
                );
                let books = decode_collection(&payload, &self.slot_key);
                self.last_synced = Some(payload);
                books
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "event=slot_read module=storage status=ok slot={} bytes=0 missing=true",
                    self.slot_key
                );
                self.last_synced = None;
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=slot_read module=storage status=error slot={} error={}",
                    self.slot_key, err
                );
                self.last_synced = None;
                Vec::new()
            }
        }
    }

    fn save(&mut self, books: &[Book]) -> StorageResult<()> {
        let payload = encode_collection(books)?;
        if let Err(err) = fs::write(&self.path, payload.as_bytes()) {
            error!(
                "event=slot_save module=storage status=error slot={} path={} error={}",
                self.slot_key,
                self.path.display(),
                err
            );
            return Err(err.into());
        }
        info!(
            "event=slot_save module=storage status=ok slot={} books={}",
            self.slot_key,
            books.len()
        );
        self.last_synced = Some(payload);
        Ok(())
    }

    fn external_change_pending(&mut self) -> StorageResult<bool> {
        match fs::read_to_string(&self.path) {
            Ok(current) => Ok(self.last_synced.as_deref() != Some(current.as_str())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(self.last_synced.is_some()),
            Err(err) => Err(err.into()),
        }
    }
}

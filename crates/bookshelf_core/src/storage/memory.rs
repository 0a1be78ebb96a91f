//! In-memory slot area shared between storage handles.
//!
//! # Responsibility
//! - Hold slot payloads in a process-local map for tests and embedders
//!   that have no durable medium.
//! - Let several handles share one area, so a sibling handle behaves
//!   like another window writing the same slot.
//!
//! # Invariants
//! - Every save bumps the slot version; sibling handles see a pending
//!   external change until their next load.
//! - A handle never reports its own saves as external changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::model::book::Book;
use crate::storage::{
    decode_collection, encode_collection, ShelfStorage, StorageError, StorageResult,
    DEFAULT_SLOT_KEY,
};

#[derive(Debug, Default, Clone)]
struct Slot {
    payload: String,
    version: u64,
}

/// Volatile storage backend over a shared slot area.
#[derive(Debug)]
pub struct MemoryStorage {
    area: Arc<Mutex<HashMap<String, Slot>>>,
    slot_key: String,
    last_seen_version: u64,
}

impl MemoryStorage {
    /// Opens a fresh area holding the default slot.
    pub fn new() -> Self {
        Self::with_slot_key(DEFAULT_SLOT_KEY)
    }

    /// Opens a fresh area holding the given slot.
    pub fn with_slot_key(slot_key: &str) -> Self {
        Self {
            area: Arc::new(Mutex::new(HashMap::new())),
            slot_key: slot_key.to_string(),
            last_seen_version: 0,
        }
    }

    /// Returns a sibling handle over the same area and slot.
    ///
    /// The sibling starts with no sync history, so a slot that already
    /// holds data shows up as a pending external change until the
    /// sibling loads it.
    pub fn share(&self) -> Self {
        self.share_as(&self.slot_key)
    }

    /// Returns a sibling handle over the same area bound to another slot.
    pub fn share_as(&self, slot_key: &str) -> Self {
        Self {
            area: Arc::clone(&self.area),
            slot_key: slot_key.to_string(),
            last_seen_version: 0,
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelfStorage for MemoryStorage {
    fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn load(&mut self) -> Vec<Book> {
        let area = match self.area.lock() {
            Ok(area) => area,
            Err(poisoned) => poisoned.into_inner(),
        };
        match area.get(&self.slot_key) {
            Some(slot) => {
                self.last_seen_version = slot.version;
                decode_collection(&slot.payload, &self.slot_key)
            }
            None => {
                self.last_seen_version = 0;
                Vec::new()
            }
        }
    }

    fn save(&mut self, books: &[Book]) -> StorageResult<()> {
        let payload = encode_collection(books)?;
        let mut area = self.area.lock().map_err(|_| StorageError::Poisoned)?;
        let slot = area.entry(self.slot_key.clone()).or_default();
        slot.payload = payload;
        slot.version += 1;
        self.last_seen_version = slot.version;
        Ok(())
    }

    fn external_change_pending(&mut self) -> StorageResult<bool> {
        let area = self.area.lock().map_err(|_| StorageError::Poisoned)?;
        let current = area
            .get(&self.slot_key)
            .map(|slot| slot.version)
            .unwrap_or(0);
        Ok(current != self.last_seen_version)
    }
}

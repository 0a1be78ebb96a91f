//! Intent dispatch over the owned collection store.
//!
//! # Responsibility
//! - Translate user intents into store operations, gating validation
//!   and delete confirmation before any mutation.
//! - Surface the hosting environment's storage-change signal as an
//!   intent.
//!
//! # Invariants
//! - Every accepted intent ends with a persisted collection and a
//!   published render frame before dispatch returns.
//! - A missing id is a silent no-op, never an error.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::event::RenderBus;
use crate::model::book::{BookDraft, BookId, BookPatch, BookValidationError};
use crate::shelf::{Bookshelf, ShelfError, ShelfResult};
use crate::storage::ShelfStorage;

/// A user-triggered request against the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Add a new book from submitted form fields.
    AddBook(BookDraft),
    /// Move a book to the other completion shelf.
    ToggleComplete(BookId),
    /// Apply edited fields to an existing book.
    EditBook { id: BookId, patch: BookPatch },
    /// Remove a book, carrying the user's confirmation answer.
    DeleteBook { id: BookId, confirmed: bool },
    /// Narrow the rendered views to matching titles.
    SearchQueryChanged(String),
    /// Another window or process wrote a storage slot.
    ExternalStorageChanged { slot_key: String },
}

/// What became of a dispatched intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State or view changed and a frame was published.
    Applied,
    /// Silent no-op: missing id, unconfirmed delete, or foreign slot key.
    Ignored,
    /// The validation gate refused the submitted fields.
    Rejected(BookValidationError),
}

/// Synchronous dispatcher exclusively owning the collection store.
pub struct Coordinator<S: ShelfStorage> {
    shelf: Bookshelf<S>,
}

impl<S: ShelfStorage> Coordinator<S> {
    /// Wraps an already opened shelf.
    pub fn new(shelf: Bookshelf<S>) -> Self {
        Self { shelf }
    }

    /// Opens the shelf on `storage` and takes ownership of it.
    pub fn open(storage: S, bus: Arc<RenderBus>) -> Self {
        Self::new(Bookshelf::open(storage, bus))
    }

    /// Read access to the owned store.
    pub fn shelf(&self) -> &Bookshelf<S> {
        &self.shelf
    }

    /// Runs one intent to completion.
    pub fn dispatch(&mut self, intent: Intent) -> ShelfResult<DispatchOutcome> {
        match intent {
            Intent::AddBook(draft) => {
                if let Err(err) = draft.validate() {
                    warn!(
                        "event=intent_add module=event status=rejected error={}",
                        err
                    );
                    return Ok(DispatchOutcome::Rejected(err));
                }
                let book = self.shelf.add(draft)?;
                info!("event=intent_add module=event status=ok id={}", book.id);
                Ok(DispatchOutcome::Applied)
            }
            Intent::ToggleComplete(id) => match self.shelf.toggle_complete(id) {
                Ok(book) => {
                    info!(
                        "event=intent_toggle module=event status=ok id={} is_complete={}",
                        book.id, book.is_complete
                    );
                    Ok(DispatchOutcome::Applied)
                }
                Err(ShelfError::NotFound(_)) => {
                    debug!(
                        "event=intent_toggle module=event status=ignored id={} reason=not_found",
                        id
                    );
                    Ok(DispatchOutcome::Ignored)
                }
                Err(err) => Err(err),
            },
            Intent::EditBook { id, patch } => {
                if patch.is_empty() {
                    debug!(
                        "event=intent_edit module=event status=ignored id={} reason=empty_patch",
                        id
                    );
                    return Ok(DispatchOutcome::Ignored);
                }
                if let Err(err) = patch.validate() {
                    warn!(
                        "event=intent_edit module=event status=rejected id={} error={}",
                        id, err
                    );
                    return Ok(DispatchOutcome::Rejected(err));
                }
                match self.shelf.update(id, &patch) {
                    Ok(book) => {
                        info!("event=intent_edit module=event status=ok id={}", book.id);
                        Ok(DispatchOutcome::Applied)
                    }
                    Err(ShelfError::NotFound(_)) => {
                        debug!(
                            "event=intent_edit module=event status=ignored id={} reason=not_found",
                            id
                        );
                        Ok(DispatchOutcome::Ignored)
                    }
                    Err(err) => Err(err),
                }
            }
            Intent::DeleteBook { id, confirmed } => {
                if !confirmed {
                    debug!(
                        "event=intent_delete module=event status=ignored id={} reason=unconfirmed",
                        id
                    );
                    return Ok(DispatchOutcome::Ignored);
                }
                if self.shelf.remove(id)? {
                    info!("event=intent_delete module=event status=ok id={}", id);
                    Ok(DispatchOutcome::Applied)
                } else {
                    debug!(
                        "event=intent_delete module=event status=ignored id={} reason=not_found",
                        id
                    );
                    Ok(DispatchOutcome::Ignored)
                }
            }
            Intent::SearchQueryChanged(query) => {
                self.shelf.set_search_query(query);
                info!(
                    "event=intent_search module=event status=ok query_len={}",
                    self.shelf.search_query().len()
                );
                Ok(DispatchOutcome::Applied)
            }
            Intent::ExternalStorageChanged { slot_key } => {
                if slot_key != self.shelf.slot_key() {
                    debug!(
                        "event=intent_storage_sync module=event status=ignored slot={} reason=slot_mismatch",
                        slot_key
                    );
                    return Ok(DispatchOutcome::Ignored);
                }
                self.shelf.reload()?;
                info!(
                    "event=intent_storage_sync module=event status=ok slot={} books={}",
                    slot_key,
                    self.shelf.len()
                );
                Ok(DispatchOutcome::Applied)
            }
        }
    }

    /// Polls the bound adapter for a foreign write, reloading on a hit.
    pub fn poll_storage(&mut self) -> ShelfResult<DispatchOutcome> {
        if self.shelf.external_change_pending()? {
            let slot_key = self.shelf.slot_key().to_string();
            self.dispatch(Intent::ExternalStorageChanged { slot_key })
        } else {
            Ok(DispatchOutcome::Ignored)
        }
    }
}

//! The owned book collection and its mutation surface.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::{debug, error, info};

use crate::event::RenderBus;
use crate::model::book::{Book, BookDraft, BookId, BookPatch};
use crate::shelf::ids::IdSequence;
use crate::storage::{ShelfStorage, StorageError, StorageResult};
use crate::view::RenderFrame;

pub type ShelfResult<T> = Result<T, ShelfError>;

/// Errors surfaced by collection mutations.
#[derive(Debug)]
pub enum ShelfError {
    Storage(StorageError),
    NotFound(BookId),
}

impl Display for ShelfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
        }
    }
}

impl Error for ShelfError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StorageError> for ShelfError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// The single source of truth for one storage slot.
///
/// Holds the ordered collection (display order is insertion order), the
/// id sequence, and the active search query. Every accepted mutation
/// saves the full collection through the bound storage adapter and then
/// publishes a render frame on the injected bus; subscribers never see
/// state that storage does not already hold.
///
/// Drafts and patches arrive pre-validated; the store applies what it
/// is given.
pub struct Bookshelf<S: ShelfStorage> {
    storage: S,
    books: Vec<Book>,
    ids: IdSequence,
    query: String,
    bus: Arc<RenderBus>,
}

impl<S: ShelfStorage> Bookshelf<S> {
    /// Loads the persisted collection and publishes the initial frame.
    ///
    /// A missing or unreadable slot opens as an empty shelf. The id
    /// sequence continues after the highest persisted id.
    pub fn open(mut storage: S, bus: Arc<RenderBus>) -> Self {
        let books = storage.load();
        let ids = IdSequence::seeded_from(&books);
        info!(
            "event=shelf_open module=shelf status=ok slot={} books={}",
            storage.slot_key(),
            books.len()
        );
        let shelf = Self {
            storage,
            books,
            ids,
            query: String::new(),
            bus,
        };
        shelf.publish();
        shelf
    }

    /// Appends a new book with a fresh id and returns the stored record.
    pub fn add(&mut self, draft: BookDraft) -> ShelfResult<Book> {
        let book = draft.into_book(self.ids.next_id());
        self.books.push(book.clone());
        self.commit("shelf_add")?;
        Ok(book)
    }

    pub fn find_by_id(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Flips the completion flag of the given book.
    pub fn toggle_complete(&mut self, id: BookId) -> ShelfResult<Book> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(ShelfError::NotFound(id))?;
        book.toggle_completion();
        let updated = book.clone();
        self.commit("shelf_toggle")?;
        Ok(updated)
    }

    /// Applies a partial field set to the given book.
    pub fn update(&mut self, id: BookId, patch: &BookPatch) -> ShelfResult<Book> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(ShelfError::NotFound(id))?;
        book.apply_patch(patch);
        let updated = book.clone();
        self.commit("shelf_update")?;
        Ok(updated)
    }

    /// Removes the given book; `Ok(false)` when it was never there.
    pub fn remove(&mut self, id: BookId) -> ShelfResult<bool> {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        if self.books.len() == before {
            return Ok(false);
        }
        self.commit("shelf_remove")?;
        Ok(true)
    }

    /// Records the active search query and republishes the views.
    ///
    /// The query is view state; it is never persisted.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        debug!(
            "event=shelf_query module=shelf status=ok query_len={}",
            self.query.len()
        );
        self.publish();
    }

    /// Replaces in-memory state with whatever storage holds now.
    ///
    /// Last writer wins; nothing is merged. The id sequence is re-seeded
    /// so ids granted after a foreign write stay unique.
    pub fn reload(&mut self) -> ShelfResult<()> {
        self.books = self.storage.load();
        self.ids = IdSequence::seeded_from(&self.books);
        info!(
            "event=shelf_reload module=shelf status=ok slot={} books={}",
            self.storage.slot_key(),
            self.books.len()
        );
        self.publish();
        Ok(())
    }

    /// Asks the bound adapter whether a foreign actor wrote the slot.
    pub fn external_change_pending(&mut self) -> StorageResult<bool> {
        self.storage.external_change_pending()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn search_query(&self) -> &str {
        &self.query
    }

    pub fn slot_key(&self) -> &str {
        self.storage.slot_key()
    }

    /// Projects the current state into a frame, as a publish would.
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::new(&self.books, &self.query)
    }

    /// Saves the full collection, then notifies subscribers.
    ///
    /// On a save failure the in-memory mutation stands, the notify step
    /// is skipped, and the error propagates to the dispatching caller.
    fn commit(&mut self, event: &str) -> ShelfResult<()> {
        if let Err(err) = self.storage.save(&self.books) {
            error!(
                "event={} module=shelf status=error slot={} error={}",
                event,
                self.storage.slot_key(),
                err
            );
            return Err(err.into());
        }
        info!(
            "event={} module=shelf status=ok slot={} books={}",
            event,
            self.storage.slot_key(),
            self.books.len()
        );
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.bus.publish(&self.render_frame());
    }
}

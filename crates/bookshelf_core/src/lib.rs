//! Core domain logic for the bookshelf manager.
//! This crate is the single source of truth for collection state,
//! persistence, and render projection.

pub mod event;
pub mod logging;
pub mod model;
pub mod shelf;
pub mod storage;
pub mod view;

pub use event::{Coordinator, DispatchOutcome, Intent, RenderBus, SubscriberId};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookDraft, BookId, BookPatch, BookValidationError};
pub use shelf::{Bookshelf, IdSequence, ShelfError, ShelfResult};
pub use storage::{
    FileStorage, MemoryStorage, ShelfStorage, SqliteStorage, StorageError, StorageResult,
    DEFAULT_SLOT_KEY,
};
pub use view::{BookshelfView, EmptyState, RenderFrame, ShelfView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

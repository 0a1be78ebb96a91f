//! Derived display views over the collection.
//!
//! # Responsibility
//! - Project the collection into the two completion shelves, optionally
//!   narrowed by the active search query.
//! - Tag empty views with the user-facing empty-state marker.
//!
//! # Invariants
//! - Projection never mutates the collection and preserves insertion
//!   order inside every view.
//! - Every book lands on exactly one shelf.

pub mod projector;

pub use projector::{
    empty_state, partition, project, search_by_title, BookshelfView, EmptyState, Partitioned,
    RenderFrame, ShelfView,
};

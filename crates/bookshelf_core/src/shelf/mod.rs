//! Owned collection state and its persistence discipline.
//!
//! # Responsibility
//! - Keep the single authoritative book list for one storage slot.
//! - Persist after every mutation, then publish a fresh render frame.
//! - Allocate collection-unique identifiers for new books.
//!
//! # Invariants
//! - All mutations go through [`store::Bookshelf`]; nothing else writes
//!   the slot.
//! - An accepted mutation reaches storage before any subscriber hears
//!   about it.

pub mod ids;
pub mod store;

pub use ids::IdSequence;
pub use store::{Bookshelf, ShelfError, ShelfResult};

//! Domain model for the bookshelf catalog.
//!
//! # Responsibility
//! - Define the canonical book record used by storage, views and events.
//! - Define the add/edit input shapes and their validation rules.
//!
//! # Invariants
//! - Every record is identified by a unique `BookId` within its collection.
//! - `is_complete` is the sole partition key: a book is always on exactly
//!   one of the two shelves, never both, never neither.

pub mod book;

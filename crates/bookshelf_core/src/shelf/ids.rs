//! Identifier allocation for new books.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::book::{Book, BookId};

/// Allocates strictly increasing book identifiers.
///
/// Identifiers start from the wall clock in epoch milliseconds and fall
/// back to `last + 1` whenever the clock stalls or runs backwards, so
/// two additions in the same clock tick can never collide.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: BookId,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Continues the sequence after the highest already persisted id.
    pub fn seeded_from(books: &[Book]) -> Self {
        Self {
            last: books.iter().map(|book| book.id).max().unwrap_or(0),
        }
    }

    /// Hands out the next identifier.
    pub fn next_id(&mut self) -> BookId {
        self.last = epoch_millis().max(self.last + 1);
        self.last
    }
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_id(id: BookId) -> Book {
        Book {
            id,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            is_complete: false,
        }
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdSequence::new();
        let mut previous = 0;
        for _ in 0..64 {
            let id = ids.next_id();
            assert!(id > previous);
            previous = id;
        }
    }

    #[test]
    fn fresh_sequence_starts_at_the_wall_clock() {
        let mut ids = IdSequence::new();
        assert!(ids.next_id() > 1_600_000_000_000);
    }

    #[test]
    fn seeded_sequence_never_reuses_a_persisted_id() {
        let far_future = 4_102_444_800_000;
        let mut ids = IdSequence::seeded_from(&[book_with_id(7), book_with_id(far_future)]);
        assert_eq!(ids.next_id(), far_future + 1);
        assert_eq!(ids.next_id(), far_future + 2);
    }

    #[test]
    fn seeding_from_nothing_matches_a_fresh_sequence() {
        let mut ids = IdSequence::seeded_from(&[]);
        assert!(ids.next_id() > 1_600_000_000_000);
    }
}

//! Pure projection of the collection into render-ready views.

use std::fmt::{Display, Formatter};

use crate::model::book::Book;

/// The collection split into its two completion shelves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned {
    pub incomplete: Vec<Book>,
    pub complete: Vec<Book>,
}

/// Why a shelf view shows no books.
///
/// `NoBooks` wins over `NoMatches`, which wins over `EmptyShelf`: an
/// empty collection is reported as such even while a query is active,
/// and a query that matches nothing is reported before blaming the
/// shelf split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoBooks,
    NoMatches,
    EmptyShelf,
}

impl Display for EmptyState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::NoBooks => "No books available",
            Self::NoMatches => "No books matched your search",
            Self::EmptyShelf => "No books on this shelf",
        };
        f.write_str(message)
    }
}

/// One shelf of the display, with its empty-state marker when bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfView {
    pub books: Vec<Book>,
    pub empty_state: Option<EmptyState>,
}

/// Both shelves of the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookshelfView {
    pub incomplete: ShelfView,
    pub complete: ShelfView,
}

/// Payload of a render notification.
///
/// Couples the projected shelves with the full collection snapshot, for
/// collaborators that template their own markup from the raw records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub books: Vec<Book>,
    pub view: BookshelfView,
}

impl RenderFrame {
    pub fn new(books: &[Book], query: &str) -> Self {
        Self {
            books: books.to_vec(),
            view: project(books, query),
        }
    }
}

/// Splits the collection into its completion shelves, preserving order.
pub fn partition(books: &[Book]) -> Partitioned {
    let mut incomplete = Vec::new();
    let mut complete = Vec::new();
    for book in books {
        if book.is_complete {
            complete.push(book.clone());
        } else {
            incomplete.push(book.clone());
        }
    }
    Partitioned {
        incomplete,
        complete,
    }
}

/// Case-insensitive substring filter on titles.
///
/// The empty query matches every book.
pub fn search_by_title(books: &[Book], query: &str) -> Vec<Book> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|book| book.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Picks the marker for an empty view, `None` when the view has books.
pub fn empty_state(total: usize, has_query: bool, view_len: usize) -> Option<EmptyState> {
    if view_len > 0 {
        return None;
    }
    if total == 0 {
        return Some(EmptyState::NoBooks);
    }
    if has_query {
        return Some(EmptyState::NoMatches);
    }
    Some(EmptyState::EmptyShelf)
}

/// Applies the active query, then partitions, tagging each shelf view.
pub fn project(books: &[Book], query: &str) -> BookshelfView {
    let total = books.len();
    let has_query = !query.is_empty();
    let parts = partition(&search_by_title(books, query));
    let incomplete_state = empty_state(total, has_query, parts.incomplete.len());
    let complete_state = empty_state(total, has_query, parts.complete.len());
    BookshelfView {
        incomplete: ShelfView {
            books: parts.incomplete,
            empty_state: incomplete_state,
        },
        complete: ShelfView {
            books: parts.complete,
            empty_state: complete_state,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf() -> Vec<Book> {
        vec![
            Book {
                id: 1,
                title: "Buku Pertama".to_string(),
                author: "Andi".to_string(),
                year: 2019,
                is_complete: false,
            },
            Book {
                id: 2,
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1965,
                is_complete: true,
            },
            Book {
                id: 3,
                title: "Buku Kedua".to_string(),
                author: "Budi".to_string(),
                year: 2021,
                is_complete: true,
            },
        ]
    }

    #[test]
    fn partition_is_complete_and_order_preserving() {
        let books = shelf();
        let parts = partition(&books);

        assert_eq!(parts.incomplete.len() + parts.complete.len(), books.len());
        assert_eq!(parts.incomplete[0].id, 1);
        assert_eq!(parts.complete[0].id, 2);
        assert_eq!(parts.complete[1].id, 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let books = shelf();
        let upper = search_by_title(&books, "BUKU");
        let lower = search_by_title(&books, "buku");

        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
        assert_eq!(search_by_title(&books, "une").len(), 1);
        assert!(search_by_title(&books, "xyz").is_empty());
    }

    #[test]
    fn empty_query_matches_everything() {
        let books = shelf();
        assert_eq!(search_by_title(&books, ""), books);
    }

    #[test]
    fn empty_state_precedence() {
        assert_eq!(empty_state(0, false, 0), Some(EmptyState::NoBooks));
        assert_eq!(empty_state(0, true, 0), Some(EmptyState::NoBooks));
        assert_eq!(empty_state(3, true, 0), Some(EmptyState::NoMatches));
        assert_eq!(empty_state(3, false, 0), Some(EmptyState::EmptyShelf));
        assert_eq!(empty_state(3, true, 2), None);
    }

    #[test]
    fn project_tags_each_shelf_independently() {
        let books = shelf();
        let view = project(&books, "dune");

        assert!(view.incomplete.books.is_empty());
        assert_eq!(
            view.incomplete.empty_state,
            Some(EmptyState::NoMatches)
        );
        assert_eq!(view.complete.books.len(), 1);
        assert_eq!(view.complete.empty_state, None);
    }

    #[test]
    fn empty_state_messages_are_user_facing() {
        assert_eq!(EmptyState::NoBooks.to_string(), "No books available");
        assert_eq!(
            EmptyState::NoMatches.to_string(),
            "No books matched your search"
        );
        assert_eq!(EmptyState::EmptyShelf.to_string(), "No books on this shelf");
    }
}

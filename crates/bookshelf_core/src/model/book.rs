//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record and its wire field names.
//! - Provide the candidate/patch shapes consumed by add and edit intents.
//!
//! # Invariants
//! - The serialized field names are pinned to the persisted slot format
//!   (`isComplete` stays camel-cased on the wire).
//! - `title` and `author` of a stored record are never empty; the intent
//!   dispatcher validates drafts and patches before they reach storage.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a book record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Ids are creation-ordered integers; see `shelf::IdSequence`.
pub type BookId = i64;

/// Canonical catalog record.
///
/// The serialized form of this struct is the wire format of the persisted
/// slot; it must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique id assigned at creation time.
    pub id: BookId,
    /// Display title; also the case-insensitive search key.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Publication year as entered by the user. No range validation.
    pub year: i32,
    /// Completion flag partitioning the collection into the two shelves.
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl Book {
    /// Flips the completion flag, moving the book to the other shelf.
    pub fn toggle_completion(&mut self) {
        self.is_complete = !self.is_complete;
    }

    /// Applies the populated fields of a patch in place.
    ///
    /// Absent fields are left unchanged; the patch is assumed validated.
    pub fn apply_patch(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(is_complete) = patch.is_complete {
            self.is_complete = is_complete;
        }
    }
}

/// Candidate fields for an add intent.
///
/// Year arrives already parsed; turning form text into an integer is the
/// wiring layer's job. Completion is chosen on the add form and defaults
/// to not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub is_complete: bool,
}

impl BookDraft {
    /// Creates a draft for a not-yet-finished book.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            is_complete: false,
        }
    }

    /// Checks the required-field constraints of an add intent.
    ///
    /// Whitespace-only values count as empty. Stored values keep the
    /// user's original spelling; only the emptiness check trims.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        Ok(())
    }

    /// Materializes the draft into a record with the given id.
    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            is_complete: self.is_complete,
        }
    }
}

/// Partial field set for an edit intent.
///
/// `None` leaves the corresponding field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub is_complete: Option<bool>,
}

impl BookPatch {
    /// Returns whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.is_complete.is_none()
    }

    /// Checks that populated required fields stay non-empty.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(BookValidationError::EmptyTitle);
        }
        if matches!(&self.author, Some(author) if author.trim().is_empty()) {
            return Err(BookValidationError::EmptyAuthor);
        }
        Ok(())
    }
}

/// Required-field violations in add/edit input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title must not be empty"),
            Self::EmptyAuthor => write!(f, "book author must not be empty"),
        }
    }
}

impl Error for BookValidationError {}

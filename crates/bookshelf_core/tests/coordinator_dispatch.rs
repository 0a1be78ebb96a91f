use std::sync::{Arc, Mutex};

use bookshelf_core::{
    BookDraft, BookPatch, BookValidationError, Coordinator, DispatchOutcome, EmptyState, Intent,
    MemoryStorage, RenderBus, RenderFrame,
};

fn tracked_coordinator() -> (Coordinator<MemoryStorage>, Arc<Mutex<Vec<RenderFrame>>>) {
    let bus = Arc::new(RenderBus::new());
    let frames = Arc::new(Mutex::new(Vec::new()));
    {
        let frames = Arc::clone(&frames);
        bus.subscribe(move |frame: &RenderFrame| frames.lock().unwrap().push(frame.clone()));
    }
    (Coordinator::open(MemoryStorage::new(), bus), frames)
}

fn dune_draft() -> BookDraft {
    BookDraft::new("Dune", "Frank Herbert", 1965)
}

#[test]
fn valid_add_is_applied_and_rendered() {
    let (mut coordinator, frames) = tracked_coordinator();

    let outcome = coordinator.dispatch(Intent::AddBook(dune_draft())).unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied);
    assert_eq!(coordinator.shelf().len(), 1);

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].view.incomplete.books.len(), 1);
}

#[test]
fn blank_fields_are_rejected_before_the_store_is_touched() {
    let (mut coordinator, frames) = tracked_coordinator();

    let outcome = coordinator
        .dispatch(Intent::AddBook(BookDraft::new("   ", "Frank Herbert", 1965)))
        .unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Rejected(BookValidationError::EmptyTitle)
    );

    assert!(coordinator.shelf().is_empty());
    assert_eq!(frames.lock().unwrap().len(), 1);
}

#[test]
fn end_to_end_reading_journey() {
    let (mut coordinator, frames) = tracked_coordinator();

    {
        let frames = frames.lock().unwrap();
        let start = frames.last().unwrap();
        assert_eq!(start.view.incomplete.empty_state, Some(EmptyState::NoBooks));
        assert_eq!(start.view.complete.empty_state, Some(EmptyState::NoBooks));
    }

    coordinator.dispatch(Intent::AddBook(dune_draft())).unwrap();
    let id = coordinator.shelf().books()[0].id;
    {
        let frames = frames.lock().unwrap();
        let view = &frames.last().unwrap().view;
        assert_eq!(view.incomplete.books.len(), 1);
        assert!(view.complete.books.is_empty());
        assert_eq!(view.complete.empty_state, Some(EmptyState::EmptyShelf));
    }

    coordinator.dispatch(Intent::ToggleComplete(id)).unwrap();
    {
        let frames = frames.lock().unwrap();
        let view = &frames.last().unwrap().view;
        assert!(view.incomplete.books.is_empty());
        assert_eq!(view.complete.books.len(), 1);
        assert_eq!(view.incomplete.empty_state, Some(EmptyState::EmptyShelf));
    }

    coordinator
        .dispatch(Intent::SearchQueryChanged("dun".to_string()))
        .unwrap();
    {
        let frames = frames.lock().unwrap();
        let view = &frames.last().unwrap().view;
        assert_eq!(view.complete.books.len(), 1);
        assert_eq!(view.complete.books[0].title, "Dune");
        assert_eq!(view.incomplete.empty_state, Some(EmptyState::NoMatches));
    }

    coordinator
        .dispatch(Intent::SearchQueryChanged("xyz".to_string()))
        .unwrap();
    {
        let frames = frames.lock().unwrap();
        let view = &frames.last().unwrap().view;
        assert!(view.complete.books.is_empty());
        assert_eq!(view.incomplete.empty_state, Some(EmptyState::NoMatches));
        assert_eq!(view.complete.empty_state, Some(EmptyState::NoMatches));
    }
}

#[test]
fn toggling_a_missing_id_is_silently_ignored() {
    let (mut coordinator, frames) = tracked_coordinator();

    let outcome = coordinator.dispatch(Intent::ToggleComplete(404)).unwrap();
    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert_eq!(frames.lock().unwrap().len(), 1);
}

#[test]
fn edits_are_gated_then_applied() {
    let (mut coordinator, _frames) = tracked_coordinator();
    coordinator.dispatch(Intent::AddBook(dune_draft())).unwrap();
    let id = coordinator.shelf().books()[0].id;

    let empty = coordinator
        .dispatch(Intent::EditBook {
            id,
            patch: BookPatch::default(),
        })
        .unwrap();
    assert_eq!(empty, DispatchOutcome::Ignored);

    let blank = coordinator
        .dispatch(Intent::EditBook {
            id,
            patch: BookPatch {
                author: Some("   ".to_string()),
                ..BookPatch::default()
            },
        })
        .unwrap();
    assert_eq!(
        blank,
        DispatchOutcome::Rejected(BookValidationError::EmptyAuthor)
    );

    let applied = coordinator
        .dispatch(Intent::EditBook {
            id,
            patch: BookPatch {
                title: Some("Dune Messiah".to_string()),
                year: Some(1969),
                ..BookPatch::default()
            },
        })
        .unwrap();
    assert_eq!(applied, DispatchOutcome::Applied);

    let book = coordinator.shelf().find_by_id(id).unwrap();
    assert_eq!(book.title, "Dune Messiah");
    assert_eq!(book.year, 1969);
    assert_eq!(book.author, "Frank Herbert");

    let missing = coordinator
        .dispatch(Intent::EditBook {
            id: 404,
            patch: BookPatch {
                title: Some("Ghost".to_string()),
                ..BookPatch::default()
            },
        })
        .unwrap();
    assert_eq!(missing, DispatchOutcome::Ignored);
}

#[test]
fn deletes_require_confirmation_and_are_terminal() {
    let (mut coordinator, _frames) = tracked_coordinator();
    coordinator.dispatch(Intent::AddBook(dune_draft())).unwrap();
    let id = coordinator.shelf().books()[0].id;

    let unconfirmed = coordinator
        .dispatch(Intent::DeleteBook {
            id,
            confirmed: false,
        })
        .unwrap();
    assert_eq!(unconfirmed, DispatchOutcome::Ignored);
    assert_eq!(coordinator.shelf().len(), 1);

    let confirmed = coordinator
        .dispatch(Intent::DeleteBook {
            id,
            confirmed: true,
        })
        .unwrap();
    assert_eq!(confirmed, DispatchOutcome::Applied);
    assert!(coordinator.shelf().is_empty());

    let again = coordinator
        .dispatch(Intent::DeleteBook {
            id,
            confirmed: true,
        })
        .unwrap();
    assert_eq!(again, DispatchOutcome::Ignored);
}

#[test]
fn a_foreign_slot_key_does_not_reload_anything() {
    let (mut coordinator, frames) = tracked_coordinator();
    coordinator.dispatch(Intent::AddBook(dune_draft())).unwrap();

    let outcome = coordinator
        .dispatch(Intent::ExternalStorageChanged {
            slot_key: "SOME_OTHER_APPS".to_string(),
        })
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert_eq!(coordinator.shelf().len(), 1);
    assert_eq!(frames.lock().unwrap().len(), 2);
}

#[test]
fn search_state_lives_on_the_shelf() {
    let (mut coordinator, _frames) = tracked_coordinator();

    coordinator
        .dispatch(Intent::SearchQueryChanged("BUKU".to_string()))
        .unwrap();
    assert_eq!(coordinator.shelf().search_query(), "BUKU");

    coordinator
        .dispatch(Intent::SearchQueryChanged(String::new()))
        .unwrap();
    assert_eq!(coordinator.shelf().search_query(), "");
}

use bookshelf_core::{
    Book, FileStorage, MemoryStorage, ShelfStorage, SqliteStorage, DEFAULT_SLOT_KEY,
};

fn sample_collection() -> Vec<Book> {
    vec![
        Book {
            id: 1_722_000_000_001,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            is_complete: false,
        },
        Book {
            id: 1_722_000_000_002,
            title: "Solaris".to_string(),
            author: "Stanislaw Lem".to_string(),
            year: 1961,
            is_complete: true,
        },
        Book {
            id: 1_722_000_000_003,
            title: "Buku Pertama".to_string(),
            author: "Andi".to_string(),
            year: 2019,
            is_complete: false,
        },
    ]
}

fn assert_round_trips(storage: &mut impl ShelfStorage) {
    let collection = sample_collection();
    storage.save(&collection).expect("save should succeed");
    assert_eq!(storage.load(), collection);
}

#[test]
fn memory_slot_round_trips() {
    assert_round_trips(&mut MemoryStorage::new());
}

#[test]
fn file_slot_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::open(dir.path()).unwrap();
    assert_round_trips(&mut storage);
}

#[test]
fn sqlite_slot_round_trips() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    assert_round_trips(&mut storage);
}

#[test]
fn file_slot_is_named_after_the_slot_key() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    assert_eq!(
        storage.path().file_name().unwrap().to_str().unwrap(),
        "BOOKSHELF_APPS.json"
    );
    assert_eq!(storage.slot_key(), DEFAULT_SLOT_KEY);
}

#[test]
fn slot_payload_carries_the_wire_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::open(dir.path()).unwrap();
    storage.save(&sample_collection()).unwrap();

    let payload = std::fs::read_to_string(storage.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&payload).unwrap();

    assert!(json.is_array());
    assert_eq!(json[0]["title"], "Dune");
    assert_eq!(json[0]["isComplete"], false);
    assert!(json[0].get("is_complete").is_none());
}

#[test]
fn payloads_written_by_other_apps_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    let payload = serde_json::json!([
        {
            "isComplete": true,
            "author": "Frank Herbert",
            "id": 1700000000000_i64,
            "year": 1965,
            "title": "Dune"
        }
    ]);
    let slot_path = dir.path().join("BOOKSHELF_APPS.json");
    std::fs::write(&slot_path, payload.to_string()).unwrap();

    let mut storage = FileStorage::open(dir.path()).unwrap();
    let books = storage.load();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
    assert!(books[0].is_complete);
}

#[test]
fn empty_collections_round_trip_as_an_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::open(dir.path()).unwrap();
    storage.save(&[]).unwrap();

    let payload = std::fs::read_to_string(storage.path()).unwrap();
    assert_eq!(payload, "[]");
    assert!(storage.load().is_empty());
}

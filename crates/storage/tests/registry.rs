#![forbid(unsafe_code)]

use gs_core::ids::SheetId;
use gs_storage::{
    INDEX_KEY, KeyValueStore, MemoryStore, SEQUENCE_KEY, SheetRegistry, SqliteKvStore,
};

fn sheet_id(value: u64) -> SheetId {
    SheetId::try_new(value).expect("sheet id")
}

#[test]
fn create_id_starts_at_one() {
    let mut store = MemoryStore::new();
    let id = SheetRegistry::new(&mut store).create_id().expect("create id");
    assert_eq!(id, sheet_id(1));
    assert_eq!(store.get(SEQUENCE_KEY).expect("get").as_deref(), Some("1"));
}

#[test]
fn create_id_continues_from_stored_sequence() {
    let mut store = MemoryStore::new();
    store.set(SEQUENCE_KEY, "1").expect("set");
    let id = SheetRegistry::new(&mut store).create_id().expect("create id");
    assert_eq!(id, sheet_id(2));
}

#[test]
fn create_id_counts_up_and_persists_the_last_value() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteKvStore::open(dir.path()).expect("open store");
    let mut registry = SheetRegistry::new(&mut store);
    let ids = (0..25)
        .map(|_| registry.create_id().expect("create id").get())
        .collect::<Vec<_>>();
    assert_eq!(ids, (1..=25).collect::<Vec<_>>());
    assert_eq!(store.get(SEQUENCE_KEY).expect("get").as_deref(), Some("25"));
}

#[test]
fn index_reads_stored_ids() {
    let mut store = MemoryStore::new();
    store.set(INDEX_KEY, "[1,2]").expect("set");
    let registry = SheetRegistry::new(&mut store);
    assert_eq!(
        registry.index().expect("index"),
        vec![sheet_id(1), sheet_id(2)]
    );
    assert!(registry.contains(sheet_id(2)).expect("contains"));
}

#[test]
fn index_is_empty_when_absent() {
    let mut store = MemoryStore::new();
    assert!(SheetRegistry::new(&mut store).index().expect("index").is_empty());
}

#[test]
fn adding_twice_keeps_one_entry() {
    let mut store = MemoryStore::new();
    let mut registry = SheetRegistry::new(&mut store);
    assert!(registry.add_to_index(sheet_id(3)).expect("add"));
    assert!(!registry.add_to_index(sheet_id(3)).expect("add again"));
    assert!(registry.add_to_index(sheet_id(1)).expect("add"));
    assert_eq!(store.get(INDEX_KEY).expect("get").as_deref(), Some("[3,1]"));
}

#[test]
fn removing_keeps_the_order_of_the_rest() {
    let mut store = MemoryStore::new();
    store.set(INDEX_KEY, "[1,2,3]").expect("set");
    let mut registry = SheetRegistry::new(&mut store);
    assert!(registry.remove_from_index(sheet_id(2)).expect("remove"));
    assert!(!registry.remove_from_index(sheet_id(2)).expect("remove again"));
    assert_eq!(store.get(INDEX_KEY).expect("get").as_deref(), Some("[1,3]"));
}

#![forbid(unsafe_code)]

use gs_core::ids::SheetId;
use gs_core::{Calendar, ProgressLedger, SheetFields};
use gs_storage::{
    INDEX_KEY, KeyValueStore, MemoryStore, NamespacedStore, SheetRecord, Sheets, SqliteKvStore,
    StoreError, sheet_key,
};
use proptest::prelude::*;
use serde_json::{Value, json};
use time::macros::{datetime, offset};

fn sheet_id(value: u64) -> SheetId {
    SheetId::try_new(value).expect("sheet id")
}

fn sample_fields() -> SheetFields {
    SheetFields {
        title: Some("title for sheet1".to_string()),
        start_date: Some(datetime!(2014-03-02 0:00 UTC)),
        goal_date: Some(datetime!(2014-06-10 0:00 UTC)),
        done: Some(42.5),
        ..SheetFields::default()
    }
}

#[test]
fn save_writes_one_record_and_indexes_the_sheet() {
    let mut store = MemoryStore::new();
    let ledger = ProgressLedger::with_fields(sheet_id(1), Calendar::UTC, sample_fields());
    Sheets::new(&mut store, Calendar::UTC)
        .save(&ledger)
        .expect("save");

    let stored = store
        .get_json::<Value>("sheet[1]")
        .expect("get")
        .expect("record present");
    assert_eq!(
        stored,
        json!({
            "title": "title for sheet1",
            "startDate": 1393718400000i64,
            "goalDate": 1402358400000i64,
            "done": 42.5,
            "delay": 0.0,
            "yet": 957.5,
            "total": 1000.0,
            "hoursPerDay": 10.0,
        })
    );
    assert_eq!(store.get(INDEX_KEY).expect("index").as_deref(), Some("[1]"));
}

#[test]
fn saving_an_indexed_sheet_leaves_the_index_alone() {
    let mut store = MemoryStore::new();
    store.set(INDEX_KEY, "[1]").expect("set");
    let ledger = ProgressLedger::new(sheet_id(1), Calendar::UTC);
    let mut sheets = Sheets::new(&mut store, Calendar::UTC);
    sheets.save(&ledger).expect("save");
    sheets.save(&ledger).expect("save again");
    assert_eq!(store.get(INDEX_KEY).expect("index").as_deref(), Some("[1]"));
}

#[test]
fn load_reads_dates_and_title() {
    let mut store = MemoryStore::new();
    store
        .set_json(
            "sheet[1]",
            &json!({
                "title": "title for sheet1",
                "startDate": 1393718400000i64,
                "goalDate": 1393804800000i64,
            }),
        )
        .expect("set");

    let ledger = Sheets::new(&mut store, Calendar::UTC)
        .load(sheet_id(1))
        .expect("load");
    assert_eq!(ledger.title(), Some("title for sheet1"));
    assert_eq!(ledger.start_date(), Some(datetime!(2014-03-02 0:00 UTC)));
    assert_eq!(ledger.goal_date(), Some(datetime!(2014-03-03 0:00 UTC)));
    // one day for 1000 hours
    assert_eq!(ledger.hours_per_day(), 1000.0);
    assert_eq!(ledger.progress().yet, 1000.0);
}

#[test]
fn load_without_record_yields_defaults() {
    let mut store = MemoryStore::new();
    let sheets = Sheets::new(&mut store, Calendar::UTC);
    assert!(sheets.find(sheet_id(7)).expect("find").is_none());
    let ledger = sheets.load(sheet_id(7)).expect("load");
    assert_eq!(ledger, ProgressLedger::new(sheet_id(7), Calendar::UTC));
}

#[test]
fn load_repairs_records_without_delay_and_yet() {
    let mut store = MemoryStore::new();
    store
        .set("sheet[4]", r#"{"done":300,"total":500,"hoursPerDay":2}"#)
        .expect("set");
    let ledger = Sheets::new(&mut store, Calendar::UTC)
        .load(sheet_id(4))
        .expect("load");
    assert_eq!(
        (ledger.done(), ledger.delay(), ledger.yet(), ledger.total()),
        (300.0, 0.0, 200.0, 500.0)
    );
    assert_eq!(ledger.hours_per_day(), 2.0);
}

#[test]
fn load_surfaces_corrupt_records() {
    let mut store = MemoryStore::new();
    store.set("sheet[1]", "not json").expect("set");
    let err = Sheets::new(&mut store, Calendar::UTC)
        .load(sheet_id(1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Parse { ref key, .. } if key == "sheet[1]"));
}

#[test]
fn roundtrip_keeps_every_field() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteKvStore::open(dir.path()).expect("open store");
    let calendar = Calendar::new(offset!(+9));

    let mut ledger = ProgressLedger::with_fields(sheet_id(3), calendar, sample_fields());
    ledger.set_delay(12.25).expect("delay");
    ledger.set_hours_per_day(6.75).expect("pace");

    let mut sheets = Sheets::new(&mut store, calendar);
    sheets.save(&ledger).expect("save");
    let loaded = sheets.load(sheet_id(3)).expect("load");
    assert_eq!(loaded, ledger);
    assert_eq!(loaded.start_date().map(|at| at.offset()), Some(offset!(+9)));
}

#[test]
fn create_allocates_ids_in_sequence() {
    let mut store = MemoryStore::new();
    let mut sheets = Sheets::new(&mut store, Calendar::UTC);
    let first = sheets.create(SheetFields::default()).expect("create");
    let second = sheets.create(sample_fields()).expect("create");
    assert_eq!(first.sheet_id(), sheet_id(1));
    assert_eq!(second.sheet_id(), sheet_id(2));
    assert_eq!(
        sheets.index().expect("index"),
        vec![sheet_id(1), sheet_id(2)]
    );

    let all = sheets.load_all().expect("load all");
    assert_eq!(all, vec![first, second]);
}

#[test]
fn remove_drops_record_scalars_and_index_entry() {
    let mut store = MemoryStore::new();
    store.set(INDEX_KEY, "[1,2]").expect("set");
    let ledger = ProgressLedger::with_fields(
        sheet_id(1),
        Calendar::UTC,
        SheetFields {
            title: Some("title for sheet1".to_string()),
            ..SheetFields::default()
        },
    );
    Sheets::new(&mut store, Calendar::UTC)
        .save(&ledger)
        .expect("save");
    NamespacedStore::new(&mut store, sheet_id(1))
        .set("note", "keep going")
        .expect("set note");
    NamespacedStore::new(&mut store, sheet_id(2))
        .set("note", "other sheet")
        .expect("set note");
    assert!(store.has(&sheet_key(sheet_id(1))).expect("has"));

    Sheets::new(&mut store, Calendar::UTC)
        .remove(ledger.sheet_id())
        .expect("remove");

    assert_eq!(store.get("sheet[1]").expect("get"), None);
    assert_eq!(store.get("sheet[1].note").expect("get"), None);
    assert_eq!(
        store.get("sheet[2].note").expect("get").as_deref(),
        Some("other sheet")
    );
    assert_eq!(store.get(INDEX_KEY).expect("index").as_deref(), Some("[2]"));
}

proptest! {
    #[test]
    fn any_quarter_hour_ledger_survives_a_roundtrip(
        done in 0u32..4000,
        delay in 0u32..4000,
        total in 0u32..8000,
        pace in 1u32..96,
        start_day in 0i64..3000,
        span in 1i64..3000,
    ) {
        let start = datetime!(2010-01-01 0:00 UTC) + time::Duration::days(start_day);
        let goal = start + time::Duration::days(span);
        let ledger = ProgressLedger::with_fields(
            sheet_id(9),
            Calendar::UTC,
            SheetFields {
                title: None,
                start_date: Some(start),
                goal_date: Some(goal),
                done: Some(f64::from(done) / 4.0),
                delay: Some(f64::from(delay) / 4.0),
                yet: None,
                total: Some(f64::from(total) / 4.0),
                hours_per_day: Some(f64::from(pace) / 4.0),
            },
        );

        let mut store = MemoryStore::new();
        let mut sheets = Sheets::new(&mut store, Calendar::UTC);
        sheets.save(&ledger).expect("save");
        let loaded = sheets.load(sheet_id(9)).expect("load");
        prop_assert_eq!(&loaded, &ledger);
        prop_assert_eq!(
            SheetRecord::from_ledger(&loaded),
            SheetRecord::from_ledger(&ledger)
        );
    }
}

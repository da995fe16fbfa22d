//! Persisted-state behavior: save/load round trip and best-effort
//! recovery from missing or corrupt files.

use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;
use valbook_core::{DEFAULT_SHEET, RecordDraft, RecordStore};
use valbook_io::store_file::{load_store, save_store};

fn seeded_store() -> RecordStore {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let mut store = RecordStore::new();
    store
        .add(
            RecordDraft {
                hec_ref_no: "A".into(),
                client_name: "Acme".into(),
                bill_amount: 100.0,
                ..Default::default()
            }
            .build(now, None),
        )
        .unwrap();
    store.select("A").unwrap();
    store
}

#[test]
fn save_then_load_round_trips_records_and_selection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("records.json");

    let store = seeded_store();
    save_store(&path, &store).unwrap();

    let loaded = load_store(&path);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("A").unwrap().bill_amount, 100.0);
    assert_eq!(loaded.selected(), Some("A"));
    assert_eq!(loaded.active_sheet(), DEFAULT_SHEET);
}

#[test]
fn missing_file_seeds_an_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = load_store(&dir.path().join("nope.json"));
    assert!(store.is_empty());
    assert_eq!(store.sheet_names(), vec![DEFAULT_SHEET]);
}

#[test]
fn corrupt_file_seeds_an_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");
    fs::write(&path, "{not json at all").unwrap();

    let store = load_store(&path);
    assert!(store.is_empty());
}

#[test]
fn stale_selection_is_dropped_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");
    fs::write(
        &path,
        r#"{"sheets": {"Valuations": []}, "activeSheet": "Valuations", "selection": "ghost"}"#,
    )
    .unwrap();

    let store = load_store(&path);
    assert_eq!(store.selected(), None);
}

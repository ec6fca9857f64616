//! Integration tests for the settings inspector commands.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use keepsake::cli::{cmd_get, cmd_keys, cmd_remove, cmd_set};
use keepsake_core::{RedbStore, SettingsStore, Value};
use std::path::PathBuf;

fn temp_db(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("settings.db")
}

#[test]
fn test_set_writes_through_to_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    cmd_set(&db, false, "mainWindow/fontSize", "14", "int").unwrap();
    cmd_set(&db, false, "mainWindow/theme", "dark", "text").unwrap();

    let store = RedbStore::open(&db).unwrap();
    assert_eq!(store.value("mainWindow/fontSize"), Some(Value::Int(14)));
    assert_eq!(
        store.value("mainWindow/theme"),
        Some(Value::Text("dark".into()))
    );
}

#[test]
fn test_set_rejects_malformed_values() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    assert!(cmd_set(&db, false, "k", "not-a-number", "int").is_err());
    assert!(cmd_set(&db, false, "k", "x", "unknown-kind").is_err());

    let store = RedbStore::open(&db).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_remove_deletes_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    cmd_set(&db, false, "a", "1", "int").unwrap();
    cmd_set(&db, false, "b", "2", "int").unwrap();
    cmd_remove(&db, false, "a").unwrap();

    let store = RedbStore::open(&db).unwrap();
    assert!(!store.contains("a"));
    assert!(store.contains("b"));
}

#[test]
fn test_remove_of_missing_key_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    cmd_remove(&db, false, "never-set").unwrap();
}

#[test]
fn test_get_and_keys_read_back_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    cmd_set(&db, false, "mainWindow/fontSize", "14", "int").unwrap();
    cmd_set(&db, false, "prefsDialog/confirmExit", "true", "bool").unwrap();

    // Both text and JSON modes must succeed on existing and missing keys.
    cmd_get(&db, false, "mainWindow/fontSize").unwrap();
    cmd_get(&db, true, "mainWindow/fontSize").unwrap();
    cmd_get(&db, false, "missing").unwrap();
    cmd_keys(&db, false, None).unwrap();
    cmd_keys(&db, true, Some("mainWindow/")).unwrap();
}

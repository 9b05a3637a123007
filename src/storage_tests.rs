use std::fs;

use tempfile::TempDir;

use super::*;
use crate::document::{Block, BlockKind};

fn store_in(dir: &TempDir) -> DocumentStore {
    DocumentStore::new(dir.path().join("document.json"))
}

#[test]
fn test_default_location_under_dot_config() {
    let path = DocumentStore::default_location().unwrap();
    assert!(path.to_string_lossy().contains(".config/blockpad"));
    assert!(path.to_string_lossy().ends_with("document.json"));
}

#[test]
fn test_missing_file_loads_welcome_document() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.load(), Document::welcome());
    assert!(store.load_raw().unwrap().is_none());
}

#[test]
fn test_save_then_load_restores_blocks() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let doc = Document::from_blocks(vec![
        Block::with_text(1, BlockKind::Heading { level: 1 }, "Notes"),
        Block::with_text(2, BlockKind::Task { checked: true }, "done"),
    ]);

    store.save(&doc).unwrap();
    let loaded = store.load();
    assert_eq!(loaded.blocks, doc.blocks);
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&Document::empty()).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["document.json".to_string()]);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(dir.path().join("a/b/document.json"));
    store.save(&Document::empty()).unwrap();
    assert!(store.path().exists());
}

#[test]
fn test_snapshot_json_shape() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let doc = Document::from_blocks(vec![Block::with_text(1, BlockKind::Paragraph, "hi")]);
    store.save(&doc).unwrap();

    let raw = store.load_raw().unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], "1");
    assert_eq!(json["blocks"][0]["type"], "paragraph");
    assert_eq!(json["blocks"][0]["text"], "hi");
}

#[test]
fn test_corrupt_file_loads_welcome_document() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "{ not json").unwrap();

    assert!(matches!(store.load_snapshot(), Err(StorageError::Json(_))));
    assert_eq!(store.load(), Document::welcome());
}

#[test]
fn test_clear_removes_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&Document::empty()).unwrap();

    assert!(store.clear().unwrap());
    assert!(!store.path().exists());
    assert!(!store.clear().unwrap());
}

#[test]
fn test_save_into_directory_path_is_io_error() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(dir.path());
    let err = store.save(&Document::empty()).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

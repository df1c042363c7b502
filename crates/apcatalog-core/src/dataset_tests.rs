//! Tests for `dataset` module

use super::dataset::*;
use crate::error::Error;
use std::io::Write;

#[test]
fn test_from_json_str_keeps_document_order() {
    // Arrange
    let text = r#"[
        {"id": "b", "vendor": "Aruba"},
        {"id": "a", "vendor": "Cisco"}
    ]"#;

    // Act
    let store = RecordStore::from_json_str(text).unwrap();

    // Assert
    let ids: Vec<&str> = store.records().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(store.get("a").unwrap().text("vendor").as_deref(), Some("Cisco"));
}

#[test]
fn test_non_objects_are_skipped() {
    // Arrange
    let text = r#"[{"id": "a"}, 42, "x", null, {"id": "b"}]"#;

    // Act
    let store = RecordStore::from_json_str(text).unwrap();

    // Assert
    assert_eq!(store.len(), 2);
}

#[test]
fn test_missing_ids_get_positional_ids() {
    // Arrange
    let text = r#"[{"id": "a"}, {"vendor": "Ubiquiti"}]"#;

    // Act
    let store = RecordStore::from_json_str(text).unwrap();

    // Assert
    assert_eq!(store.records()[1].id(), "row-1");
    assert!(store.get("row-1").is_some());
}

#[test]
fn test_duplicate_ids_resolve_to_first() {
    // Arrange
    let text = r#"[{"id": "a", "model": "first"}, {"id": "a", "model": "second"}]"#;

    // Act
    let store = RecordStore::from_json_str(text).unwrap();

    // Assert
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("a").unwrap().text("model").as_deref(), Some("first"));
}

#[test]
fn test_non_array_document_is_rejected() {
    // Arrange & Act
    let result = RecordStore::from_json_str(r#"{"id": "a"}"#);

    // Assert
    assert!(matches!(result, Err(Error::DatasetFormat(_))));
}

#[test]
fn test_invalid_json_is_rejected() {
    assert!(matches!(
        RecordStore::from_json_str("[{"),
        Err(Error::DatasetFormat(_))
    ));
}

#[test]
fn test_load_from_file() {
    // Arrange
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"id": "ap-1", "vendor": "Cisco"}}]"#).unwrap();
    let path = file.path().to_string_lossy().to_string();

    // Act
    let store = RecordStore::load(&path).unwrap();

    // Assert
    assert_eq!(store.len(), 1);
}

#[test]
fn test_load_missing_file_fails() {
    // Arrange & Act
    let result = RecordStore::load("/definitely/not/here.json");

    // Assert
    assert!(matches!(result, Err(Error::DatasetLoad { .. })));
}

#[test]
fn test_load_url_is_unsupported() {
    // Arrange & Act
    let result = RecordStore::load("https://example.com/machines.json");

    // Assert
    assert!(matches!(result, Err(Error::DatasetLoad { ref message, .. }) if message.contains("not supported")));
}

#[test]
fn test_load_or_empty_degrades() {
    // Arrange & Act
    let store = RecordStore::load_or_empty("/definitely/not/here.json");

    // Assert
    assert!(store.is_empty());
}

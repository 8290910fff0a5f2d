#![cfg(feature = "json")]

use doccmp::{Document, IgnoreEntry, JsonParser, Key, LoadError};
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn write_doc(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loaded_documents_compare_with_ignores() {
    let left = write_doc(r#"{"id": "7f1", "meta": {"stamp": 1, "owner": "ops"}, "body": "x"}"#);
    let right = write_doc(r#"{"id": "c02", "meta": {"stamp": 2, "owner": "ops"}, "body": "x"}"#);

    let left = Document::load(left.path()).unwrap();
    let right = Document::load(right.path()).unwrap();

    assert!(!left.compare(&right, &[]));
    assert!(!left.compare(&right, &["id".into()]));
    assert!(left.compare(
        &right,
        &[
            IgnoreEntry::key("id"),
            IgnoreEntry::nested("meta", [IgnoreEntry::key("stamp")]),
        ],
    ));
}

#[test]
fn diff_names_the_divergent_fields() {
    let left = write_doc(r#"{"meta": {"stamp": 1, "owner": "ops"}}"#);
    let right = write_doc(r#"{"meta": {"stamp": 2, "owner": "dev"}}"#);
    let left = Document::load(left.path()).unwrap();
    let right = Document::load(right.path()).unwrap();

    let cmp = left.diff(&right, &[IgnoreEntry::nested("meta", [IgnoreEntry::key("stamp")])]);
    assert_eq!(cmp.diff().to_string(), "meta/owner: expected \"ops\", found \"dev\"\n");
}

#[test]
fn missing_source_is_unreadable() {
    let dir = tempdir().unwrap();
    let err = Document::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::Unreadable { .. }), "{err}");
    assert!(err.to_string().contains("absent.json is not readable"));
}

#[test]
fn zero_length_source_is_empty() {
    let file = NamedTempFile::new().unwrap();
    let err = Document::load(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }), "{err}");
}

#[test]
fn malformed_source_is_a_parse_error() {
    let file = write_doc("{\"a\": ");
    let err = Document::load_with(file.path(), &JsonParser).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "{err}");
}

#[test]
fn top_level_array_loads_as_indexed_document() {
    let file = write_doc(r#"["x", "y"]"#);
    let doc = Document::load(file.path()).unwrap();
    assert_eq!(doc.root().len(), 2);
    assert!(doc.root().contains_key(&Key::Index(1)));
}

#[test]
fn documents_are_reusable_values() {
    let file = write_doc(r#"{"a": {"b": 1}}"#);
    let doc = Document::load(file.path()).unwrap();
    let copy = Document::new(doc.clone().into_root());
    assert_eq!(doc, copy);
    assert!(doc.compare(&copy, &[]));
}

#![cfg(feature = "xml")]

use doccmp::{Document, IgnoreEntry, LoadError, XmlParser};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_xml(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".xml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const LEFT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<invoice number="2024-0117" generated="2024-05-01T10:00:00Z">
  <customer id="c-88">
    <name>Ada</name>
    <email>ada@example.org</email>
  </customer>
  <line sku="p-1"><qty>2</qty></line>
  <line sku="p-2"><qty>1</qty></line>
  <notes/>
</invoice>
"#;

const RIGHT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<invoice number="2024-0117" generated="2024-05-02T08:30:00Z">
  <customer id="c-88">
    <name>Ada</name>
    <email>ada@example.org</email>
    <phone>555-0100</phone>
  </customer>
  <line sku="p-1"><qty>2</qty></line>
  <line sku="p-2"><qty>3</qty></line>
  <notes></notes>
</invoice>
"#;

#[test]
fn xml_files_compare_with_scoped_ignores() {
    let (left, right) = (write_xml(LEFT), write_xml(RIGHT));
    let left = Document::load_xml(left.path()).unwrap();
    let right = Document::load_xml(right.path()).unwrap();

    let cmp = left.diff(&right, &[]);
    assert_eq!(
        cmp.diff().to_string(),
        concat!(
            "@attributes/generated: expected \"2024-05-01T10:00:00Z\", found \"2024-05-02T08:30:00Z\"\n",
            "line/1/qty: expected \"1\", found \"3\"\n",
        )
    );

    let ignore = [
        IgnoreEntry::nested("@attributes", [IgnoreEntry::key("generated")]),
        IgnoreEntry::nested("line", [IgnoreEntry::nested(1u64, [IgnoreEntry::key("qty")])]),
    ];
    assert!(left.compare(&right, &ignore));

    // The extra <phone> only exists on the right, so only one direction sees it.
    assert!(!right.compare(&left, &ignore));
}

#[test]
fn a_whole_subtree_can_be_left_out() {
    let (left, right) = (write_xml(LEFT), write_xml(RIGHT));
    let left = Document::load_with(left.path(), &XmlParser).unwrap();
    let right = Document::load_with(right.path(), &XmlParser).unwrap();

    assert!(left.compare(&right, &["@attributes".into(), "line".into()]));
    assert!(left.compare(&right, &[IgnoreEntry::nested("line", []), "@attributes".into()]));
}

#[test]
fn empty_xml_file_is_rejected() {
    let file = write_xml("");
    let err = Document::load_xml(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }));
}

#[test]
fn malformed_xml_reports_the_path() {
    let file = write_xml("<invoice><line></invoice>");
    let err = Document::load_xml(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

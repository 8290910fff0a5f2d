#![no_main]
use doccmp::{Document, XmlParser, compare};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary markup must either load or fail with an error.
    let Ok(doc) = Document::from_bytes("fuzz.xml", data, &XmlParser) else {
        return;
    };
    assert!(compare(doc.root(), doc.root(), &[]).is_equal());
    let _ = compare(doc.root(), &Default::default(), &[]).diff().to_string();
});

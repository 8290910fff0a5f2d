#![no_main]
use doccmp::{Document, JsonParser, compare};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split = data[0] as usize % data.len();
    let (left, right) = data[1..].split_at(split.min(data.len() - 1));

    // Loading arbitrary bytes must only ever fail with an error.
    let (Ok(left), Ok(right)) = (
        Document::from_bytes("left", left, &JsonParser),
        Document::from_bytes("right", right, &JsonParser),
    ) else {
        return;
    };

    assert!(compare(left.root(), left.root(), &[]).is_equal());
    let cmp = compare(left.root(), right.root(), &[]);
    let _ = cmp.diff().to_string();
    let _ = cmp.diff().to_json();
});

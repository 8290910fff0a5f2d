#![no_main]
use doccmp::{entries_from_json, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(literal) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    // Any literal normalizes, and the canonical form is a fixed point.
    let spec = normalize(&entries_from_json(&literal));
    assert_eq!(normalize(&spec.to_entries()), spec);
});

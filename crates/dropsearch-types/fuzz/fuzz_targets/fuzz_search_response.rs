#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Responses come from remote backends; parsing must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<dropsearch_types::SearchResponse>(s);
    }
});

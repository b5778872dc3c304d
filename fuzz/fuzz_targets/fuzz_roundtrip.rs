#![no_main]
use libfuzzer_sys::fuzz_target;
use htmlarbor::html::parse_html;
use htmlarbor::serial::serialize_html;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse -> serialize -> parse roundtrip should never panic
        let output = serialize_html(&parse_html(s));
        let _ = parse_html(&output);
    }
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use htmlarbor::{Document, LoadOptions};

fuzz_target!(|data: &[u8]| {
    // Detection, decoding and parsing should never panic on any bytes
    if let Ok(doc) = Document::load_bytes(data, &LoadOptions::default()) {
        let _ = doc.to_bytes(doc.encoding);
    }
});

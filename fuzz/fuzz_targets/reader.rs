#![no_main]

use libfuzzer_sys::fuzz_target;
use mkv_parser::{ChunkedSource, MkvElement, StreamingMkvReader};

// Fuzz target: drive the reader over arbitrary input until it is exhausted
// or fails, decoding every leaf value along the way.
//
// Catches bugs in:
// - Container closing on malformed sizes
// - Unknown-length handling
// - Value decoding of arbitrary content
fuzz_target!(|data: &[u8]| {
    let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(data));
    loop {
        match reader.might_have_next() {
            Ok(true) => {}
            Ok(false) | Err(_) => break,
        }
        match reader.next_if_available() {
            Ok(Some(MkvElement::Data(element))) => {
                let _ = element.value();
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    assert!(reader.total_bytes_read() <= data.len() as u64);
});

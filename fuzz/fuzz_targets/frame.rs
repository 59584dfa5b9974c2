#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: SimpleBlock frame header parsing.
fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = mkv_types::Frame::parse(data) {
        assert!(frame.frame_data.len() < data.len());
    }
});

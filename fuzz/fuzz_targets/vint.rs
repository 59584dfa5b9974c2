#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: id, size and header decoding.
//
// Catches bugs in:
// - Widths past the id/size limits
// - Zero first bytes
// - Truncated fields
fuzz_target!(|data: &[u8]| {
    let _ = mkv_wire::vint::decode_id(data);
    let _ = mkv_wire::vint::decode_size(data);
    if let Ok(Some((header, used))) = mkv_wire::ElementHeader::read_from(data) {
        assert!(used <= mkv_wire::MAX_HEADER_LEN);
        assert!(used <= data.len());
        let _ = header.size.known();
    }
});

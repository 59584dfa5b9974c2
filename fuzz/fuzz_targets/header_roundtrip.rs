#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mkv_wire::{ElementHeader, ElementSize};

#[derive(Debug, Arbitrary)]
struct Input {
    id: u32,
    size: Option<u64>,
    size_width: Option<u8>,
}

// Fuzz target: any header that encodes must decode to the same id and size.
fuzz_target!(|input: Input| {
    let mut header = match input.size {
        Some(size) => ElementHeader::new(input.id, size),
        None => ElementHeader::unknown(input.id),
    };
    if let Some(width) = input.size_width {
        header = header.with_size_width(usize::from(width % 9));
    }

    let mut out = Vec::new();
    let Ok(written) = header.write_to(&mut out) else {
        return;
    };
    let (decoded, used) = ElementHeader::read_from(&out)
        .expect("encoded header decodes")
        .expect("encoded header is complete");
    assert_eq!(used, written);
    assert_eq!(decoded.id, input.id);
    match input.size {
        Some(size) => assert_eq!(decoded.size, ElementSize::Known(size)),
        None => assert!(decoded.size.is_unknown()),
    }
});

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mkv_parser::{ChunkedSource, MkvElement, ParseError, StreamingMkvReader};

#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    chunks: Vec<u8>,
}

fn describe(element: &MkvElement<'_>) -> String {
    match element {
        MkvElement::Start(start) => format!("+{} {}", start.metadata, start.declared_size),
        MkvElement::End(end) => format!("-{}", end.metadata),
        MkvElement::Data(data) => format!("{} {:?}", data.metadata, data.content()),
    }
}

fn run(data: &[u8], chunks: &[u8]) -> (Vec<String>, Option<String>) {
    let mut reader = StreamingMkvReader::new(ChunkedSource::new());
    let mut out = Vec::new();
    let mut sizes = chunks
        .iter()
        .map(|&n| usize::from(n))
        .filter(|&n| n > 0)
        .cycle();
    let mut rest = data;

    let result: Result<(), ParseError> = (|| {
        while !rest.is_empty() {
            let n = sizes.next().unwrap_or(rest.len()).min(rest.len());
            let (chunk, tail) = rest.split_at(n);
            reader.source_mut().push(chunk);
            rest = tail;
            while let Some(element) = reader.next_if_available()? {
                out.push(describe(&element));
            }
        }
        reader.source_mut().finish();
        while reader.might_have_next()? {
            if let Some(element) = reader.next_if_available()? {
                out.push(describe(&element));
            }
        }
        Ok(())
    })();

    (out, result.err().map(|e| e.to_string()))
}

// Fuzz target: splitting the input differently must not change the
// elements or the error.
fuzz_target!(|input: Input| {
    let whole = run(&input.data, &[]);
    let split = run(&input.data, &input.chunks);
    assert_eq!(whole, split);
});

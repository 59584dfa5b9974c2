//! Fixture builders and drivers shared by the integration tests, the
//! benches and the fuzz seeds.
//!
//! Streams are synthesized with the `mkv-wire` encoder from a small element
//! tree ([`Node`]) instead of shipping binary files, so every fixture is
//! readable next to the test that uses it.

use std::fmt;

use mkv_parser::{
    ChunkedSource, ElementSize, MkvElement, ParseError, ReaderConfig, StreamingMkvReader,
};
use mkv_types::matroska::{
    CLUSTER, CODEC_ID, DOC_TYPE, DOC_TYPE_READ_VERSION, DOC_TYPE_VERSION, EBML,
    EBML_MAX_ID_LENGTH, EBML_MAX_SIZE_LENGTH, EBML_READ_VERSION, EBML_VERSION, INFO, MUXING_APP,
    PIXEL_HEIGHT, PIXEL_WIDTH, SEGMENT, SIMPLE_BLOCK, TIMECODE, TIMECODE_SCALE, TRACK_ENTRY,
    TRACK_NUMBER, TRACK_TYPE, TRACKS, VIDEO,
};
use mkv_wire::ElementHeader;
use mkv_wire::header::write_element;

// ── Element tree ──────────────────────────────────────────────────────────────

/// A fixture element.
#[derive(Clone, Debug)]
pub enum Node {
    Master {
        id: u32,
        unknown_length: bool,
        children: Vec<Node>,
    },
    Leaf {
        id: u32,
        content: Vec<u8>,
    },
}

/// Master with its size written out.
pub fn master(id: u32, children: Vec<Node>) -> Node {
    Node::Master {
        id,
        unknown_length: false,
        children,
    }
}

/// Master with the unknown-length sentinel, as live muxers write it.
pub fn live_master(id: u32, children: Vec<Node>) -> Node {
    Node::Master {
        id,
        unknown_length: true,
        children,
    }
}

pub fn leaf(id: u32, content: impl Into<Vec<u8>>) -> Node {
    Node::Leaf {
        id,
        content: content.into(),
    }
}

/// Unsigned integer leaf in the fewest bytes (at least one).
pub fn uint(id: u32, value: u64) -> Node {
    let bytes = value.to_be_bytes();
    let skip = (value.leading_zeros() / 8).min(7) as usize;
    leaf(id, &bytes[skip..])
}

pub fn text(id: u32, value: &str) -> Node {
    leaf(id, value.as_bytes())
}

/// SimpleBlock for a track number below 127 (one-byte VINT).
pub fn simple_block(track: u8, timecode: i16, flags: u8, payload: &[u8]) -> Node {
    assert!(track < 0x7F, "fixture track numbers are single-byte VINTs");
    let mut content = vec![0x80 | track];
    content.extend_from_slice(&timecode.to_be_bytes());
    content.push(flags);
    content.extend_from_slice(payload);
    leaf(SIMPLE_BLOCK, content)
}

impl Node {
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Leaf { id, content } => {
                write_element(*id, content, out).expect("fixture leaf encodes");
            }
            Self::Master {
                id,
                unknown_length: true,
                children,
            } => {
                ElementHeader::unknown(*id)
                    .write_to(out)
                    .expect("fixture header encodes");
                for child in children {
                    child.write(out);
                }
            }
            Self::Master {
                id,
                unknown_length: false,
                children,
            } => {
                write_element(*id, &encode(children), out).expect("fixture master encodes");
            }
        }
    }
}

/// Encode a sequence of top-level nodes.
pub fn encode(nodes: &[Node]) -> Vec<u8> {
    let mut out = Vec::new();
    for node in nodes {
        node.write(&mut out);
    }
    out
}

// ── Canned streams ────────────────────────────────────────────────────────────

/// EBML header declaring a WebM document.
pub fn webm_header() -> Node {
    master(
        EBML,
        vec![
            uint(EBML_VERSION, 1),
            uint(EBML_READ_VERSION, 1),
            uint(EBML_MAX_ID_LENGTH, 4),
            uint(EBML_MAX_SIZE_LENGTH, 8),
            text(DOC_TYPE, "webm"),
            uint(DOC_TYPE_VERSION, 4),
            uint(DOC_TYPE_READ_VERSION, 2),
        ],
    )
}

/// Deterministic frame payload.
pub fn payload(seed: usize, len: usize) -> Vec<u8> {
    (0..len).map(|i| (seed * 31 + i * 7) as u8).collect()
}

/// A live-style WebM stream: unknown-length Segment and Clusters, one
/// video track, `clusters × frames` SimpleBlocks of `frame_len` bytes.
pub fn live_webm(clusters: usize, frames: usize, frame_len: usize) -> Vec<u8> {
    let mut segment = vec![
        master(
            INFO,
            vec![uint(TIMECODE_SCALE, 1_000_000), text(MUXING_APP, "mkv-tests")],
        ),
        master(
            TRACKS,
            vec![master(
                TRACK_ENTRY,
                vec![
                    uint(TRACK_NUMBER, 1),
                    uint(TRACK_TYPE, 1),
                    text(CODEC_ID, "V_VP8"),
                    master(VIDEO, vec![uint(PIXEL_WIDTH, 320), uint(PIXEL_HEIGHT, 240)]),
                ],
            )],
        ),
    ];

    for c in 0..clusters {
        let mut cluster = vec![uint(TIMECODE, (c * 1000) as u64)];
        for f in 0..frames {
            let flags = if f == 0 { 0x80 } else { 0x00 };
            let timecode = i16::try_from(f * 33).unwrap_or(i16::MAX);
            cluster.push(simple_block(1, timecode, flags, &payload(c * frames + f, frame_len)));
        }
        segment.push(live_master(CLUSTER, cluster));
    }

    encode(&[webm_header(), live_master(SEGMENT, segment)])
}

// ── Drivers ───────────────────────────────────────────────────────────────────

/// An owned snapshot of one reader element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start {
        name: &'static str,
        count: u64,
        size: ElementSize,
        header: Vec<u8>,
        depth: usize,
    },
    Data {
        name: &'static str,
        count: u64,
        header: Vec<u8>,
        content: Vec<u8>,
        depth: usize,
    },
    End {
        name: &'static str,
        count: u64,
        depth: usize,
    },
}

impl Event {
    pub fn from_element(element: &MkvElement<'_>) -> Self {
        let metadata = element.metadata();
        let depth = element.path().map_or(0, <[_]>::len);
        match element {
            MkvElement::Start(start) => Self::Start {
                name: metadata.name(),
                count: metadata.element_count,
                size: start.declared_size,
                header: start.header.clone(),
                depth,
            },
            MkvElement::Data(data) => Self::Data {
                name: metadata.name(),
                count: metadata.element_count,
                header: data.header.clone(),
                content: data.to_owned_content(),
                depth,
            },
            MkvElement::End(_) => Self::End {
                name: metadata.name(),
                count: metadata.element_count,
                depth,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { name, .. } | Self::Data { name, .. } | Self::End { name, .. } => *name,
        }
    }

    /// The bytes this event stands for in the input.
    pub fn raw(&self) -> Vec<u8> {
        match self {
            Self::Start { header, .. } => header.clone(),
            Self::Data {
                header, content, ..
            } => [header.as_slice(), content.as_slice()].concat(),
            Self::End { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start {
                name, count, size, ..
            } => write!(f, "start {name}#{count} size={size}"),
            Self::Data {
                name,
                count,
                content,
                ..
            } => write!(f, "data {name}#{count} {}", hex::encode(content)),
            Self::End { name, count, .. } => write!(f, "end {name}#{count}"),
        }
    }
}

/// Feed `bytes` in pieces of the given sizes (cycled; zeros ignored),
/// pulling everything available after each piece, then finish the source
/// and drain.
///
/// # Errors
///
/// The first [`ParseError`] from the reader.
pub fn events_chunked(
    bytes: &[u8],
    chunk_sizes: &[usize],
    config: ReaderConfig,
) -> Result<Vec<Event>, ParseError> {
    let mut reader = StreamingMkvReader::with_config(ChunkedSource::new(), config);
    let mut events = Vec::new();
    let mut sizes = chunk_sizes.iter().copied().filter(|&n| n > 0).cycle();
    let mut rest = bytes;

    while !rest.is_empty() {
        let n = sizes.next().unwrap_or(rest.len()).min(rest.len());
        let (chunk, tail) = rest.split_at(n);
        reader.source_mut().push(chunk);
        rest = tail;
        while let Some(element) = reader.next_if_available()? {
            events.push(Event::from_element(&element));
        }
    }

    reader.source_mut().finish();
    while reader.might_have_next()? {
        if let Some(element) = reader.next_if_available()? {
            events.push(Event::from_element(&element));
        }
    }
    Ok(events)
}

/// All events of `bytes` fed in one piece.
///
/// # Errors
///
/// The first [`ParseError`] from the reader.
pub fn events(bytes: &[u8], config: ReaderConfig) -> Result<Vec<Event>, ParseError> {
    events_chunked(bytes, &[bytes.len()], config)
}

/// Concatenate the raw bytes of `events`.
pub fn reconstruct(events: &[Event]) -> Vec<u8> {
    events.iter().flat_map(Event::raw).collect()
}

/// Indented one-line-per-element rendering with decoded values.
///
/// # Errors
///
/// The first [`ParseError`] from the reader.
pub fn trace(bytes: &[u8]) -> Result<String, ParseError> {
    let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(bytes));
    let mut lines = Vec::new();

    while reader.might_have_next()? {
        let Some(element) = reader.next_if_available()? else {
            continue;
        };
        let indent = "  ".repeat(element.path().map_or(0, <[_]>::len));
        let metadata = element.metadata();
        let line = match &element {
            MkvElement::Start(start) => format!(
                "{indent}+ {} #{} size={}",
                metadata.name(),
                metadata.element_count,
                start.declared_size
            ),
            MkvElement::End(_) => {
                format!("{indent}- {} #{}", metadata.name(), metadata.element_count)
            }
            MkvElement::Data(data) => match data.value() {
                Ok(value) => format!("{indent}{} = {value}", metadata.name()),
                Err(e) => format!("{indent}{} ! {e}", metadata.name()),
            },
        };
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_is_minimal() {
        let Node::Leaf { content, .. } = uint(TIMECODE, 0) else {
            panic!("leaf expected");
        };
        assert_eq!(content, [0]);

        let Node::Leaf { content, .. } = uint(TIMECODE_SCALE, 1_000_000) else {
            panic!("leaf expected");
        };
        assert_eq!(content, [0x0F, 0x42, 0x40]);
    }

    #[test]
    fn live_master_uses_sentinel() {
        let bytes = encode(&[live_master(SEGMENT, vec![])]);
        assert_eq!(bytes, [0x18, 0x53, 0x80, 0x67, 0xFF]);
    }
}

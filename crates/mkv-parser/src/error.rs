use mkv_wire::WireError;

/// Errors that stop the tokenizer.
///
/// All of these are fatal: the stream cannot be resynchronised after
/// them, and the reader that returned one should be discarded rather than
/// fed more bytes. Running out of input is not an error; it starts the
/// close sequence instead.
///
/// ```text
///   ParseError
///   ├── Header                  ← id wider than 4 / size wider than 8 bytes
///   ├── UnknownLengthLeaf       ← non-master declared with unknown length
///   ├── UnknownLengthUnresolved ← unknown id with unknown length (unskippable)
///   ├── InvalidState            ← tokenizer invariant violated
///   └── Io(std::io::Error)      ← from the byte source
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The id or size VINT of the element starting at `offset` is malformed.
    #[error("malformed element header at offset {offset}: {source}")]
    Header {
        offset: u64,
        #[source]
        source: WireError,
    },

    /// A leaf element declared the unknown-length sentinel. Only masters
    /// can be closed structurally.
    #[error("{name} ({id:#X}) at offset {offset} is not a master but has unknown length")]
    UnknownLengthLeaf {
        id: u32,
        name: &'static str,
        offset: u64,
    },

    /// An id missing from the registry declared unknown length, so there is
    /// no way to find where it ends.
    #[error("unknown element {id:#X} at offset {offset} has unknown length and cannot be skipped")]
    UnknownLengthUnresolved { id: u32, offset: u64 },

    /// The tokenizer reached a state its invariants rule out.
    #[error("tokenizer invariant violated at offset {offset}: {detail}")]
    InvalidState { detail: &'static str, offset: u64 },

    /// An I/O error from the byte source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error from [`StreamingMkvReader::apply`](crate::StreamingMkvReader::apply).
///
/// A visitor failure leaves the reader intact: the element that failed has
/// been consumed, and `apply` can be called again to continue.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError<E> {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("visitor failed: {0}")]
    Visitor(E),
}

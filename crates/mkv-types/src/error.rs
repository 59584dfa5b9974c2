use mkv_wire::WireError;

/// Errors raised by the schema registry and by typed value decoding.
///
/// These sit above [`WireError`]: the bytes of an element were framed
/// correctly, but the schema table is inconsistent or the content does not
/// match the element's declared kind.
///
/// ```text
/// ┌─────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                              │
/// │   ├── DuplicateId         registry construction     │
/// │   ├── NotALeaf            value of a master element │
/// │   ├── IntegerTooWide      int/uint/date > 8 bytes   │
/// │   ├── InvalidFloatWidth   float not 4 or 8 bytes    │
/// │   ├── InvalidUtf8         UTF-8 element content     │
/// │   ├── UnsignedOverflow    strict unsigned policy    │
/// │   ├── DateOutOfRange      date beyond chrono range  │
/// │   ├── TruncatedFrame      SimpleBlock header cut    │
/// │   ├── InvalidTrackNumber  reserved track VINT       │
/// │   └── wraps WireError     VINT inside a frame       │
/// └─────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// Two registry entries share an element id.
    #[error("duplicate element id {id:#X}: {first} and {second}")]
    DuplicateId {
        id: u32,
        first: &'static str,
        second: &'static str,
    },

    /// A value was requested for a master (container) element.
    #[error("{name} is a master element and has no value")]
    NotALeaf { name: &'static str },

    /// A signed, unsigned or date element has more than 8 content bytes.
    #[error("{name}: integer content is {len} bytes, maximum is 8")]
    IntegerTooWide { name: &'static str, len: usize },

    /// Float content must be exactly 4 or 8 bytes.
    #[error("{name}: float content is {len} bytes, expected 4 or 8")]
    InvalidFloatWidth { name: &'static str, len: usize },

    /// A UTF-8 element contained invalid UTF-8.
    #[error("invalid UTF-8 in {name}")]
    InvalidUtf8 { name: &'static str },

    /// An 8-byte unsigned integer with its top bit set, rejected under
    /// [`UnsignedPolicy::Strict`](crate::UnsignedPolicy::Strict).
    #[error("{name}: unsigned value {value:#018X} has its sign bit set")]
    UnsignedOverflow { name: &'static str, value: u64 },

    /// A date offset that cannot be represented.
    #[error("{name}: date offset {nanos}ns is out of range")]
    DateOutOfRange { name: &'static str, nanos: i64 },

    /// A SimpleBlock payload ended inside its frame header.
    #[error("frame header truncated: {len} bytes available")]
    TruncatedFrame { len: usize },

    /// A SimpleBlock track number used the reserved all-ones pattern.
    #[error("frame track number uses the reserved unknown pattern")]
    InvalidTrackNumber,

    #[error(transparent)]
    Wire(#[from] WireError),
}

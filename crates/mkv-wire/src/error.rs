/// Errors raised while decoding or encoding EBML variable-length integers
/// and element headers.
///
/// Every decode-side variant is a fatal format error: a stream that
/// produces one cannot be resynchronised, because the width of the field
/// is what tells the reader where the next field begins.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The first byte of an element id announced more than 4 bytes.
    ///
    /// A first byte of `0x00` has no marker bit at all and is reported
    /// with `width = 9`.
    #[error("element id is {width} bytes wide, maximum is 4")]
    IdTooWide { width: usize },

    /// The first byte of a size field announced more than 8 bytes.
    #[error("size field is {width} bytes wide, maximum is 8")]
    SizeTooWide { width: usize },

    /// An id passed to the encoder does not carry a valid VINT marker.
    #[error("{id:#X} is not a valid element id")]
    InvalidId { id: u32 },

    /// A size does not fit the requested field width.
    ///
    /// The all-ones pattern of each width is reserved for "unknown
    /// length", so the largest encodable size of width `w` is
    /// `2^(7w) - 2`.
    #[error("size {value} does not fit in a {width}-byte field")]
    SizeOutOfRange { value: u64, width: usize },

    /// A forced field width outside `1..=8` was requested.
    #[error("invalid size field width {width}")]
    InvalidWidth { width: usize },

    /// I/O error while writing an encoded header.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// NOTE
// The decode variants carry the width rather than an offset: the codec is
// a pure function over a slice and has no idea where that slice sits in
// the stream. The tokenizer in mkv-parser wraps these with the absolute
// offset of the element header that failed.

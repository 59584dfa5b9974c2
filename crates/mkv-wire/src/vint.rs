use crate::error::WireError;

/// Widest legal element id, in bytes.
pub const MAX_ID_WIDTH: usize = 4;

/// Widest legal size field, in bytes.
pub const MAX_SIZE_WIDTH: usize = 8;

/// Largest size that any field width can carry without colliding with the
/// unknown-length sentinel: `2^56 - 2`.
pub const MAX_KNOWN_SIZE: u64 = (1 << 56) - 2;

/// Declared length of an element.
///
/// The size field pattern where every data bit is one (for any width)
/// means the element's end has to be found structurally instead of by
/// counting bytes.
///
/// ```text
/// ┌───────┬─────────────────────────┬─────────────────┐
/// │ Width │ Unknown-length pattern  │ Largest known   │
/// ├───────┼─────────────────────────┼─────────────────┤
/// │ 1     │ 0xFF                    │ 126             │
/// │ 2     │ 0x7F 0xFF               │ 16382           │
/// │ 4     │ 0x1F 0xFF 0xFF 0xFF     │ 2^28 - 2        │
/// │ 8     │ 0x01 0xFF .. 0xFF       │ 2^56 - 2        │
/// └───────┴─────────────────────────┴─────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementSize {
    Known(u64),
    Unknown,
}

impl ElementSize {
    /// The declared byte count, or `None` for unknown length.
    #[must_use]
    pub fn known(self) -> Option<u64> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for ElementSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Total width in bytes of a VINT whose first byte is `first`.
///
/// The width is one more than the number of leading zero bits, so a first
/// byte of `0x00` yields 9, which is wider than any legal field.
#[must_use]
pub fn vint_width(first: u8) -> usize {
    first.leading_zeros() as usize + 1
}

/// Mask selecting the data bits of the first byte of a `width`-byte VINT.
fn first_byte_mask(width: usize) -> u8 {
    // width 8 leaves no data bits in the first byte; shift in u16 to avoid
    // overflowing the u8 shift.
    (0xFF_u16 >> width) as u8
}

fn unknown_pattern(width: usize) -> u64 {
    (1_u64 << (7 * width)) - 1
}

/// Decode an element id from the front of `buf`.
///
/// The marker bit is kept in the returned value, so EBML's header id
/// `1A 45 DF A3` decodes to `0x1A45_DFA3`.
///
/// # Returns
///
/// - `Ok(Some((id, width)))` when the whole id is present;
/// - `Ok(None)` when `buf` holds fewer bytes than the id needs. Nothing is
///   consumed, so the call can simply be repeated once more bytes arrived.
///
/// # Errors
///
/// [`WireError::IdTooWide`] if the first byte announces more than
/// [`MAX_ID_WIDTH`] bytes.
pub fn decode_id(buf: &[u8]) -> Result<Option<(u32, usize)>, WireError> {
    let Some(&first) = buf.first() else {
        return Ok(None);
    };

    let width = vint_width(first);
    if width > MAX_ID_WIDTH {
        return Err(WireError::IdTooWide { width });
    }
    if buf.len() < width {
        return Ok(None);
    }

    let id = buf[..width]
        .iter()
        .fold(0_u32, |acc, &b| (acc << 8) | u32::from(b));
    Ok(Some((id, width)))
}

/// Decode a size (or unsigned VINT) from the front of `buf`.
///
/// The marker bit is stripped. A field whose data bits are all one
/// decodes to [`ElementSize::Unknown`].
///
/// # Returns
///
/// Same contract as [`decode_id`]: `Ok(None)` means "need more bytes".
///
/// # Errors
///
/// [`WireError::SizeTooWide`] if the first byte announces more than
/// [`MAX_SIZE_WIDTH`] bytes (only possible for a first byte of `0x00`).
pub fn decode_size(buf: &[u8]) -> Result<Option<(ElementSize, usize)>, WireError> {
    let Some(&first) = buf.first() else {
        return Ok(None);
    };

    let width = vint_width(first);
    if width > MAX_SIZE_WIDTH {
        return Err(WireError::SizeTooWide { width });
    }
    if buf.len() < width {
        return Ok(None);
    }

    let head = u64::from(first & first_byte_mask(width));
    let value = buf[1..width]
        .iter()
        .fold(head, |acc, &b| (acc << 8) | u64::from(b));

    let size = if value == unknown_pattern(width) {
        ElementSize::Unknown
    } else {
        ElementSize::Known(value)
    };
    Ok(Some((size, width)))
}

/// Minimal field width able to carry `value` as a known size.
///
/// # Errors
///
/// [`WireError::SizeOutOfRange`] if `value` exceeds [`MAX_KNOWN_SIZE`].
pub fn size_width(value: u64) -> Result<usize, WireError> {
    (1..=MAX_SIZE_WIDTH)
        .find(|&w| value < unknown_pattern(w))
        .ok_or(WireError::SizeOutOfRange {
            value,
            width: MAX_SIZE_WIDTH,
        })
}

/// Encode `value` as a size field of minimal width.
///
/// # Returns
///
/// The number of bytes written (1–8).
///
/// # Errors
///
/// [`WireError::SizeOutOfRange`] if `value` exceeds [`MAX_KNOWN_SIZE`].
///
/// # Panics
///
/// Panics if `buf` is shorter than the encoding. An 8-byte buffer is
/// always sufficient.
pub fn encode_size(value: u64, buf: &mut [u8]) -> Result<usize, WireError> {
    let width = size_width(value)?;
    encode_size_with_width(value, width, buf)
}

/// Encode `value` as a size field of exactly `width` bytes.
///
/// Muxers commonly write fixed 8-byte sizes so they can patch them later;
/// this lets fixtures reproduce that layout.
///
/// # Errors
///
/// - [`WireError::InvalidWidth`] if `width` is not in `1..=8`.
/// - [`WireError::SizeOutOfRange`] if `value` does not fit `width`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `width`.
pub fn encode_size_with_width(value: u64, width: usize, buf: &mut [u8]) -> Result<usize, WireError> {
    if !(1..=MAX_SIZE_WIDTH).contains(&width) {
        return Err(WireError::InvalidWidth { width });
    }
    if value >= unknown_pattern(width) {
        return Err(WireError::SizeOutOfRange { value, width });
    }

    let marked = value | (1_u64 << (7 * width));
    write_be(marked, width, buf);
    Ok(width)
}

/// Encode the unknown-length sentinel with the given field width.
///
/// # Errors
///
/// [`WireError::InvalidWidth`] if `width` is not in `1..=8`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `width`.
pub fn encode_unknown_size(width: usize, buf: &mut [u8]) -> Result<usize, WireError> {
    if !(1..=MAX_SIZE_WIDTH).contains(&width) {
        return Err(WireError::InvalidWidth { width });
    }
    let marked = unknown_pattern(width) | (1_u64 << (7 * width));
    write_be(marked, width, buf);
    Ok(width)
}

/// Encode an element id. The id already contains its marker bit, so this
/// only validates it and writes the significant bytes big-endian.
///
/// # Errors
///
/// [`WireError::InvalidId`] if the id's leading byte does not announce
/// exactly the number of significant bytes the id has.
///
/// # Panics
///
/// Panics if `buf` is shorter than the id's width. A 4-byte buffer is
/// always sufficient.
pub fn encode_id(id: u32, buf: &mut [u8]) -> Result<usize, WireError> {
    if id == 0 {
        return Err(WireError::InvalidId { id });
    }

    let width = (32 - id.leading_zeros() as usize).div_ceil(8);
    let first = (id >> (8 * (width - 1))) as u8;
    if vint_width(first) != width {
        return Err(WireError::InvalidId { id });
    }

    write_be(u64::from(id), width, buf);
    Ok(width)
}

fn write_be(value: u64, width: usize, buf: &mut [u8]) {
    let bytes = value.to_be_bytes();
    buf[..width].copy_from_slice(&bytes[8 - width..]);
}

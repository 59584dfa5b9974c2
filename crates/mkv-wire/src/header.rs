use crate::error::WireError;
use crate::vint::{
    decode_id, decode_size, encode_id, encode_size, encode_size_with_width, encode_unknown_size,
    ElementSize, MAX_ID_WIDTH, MAX_SIZE_WIDTH,
};

/// Longest possible element header: a 4-byte id plus an 8-byte size.
pub const MAX_HEADER_LEN: usize = MAX_ID_WIDTH + MAX_SIZE_WIDTH;

/// Element header: the id + size pair in front of every EBML element.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ id    (VINT, 1-4 bytes, marker bit kept)         │
/// │ size  (VINT, 1-8 bytes, marker bit stripped)     │
/// │ content [size bytes, or until a structural end]  │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// `size_width` is kept so a header can be written back with the same
/// layout it was read with (muxers often pad sizes to 8 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementHeader {
    pub id: u32,
    pub size: ElementSize,
    /// Width of the size field. `None` means "minimal" when writing.
    pub size_width: Option<usize>,
}

impl ElementHeader {
    /// Header with a known size, written with a minimal size field.
    #[must_use]
    pub fn new(id: u32, size: u64) -> Self {
        Self {
            id,
            size: ElementSize::Known(size),
            size_width: None,
        }
    }

    /// Header with the unknown-length sentinel (1-byte field unless a
    /// width is forced with [`with_size_width`](Self::with_size_width)).
    #[must_use]
    pub fn unknown(id: u32) -> Self {
        Self {
            id,
            size: ElementSize::Unknown,
            size_width: None,
        }
    }

    /// Force the width of the size field.
    #[must_use]
    pub fn with_size_width(mut self, width: usize) -> Self {
        self.size_width = Some(width);
        self
    }

    /// Encode this header into `buf`.
    ///
    /// # Returns
    ///
    /// The number of bytes written (2–12).
    ///
    /// # Errors
    ///
    /// Any encoding error from the id or size field.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than the encoding. A buffer of
    /// [`MAX_HEADER_LEN`] bytes is always sufficient.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let id_len = encode_id(self.id, buf)?;
        let rest = &mut buf[id_len..];
        let size_len = match (self.size, self.size_width) {
            (ElementSize::Known(n), None) => encode_size(n, rest)?,
            (ElementSize::Known(n), Some(w)) => encode_size_with_width(n, w, rest)?,
            (ElementSize::Unknown, w) => encode_unknown_size(w.unwrap_or(1), rest)?,
        };
        Ok(id_len + size_len)
    }

    /// Write this header to the provided writer.
    ///
    /// # Errors
    ///
    /// Encoding errors, or [`WireError::Io`] from the writer.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        let mut buf = [0u8; MAX_HEADER_LEN];
        let n = self.encode(&mut buf)?;
        w.write_all(&buf[..n])?;
        Ok(n)
    }

    /// Decode a header from the front of `buf`.
    ///
    /// Returns `Ok(None)` if `buf` ends before the header is complete.
    ///
    /// # Errors
    ///
    /// [`WireError::IdTooWide`] or [`WireError::SizeTooWide`].
    pub fn read_from(buf: &[u8]) -> Result<Option<(Self, usize)>, WireError> {
        let Some((id, id_len)) = decode_id(buf)? else {
            return Ok(None);
        };
        let Some((size, size_len)) = decode_size(&buf[id_len..])? else {
            return Ok(None);
        };
        let header = Self {
            id,
            size,
            size_width: Some(size_len),
        };
        Ok(Some((header, id_len + size_len)))
    }
}

/// Append a complete element (header followed by `content`) to `out`.
///
/// Convenience for building streams in tests, benches and fuzz seeds.
///
/// # Errors
///
/// Encoding errors for the id or the content length.
pub fn write_element(id: u32, content: &[u8], out: &mut Vec<u8>) -> Result<usize, WireError> {
    let n = ElementHeader::new(id, content.len() as u64).write_to(out)?;
    out.extend_from_slice(content);
    Ok(n + content.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_ebml_header_with_zero_size() {
        let mut out = Vec::new();
        ElementHeader::new(0x1A45_DFA3, 0).write_to(&mut out).unwrap();
        assert_eq!(out, [0x1A, 0x45, 0xDF, 0xA3, 0x80]);
    }

    #[test]
    fn encode_unknown_segment() {
        let mut out = Vec::new();
        ElementHeader::unknown(0x1853_8067)
            .with_size_width(8)
            .write_to(&mut out)
            .unwrap();
        assert_eq!(
            out,
            [0x18, 0x53, 0x80, 0x67, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(out.len(), MAX_HEADER_LEN);
    }

    #[test]
    fn read_back_preserves_width() {
        let header = ElementHeader::new(0x4286, 1).with_size_width(4);
        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();

        let (parsed, consumed) = ElementHeader::read_from(&out).unwrap().unwrap();
        assert_eq!(parsed, header);
        assert_eq!(consumed, 6);
    }

    #[test]
    fn read_incomplete_header() {
        assert!(ElementHeader::read_from(&[0x1A, 0x45, 0xDF, 0xA3]).unwrap().is_none());
        assert!(ElementHeader::read_from(&[0x42, 0x86, 0x40]).unwrap().is_none());
    }

    #[test]
    fn write_element_appends_content() {
        let mut out = Vec::new();
        let n = write_element(0x4286, &[0x01], &mut out).unwrap();
        assert_eq!(n, 4);
        assert_eq!(out, [0x42, 0x86, 0x81, 0x01]);
    }
}

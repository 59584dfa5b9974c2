use std::borrow::Cow;

use mkv_wire::vint::decode_size;
use mkv_wire::ElementSize;

use crate::error::TypeError;

/// Lacing mode of a SimpleBlock (flags bits 1-2).
///
/// ```text
/// ┌──────┬───────────┐
/// │ Bits │ Mode      │
/// ├──────┼───────────┤
/// │ 00   │ None      │
/// │ 01   │ Xiph      │
/// │ 10   │ FixedSize │
/// │ 11   │ Ebml      │
/// └──────┴───────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lacing {
    None,
    Xiph,
    Ebml,
    FixedSize,
}

impl Lacing {
    /// Bits 1-2 in Matroska order: 00 none, 01 Xiph, 10 fixed-size,
    /// 11 EBML. Fixed-size is 10, not 11.
    fn from_flags(flags: u8) -> Self {
        match (flags >> 1) & 0b11 {
            0b00 => Self::None,
            0b01 => Self::Xiph,
            0b10 => Self::FixedSize,
            _ => Self::Ebml,
        }
    }
}

/// Decoded SimpleBlock payload: one media sample and its header.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ track number  (VINT, marker stripped)            │
/// │ timecode      (i16 BE, relative to the Cluster)  │
/// │ flags         (u8)                               │
/// │   bit 7 key frame   bit 3 invisible              │
/// │   bits 1-2 lacing   bit 0 discardable            │
/// │ frame data    [rest of the element]              │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// `frame_data` borrows from the element content when parsed with
/// [`Frame::parse`]. Call [`Frame::into_owned`] to keep a frame past the
/// next pull from the reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    pub track_number: u64,
    pub time_code: i16,
    pub key_frame: bool,
    pub invisible: bool,
    pub discardable: bool,
    pub lacing: Lacing,
    pub frame_data: Cow<'a, [u8]>,
}

impl<'a> Frame<'a> {
    /// Parse a SimpleBlock payload without copying the frame data.
    ///
    /// # Errors
    ///
    /// - [`TypeError::TruncatedFrame`] if the payload ends inside the
    ///   track number, timecode or flags.
    /// - [`TypeError::InvalidTrackNumber`] for the reserved all-ones VINT.
    /// - [`TypeError::Wire`] for a malformed track number VINT.
    pub fn parse(payload: &'a [u8]) -> Result<Self, TypeError> {
        let truncated = TypeError::TruncatedFrame { len: payload.len() };

        let Some((track, n)) = decode_size(payload)? else {
            return Err(truncated);
        };
        let ElementSize::Known(track_number) = track else {
            return Err(TypeError::InvalidTrackNumber);
        };

        let Some(&[tc_hi, tc_lo, flags]) = payload.get(n..n + 3) else {
            return Err(truncated);
        };

        Ok(Self {
            track_number,
            time_code: i16::from_be_bytes([tc_hi, tc_lo]),
            key_frame: flags & 0x80 != 0,
            invisible: flags & 0x08 != 0,
            discardable: flags & 0x01 != 0,
            lacing: Lacing::from_flags(flags),
            frame_data: Cow::Borrowed(&payload[n + 3..]),
        })
    }

    /// Detach the frame from the buffer it was parsed from.
    #[must_use]
    pub fn into_owned(self) -> Frame<'static> {
        Frame {
            track_number: self.track_number,
            time_code: self.time_code,
            key_frame: self.key_frame,
            invisible: self.invisible,
            discardable: self.discardable,
            lacing: self.lacing,
            frame_data: Cow::Owned(self.frame_data.into_owned()),
        }
    }
}

use chrono::{DateTime, Duration, Utc};

use crate::error::TypeError;
use crate::frame::Frame;
use crate::kind::ElementKind;
use crate::matroska::SIMPLE_BLOCK;
use crate::type_info::ElementTypeInfo;

/// Seconds from the Unix epoch to 2001-01-01T00:00:00Z, the EBML date
/// origin.
const EBML_EPOCH_UNIX_SECS: i64 = 978_307_200;

/// What to do with an 8-byte unsigned integer whose top bit is set.
///
/// Such a value reads as negative under a naive signed interpretation.
/// Real producers emit them (usually random UIDs), so by default the value
/// is kept and a warning is logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnsignedPolicy {
    /// Keep the value and log a warning.
    #[default]
    Lenient,
    /// Reject with [`TypeError::UnsignedOverflow`].
    Strict,
}

/// Typed value of a leaf element.
///
/// Produced by [`MkvValue::decode`] from an element's raw content. The
/// value owns its data, so it stays valid after the reader moves on.
#[derive(Clone, Debug, PartialEq)]
pub enum MkvValue {
    Integer(i64),
    UnsignedInteger(u64),
    Float(f64),
    String(String),
    Utf8(String),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),
    /// A SimpleBlock, decoded into its frame header and payload.
    Frame(Frame<'static>),
}

impl MkvValue {
    /// Interpret `content` according to `info.kind`.
    ///
    /// SimpleBlock elements are the one binary kind with an embedded
    /// sub-format; they decode to [`MkvValue::Frame`].
    ///
    /// # Errors
    ///
    /// See the variants of [`TypeError`]; [`TypeError::NotALeaf`] for
    /// masters.
    pub fn decode(
        info: &ElementTypeInfo,
        content: &[u8],
        policy: UnsignedPolicy,
    ) -> Result<Self, TypeError> {
        let name = info.name;
        match info.kind {
            ElementKind::Master => Err(TypeError::NotALeaf { name }),
            ElementKind::Integer => Ok(Self::Integer(read_signed(name, content)?)),
            ElementKind::UInteger => {
                Ok(Self::UnsignedInteger(read_unsigned(name, content, policy)?))
            }
            ElementKind::Float => Ok(Self::Float(read_float(name, content)?)),
            ElementKind::String => Ok(Self::String(read_ascii(content))),
            ElementKind::Utf8 => {
                let text = std::str::from_utf8(trim_padding(content))
                    .map_err(|_| TypeError::InvalidUtf8 { name })?;
                Ok(Self::Utf8(text.to_owned()))
            }
            ElementKind::Date => Ok(Self::Date(read_date(name, content)?)),
            ElementKind::Binary if info.id == SIMPLE_BLOCK => {
                Ok(Self::Frame(Frame::parse(content)?.into_owned()))
            }
            ElementKind::Binary => Ok(Self::Binary(content.to_vec())),
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UnsignedInteger(v) => Some(*v),
            Self::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Utf8(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MkvValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::UnsignedInteger(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) | Self::Utf8(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Self::Binary(b) => write!(f, "<{} bytes>", b.len()),
            Self::Frame(fr) => write!(
                f,
                "track={} tc={} key={} lacing={:?} <{} bytes>",
                fr.track_number,
                fr.time_code,
                fr.key_frame,
                fr.lacing,
                fr.frame_data.len()
            ),
        }
    }
}

fn read_signed(name: &'static str, content: &[u8]) -> Result<i64, TypeError> {
    if content.len() > 8 {
        return Err(TypeError::IntegerTooWide { name, len: content.len() });
    }
    let fill = match content.first() {
        Some(b) if b & 0x80 != 0 => 0xFF,
        _ => 0x00,
    };
    let mut buf = [fill; 8];
    buf[8 - content.len()..].copy_from_slice(content);
    Ok(i64::from_be_bytes(buf))
}

fn read_unsigned(
    name: &'static str,
    content: &[u8],
    policy: UnsignedPolicy,
) -> Result<u64, TypeError> {
    if content.len() > 8 {
        return Err(TypeError::IntegerTooWide { name, len: content.len() });
    }
    let value = content
        .iter()
        .fold(0_u64, |acc, &b| (acc << 8) | u64::from(b));

    if value >> 63 == 1 {
        match policy {
            UnsignedPolicy::Lenient => {
                tracing::warn!(element = name, value, "unsigned integer has its sign bit set");
            }
            UnsignedPolicy::Strict => return Err(TypeError::UnsignedOverflow { name, value }),
        }
    }
    Ok(value)
}

fn read_float(name: &'static str, content: &[u8]) -> Result<f64, TypeError> {
    match content.len() {
        4 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(content);
            Ok(f64::from(f32::from_be_bytes(buf)))
        }
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(content);
            Ok(f64::from_be_bytes(buf))
        }
        len => Err(TypeError::InvalidFloatWidth { name, len }),
    }
}

fn read_date(name: &'static str, content: &[u8]) -> Result<DateTime<Utc>, TypeError> {
    let nanos = read_signed(name, content)?;
    DateTime::<Utc>::from_timestamp(EBML_EPOCH_UNIX_SECS, 0)
        .and_then(|epoch| epoch.checked_add_signed(Duration::nanoseconds(nanos)))
        .ok_or(TypeError::DateOutOfRange { name, nanos })
}

fn trim_padding(content: &[u8]) -> &[u8] {
    let end = content.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &content[..end]
}

fn read_ascii(content: &[u8]) -> String {
    trim_padding(content)
        .iter()
        .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::matroska;

    fn decode(id: u32, content: &[u8]) -> Result<MkvValue, TypeError> {
        let registry = TypeRegistry::matroska();
        let info = registry.get(id).unwrap();
        MkvValue::decode(info, content, UnsignedPolicy::default())
    }

    #[test]
    fn unsigned_of_various_widths() {
        assert_eq!(decode(matroska::EBML_VERSION, &[]).unwrap(), MkvValue::UnsignedInteger(0));
        assert_eq!(decode(matroska::EBML_VERSION, &[0x01]).unwrap(), MkvValue::UnsignedInteger(1));
        assert_eq!(
            decode(matroska::TIMECODE_SCALE, &[0x0F, 0x42, 0x40]).unwrap(),
            MkvValue::UnsignedInteger(1_000_000)
        );
        assert_eq!(
            decode(matroska::EBML_VERSION, &[0x01, 0x04, 0x0D]).unwrap(),
            MkvValue::UnsignedInteger(0x01_040D)
        );
    }

    #[test]
    fn unsigned_with_sign_bit_is_lenient_by_default() {
        let content = [0xFF; 8];
        assert_eq!(
            decode(matroska::TRACK_UID, &content).unwrap(),
            MkvValue::UnsignedInteger(u64::MAX)
        );
    }

    #[test]
    fn unsigned_with_sign_bit_rejected_when_strict() {
        let registry = TypeRegistry::matroska();
        let info = registry.get(matroska::TRACK_UID).unwrap();
        let err = MkvValue::decode(info, &[0x80, 0, 0, 0, 0, 0, 0, 1], UnsignedPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, TypeError::UnsignedOverflow { name: "TrackUID", .. }));

        // one byte with the high bit set is an ordinary value
        assert_eq!(
            MkvValue::decode(info, &[0x80], UnsignedPolicy::Strict).unwrap(),
            MkvValue::UnsignedInteger(128)
        );
    }

    #[test]
    fn signed_values_sign_extend() {
        assert_eq!(decode(matroska::REFERENCE_BLOCK, &[0xFF]).unwrap(), MkvValue::Integer(-1));
        assert_eq!(
            decode(matroska::REFERENCE_BLOCK, &[0xFF, 0x38]).unwrap(),
            MkvValue::Integer(-200)
        );
        assert_eq!(decode(matroska::REFERENCE_BLOCK, &[0x7F]).unwrap(), MkvValue::Integer(127));
        assert_eq!(decode(matroska::REFERENCE_BLOCK, &[]).unwrap(), MkvValue::Integer(0));
    }

    #[test]
    fn integers_wider_than_eight_bytes_rejected() {
        assert!(matches!(
            decode(matroska::REFERENCE_BLOCK, &[0; 9]),
            Err(TypeError::IntegerTooWide { len: 9, .. })
        ));
    }

    #[test]
    fn floats() {
        assert_eq!(
            decode(matroska::DURATION, &1.5_f32.to_be_bytes()).unwrap(),
            MkvValue::Float(1.5)
        );
        assert_eq!(
            decode(matroska::DURATION, &2.25_f64.to_be_bytes()).unwrap(),
            MkvValue::Float(2.25)
        );
        assert!(matches!(
            decode(matroska::DURATION, &[0; 2]),
            Err(TypeError::InvalidFloatWidth { len: 2, .. })
        ));
    }

    #[test]
    fn strings_drop_nul_padding() {
        assert_eq!(
            decode(matroska::DOC_TYPE, b"webm\0\0").unwrap(),
            MkvValue::String("webm".into())
        );
        assert_eq!(
            decode(matroska::TITLE, "caf\u{e9}".as_bytes()).unwrap(),
            MkvValue::Utf8("caf\u{e9}".into())
        );
        assert!(matches!(
            decode(matroska::TITLE, &[0xC3, 0x28]),
            Err(TypeError::InvalidUtf8 { name: "Title" })
        ));
    }

    #[test]
    fn dates_count_from_2001() {
        let epoch = decode(matroska::DATE_UTC, &[0; 8]).unwrap();
        let MkvValue::Date(d) = epoch else {
            panic!("expected a date, got {epoch:?}");
        };
        assert_eq!(d.to_rfc3339(), "2001-01-01T00:00:00+00:00");

        let one_second = 1_000_000_000_i64.to_be_bytes();
        let MkvValue::Date(d) = decode(matroska::DATE_UTC, &one_second).unwrap() else {
            panic!("expected a date");
        };
        assert_eq!(d.timestamp(), EBML_EPOCH_UNIX_SECS + 1);
    }

    #[test]
    fn simple_block_decodes_to_frame() {
        let value = decode(matroska::SIMPLE_BLOCK, &[0x81, 0x00, 0x05, 0x80, 0xAA]).unwrap();
        let MkvValue::Frame(frame) = value else {
            panic!("expected a frame, got {value:?}");
        };
        assert_eq!(frame.track_number, 1);
        assert_eq!(frame.time_code, 5);
        assert!(frame.key_frame);
        assert_eq!(&*frame.frame_data, &[0xAA]);
    }

    #[test]
    fn other_binaries_are_copied() {
        assert_eq!(
            decode(matroska::SEGMENT_UID, &[1, 2, 3]).unwrap(),
            MkvValue::Binary(vec![1, 2, 3])
        );
    }

    #[test]
    fn masters_have_no_value() {
        assert!(matches!(
            decode(matroska::SEGMENT, &[]),
            Err(TypeError::NotALeaf { name: "Segment" })
        ));
    }
}

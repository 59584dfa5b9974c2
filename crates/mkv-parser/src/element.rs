use std::io::{self, Write};

use mkv_types::matroska::SIMPLE_BLOCK;
use mkv_types::{Frame, MkvValue, TypeError, UnsignedPolicy};
use mkv_wire::ElementSize;

use crate::metadata::ElementMetadata;
use crate::visitor::MkvElementVisitor;

/// Start of a master element. Children follow until the matching
/// [`EndContainer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartContainer {
    pub metadata: ElementMetadata,
    /// Ancestors, outermost first. `None` when path capture is disabled.
    pub path: Option<Vec<ElementMetadata>>,
    pub declared_size: ElementSize,
    /// Raw id and size bytes exactly as read.
    pub header: Vec<u8>,
}

/// End of a master element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndContainer {
    pub metadata: ElementMetadata,
    pub path: Option<Vec<ElementMetadata>>,
}

/// A complete leaf element.
///
/// The content is borrowed from the reader's buffer and stays valid until
/// the next call on the reader. Use [`value`](Self::value) or
/// [`to_owned_content`](Self::to_owned_content) to keep it longer.
#[derive(Clone, Debug)]
pub struct DataElement<'a> {
    pub metadata: ElementMetadata,
    pub path: Option<Vec<ElementMetadata>>,
    pub declared_size: u64,
    pub header: Vec<u8>,
    content: &'a [u8],
    policy: UnsignedPolicy,
}

impl<'a> DataElement<'a> {
    pub(crate) fn new(
        metadata: ElementMetadata,
        path: Option<Vec<ElementMetadata>>,
        declared_size: u64,
        header: Vec<u8>,
        content: &'a [u8],
        policy: UnsignedPolicy,
    ) -> Self {
        Self {
            metadata,
            path,
            declared_size,
            header,
            content,
            policy,
        }
    }

    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    pub fn to_owned_content(&self) -> Vec<u8> {
        self.content.to_vec()
    }

    /// True if the input ended before the declared size was read.
    pub fn is_truncated(&self) -> bool {
        (self.content.len() as u64) < self.declared_size
    }

    /// Decode the content according to the element's kind.
    ///
    /// # Errors
    ///
    /// Any [`TypeError`] from [`MkvValue::decode`].
    pub fn value(&self) -> Result<MkvValue, TypeError> {
        MkvValue::decode(&self.metadata.type_info, self.content, self.policy)
    }

    /// Zero-copy frame view for SimpleBlock elements, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Any [`TypeError`] from [`Frame::parse`].
    pub fn frame(&self) -> Result<Option<Frame<'a>>, TypeError> {
        if self.metadata.id() != SIMPLE_BLOCK {
            return Ok(None);
        }
        Frame::parse(self.content).map(Some)
    }

    /// Write header and content, reproducing the input bytes.
    ///
    /// # Errors
    ///
    /// Any I/O error from `w`.
    pub fn write_raw(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.header)?;
        w.write_all(self.content)
    }
}

/// One element event pulled from a
/// [`StreamingMkvReader`](crate::StreamingMkvReader).
///
/// ```text
///   Start(Segment)
///     Start(Cluster)
///       Data(Timecode)
///       Data(SimpleBlock)
///     End(Cluster)
///   End(Segment)
/// ```
#[derive(Clone, Debug)]
pub enum MkvElement<'a> {
    Start(StartContainer),
    End(EndContainer),
    Data(DataElement<'a>),
}

impl MkvElement<'_> {
    pub fn metadata(&self) -> &ElementMetadata {
        match self {
            Self::Start(e) => &e.metadata,
            Self::End(e) => &e.metadata,
            Self::Data(e) => &e.metadata,
        }
    }

    pub fn path(&self) -> Option<&[ElementMetadata]> {
        match self {
            Self::Start(e) => e.path.as_deref(),
            Self::End(e) => e.path.as_deref(),
            Self::Data(e) => e.path.as_deref(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.metadata().name()
    }

    /// Write the bytes this event stands for in the input.
    ///
    /// Start writes the header, data writes header and content, end writes
    /// nothing. Writing every event of a stream in order reproduces the
    /// known elements of the input byte for byte.
    ///
    /// # Errors
    ///
    /// Any I/O error from `w`.
    pub fn write_raw(&self, w: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Start(e) => w.write_all(&e.header),
            Self::End(_) => Ok(()),
            Self::Data(e) => e.write_raw(w),
        }
    }

    /// Dispatch to the matching visitor method.
    ///
    /// # Errors
    ///
    /// Whatever the visitor returns.
    pub fn accept<V>(&self, visitor: &mut V) -> Result<(), V::Error>
    where
        V: MkvElementVisitor + ?Sized,
    {
        match self {
            Self::Start(e) => visitor.visit_start(e),
            Self::End(e) => visitor.visit_end(e),
            Self::Data(e) => visitor.visit_data(e),
        }
    }
}

use std::mem;

use mkv_types::{ElementTypeInfo, TypeRegistry};
use mkv_wire::vint::{decode_id, decode_size, vint_width};
use mkv_wire::{ElementSize, WireError};
use tracing::{debug, trace};

use crate::config::TokenizerOptions;
use crate::error::ParseError;
use crate::metadata::{ElementMetadata, ElementPath};
use crate::replay::ReplayBuffer;
use crate::source::ByteSource;

/// Receives the structural events of an EBML stream.
///
/// Events arrive in document order. For every element that gets a start
/// event, exactly one end event follows once its content is done, its
/// parent is closed, or the stream is closed. Unknown ids produce no
/// events at all.
///
/// `header` and `chunk` borrow tokenizer buffers and are only valid for
/// the duration of the call.
pub trait TokenizerCallback {
    fn on_start_element(
        &mut self,
        metadata: &ElementMetadata,
        declared_size: ElementSize,
        header: &[u8],
        path: ElementPath<'_>,
    );

    /// A slice of a leaf element's content. Called zero or more times
    /// between start and end; the chunks concatenate to the content.
    fn on_partial_content(&mut self, metadata: &ElementMetadata, chunk: &[u8]);

    fn on_end_element(&mut self, metadata: &ElementMetadata, path: ElementPath<'_>);

    /// Polled before every step. Returning `false` makes
    /// [`EbmlTokenizer::parse`] return early with its state intact.
    fn continue_parsing(&self) -> bool {
        true
    }
}

/// Lifecycle of the element under the read head.
///
/// ```text
///   New ──id──▶ IdDone ──size──▶ SizeDone ─┬─ known ──▶ ContentReading ──▶ Finished
///                                          │                (masters move to the stack)
///                                          └─ unknown id ─▶ ContentSkipping ──▶ Finished
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ElementState {
    #[default]
    New,
    IdDone,
    SizeDone,
    ContentReading,
    ContentSkipping,
    Finished,
}

#[derive(Clone, Debug)]
pub(crate) struct ParserElement {
    starting_offset: u64,
    element_count: Option<u64>,
    id: u32,
    id_len: usize,
    size: ElementSize,
    size_len: usize,
    state: ElementState,
    type_info: Option<ElementTypeInfo>,
}

impl Default for ParserElement {
    fn default() -> Self {
        Self {
            starting_offset: 0,
            element_count: None,
            id: 0,
            id_len: 0,
            size: ElementSize::Known(0),
            size_len: 0,
            state: ElementState::New,
            type_info: None,
        }
    }
}

impl ParserElement {
    fn starting_at(offset: u64) -> Self {
        Self {
            starting_offset: offset,
            ..Self::default()
        }
    }

    /// Known elements only; skipped ids have no metadata.
    pub(crate) fn metadata(&self) -> Option<ElementMetadata> {
        Some(ElementMetadata {
            type_info: self.type_info?,
            element_count: self.element_count?,
        })
    }

    fn content_start(&self) -> u64 {
        self.starting_offset + (self.id_len + self.size_len) as u64
    }

    fn end_offset(&self) -> Option<u64> {
        self.size.known().map(|size| self.content_start() + size)
    }
}

/// Incremental EBML tokenizer.
///
/// Turns bytes from a [`ByteSource`] into start / content / end events on a
/// [`TokenizerCallback`]. All parse state lives in this struct, so
/// [`parse`](Self::parse) can return whenever the source runs dry and pick
/// up exactly where it stopped on the next call, regardless of how the
/// input was chunked.
///
/// Open masters are kept on a stack. They are closed by three rules:
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────────────┐
/// │ Rule       │ Trigger                                              │
/// ├────────────┼──────────────────────────────────────────────────────┤
/// │ Size       │ bytes read reached the end of a known-size container │
/// │            │ (it and everything above it close, innermost first)  │
/// │ Level      │ a known non-global element starts whose level is ≤   │
/// │            │ the level of the innermost open container, and that  │
/// │            │ container has no known size covering the element     │
/// │ Close      │ close() at end of input: everything still open       │
/// └────────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// The level rule is what terminates unknown-length masters such as a live
/// `Segment` or `Cluster`. Size and level closing pop one container per
/// step, so a pausing callback sees at most one end per step; only
/// [`close`](Self::close) reports several ends in one call.
pub struct EbmlTokenizer {
    registry: TypeRegistry,
    options: TokenizerOptions,
    current: ParserElement,
    stack: Vec<ParserElement>,
    replay: ReplayBuffer,
    scratch: Vec<u8>,
    total_bytes_read: u64,
    element_count: u64,
    closed: bool,
}

impl EbmlTokenizer {
    pub fn new(registry: TypeRegistry, options: TokenizerOptions) -> Self {
        Self {
            registry,
            options,
            current: ParserElement::default(),
            stack: Vec::new(),
            replay: ReplayBuffer::new(),
            scratch: Vec::new(),
            total_bytes_read: 0,
            element_count: 0,
            closed: false,
        }
    }

    /// Consume as much of `source` as possible, reporting to `callback`.
    ///
    /// Returns when the source has too few bytes for the next step, or when
    /// `callback.continue_parsing()` turns false. Running out of bytes is
    /// never an error here; see [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Any [`ParseError`]. The tokenizer must not be used after an error.
    pub fn parse<S, C>(&mut self, source: &mut S, callback: &mut C) -> Result<(), ParseError>
    where
        S: ByteSource + ?Sized,
        C: TokenizerCallback + ?Sized,
    {
        if self.closed {
            return Ok(());
        }

        while callback.continue_parsing() {
            let progressed = match self.current.state {
                ElementState::New => self.read_id(source, callback)?,
                ElementState::IdDone => self.read_size(source)?,
                ElementState::SizeDone => {
                    self.resolve(callback)?;
                    true
                }
                ElementState::ContentReading | ElementState::ContentSkipping => {
                    self.read_content(source, callback)?
                }
                ElementState::Finished => {
                    self.finish_element(callback);
                    true
                }
            };
            if !progressed {
                break;
            }
        }
        Ok(())
    }

    /// End of input: close whatever is open, innermost first.
    ///
    /// A leaf whose content was cut short still gets its end event. A header
    /// cut short is dropped. Calling this twice is a no-op.
    pub fn close<C>(&mut self, callback: &mut C)
    where
        C: TokenizerCallback + ?Sized,
    {
        if self.closed {
            return;
        }
        self.closed = true;

        let current = mem::take(&mut self.current);
        match current.state {
            ElementState::ContentReading | ElementState::Finished => {
                if let Some(metadata) = current.metadata() {
                    let total = self.total_bytes_read;
                    if let Some(end) = current.end_offset().filter(|&end| end > total) {
                        debug!(
                            element = %metadata,
                            missing = end - total,
                            "input ended inside element content"
                        );
                    }
                    trace!(element = %metadata, "end");
                    callback.on_end_element(&metadata, ElementPath::new(&self.stack));
                }
            }
            _ if !self.replay.is_empty() => {
                debug!(
                    offset = current.starting_offset,
                    buffered = self.replay.len(),
                    "input ended inside element header"
                );
            }
            _ => {}
        }

        if !self.stack.is_empty() {
            debug!(
                open = self.stack.len(),
                offset = self.total_bytes_read,
                "closing open containers at end of input"
            );
        }
        while !self.stack.is_empty() {
            self.pop_container(callback);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes pulled from the source so far.
    pub fn total_bytes_read(&self) -> u64 {
        self.total_bytes_read
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    // ── Header ─────────────────────────────────────────────────────────

    fn read_id<S, C>(&mut self, source: &mut S, callback: &mut C) -> Result<bool, ParseError>
    where
        S: ByteSource + ?Sized,
        C: TokenizerCallback + ?Sized,
    {
        if self.replay.is_empty() {
            // Nothing of this element read yet, so it starts here.
            self.start_new_element();
            if self.close_exhausted(callback) {
                return Ok(true);
            }
        }

        let start = self.current.starting_offset;
        let decoded = self.read_vint(source, start, decode_id)?;
        if self.current.element_count.is_none() && !self.replay.is_empty() {
            self.current.element_count = Some(self.element_count);
            self.element_count += 1;
        }

        let Some((id, id_len)) = decoded else {
            return Ok(false);
        };
        self.current.id = id;
        self.current.id_len = id_len;
        self.current.state = ElementState::IdDone;
        Ok(true)
    }

    fn read_size<S>(&mut self, source: &mut S) -> Result<bool, ParseError>
    where
        S: ByteSource + ?Sized,
    {
        let start = self.current.starting_offset + self.current.id_len as u64;
        let Some((size, size_len)) = self.read_vint(source, start, decode_size)? else {
            return Ok(false);
        };
        self.current.size = size;
        self.current.size_len = size_len;
        self.current.state = ElementState::SizeDone;
        Ok(true)
    }

    /// Decode the VINT starting at absolute offset `field_start`.
    ///
    /// Bytes are pulled into the replay buffer as they become available and
    /// never twice, so a field may straddle any number of source reads.
    fn read_vint<S, T>(
        &mut self,
        source: &mut S,
        field_start: u64,
        decode: fn(&[u8]) -> Result<Option<(T, usize)>, WireError>,
    ) -> Result<Option<(T, usize)>, ParseError>
    where
        S: ByteSource + ?Sized,
    {
        let offset = self.current.starting_offset;
        let header_error = |source| ParseError::Header { offset, source };

        if !self.replay.contains(field_start) {
            if source.available()? == 0 {
                return Ok(None);
            }
            let Some(byte) = source.read_byte()? else {
                return Ok(None);
            };
            self.buffer_header_byte(byte)?;
        }

        if let Some(decoded) = decode(self.replay.slice_from(field_start)).map_err(header_error)? {
            return Ok(Some(decoded));
        }

        let buffered = self.replay.slice_from(field_start);
        let Some(&first) = buffered.first() else {
            return Err(ParseError::InvalidState {
                detail: "vint field has no buffered first byte",
                offset,
            });
        };
        let missing = vint_width(first).saturating_sub(buffered.len());
        let ready = missing.min(source.available()?);
        for _ in 0..ready {
            let Some(byte) = source.read_byte()? else {
                return Ok(None);
            };
            self.buffer_header_byte(byte)?;
        }
        if ready < missing {
            return Ok(None);
        }

        match decode(self.replay.slice_from(field_start)).map_err(header_error)? {
            Some(decoded) => Ok(Some(decoded)),
            None => Err(ParseError::InvalidState {
                detail: "vint incomplete after reading its full width",
                offset,
            }),
        }
    }

    fn buffer_header_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        if !self.replay.push(byte) {
            return Err(ParseError::InvalidState {
                detail: "element header longer than 12 bytes",
                offset: self.current.starting_offset,
            });
        }
        self.total_bytes_read += 1;
        Ok(())
    }

    // ── Structure ──────────────────────────────────────────────────────

    fn resolve<C>(&mut self, callback: &mut C) -> Result<(), ParseError>
    where
        C: TokenizerCallback + ?Sized,
    {
        let offset = self.current.starting_offset;
        let id = self.current.id;
        let size = self.current.size;

        let Some(info) = self.registry.get(id).copied() else {
            if size.is_unknown() {
                return Err(ParseError::UnknownLengthUnresolved { id, offset });
            }
            debug!(id = format!("{id:#X}"), offset, %size, "skipping unknown element");
            self.current.state = ElementState::ContentSkipping;
            return Ok(());
        };

        if size.is_unknown() && !info.is_master() {
            return Err(ParseError::UnknownLengthLeaf {
                id,
                name: info.name,
                offset,
            });
        }

        self.current.type_info = Some(info);
        if self.close_by_level(&info, callback) {
            // Still SizeDone: the start is reported once nothing else closes.
            return Ok(());
        }

        let Some(metadata) = self.current.metadata() else {
            return Err(ParseError::InvalidState {
                detail: "resolved element has no element count",
                offset,
            });
        };
        trace!(element = %metadata, offset, %size, depth = self.stack.len(), "start");
        callback.on_start_element(
            &metadata,
            size,
            self.replay.as_slice(),
            ElementPath::new(&self.stack),
        );

        self.current.state = ElementState::ContentReading;
        if info.is_master() {
            let container = mem::take(&mut self.current);
            self.stack.push(container);
            self.start_new_element();
        }
        Ok(())
    }

    fn read_content<S, C>(&mut self, source: &mut S, callback: &mut C) -> Result<bool, ParseError>
    where
        S: ByteSource + ?Sized,
        C: TokenizerCallback + ?Sized,
    {
        let Some(end) = self.current.end_offset() else {
            return Err(ParseError::InvalidState {
                detail: "content phase without a known size",
                offset: self.current.starting_offset,
            });
        };

        let remaining = end.saturating_sub(self.total_bytes_read);
        if remaining == 0 {
            self.current.state = ElementState::Finished;
            return Ok(true);
        }

        let want = usize::try_from(remaining)
            .unwrap_or(usize::MAX)
            .min(self.options.max_content_chunk)
            .min(source.available()?);
        if want == 0 {
            return Ok(false);
        }

        self.scratch.resize(want, 0);
        let n = source.read_bytes(&mut self.scratch[..want])?;
        if n == 0 {
            return Ok(false);
        }
        self.total_bytes_read += n as u64;

        if self.current.state == ElementState::ContentReading {
            if let Some(metadata) = self.current.metadata() {
                callback.on_partial_content(&metadata, &self.scratch[..n]);
            }
        }
        if self.total_bytes_read >= end {
            self.current.state = ElementState::Finished;
        }
        Ok(true)
    }

    fn finish_element<C>(&mut self, callback: &mut C)
    where
        C: TokenizerCallback + ?Sized,
    {
        if let Some(metadata) = self.current.metadata() {
            trace!(element = %metadata, "end");
            callback.on_end_element(&metadata, ElementPath::new(&self.stack));
        }
        self.start_new_element();
    }

    fn start_new_element(&mut self) {
        self.current = ParserElement::starting_at(self.total_bytes_read);
        self.replay.reset(self.total_bytes_read);
    }

    /// Size rule. Closes the innermost container at or above the outermost
    /// exhausted one; returns true if it closed anything. One container per
    /// call, so the callback can pause between ends.
    fn close_exhausted<C>(&mut self, callback: &mut C) -> bool
    where
        C: TokenizerCallback + ?Sized,
    {
        let total = self.total_bytes_read;
        if !self
            .stack
            .iter()
            .any(|c| c.end_offset().is_some_and(|end| total >= end))
        {
            return false;
        }

        debug!(offset = total, "closing exhausted container");
        self.pop_container(callback);
        true
    }

    /// Level rule. Closes the innermost container if the element about to
    /// start is its sibling or shallower; returns true if it closed one.
    ///
    /// Global elements never close anything, and neither does an element
    /// lying inside the declared range of a known-size container: that
    /// container is its ancestor whatever the levels say, which is what lets
    /// recursive masters such as `ChapterAtom` nest.
    fn close_by_level<C>(&mut self, info: &ElementTypeInfo, callback: &mut C) -> bool
    where
        C: TokenizerCallback + ?Sized,
    {
        if info.is_global() {
            return false;
        }
        let start = self.current.starting_offset;
        let Some(top) = self.stack.last() else {
            return false;
        };
        let Some(top_info) = top.type_info else {
            return false;
        };
        if top_info.level < info.level || top.end_offset().is_some_and(|end| end > start) {
            return false;
        }

        debug!(closed = top_info.name, by = info.name, "closing container by level");
        self.pop_container(callback);
        true
    }

    fn pop_container<C>(&mut self, callback: &mut C)
    where
        C: TokenizerCallback + ?Sized,
    {
        let Some(container) = self.stack.pop() else {
            return;
        };
        if let Some(metadata) = container.metadata() {
            trace!(element = %metadata, "end");
            callback.on_end_element(&metadata, ElementPath::new(&self.stack));
        }
    }
}

#[cfg(test)]
mod tests {
    use mkv_types::matroska::{
        CLUSTER, DOC_TYPE, EBML, EBML_VERSION, SEGMENT, SIMPLE_BLOCK, TIMECODE, VOID,
    };
    use mkv_wire::header::{write_element, ElementHeader};

    use super::*;
    use crate::source::ChunkedSource;

    /// Records events as compact strings.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        content: Vec<u8>,
        paused: bool,
    }

    impl TokenizerCallback for Recorder {
        fn on_start_element(
            &mut self,
            metadata: &ElementMetadata,
            declared_size: ElementSize,
            header: &[u8],
            path: ElementPath<'_>,
        ) {
            self.events.push(format!(
                "start {} size={} header={} depth={}",
                metadata.name(),
                declared_size,
                header.len(),
                path.len()
            ));
        }

        fn on_partial_content(&mut self, _metadata: &ElementMetadata, chunk: &[u8]) {
            self.content.extend_from_slice(chunk);
        }

        fn on_end_element(&mut self, metadata: &ElementMetadata, _path: ElementPath<'_>) {
            self.events.push(format!("end {}", metadata.name()));
        }

        fn continue_parsing(&self) -> bool {
            !self.paused
        }
    }

    fn element(id: u32, content: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_element(id, content, &mut out).unwrap();
        out
    }

    fn unknown_length(id: u32) -> Vec<u8> {
        let mut out = Vec::new();
        ElementHeader::unknown(id).write_to(&mut out).unwrap();
        out
    }

    fn tokenizer() -> EbmlTokenizer {
        EbmlTokenizer::new(TypeRegistry::matroska(), TokenizerOptions::default())
    }

    fn run_all(bytes: &[u8]) -> Result<Recorder, ParseError> {
        let mut tok = tokenizer();
        let mut source = ChunkedSource::from_bytes(bytes);
        let mut rec = Recorder::default();
        tok.parse(&mut source, &mut rec)?;
        tok.close(&mut rec);
        Ok(rec)
    }

    fn ebml_header() -> Vec<u8> {
        let mut body = element(EBML_VERSION, &[1]);
        body.extend(element(DOC_TYPE, b"webm"));
        element(EBML, &body)
    }

    #[test]
    fn known_size_master_closes_on_size() {
        let rec = run_all(&ebml_header()).unwrap();
        assert_eq!(
            rec.events,
            [
                "start EBML size=11 header=5 depth=0",
                "start EBMLVersion size=1 header=3 depth=1",
                "end EBMLVersion",
                "start DocType size=4 header=3 depth=1",
                "end DocType",
                "end EBML",
            ]
        );
        assert_eq!(rec.content, [1, b'w', b'e', b'b', b'm']);
    }

    #[test]
    fn byte_at_a_time_matches_single_chunk() {
        let bytes = ebml_header();
        let expected = run_all(&bytes).unwrap().events;

        let mut tok = tokenizer();
        let mut source = ChunkedSource::new();
        let mut rec = Recorder::default();
        for &b in &bytes {
            source.push(&[b]);
            tok.parse(&mut source, &mut rec).unwrap();
        }
        source.finish();
        tok.parse(&mut source, &mut rec).unwrap();
        tok.close(&mut rec);

        assert_eq!(rec.events, expected);
        assert_eq!(tok.total_bytes_read(), bytes.len() as u64);
    }

    #[test]
    fn unknown_length_masters_close_by_level() {
        let mut bytes = unknown_length(SEGMENT);
        bytes.extend(unknown_length(CLUSTER));
        bytes.extend(element(TIMECODE, &[0]));
        bytes.extend(unknown_length(CLUSTER));
        bytes.extend(element(TIMECODE, &[1]));

        let rec = run_all(&bytes).unwrap();
        assert_eq!(
            rec.events,
            [
                "start Segment size=unknown header=5 depth=0",
                "start Cluster size=unknown header=5 depth=1",
                "start Timecode size=1 header=2 depth=2",
                "end Timecode",
                "end Cluster",
                "start Cluster size=unknown header=5 depth=1",
                "start Timecode size=1 header=2 depth=2",
                "end Timecode",
                "end Cluster",
                "end Segment",
            ]
        );
    }

    #[test]
    fn global_element_does_not_close_container() {
        let mut bytes = unknown_length(SEGMENT);
        bytes.extend(unknown_length(CLUSTER));
        bytes.extend(element(VOID, &[0; 3]));
        bytes.extend(element(TIMECODE, &[0]));

        let rec = run_all(&bytes).unwrap();
        assert_eq!(
            rec.events,
            [
                "start Segment size=unknown header=5 depth=0",
                "start Cluster size=unknown header=5 depth=1",
                "start Void size=3 header=2 depth=2",
                "end Void",
                "start Timecode size=1 header=2 depth=2",
                "end Timecode",
                "end Cluster",
                "end Segment",
            ]
        );
    }

    #[test]
    fn unknown_ids_are_skipped_silently() {
        let mut bytes = element(0x4FFF, &[0xAA; 10]);
        bytes.extend(element(EBML_VERSION, &[1]));

        let rec = run_all(&bytes).unwrap();
        assert_eq!(rec.events, ["start EBMLVersion size=1 header=3 depth=0", "end EBMLVersion"]);
        assert_eq!(rec.content, [1]);
    }

    #[test]
    fn unknown_length_leaf_is_fatal() {
        let bytes = unknown_length(SIMPLE_BLOCK);
        let err = run_all(&bytes).err().unwrap();
        assert!(matches!(err, ParseError::UnknownLengthLeaf { id: SIMPLE_BLOCK, offset: 0, .. }));
    }

    #[test]
    fn unknown_length_unknown_id_is_fatal() {
        let bytes = unknown_length(0x4FFF);
        let err = run_all(&bytes).err().unwrap();
        assert!(matches!(err, ParseError::UnknownLengthUnresolved { id: 0x4FFF, offset: 0 }));
    }

    #[test]
    fn over_wide_id_is_fatal() {
        let err = run_all(&[0x08, 0, 0, 0, 0, 0x80]).err().unwrap();
        assert!(matches!(
            err,
            ParseError::Header {
                offset: 0,
                source: WireError::IdTooWide { width: 5 }
            }
        ));
    }

    #[test]
    fn truncated_leaf_still_gets_end_on_close() {
        let mut bytes = unknown_length(SEGMENT);
        let cluster = element(CLUSTER, &element(TIMECODE, &[0]));
        bytes.extend(&cluster[..cluster.len() - 1]);

        let rec = run_all(&bytes).unwrap();
        assert_eq!(
            rec.events,
            [
                "start Segment size=unknown header=5 depth=0",
                "start Cluster size=3 header=5 depth=1",
                "start Timecode size=1 header=2 depth=2",
                "end Timecode",
                "end Cluster",
                "end Segment",
            ]
        );
        assert!(rec.content.is_empty());
    }

    #[test]
    fn truncated_header_is_dropped_on_close() {
        let mut bytes = ebml_header();
        bytes.extend([0x1A, 0x45]);

        let rec = run_all(&bytes).unwrap();
        assert_eq!(rec.events.last().map(String::as_str), Some("end EBML"));
        assert_eq!(rec.events.len(), 6);
    }

    #[test]
    fn close_is_idempotent() {
        let mut tok = tokenizer();
        let mut source = ChunkedSource::from_bytes(&unknown_length(SEGMENT));
        let mut rec = Recorder::default();
        tok.parse(&mut source, &mut rec).unwrap();
        tok.close(&mut rec);
        tok.close(&mut rec);
        assert!(tok.is_closed());
        assert_eq!(rec.events, ["start Segment size=unknown header=5 depth=0", "end Segment"]);

        tok.parse(&mut source, &mut rec).unwrap();
        assert_eq!(rec.events.len(), 2);
    }

    #[test]
    fn zero_size_master_closes_immediately() {
        let mut bytes = element(EBML, &[]);
        bytes.extend(element(SEGMENT, &[]));
        let rec = run_all(&bytes).unwrap();
        assert_eq!(
            rec.events,
            [
                "start EBML size=0 header=5 depth=0",
                "end EBML",
                "start Segment size=0 header=5 depth=0",
                "end Segment",
            ]
        );
    }

    #[test]
    fn content_is_chunked() {
        #[derive(Default)]
        struct Chunks(Vec<usize>);
        impl TokenizerCallback for Chunks {
            fn on_start_element(
                &mut self,
                _: &ElementMetadata,
                _: ElementSize,
                _: &[u8],
                _: ElementPath<'_>,
            ) {
            }
            fn on_partial_content(&mut self, _: &ElementMetadata, chunk: &[u8]) {
                self.0.push(chunk.len());
            }
            fn on_end_element(&mut self, _: &ElementMetadata, _: ElementPath<'_>) {}
        }

        let options = TokenizerOptions {
            max_content_chunk: 4,
        };
        let mut tok = EbmlTokenizer::new(TypeRegistry::matroska(), options);
        let mut source = ChunkedSource::from_bytes(&element(SIMPLE_BLOCK, &[7; 10]));
        let mut chunks = Chunks::default();
        tok.parse(&mut source, &mut chunks).unwrap();
        assert_eq!(chunks.0, [4, 4, 2]);
    }

    #[test]
    fn paused_callback_stops_parsing() {
        let bytes = ebml_header();
        let mut tok = tokenizer();
        let mut source = ChunkedSource::from_bytes(&bytes);
        let mut rec = Recorder {
            paused: true,
            ..Recorder::default()
        };
        tok.parse(&mut source, &mut rec).unwrap();
        assert!(rec.events.is_empty());
        assert_eq!(tok.total_bytes_read(), 0);

        rec.paused = false;
        tok.parse(&mut source, &mut rec).unwrap();
        assert_eq!(rec.events.len(), 6);
    }

    #[test]
    fn element_counts_include_skipped_elements() {
        #[derive(Default)]
        struct Counts(Vec<u64>);
        impl TokenizerCallback for Counts {
            fn on_start_element(
                &mut self,
                m: &ElementMetadata,
                _: ElementSize,
                _: &[u8],
                _: ElementPath<'_>,
            ) {
                self.0.push(m.element_count);
            }
            fn on_partial_content(&mut self, _: &ElementMetadata, _: &[u8]) {}
            fn on_end_element(&mut self, _: &ElementMetadata, _: ElementPath<'_>) {}
        }

        let mut bytes = element(EBML_VERSION, &[1]);
        bytes.extend(element(0x4FFF, &[0]));
        bytes.extend(element(EBML_VERSION, &[1]));

        let mut tok = tokenizer();
        let mut counts = Counts::default();
        tok.parse(&mut ChunkedSource::from_bytes(&bytes), &mut counts).unwrap();
        assert_eq!(counts.0, [0, 2]);
    }
}

use tracing::debug;

use crate::assembler::DocumentAssembler;
use crate::config::ReaderConfig;
use crate::element::MkvElement;
use crate::error::{ApplyError, ParseError};
use crate::source::ByteSource;
use crate::tokenizer::EbmlTokenizer;
use crate::visitor::MkvElementVisitor;

/// Pull-based reader over an EBML/Matroska stream.
///
/// Owns the byte source, the tokenizer and the assembler. Elements are
/// pulled one at a time with [`next_if_available`](Self::next_if_available),
/// which returns `Ok(None)` when the source has nothing more for now; that
/// is "not yet", not "done". [`might_have_next`](Self::might_have_next)
/// answers "done".
///
/// ```text
///   let mut reader = StreamingMkvReader::new(source);
///   while reader.might_have_next()? {
///       if let Some(element) = reader.next_if_available()? {
///           ...
///       }
///   }
/// ```
///
/// A returned [`MkvElement::Data`] borrows the reader, so its content can't
/// outlive the next call.
pub struct StreamingMkvReader<S> {
    source: S,
    tokenizer: EbmlTokenizer,
    assembler: DocumentAssembler,
}

impl<S: ByteSource> StreamingMkvReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        let tokenizer = EbmlTokenizer::new(config.registry.clone(), config.tokenizer_options());
        let assembler = DocumentAssembler::new(&config);
        Self {
            source,
            tokenizer,
            assembler,
        }
    }

    /// Might another element still come out of this reader?
    ///
    /// When the source reports end of input the tokenizer is closed here,
    /// and `true` is returned once more so the elements closing produced
    /// can be drained.
    ///
    /// # Errors
    ///
    /// I/O errors from the source.
    pub fn might_have_next(&mut self) -> Result<bool, ParseError> {
        if self.assembler.has_pending() {
            return Ok(true);
        }
        if self.tokenizer.is_closed() {
            return Ok(false);
        }
        if !self.source.eof()? {
            return Ok(true);
        }

        debug!(bytes_read = self.tokenizer.total_bytes_read(), "end of input");
        // Bytes buffered before eof was reported still need parsing.
        self.tokenizer.parse(&mut self.source, &mut self.assembler)?;
        if self.assembler.has_pending() {
            return Ok(true);
        }
        self.tokenizer.close(&mut self.assembler);
        Ok(true)
    }

    /// The next element, if one can be produced from the bytes available.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`]. After an error the reader should be discarded.
    pub fn next_if_available(&mut self) -> Result<Option<MkvElement<'_>>, ParseError> {
        if !self.assembler.has_pending() && !self.tokenizer.is_closed() {
            self.tokenizer.parse(&mut self.source, &mut self.assembler)?;
        }
        Ok(self.assembler.pop_element())
    }

    /// Feed elements to `visitor` until the stream is done, the visitor is
    /// done, or the source has nothing more for now.
    ///
    /// With a [`ChunkedSource`](crate::ChunkedSource) this returns once the
    /// pushed bytes are used up; push more and call again.
    ///
    /// # Errors
    ///
    /// [`ApplyError::Parse`] for parse errors, [`ApplyError::Visitor`] for
    /// the first visitor error.
    pub fn apply<V>(&mut self, visitor: &mut V) -> Result<(), ApplyError<V::Error>>
    where
        V: MkvElementVisitor + ?Sized,
    {
        while !visitor.is_done() && self.might_have_next()? {
            let before = self.progress()?;
            if let Some(element) = self.next_if_available()? {
                element.accept(visitor).map_err(ApplyError::Visitor)?;
                continue;
            }
            if self.progress()? == before && !self.source.eof().map_err(ParseError::from)? {
                break;
            }
        }
        Ok(())
    }

    fn progress(&mut self) -> Result<(u64, usize), ParseError> {
        Ok((self.tokenizer.total_bytes_read(), self.source.available()?))
    }

    /// Bytes consumed from the source so far.
    pub fn total_bytes_read(&self) -> u64 {
        self.tokenizer.total_bytes_read()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Access the source, e.g. to push more bytes into a
    /// [`ChunkedSource`](crate::ChunkedSource).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use mkv_types::matroska::{CLUSTER, EBML, DOC_TYPE, SEGMENT, SIMPLE_BLOCK, TIMECODE};
    use mkv_wire::header::{write_element, ElementHeader};

    use super::*;
    use crate::element::{DataElement, EndContainer, StartContainer};
    use crate::source::ChunkedSource;
    use crate::visitor::{CompositeVisitor, FrameVisitor};
    use crate::TypeError;

    fn element(id: u32, content: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_element(id, content, &mut out).unwrap();
        out
    }

    fn live_stream() -> Vec<u8> {
        let mut bytes = element(EBML, &element(DOC_TYPE, b"matroska"));
        ElementHeader::unknown(SEGMENT).write_to(&mut bytes).unwrap();
        for tc in [0u8, 40] {
            ElementHeader::unknown(CLUSTER).write_to(&mut bytes).unwrap();
            bytes.extend(element(TIMECODE, &[tc]));
            bytes.extend(element(SIMPLE_BLOCK, &[0x81, 0, 0, 0x80, tc]));
            bytes.extend(element(SIMPLE_BLOCK, &[0x82, 0, 5, 0x00, tc]));
        }
        bytes
    }

    #[derive(Default)]
    struct Names {
        seen: Vec<String>,
        limit: Option<usize>,
    }

    impl MkvElementVisitor for Names {
        type Error = Infallible;

        fn visit_start(&mut self, e: &StartContainer) -> Result<(), Infallible> {
            self.seen.push(format!("+{}", e.metadata.name()));
            Ok(())
        }

        fn visit_end(&mut self, e: &EndContainer) -> Result<(), Infallible> {
            self.seen.push(format!("-{}", e.metadata.name()));
            Ok(())
        }

        fn visit_data(&mut self, e: &DataElement<'_>) -> Result<(), Infallible> {
            self.seen.push(e.metadata.name().to_string());
            Ok(())
        }

        fn is_done(&self) -> bool {
            self.limit.is_some_and(|n| self.seen.len() >= n)
        }
    }

    #[test]
    fn pull_loop_drains_everything() {
        let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(&live_stream()));
        let mut count = 0;
        while reader.might_have_next().unwrap() {
            if reader.next_if_available().unwrap().is_some() {
                count += 1;
            }
        }
        // EBML(+DocType) 3, Segment 2, two clusters of 2 + 3 leaves each.
        assert_eq!(count, 3 + 2 + 2 * 5);
        assert!(!reader.might_have_next().unwrap());
    }

    #[test]
    fn apply_returns_when_chunked_source_runs_dry() {
        let bytes = live_stream();
        let mut reader = StreamingMkvReader::new(ChunkedSource::new());
        let mut names = Names::default();

        for chunk in bytes.chunks(7) {
            reader.source_mut().push(chunk);
            reader.apply(&mut names).unwrap();
        }
        assert_eq!(names.seen.last().map(String::as_str), Some("SimpleBlock"));

        reader.source_mut().finish();
        reader.apply(&mut names).unwrap();
        assert_eq!(&names.seen[names.seen.len() - 2..], ["-Cluster", "-Segment"]);
        assert!(!reader.might_have_next().unwrap());
    }

    #[test]
    fn apply_stops_when_visitor_is_done() {
        let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(&live_stream()));
        let mut names = Names {
            limit: Some(4),
            ..Names::default()
        };
        reader.apply(&mut names).unwrap();
        assert_eq!(names.seen, ["+EBML", "DocType", "-EBML", "+Segment"]);
        assert!(reader.might_have_next().unwrap());
    }

    #[test]
    fn frame_visitor_reports_frames_per_track() {
        let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(&live_stream()));
        let mut timecodes = Vec::new();
        let mut frames = FrameVisitor::new(|event| {
            timecodes.push(event.absolute_timecode());
            Ok::<_, TypeError>(())
        })
        .track(2);
        reader.apply(&mut frames).unwrap();
        assert_eq!(frames.frames(), 2);
        drop(frames);
        assert_eq!(timecodes, [Some(5), Some(45)]);
    }

    #[test]
    fn composite_visits_in_order() {
        let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(&live_stream()));
        let mut a = Names::default();
        let mut b = Names {
            limit: Some(2),
            ..Names::default()
        };
        let mut both = CompositeVisitor::new().with(&mut a).with(&mut b);
        reader.apply(&mut both).unwrap();
        drop(both);
        assert_eq!(a.seen.len(), 15);
        assert_eq!(b.seen, ["+EBML", "DocType"]);
    }

    #[test]
    fn visitor_error_is_reported() {
        struct Fails;
        impl MkvElementVisitor for Fails {
            type Error = &'static str;
            fn visit_start(&mut self, _: &StartContainer) -> Result<(), &'static str> {
                Ok(())
            }
            fn visit_end(&mut self, _: &EndContainer) -> Result<(), &'static str> {
                Ok(())
            }
            fn visit_data(&mut self, _: &DataElement<'_>) -> Result<(), &'static str> {
                Err("no data please")
            }
        }

        let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(&live_stream()));
        let err = reader.apply(&mut Fails).unwrap_err();
        assert!(matches!(err, ApplyError::Visitor("no data please")));
        assert!(reader.might_have_next().unwrap());
    }

    #[test]
    fn parse_errors_surface_from_apply() {
        let mut bytes = Vec::new();
        ElementHeader::unknown(TIMECODE).write_to(&mut bytes).unwrap();
        let mut reader = StreamingMkvReader::new(ChunkedSource::from_bytes(&bytes));
        let err = reader.apply(&mut Names::default()).unwrap_err();
        assert!(matches!(err, ApplyError::Parse(ParseError::UnknownLengthLeaf { .. })));
    }
}

use std::collections::{HashSet, VecDeque};
use std::mem;

use mkv_types::UnsignedPolicy;
use mkv_wire::ElementSize;

use crate::config::ReaderConfig;
use crate::element::{DataElement, EndContainer, MkvElement, StartContainer};
use crate::metadata::{ElementMetadata, ElementPath};
use crate::tokenizer::TokenizerCallback;

/// Upper bound on the capacity reserved up front for one leaf's content.
/// Larger elements grow the buffer as chunks arrive.
const MAX_PREALLOC: usize = 1 << 20;

enum Pending {
    Start(StartContainer),
    End(EndContainer),
    Data(PendingData),
}

struct PendingData {
    metadata: ElementMetadata,
    path: Option<Vec<ElementMetadata>>,
    declared_size: u64,
    header: Vec<u8>,
    content: Vec<u8>,
}

/// Turns tokenizer events into whole [`MkvElement`]s.
///
/// Container starts and ends are queued as they arrive. Leaf content is
/// accumulated until the leaf ends, then queued as one element. The
/// assembler asks the tokenizer to pause as soon as anything is queued.
/// The tokenizer reports at most one element per step, so the queue holds
/// a single element except after [`EbmlTokenizer::close`], which ends every
/// open container at once.
///
/// [`EbmlTokenizer::close`]: crate::tokenizer::EbmlTokenizer::close
///
/// The content buffer is reused: the buffer lent to the last
/// [`DataElement`] is reclaimed when the next leaf starts. The borrow
/// checker guarantees the lent element is gone by then.
pub struct DocumentAssembler {
    pending: VecDeque<Pending>,
    accumulating: Option<PendingData>,
    lent: Vec<u8>,
    filter: Option<HashSet<u32>>,
    capture_paths: bool,
    unsigned_policy: UnsignedPolicy,
}

impl DocumentAssembler {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            pending: VecDeque::new(),
            accumulating: None,
            lent: Vec::new(),
            filter: config
                .element_filter
                .as_ref()
                .map(|ids| ids.iter().copied().collect()),
            capture_paths: config.capture_paths,
            unsigned_policy: config.unsigned_policy,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take the oldest queued element.
    pub fn pop_element(&mut self) -> Option<MkvElement<'_>> {
        let element = match self.pending.pop_front()? {
            Pending::Start(start) => MkvElement::Start(start),
            Pending::End(end) => MkvElement::End(end),
            Pending::Data(data) => {
                self.lent = data.content;
                MkvElement::Data(DataElement::new(
                    data.metadata,
                    data.path,
                    data.declared_size,
                    data.header,
                    &self.lent,
                    self.unsigned_policy,
                ))
            }
        };
        Some(element)
    }

    fn wants(&self, id: u32) -> bool {
        self.filter.as_ref().is_none_or(|ids| ids.contains(&id))
    }

    fn capture(&self, path: ElementPath<'_>) -> Option<Vec<ElementMetadata>> {
        self.capture_paths.then(|| path.to_vec())
    }
}

impl TokenizerCallback for DocumentAssembler {
    fn on_start_element(
        &mut self,
        metadata: &ElementMetadata,
        declared_size: ElementSize,
        header: &[u8],
        path: ElementPath<'_>,
    ) {
        if !self.wants(metadata.id()) {
            return;
        }

        if metadata.type_info.is_master() {
            self.pending.push_back(Pending::Start(StartContainer {
                metadata: *metadata,
                path: self.capture(path),
                declared_size,
                header: header.to_vec(),
            }));
            return;
        }

        let declared_size = declared_size.known().unwrap_or(0);
        let mut content = mem::take(&mut self.lent);
        content.clear();
        content.reserve(usize::try_from(declared_size).unwrap_or(usize::MAX).min(MAX_PREALLOC));
        self.accumulating = Some(PendingData {
            metadata: *metadata,
            path: self.capture(path),
            declared_size,
            header: header.to_vec(),
            content,
        });
    }

    fn on_partial_content(&mut self, metadata: &ElementMetadata, chunk: &[u8]) {
        if let Some(data) = self.accumulating.as_mut() {
            if data.metadata.element_count == metadata.element_count {
                data.content.extend_from_slice(chunk);
            }
        }
    }

    fn on_end_element(&mut self, metadata: &ElementMetadata, path: ElementPath<'_>) {
        if !self.wants(metadata.id()) {
            return;
        }

        if metadata.type_info.is_master() {
            self.pending.push_back(Pending::End(EndContainer {
                metadata: *metadata,
                path: self.capture(path),
            }));
            return;
        }

        match self.accumulating.take() {
            Some(data) if data.metadata.element_count == metadata.element_count => {
                self.pending.push_back(Pending::Data(data));
            }
            other => {
                tracing::warn!(element = %metadata, "end of leaf that was never started");
                self.accumulating = other;
            }
        }
    }

    fn continue_parsing(&self) -> bool {
        self.pending.is_empty()
    }
}

use mkv_types::{TypeRegistry, UnsignedPolicy};

/// Default upper bound for one content callback.
pub const DEFAULT_MAX_CONTENT_CHUNK: usize = 8192;

/// Tokenizer-level settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Largest number of content bytes handed to one
    /// [`on_partial_content`](crate::TokenizerCallback::on_partial_content)
    /// call.
    pub max_content_chunk: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            max_content_chunk: DEFAULT_MAX_CONTENT_CHUNK,
        }
    }
}

/// Configuration for a [`StreamingMkvReader`](crate::StreamingMkvReader).
///
/// ```text
/// ┌───────────────────┬──────────────────────────────────────────────┐
/// │ Field             │ Purpose                                      │
/// ├───────────────────┼──────────────────────────────────────────────┤
/// │ max_content_chunk │ Bytes per content callback (default 8192)    │
/// │ capture_paths     │ Attach ancestor metadata to every element    │
/// │ element_filter    │ Optional allowlist of element ids to surface │
/// │ unsigned_policy   │ Lenient / Strict for sign-bit unsigned ints  │
/// │ registry          │ Schema table (default: Matroska)             │
/// └───────────────────┴──────────────────────────────────────────────┘
/// ```
///
/// With an `element_filter`, elements outside the list are still parsed
/// (so nesting stays correct) and still show up in the paths of their
/// descendants, but they are never surfaced themselves and their content
/// is never copied.
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    pub max_content_chunk: usize,
    pub capture_paths: bool,
    pub element_filter: Option<Vec<u32>>,
    pub unsigned_policy: UnsignedPolicy,
    pub registry: TypeRegistry,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_content_chunk: DEFAULT_MAX_CONTENT_CHUNK,
            capture_paths: true,
            element_filter: None,
            unsigned_policy: UnsignedPolicy::default(),
            registry: TypeRegistry::matroska(),
        }
    }
}

impl ReaderConfig {
    /// Only surface elements whose id is in `ids`.
    #[must_use]
    pub fn with_filter(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.element_filter = Some(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            max_content_chunk: self.max_content_chunk.max(1),
        }
    }
}

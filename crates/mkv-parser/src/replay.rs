use mkv_wire::MAX_HEADER_LEN;

/// Header bytes of the element currently being decoded, keyed by their
/// absolute stream offset.
///
/// Header bytes are pulled from the source exactly once. When a VINT turns
/// out to be longer than what is available, the bytes already pulled stay
/// here and decoding resumes from them on the next `parse` call. Once the
/// header is complete the same bytes become the element's raw header.
///
/// ```text
///   start_offset            start_offset + len
///        │                         │
///        ▼                         ▼
///   ┌────┬────┬────┬────┬────┬─────┬───────────┐
///   │ 1A │ 45 │ DF │ A3 │ 84 │     │  (unused) │   capacity 12
///   └────┴────┴────┴────┴────┴─────┴───────────┘
/// ```
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    start_offset: u64,
    buf: [u8; MAX_HEADER_LEN],
    len: usize,
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayBuffer {
    pub fn new() -> Self {
        Self {
            start_offset: 0,
            buf: [0; MAX_HEADER_LEN],
            len: 0,
        }
    }

    /// Empty the buffer; the next pushed byte sits at `offset`.
    pub fn reset(&mut self, offset: u64) {
        self.start_offset = offset;
        self.len = 0;
    }

    /// Append the byte at offset [`end_offset`](Self::end_offset).
    ///
    /// Returns `false` (and stores nothing) when the buffer is full.
    #[must_use]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len == MAX_HEADER_LEN {
            return false;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        true
    }

    /// Is the byte at absolute `offset` buffered?
    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.start_offset && offset < self.end_offset()
    }

    /// The byte at absolute `offset`, if buffered.
    pub fn get(&self, offset: u64) -> Option<u8> {
        if !self.contains(offset) {
            return None;
        }
        let idx = usize::try_from(offset - self.start_offset).ok()?;
        self.buf.get(idx).copied()
    }

    /// Buffered bytes starting at absolute `offset` (empty if out of range).
    pub fn slice_from(&self, offset: u64) -> &[u8] {
        if offset < self.start_offset {
            return &[];
        }
        usize::try_from(offset - self.start_offset)
            .ok()
            .and_then(|idx| self.as_slice().get(idx..))
            .unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Offset one past the last buffered byte.
    pub fn end_offset(&self) -> u64 {
        self.start_offset + self.len as u64
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

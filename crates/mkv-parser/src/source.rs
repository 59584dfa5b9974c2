use std::io::{self, Read};

use bytes::{Buf, BytesMut};

/// Default read size for [`ReaderSource`].
const DEFAULT_READ_CHUNK: usize = 64 * 1024;

/// A pull-based byte source the tokenizer reads from.
///
/// The tokenizer never asks for more bytes than [`available`] reported,
/// except for [`read_bytes`] which may return fewer. A source that cannot
/// know how much is buffered without blocking (a socket behind
/// [`ReaderSource`]) is allowed to block inside `available`; the tokenizer
/// then blocks with it.
///
/// [`available`]: ByteSource::available
/// [`read_bytes`]: ByteSource::read_bytes
pub trait ByteSource {
    /// Read one byte. `Ok(None)` means the input has ended.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Number of bytes that can be read right now.
    fn available(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes. `Ok(0)` on a non-empty buffer means
    /// the input has ended.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// True once the producer is done: nothing will arrive beyond what is
    /// already buffered. Buffered bytes may remain, e.g. the start of a
    /// header that was cut off.
    fn eof(&mut self) -> io::Result<bool>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn available(&mut self) -> io::Result<usize> {
        (**self).available()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_bytes(buf)
    }

    fn eof(&mut self) -> io::Result<bool> {
        (**self).eof()
    }
}

/// A source fed by the caller in chunks of any size.
///
/// Push bytes as they arrive and call [`finish`](Self::finish) when the
/// producer is done. Until then an empty source is "waiting", not ended:
/// reading from it fails with [`io::ErrorKind::WouldBlock`].
///
/// ```text
///   push(chunk) ──▶ [ buffered bytes ] ──▶ tokenizer
///   finish()    ──▶ eof
/// ```
#[derive(Debug, Default)]
pub struct ChunkedSource {
    buf: BytesMut,
    finished: bool,
}

impl ChunkedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finished source holding all of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut source = Self::new();
        source.push(bytes);
        source.finish();
        source
    }

    /// Append bytes to the end of the buffered input.
    ///
    /// Pushing after [`finish`](Self::finish) is ignored.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.finished {
            tracing::warn!(len = chunk.len(), "push after finish ignored");
            return;
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Mark the input as complete.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes pushed but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn would_block() -> io::Error {
        io::Error::new(io::ErrorKind::WouldBlock, "no bytes buffered yet")
    }
}

impl ByteSource for ChunkedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.buf.has_remaining() {
            return Ok(Some(self.buf.get_u8()));
        }
        if self.finished {
            Ok(None)
        } else {
            Err(Self::would_block())
        }
    }

    fn available(&mut self) -> io::Result<usize> {
        Ok(self.buf.len())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.buf.len());
        if n == 0 && !buf.is_empty() && !self.finished {
            return Err(Self::would_block());
        }
        self.buf.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }

    fn eof(&mut self) -> io::Result<bool> {
        Ok(self.finished)
    }
}

/// A source over any [`Read`] implementation.
///
/// Calls `read` only once everything buffered has been consumed, so bytes
/// already in hand are never held back waiting for more. A header split
/// across two reads is picked up by the tokenizer, which keeps partial
/// headers between calls.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: BytesMut,
    read_chunk: usize,
    at_eof: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_read_chunk(reader, DEFAULT_READ_CHUNK)
    }

    /// Use `read_chunk` bytes per underlying `read` call.
    pub fn with_read_chunk(reader: R, read_chunk: usize) -> Self {
        Self {
            reader,
            buf: BytesMut::new(),
            read_chunk: read_chunk.max(1),
            at_eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read once from the underlying reader if the buffer is empty.
    fn fill(&mut self) -> io::Result<()> {
        if self.at_eof || !self.buf.is_empty() {
            return Ok(());
        }
        self.buf.resize(self.read_chunk, 0);
        let n = loop {
            match self.reader.read(&mut self.buf[..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.buf.clear();
                    return Err(e);
                }
            }
        };
        self.buf.truncate(n);
        if n == 0 {
            self.at_eof = true;
        }
        Ok(())
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.fill()?;
        if self.buf.has_remaining() {
            Ok(Some(self.buf.get_u8()))
        } else {
            Ok(None)
        }
    }

    fn available(&mut self) -> io::Result<usize> {
        self.fill()?;
        Ok(self.buf.len())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fill()?;
        let n = buf.len().min(self.buf.len());
        self.buf.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }

    fn eof(&mut self) -> io::Result<bool> {
        self.fill()?;
        Ok(self.at_eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_source_waits_until_finished() {
        let mut source = ChunkedSource::new();
        assert_eq!(source.available().unwrap(), 0);
        assert!(!source.eof().unwrap());
        let err = source.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        source.push(&[1, 2, 3]);
        assert_eq!(source.available().unwrap(), 3);
        assert_eq!(source.read_byte().unwrap(), Some(1));

        let mut buf = [0u8; 8];
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[2, 3]);

        source.finish();
        assert!(source.eof().unwrap());
        assert_eq!(source.read_byte().unwrap(), None);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn push_after_finish_is_ignored() {
        let mut source = ChunkedSource::from_bytes(&[9]);
        source.push(&[10, 11]);
        assert_eq!(source.buffered(), 1);
    }

    /// Hands out one scripted chunk per `read` and counts the calls.
    struct Scripted {
        chunks: Vec<Vec<u8>>,
        reads: usize,
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0);
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn reader_source_reads_only_when_empty() {
        let mut source = ReaderSource::new(Scripted {
            chunks: vec![vec![1, 2], vec![3]],
            reads: 0,
        });

        assert_eq!(source.available().unwrap(), 2);
        assert_eq!(source.read_byte().unwrap(), Some(1));
        assert_eq!(source.available().unwrap(), 1);
        assert!(!source.eof().unwrap());
        assert_eq!(source.reader.reads, 1);

        assert_eq!(source.read_byte().unwrap(), Some(2));
        assert_eq!(source.available().unwrap(), 1);
        assert_eq!(source.reader.reads, 2);

        let mut buf = [0u8; 4];
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
        assert!(source.eof().unwrap());
        assert_eq!(source.read_byte().unwrap(), None);
        assert_eq!(source.reader.reads, 3);
    }

    #[test]
    fn reader_source_retries_interrupted_reads() {
        struct Flaky(bool);
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.0 {
                    self.0 = true;
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                buf[0] = 7;
                Ok(1)
            }
        }

        let mut source = ReaderSource::new(Flaky(false));
        assert_eq!(source.read_byte().unwrap(), Some(7));
    }
}

//! Random-access byte storage over a GIF stream.
//!
//! This is the one external collaborator the decode algorithms depend on:
//! something that can mint independent, randomly-positioned read cursors.
//! The two implementations below (in-memory and file-backed) exist so the
//! rest of the crate is directly usable and testable without requiring
//! callers to bring their own; a caller backed by something more exotic
//! (memory-mapped, async-fetched) implements the trait itself.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

/// A sequential read cursor positioned somewhere in a [`ByteSource`].
pub trait Cursor {
    /// Read exactly `buf.len()` bytes, advancing the cursor.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Read a single byte, advancing the cursor by one.
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    /// Read `n` bytes into a freshly allocated buffer.
    fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Advance the cursor by `n` bytes without materializing them.
    fn skip(&mut self, n: usize) -> io::Result<()>;

    /// Whether the cursor has consumed every byte available to it.
    fn is_eof(&mut self) -> io::Result<bool>;

    /// Absolute offset of the next byte this cursor will yield.
    fn position(&mut self) -> io::Result<u64>;
}

/// Random-access, seek+read byte storage over a GIF stream; closable.
pub trait ByteSource {
    type Cursor: Cursor;

    /// Open a cursor positioned at byte 0.
    fn open_at_start(&self) -> io::Result<Self::Cursor>;

    /// Open a cursor positioned at the given absolute offset.
    fn open_at(&self, offset: u64) -> io::Result<Self::Cursor>;

    /// Release any resources held by this source. Further opens are not
    /// guaranteed to succeed after this is called.
    fn close(&mut self) -> io::Result<()>;
}

/// An in-memory GIF stream, cheaply cloned via reference counting.
#[derive(Clone)]
pub struct InMemoryByteSource {
    bytes: Arc<[u8]>,
}

impl InMemoryByteSource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        InMemoryByteSource { bytes: bytes.into() }
    }
}

pub struct InMemoryCursor {
    bytes: Arc<[u8]>,
    pos: usize,
}

impl Cursor for InMemoryCursor {
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let end = self.pos + buf.len();
        if end > self.bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read past end of in-memory GIF buffer",
            ));
        }
        buf.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn skip(&mut self, n: usize) -> io::Result<()> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "skip past end of in-memory GIF buffer",
            ));
        }
        self.pos = end;
        Ok(())
    }

    fn is_eof(&mut self) -> io::Result<bool> {
        Ok(self.pos >= self.bytes.len())
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.pos as u64)
    }
}

impl ByteSource for InMemoryByteSource {
    type Cursor = InMemoryCursor;

    fn open_at_start(&self) -> io::Result<InMemoryCursor> {
        self.open_at(0)
    }

    fn open_at(&self, offset: u64) -> io::Result<InMemoryCursor> {
        Ok(InMemoryCursor { bytes: self.bytes.clone(), pos: offset as usize })
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A file-backed GIF stream. Each cursor clones the file handle and seeks
/// independently, so concurrent cursors never disturb one another's position.
pub struct FileByteSource {
    file: File,
}

impl FileByteSource {
    pub fn open(path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        Ok(FileByteSource { file: File::open(path)? })
    }
}

pub struct FileCursor {
    reader: io::BufReader<File>,
}

impl Cursor for FileCursor {
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.reader.read_exact(buf)
    }

    fn skip(&mut self, n: usize) -> io::Result<()> {
        self.reader.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    fn is_eof(&mut self) -> io::Result<bool> {
        let buf = self.reader.fill_buf_compat()?;
        Ok(buf.is_empty())
    }

    fn position(&mut self) -> io::Result<u64> {
        self.reader.stream_position()
    }
}

// `BufReader::fill_buf` is the normal way to peek for EOF without consuming,
// but it requires `BufRead` to be in scope; wrap it so callers of `is_eof`
// don't need to import that trait themselves.
trait FillBufCompat {
    fn fill_buf_compat(&mut self) -> io::Result<&[u8]>;
}

impl FillBufCompat for io::BufReader<File> {
    fn fill_buf_compat(&mut self) -> io::Result<&[u8]> {
        use std::io::BufRead;
        self.fill_buf()
    }
}

impl ByteSource for FileByteSource {
    type Cursor = FileCursor;

    fn open_at_start(&self) -> io::Result<FileCursor> {
        self.open_at(0)
    }

    fn open_at(&self, offset: u64) -> io::Result<FileCursor> {
        let mut file = self.file.try_clone()?;
        file.seek(SeekFrom::Start(offset))?;
        Ok(FileCursor { reader: io::BufReader::new(file) })
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

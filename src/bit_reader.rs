//! Variable-width little-endian bit extraction over a run of GIF sub-blocks.
//!
//! A GIF sub-block run is `(length: u8, length bytes)` pairs terminated by a
//! zero length. `BitReader` owns that framing: callers just ask for the next
//! `w`-bit code and the reader pulls fresh sub-blocks from the underlying
//! cursor as its accumulator runs dry.

use crate::byte_source::Cursor;
use crate::error::{GifError, Result};

pub struct BitReader {
    acc: u32,
    bits: u8,
    /// Bytes remaining in the sub-block currently being consumed.
    current_sub_block_remaining: usize,
    /// Set once a zero-length sub-block (the terminator) has been read.
    exhausted: bool,
}

impl BitReader {
    /// Create a reader positioned just before the first sub-block's length
    /// byte.
    pub fn new() -> Self {
        BitReader { acc: 0, bits: 0, current_sub_block_remaining: 0, exhausted: false }
    }

    /// Extract the next `code_size`-bit code (LSB-first, packed across byte
    /// boundaries), refilling from sub-blocks of `cursor` as needed.
    ///
    /// `code_size` must not exceed 16; the LZW codes this reader serves never
    /// grow past width 12.
    pub fn next_code(&mut self, cursor: &mut impl Cursor, code_size: u8) -> Result<u16> {
        debug_assert!(code_size <= 16);
        while self.bits < code_size {
            let byte = self.next_byte(cursor)?;
            let byte = match byte {
                Some(b) => b,
                None => {
                    return Err(GifError::Corrupt(
                        "truncated LZW sub-block stream before end-of-information code".into(),
                    ));
                }
            };
            self.acc |= (byte as u32) << self.bits;
            self.bits += 8;
        }
        let mask = (1u32 << code_size) - 1;
        let code = self.acc & mask;
        self.acc >>= code_size;
        self.bits -= code_size;
        Ok(code as u16)
    }

    fn next_byte(&mut self, cursor: &mut impl Cursor) -> Result<Option<u8>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.current_sub_block_remaining == 0 {
            let len = cursor.read_u8()?;
            if len == 0 {
                self.exhausted = true;
                return Ok(None);
            }
            self.current_sub_block_remaining = len as usize;
        }
        let byte = cursor.read_u8()?;
        self.current_sub_block_remaining -= 1;
        Ok(Some(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_source::{ByteSource, InMemoryByteSource};

    fn reader_over(bytes: &[u8]) -> (InMemoryByteSource, <InMemoryByteSource as ByteSource>::Cursor) {
        let source = InMemoryByteSource::new(bytes.to_vec());
        let cursor = source.open_at_start().unwrap();
        (source, cursor)
    }

    #[test]
    fn reads_packed_codes_across_byte_boundaries() {
        // Two sub-blocks: one byte 0b1011_0010 then terminator.
        let (_src, mut cursor) = reader_over(&[1, 0b1011_0010, 0]);
        let mut r = BitReader::new();
        assert_eq!(r.next_code(&mut cursor, 4).unwrap(), 0b0010);
        assert_eq!(r.next_code(&mut cursor, 4).unwrap(), 0b1011);
    }

    #[test]
    fn advances_across_sub_block_boundary() {
        let (_src, mut cursor) = reader_over(&[1, 0xFF, 1, 0x01, 0]);
        let mut r = BitReader::new();
        // 9-bit codes spanning the two one-byte sub-blocks.
        let first = r.next_code(&mut cursor, 9).unwrap();
        assert_eq!(first, 0x0FF);
        let second = r.next_code(&mut cursor, 9).unwrap();
        assert_eq!(second, 0x001);
    }

    #[test]
    fn truncated_stream_is_corrupt_not_panic() {
        let (_src, mut cursor) = reader_over(&[1, 0xFF]); // no terminator, cursor will EOF
        let mut r = BitReader::new();
        r.next_code(&mut cursor, 8).unwrap();
        let err = r.next_code(&mut cursor, 8);
        assert!(err.is_err());
    }
}

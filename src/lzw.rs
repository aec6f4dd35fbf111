//! Variable-bit-width LZW decompression of GIF image data into a flat
//! palette-index stream.

use crate::bit_reader::BitReader;
use crate::byte_source::Cursor;
use crate::error::{GifError, Result};

/// Decode exactly one frame's worth of LZW-compressed sub-blocks.
///
/// `min_code_size` is the byte read from the stream immediately before the
/// first sub-block. `pixel_count` is `width * height` of the frame being
/// decoded; indices beyond that count are discarded (a short stream is still
/// an error, an over-long one is not).
pub fn decode(
    cursor: &mut impl Cursor,
    min_code_size: u8,
    pixel_count: usize,
) -> Result<Vec<u8>> {
    if min_code_size == 0 || min_code_size > 8 {
        return Err(GifError::Unsupported(format!(
            "LZW minimum code size {} outside the supported 1..=8 range",
            min_code_size
        )));
    }

    let mut bits = BitReader::new();
    let mut table = Dictionary::new(min_code_size);
    let mut previous_code: Option<u16> = None;
    let mut reset = true;
    let mut out: Vec<u8> = Vec::with_capacity(pixel_count);

    loop {
        let code = bits.next_code(cursor, table.code_width())?;

        if code == table.clear_code() {
            table.clear();
            previous_code = None;
            reset = true;
            continue;
        }
        if code == table.end_code() {
            break;
        }

        if reset {
            let entry = table.entry(code).ok_or_else(|| {
                GifError::Corrupt(format!("LZW code {} invalid immediately after clear", code))
            })?;
            out.extend_from_slice(entry);
            previous_code = Some(code);
            reset = false;
            continue;
        }

        let prev = previous_code.expect("previous_code set once reset clears");
        let prev_entry = table.entry(prev).expect("previous_code always resolves").to_vec();

        if let Some(entry) = table.entry(code) {
            out.extend_from_slice(entry);
            let mut new_entry = prev_entry;
            new_entry.push(entry[0]);
            table.push(new_entry);
        } else if code as usize == table.next_code_slot() {
            let mut new_entry = prev_entry;
            new_entry.push(new_entry[0]);
            out.extend_from_slice(&new_entry);
            table.push(new_entry);
        } else {
            return Err(GifError::Corrupt(format!(
                "LZW code {} refers beyond the current table (+1)",
                code
            )));
        }
        previous_code = Some(code);
    }

    if out.len() < pixel_count {
        return Err(GifError::Corrupt(format!(
            "LZW stream produced {} indices, expected {}",
            out.len(),
            pixel_count
        )));
    }
    out.truncate(pixel_count);
    Ok(out)
}

/// The LZW code table: roots, the two reserved codes, and dynamically
/// appended entries, along with the current code width.
struct Dictionary {
    min_code_size: u8,
    max_colors: u16,
    code_width: u8,
    entries: Vec<Vec<u8>>,
    frozen: bool,
}

impl Dictionary {
    fn new(min_code_size: u8) -> Self {
        let mut d = Dictionary {
            min_code_size,
            max_colors: 1u16 << min_code_size,
            code_width: min_code_size + 1,
            entries: Vec::with_capacity(4096),
            frozen: false,
        };
        d.clear();
        d
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.code_width = self.min_code_size + 1;
        self.frozen = false;
        for c in 0..self.max_colors {
            self.entries.push(vec![c as u8]);
        }
        // Two reserved placeholder slots for CLEAR and END.
        self.entries.push(Vec::new());
        self.entries.push(Vec::new());
    }

    fn clear_code(&self) -> u16 {
        self.max_colors
    }

    fn end_code(&self) -> u16 {
        self.max_colors + 1
    }

    fn code_width(&self) -> u8 {
        self.code_width
    }

    fn next_code_slot(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a code to its byte-string entry, `None` for CLEAR/END/unused.
    fn entry(&self, code: u16) -> Option<&[u8]> {
        let idx = code as usize;
        if idx >= self.entries.len() {
            return None;
        }
        if idx == self.clear_code() as usize || idx == self.end_code() as usize {
            return None;
        }
        Some(&self.entries[idx])
    }

    fn push(&mut self, entry: Vec<u8>) {
        if self.frozen {
            return;
        }
        self.entries.push(entry);
        if self.entries.len() == (1usize << self.code_width) {
            if self.code_width < 12 {
                self.code_width += 1;
            } else {
                // Width 12 is the ceiling: the table freezes here and further
                // codes are read at width 12 until the next CLEAR.
                self.frozen = true;
            }
        }
    }
}

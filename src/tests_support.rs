//! Fixture builders shared by unit tests across modules. Not part of the
//! public API; only compiled under `cfg(test)`.

/// LSB-first bit packer, mirroring `BitReader`'s own accumulator.
struct BitWriter {
    acc: u32,
    bits: u8,
    out: Vec<u8>,
}

impl BitWriter {
    fn new() -> Self {
        BitWriter { acc: 0, bits: 0, out: Vec::new() }
    }
    fn push(&mut self, code: u16, width: u8) {
        self.acc |= (code as u32) << self.bits;
        self.bits += width;
        while self.bits >= 8 {
            self.out.push((self.acc & 0xFF) as u8);
            self.acc >>= 8;
            self.bits -= 8;
        }
    }
    fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.out.push((self.acc & 0xFF) as u8);
        }
        self.out
    }
}

fn sub_blocked(mut data: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::new();
    while !data.is_empty() {
        let take = data.len().min(255);
        let chunk: Vec<u8> = data.drain(..take).collect();
        out.push(chunk.len() as u8);
        out.extend(chunk);
    }
    out.push(0);
    out
}

/// Encode `indices` as literal LZW codes (no back-reference search). Valid
/// input for [`crate::lzw::decode`], just not space-efficient — fine for
/// fixtures where correctness, not compression, is what's under test.
pub(crate) fn lzw_encode_literal(min_code_size: u8, indices: &[u8]) -> Vec<u8> {
    assert!(!indices.is_empty());
    let max_colors = 1u16 << min_code_size;
    let clear = max_colors;
    let end = max_colors + 1;
    let mut width = min_code_size + 1;
    let mut table_len = (max_colors + 2) as usize;

    let mut w = BitWriter::new();
    w.push(clear, width);
    w.push(indices[0] as u16, width);
    for &idx in &indices[1..] {
        w.push(idx as u16, width);
        table_len += 1;
        if table_len == (1usize << width) && width < 12 {
            width += 1;
        }
    }
    w.push(end, width);
    sub_blocked(w.finish())
}

/// Build a complete, minimal GIF89a byte stream: a 4-color global color
/// table, one image per entry of `frames` (each a flat row-major index
/// buffer of length `width * height`), 100ms delay, no transparency, no
/// disposal, each frame covering the full logical screen.
pub(crate) fn build_gif(frames: Vec<Vec<u8>>, width: u16, height: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"GIF89a");
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(0b1111_0000 | 0x01); // GCT present, 2-bit color resolution, 4-entry GCT
    out.push(0); // background color index
    out.push(0); // pixel aspect ratio
    let palette = [
        (0u8, 0u8, 0u8),
        (255, 0, 0),
        (0, 255, 0),
        (0, 0, 255),
    ];
    for (r, g, b) in palette {
        out.push(r);
        out.push(g);
        out.push(b);
    }

    for indices in frames {
        assert_eq!(indices.len(), width as usize * height as usize);
        // Graphic Control Extension
        out.push(0x21);
        out.push(0xF9);
        out.push(4);
        out.push(0x00); // disposal unspecified, no transparency
        out.extend_from_slice(&10u16.to_le_bytes()); // 100ms
        out.push(0); // transparent color index (unused)
        out.push(0); // terminator

        // Image Descriptor
        out.push(0x2C);
        out.extend_from_slice(&0u16.to_le_bytes()); // left
        out.extend_from_slice(&0u16.to_le_bytes()); // top
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.push(0x00); // no local color table, no interlace
        out.push(2); // min code size
        out.extend(lzw_encode_literal(2, &indices));
    }

    out.push(0x3B);
    out
}

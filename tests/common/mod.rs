//! Hand-built GIF byte-stream fixtures for the integration tests. Mirrors
//! `src/tests_support.rs` but lives outside the crate (integration tests only
//! see the public API) and is deliberately more configurable: per-frame
//! geometry, disposal, transparency and an optional loop-count extension.

/// Route `log` output through `env_logger` when integration tests run with
/// `RUST_LOG` set; safe to call from every test since `try_init` no-ops
/// after the first successful call.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

#[derive(Clone)]
pub struct FixtureFrame {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub disposal: u8, // 0 unspecified, 1 do-not-dispose, 2 restore-background, 3 restore-previous
    pub transparent_index: Option<u8>,
    pub delay_centiseconds: u16,
    pub indices: Vec<u8>,
}

pub fn frame(
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    disposal: u8,
    transparent_index: Option<u8>,
    delay_centiseconds: u16,
    indices: Vec<u8>,
) -> FixtureFrame {
    FixtureFrame { left, top, width, height, disposal, transparent_index, delay_centiseconds, indices }
}

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

/// Literal (no back-reference search) LZW encoder: valid input, not
/// compact. Good enough for fixtures where decode correctness is what's
/// under test.
fn lzw_encode_literal(min_code_size: u8, indices: &[u8]) -> Vec<u8> {
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

/// A 4-color palette: black, red, green, blue.
pub const PALETTE: [(u8, u8, u8); 4] = [(0, 0, 0), (255, 0, 0), (0, 255, 0), (0, 0, 255)];

pub const BLACK: u8 = 0;
pub const RED: u8 = 1;
pub const GREEN: u8 = 2;
pub const BLUE: u8 = 3;

pub fn argb(color_index: u8) -> u32 {
    let (r, g, b) = PALETTE[color_index as usize];
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

pub fn build_gif(width: u16, height: u16, loop_count: Option<u16>, frames: Vec<FixtureFrame>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"GIF89a");
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(0b1111_0000 | 0x01); // GCT present, 4-entry GCT
    out.push(0); // background color index
    out.push(0); // pixel aspect ratio
    for (r, g, b) in PALETTE {
        out.push(r);
        out.push(g);
        out.push(b);
    }

    if let Some(count) = loop_count {
        out.push(0x21);
        out.push(0xFF);
        out.push(11);
        out.extend_from_slice(b"NETSCAPE2.0");
        out.push(3);
        out.push(0x01);
        out.extend_from_slice(&count.to_le_bytes());
        out.push(0);
    }

    for f in frames {
        assert_eq!(f.indices.len(), f.width as usize * f.height as usize);
        out.push(0x21);
        out.push(0xF9);
        out.push(4);
        let transparency_flag = if f.transparent_index.is_some() { 0x01 } else { 0x00 };
        out.push((f.disposal << 2) | transparency_flag);
        out.extend_from_slice(&f.delay_centiseconds.to_le_bytes());
        out.push(f.transparent_index.unwrap_or(0));
        out.push(0);

        out.push(0x2C);
        out.extend_from_slice(&f.left.to_le_bytes());
        out.extend_from_slice(&f.top.to_le_bytes());
        out.extend_from_slice(&f.width.to_le_bytes());
        out.extend_from_slice(&f.height.to_le_bytes());
        out.push(0x00);
        out.push(2); // min code size
        out.extend(lzw_encode_literal(2, &f.indices));
    }

    out.push(0x3B);
    out
}

/// Truncate a well-formed GIF's trailing bytes to produce a corrupt stream
/// whose final frame's LZW data never reaches its end-of-information code.
pub fn truncate(mut bytes: Vec<u8>, keep: usize) -> Vec<u8> {
    bytes.truncate(keep);
    bytes
}

use crate::byte_source::Cursor;
use crate::color::{self, Rgb};
use crate::error::{GifError, Result};

/// The GIF signature, logical screen descriptor, and global color table
/// (if any), parsed from the very start of the stream.
#[derive(Debug)]
pub struct GifHeader {
    pub width: u16,
    pub height: u16,
    pub background_color_index: u8,
    pub global_color_table: Option<Vec<Rgb>>,
}

pub fn parse_header(cursor: &mut impl Cursor) -> Result<GifHeader> {
    let mut signature = [0u8; 6];
    cursor.read_exact(&mut signature).map_err(GifError::from)?;
    if &signature[0..3] != b"GIF" {
        return Err(GifError::NotAGif);
    }
    if &signature[3..6] != b"87a" && &signature[3..6] != b"89a" {
        let version = String::from_utf8_lossy(&signature[3..6]).into_owned();
        return Err(GifError::Unsupported(format!("unrecognized GIF version {:?}", version)));
    }

    let width = read_u16(cursor)?;
    let height = read_u16(cursor)?;

    let packed = cursor.read_u8()?;
    let has_global_color_table = packed & 0x80 != 0;
    let global_color_table_size: usize = 1 << ((packed & 0x07) + 1);

    let background_color_index = cursor.read_u8()?;
    let _pixel_aspect_ratio = cursor.read_u8()?;

    let global_color_table = if has_global_color_table {
        Some(color::parse_color_table(cursor, global_color_table_size)?)
    } else {
        None
    };

    Ok(GifHeader { width, height, background_color_index, global_color_table })
}

pub(crate) fn read_u16(cursor: &mut impl Cursor) -> Result<u16> {
    let mut buf = [0u8; 2];
    cursor.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

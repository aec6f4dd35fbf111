//! Byte-exact parsing of the GIF container structure below the header:
//! block introducers, graphic control / application / comment / plain-text
//! extensions, and image descriptors. `FrameIndex` drives the sequential walk;
//! the composition pass re-parses individual image descriptors directly.

use crate::byte_source::Cursor;
use crate::color::{self, Rgb};
use crate::error::{GifError, Result};
use crate::frame::DisposalMethod;
use crate::header::read_u16;

pub const IMAGE_DESCRIPTOR_BLOCK_ID: u8 = 0x2C;
pub const EXTENSION_INTRODUCER_ID: u8 = 0x21;
pub const TRAILER_BLOCK_ID: u8 = 0x3B;

const GRAPHIC_CONTROL_EXTENSION_LABEL: u8 = 0xF9;
const APPLICATION_EXTENSION_LABEL: u8 = 0xFF;
const COMMENT_EXTENSION_LABEL: u8 = 0xFE;
const PLAIN_TEXT_EXTENSION_LABEL: u8 = 0x01;

/// A parsed Graphic Control Extension, describing the frame that follows it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphicControlExtension {
    pub disposal_method: DisposalMethod,
    pub transparent_color_index: Option<u8>,
    /// Delay time in milliseconds, already raised from 0 to 100ms.
    pub duration: u64,
}

/// Metadata parsed from one frame's 9-byte image descriptor header, before
/// its (optional) local color table and LZW data.
#[derive(Debug, Clone, Copy)]
pub struct ImageDescriptorHeader {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub has_local_color_table: bool,
    pub local_color_table_size: usize,
    pub has_interlace: bool,
}

pub fn parse_image_descriptor_header(cursor: &mut impl Cursor) -> Result<ImageDescriptorHeader> {
    let left = read_u16(cursor)?;
    let top = read_u16(cursor)?;
    let width = read_u16(cursor)?;
    let height = read_u16(cursor)?;
    let packed = cursor.read_u8()?;
    let has_local_color_table = packed & 0x80 != 0;
    let has_interlace = packed & 0x40 != 0;
    let local_color_table_size: usize = 1 << ((packed & 0x07) + 1);
    Ok(ImageDescriptorHeader {
        left,
        top,
        width,
        height,
        has_local_color_table,
        local_color_table_size,
        has_interlace,
    })
}

pub fn parse_local_color_table(cursor: &mut impl Cursor, size: usize) -> Result<Vec<Rgb>> {
    color::parse_color_table(cursor, size)
}

pub fn parse_graphic_control_extension(cursor: &mut impl Cursor) -> Result<GraphicControlExtension> {
    let block_size = cursor.read_u8()? as usize;
    if block_size != 4 {
        return Err(GifError::Corrupt(format!(
            "graphic control extension block size {}, expected 4",
            block_size
        )));
    }
    let packed = cursor.read_u8()?;
    let disposal_method = DisposalMethod::from_packed_bits((packed & 0b0001_1100) >> 2);
    let transparent_color_flag = packed & 0x01 != 0;
    let delay = read_u16(cursor)?;
    let transparent_color_index = if transparent_color_flag {
        Some(cursor.read_u8()?)
    } else {
        cursor.skip(1)?;
        None
    };
    let terminator = cursor.read_u8()?;
    if terminator != 0 {
        return Err(GifError::Corrupt(
            "graphic control extension missing block terminator".into(),
        ));
    }
    // Delay 0 is conventionally raised to 100ms (browsers treat it as such).
    let duration = if delay == 0 { 100 } else { delay as u64 * 10 };
    Ok(GraphicControlExtension {
        disposal_method,
        transparent_color_index,
        duration,
    })
}

/// Parse an Application Extension, returning the NETSCAPE2.0 loop count if
/// that's what this extension is; any other application extension is
/// consumed and discarded.
pub fn parse_application_extension(cursor: &mut impl Cursor) -> Result<Option<u16>> {
    let block_size = cursor.read_u8()? as usize;
    if block_size != 11 {
        return Err(GifError::Corrupt(format!(
            "application extension block size {}, expected 11",
            block_size
        )));
    }
    let identifier = cursor.read_bytes(8)?;
    let auth_code = cursor.read_bytes(3)?;

    let mut data_len = cursor.read_u8()? as usize;
    if data_len == 0 {
        return Ok(None);
    }

    let is_netscape_looping = identifier == b"NETSCAPE" && auth_code == [b'2', b'.', b'0'];

    let mut loop_count = None;
    if is_netscape_looping && data_len >= 3 {
        let sub_block_id = cursor.read_u8()?;
        if data_len == 0x03 && sub_block_id == 0x01 {
            loop_count = Some(read_u16(cursor)?);
            data_len -= 3;
        } else {
            data_len -= 1;
            log::warn!("NETSCAPE2.0 application extension had an unexpected sub-block shape");
        }
    }

    // Skip any remaining application data sub-blocks.
    loop {
        if data_len == 0 {
            break;
        }
        cursor.skip(data_len)?;
        data_len = cursor.read_u8()? as usize;
    }
    let terminator = cursor.read_u8()?;
    if terminator != 0 {
        return Err(GifError::Corrupt("application extension missing block terminator".into()));
    }
    Ok(loop_count)
}

pub fn skip_sub_blocks(cursor: &mut impl Cursor) -> Result<()> {
    loop {
        let len = cursor.read_u8()? as usize;
        if len == 0 {
            return Ok(());
        }
        cursor.skip(len)?;
    }
}

pub fn skip_comment_extension(cursor: &mut impl Cursor) -> Result<()> {
    skip_sub_blocks(cursor)
}

pub fn skip_plain_text_extension(cursor: &mut impl Cursor) -> Result<()> {
    let block_size = cursor.read_u8()?;
    if block_size != 12 {
        return Err(GifError::Corrupt(format!(
            "plain text extension block size {}, expected 12",
            block_size
        )));
    }
    cursor.skip(12)?;
    skip_sub_blocks(cursor)
}

/// Dispatch on an extension introducer's label byte, handling every
/// recognized extension kind. Returns the parsed graphic control extension
/// and/or loop count when either is present in what was just consumed.
pub enum ExtensionOutcome {
    GraphicControl(GraphicControlExtension),
    LoopCount(u16),
    Ignored,
}

pub fn parse_extension(cursor: &mut impl Cursor) -> Result<ExtensionOutcome> {
    let label = cursor.read_u8()?;
    match label {
        GRAPHIC_CONTROL_EXTENSION_LABEL => {
            Ok(ExtensionOutcome::GraphicControl(parse_graphic_control_extension(cursor)?))
        }
        APPLICATION_EXTENSION_LABEL => match parse_application_extension(cursor)? {
            Some(loop_count) => Ok(ExtensionOutcome::LoopCount(loop_count)),
            None => Ok(ExtensionOutcome::Ignored),
        },
        COMMENT_EXTENSION_LABEL => {
            skip_comment_extension(cursor)?;
            Ok(ExtensionOutcome::Ignored)
        }
        PLAIN_TEXT_EXTENSION_LABEL => {
            skip_plain_text_extension(cursor)?;
            Ok(ExtensionOutcome::Ignored)
        }
        other => {
            log::trace!("skipping unrecognized extension label 0x{:02x} as a sub-block run", other);
            skip_sub_blocks(cursor)?;
            Ok(ExtensionOutcome::Ignored)
        }
    }
}

//! Shared replay machinery: decode and composite a single frame onto a given
//! canvas, and replay a contiguous run of frames starting from the nearest
//! keyframe or cache point. `FrameIndex::build` uses this to materialize
//! synthetic cache entries; `Decoder::read_frame` uses the exact same code
//! to answer random-access reads.

use crate::byte_source::{ByteSource, Cursor};
use crate::color::Rgb;
use crate::compositor;
use crate::error::{GifError, Result};
use crate::frame::{DisposalMethod, FrameDescriptor, StreamMetadata};
use crate::lzw;
use crate::stream;

/// The outcome of replaying up to one target frame: its fully composited
/// canvas, plus (only when needed) the disposal-snapshot baseline that was
/// live at that point, so a later replay can resume from here.
pub struct ReplayedFrame {
    pub argb: Vec<u32>,
    pub restore_snapshot: Option<Vec<u32>>,
}

/// Decode `frame`'s own LZW data (re-parsed from `frame.byte_offset`) and
/// composite it onto a copy of `canvas`.
pub(crate) fn decode_and_apply<S: ByteSource>(
    source: &S,
    metadata: &StreamMetadata,
    frame: &FrameDescriptor,
    canvas: &[u32],
) -> Result<Vec<u32>> {
    let mut cursor = source.open_at(frame.byte_offset)?;
    let introducer = cursor.read_u8()?;
    if introducer != stream::IMAGE_DESCRIPTOR_BLOCK_ID {
        return Err(GifError::Corrupt(
            "frame byte offset did not point at an image descriptor".into(),
        ));
    }
    let desc_header = stream::parse_image_descriptor_header(&mut cursor)?;
    let local_color_table = if desc_header.has_local_color_table {
        Some(stream::parse_local_color_table(&mut cursor, desc_header.local_color_table_size)?)
    } else {
        None
    };
    let min_code_size = cursor.read_u8()?;
    let pixel_count = desc_header.width as usize * desc_header.height as usize;
    let indices = lzw::decode(&mut cursor, min_code_size, pixel_count)?;

    let color_table: &[Rgb] = match local_color_table.as_deref() {
        Some(table) => table,
        None => metadata
            .global_color_table
            .as_deref()
            .ok_or_else(|| GifError::Corrupt("frame has neither local nor global color table".into()))?,
    };

    let mut out = canvas.to_vec();
    compositor::apply(
        &mut out,
        metadata.width,
        frame,
        color_table,
        frame.transparent_color_index,
        &indices,
    );
    Ok(out)
}

/// Replay `frames[from_index..=to_index]`, returning only the composited
/// result for `to_index`. `from_index` must be a natural keyframe or a frame
/// with a materialized `cached_argb`.
pub fn replay_range<S: ByteSource>(
    source: &S,
    metadata: &StreamMetadata,
    frames: &[FrameDescriptor],
    from_index: usize,
    to_index: usize,
) -> Result<ReplayedFrame> {
    let screen_pixels = metadata.width as usize * metadata.height as usize;

    let (mut canvas, mut restore_snapshot) = match &frames[from_index].cached_argb {
        Some(cached) => {
            let snapshot = frames[from_index]
                .cached_restore_snapshot
                .clone()
                .unwrap_or_else(|| cached.clone());
            (cached.clone(), snapshot)
        }
        None => {
            let blank = vec![0u32; screen_pixels];
            let decoded = decode_and_apply(source, metadata, &frames[from_index], &blank)?;
            let snapshot = decoded.clone();
            (decoded, snapshot)
        }
    };

    for i in (from_index + 1)..=to_index {
        compositor::dispose(&mut canvas, metadata.width, metadata, &frames[i - 1], &restore_snapshot);
        if compositor::refresh_restore_snapshot(Some(frames[i - 1].disposal_method)) {
            restore_snapshot = canvas.clone();
        }
        canvas = decode_and_apply(source, metadata, &frames[i], &canvas)?;
    }

    let needs_snapshot = frames[to_index].disposal_method == DisposalMethod::RestoreToPrevious;
    Ok(ReplayedFrame {
        argb: canvas,
        restore_snapshot: if needs_snapshot { Some(restore_snapshot) } else { None },
    })
}

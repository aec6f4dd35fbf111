//! First-pass scan of a GIF stream: records per-frame byte offsets, timing
//! and disposal metadata, decides keyframes, and materializes synthetic
//! cache points at `cache_frame_interval`.

use crate::byte_source::{ByteSource, Cursor};
use crate::compositor;
use crate::error::{GifError, Result};
use crate::frame::{FrameDescriptor, StreamMetadata};
use crate::header;
use crate::replay;
use crate::stream::{
    self, ExtensionOutcome, IMAGE_DESCRIPTOR_BLOCK_ID, TRAILER_BLOCK_ID,
};

pub struct FrameIndex {
    pub metadata: StreamMetadata,
    pub frames: Vec<FrameDescriptor>,
}

impl FrameIndex {
    pub fn build<S: ByteSource>(source: &S, cache_frame_interval: usize) -> Result<FrameIndex> {
        if cache_frame_interval == 0 {
            return Err(GifError::InvalidArgument(
                "cache_frame_interval must be a positive integer".into(),
            ));
        }

        let mut cursor = source.open_at_start()?;
        let header = header::parse_header(&mut cursor)?;

        let mut frames: Vec<FrameDescriptor> = Vec::new();
        let mut pending_gce: Option<stream::GraphicControlExtension> = None;
        let mut loop_count: Option<u16> = None;
        let mut timestamp: u64 = 0;

        loop {
            let introducer = cursor.read_u8()?;
            match introducer {
                TRAILER_BLOCK_ID => break,
                IMAGE_DESCRIPTOR_BLOCK_ID => {
                    // The position just consumed (the 0x2C byte itself) is
                    // the re-parse entry point for replay.
                    let byte_offset = cursor.position()?.saturating_sub(1);

                    let desc_header = stream::parse_image_descriptor_header(&mut cursor)?;
                    if desc_header.has_local_color_table {
                        stream::parse_local_color_table(&mut cursor, desc_header.local_color_table_size)?;
                    }
                    if !desc_header.has_local_color_table && header.global_color_table.is_none() {
                        return Err(GifError::Corrupt(
                            "frame has neither a local nor a global color table".into(),
                        ));
                    }
                    let _min_code_size = cursor.read_u8()?;
                    stream::skip_sub_blocks(&mut cursor)?;

                    if desc_header.left as u32 + desc_header.width as u32 > header.width as u32
                        || desc_header.top as u32 + desc_header.height as u32 > header.height as u32
                    {
                        return Err(GifError::Corrupt(
                            "frame sub-rectangle lies outside the logical screen".into(),
                        ));
                    }

                    let gce = pending_gce.take().unwrap_or_default();
                    let index = frames.len();
                    let this_timestamp = timestamp;
                    timestamp += gce.duration;

                    let is_keyframe = index == 0
                        || compositor::is_natural_keyframe(header.width, header.height, &{
                            // temporary descriptor just for the geometry check
                            FrameDescriptor {
                                index,
                                byte_offset,
                                left: desc_header.left,
                                top: desc_header.top,
                                width: desc_header.width,
                                height: desc_header.height,
                                disposal_method: gce.disposal_method,
                                transparent_color_index: gce.transparent_color_index,
                                duration: gce.duration,
                                timestamp: this_timestamp,
                                uses_local_color_table: desc_header.has_local_color_table,
                                is_keyframe: false,
                                cached_argb: None,
                                cached_restore_snapshot: None,
                            }
                        });

                    frames.push(FrameDescriptor {
                        index,
                        byte_offset,
                        left: desc_header.left,
                        top: desc_header.top,
                        width: desc_header.width,
                        height: desc_header.height,
                        disposal_method: gce.disposal_method,
                        transparent_color_index: gce.transparent_color_index,
                        duration: gce.duration,
                        timestamp: this_timestamp,
                        uses_local_color_table: desc_header.has_local_color_table,
                        is_keyframe,
                        cached_argb: None,
                        cached_restore_snapshot: None,
                    });
                }
                stream::EXTENSION_INTRODUCER_ID => match stream::parse_extension(&mut cursor)? {
                    ExtensionOutcome::GraphicControl(gce) => pending_gce = Some(gce),
                    ExtensionOutcome::LoopCount(count) => loop_count = Some(count),
                    ExtensionOutcome::Ignored => {}
                },
                other => {
                    return Err(GifError::Corrupt(format!(
                        "unrecognized block introducer 0x{:02x}",
                        other
                    )));
                }
            }
        }

        let metadata = StreamMetadata {
            width: header.width,
            height: header.height,
            loop_count: loop_count.unwrap_or(1),
            background_color_index: header.background_color_index,
            global_color_table: header.global_color_table,
            frame_count: frames.len(),
            duration: timestamp,
        };

        if frames.is_empty() {
            return Ok(FrameIndex { metadata, frames });
        }
        if frames[0].timestamp != 0 {
            return Err(GifError::Corrupt("first frame must start at timestamp 0".into()));
        }

        Self::materialize_caches(source, &metadata, &mut frames, cache_frame_interval)?;

        Ok(FrameIndex { metadata, frames })
    }

    /// Decode and composite every `cache_frame_interval`-th frame (and the
    /// frames between it and the nearest earlier keyframe/cache), storing
    /// the resulting canvas so random-access reads never replay more than
    /// `cache_frame_interval` frames.
    fn materialize_caches<S: ByteSource>(
        source: &S,
        metadata: &StreamMetadata,
        frames: &mut [FrameDescriptor],
        cache_frame_interval: usize,
    ) -> Result<()> {
        let mut i = cache_frame_interval - 1;
        while i < frames.len() {
            if !frames[i].is_keyframe {
                let k = nearest_prior_keyframe(frames, i);
                let replayed = replay::replay_range(source, metadata, frames, k, i)?;
                frames[i].cached_argb = Some(replayed.argb);
                frames[i].cached_restore_snapshot = replayed.restore_snapshot;
            }
            i += cache_frame_interval;
        }
        Ok(())
    }
}

/// Greatest `k <= target` such that `frames[k]` is a natural keyframe or
/// already has a materialized cache.
pub(crate) fn nearest_prior_keyframe(frames: &[FrameDescriptor], target: usize) -> usize {
    for k in (0..=target).rev() {
        if frames[k].is_keyframe || frames[k].cached_argb.is_some() {
            return k;
        }
    }
    0
}

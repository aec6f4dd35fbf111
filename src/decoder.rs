//! The public decoder facade: opens a GIF stream, exposes its stream-wide
//! metadata, and answers random-access and sequential frame reads.

use crate::byte_source::ByteSource;
use crate::error::{GifError, Result};
use crate::frame::{FrameTiming, ImageFrame, StreamMetadata};
use crate::frame_index::{self, FrameIndex};
use crate::replay;

/// Number of frames a synthetic cache point is spaced apart by, when no
/// explicit interval is given to [`Decoder::open_with_cache_interval`].
pub const DEFAULT_CACHE_FRAME_INTERVAL: usize = 50;

/// A decoded, random-access-capable GIF stream.
///
/// Built by a single sequential scan over the container (see
/// [`FrameIndex::build`]), after which every frame can be fetched by index
/// or by timestamp without re-scanning from the start: each read replays at
/// most `cache_frame_interval` frames from the nearest keyframe or cache
/// point.
pub struct Decoder<S: ByteSource> {
    source: S,
    index: FrameIndex,
    frame_timings: Vec<FrameTiming>,
    closed: bool,
}

impl<S: ByteSource> Decoder<S> {
    /// Open `source`, scanning it once to build the frame index, using the
    /// default cache interval.
    pub fn open(source: S) -> Result<Decoder<S>> {
        Self::open_with_cache_interval(source, DEFAULT_CACHE_FRAME_INTERVAL)
    }

    /// Open `source` with an explicit `cache_frame_interval`: the maximum
    /// number of frames any single [`Decoder::read_frame`] call will replay.
    /// A smaller interval trades memory (more cached canvases) for faster
    /// random-access reads.
    pub fn open_with_cache_interval(source: S, cache_frame_interval: usize) -> Result<Decoder<S>> {
        let index = FrameIndex::build(&source, cache_frame_interval)?;
        let frame_timings = index
            .frames
            .iter()
            .map(|f| FrameTiming { duration: f.duration, timestamp: f.timestamp })
            .collect();
        Ok(Decoder { source, index, frame_timings, closed: false })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(GifError::Closed)
        } else {
            Ok(())
        }
    }

    pub fn width(&self) -> u16 {
        self.index.metadata.width
    }

    pub fn height(&self) -> u16 {
        self.index.metadata.height
    }

    pub fn frame_count(&self) -> usize {
        self.index.metadata.frame_count
    }

    /// Total animation duration in milliseconds (sum of every frame's delay).
    pub fn duration(&self) -> u64 {
        self.index.metadata.duration
    }

    /// `0` means the animation loops forever; `1` means it plays once.
    pub fn loop_count(&self) -> u16 {
        self.index.metadata.loop_count
    }

    pub fn metadata(&self) -> &StreamMetadata {
        &self.index.metadata
    }

    /// Each frame's duration and start time, in display order.
    pub fn frame_infos(&self) -> &[FrameTiming] {
        &self.frame_timings
    }

    /// Decode and composite the frame at `index`, replaying from the
    /// nearest keyframe or cache point.
    pub fn read_frame(&self, index: usize) -> Result<ImageFrame> {
        self.ensure_open()?;
        let frames = &self.index.frames;
        if index >= frames.len() {
            return Err(GifError::OutOfRange);
        }
        let from = frame_index::nearest_prior_keyframe(frames, index);
        let replayed = replay::replay_range(&self.source, &self.index.metadata, frames, from, index)?;
        let frame = &frames[index];
        Ok(ImageFrame {
            argb: replayed.argb,
            width: self.index.metadata.width,
            height: self.index.metadata.height,
            duration: frame.duration,
            timestamp: frame.timestamp,
            index,
        })
    }

    /// Decode and composite whichever frame is displayed at `timestamp`
    /// milliseconds into the animation (binary search over frame start
    /// times). A `timestamp` at or past the total duration resolves to the
    /// last frame.
    pub fn read_frame_at(&self, timestamp: u64) -> Result<ImageFrame> {
        self.ensure_open()?;
        if self.index.frames.is_empty() {
            return Err(GifError::Empty);
        }
        if timestamp >= self.index.metadata.duration {
            return Err(GifError::InvalidArgument(format!(
                "timestamp {} exceeds total duration {}",
                timestamp, self.index.metadata.duration
            )));
        }
        // Frames without their own graphic control extension share their
        // predecessor's default timestamp, so duplicates are expected;
        // `partition_point` deterministically picks the last match instead
        // of whichever index a binary search happens to land on.
        let index = self.index.frames.partition_point(|f| f.timestamp <= timestamp) - 1;
        self.read_frame(index)
    }

    /// Iterate every frame in display order, decoding each exactly once by
    /// replaying forward from the start. Cheaper than repeated
    /// [`Decoder::read_frame`] calls when the whole animation is wanted.
    pub fn iterate(&self) -> FrameIterator<'_, S> {
        FrameIterator { decoder: self, next_index: 0 }
    }

    /// Release the underlying byte source. Further reads return
    /// [`GifError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.source.close()?;
        Ok(())
    }
}

/// Lazy sequential iterator over every frame, produced by [`Decoder::iterate`].
pub struct FrameIterator<'a, S: ByteSource> {
    decoder: &'a Decoder<S>,
    next_index: usize,
}

impl<'a, S: ByteSource> Iterator for FrameIterator<'a, S> {
    type Item = Result<ImageFrame>;

    fn next(&mut self) -> Option<Result<ImageFrame>> {
        if self.next_index >= self.decoder.frame_count() {
            return None;
        }
        let result = self.decoder.read_frame(self.next_index);
        self.next_index += 1;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_source::InMemoryByteSource;
    use crate::tests_support::build_gif;

    #[test]
    fn reads_single_static_frame() {
        let bytes = build_gif(vec![vec![0, 1, 2, 3]], 2, 2);
        let decoder = Decoder::open(InMemoryByteSource::new(bytes)).unwrap();
        assert_eq!(decoder.frame_count(), 1);
        let frame = decoder.read_frame(0).unwrap();
        assert_eq!(frame.width, 2);
        assert_eq!(frame.height, 2);
    }

    #[test]
    fn out_of_range_index_errors() {
        let bytes = build_gif(vec![vec![0, 1, 2, 3]], 2, 2);
        let decoder = Decoder::open(InMemoryByteSource::new(bytes)).unwrap();
        assert!(matches!(decoder.read_frame(5), Err(GifError::OutOfRange)));
    }

    #[test]
    fn closed_decoder_rejects_reads() {
        let bytes = build_gif(vec![vec![0, 1, 2, 3]], 2, 2);
        let mut decoder = Decoder::open(InMemoryByteSource::new(bytes)).unwrap();
        decoder.close().unwrap();
        assert!(matches!(decoder.read_frame(0), Err(GifError::Closed)));
    }

    #[test]
    fn iterate_visits_every_frame_in_order() {
        let bytes = build_gif(vec![vec![0, 1, 2, 3], vec![1, 1, 1, 1]], 2, 2);
        let decoder = Decoder::open(InMemoryByteSource::new(bytes)).unwrap();
        let frames: Vec<_> = decoder.iterate().collect::<Result<_>>().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[1].index, 1);
    }
}

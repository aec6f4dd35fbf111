//! Random-access GIF87a/GIF89a decoder.
//!
//! A [`Decoder`] scans a GIF stream once, up front, recording each frame's
//! byte offset, timing and disposal metadata along with a handful of
//! synthetic cache points. From there, [`Decoder::read_frame`] and
//! [`Decoder::read_frame_at`] answer individual frame requests without
//! re-decoding the whole stream from the start, by replaying forward from
//! the nearest keyframe or cache point.
//!
//! ```no_run
//! use gif_core::{Decoder, FileByteSource};
//!
//! # fn main() -> gif_core::Result<()> {
//! let source = FileByteSource::open("animation.gif")?;
//! let decoder = Decoder::open(source)?;
//! let frame = decoder.read_frame(0)?;
//! println!("{}x{}, {} frames", decoder.width(), decoder.height(), decoder.frame_count());
//! # let _ = frame;
//! # Ok(())
//! # }
//! ```

mod bit_reader;
mod byte_source;
mod color;
mod compositor;
mod decoder;
mod error;
mod frame;
mod frame_index;
mod header;
mod lzw;
mod replay;
mod stream;

#[cfg(test)]
mod tests_support;

pub use byte_source::{ByteSource, Cursor, FileByteSource, FileCursor, InMemoryByteSource, InMemoryCursor};
pub use color::Rgb;
pub use decoder::{Decoder, FrameIterator, DEFAULT_CACHE_FRAME_INTERVAL};
pub use error::{GifError, Result};
pub use frame::{DisposalMethod, FrameDescriptor, FrameTiming, ImageFrame, StreamMetadata};

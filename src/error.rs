use std::fmt;
use std::io;

/// Errors surfaced by any public operation of this crate.
///
/// Parsing errors during [`crate::Decoder::open`] abort the whole open. Parsing
/// errors during a frame read leave the `Decoder` itself usable for other
/// reads; only the failing call returns an error.
#[derive(Debug)]
pub enum GifError {
    /// The byte at offset 0 is not a recognized `GIF87a`/`GIF89a` signature.
    NotAGif,
    /// A recognized but unsupported variant of the format was encountered.
    Unsupported(String),
    /// A structural violation of the container or LZW stream.
    Corrupt(String),
    /// A frame index outside `[0, frame_count)`.
    OutOfRange,
    /// A negative timestamp, a timestamp beyond the stream duration, or a
    /// non-positive cache interval.
    InvalidArgument(String),
    /// The operation requires at least one frame, but the stream has none.
    Empty,
    /// The decoder was already closed.
    Closed,
    /// The underlying byte source failed.
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, GifError>;

impl fmt::Display for GifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GifError::NotAGif =>
                write!(f, "not a GIF file: missing \"GIF87a\"/\"GIF89a\" signature"),
            GifError::Unsupported(msg) =>
                write!(f, "unsupported GIF variant: {}", msg),
            GifError::Corrupt(msg) =>
                write!(f, "corrupt GIF stream: {}", msg),
            GifError::OutOfRange =>
                write!(f, "frame index out of range"),
            GifError::InvalidArgument(msg) =>
                write!(f, "invalid argument: {}", msg),
            GifError::Empty =>
                write!(f, "decoder has no frames"),
            GifError::Closed =>
                write!(f, "decoder was closed"),
            GifError::Io(err) =>
                write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for GifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GifError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GifError {
    /// Running out of bytes mid-structure is a truncated stream, not a
    /// backing-store failure — `Corrupt`, not `Io`, so callers can treat
    /// every read-past-the-end as the same "malformed input" case a GIF
    /// decoder should always be resilient to.
    fn from(err: io::Error) -> GifError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            GifError::Corrupt(format!("unexpected end of stream: {}", err))
        } else {
            GifError::Io(err)
        }
    }
}

//! Types shared by the frame index and the composition pass: the per-frame
//! descriptor produced by the first parse pass, and the `ImageFrame` handed
//! back to callers of the decoder facade.

/// Disposal method applied to a frame's sub-rectangle after it has been
/// displayed, before the next frame is composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposalMethod {
    Unspecified,
    DoNotDispose,
    RestoreToBackground,
    RestoreToPrevious,
}

impl Default for DisposalMethod {
    fn default() -> Self {
        DisposalMethod::Unspecified
    }
}

impl DisposalMethod {
    pub(crate) fn from_packed_bits(bits: u8) -> DisposalMethod {
        match bits {
            1 => DisposalMethod::DoNotDispose,
            2 => DisposalMethod::RestoreToBackground,
            3 => DisposalMethod::RestoreToPrevious,
            _ => DisposalMethod::Unspecified,
        }
    }
}

/// One animation frame's static metadata, captured by the first parse pass
/// so that random-access reads never need to re-walk graphic control state.
#[derive(Debug, Clone)]
pub struct FrameDescriptor {
    pub index: usize,
    /// Absolute byte offset of this frame's image descriptor (`0x2C` byte),
    /// used as the re-parse entry point for replay.
    pub byte_offset: u64,
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub disposal_method: DisposalMethod,
    pub transparent_color_index: Option<u8>,
    /// Display duration in milliseconds (delay `0` already raised to 100ms).
    pub duration: u64,
    /// Cumulative duration of all prior frames, in milliseconds.
    pub timestamp: u64,
    pub uses_local_color_table: bool,
    pub is_keyframe: bool,
    /// Populated only for frames at multiples of `cache_frame_interval`: the
    /// fully composited canvas as it should be observed for this frame.
    pub(crate) cached_argb: Option<Vec<u32>>,
    /// Carried only when `cached_argb` is set and `disposal_method` is
    /// `RestoreToPrevious`: the disposal-snapshot baseline that was live when
    /// this frame was composited, needed to dispose it correctly when a later
    /// read resumes replay from this cache point. Not part of the public data
    /// model; pure replay bookkeeping.
    pub(crate) cached_restore_snapshot: Option<Vec<u32>>,
}

/// A frame's duration and start time, the only per-frame metadata exposed
/// by [`crate::Decoder::frame_infos`] — internal replay bookkeeping such as
/// `byte_offset` or disposal method stays off the public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    /// Display duration in milliseconds (delay `0` already raised to 100ms).
    pub duration: u64,
    /// Cumulative duration of all prior frames, in milliseconds.
    pub timestamp: u64,
}

/// Stream-wide metadata gathered during the first parse pass.
#[derive(Debug, Clone)]
pub struct StreamMetadata {
    pub width: u16,
    pub height: u16,
    /// `0` means infinite looping; absent `NETSCAPE2.0` extension is
    /// represented as `1` (play once).
    pub loop_count: u16,
    pub background_color_index: u8,
    pub global_color_table: Option<Vec<crate::color::Rgb>>,
    pub frame_count: usize,
    /// Sum of every frame's duration, in milliseconds.
    pub duration: u64,
}

/// A fully composited frame as returned by the decoder facade.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    pub argb: Vec<u32>,
    pub width: u16,
    pub height: u16,
    pub duration: u64,
    pub timestamp: u64,
    pub index: usize,
}

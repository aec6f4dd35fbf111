//! Applies a decoded sub-image onto a running ARGB canvas and carries out
//! the disposal transition between frames.

use crate::color::Rgb;
use crate::frame::{DisposalMethod, FrameDescriptor, StreamMetadata};

/// Write `indices` (row-major over the frame's own sub-rect, length
/// `width * height`) onto `canvas` (row-major over the logical screen).
/// Pixels equal to `transparent_index` are left untouched.
pub fn apply(
    canvas: &mut [u32],
    screen_width: u16,
    frame: &FrameDescriptor,
    color_table: &[Rgb],
    transparent_index: Option<u8>,
    indices: &[u8],
) {
    let screen_width = screen_width as usize;
    let left = frame.left as usize;
    let top = frame.top as usize;
    let width = frame.width as usize;
    let height = frame.height as usize;

    for y in 0..height {
        for x in 0..width {
            let idx = indices[y * width + x];
            if Some(idx) == transparent_index {
                continue;
            }
            let color = match color_table.get(idx as usize) {
                Some(color) => color,
                None => continue,
            };
            let canvas_idx = (top + y) * screen_width + (left + x);
            if let Some(pixel) = canvas.get_mut(canvas_idx) {
                *pixel = color.to_opaque_argb();
            }
        }
    }
}

/// Transition the canvas from "just displayed frame" to "ready for the next
/// frame's apply step", per `frame`'s disposal method. `restore_snapshot` is
/// the canvas state immediately before the most recent apply whose disposal
/// was not itself `RestoreToPrevious` (see the refresh rule in
/// [`refresh_restore_snapshot`]).
pub fn dispose(
    canvas: &mut [u32],
    screen_width: u16,
    metadata: &StreamMetadata,
    frame: &FrameDescriptor,
    restore_snapshot: &[u32],
) {
    match frame.disposal_method {
        DisposalMethod::Unspecified | DisposalMethod::DoNotDispose => {}
        DisposalMethod::RestoreToBackground => {
            fill_rect(canvas, screen_width, frame, background_fill_color(metadata, frame));
        }
        DisposalMethod::RestoreToPrevious => {
            restore_rect(canvas, screen_width, frame, restore_snapshot);
        }
    }
}

/// `RestoreToBackground` fills with the global background color, unless the
/// background index is out of range or the frame used a local color table —
/// in both cases this falls back to fully transparent, matching widely
/// compatible browser behavior on an otherwise-ambiguous corner of GIF89a.
fn background_fill_color(metadata: &StreamMetadata, frame: &FrameDescriptor) -> u32 {
    if frame.uses_local_color_table {
        return 0x0000_0000;
    }
    match &metadata.global_color_table {
        Some(gct) => gct
            .get(metadata.background_color_index as usize)
            .map(|c| c.to_opaque_argb())
            .unwrap_or(0x0000_0000),
        None => 0x0000_0000,
    }
}

fn fill_rect(canvas: &mut [u32], screen_width: u16, frame: &FrameDescriptor, color: u32) {
    let screen_width = screen_width as usize;
    let left = frame.left as usize;
    let top = frame.top as usize;
    for y in 0..frame.height as usize {
        let row_start = (top + y) * screen_width + left;
        for pixel in &mut canvas[row_start..row_start + frame.width as usize] {
            *pixel = color;
        }
    }
}

fn restore_rect(canvas: &mut [u32], screen_width: u16, frame: &FrameDescriptor, snapshot: &[u32]) {
    let screen_width = screen_width as usize;
    let left = frame.left as usize;
    let top = frame.top as usize;
    for y in 0..frame.height as usize {
        let row_start = (top + y) * screen_width + left;
        let row_end = row_start + frame.width as usize;
        canvas[row_start..row_end].copy_from_slice(&snapshot[row_start..row_end]);
    }
}

/// Whether the disposal-snapshot baseline must be refreshed (set to the
/// current canvas) before applying the frame that follows `prev_disposal`.
/// It refreshes whenever the previous frame's disposal was *not*
/// `RestoreToPrevious` — repeated previous-restores must keep collapsing
/// toward the same older reference rather than chaining off one another.
pub fn refresh_restore_snapshot(prev_disposal: Option<DisposalMethod>) -> bool {
    !matches!(prev_disposal, Some(DisposalMethod::RestoreToPrevious))
}

/// Whether a frame's sub-rectangle, taken together with having no
/// transparent color index, fully overwrites the logical screen — the
/// natural keyframe rule.
pub fn is_natural_keyframe(metadata_width: u16, metadata_height: u16, frame: &FrameDescriptor) -> bool {
    frame.transparent_color_index.is_none()
        && frame.left == 0
        && frame.top == 0
        && frame.width == metadata_width
        && frame.height == metadata_height
}

//! Pixel / time / frame mapping shared by every timeline component.
//!
//! Timeline positions are stored in pixel-units at a fixed scale of
//! 100 px per second, with one frame every 4 px (25 fps). Display-only
//! settings elsewhere may show a different fps; they never feed into this
//! arithmetic.

pub const PIXELS_PER_SECOND: f64 = 100.0;
pub const PIXELS_PER_FRAME: f64 = 4.0;
pub const FRAME_RATE: f64 = PIXELS_PER_SECOND / PIXELS_PER_FRAME;

/// Index of the frame containing `pos`.
pub fn frame_index(pos: f64) -> i64 {
    (pos / PIXELS_PER_FRAME).floor() as i64
}

/// Pixel position of the start of `frame`.
pub fn frame_to_px(frame: i64) -> f64 {
    frame as f64 * PIXELS_PER_FRAME
}

/// Round `pos` down to the nearest frame boundary.
pub fn snap(pos: f64) -> f64 {
    frame_to_px(frame_index(pos))
}

/// Quantize a drag delta to whole frames, rounding to the nearest frame so
/// that small backwards and forwards motions behave the same.
pub fn quantize_delta(delta: f64) -> f64 {
    (delta / PIXELS_PER_FRAME).round() * PIXELS_PER_FRAME
}

pub fn px_to_seconds(pos: f64) -> f64 {
    pos / PIXELS_PER_SECOND
}

pub fn seconds_to_px(seconds: f64) -> f64 {
    seconds * PIXELS_PER_SECOND
}

/// Format a position as `HH:MM:SS:FF`. The hour field is always `00` and
/// minutes are not wrapped.
pub fn format_timecode(pos: f64) -> String {
    let pos = pos.max(0.0);
    let minutes = (pos / PIXELS_PER_SECOND / 60.0).floor() as u64;
    let seconds = (pos / PIXELS_PER_SECOND).floor() as u64 % 60;
    let frames = ((pos % PIXELS_PER_SECOND) / PIXELS_PER_FRAME).floor() as u64;
    format!("00:{:02}:{:02}:{:02}", minutes, seconds, frames)
}

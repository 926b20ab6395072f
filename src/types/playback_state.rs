use crate::types::coords::{frame_index, frame_to_px, snap};

/// The playhead clock and monitor transport state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Timeline position in pixel-units.
    pub playhead: f64,
    pub is_playing: bool,
    /// Monitor volume, 0..=100.
    pub global_volume: f64,
    pub muted: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            playhead: 0.0,
            is_playing: false,
            global_volume: 80.0,
            muted: false,
        }
    }

    pub fn with_volume(global_volume: f64) -> Self {
        Self {
            global_volume: global_volume.clamp(0.0, 100.0),
            ..Self::new()
        }
    }

    /// Place the playhead from a pointer position: clamped at 0, snapped down
    /// to the frame boundary. Returns the committed position.
    pub fn seek_to(&mut self, pos: f64) -> f64 {
        self.playhead = snap(pos.max(0.0));
        self.playhead
    }

    /// Move by whole frames from the current frame, never before frame 0.
    pub fn step_frames(&mut self, frames: i64) -> f64 {
        let target = (frame_index(self.playhead) + frames).max(0);
        self.playhead = frame_to_px(target);
        self.playhead
    }

    pub fn go_to_frame(&mut self, frame: i64) -> f64 {
        self.playhead = frame_to_px(frame.max(0));
        self.playhead
    }

    pub fn toggle_playing(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

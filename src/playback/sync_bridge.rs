use crate::config::PreviewConfig;
use crate::playback::media_element::MediaElement;
use crate::types::coords::px_to_seconds;
use crate::types::media::Clip;

/// Where the media element should be, in source seconds, for a clip placed at
/// `clip_start` when the playhead is at `playhead`.
pub fn target_time(playhead: f64, clip_start: f64) -> f64 {
    (px_to_seconds(playhead) - px_to_seconds(clip_start)).max(0.0)
}

/// Monitor volume (0..=100, zeroed when muted) scaled by the clip's own
/// volume (0..=100), as a 0..=1 gain.
pub fn effective_volume(global_volume: f64, muted: bool, clip_volume: f64) -> f64 {
    let global = if muted { 0.0 } else { global_volume / 100.0 };
    global.clamp(0.0, 1.0) * (clip_volume / 100.0).clamp(0.0, 1.0)
}

/// Whether the element is far enough from `target` to be worth a seek. While
/// playing the element's own clock is trusted within a loose tolerance; while
/// scrubbing it has to land on the frame.
pub fn needs_seek(media_time: f64, target: f64, is_playing: bool, config: &PreviewConfig) -> bool {
    if !target.is_finite() {
        return false;
    }
    let tolerance = if is_playing {
        config.playing_tolerance
    } else {
        config.scrub_tolerance
    };
    (media_time - target).abs() > tolerance
}

/// Pushes playhead, volume and transport changes into a media element,
/// remembering what it last pushed so unchanged state is not re-sent.
#[derive(Debug, Clone, Default)]
pub struct SyncBridge {
    config: PreviewConfig,
    last_clip_id: Option<String>,
    last_playing: Option<bool>,
    last_volume: Option<f64>,
}

impl SyncBridge {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Seeks the element when it has drifted from the playhead. Synthetic
    /// clips are never synced. Returns whether a seek was issued.
    pub fn sync_time(
        &self,
        media: &mut dyn MediaElement,
        clip: &Clip,
        playhead: f64,
        is_playing: bool,
    ) -> bool {
        if !clip.is_playable() {
            return false;
        }
        let target = target_time(playhead, clip.start);
        if needs_seek(media.current_time(), target, is_playing, &self.config) {
            log::debug!("Seek {} to {:.3}s", clip.id, target);
            media.set_current_time(target);
            return true;
        }
        false
    }

    /// Returns whether a new volume was pushed.
    pub fn sync_volume(
        &mut self,
        media: &mut dyn MediaElement,
        global_volume: f64,
        muted: bool,
        clip_volume: f64,
    ) -> bool {
        let volume = effective_volume(global_volume, muted, clip_volume);
        if self.last_volume == Some(volume) {
            return false;
        }
        media.set_volume(volume);
        self.last_volume = Some(volume);
        true
    }

    /// Starts or pauses the element when `is_playing` or the previewed clip
    /// changed. A superseded play request is ignored; any other refusal is
    /// logged and playback state is left alone.
    pub fn sync_transport(
        &mut self,
        media: &mut dyn MediaElement,
        clip_id: Option<&str>,
        is_playing: bool,
    ) {
        let clip_changed = self.last_clip_id.as_deref() != clip_id;
        if !clip_changed && self.last_playing == Some(is_playing) {
            return;
        }
        self.last_clip_id = clip_id.map(str::to_string);
        self.last_playing = Some(is_playing);
        if clip_changed {
            // A new source starts at its own volume.
            self.last_volume = None;
        }

        if !is_playing {
            media.pause();
            return;
        }
        match media.play() {
            Ok(()) => {}
            Err(e) if e.is_abort() => {}
            Err(e) => log::warn!("Playback error: {}", e),
        }
    }

    /// Forget everything pushed so far; the next sync re-sends all state.
    pub fn reset(&mut self) {
        self.last_clip_id = None;
        self.last_playing = None;
        self.last_volume = None;
    }
}

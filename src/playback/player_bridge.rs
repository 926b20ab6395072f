use crate::playback::media_element::MediaElement;
use crate::playback::sync_bridge::SyncBridge;
use crate::types::coords::{seconds_to_px, snap};
use crate::types::session::EditSession;
use std::time::Instant;

/// Drives one media element from an editing session, once per UI frame.
///
/// While a playable clip is previewed and playing, the element's clock moves
/// the playhead. Otherwise the playhead is advanced by wall-clock time.
pub struct PlayerBridge {
    media: Box<dyn MediaElement>,
    sync: SyncBridge,
    loaded_path: Option<String>,
    last_update: Instant,
    /// Unsnapped wall-clock position, so sub-frame updates accumulate.
    clock_pos: f64,
    /// Playhead as this bridge left it. A different value on the next frame
    /// means the user seeked.
    last_playhead: Option<f64>,
}

impl PlayerBridge {
    pub fn new(media: Box<dyn MediaElement>, sync: SyncBridge) -> Self {
        Self {
            media,
            sync,
            loaded_path: None,
            last_update: Instant::now(),
            clock_pos: 0.0,
            last_playhead: None,
        }
    }

    pub fn loaded_path(&self) -> Option<&str> {
        self.loaded_path.as_deref()
    }

    pub fn update(&mut self, session: &mut EditSession) {
        self.update_at(session, Instant::now());
    }

    /// Advance playback to `now`.
    pub fn update_at(&mut self, session: &mut EditSession, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;

        let clip = session.preview_clip().filter(|c| c.is_playable());
        let Some(clip) = clip else {
            self.sync.sync_transport(self.media.as_mut(), None, false);
            self.advance_clock(session, elapsed);
            self.last_playhead = Some(session.playback.playhead);
            return;
        };

        if self.loaded_path.as_deref() != Some(clip.path.as_str()) {
            if let Err(e) = self.media.load(&clip.path) {
                log::warn!("Could not load {}: {}", clip.path, e);
            }
            self.loaded_path = Some(clip.path.clone());
            self.sync.reset();
        }

        let playback = &mut session.playback;
        self.sync
            .sync_transport(self.media.as_mut(), Some(&clip.id), playback.is_playing);

        let track_muted = session
            .timeline
            .track_of(&clip.id)
            .is_some_and(|t| session.timeline.track_flags(t).muted);
        self.sync.sync_volume(
            self.media.as_mut(),
            playback.global_volume,
            playback.muted || track_muted,
            clip.params.volume(),
        );

        let seeked = self.last_playhead.is_some_and(|p| p != playback.playhead);
        // A seek is pushed to the media first; its clock is adopted next frame.
        if playback.is_playing && !seeked {
            if self.media.is_ended() {
                log::debug!("{} ended", clip.id);
                playback.stop();
                self.sync
                    .sync_transport(self.media.as_mut(), Some(&clip.id), false);
            } else {
                playback.playhead =
                    snap(clip.start + seconds_to_px(self.media.current_time()));
            }
        }
        self.sync.sync_time(
            self.media.as_mut(),
            &clip,
            playback.playhead,
            playback.is_playing,
        );
        self.clock_pos = playback.playhead;
        self.last_playhead = Some(playback.playhead);
    }

    fn advance_clock(&mut self, session: &mut EditSession, elapsed: f64) {
        let playback = &mut session.playback;
        // Someone else moved the playhead since the last frame.
        if snap(self.clock_pos) != playback.playhead {
            self.clock_pos = playback.playhead;
        }
        if playback.is_playing {
            self.clock_pos += seconds_to_px(elapsed);
            playback.playhead = snap(self.clock_pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::transport::{TransportKey, handle_key};
    use crate::playback::media_element::ClockMedia;
    use crate::types::media::{AssetPayload, ClipKind};
    use crate::types::track::TrackFlag;
    use std::time::Duration;

    fn bridge() -> PlayerBridge {
        PlayerBridge::new(Box::new(ClockMedia::new()), SyncBridge::default())
    }

    #[test]
    fn test_wall_clock_advance_without_clip() {
        let mut session = EditSession::default();
        let mut bridge = bridge();
        let start = Instant::now();
        bridge.update_at(&mut session, start);

        session.playback.is_playing = true;
        bridge.update_at(&mut session, start + Duration::from_millis(10));
        bridge.update_at(&mut session, start + Duration::from_millis(20));
        bridge.update_at(&mut session, start + Duration::from_millis(30));
        // 3px of travel has not crossed a frame yet.
        assert_eq!(session.playback.playhead, 0.0);

        bridge.update_at(&mut session, start + Duration::from_millis(530));
        assert_eq!(session.playback.playhead, 52.0);
    }

    #[test]
    fn test_paused_clock_does_not_move() {
        let mut session = EditSession::default();
        session.playback.seek_to(100.0);
        let mut bridge = bridge();
        let start = Instant::now();
        bridge.update_at(&mut session, start);
        bridge.update_at(&mut session, start + Duration::from_secs(2));
        assert_eq!(session.playback.playhead, 100.0);
    }

    #[test]
    fn test_loads_preview_clip_and_follows_scrub() {
        let mut session = EditSession::default();
        let payload = AssetPayload::new("a.mp4", "/media/a.mp4", ClipKind::Video);
        session.timeline.insert_clip("v1", &payload, 100.0).unwrap();
        session.playback.seek_to(160.0);

        let mut bridge = bridge();
        bridge.update(&mut session);
        assert_eq!(bridge.loaded_path(), Some("/media/a.mp4"));
        assert_eq!(session.playback.playhead, 160.0);
        assert!((bridge.media.current_time() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_transitions_are_not_loaded() {
        let mut session = EditSession::default();
        let payload =
            AssetPayload::new("Cross Dissolve", "builtin:cross_dissolve", ClipKind::Transition);
        session.timeline.insert_clip("v1", &payload, 0.0).unwrap();
        session.playback.seek_to(8.0);
        let mut bridge = bridge();
        bridge.update(&mut session);
        assert_eq!(bridge.loaded_path(), None);
    }

    #[test]
    fn test_hidden_track_clip_is_not_previewed() {
        let mut session = EditSession::default();
        let payload = AssetPayload::new("a.mp4", "/media/a.mp4", ClipKind::Video);
        session.timeline.insert_clip("v1", &payload, 0.0).unwrap();
        session.toggle_track_flag("v1", TrackFlag::Hidden);
        let mut bridge = bridge();
        bridge.update(&mut session);
        assert_eq!(bridge.loaded_path(), None);
    }

    #[test]
    fn test_seek_while_playing_moves_media() {
        let mut session = EditSession::default();
        let payload = AssetPayload::new("a.mp4", "/media/a.mp4", ClipKind::Video);
        session.timeline.insert_clip("v1", &payload, 0.0).unwrap();
        session.playback.is_playing = true;

        let mut bridge = bridge();
        bridge.update(&mut session);
        for _ in 0..3 {
            handle_key(&mut session, TransportKey::L, false);
        }
        assert_eq!(session.playback.playhead, 120.0);

        bridge.update(&mut session);
        assert_eq!(session.playback.playhead, 120.0);
        assert!((bridge.media.current_time() - 1.2).abs() < 0.05);

        // The next frame follows the media clock from the new spot.
        bridge.update(&mut session);
        assert!(session.playback.playhead >= 120.0);
        assert!(session.playback.is_playing);
    }

    #[test]
    fn test_ended_media_stops_playback() {
        let mut session = EditSession::default();
        let payload = AssetPayload::new("a.mp4", "/media/a.mp4", ClipKind::Video);
        session.timeline.insert_clip("v1", &payload, 0.0).unwrap();
        session.playback.is_playing = true;

        let mut bridge =
            PlayerBridge::new(Box::new(ClockMedia::with_duration(0.0)), SyncBridge::default());
        bridge.update(&mut session);
        bridge.update(&mut session);
        assert!(!session.playback.is_playing);
    }
}

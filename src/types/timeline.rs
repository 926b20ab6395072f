use crate::error::{CutlineError, Result};
use crate::ops::clip_ops::{cut_clip_at, moved, trimmed_left, trimmed_right};
use crate::types::media::{
    AUDIO_COLOR, AssetPayload, Clip, ClipKind, ClipParams, ClipSpan, MEDIA_WIDTH, ParamUpdate,
    TRANSITION_COLOR, TRANSITION_WIDTH, VIDEO_COLOR,
};
use crate::types::track::{Track, TrackFlag, TrackFlags, TrackKind, TrackStates};
use log::{debug, info};

/// The clip/track store: ordered video tracks, ordered audio tracks and the
/// gating side-table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub video_tracks: Vec<Track>,
    pub audio_tracks: Vec<Track>,
    pub track_states: TrackStates,
}

/// One clip replaced by a split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub track_id: String,
    pub track_kind: TrackKind,
    /// The clip as it was before the cut.
    pub parent: Clip,
    pub left_id: String,
    pub right_id: String,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh project layout: one video track and one audio track.
    pub fn with_default_tracks() -> Self {
        let mut timeline = Self::new();
        timeline.add_track(TrackKind::Video);
        timeline.add_track(TrackKind::Audio);
        timeline
    }

    fn tracks_of(&self, kind: TrackKind) -> &[Track] {
        match kind {
            TrackKind::Video => &self.video_tracks,
            TrackKind::Audio => &self.audio_tracks,
        }
    }

    fn tracks_of_mut(&mut self, kind: TrackKind) -> &mut Vec<Track> {
        match kind {
            TrackKind::Video => &mut self.video_tracks,
            TrackKind::Audio => &mut self.audio_tracks,
        }
    }

    /// Video tracks first, then audio tracks.
    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.video_tracks.iter().chain(self.audio_tracks.iter())
    }

    fn all_tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.video_tracks
            .iter_mut()
            .chain(self.audio_tracks.iter_mut())
    }

    /// Appends a new empty track and returns its sequential id.
    pub fn add_track(&mut self, kind: TrackKind) -> String {
        let tracks = self.tracks_of_mut(kind);
        let id = format!("{}{}", kind.id_prefix(), tracks.len() + 1);
        tracks.push(Track::new(id.clone(), kind));
        debug!("Added track {}", id);
        id
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.all_tracks().find(|t| t.id == track_id)
    }

    fn track_mut(&mut self, track_id: &str) -> Option<&mut Track> {
        self.all_tracks_mut().find(|t| t.id == track_id)
    }

    pub fn find_clip(&self, clip_id: &str) -> Option<&Clip> {
        self.all_tracks().find_map(|t| t.clip(clip_id))
    }

    pub fn find_clip_mut(&mut self, clip_id: &str) -> Option<&mut Clip> {
        self.all_tracks_mut().find_map(|t| t.clip_mut(clip_id))
    }

    /// Id of the track that owns `clip_id`.
    pub fn track_of(&self, clip_id: &str) -> Option<&str> {
        self.all_tracks()
            .find(|t| t.clip(clip_id).is_some())
            .map(|t| t.id.as_str())
    }

    pub fn track_flags(&self, track_id: &str) -> TrackFlags {
        self.track_states.flags(track_id)
    }

    pub fn is_locked(&self, track_id: &str) -> bool {
        self.track_states.is_set(track_id, TrackFlag::Locked)
    }

    /// Flip `flag` on `track_id` and return the new value.
    pub fn toggle_track_flag(&mut self, track_id: &str, flag: TrackFlag) -> bool {
        let value = self.track_states.toggle(track_id, flag);
        info!("Track {} {:?} -> {}", track_id, flag, value);
        value
    }

    fn ensure_unlocked(&self, track_id: &str) -> Result<()> {
        if self.is_locked(track_id) {
            return Err(CutlineError::locked(track_id));
        }
        Ok(())
    }

    /// Places a new clip built from `payload` on `track_id` at `drop_px`.
    ///
    /// `drop_px` is used as given apart from clamping at 0. Callers holding a
    /// raw pointer position snap it first, as [`EditSession::drop_payload`]
    /// does.
    ///
    /// Returns the new clip id, `Ok(None)` when the track does not exist or the
    /// payload is empty, and `Err(TrackLocked)` for a locked track.
    ///
    /// [`EditSession::drop_payload`]: crate::types::session::EditSession::drop_payload
    pub fn insert_clip(
        &mut self,
        track_id: &str,
        payload: &AssetPayload,
        drop_px: f64,
    ) -> Result<Option<String>> {
        self.ensure_unlocked(track_id)?;
        if !payload.is_present() {
            debug!("Ignoring drop with empty payload on {}", track_id);
            return Ok(None);
        }
        let Some(track) = self.track_mut(track_id) else {
            debug!("Ignoring drop on unknown track {}", track_id);
            return Ok(None);
        };

        let is_transition = payload.kind == ClipKind::Transition;
        let color = if is_transition {
            TRANSITION_COLOR
        } else {
            match track.kind {
                TrackKind::Video => VIDEO_COLOR,
                TrackKind::Audio => AUDIO_COLOR,
            }
        };
        let clip = Clip {
            id: format!("clip-{}", uuid::Uuid::new_v4().simple()),
            name: payload.name.clone(),
            path: payload.path.clone(),
            kind: payload.kind,
            start: drop_px.max(0.0),
            width: if is_transition {
                TRANSITION_WIDTH
            } else {
                MEDIA_WIDTH
            },
            color,
            params: ClipParams::default(),
        };
        info!(
            "Inserted {} on {} at {} (width {})",
            clip.name, track.id, clip.start, clip.width
        );
        let id = clip.id.clone();
        track.clips.push(clip);
        Ok(Some(id))
    }

    /// Writes `span` into a clip of an unlocked track. `Ok(false)` when the
    /// clip is not on that track.
    fn set_span(&mut self, clip_id: &str, track_id: &str, span: ClipSpan) -> Result<bool> {
        self.ensure_unlocked(track_id)?;
        let Some(clip) = self.track_mut(track_id).and_then(|t| t.clip_mut(clip_id)) else {
            return Ok(false);
        };
        clip.start = span.start;
        clip.width = span.width;
        Ok(true)
    }

    /// Repositions a clip to `origin.start + delta` (clamped at 0).
    pub fn move_clip(
        &mut self,
        clip_id: &str,
        track_id: &str,
        origin: ClipSpan,
        delta: f64,
    ) -> Result<bool> {
        self.set_span(clip_id, track_id, moved(origin, delta))
    }

    /// Drags the left edge. A trim that would leave less than one pixel-unit
    /// is rejected and the clip stays as it is.
    pub fn trim_left(
        &mut self,
        clip_id: &str,
        track_id: &str,
        origin: ClipSpan,
        delta: f64,
    ) -> Result<bool> {
        self.ensure_unlocked(track_id)?;
        match trimmed_left(origin, delta) {
            Some(span) => self.set_span(clip_id, track_id, span),
            None => Ok(false),
        }
    }

    /// Drags the right edge; width never drops below one pixel-unit.
    pub fn trim_right(
        &mut self,
        clip_id: &str,
        track_id: &str,
        origin: ClipSpan,
        delta: f64,
    ) -> Result<bool> {
        self.set_span(clip_id, track_id, trimmed_right(origin, delta))
    }

    /// Splits at `position` in the first video track and the first audio track
    /// that hold a clip strictly spanning it. Each split clip is replaced in
    /// place by its two parts. Empty when nothing spans `position`.
    pub fn split_at(&mut self, position: f64) -> Vec<SplitOutcome> {
        let mut outcomes = Vec::new();
        for kind in [TrackKind::Video, TrackKind::Audio] {
            for track in self.tracks_of_mut(kind).iter_mut() {
                let Some(idx) = track.clips.iter().position(|c| c.spans(position)) else {
                    continue;
                };
                let Some((left, right)) = cut_clip_at(&track.clips[idx], position) else {
                    continue;
                };
                let outcome = SplitOutcome {
                    track_id: track.id.clone(),
                    track_kind: kind,
                    parent: track.clips[idx].clone(),
                    left_id: left.id.clone(),
                    right_id: right.id.clone(),
                };
                track.clips.remove(idx);
                track.clips.insert(idx, right);
                track.clips.insert(idx, left);
                info!(
                    "Split {} on {} at {}",
                    outcome.parent.id, outcome.track_id, position
                );
                outcomes.push(outcome);
                break;
            }
        }
        outcomes
    }

    /// Removes a clip from whichever track holds it. Not gated by lock state.
    pub fn delete_clip(&mut self, clip_id: &str) -> bool {
        for track in self.all_tracks_mut() {
            if let Some(idx) = track.position_of(clip_id) {
                track.clips.remove(idx);
                info!("Deleted {} from {}", clip_id, track.id);
                return true;
            }
        }
        false
    }

    /// The clip the preview shows at `position`: the topmost visible video
    /// track (last in the list) wins. Edges are inclusive.
    pub fn active_clip_at(&self, position: f64) -> Option<&Clip> {
        self.tracks_of(TrackKind::Video)
            .iter()
            .rev()
            .filter(|t| !self.track_states.is_set(&t.id, TrackFlag::Hidden))
            .find_map(|t| t.clips.iter().find(|c| c.covers(position)))
    }

    /// Right edge of the last clip, or 0 for an empty timeline.
    pub fn content_end(&self) -> f64 {
        self.all_tracks()
            .flat_map(|t| t.clips.iter())
            .map(|c| c.end())
            .fold(0.0, f64::max)
    }

    /// Applies an inspector override to a clip. Not lock-gated.
    pub fn update_clip_param(&mut self, clip_id: &str, update: ParamUpdate) -> bool {
        match self.find_clip_mut(clip_id) {
            Some(clip) => {
                clip.params.apply(update);
                true
            }
            None => false,
        }
    }

    /// Points a clip at a new source, e.g. the output of a backend action.
    pub fn replace_clip_source(&mut self, clip_id: &str, path: &str, name: &str) -> bool {
        match self.find_clip_mut(clip_id) {
            Some(clip) => {
                clip.path = path.to_string();
                clip.name = name.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_payload() -> AssetPayload {
        AssetPayload::new("shot.mp4", "/media/shot.mp4", ClipKind::Video)
    }

    fn clip(id: &str, start: f64, width: f64) -> Clip {
        Clip {
            id: id.to_string(),
            name: format!("{}.mp4", id),
            path: format!("/media/{}.mp4", id),
            kind: ClipKind::Video,
            start,
            width,
            color: VIDEO_COLOR,
            params: ClipParams::default(),
        }
    }

    fn timeline_with(video: Vec<Clip>, audio: Vec<Clip>) -> Timeline {
        let mut timeline = Timeline::with_default_tracks();
        timeline.video_tracks[0].clips = video;
        timeline.audio_tracks[0].clips = audio;
        timeline
    }

    fn span(start: f64, width: f64) -> ClipSpan {
        ClipSpan { start, width }
    }

    #[test]
    fn test_add_track_ids_are_sequential() {
        let mut timeline = Timeline::with_default_tracks();
        assert_eq!(timeline.add_track(TrackKind::Video), "v2");
        assert_eq!(timeline.add_track(TrackKind::Video), "v3");
        assert_eq!(timeline.add_track(TrackKind::Audio), "a2");
        assert_eq!(timeline.video_tracks.len(), 3);
        assert_eq!(timeline.audio_tracks.len(), 2);
    }

    #[test]
    fn test_insert_video_clip() {
        let mut timeline = Timeline::with_default_tracks();
        let id = timeline
            .insert_clip("v1", &video_payload(), 150.0)
            .unwrap()
            .unwrap();
        let clip = timeline.find_clip(&id).unwrap();
        assert_eq!(clip.start, 150.0);
        assert_eq!(clip.width, 200.0);
        assert_eq!(clip.color, VIDEO_COLOR);
        assert!(id.starts_with("clip-"));
    }

    #[test]
    fn test_insert_transition_and_audio_colors() {
        let mut timeline = Timeline::with_default_tracks();
        let wipe = AssetPayload::new("Wipe", "builtin:wipe", ClipKind::Transition);
        let id = timeline.insert_clip("a1", &wipe, -30.0).unwrap().unwrap();
        let clip = timeline.find_clip(&id).unwrap();
        assert_eq!(clip.start, 0.0);
        assert_eq!(clip.width, 40.0);
        assert_eq!(clip.color, TRANSITION_COLOR);

        let song = AssetPayload::new("song.wav", "/media/song.wav", ClipKind::Audio);
        let id = timeline.insert_clip("a1", &song, 10.0).unwrap().unwrap();
        assert_eq!(timeline.find_clip(&id).unwrap().color, AUDIO_COLOR);
    }

    #[test]
    fn test_insert_on_locked_track_is_rejected() {
        let mut timeline = Timeline::with_default_tracks();
        timeline.toggle_track_flag("v1", TrackFlag::Locked);
        let result = timeline.insert_clip("v1", &video_payload(), 150.0);
        assert!(matches!(
            result,
            Err(CutlineError::TrackLocked { ref track_id }) if track_id == "v1"
        ));
        assert!(timeline.video_tracks[0].clips.is_empty());
    }

    #[test]
    fn test_insert_without_target_is_noop() {
        let mut timeline = Timeline::with_default_tracks();
        assert_eq!(timeline.insert_clip("v7", &video_payload(), 0.0).unwrap(), None);
        let empty = AssetPayload::new("", "", ClipKind::Video);
        assert_eq!(timeline.insert_clip("v1", &empty, 0.0).unwrap(), None);
        assert!(timeline.video_tracks[0].clips.is_empty());
    }

    #[test]
    fn test_move_clip() {
        let mut timeline = timeline_with(vec![clip("c1", 100.0, 200.0)], vec![]);
        assert!(timeline.move_clip("c1", "v1", span(100.0, 200.0), 60.0).unwrap());
        assert_eq!(timeline.find_clip("c1").unwrap().span(), span(160.0, 200.0));
        assert!(timeline.move_clip("c1", "v1", span(100.0, 200.0), -400.0).unwrap());
        assert_eq!(timeline.find_clip("c1").unwrap().span(), span(0.0, 200.0));
        // Wrong track: nothing to move.
        assert!(!timeline.move_clip("c1", "a1", span(100.0, 200.0), 4.0).unwrap());
    }

    #[test]
    fn test_trim_left_rejects_sub_minimum_width() {
        let mut timeline = timeline_with(vec![clip("c1", 100.0, 200.0)], vec![]);
        assert!(!timeline.trim_left("c1", "v1", span(100.0, 200.0), 250.0).unwrap());
        assert_eq!(timeline.find_clip("c1").unwrap().span(), span(100.0, 200.0));
        assert!(timeline.trim_left("c1", "v1", span(100.0, 200.0), 40.0).unwrap());
        assert_eq!(timeline.find_clip("c1").unwrap().span(), span(140.0, 160.0));
    }

    #[test]
    fn test_trim_right_clamps_width() {
        let mut timeline = timeline_with(vec![clip("c1", 100.0, 200.0)], vec![]);
        assert!(timeline.trim_right("c1", "v1", span(100.0, 200.0), -500.0).unwrap());
        assert_eq!(timeline.find_clip("c1").unwrap().span(), span(100.0, 1.0));
    }

    #[test]
    fn test_locked_track_is_unchanged_by_edits() {
        let mut timeline = timeline_with(vec![clip("c1", 100.0, 200.0)], vec![]);
        timeline.toggle_track_flag("v1", TrackFlag::Locked);
        let before = timeline.video_tracks[0].clips.clone();
        let origin = span(100.0, 200.0);

        assert!(timeline.move_clip("c1", "v1", origin, 40.0).is_err());
        assert!(timeline.trim_left("c1", "v1", origin, 40.0).is_err());
        assert!(timeline.trim_right("c1", "v1", origin, 40.0).is_err());
        assert!(timeline.insert_clip("v1", &video_payload(), 0.0).is_err());
        assert_eq!(timeline.video_tracks[0].clips, before);
    }

    #[test]
    fn test_split_at_replaces_clip_in_place() {
        let mut timeline = timeline_with(
            vec![clip("c0", 0.0, 50.0), clip("c1", 100.0, 200.0), clip("c9", 400.0, 10.0)],
            vec![],
        );
        let outcomes = timeline.split_at(180.0);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].left_id, "c1_p1");

        let ids: Vec<_> = timeline.video_tracks[0]
            .clips
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["c0", "c1_p1", "c1_p2", "c9"]);
        let p1 = timeline.find_clip("c1_p1").unwrap();
        let p2 = timeline.find_clip("c1_p2").unwrap();
        assert_eq!(p1.span(), span(100.0, 80.0));
        assert_eq!(p2.span(), span(180.0, 120.0));
        assert!(timeline.find_clip("c1").is_none());
    }

    #[test]
    fn test_split_at_boundary_or_gap_is_noop() {
        let mut timeline = timeline_with(vec![clip("c1", 100.0, 200.0)], vec![]);
        let before = timeline.clone();
        assert!(timeline.split_at(100.0).is_empty());
        assert!(timeline.split_at(300.0).is_empty());
        assert!(timeline.split_at(350.0).is_empty());
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_split_hits_video_and_audio_in_one_call() {
        let mut audio = clip("a_clip", 0.0, 400.0);
        audio.kind = ClipKind::Audio;
        let mut timeline = timeline_with(vec![clip("c1", 100.0, 200.0)], vec![audio]);
        let outcomes = timeline.split_at(200.0);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].track_kind, TrackKind::Video);
        assert_eq!(outcomes[1].track_kind, TrackKind::Audio);
        assert!(timeline.find_clip("a_clip_p1").is_some());
        assert!(timeline.find_clip("a_clip_p2").is_some());
    }

    #[test]
    fn test_split_only_first_matching_video_track() {
        let mut timeline = timeline_with(vec![clip("c1", 0.0, 200.0)], vec![]);
        timeline.add_track(TrackKind::Video);
        timeline.video_tracks[1].clips.push(clip("c2", 0.0, 200.0));
        let outcomes = timeline.split_at(100.0);
        assert_eq!(outcomes.len(), 1);
        assert!(timeline.find_clip("c2").is_some());
    }

    #[test]
    fn test_delete_clip_ignores_lock() {
        let mut timeline = timeline_with(vec![clip("c1", 0.0, 200.0)], vec![]);
        timeline.toggle_track_flag("v1", TrackFlag::Locked);
        assert!(timeline.delete_clip("c1"));
        assert!(!timeline.delete_clip("c1"));
        assert!(timeline.video_tracks[0].clips.is_empty());
    }

    #[test]
    fn test_active_clip_skips_hidden_tracks() {
        let mut timeline = timeline_with(vec![clip("low", 0.0, 200.0)], vec![]);
        timeline.add_track(TrackKind::Video);
        timeline.video_tracks[1].clips.push(clip("high", 0.0, 200.0));

        assert_eq!(timeline.active_clip_at(200.0).unwrap().id, "high");
        timeline.toggle_track_flag("v2", TrackFlag::Hidden);
        assert_eq!(timeline.active_clip_at(200.0).unwrap().id, "low");
        assert!(timeline.active_clip_at(201.0).is_none());
    }

    #[test]
    fn test_content_end_and_track_of() {
        let mut audio = clip("a", 250.0, 100.0);
        audio.kind = ClipKind::Audio;
        let timeline = timeline_with(vec![clip("c1", 0.0, 200.0)], vec![audio]);
        assert_eq!(timeline.content_end(), 350.0);
        assert_eq!(timeline.track_of("a"), Some("a1"));
    }

    #[test]
    fn test_update_param_and_source() {
        let mut timeline = timeline_with(vec![clip("c1", 0.0, 200.0)], vec![]);
        assert!(timeline.update_clip_param("c1", ParamUpdate::Volume(50.0)));
        assert!(!timeline.update_clip_param("zz", ParamUpdate::Volume(50.0)));
        assert_eq!(timeline.find_clip("c1").unwrap().params.volume(), 50.0);

        assert!(timeline.replace_clip_source("c1", "/out/c1_denoised.mp4", "AI_c1.mp4"));
        let c = timeline.find_clip("c1").unwrap();
        assert_eq!(c.path, "/out/c1_denoised.mp4");
        assert_eq!(c.name, "AI_c1.mp4");
    }
}

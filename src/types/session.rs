use crate::config::EditorConfig;
use crate::ops::actions::{ActionDispatcher, ActionRequest, Suggestion};
use crate::ops::gesture::{DragKind, Gesture};
use crate::types::media::{AssetPayload, Clip, ClipParams, MEDIA_WIDTH, VIDEO_COLOR};
use crate::types::media_library::MediaLibrary;
use crate::types::playback_state::PlaybackState;
use crate::types::timeline::{SplitOutcome, Timeline};
use crate::types::track::{TrackFlag, TrackKind};
use crate::types::coords::{px_to_seconds, snap};
use std::time::{Duration, Instant};

/// At most one clip or one asset is active for the inspector and preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Clip(String),
    Asset(String),
}

/// What a click on the timeline body does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Select,
    Razor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: Instant,
}

/// Everything an editing session owns: the store, selection, tool mode,
/// playhead, markers, the in-progress drag and the current notice.
///
/// The UI holds one of these and passes it by `&mut` into every handler.
#[derive(Debug)]
pub struct EditSession {
    pub config: EditorConfig,
    pub timeline: Timeline,
    pub library: MediaLibrary,
    pub selection: Selection,
    pub tool: Tool,
    /// Reserved: shown in the toolbar, not wired to snapping or ripple.
    pub magnetic: bool,
    pub playback: PlaybackState,
    pub gesture: Gesture,
    markers: Vec<f64>,
    notice: Option<Notice>,
    suggestions: Vec<Suggestion>,
    /// Selection the current suggestions were requested for.
    analyzed: Selection,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        let playback = PlaybackState::with_volume(config.preview.default_volume);
        Self {
            config,
            timeline: Timeline::with_default_tracks(),
            library: MediaLibrary::new(),
            selection: Selection::None,
            tool: Tool::Select,
            magnetic: true,
            playback,
            gesture: Gesture::Idle,
            markers: Vec::new(),
            notice: None,
            suggestions: Vec::new(),
            analyzed: Selection::None,
        }
    }

    pub fn select_clip(&mut self, clip_id: &str) {
        self.selection = Selection::Clip(clip_id.to_string());
    }

    pub fn select_asset(&mut self, asset_id: &str) {
        self.selection = Selection::Asset(asset_id.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn selected_clip_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Clip(id) => Some(id),
            _ => None,
        }
    }

    /// The selected timeline clip, if it still exists.
    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected_clip_id()
            .and_then(|id| self.timeline.find_clip(id))
    }

    /// The selected clip, or the selected asset as a synthetic clip at the
    /// start of the timeline.
    pub fn selected_item(&self) -> Option<Clip> {
        match &self.selection {
            Selection::Clip(id) => self.timeline.find_clip(id).cloned(),
            Selection::Asset(id) => self.library.get(id).map(|asset| Clip {
                id: asset.id.clone(),
                name: asset.name.clone(),
                path: asset.path.clone(),
                kind: asset.kind.into(),
                start: 0.0,
                width: MEDIA_WIDTH,
                color: VIDEO_COLOR,
                params: ClipParams::default(),
            }),
            Selection::None => None,
        }
    }

    /// What the preview monitor shows: the selected item, else the clip under
    /// the playhead.
    pub fn preview_clip(&self) -> Option<Clip> {
        self.selected_item().or_else(|| {
            self.timeline
                .active_clip_at(self.playback.playhead)
                .cloned()
        })
    }

    pub fn add_track(&mut self, kind: TrackKind) -> String {
        self.timeline.add_track(kind)
    }

    pub fn toggle_track_flag(&mut self, track_id: &str, flag: TrackFlag) -> bool {
        self.timeline.toggle_track_flag(track_id, flag)
    }

    /// A click on the ruler or track area at `pos` (pixel-units from the
    /// timeline origin). Clears the selection and moves the playhead; with the
    /// razor tool it also splits at the new playhead.
    pub fn click_timeline(
        &mut self,
        pos: f64,
        dispatcher: &dyn ActionDispatcher,
    ) -> Vec<SplitOutcome> {
        self.clear_selection();
        self.playback.seek_to(pos);
        if self.tool == Tool::Razor {
            self.split_at_playhead(dispatcher)
        } else {
            Vec::new()
        }
    }

    /// Splits every list at the playhead. On success the tool goes back to
    /// select and the left part of the last split clip is selected, so the
    /// audio part wins when both lists were cut. A `cut_clip` request for the
    /// first split clip is fired without waiting for it.
    pub fn split_at_playhead(&mut self, dispatcher: &dyn ActionDispatcher) -> Vec<SplitOutcome> {
        let position = self.playback.playhead;
        let outcomes = self.timeline.split_at(position);
        if let (Some(first), Some(last)) = (outcomes.first(), outcomes.last()) {
            self.selection = Selection::Clip(last.left_id.clone());
            self.tool = Tool::Select;
            dispatcher.dispatch(ActionRequest::cut_clip(
                &first.parent.path,
                px_to_seconds(position),
            ));
        }
        outcomes
    }

    /// Deletes the selected clip. Lock state is not consulted.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_clip_id().map(str::to_string) else {
            return false;
        };
        let removed = self.timeline.delete_clip(&id);
        self.clear_selection();
        if removed {
            self.notify(NoticeLevel::Success, "Clip deleted");
        }
        removed
    }

    /// Drop `payload` on `track_id` at pointer position `pos`. The position is
    /// snapped to a frame boundary; a locked track raises an error notice.
    pub fn drop_payload(
        &mut self,
        track_id: &str,
        payload: &AssetPayload,
        pos: f64,
    ) -> Option<String> {
        match self.timeline.insert_clip(track_id, payload, snap(pos.max(0.0))) {
            Ok(id) => id,
            Err(e) => {
                self.notify(NoticeLevel::Error, e.to_string());
                None
            }
        }
    }

    /// Start dragging a clip or one of its edges. Only the select tool drags;
    /// a locked track is refused with a notice.
    pub fn begin_drag(
        &mut self,
        clip_id: &str,
        track_id: &str,
        kind: DragKind,
        pointer_x: f64,
    ) -> bool {
        if self.tool != Tool::Select {
            return false;
        }
        match self
            .gesture
            .begin(&self.timeline, clip_id, track_id, kind, pointer_x)
        {
            Ok(started) => {
                if started {
                    self.select_clip(clip_id);
                }
                started
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, e.to_string());
                false
            }
        }
    }

    pub fn drag_to(&mut self, pointer_x: f64) {
        if let Err(e) = self.gesture.update(&mut self.timeline, pointer_x) {
            self.gesture.end();
            self.notify(NoticeLevel::Error, e.to_string());
        }
    }

    /// Finish or abandon the drag. Whatever was last applied stays.
    pub fn end_drag(&mut self) {
        self.gesture.end();
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Requests analysis when the selection changed since the last call.
    /// Suggestions are cleared until the answer arrives. Returns whether a
    /// request went out.
    pub fn refresh_suggestions(&mut self, dispatcher: &dyn ActionDispatcher) -> bool {
        if self.analyzed == self.selection {
            return false;
        }
        self.analyzed = self.selection.clone();
        self.suggestions.clear();
        match self.selected_item() {
            Some(item) => {
                dispatcher.dispatch(ActionRequest::analyze(item.path));
                true
            }
            None => false,
        }
    }

    /// Stores an analysis result. Ignored when the selection has since moved
    /// to another source.
    pub fn set_suggestions(&mut self, file_path: &str, suggestions: Vec<Suggestion>) {
        if self.selected_item().is_some_and(|item| item.path == file_path) {
            self.suggestions = suggestions;
        }
    }

    /// Runs suggestion `index` on the selected timeline clip.
    pub fn apply_suggestion(&self, index: usize, dispatcher: &dyn ActionDispatcher) -> bool {
        let (Some(suggestion), Some(clip)) = (self.suggestions.get(index), self.selected_clip())
        else {
            return false;
        };
        log::info!("Applying suggestion {}", suggestion.title);
        dispatcher.dispatch(ActionRequest {
            params: serde_json::json!({}),
            ..ActionRequest::new(&suggestion.action, &clip.path).for_clip(&clip.id)
        });
        true
    }

    pub fn markers(&self) -> &[f64] {
        &self.markers
    }

    /// Add markers, skipping positions that are already marked.
    pub fn add_markers(&mut self, positions: impl IntoIterator<Item = f64>) {
        for pos in positions {
            if !self.markers.contains(&pos) {
                self.markers.push(pos);
            }
        }
    }

    /// Raise a notice, replacing any that is still showing.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Success => log::info!("{}", message),
            NoticeLevel::Error => log::warn!("{}", message),
        }
        self.notice = Some(Notice {
            level,
            message,
            raised_at: Instant::now(),
        });
    }

    /// The current notice, if it has not expired at `now`.
    pub fn visible_notice(&self, now: Instant) -> Option<&Notice> {
        let ttl = Duration::from_millis(self.config.notice_ttl_ms);
        self.notice
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.raised_at) < ttl)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::actions::LogDispatcher;
    use crate::types::media::ClipKind;
    use std::path::Path;

    fn payload() -> AssetPayload {
        AssetPayload::new("shot.mp4", "/media/shot.mp4", ClipKind::Video)
    }

    fn session_with_clip(start: f64) -> (EditSession, String) {
        let mut session = EditSession::default();
        let id = session
            .timeline
            .insert_clip("v1", &payload(), start)
            .unwrap()
            .unwrap();
        (session, id)
    }

    #[test]
    fn test_new_session_layout() {
        let session = EditSession::default();
        assert_eq!(session.timeline.video_tracks[0].id, "v1");
        assert_eq!(session.timeline.audio_tracks[0].id, "a1");
        assert_eq!(session.playback.global_volume, 80.0);
        assert_eq!(session.tool, Tool::Select);
        assert!(session.magnetic);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut session = EditSession::default();
        session.select_clip("c1");
        session.select_asset("asset-1");
        assert_eq!(session.selection, Selection::Asset("asset-1".to_string()));
        assert_eq!(session.selected_clip_id(), None);
        session.select_clip("c1");
        assert_eq!(session.selected_clip_id(), Some("c1"));
    }

    #[test]
    fn test_click_with_select_tool_moves_playhead() {
        let (mut session, id) = session_with_clip(100.0);
        session.select_clip(&id);
        let dispatcher = LogDispatcher::default();
        let outcomes = session.click_timeline(181.5, &dispatcher);
        assert!(outcomes.is_empty());
        assert_eq!(session.playback.playhead, 180.0);
        assert_eq!(session.selection, Selection::None);
        assert!(dispatcher.requests().is_empty());
    }

    #[test]
    fn test_razor_click_splits_and_dispatches() {
        let (mut session, id) = session_with_clip(100.0);
        session.tool = Tool::Razor;
        let dispatcher = LogDispatcher::default();
        let outcomes = session.click_timeline(180.0, &dispatcher);

        assert_eq!(outcomes.len(), 1);
        let left = format!("{}_p1", id);
        assert_eq!(session.selected_clip_id(), Some(left.as_str()));
        assert_eq!(session.tool, Tool::Select);

        let requests = dispatcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].action, "cut_clip");
        assert_eq!(requests[0].file_path, "/media/shot.mp4");
        assert_eq!(requests[0].params["timestamp"], 1.8);
    }

    #[test]
    fn test_razor_through_video_and_audio_selects_audio() {
        let (mut session, _) = session_with_clip(100.0);
        let voice = AssetPayload::new("voice.wav", "/media/voice.wav", ClipKind::Audio);
        let audio_id = session
            .timeline
            .insert_clip("a1", &voice, 100.0)
            .unwrap()
            .unwrap();
        session.tool = Tool::Razor;
        let dispatcher = LogDispatcher::default();
        let outcomes = session.click_timeline(180.0, &dispatcher);

        assert_eq!(outcomes.len(), 2);
        let audio_left = format!("{}_p1", audio_id);
        assert_eq!(session.selected_clip_id(), Some(audio_left.as_str()));

        // The cut is still reported for the video source.
        let requests = dispatcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].file_path, "/media/shot.mp4");
    }

    #[test]
    fn test_selection_change_requests_analysis() {
        let (mut session, id) = session_with_clip(0.0);
        let dispatcher = LogDispatcher::default();
        assert!(!session.refresh_suggestions(&dispatcher));

        session.select_clip(&id);
        assert!(session.refresh_suggestions(&dispatcher));
        assert!(!session.refresh_suggestions(&dispatcher));
        let requests = dispatcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].action, "analyze");
        assert_eq!(requests[0].file_path, "/media/shot.mp4");

        let asset_id = session.library.import(Path::new("/audio/song.wav")).id.clone();
        session.select_asset(&asset_id);
        assert!(session.refresh_suggestions(&dispatcher));
        assert_eq!(dispatcher.requests()[1].file_path, "/audio/song.wav");
    }

    #[test]
    fn test_suggestions_follow_selection() {
        let (mut session, id) = session_with_clip(0.0);
        let dispatcher = LogDispatcher::default();
        let upscale = Suggestion {
            action: "super_scale".to_string(),
            title: "Upscale".to_string(),
        };
        session.select_clip(&id);
        session.refresh_suggestions(&dispatcher);
        session.set_suggestions("/media/shot.mp4", vec![upscale.clone()]);
        assert_eq!(session.suggestions(), &[upscale.clone()]);

        // A late answer for another source is dropped.
        session.set_suggestions("/media/other.mp4", Vec::new());
        assert_eq!(session.suggestions().len(), 1);

        assert!(session.apply_suggestion(0, &dispatcher));
        let sent = dispatcher.requests().pop().unwrap();
        assert_eq!(sent.action, "super_scale");
        assert_eq!(sent.file_path, "/media/shot.mp4");
        assert_eq!(sent.clip_id.as_deref(), Some(id.as_str()));
        assert_eq!(sent.params, serde_json::json!({}));
        assert!(!session.apply_suggestion(3, &dispatcher));

        session.clear_selection();
        assert!(!session.refresh_suggestions(&dispatcher));
        assert!(session.suggestions().is_empty());
        assert!(!session.apply_suggestion(0, &dispatcher));
    }

    #[test]
    fn test_razor_click_on_gap_keeps_razor() {
        let (mut session, _) = session_with_clip(100.0);
        session.tool = Tool::Razor;
        let dispatcher = LogDispatcher::default();
        assert!(session.click_timeline(20.0, &dispatcher).is_empty());
        assert_eq!(session.tool, Tool::Razor);
        assert!(dispatcher.requests().is_empty());
    }

    #[test]
    fn test_delete_selected() {
        let (mut session, id) = session_with_clip(0.0);
        session.toggle_track_flag("v1", TrackFlag::Locked);
        session.select_clip(&id);
        assert!(session.delete_selected());
        assert_eq!(session.selection, Selection::None);
        assert!(session.timeline.find_clip(&id).is_none());
        assert!(!session.delete_selected());
    }

    #[test]
    fn test_drop_snaps_and_reports_lock() {
        let mut session = EditSession::default();
        let id = session.drop_payload("v1", &payload(), 150.0).unwrap();
        assert_eq!(session.timeline.find_clip(&id).unwrap().start, 148.0);
        assert!(session.visible_notice(Instant::now()).is_none());

        session.toggle_track_flag("a1", TrackFlag::Locked);
        assert!(session.drop_payload("a1", &payload(), 0.0).is_none());
        let notice = session.visible_notice(Instant::now()).unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Track a1 is locked");
        assert!(session.timeline.audio_tracks[0].clips.is_empty());
    }

    #[test]
    fn test_notice_expires() {
        let mut session = EditSession::default();
        session.notify(NoticeLevel::Success, "Playing");
        let raised = session.visible_notice(Instant::now()).unwrap().raised_at;
        assert!(session
            .visible_notice(raised + Duration::from_millis(3999))
            .is_some());
        assert!(session
            .visible_notice(raised + Duration::from_millis(4000))
            .is_none());
    }

    #[test]
    fn test_markers_are_deduplicated() {
        let mut session = EditSession::default();
        session.add_markers([50.0, 120.0]);
        session.add_markers([120.0, 300.0]);
        assert_eq!(session.markers(), &[50.0, 120.0, 300.0]);
    }

    #[test]
    fn test_preview_clip_resolution() {
        let (mut session, id) = session_with_clip(100.0);
        assert!(session.preview_clip().is_none());

        session.playback.seek_to(120.0);
        assert_eq!(session.preview_clip().unwrap().id, id);

        let asset_id = session.library.import(Path::new("/audio/song.wav")).id.clone();
        session.select_asset(&asset_id);
        let preview = session.preview_clip().unwrap();
        assert_eq!(preview.id, asset_id);
        assert_eq!(preview.kind, ClipKind::Audio);
        assert_eq!((preview.start, preview.width), (0.0, 200.0));

        // A stale clip selection falls back to the clip under the playhead.
        session.select_clip("gone");
        assert_eq!(session.preview_clip().unwrap().id, id);
    }

    #[test]
    fn test_drag_is_refused_with_razor_or_lock() {
        let (mut session, id) = session_with_clip(100.0);
        session.tool = Tool::Razor;
        assert!(!session.begin_drag(&id, "v1", DragKind::Move, 0.0));

        session.tool = Tool::Select;
        session.toggle_track_flag("v1", TrackFlag::Locked);
        assert!(!session.begin_drag(&id, "v1", DragKind::Move, 0.0));
        assert!(session.visible_notice(Instant::now()).is_some());
        assert!(!session.gesture.is_dragging());
    }

    #[test]
    fn test_drag_selects_and_moves() {
        let (mut session, id) = session_with_clip(100.0);
        assert!(session.begin_drag(&id, "v1", DragKind::Move, 500.0));
        assert_eq!(session.selected_clip_id(), Some(id.as_str()));
        session.drag_to(541.0);
        session.end_drag();
        assert_eq!(session.timeline.find_clip(&id).unwrap().start, 140.0);
        assert!(!session.gesture.is_dragging());
    }
}

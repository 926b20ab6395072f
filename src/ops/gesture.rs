use crate::error::{CutlineError, Result};
use crate::types::coords::quantize_delta;
use crate::types::media::ClipSpan;
use crate::types::timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    TrimLeft,
    TrimRight,
}

/// What the clip looked like when the pointer went down. Every pointer move
/// is applied against this, never against the live clip, so a drag can't
/// accumulate rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    pub clip_id: String,
    pub track_id: String,
    pub kind: DragKind,
    pub origin_x: f64,
    pub span: ClipSpan,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragSnapshot),
}

impl Gesture {
    /// Records a snapshot of the clip. Returns `Ok(false)` when the clip is
    /// not on `track_id`.
    pub fn begin(
        &mut self,
        timeline: &Timeline,
        clip_id: &str,
        track_id: &str,
        kind: DragKind,
        pointer_x: f64,
    ) -> Result<bool> {
        if timeline.is_locked(track_id) {
            return Err(CutlineError::locked(track_id));
        }
        let Some(clip) = timeline.track(track_id).and_then(|t| t.clip(clip_id)) else {
            return Ok(false);
        };
        log::debug!("Begin {:?} on {} at x={}", kind, clip_id, pointer_x);
        *self = Gesture::Dragging(DragSnapshot {
            clip_id: clip_id.to_string(),
            track_id: track_id.to_string(),
            kind,
            origin_x: pointer_x,
            span: clip.span(),
        });
        Ok(true)
    }

    /// Applies the pointer's offset from the drag origin, in whole frames.
    pub fn update(&self, timeline: &mut Timeline, pointer_x: f64) -> Result<bool> {
        let Gesture::Dragging(snap) = self else {
            return Ok(false);
        };
        let delta = quantize_delta(pointer_x - snap.origin_x);
        let (clip, track) = (snap.clip_id.as_str(), snap.track_id.as_str());
        match snap.kind {
            DragKind::Move => timeline.move_clip(clip, track, snap.span, delta),
            DragKind::TrimLeft => timeline.trim_left(clip, track, snap.span, delta),
            DragKind::TrimRight => timeline.trim_right(clip, track, snap.span, delta),
        }
    }

    pub fn end(&mut self) -> Option<DragSnapshot> {
        match std::mem::take(self) {
            Gesture::Dragging(snap) => Some(snap),
            Gesture::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging(_))
    }
}

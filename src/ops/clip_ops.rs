use crate::types::media::{Clip, ClipSpan};

/// Cuts a clip at the given position, returning the two parts if the cut is valid.
/// Returns None if the position is not strictly inside the clip.
///
/// The parts keep every field of the parent except id and span: the left part
/// is `<id>_p1`, the right part `<id>_p2`, so repeated cuts chain
/// (`c1_p1_p2`, ...).
pub fn cut_clip_at(clip: &Clip, position: f64) -> Option<(Clip, Clip)> {
    if !clip.spans(position) {
        return None;
    }
    let offset = position - clip.start;

    let mut left = clip.clone();
    left.id = format!("{}_p1", clip.id);
    left.width = offset;

    let mut right = clip.clone();
    right.id = format!("{}_p2", clip.id);
    right.start = position;
    right.width = clip.width - offset;

    Some((left, right))
}

/// Span after dragging the whole clip by `delta` from `origin`.
pub fn moved(origin: ClipSpan, delta: f64) -> ClipSpan {
    ClipSpan {
        start: (origin.start + delta).max(0.0),
        width: origin.width,
    }
}

/// Span after dragging the left edge by `delta` from `origin`, or None when
/// the clip would shrink below one pixel-unit.
pub fn trimmed_left(origin: ClipSpan, delta: f64) -> Option<ClipSpan> {
    let width = origin.width - delta;
    if width < 1.0 {
        return None;
    }
    Some(ClipSpan {
        start: (origin.start + delta).max(0.0),
        width,
    })
}

/// Span after dragging the right edge by `delta` from `origin`.
pub fn trimmed_right(origin: ClipSpan, delta: f64) -> ClipSpan {
    ClipSpan {
        start: origin.start,
        width: (origin.width + delta).max(1.0),
    }
}

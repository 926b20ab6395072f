use crate::types::media::Clip;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    /// Prefix of sequential track ids (`v1`, `a1`, ...).
    pub fn id_prefix(self) -> char {
        match self {
            TrackKind::Video => 'v',
            TrackKind::Audio => 'a',
        }
    }
}

/// A lane of clips of one kind. Clips keep insertion order, not time order,
/// and may overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub kind: TrackKind,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            clips: Vec::new(),
        }
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn clip_mut(&mut self, clip_id: &str) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    pub fn position_of(&self, clip_id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFlag {
    Hidden,
    Locked,
    Muted,
}

/// Gating flags for one track. `muted` only silences the preview; edits
/// ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackFlags {
    pub hidden: bool,
    pub locked: bool,
    pub muted: bool,
}

impl TrackFlags {
    pub fn get(&self, flag: TrackFlag) -> bool {
        match flag {
            TrackFlag::Hidden => self.hidden,
            TrackFlag::Locked => self.locked,
            TrackFlag::Muted => self.muted,
        }
    }

    fn slot(&mut self, flag: TrackFlag) -> &mut bool {
        match flag {
            TrackFlag::Hidden => &mut self.hidden,
            TrackFlag::Locked => &mut self.locked,
            TrackFlag::Muted => &mut self.muted,
        }
    }
}

/// Side-table of track flags keyed by track id. Entries are created lazily;
/// a missing entry means every flag is off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackStates {
    states: HashMap<String, TrackFlags>,
}

impl TrackStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self, track_id: &str) -> TrackFlags {
        self.states.get(track_id).copied().unwrap_or_default()
    }

    pub fn is_set(&self, track_id: &str, flag: TrackFlag) -> bool {
        self.flags(track_id).get(flag)
    }

    /// Flip one flag and return its new value. Other flags are untouched.
    pub fn toggle(&mut self, track_id: &str, flag: TrackFlag) -> bool {
        let slot = self
            .states
            .entry(track_id.to_string())
            .or_default()
            .slot(flag);
        *slot = !*slot;
        *slot
    }
}

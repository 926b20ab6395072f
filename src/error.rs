/// Result alias that carries the crate-wide [`CutlineError`].
pub type Result<T> = std::result::Result<T, CutlineError>;

/// Errors raised by the editing engine and its collaborators.
///
/// Nothing here is fatal: callers turn an `Err` into a transient notice and
/// leave the timeline as it was.
#[derive(Debug, thiserror::Error)]
pub enum CutlineError {
    /// An edit targeted a track whose `locked` flag is set.
    #[error("Track {track_id} is locked")]
    TrackLocked { track_id: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The media playback surface failed to load or control a source.
    #[error("Media error: {0}")]
    Media(String),
}

impl CutlineError {
    pub fn locked(track_id: impl Into<String>) -> Self {
        Self::TrackLocked {
            track_id: track_id.into(),
        }
    }

    pub fn media<T: Into<String>>(msg: T) -> Self {
        Self::Media(msg.into())
    }
}

/// Why a media element refused to start playback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayError {
    /// The play request was superseded by a pause before it completed.
    #[error("play request aborted")]
    Aborted,
    /// The environment does not allow playback right now (autoplay policy etc).
    #[error("playback not allowed: {0}")]
    NotAllowed(String),
    #[error("playback failed: {0}")]
    Failed(String),
}

impl PlayError {
    pub fn is_abort(&self) -> bool {
        matches!(self, PlayError::Aborted)
    }
}

//! Non-linear editing engine: a clip/track store, frame-snapped edit
//! operations, a playhead clock and the bridge that keeps a media element in
//! step with it.

pub mod config;
pub mod error;
pub mod ops;
pub mod playback;
pub mod types;

pub use config::EditorConfig;
pub use error::{CutlineError, PlayError, Result};
pub use types::session::EditSession;

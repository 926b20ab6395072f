pub mod coords;
pub mod media;
pub mod media_library;
pub mod playback_state;
pub mod session;
pub mod timeline;
pub mod track;

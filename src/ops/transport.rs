use crate::types::session::EditSession;

/// Keys the editor binds at the window level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKey {
    ArrowLeft,
    ArrowRight,
    J,
    K,
    L,
    Space,
    Home,
    End,
    Delete,
}

/// Applies a transport key to the session. Returns whether the key was
/// consumed; nothing happens while a text field has focus.
pub fn handle_key(session: &mut EditSession, key: TransportKey, text_focus: bool) -> bool {
    if text_focus {
        return false;
    }
    let shuttle = session.config.transport.shuttle_frames;
    let end_frame = session.config.transport.end_frame;
    let playback = &mut session.playback;
    match key {
        TransportKey::ArrowLeft => {
            playback.step_frames(-1);
        }
        TransportKey::ArrowRight => {
            playback.step_frames(1);
        }
        TransportKey::J => {
            playback.step_frames(-shuttle);
        }
        TransportKey::L => {
            playback.step_frames(shuttle);
        }
        TransportKey::K => playback.stop(),
        TransportKey::Space => {
            playback.toggle_playing();
        }
        TransportKey::Home => {
            playback.go_to_frame(0);
        }
        TransportKey::End => {
            playback.go_to_frame(end_frame);
        }
        TransportKey::Delete => {
            session.delete_selected();
        }
    }
    log::debug!("{:?} -> playhead {}", key, session.playback.playhead);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::media::{AssetPayload, ClipKind};
    use std::time::Instant;

    #[test]
    fn test_arrow_home_end() {
        let mut session = EditSession::default();
        for _ in 0..5 {
            handle_key(&mut session, TransportKey::ArrowRight, false);
        }
        assert_eq!(session.playback.playhead, 20.0);
        handle_key(&mut session, TransportKey::Home, false);
        assert_eq!(session.playback.playhead, 0.0);
        handle_key(&mut session, TransportKey::End, false);
        assert_eq!(session.playback.playhead, 6000.0);
    }

    #[test]
    fn test_shuttle_clamps_at_zero() {
        let mut session = EditSession::default();
        handle_key(&mut session, TransportKey::L, false);
        assert_eq!(session.playback.playhead, 40.0);
        handle_key(&mut session, TransportKey::J, false);
        handle_key(&mut session, TransportKey::J, false);
        assert_eq!(session.playback.playhead, 0.0);
        handle_key(&mut session, TransportKey::ArrowLeft, false);
        assert_eq!(session.playback.playhead, 0.0);
    }

    #[test]
    fn test_space_and_k() {
        let mut session = EditSession::default();
        handle_key(&mut session, TransportKey::Space, false);
        assert!(session.playback.is_playing);
        handle_key(&mut session, TransportKey::K, false);
        assert!(!session.playback.is_playing);
        handle_key(&mut session, TransportKey::K, false);
        assert!(!session.playback.is_playing);
    }

    #[test]
    fn test_ignored_while_typing() {
        let mut session = EditSession::default();
        assert!(!handle_key(&mut session, TransportKey::ArrowRight, true));
        assert_eq!(session.playback.playhead, 0.0);
    }

    #[test]
    fn test_delete_notifies() {
        let mut session = EditSession::default();
        let payload = AssetPayload::new("a.mp4", "/m/a.mp4", ClipKind::Video);
        let id = session
            .timeline
            .insert_clip("v1", &payload, 0.0)
            .unwrap()
            .unwrap();
        session.select_clip(&id);
        handle_key(&mut session, TransportKey::Delete, false);
        assert!(session.timeline.find_clip(&id).is_none());
        assert_eq!(
            session.visible_notice(Instant::now()).unwrap().message,
            "Clip deleted"
        );
    }
}

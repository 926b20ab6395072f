mod ui;

use crate::ui::app::CutlineApp;
use cutline::config::EditorConfig;
use cutline::playback::media_element::MediaElement;
use cutline::playback::player_bridge::PlayerBridge;
use cutline::playback::sync_bridge::SyncBridge;
use cutline::types::session::EditSession;

#[cfg(feature = "gstreamer")]
fn media_element() -> Box<dyn MediaElement> {
    use cutline::playback::media_element::{ClockMedia, GstMedia};
    match GstMedia::new() {
        Ok(media) => Box::new(media),
        Err(e) => {
            log::warn!("GStreamer unavailable, falling back to clock playback: {}", e);
            Box::new(ClockMedia::new())
        }
    }
}

#[cfg(not(feature = "gstreamer"))]
fn media_element() -> Box<dyn MediaElement> {
    Box::new(cutline::playback::media_element::ClockMedia::new())
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EditorConfig::load_or_default();
    let sync = SyncBridge::new(config.preview.clone());
    let session = EditSession::new(config);
    let player = PlayerBridge::new(media_element(), sync);
    let app = CutlineApp::new(session, player);

    eframe::run_native(
        "Cutline",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}

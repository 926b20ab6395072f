use cutline::ops::transport::{TransportKey, handle_key};
use cutline::playback::sync_bridge::target_time;
use cutline::types::coords::format_timecode;
use cutline::types::session::EditSession;
use eframe::egui;

/// The program monitor: a framed canvas for the preview clip plus transport
/// and volume controls.
pub fn preview_panel(ui: &mut egui::Ui, session: &mut EditSession) {
    ui.vertical(|ui| {
        ui.heading("Program");
        ui.separator();

        let width = ui.available_width().max(160.0);
        let (canvas, _) =
            ui.allocate_exact_size(egui::vec2(width, width * 9.0 / 16.0), egui::Sense::hover());
        let painter = ui.painter_at(canvas);
        painter.rect_filled(canvas, 0.0, egui::Color32::BLACK);

        match session.preview_clip() {
            Some(clip) => {
                let params = &clip.params;
                let [r, g, b] = clip.color;
                let alpha = (params.opacity() / 100.0 * 255.0) as u8;
                let scale = (params.scale() / 100.0) as f32;
                let frame = egui::Rect::from_center_size(
                    canvas.center()
                        + egui::vec2(params.pos_x() as f32, params.pos_y() as f32),
                    canvas.size() * 0.8 * scale,
                )
                .intersect(canvas);
                painter.rect_filled(frame, 2.0, egui::Color32::from_rgba_unmultiplied(r, g, b, alpha));
                painter.text(
                    frame.center(),
                    egui::Align2::CENTER_CENTER,
                    &clip.name,
                    egui::FontId::proportional(16.0),
                    egui::Color32::WHITE,
                );
                let source_time = target_time(session.playback.playhead, clip.start);
                painter.text(
                    canvas.left_bottom() + egui::vec2(8.0, -8.0),
                    egui::Align2::LEFT_BOTTOM,
                    format!("src {:.2}s", source_time),
                    egui::FontId::monospace(11.0),
                    egui::Color32::GRAY,
                );
            }
            None => {
                painter.text(
                    canvas.center(),
                    egui::Align2::CENTER_CENTER,
                    "No clip at playhead",
                    egui::FontId::proportional(14.0),
                    egui::Color32::DARK_GRAY,
                );
            }
        }

        ui.horizontal(|ui| {
            let play_label = if session.playback.is_playing { "⏸" } else { "▶" };
            for (label, key) in [
                ("⏮", TransportKey::Home),
                ("⏪", TransportKey::J),
                ("◀", TransportKey::ArrowLeft),
                (play_label, TransportKey::Space),
                ("▶|", TransportKey::ArrowRight),
                ("⏩", TransportKey::L),
                ("⏭", TransportKey::End),
            ] {
                if ui.button(label).clicked() {
                    handle_key(session, key, false);
                }
            }
            ui.monospace(format_timecode(session.playback.playhead));
        });

        ui.horizontal(|ui| {
            let playback = &mut session.playback;
            let mute_label = if playback.muted { "🔇" } else { "🔊" };
            if ui.button(mute_label).clicked() {
                playback.muted = !playback.muted;
            }
            ui.add(egui::Slider::new(&mut playback.global_volume, 0.0..=100.0).text("Volume"));
        });
    });
}

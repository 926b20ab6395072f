use cutline::types::media::{AssetKind, AssetPayload};
use cutline::types::media_library::{MediaLibrary, builtin_transitions};
use eframe::egui;

/// What the user asked for in the media panel.
pub enum MediaEvent {
    Selected(String),
    Removed(String),
}

pub fn medialib_panel(
    ui: &mut egui::Ui,
    medialib: &mut MediaLibrary,
    selected: Option<&str>,
) -> Vec<MediaEvent> {
    let mut events = Vec::new();
    ui.vertical(|ui| {
        ui.heading("Media Library");
        ui.separator();

        if ui.button("Import Media").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Media", &["mp4", "mov", "mkv", "webm", "mp3", "wav"])
                .pick_file()
            {
                medialib.import(&path);
            }
        }

        if medialib.assets().is_empty() {
            ui.label("No media imported");
        }
        for asset in medialib.assets() {
            let payload = AssetPayload::from(asset);
            ui.horizontal(|ui| {
                ui.dnd_drag_source(egui::Id::new(("asset_drag", &asset.id)), payload, |ui| {
                    let icon = match asset.kind {
                        AssetKind::Video => "🎬",
                        AssetKind::Audio => "🎵",
                    };
                    let is_selected = selected == Some(asset.id.as_str());
                    if ui
                        .selectable_label(is_selected, format!("{} {}", icon, asset.name))
                        .clicked()
                    {
                        events.push(MediaEvent::Selected(asset.id.clone()));
                    }
                });
                if ui.small_button("✖").clicked() {
                    events.push(MediaEvent::Removed(asset.id.clone()));
                }
            });
        }

        ui.add_space(8.0);
        ui.heading("Transitions");
        ui.separator();
        for payload in builtin_transitions() {
            let label = format!("✨ {}", payload.name);
            ui.dnd_drag_source(egui::Id::new(("builtin_drag", &payload.path)), payload, |ui| {
                ui.label(label);
            });
        }
    });

    for event in &events {
        if let MediaEvent::Removed(id) = event {
            medialib.remove(id);
        }
    }
    events
}

use cutline::ops::actions::{AI_ACTIONS, ActionDispatcher, ActionRequest};
use cutline::types::media::{ClipParams, ParamUpdate};
use cutline::types::session::EditSession;
use eframe::egui;

/// Properties of the selected clip. Every slider edit becomes a
/// [`ParamUpdate`] on the timeline.
pub fn inspector_panel(
    ui: &mut egui::Ui,
    session: &mut EditSession,
    dispatcher: &dyn ActionDispatcher,
) {
    ui.heading("Inspector");
    ui.separator();

    let Some(clip) = session.selected_clip().cloned() else {
        ui.label("Select a clip to edit its properties");
        return;
    };
    ui.label(egui::RichText::new(&clip.name).strong());
    ui.label(
        egui::RichText::new(&clip.path)
            .size(10.0)
            .color(egui::Color32::GRAY),
    );
    ui.add_space(6.0);

    let mut updates = Vec::new();
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::CollapsingHeader::new("Transform")
            .default_open(true)
            .show(ui, |ui| {
                transform_controls(ui, &clip.params, &mut updates);
            });
        egui::CollapsingHeader::new("Color")
            .default_open(true)
            .show(ui, |ui| {
                color_controls(ui, &clip.params, &mut updates);
            });
        egui::CollapsingHeader::new("Audio").show(ui, |ui| {
            slider(ui, "Volume", clip.params.volume(), 0.0..=200.0, ParamUpdate::Volume, &mut updates);
        });
        egui::CollapsingHeader::new("AI Tools").show(ui, |ui| {
            for (action, title, desc) in AI_ACTIONS {
                if ui.button(*title).on_hover_text(*desc).clicked() {
                    dispatcher.dispatch(
                        ActionRequest::new(*action, clip.path.clone()).for_clip(clip.id.clone()),
                    );
                }
            }
        });
    });

    for update in updates {
        session.timeline.update_clip_param(&clip.id, update);
    }
}

fn slider(
    ui: &mut egui::Ui,
    label: &str,
    value: f64,
    range: std::ops::RangeInclusive<f64>,
    make: fn(f64) -> ParamUpdate,
    updates: &mut Vec<ParamUpdate>,
) {
    let mut v = value;
    if ui.add(egui::Slider::new(&mut v, range).text(label)).changed() {
        updates.push(make(v));
    }
}

fn transform_controls(ui: &mut egui::Ui, params: &ClipParams, updates: &mut Vec<ParamUpdate>) {
    slider(ui, "Position X", params.pos_x(), -960.0..=960.0, ParamUpdate::PosX, updates);
    slider(ui, "Position Y", params.pos_y(), -540.0..=540.0, ParamUpdate::PosY, updates);
    slider(ui, "Scale", params.scale(), 1.0..=500.0, ParamUpdate::Scale, updates);
    slider(ui, "Opacity", params.opacity(), 0.0..=100.0, ParamUpdate::Opacity, updates);
}

fn color_controls(ui: &mut egui::Ui, params: &ClipParams, updates: &mut Vec<ParamUpdate>) {
    slider(ui, "Saturation", params.saturation(), 0.0..=200.0, ParamUpdate::Saturation, updates);
    slider(ui, "Contrast", params.contrast(), 0.0..=200.0, ParamUpdate::Contrast, updates);
    slider(ui, "Temperature", params.temperature(), -100.0..=100.0, ParamUpdate::Temperature, updates);
    slider(ui, "Tint", params.tint(), -100.0..=100.0, ParamUpdate::Tint, updates);
    // Wheels are single-axis: one value drives all three channels.
    slider(ui, "Lift", params.lift().r, 0.0..=2.0, ParamUpdate::Lift, updates);
    slider(ui, "Gamma", params.gamma().r, 0.0..=2.0, ParamUpdate::Gamma, updates);
    slider(ui, "Gain", params.gain().r, 0.0..=2.0, ParamUpdate::Gain, updates);
}

use crate::ui::inspector::inspector_panel;
use crate::ui::medialib::{MediaEvent, medialib_panel};
use crate::ui::preview::preview_panel;
use crate::ui::timeline_widget::{TimelineEvent, TimelineWidget};
use cutline::ops::actions::{ActionDispatcher, LogDispatcher, handle_reply};
use cutline::ops::transport::{TransportKey, handle_key};
use cutline::playback::player_bridge::PlayerBridge;
use cutline::types::session::{EditSession, NoticeLevel, Selection};
use eframe::egui;
use std::time::{Duration, Instant};

const KEY_BINDINGS: &[(egui::Key, TransportKey)] = &[
    (egui::Key::ArrowLeft, TransportKey::ArrowLeft),
    (egui::Key::ArrowRight, TransportKey::ArrowRight),
    (egui::Key::J, TransportKey::J),
    (egui::Key::K, TransportKey::K),
    (egui::Key::L, TransportKey::L),
    (egui::Key::Space, TransportKey::Space),
    (egui::Key::Home, TransportKey::Home),
    (egui::Key::End, TransportKey::End),
    (egui::Key::Delete, TransportKey::Delete),
    (egui::Key::Backspace, TransportKey::Delete),
];

pub struct CutlineApp {
    pub session: EditSession,
    pub player: PlayerBridge,
    pub dispatcher: LogDispatcher,
}

impl CutlineApp {
    pub fn new(session: EditSession, player: PlayerBridge) -> Self {
        Self {
            session,
            player,
            dispatcher: LogDispatcher::default(),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let text_focus = ctx.wants_keyboard_input();
        let pressed: Vec<TransportKey> = ctx.input(|i| {
            KEY_BINDINGS
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|(_, t)| *t)
                .collect()
        });
        for key in pressed {
            handle_key(&mut self.session, key, text_focus);
        }
    }

    fn apply_timeline_events(&mut self, events: Vec<TimelineEvent>) {
        let session = &mut self.session;
        for event in events {
            match event {
                TimelineEvent::Clicked(pos) => {
                    session.click_timeline(pos, &self.dispatcher);
                }
                TimelineEvent::Scrubbed(pos) => {
                    session.playback.seek_to(pos);
                }
                TimelineEvent::ClipSelected(id) => session.select_clip(&id),
                TimelineEvent::DragStarted {
                    clip_id,
                    track_id,
                    kind,
                    pointer_x,
                } => {
                    session.begin_drag(&clip_id, &track_id, kind, pointer_x);
                }
                TimelineEvent::DragMoved(x) => session.drag_to(x),
                TimelineEvent::DragEnded => session.end_drag(),
                TimelineEvent::Dropped {
                    track_id,
                    payload,
                    pos,
                } => {
                    session.drop_payload(&track_id, &payload, pos);
                }
                TimelineEvent::FlagToggled { track_id, flag } => {
                    session.toggle_track_flag(&track_id, flag);
                }
                TimelineEvent::TrackAdded(kind) => {
                    session.add_track(kind);
                }
                TimelineEvent::ToolChanged(tool) => session.tool = tool,
                TimelineEvent::MagneticToggled(on) => session.magnetic = on,
                TimelineEvent::SuggestionApplied(idx) => {
                    session.apply_suggestion(idx, &self.dispatcher);
                }
            }
        }
    }

    /// Asks for suggestions on a new selection and folds in finished requests.
    fn sync_backend(&mut self) {
        self.session.refresh_suggestions(&self.dispatcher);
        for reply in self.dispatcher.poll_replies() {
            handle_reply(&mut self.session, reply);
        }
    }

    fn show_notice(&self, ctx: &egui::Context) {
        let Some(notice) = self.session.visible_notice(Instant::now()) else {
            return;
        };
        let color = match notice.level {
            NoticeLevel::Success => egui::Color32::from_rgb(22, 163, 74),
            NoticeLevel::Error => egui::Color32::from_rgb(220, 38, 38),
        };
        egui::Area::new(egui::Id::new("notice"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(color)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&notice.message).color(egui::Color32::WHITE));
                    });
            });
        // Repaint once the notice is due to disappear.
        ctx.request_repaint_after(Duration::from_millis(self.session.config.notice_ttl_ms));
    }
}

impl eframe::App for CutlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.player.update(&mut self.session);
        if self.session.playback.is_playing {
            ctx.request_repaint_after(Duration::from_millis(16));
        }

        egui::SidePanel::left("media_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                let selected = match &self.session.selection {
                    Selection::Asset(id) => Some(id.clone()),
                    _ => None,
                };
                let events =
                    medialib_panel(ui, &mut self.session.library, selected.as_deref());
                for event in events {
                    match event {
                        MediaEvent::Selected(id) => self.session.select_asset(&id),
                        MediaEvent::Removed(id) => {
                            if self.session.selection == Selection::Asset(id) {
                                self.session.clear_selection();
                            }
                        }
                    }
                }
            });

        egui::SidePanel::right("inspector_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                inspector_panel(ui, &mut self.session, &self.dispatcher);
            });

        let mut timeline_events = Vec::new();
        egui::TopBottomPanel::bottom("timeline_panel")
            .resizable(true)
            .min_height(260.0)
            .show(ctx, |ui| {
                timeline_events = TimelineWidget::new(&self.session).show(ui);
            });
        self.apply_timeline_events(timeline_events);
        self.sync_backend();

        egui::CentralPanel::default().show(ctx, |ui| {
            preview_panel(ui, &mut self.session);
        });

        self.show_notice(ctx);
    }
}

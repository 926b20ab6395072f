use cutline::ops::gesture::DragKind;
use cutline::types::coords::{PIXELS_PER_SECOND, format_timecode};
use cutline::types::media::AssetPayload;
use cutline::types::session::{EditSession, Tool};
use cutline::types::track::{Track, TrackFlag, TrackKind};
use eframe::egui::{self, StrokeKind};

const TRACK_HEIGHT: f32 = 56.0;
const CLIP_HEIGHT: f32 = 40.0;
const RULER_HEIGHT: f32 = 28.0;
const TRACK_LABEL_WIDTH: f32 = 132.0;
const RESIZE_HANDLE_WIDTH: f32 = 6.0;
/// Minimum scrollable length, in pixel-units.
const MIN_TIMELINE_WIDTH: f32 = 6000.0;

/// Something the user did on the timeline. The app applies these to the
/// session after the widget has finished drawing.
#[derive(Debug, Clone)]
pub enum TimelineEvent {
    /// Click on the ruler or the empty track area.
    Clicked(f64),
    /// Pointer dragged along the ruler.
    Scrubbed(f64),
    ClipSelected(String),
    DragStarted {
        clip_id: String,
        track_id: String,
        kind: DragKind,
        pointer_x: f64,
    },
    DragMoved(f64),
    DragEnded,
    Dropped {
        track_id: String,
        payload: AssetPayload,
        pos: f64,
    },
    FlagToggled {
        track_id: String,
        flag: TrackFlag,
    },
    TrackAdded(TrackKind),
    ToolChanged(Tool),
    MagneticToggled(bool),
    /// A button in the suggestion ribbon, by index.
    SuggestionApplied(usize),
}

/// Draws tracks, clips, ruler, markers and playhead. Does not mutate the
/// session; everything comes back as [`TimelineEvent`]s.
pub struct TimelineWidget<'a> {
    session: &'a EditSession,
}

impl<'a> TimelineWidget<'a> {
    pub fn new(session: &'a EditSession) -> Self {
        Self { session }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        self.toolbar(ui, &mut events);
        self.suggestion_ribbon(ui, &mut events);
        ui.add_space(4.0);

        // Video tracks are listed topmost-first, the reverse of storage order.
        let rows: Vec<&Track> = self
            .session
            .timeline
            .video_tracks
            .iter()
            .rev()
            .chain(self.session.timeline.audio_tracks.iter())
            .collect();

        let content_end = self.session.timeline.content_end() as f32;
        let timeline_width = (content_end + 400.0).max(MIN_TIMELINE_WIDTH);
        let total_height = RULER_HEIGHT + rows.len() as f32 * TRACK_HEIGHT;

        egui::ScrollArea::both()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(timeline_width + TRACK_LABEL_WIDTH, total_height));

                let (_, dropped) = ui.dnd_drop_zone::<AssetPayload, ()>(
                    egui::Frame::default(),
                    |ui| {
                        let origin = ui.min_rect().min;
                        let timeline_rect = egui::Rect::from_min_size(
                            origin,
                            egui::vec2(timeline_width + TRACK_LABEL_WIDTH, total_height),
                        );
                        let ruler_rect = egui::Rect::from_min_size(
                            origin + egui::vec2(TRACK_LABEL_WIDTH, 0.0),
                            egui::vec2(timeline_width, RULER_HEIGHT),
                        );
                        let tracks_rect = egui::Rect::from_min_max(
                            origin + egui::vec2(TRACK_LABEL_WIDTH, RULER_HEIGHT),
                            timeline_rect.right_bottom(),
                        );
                        ui.allocate_rect(timeline_rect, egui::Sense::hover());
                        let painter = ui.painter_at(timeline_rect);
                        painter.rect_filled(timeline_rect, 0.0, ui.style().visuals.window_fill);

                        // Ruler and empty track area both move the playhead.
                        self.draw_ruler(&painter, ruler_rect);
                        let ruler = ui.allocate_rect(ruler_rect, egui::Sense::click_and_drag());
                        if let Some(p) = ruler.interact_pointer_pos() {
                            let x = (p.x - ruler_rect.left()) as f64;
                            if ruler.clicked() {
                                events.push(TimelineEvent::Clicked(x));
                            } else if ruler.dragged() {
                                events.push(TimelineEvent::Scrubbed(x));
                            }
                        }
                        let body = ui.allocate_rect(tracks_rect, egui::Sense::click());
                        if body.clicked() {
                            if let Some(p) = body.interact_pointer_pos() {
                                events.push(TimelineEvent::Clicked((p.x - tracks_rect.left()) as f64));
                            }
                        }

                        for (row, track) in rows.iter().enumerate() {
                            let y = tracks_rect.top() + row as f32 * TRACK_HEIGHT;
                            let header = egui::Rect::from_min_size(
                                egui::pos2(timeline_rect.left(), y),
                                egui::vec2(TRACK_LABEL_WIDTH, TRACK_HEIGHT),
                            );
                            let lane = egui::Rect::from_min_size(
                                egui::pos2(tracks_rect.left(), y),
                                egui::vec2(tracks_rect.width(), TRACK_HEIGHT),
                            );
                            self.track_header(ui, &painter, header, track, &mut events);
                            self.track_lane(ui, &painter, lane, track, &mut events);
                        }

                        self.draw_drop_indicator(ui, &painter, tracks_rect, rows.len());
                        self.draw_playhead(&painter, ruler_rect.left(), timeline_rect);
                    },
                );

                if let Some(payload) = dropped {
                    let pointer = ui.ctx().input(|i| i.pointer.latest_pos());
                    if let Some(pos) = pointer {
                        let tracks_left = ui.min_rect().left() + TRACK_LABEL_WIDTH;
                        let tracks_top = ui.min_rect().top() + RULER_HEIGHT;
                        let row = ((pos.y - tracks_top) / TRACK_HEIGHT).floor();
                        if row >= 0.0 {
                            if let Some(track) = rows.get(row as usize) {
                                events.push(TimelineEvent::Dropped {
                                    track_id: track.id.clone(),
                                    payload: (*payload).clone(),
                                    pos: (pos.x - tracks_left) as f64,
                                });
                            }
                        }
                    }
                }
            });

        events
    }

    fn suggestion_ribbon(&self, ui: &mut egui::Ui, events: &mut Vec<TimelineEvent>) {
        let suggestions = self.session.suggestions();
        if suggestions.is_empty() {
            return;
        }
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("✨ AI Insights")
                    .color(egui::Color32::from_rgb(167, 139, 250)),
            );
            for (idx, suggestion) in suggestions.iter().enumerate() {
                if ui
                    .button(&suggestion.title)
                    .on_hover_text(&suggestion.action)
                    .clicked()
                {
                    events.push(TimelineEvent::SuggestionApplied(idx));
                }
            }
        });
    }

    fn toolbar(&self, ui: &mut egui::Ui, events: &mut Vec<TimelineEvent>) {
        let session = self.session;
        ui.horizontal(|ui| {
            if ui
                .selectable_label(session.tool == Tool::Select, "⬉ Select")
                .clicked()
            {
                events.push(TimelineEvent::ToolChanged(Tool::Select));
            }
            if ui
                .selectable_label(session.tool == Tool::Razor, "✂ Razor")
                .clicked()
            {
                events.push(TimelineEvent::ToolChanged(Tool::Razor));
            }
            let mut magnetic = session.magnetic;
            if ui.checkbox(&mut magnetic, "Magnetic").changed() {
                events.push(TimelineEvent::MagneticToggled(magnetic));
            }
            ui.separator();
            if ui.button("+ Video Track").clicked() {
                events.push(TimelineEvent::TrackAdded(TrackKind::Video));
            }
            if ui.button("+ Audio Track").clicked() {
                events.push(TimelineEvent::TrackAdded(TrackKind::Audio));
            }
            ui.separator();
            ui.monospace(format_timecode(session.playback.playhead));
            ui.label(
                egui::RichText::new(format!("{} fps", session.config.export.display_fps))
                    .color(egui::Color32::GRAY),
            );
        });
    }

    fn track_header(
        &self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        rect: egui::Rect,
        track: &Track,
        events: &mut Vec<TimelineEvent>,
    ) {
        let flags = self.session.timeline.track_flags(&track.id);
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(32));
        painter.text(
            rect.left_center() + egui::vec2(8.0, 0.0),
            egui::Align2::LEFT_CENTER,
            track.id.to_uppercase(),
            egui::FontId::monospace(13.0),
            egui::Color32::WHITE,
        );

        // Video lanes can be hidden, audio lanes muted; both can be locked.
        let toggles = match track.kind {
            TrackKind::Video => [
                (TrackFlag::Hidden, if flags.hidden { "🚫" } else { "👁" }),
                (TrackFlag::Locked, if flags.locked { "🔒" } else { "🔓" }),
            ],
            TrackKind::Audio => [
                (TrackFlag::Muted, if flags.muted { "🔇" } else { "🔊" }),
                (TrackFlag::Locked, if flags.locked { "🔒" } else { "🔓" }),
            ],
        };
        for (i, (flag, label)) in toggles.into_iter().enumerate() {
            let button_rect = egui::Rect::from_min_size(
                egui::pos2(rect.right() - 30.0 * (2 - i) as f32, rect.center().y - 12.0),
                egui::vec2(26.0, 24.0),
            );
            if ui.put(button_rect, egui::Button::new(label)).clicked() {
                events.push(TimelineEvent::FlagToggled {
                    track_id: track.id.clone(),
                    flag,
                });
            }
        }
    }

    fn track_lane(
        &self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        lane: egui::Rect,
        track: &Track,
        events: &mut Vec<TimelineEvent>,
    ) {
        let flags = self.session.timeline.track_flags(&track.id);
        painter.rect_filled(lane, 0.0, ui.style().visuals.widgets.noninteractive.bg_fill);
        painter.line_segment(
            [lane.left_bottom(), lane.right_bottom()],
            egui::Stroke::new(1.0, ui.style().visuals.widgets.noninteractive.bg_stroke.color),
        );

        let selected = self.session.selected_clip_id();
        for clip in &track.clips {
            let clip_rect = egui::Rect::from_min_size(
                egui::pos2(
                    lane.left() + clip.start as f32,
                    lane.top() + (TRACK_HEIGHT - CLIP_HEIGHT) / 2.0,
                ),
                egui::vec2(clip.width as f32, CLIP_HEIGHT),
            );
            let [r, g, b] = clip.color;
            let mut fill = egui::Color32::from_rgb(r, g, b);
            if flags.hidden || flags.muted {
                fill = fill.gamma_multiply(0.35);
            }
            painter.rect_filled(clip_rect, 4.0, fill);
            let is_selected = selected == Some(clip.id.as_str());
            painter.rect_stroke(
                clip_rect,
                4.0,
                egui::Stroke::new(
                    if is_selected { 2.0 } else { 1.0 },
                    if is_selected {
                        egui::Color32::WHITE
                    } else {
                        egui::Color32::from_black_alpha(80)
                    },
                ),
                StrokeKind::Inside,
            );
            if clip_rect.width() > 40.0 {
                painter.text(
                    clip_rect.left_center() + egui::vec2(6.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    &clip.name,
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            }

            let body = ui.allocate_rect(clip_rect, egui::Sense::click_and_drag());
            let left = ui.allocate_rect(
                egui::Rect::from_min_size(
                    clip_rect.left_top(),
                    egui::vec2(RESIZE_HANDLE_WIDTH, CLIP_HEIGHT),
                ),
                egui::Sense::drag(),
            );
            let right = ui.allocate_rect(
                egui::Rect::from_min_size(
                    clip_rect.right_top() - egui::vec2(RESIZE_HANDLE_WIDTH, 0.0),
                    egui::vec2(RESIZE_HANDLE_WIDTH, CLIP_HEIGHT),
                ),
                egui::Sense::drag(),
            );

            if body.clicked() {
                match self.session.tool {
                    // The razor cuts wherever it lands, clips included.
                    Tool::Razor => {
                        if let Some(p) = body.interact_pointer_pos() {
                            events.push(TimelineEvent::Clicked((p.x - lane.left()) as f64));
                        }
                    }
                    Tool::Select => events.push(TimelineEvent::ClipSelected(clip.id.clone())),
                }
            }

            for (response, kind) in [
                (&body, DragKind::Move),
                (&left, DragKind::TrimLeft),
                (&right, DragKind::TrimRight),
            ] {
                if kind != DragKind::Move && response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                }
                if response.drag_started() {
                    if let Some(p) = response.interact_pointer_pos() {
                        events.push(TimelineEvent::DragStarted {
                            clip_id: clip.id.clone(),
                            track_id: track.id.clone(),
                            kind,
                            pointer_x: (p.x - lane.left()) as f64,
                        });
                    }
                } else if response.dragged() {
                    if let Some(p) = response.interact_pointer_pos() {
                        events.push(TimelineEvent::DragMoved((p.x - lane.left()) as f64));
                    }
                }
                if response.drag_stopped() {
                    events.push(TimelineEvent::DragEnded);
                }
            }
        }
    }

    fn draw_ruler(&self, painter: &egui::Painter, ruler_rect: egui::Rect) {
        painter.rect_filled(ruler_rect, 0.0, egui::Color32::from_gray(40));
        let seconds = (ruler_rect.width() / PIXELS_PER_SECOND as f32).ceil() as u32;
        for s in 0..=seconds {
            let x = ruler_rect.left() + s as f32 * PIXELS_PER_SECOND as f32;
            let major = s % 5 == 0;
            let tick = if major { 12.0 } else { 6.0 };
            painter.line_segment(
                [
                    egui::pos2(x, ruler_rect.bottom() - tick),
                    egui::pos2(x, ruler_rect.bottom()),
                ],
                egui::Stroke::new(1.0, egui::Color32::GRAY),
            );
            if major {
                painter.text(
                    egui::pos2(x + 3.0, ruler_rect.top() + 2.0),
                    egui::Align2::LEFT_TOP,
                    format_timecode(s as f64 * PIXELS_PER_SECOND),
                    egui::FontId::monospace(9.0),
                    egui::Color32::LIGHT_GRAY,
                );
            }
        }
        for &marker in self.session.markers() {
            let x = ruler_rect.left() + marker as f32;
            painter.line_segment(
                [egui::pos2(x, ruler_rect.top()), egui::pos2(x, ruler_rect.bottom())],
                egui::Stroke::new(2.0, egui::Color32::YELLOW),
            );
        }
    }

    fn draw_playhead(&self, painter: &egui::Painter, left: f32, timeline_rect: egui::Rect) {
        let x = left + self.session.playback.playhead as f32;
        painter.line_segment(
            [
                egui::pos2(x, timeline_rect.top()),
                egui::pos2(x, timeline_rect.bottom()),
            ],
            egui::Stroke::new(2.0, egui::Color32::RED),
        );
        let handle = egui::Rect::from_center_size(
            egui::pos2(x, timeline_rect.top() + 6.0),
            egui::vec2(10.0, 12.0),
        );
        painter.rect_filled(handle, 2.0, egui::Color32::RED);
    }

    fn draw_drop_indicator(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        tracks_rect: egui::Rect,
        row_count: usize,
    ) {
        if !egui::DragAndDrop::has_payload_of_type::<AssetPayload>(ui.ctx()) {
            return;
        }
        let Some(hover) = ui.ctx().input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !tracks_rect.contains(hover) {
            return;
        }
        painter.line_segment(
            [
                egui::pos2(hover.x, tracks_rect.top()),
                egui::pos2(hover.x, tracks_rect.bottom()),
            ],
            egui::Stroke::new(2.0, egui::Color32::YELLOW),
        );
        let row = ((hover.y - tracks_rect.top()) / TRACK_HEIGHT).floor() as usize;
        if row < row_count {
            let row_rect = egui::Rect::from_min_size(
                egui::pos2(tracks_rect.left(), tracks_rect.top() + row as f32 * TRACK_HEIGHT),
                egui::vec2(tracks_rect.width(), TRACK_HEIGHT),
            );
            painter.rect_stroke(
                row_rect,
                0.0,
                egui::Stroke::new(2.0, egui::Color32::YELLOW),
                StrokeKind::Outside,
            );
        }
    }
}

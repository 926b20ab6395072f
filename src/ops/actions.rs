use crate::types::coords::seconds_to_px;
use crate::types::session::{EditSession, NoticeLevel};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Backend actions offered by the inspector: (action, title, description).
pub const AI_ACTIONS: &[(&str, &str, &str)] = &[
    ("magic_mask", "Magic Mask", "AI Object Isolation"),
    ("super_scale", "Super Scale", "Hardware Upscaling"),
    ("smart_relight", "Smart Re-light", "3D Virtual Lighting"),
    ("face_refinement", "Face Refine", "Auto Skin Retouching"),
    ("voice_isolation", "Voice Isolation", "Dialogue Leveler"),
    ("scene_cut", "Scene Detect", "Cut at scene changes"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
    /// Timeline clip the result is applied to. Not sent.
    #[serde(skip)]
    pub clip_id: Option<String>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            file_path: file_path.into(),
            params: serde_json::Value::Null,
            clip_id: None,
        }
    }

    /// Ties the request to a timeline clip so its response can be applied.
    pub fn for_clip(mut self, clip_id: impl Into<String>) -> Self {
        self.clip_id = Some(clip_id.into());
        self
    }

    /// Asks the backend what it would suggest for a source.
    pub fn analyze(file_path: impl Into<String>) -> Self {
        Self::new("analyze", file_path)
    }

    /// The request a razor cut sends: the source and the cut time in seconds.
    pub fn cut_clip(file_path: impl Into<String>, timestamp: f64) -> Self {
        Self {
            params: serde_json::json!({ "timestamp": timestamp }),
            ..Self::new("cut_clip", file_path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// One action the backend proposes for the selected source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// A finished request: the response body, or why there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReply {
    pub request: ActionRequest,
    pub outcome: std::result::Result<serde_json::Value, String>,
}

/// Hands a request to whatever executes backend actions. Must return
/// immediately; finished requests are collected with `poll_replies` and fed
/// to [`handle_reply`].
pub trait ActionDispatcher {
    fn dispatch(&self, request: ActionRequest);

    fn poll_replies(&self) -> Vec<ActionReply> {
        Vec::new()
    }
}

/// Logs every request and keeps a copy. Used when no backend is attached:
/// analysis comes back empty and every other action fails.
#[derive(Debug, Default)]
pub struct LogDispatcher {
    sent: RefCell<Vec<ActionRequest>>,
    pending: RefCell<VecDeque<ActionReply>>,
}

impl LogDispatcher {
    pub fn requests(&self) -> Vec<ActionRequest> {
        self.sent.borrow().clone()
    }
}

impl ActionDispatcher for LogDispatcher {
    fn dispatch(&self, request: ActionRequest) {
        log::info!(
            "Dispatch {} for {} {}",
            request.action,
            request.file_path,
            request.params
        );
        self.sent.borrow_mut().push(request.clone());
        let outcome = match request.action.as_str() {
            "cut_clip" => return,
            "analyze" => Ok(serde_json::json!({ "suggestions": [] })),
            _ => Err("No backend attached".to_string()),
        };
        self.pending
            .borrow_mut()
            .push_back(ActionReply { request, outcome });
    }

    fn poll_replies(&self) -> Vec<ActionReply> {
        self.pending.borrow_mut().drain(..).collect()
    }
}

/// Pulls every `t: <seconds>` out of a scene-detection log and converts it to
/// a timeline position.
pub fn parse_scene_cut_markers(log: &str) -> Vec<f64> {
    let mut markers = Vec::new();
    let mut rest = log;
    while let Some(idx) = rest.find("t:") {
        rest = &rest[idx + 2..];
        let trimmed = rest.trim_start();
        let run: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        // Only the first decimal point counts.
        let number = match run.match_indices('.').nth(1) {
            Some((second, _)) => &run[..second],
            None => run.as_str(),
        };
        if let Ok(secs) = number.parse::<f64>() {
            markers.push(seconds_to_px(secs));
        }
    }
    markers
}

/// Folds a backend response into the session for the clip it was run on.
pub fn apply_response(
    session: &mut EditSession,
    clip_id: &str,
    action: &str,
    response: &ActionResponse,
) {
    if response.is_success() {
        if let Some(output) = &response.output_file {
            let name = session
                .timeline
                .find_clip(clip_id)
                .map(|c| format!("AI_{}", c.name));
            if let Some(name) = name {
                session.timeline.replace_clip_source(clip_id, output, &name);
            }
            session.notify(NoticeLevel::Success, format!("Success: Applied {}", action));
            return;
        }
        if let (Some(log), "scene_cut") = (&response.log, action) {
            let markers = parse_scene_cut_markers(log);
            let count = markers.len();
            session.add_markers(markers);
            session.notify(
                NoticeLevel::Success,
                format!("Detected {} scene changes", count),
            );
            return;
        }
    }
    let level = if response.is_success() {
        NoticeLevel::Success
    } else {
        NoticeLevel::Error
    };
    let message = response
        .message
        .clone()
        .unwrap_or_else(|| "Action completed".to_string());
    session.notify(level, message);
}

/// Routes a finished request: analysis feeds the suggestion ribbon, clip
/// actions go through [`apply_response`]. Cut notifications are fire-and-forget.
pub fn handle_reply(session: &mut EditSession, reply: ActionReply) {
    let ActionReply { request, outcome } = reply;
    match request.action.as_str() {
        "cut_clip" => {}
        "analyze" => {
            let suggestions = outcome
                .and_then(|body| {
                    serde_json::from_value::<AnalyzeResponse>(body).map_err(|e| e.to_string())
                })
                .map(|res| res.suggestions)
                .unwrap_or_else(|e| {
                    log::warn!("Analysis of {} failed: {}", request.file_path, e);
                    Vec::new()
                });
            session.set_suggestions(&request.file_path, suggestions);
        }
        action => {
            let Some(clip_id) = request.clip_id.as_deref() else {
                log::debug!("Reply to {} has no clip to apply to", action);
                return;
            };
            let response = outcome.and_then(|body| {
                serde_json::from_value::<ActionResponse>(body).map_err(|e| e.to_string())
            });
            match response {
                Ok(response) => apply_response(session, clip_id, action, &response),
                Err(e) => session.notify(
                    NoticeLevel::Error,
                    format!("Failed to apply {}: {}", action, e),
                ),
            }
        }
    }
}

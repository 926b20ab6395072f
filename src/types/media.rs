use serde::{Deserialize, Serialize};

/// Path prefix marking synthetic sources (built-in transitions, effects)
/// that the media surface cannot play.
pub const BUILTIN_PREFIX: &str = "builtin";

/// Default clip widths (pixel-units) used on insert. The real media
/// duration is not probed at this layer.
pub const TRANSITION_WIDTH: f64 = 40.0;
pub const MEDIA_WIDTH: f64 = 200.0;

pub const TRANSITION_COLOR: [u8; 3] = [0x93, 0x33, 0xea];
pub const VIDEO_COLOR: [u8; 3] = [0x25, 0x63, 0xeb];
pub const AUDIO_COLOR: [u8; 3] = [0x16, 0xa3, 0x4a];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Audio,
}

/// What a clip (or a drag payload) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Video,
    Audio,
    Transition,
    Effect,
}

impl From<AssetKind> for ClipKind {
    fn from(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Video => ClipKind::Video,
            AssetKind::Audio => ClipKind::Audio,
        }
    }
}

/// An imported source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub kind: AssetKind,
    pub path: String,
    /// Display string only, e.g. `"00:00"`.
    pub duration: String,
}

/// Drag-and-drop payload describing something that can be placed on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPayload {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ClipKind,
}

impl AssetPayload {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: ClipKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// Parse a payload serialized as `{"name", "path", "type"}`.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A payload with an empty name or path is treated as absent.
    pub fn is_present(&self) -> bool {
        !self.name.is_empty() && !self.path.is_empty()
    }
}

impl From<&Asset> for AssetPayload {
    fn from(asset: &Asset) -> Self {
        AssetPayload::new(asset.name.clone(), asset.path.clone(), asset.kind.into())
    }
}

/// A per-channel colour wheel value (lift / gamma / gain).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const NEUTRAL: Rgb = Rgb::splat(1.0);

    pub const fn splat(v: f64) -> Self {
        Rgb { r: v, g: v, b: v }
    }
}

/// Inspector overrides. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipParams {
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub saturation: Option<f64>,
    pub contrast: Option<f64>,
    pub temperature: Option<f64>,
    pub tint: Option<f64>,
    pub volume: Option<f64>,
    pub lift: Option<Rgb>,
    pub gamma: Option<Rgb>,
    pub gain: Option<Rgb>,
}

impl ClipParams {
    pub fn pos_x(&self) -> f64 {
        self.pos_x.unwrap_or(0.0)
    }
    pub fn pos_y(&self) -> f64 {
        self.pos_y.unwrap_or(0.0)
    }
    /// Percent, 100 = original size.
    pub fn scale(&self) -> f64 {
        self.scale.unwrap_or(100.0)
    }
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(100.0)
    }
    pub fn saturation(&self) -> f64 {
        self.saturation.unwrap_or(100.0)
    }
    pub fn contrast(&self) -> f64 {
        self.contrast.unwrap_or(100.0)
    }
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(0.0)
    }
    pub fn tint(&self) -> f64 {
        self.tint.unwrap_or(0.0)
    }
    /// Percent, 100 = unity gain.
    pub fn volume(&self) -> f64 {
        self.volume.unwrap_or(100.0)
    }
    pub fn lift(&self) -> Rgb {
        self.lift.unwrap_or(Rgb::NEUTRAL)
    }
    pub fn gamma(&self) -> Rgb {
        self.gamma.unwrap_or(Rgb::NEUTRAL)
    }
    pub fn gain(&self) -> Rgb {
        self.gain.unwrap_or(Rgb::NEUTRAL)
    }

    /// Apply one inspector edit, clamping to the control's range.
    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::PosX(v) => self.pos_x = Some(v),
            ParamUpdate::PosY(v) => self.pos_y = Some(v),
            ParamUpdate::Scale(v) => self.scale = Some(v.clamp(1.0, 500.0)),
            ParamUpdate::Opacity(v) => self.opacity = Some(v.clamp(0.0, 100.0)),
            ParamUpdate::Saturation(v) => self.saturation = Some(v.clamp(0.0, 200.0)),
            ParamUpdate::Contrast(v) => self.contrast = Some(v.clamp(0.0, 200.0)),
            ParamUpdate::Temperature(v) => self.temperature = Some(v.clamp(-100.0, 100.0)),
            ParamUpdate::Tint(v) => self.tint = Some(v.clamp(-100.0, 100.0)),
            ParamUpdate::Volume(v) => self.volume = Some(v.clamp(0.0, 200.0)),
            ParamUpdate::Lift(v) => self.lift = Some(Rgb::splat(v.clamp(0.0, 2.0))),
            ParamUpdate::Gamma(v) => self.gamma = Some(Rgb::splat(v.clamp(0.0, 2.0))),
            ParamUpdate::Gain(v) => self.gain = Some(Rgb::splat(v.clamp(0.0, 2.0))),
        }
    }
}

/// A single inspector edit. Colour wheels set all three channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    PosX(f64),
    PosY(f64),
    Scale(f64),
    Opacity(f64),
    Saturation(f64),
    Contrast(f64),
    Temperature(f64),
    Tint(f64),
    Volume(f64),
    Lift(f64),
    Gamma(f64),
    Gain(f64),
}

/// Position and length of a clip, in pixel-units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpan {
    pub start: f64,
    pub width: f64,
}

impl ClipSpan {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }
}

/// A placed instance of media on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub name: String,
    pub path: String,
    pub kind: ClipKind,
    /// Position in pixel-units, always `>= 0`.
    pub start: f64,
    /// Length in pixel-units, always `>= 1`.
    pub width: f64,
    pub color: [u8; 3],
    #[serde(default)]
    pub params: ClipParams,
}

impl Clip {
    pub fn span(&self) -> ClipSpan {
        ClipSpan {
            start: self.start,
            width: self.width,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    /// Strictly inside the clip; the edges do not count.
    pub fn spans(&self, pos: f64) -> bool {
        self.start < pos && pos < self.end()
    }

    /// Inclusive on both edges, used to pick the clip under the playhead.
    pub fn covers(&self, pos: f64) -> bool {
        self.start <= pos && pos <= self.end()
    }

    pub fn is_synthetic(&self) -> bool {
        self.path.starts_with(BUILTIN_PREFIX)
    }

    /// Whether the preview can hand this clip to a media element.
    pub fn is_playable(&self) -> bool {
        matches!(self.kind, ClipKind::Video | ClipKind::Audio) && !self.is_synthetic()
    }
}

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "CUTLINE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cutline.json";

/// Top-level configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub preview: PreviewConfig,
    pub transport: TransportConfig,
    pub export: ExportSettings,
    /// How long a notice stays on screen, in milliseconds.
    pub notice_ttl_ms: u64,
}

/// Tolerances and defaults used by the preview sync bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Allowed drift (seconds) while playing before the media element is re-seeked.
    pub playing_tolerance: f64,
    /// Allowed drift (seconds) while paused / scrubbing.
    pub scrub_tolerance: f64,
    /// Initial global monitor volume, 0..=100.
    pub default_volume: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            playing_tolerance: 0.3,
            scrub_tolerance: 0.01,
            default_volume: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Frame index the `End` key jumps to. Not derived from content length.
    pub end_frame: i64,
    /// Frames moved by `J` / `L`.
    pub shuttle_frames: i64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            end_frame: 1500,
            shuttle_frames: 10,
        }
    }
}

/// Display-only export settings. `display_fps` is never used for snapping,
/// which always runs at 25 fps (see `types::coords`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub display_fps: f64,
    pub resolution: (u32, u32),
    pub sample_rate: u32,
    pub output_path: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            display_fps: 24.0,
            resolution: (1920, 1080),
            sample_rate: 48_000,
            output_path: "exports/sequence.mp4".to_string(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            preview: PreviewConfig::default(),
            transport: TransportConfig::default(),
            export: ExportSettings::default(),
            notice_ttl_ms: 4000,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<EditorConfig> {
        let mut file = File::open(path)?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let config: EditorConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Resolve the config path from `CUTLINE_CONFIG` (falling back to
    /// `cutline.json`) and load it. A missing or broken file yields defaults.
    pub fn load_or_default() -> EditorConfig {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        if !Path::new(&path).exists() {
            log::debug!("No config at {}, using defaults", path);
            return EditorConfig::new();
        }
        match EditorConfig::load_from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                EditorConfig::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::new();
        assert_eq!(config.preview.playing_tolerance, 0.3);
        assert_eq!(config.preview.scrub_tolerance, 0.01);
        assert_eq!(config.preview.default_volume, 80.0);
        assert_eq!(config.transport.end_frame, 1500);
        assert_eq!(config.export.display_fps, 24.0);
        assert_eq!(config.notice_ttl_ms, 4000);
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutline.json");
        let mut config = EditorConfig::new();
        config.preview.default_volume = 55.0;
        config.transport.end_frame = 3000;
        config.save_to_file(&path).unwrap();

        let loaded = EditorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "preview": {{ "scrub_tolerance": 0.04 }} }}"#).unwrap();

        let loaded = EditorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.preview.scrub_tolerance, 0.04);
        assert_eq!(loaded.preview.playing_tolerance, 0.3);
        assert_eq!(loaded.transport.end_frame, 1500);
        assert_eq!(loaded.notice_ttl_ms, 4000);
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ nope").unwrap();
        assert!(EditorConfig::load_from_file(file.path()).is_err());
    }
}

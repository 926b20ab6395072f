use crate::types::media::{Asset, AssetKind, AssetPayload, ClipKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Imported assets, in import order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaLibrary {
    assets: Vec<Asset>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        MediaLibrary { assets: Vec::new() }
    }

    pub fn add(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Add a file to the library, inferring its kind from the extension:
    /// `.mp3` and `.wav` are audio, anything else is treated as video.
    pub fn import(&mut self, path: &Path) -> &Asset {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "New Asset".to_string());
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let kind = match ext.as_str() {
            "mp3" | "wav" => AssetKind::Audio,
            _ => AssetKind::Video,
        };
        let asset = Asset {
            id: format!("asset-{}", uuid::Uuid::new_v4().simple()),
            name,
            kind,
            path: path.to_string_lossy().to_string(),
            duration: "00:00".to_string(),
        };
        log::info!("Imported {} as {:?}", asset.name, asset.kind);
        self.assets.push(asset);
        &self.assets[self.assets.len() - 1]
    }

    pub fn remove(&mut self, id: &str) -> Option<Asset> {
        let idx = self.assets.iter().position(|a| a.id == id)?;
        Some(self.assets.remove(idx))
    }
}

/// Synthetic transitions and effects that can be dropped on a track but are
/// never handed to the media surface.
pub fn builtin_transitions() -> Vec<AssetPayload> {
    vec![
        AssetPayload::new("Cross Dissolve", "builtin:cross_dissolve", ClipKind::Transition),
        AssetPayload::new("Dip to Black", "builtin:dip_to_black", ClipKind::Transition),
        AssetPayload::new("Film Grain", "builtin:film_grain", ClipKind::Effect),
    ]
}

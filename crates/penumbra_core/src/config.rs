use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-facing render settings. Every field has a default, so an empty JSON
/// object is a valid settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Higher tiers are cheaper: shadow maps shrink by half per tier and
    /// tiers above 3 skip post-processing entirely.
    pub quality_tier: u32,
    pub cell_shading: bool,
    pub neon_color: [f32; 3],
    /// rgb is added to the composite, w scales the bloom sum.
    pub screen_tint: [f32; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            quality_tier: 0,
            cell_shading: false,
            neon_color: [0.0, 1.0, 1.0],
            screen_tint: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderSettings {
    pub const MAX_SHADOW_MAP_SIZE: u32 = 1024;
    pub const LAST_POST_PROCESSING_TIER: u32 = 3;

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        log::info!("loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Edge length of every light's square shadow map.
    pub fn shadow_map_size(&self) -> u32 {
        Self::MAX_SHADOW_MAP_SIZE
            .checked_shr(self.quality_tier)
            .unwrap_or(0)
            .max(1)
    }

    pub fn bypasses_post_processing(&self) -> bool {
        self.quality_tier > Self::LAST_POST_PROCESSING_TIER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = RenderSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let settings = RenderSettings::from_json_str(r#"{ "quality_tier": 4 }"#).unwrap();
        assert_eq!(settings.quality_tier, 4);
        assert_eq!(settings.neon_color, [0.0, 1.0, 1.0]);
        assert!(settings.bypasses_post_processing());
    }

    #[test]
    fn shadow_maps_halve_per_tier() {
        let sizes: Vec<u32> = (0..5)
            .map(|quality_tier| {
                RenderSettings {
                    quality_tier,
                    ..Default::default()
                }
                .shadow_map_size()
            })
            .collect();
        assert_eq!(sizes, vec![1024, 512, 256, 128, 64]);
    }

    #[test]
    fn absurd_tier_still_yields_a_texel() {
        let settings = RenderSettings {
            quality_tier: 64,
            ..Default::default()
        };
        assert_eq!(settings.shadow_map_size(), 1);
    }

    #[test]
    fn tier_three_keeps_post_processing() {
        let settings = RenderSettings {
            quality_tier: 3,
            ..Default::default()
        };
        assert!(!settings.bypasses_post_processing());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = RenderSettings::from_json_str("{ quality_tier: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RenderSettings::from_path("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

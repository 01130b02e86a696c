//! Configuration for the viewport engine and the tile pipeline
//!
//! Every option is fixed at construction. Values can be built in code, taken
//! from the defaults in [`crate::core::constants`], or parsed from JSON.

use crate::core::constants::{
    MAX_SUPPORTED_ZOOM, MAX_ZOOM, MIN_ZOOM, OVERSCAN_TILES, OVERVIEW_SIZE, TILE_SIZE,
    WHEEL_THRESHOLD,
};
use crate::core::geo::Size;
use crate::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

/// Which map point a wheel zoom keeps fixed.
///
/// Zoom buttons and keyboard shortcuts have no cursor and always keep the
/// viewport center fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoomFocus {
    #[default]
    ViewportCenter,
    Cursor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub initial_zoom: u8,
    pub overview_size: f64,
    pub wheel_threshold: f64,
    pub overscan_tiles: u32,
    pub zoom_focus: ZoomFocus,
    /// Extent assumed until the host measures the real window
    pub viewport: Size,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            initial_zoom: MIN_ZOOM,
            overview_size: OVERVIEW_SIZE,
            wheel_threshold: WHEEL_THRESHOLD,
            overscan_tiles: OVERSCAN_TILES,
            zoom_focus: ZoomFocus::default(),
            viewport: Size::default(),
        }
    }
}

impl ViewportConfig {
    /// Rejects constants that would make the coordinate math ill-defined.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(Error::Config("tile_size must be positive".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(Error::Config(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(Error::Config(format!(
                "max_zoom ({}) exceeds the supported maximum ({})",
                self.max_zoom, MAX_SUPPORTED_ZOOM
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(Error::Config(format!(
                "initial_zoom ({}) outside [{}, {}]",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if !self.overview_size.is_finite() || self.overview_size <= 0.0 {
            return Err(Error::Config("overview_size must be a positive number".into()));
        }
        if !self.wheel_threshold.is_finite() || self.wheel_threshold <= 0.0 {
            return Err(Error::Config("wheel_threshold must be a positive number".into()));
        }
        if !self.viewport.width.is_finite()
            || !self.viewport.height.is_finite()
            || self.viewport.width < 0.0
            || self.viewport.height < 0.0
        {
            return Err(Error::Config("viewport extent must be finite and non-negative".into()));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLoadingConfig {
    /// URL with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    /// Appended as a `token` query parameter when present
    pub token: Option<String>,
    pub cache_size: usize,
    pub max_concurrent: usize,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            token: None,
            cache_size: 256,
            max_concurrent: 8,
            user_agent: concat!("tileview/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Unified configuration presets for TileLoadingConfig
impl TileLoadingConfig {
    pub fn low_resource() -> Self {
        Self {
            cache_size: 64,
            max_concurrent: 2,
            ..Self::default()
        }
    }

    pub fn high_performance() -> Self {
        Self {
            cache_size: 1024,
            max_concurrent: 32,
            ..Self::default()
        }
    }

    pub fn for_testing() -> Self {
        Self {
            url_template: "test://{z}/{x}/{y}".to_string(),
            cache_size: 32,
            max_concurrent: 4,
            timeout_ms: 1_000,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(Error::Config(format!(
                    "url_template is missing the {placeholder} placeholder"
                )));
            }
        }
        if self.cache_size == 0 {
            return Err(Error::Config("cache_size must be positive".into()));
        }
        if self.max_concurrent == 0 {
            return Err(Error::Config("max_concurrent must be positive".into()));
        }
        Ok(())
    }
}

/// Everything the viewer needs, as stored in its JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewport: ViewportConfig,
    pub tiles: TileLoadingConfig,
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        self.tiles.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| {
        log::warn!("rejected configuration: {}", e);
        Error::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = ViewportConfig::default();
        assert_eq!(config.tile_size, 512);
        assert_eq!((config.min_zoom, config.max_zoom), (0, 3));
        assert_eq!(config.overview_size, 200.0);
        assert_eq!(config.wheel_threshold, 100.0);
        assert_eq!(config.overscan_tiles, 3);
        assert_eq!(config.viewport, Size::new(1400.0, 800.0));
        assert_eq!(config.zoom_focus, ZoomFocus::ViewportCenter);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let zero_tile = ViewportConfig {
            tile_size: 0,
            ..ViewportConfig::default()
        };
        assert!(matches!(zero_tile.validate(), Err(Error::Config(_))));

        let inverted = ViewportConfig {
            min_zoom: 4,
            max_zoom: 2,
            initial_zoom: 2,
            ..ViewportConfig::default()
        };
        assert!(inverted.validate().is_err());

        let too_deep = ViewportConfig {
            max_zoom: MAX_SUPPORTED_ZOOM + 1,
            ..ViewportConfig::default()
        };
        assert!(too_deep.validate().is_err());

        let initial_out_of_range = ViewportConfig {
            initial_zoom: 9,
            ..ViewportConfig::default()
        };
        assert!(initial_out_of_range.validate().is_err());

        let no_threshold = ViewportConfig {
            wheel_threshold: 0.0,
            ..ViewportConfig::default()
        };
        assert!(no_threshold.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewportConfig::from_json_str(
            r#"{ "tile_size": 256, "max_zoom": 5, "zoom_focus": "cursor" }"#,
        )
        .unwrap();
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.max_zoom, 5);
        assert_eq!(config.zoom_focus, ZoomFocus::Cursor);
        assert_eq!(config.overview_size, OVERVIEW_SIZE);
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        let result = ViewportConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_tile_loading_presets() {
        let low = TileLoadingConfig::low_resource();
        let high = TileLoadingConfig::high_performance();
        assert!(low.max_concurrent < high.max_concurrent);
        assert!(low.cache_size < high.cache_size);
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_url_template_requires_placeholders() {
        let config = TileLoadingConfig {
            url_template: "https://tiles.example/{z}/{x}.png".into(),
            ..TileLoadingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_viewer_config_from_json() {
        let config = ViewerConfig::from_json_str(
            r#"{
                "viewport": { "max_zoom": 4, "initial_zoom": 1 },
                "tiles": { "url_template": "https://t.example/tiles/{z}/{x}/{y}", "token": "abc" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.viewport.max_zoom, 4);
        assert_eq!(config.viewport.initial_zoom, 1);
        assert_eq!(config.tiles.token.as_deref(), Some("abc"));
        assert_eq!(config.tiles.cache_size, TileLoadingConfig::default().cache_size);
    }
}

//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all) is
//! a valid configuration. Scale limits are fixed constants and not part of it.

use serde::{Deserialize, Serialize};

use crate::animation::{DEFAULT_DURATION_MS, Easing};
use crate::error::ConfigError;
use crate::viewport::bounds::WorldBounds;
use crate::viewport::edge::DEFAULT_EDGE_HOLD_MS;
use crate::viewport::zoom::DEFAULT_ZOOM_INTENSITY;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default padding between the world edge and the surface edge, in pixels.
pub const DEFAULT_SCREEN_PADDING: f64 = 100.0;
/// Default background grid spacing, in world units.
pub const DEFAULT_GRID_SPACING: f64 = 50.0;
/// Default distance between a block and a child expanded from it.
pub const DEFAULT_CHILD_SPACING: f64 = 320.0;

/// Tunables for the viewport engine and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub world_bounds: WorldBounds,
    pub screen_padding: f64,
    pub zoom_intensity: f64,
    pub edge_flash_ms: f64,
    pub transition_ms: f64,
    pub easing: Easing,
    pub grid_spacing: f64,
    pub child_spacing: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            world_bounds: WorldBounds::default(),
            screen_padding: DEFAULT_SCREEN_PADDING,
            zoom_intensity: DEFAULT_ZOOM_INTENSITY,
            edge_flash_ms: DEFAULT_EDGE_HOLD_MS,
            transition_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            grid_spacing: DEFAULT_GRID_SPACING,
            child_spacing: DEFAULT_CHILD_SPACING,
        }
    }
}

impl ViewportConfig {
    /// Checks that every numeric field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.world_bounds.is_well_formed() {
            return Err(ConfigError::invalid(
                "world_bounds",
                "bounds must be finite with min < max on both axes",
            ));
        }
        non_negative("screen_padding", self.screen_padding)?;
        positive("zoom_intensity", self.zoom_intensity)?;
        non_negative("edge_flash_ms", self.edge_flash_ms)?;
        non_negative("transition_ms", self.transition_ms)?;
        positive("grid_spacing", self.grid_spacing)?;
        positive("child_spacing", self.child_spacing)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("expected a positive number, got {value}"),
        ));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("expected a non-negative number, got {value}"),
        ));
    }
    Ok(())
}

/// Where ideas are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// HTTP API root; `None` keeps ideas in memory
    pub base_url: Option<String>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub viewport: ViewportConfig,
    pub store: StoreConfig,
    /// `EnvFilter` directive for the log sink
    pub log_filter: String,
    pub owner_id: String,
    pub project_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            store: StoreConfig::default(),
            log_filter: "info,arbor_core=debug".to_string(),
            owner_id: "local".to_string(),
            project_id: "demo".to_string(),
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::config::AppConfig;
    ///
    /// let config = AppConfig::from_json(r#"{ "project_id": "roadmap" }"#)?;
    /// assert_eq!(config.project_id, "roadmap");
    /// assert_eq!(config.viewport.screen_padding, 100.0);
    /// # Ok::<(), arbor_core::error::ConfigError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.viewport.validate()?;
        if let Some(url) = &config.store.base_url {
            if url.trim().is_empty() {
                return Err(ConfigError::invalid("store.base_url", "cannot be blank"));
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.viewport.zoom_intensity, 0.0015);
        assert_eq!(config.viewport.edge_flash_ms, 450.0);
        assert_eq!(config.viewport.transition_ms, 500.0);
        assert_eq!(config.viewport.grid_spacing, 50.0);
        assert_eq!(config.store.base_url, None);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "viewport": { "easing": "linear", "world_bounds": { "min_x": -10, "min_y": -10, "max_x": 10, "max_y": 10 } },
            "store": { "base_url": "https://api.example.test" },
            "owner_id": "u-1"
        }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.viewport.easing, Easing::Linear);
        assert_eq!(config.viewport.world_bounds.max_x, 10.0);
        assert_eq!(config.viewport.screen_padding, 100.0);
        assert_eq!(
            config.store.base_url.as_deref(),
            Some("https://api.example.test")
        );
        assert_eq!(config.owner_id, "u-1");
        assert_eq!(config.project_id, "demo");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            AppConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let json = r#"{ "viewport": { "grid_spacing": 0 } }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::Invalid {
                field: "grid_spacing",
                ..
            })
        ));

        let json = r#"{ "viewport": { "world_bounds": { "min_x": 5, "min_y": 0, "max_x": -5, "max_y": 10 } } }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::Invalid {
                field: "world_bounds",
                ..
            })
        ));

        let json = r#"{ "store": { "base_url": "  " } }"#;
        assert!(AppConfig::from_json(json).is_err());
    }

    #[test]
    fn test_zero_transition_is_allowed() {
        let config = ViewportConfig {
            transition_ms: 0.0,
            ..ViewportConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = ViewportConfig {
            zoom_intensity: f64::NAN,
            ..ViewportConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

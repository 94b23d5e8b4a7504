//! Globe configuration: renderer options, pointer controls and the marker list.
//!
//! Loaded from TOML. Every field has a default, so a config file only needs
//! the values it wants to override.

use crate::error::ConfigError;
use crate::markers::{default_markers, Marker};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Normalized RGB triple, each channel in 0.0-1.0.
pub type Rgb = [f32; 3];

/// Pointer and animation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Radians added to the baseline angle on every idle frame.
    pub auto_rotate_speed: f64,
    /// Horizontal pixels of drag per radian of rotation.
    pub drag_divisor: f64,
    /// Maximum angular distance (radians) for a marker to count as hovered.
    pub hover_threshold: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            auto_rotate_speed: 0.005,
            drag_divisor: 200.0,
            hover_threshold: 0.3,
        }
    }
}

/// Top-level globe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Logical surface size before the terminal layout overrides it.
    pub width: usize,
    pub height: usize,
    pub device_pixel_ratio: usize,
    /// Initial camera angles (radians)
    pub phi: f64,
    pub theta: f64,
    /// Dark tint amount; values >= 0.5 fill the globe disc with a dark backdrop.
    pub dark: f32,
    /// How strongly dots fade towards the limb (0 = flat).
    pub diffuse: f32,
    /// Number of dot samples spread over the sphere.
    pub map_samples: usize,
    pub map_brightness: f32,
    pub base_color: Rgb,
    pub marker_color: Rgb,
    pub glow_color: Rgb,
    pub markers: Vec<Marker>,
    /// Optional GeoJSON file with land polygons.
    pub land_geojson: Option<PathBuf>,
    pub controls: ControlsConfig,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            device_pixel_ratio: 2,
            phi: 0.0,
            theta: 0.3,
            dark: 0.0,
            diffuse: 0.4,
            map_samples: 16_000,
            map_brightness: 1.2,
            base_color: [1.0, 1.0, 1.0],
            marker_color: [251.0 / 255.0, 100.0 / 255.0, 21.0 / 255.0],
            glow_color: [1.0, 1.0, 1.0],
            markers: default_markers(),
            land_geojson: None,
            controls: ControlsConfig::default(),
        }
    }
}

impl GlobeConfig {
    pub fn is_dark(&self) -> bool {
        self.dark >= 0.5
    }

    /// Check value ranges, collecting every problem into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.width == 0 || self.height == 0 {
            errors.push("width and height must be positive".to_string());
        }
        if self.device_pixel_ratio == 0 {
            errors.push("device_pixel_ratio must be positive".to_string());
        }
        if self.map_samples == 0 {
            errors.push("map_samples must be positive".to_string());
        }
        validate_range(&mut errors, "dark", self.dark as f64, 0.0, 1.0);
        validate_range(&mut errors, "diffuse", self.diffuse as f64, 0.0, 1.0);
        validate_range(&mut errors, "map_brightness", self.map_brightness as f64, 0.0, 10.0);
        validate_color(&mut errors, "base_color", self.base_color);
        validate_color(&mut errors, "marker_color", self.marker_color);
        validate_color(&mut errors, "glow_color", self.glow_color);

        for (i, marker) in self.markers.iter().enumerate() {
            validate_range(&mut errors, &format!("markers[{i}].latitude"), marker.lat(), -90.0, 90.0);
            validate_range(&mut errors, &format!("markers[{i}].longitude"), marker.lon(), -180.0, 180.0);
            validate_range(&mut errors, &format!("markers[{i}].size"), marker.size, 0.0, 1.0);
        }

        let controls = &self.controls;
        if !(controls.drag_divisor > 0.0) {
            errors.push("controls.drag_divisor must be positive".to_string());
        }
        if !(controls.hover_threshold > 0.0) {
            errors.push("controls.hover_threshold must be positive".to_string());
        }
        if !controls.auto_rotate_speed.is_finite() {
            errors.push("controls.auto_rotate_speed must be finite".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}

fn validate_color(errors: &mut Vec<String>, name: &str, color: Rgb) {
    for (channel, value) in ["r", "g", "b"].iter().zip(color) {
        validate_range(errors, &format!("{name}.{channel}"), value as f64, 0.0, 1.0);
    }
}

/// Parse a config from TOML text and validate it.
pub fn parse(content: &str) -> Result<GlobeConfig, ConfigError> {
    let config: GlobeConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_from_path(path: &Path) -> Result<GlobeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&content)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load from `path` if given, otherwise use defaults.
pub fn load(path: Option<&Path>) -> Result<GlobeConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => Ok(GlobeConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GlobeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.markers.len(), 10);
        assert_eq!(config.controls.drag_divisor, 200.0);
        assert!((config.theta - 0.3).abs() < 1e-12);
        assert!(!config.is_dark());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = parse(
            r#"
            dark = 1.0
            map_samples = 4000

            [controls]
            hover_threshold = 0.2
            "#,
        )
        .unwrap();
        assert!(config.is_dark());
        assert_eq!(config.map_samples, 4000);
        assert_eq!(config.controls.hover_threshold, 0.2);
        assert_eq!(config.controls.auto_rotate_speed, 0.005);
        assert_eq!(config.markers, default_markers());
    }

    #[test]
    fn test_custom_markers() {
        let config = parse(
            r#"
            [[markers]]
            name = "Reykjavik"
            description = "Northernmost capital"
            location = [64.1466, -21.9426]
            size = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.markers.len(), 1);
        assert_eq!(config.markers[0].lat(), 64.1466);
    }

    #[test]
    fn test_validation_collects_errors() {
        let mut config = GlobeConfig::default();
        config.base_color = [1.5, 0.0, 0.0];
        config.map_samples = 0;
        config.controls.drag_divisor = 0.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_color.r"));
        assert!(err.contains("map_samples"));
        assert!(err.contains("drag_divisor"));
    }

    #[test]
    fn test_bad_marker_latitude() {
        let mut config = GlobeConfig::default();
        config.markers[2].location = [95.0, 0.0];
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("markers[2].latitude"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse("map_samples = \"lots\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(load(None).unwrap(), GlobeConfig::default());
    }
}

//! Viewer configuration.
//!
//! Everything is optional: a missing field takes its default, and a missing
//! file means the defaults are used as-is. The config is read once at startup
//! and never written back.
//!
//! ```json
//! {
//!   "title": "Galaxy",
//!   "background": "#000000",
//!   "blend_mode": "additive",
//!   "camera": { "fov_y": 75.0, "position": [0.0, 10.0, 10.0] },
//!   "galaxy": { "count": 100000, "branches": 5, "inside_color": "#ff6030" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::error::ConfigError;
use crate::params::{ParameterSet, Rgb};
use crate::visuals::BlendMode;

/// Initial camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub enable_damping: bool,
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let projection = PerspectiveCamera::default();
        Self {
            fov_y: projection.fov_y,
            near: projection.near,
            far: projection.far,
            position: [0.0, 10.0, 10.0],
            target: [0.0, 0.0, 0.0],
            enable_damping: true,
            damping_factor: 0.05,
        }
    }
}

impl CameraConfig {
    /// Projection for a viewport with the given aspect.
    pub fn projection(&self, aspect: f32) -> PerspectiveCamera {
        let defaults = PerspectiveCamera::default();
        let fov_y = if self.fov_y.is_finite() && self.fov_y > 1.0 && self.fov_y < 179.0 {
            self.fov_y
        } else {
            defaults.fov_y
        };
        let (near, far) = if self.near > 0.0 && self.far > self.near {
            (self.near, self.far)
        } else {
            (defaults.near, defaults.far)
        };
        let mut camera = PerspectiveCamera {
            fov_y,
            aspect: defaults.aspect,
            near,
            far,
        };
        camera.set_aspect(aspect);
        camera
    }

    pub fn controls(&self) -> OrbitControls {
        let mut controls = OrbitControls::new(Vec3::from(self.position), Vec3::from(self.target));
        controls.enable_damping = self.enable_damping;
        if self.damping_factor > 0.0 && self.damping_factor <= 1.0 {
            controls.damping_factor = self.damping_factor;
        }
        controls
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    pub background: Rgb,
    pub camera: CameraConfig,
    pub blend_mode: BlendMode,
    /// Image whose green channel shapes each point. A procedural soft disc
    /// is used when unset.
    pub particle_texture: Option<PathBuf>,
    /// Fixed RNG seed. Each regeneration draws from one stream seeded with
    /// this value; unset means seeded from entropy.
    pub seed: Option<u64>,
    pub show_panel: bool,
    pub galaxy: ParameterSet,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Galaxy".to_string(),
            width: 1280,
            height: 720,
            background: Rgb::BLACK,
            camera: CameraConfig::default(),
            blend_mode: BlendMode::default(),
            particle_texture: None,
            seed: None,
            show_panel: true,
            galaxy: ParameterSet::default(),
        }
    }
}

impl ViewerConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp galaxy parameters into their slider bounds and fix degenerate
    /// window sizes.
    pub fn sanitized(mut self) -> Self {
        self.galaxy = self.galaxy.sanitized();
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_galaxy_override() {
        let json = r##"{
            "title": "Two arms",
            "background": "#101020",
            "blend_mode": "alpha",
            "galaxy": { "branches": 2, "inside_color": "#00ff00" }
        }"##;
        let config = ViewerConfig::from_json(json).unwrap();
        assert_eq!(config.title, "Two arms");
        assert_eq!(config.background, Rgb::from_u32(0x101020));
        assert_eq!(config.blend_mode, BlendMode::Alpha);
        assert_eq!(config.galaxy.branches, 2);
        assert_eq!(config.galaxy.inside_color, Rgb::from_u32(0x00ff00));
        assert_eq!(config.galaxy.count, ParameterSet::default().count);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = ViewerConfig::from_json(r#"{"width": 0, "galaxy": {"radius": 500.0, "spin": -9.0}}"#).unwrap();
        assert_eq!(config.width, 1);
        assert_eq!(config.galaxy.radius, 20.0);
        assert_eq!(config.galaxy.spin, -5.0);
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let err = ViewerConfig::from_json(r#"{"background": "blue"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_signed_hex_color_is_parse_error() {
        for json in [r#"{"background": "+10203"}"#, r##"{"background": "#+fffff"}"##] {
            let err = ViewerConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{json} was accepted");
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ViewerConfig::load("no/such/galaxy.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_camera_config_builds_controls() {
        let camera = CameraConfig::default();
        let controls = camera.controls();
        assert!(controls.position().distance(Vec3::new(0.0, 10.0, 10.0)) < 1e-4);

        let projection = CameraConfig { near: 5.0, far: 1.0, ..camera }.projection(2.0);
        assert_eq!(projection.aspect, 2.0);
        assert_eq!(projection.near, 0.1);
        assert_eq!(projection.far, 100.0);
    }
}

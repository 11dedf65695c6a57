//! # Galaxy
//!
//! A procedural spiral galaxy rendered as a GPU point cloud, with a live
//! parameter panel.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxy::{Viewer, ViewerConfig};
//!
//! fn main() -> Result<(), galaxy::ViewerError> {
//!     Viewer::run(ViewerConfig::default())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Parameters
//!
//! A [`ParameterSet`] describes a galaxy: point count, radius, number of
//! arms, spin, jitter, gradient colors, and rotation speed. Values are
//! bounded by their [`Control`] ranges.
//!
//! ### Generation
//!
//! [`generate`] turns parameters into a [`PointCloud`] of parallel position
//! and color arrays. Randomness is injected, so seeded RNGs reproduce the
//! same galaxy, and generation needs no GPU:
//!
//! ```
//! use galaxy::{generate, ParameterSet};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let params = ParameterSet { count: 500, branches: 5, ..Default::default() };
//! let cloud = generate(&params, &mut SmallRng::seed_from_u64(1));
//! assert_eq!(cloud.point_count(), 500);
//! ```
//!
//! ### Scene
//!
//! [`SceneHost`] owns the one displayed cloud and its GPU handle. Each
//! regeneration releases the previous handle before installing the new one.
//! [`RenderLoop`] rotates the installed cloud by `elapsed * rotation_speed`
//! and steps the camera damping once per frame.
//!
//! ### Controls
//!
//! | Input | Effect |
//! |-------|--------|
//! | Left drag | Orbit |
//! | Right / middle drag | Pan |
//! | Wheel | Zoom |
//! | Arrow keys | Pan |
//! | Double-click | Toggle fullscreen |
//! | Escape | Leave fullscreen |
//! | H | Hide / show the panel |
//!
//! ## Logging
//!
//! The crate logs through [`log`]. The binary installs `env_logger` with an
//! `info` default, so `RUST_LOG=debug` shows resizes and FPS readouts.

pub mod camera;
pub mod config;
pub mod control_panel;
pub mod error;
pub mod generator;
mod gpu;
pub mod input;
pub mod params;
pub mod point_cloud;
pub mod render_loop;
pub mod scene;
mod shader;
pub mod textures;
pub mod time;
pub mod viewport;
pub mod visuals;
mod window;

pub use camera::{OrbitControls, PanDirection, PerspectiveCamera};
pub use config::{CameraConfig, ViewerConfig};
pub use control_panel::{CommitGate, ControlPanel, PanelAction};
pub use error::{ConfigError, GpuError, TextureError, ViewerError};
pub use generator::generate;
pub use glam::{Mat4, Vec3};
pub use params::{Bounds, Control, ParameterSet, ParseColorError, Rgb};
pub use point_cloud::PointCloud;
pub use render_loop::{FrameStats, RenderLoop};
pub use scene::{GeometryBackend, Installed, SceneHost};
pub use textures::AlphaMap;
pub use time::Time;
pub use viewport::{DoubleClickDetector, Resize, Viewport};
pub use visuals::BlendMode;
pub use window::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use galaxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{generate, ParameterSet, PointCloud, Rgb};
    pub use crate::{SceneHost, GeometryBackend, RenderLoop};
    pub use crate::{Viewer, ViewerConfig, ViewerError};
    pub use crate::{Vec3, Mat4};
}

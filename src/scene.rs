//! Ownership of the displayed point cloud.
//!
//! [`SceneHost`] holds at most one installed cloud together with the backend
//! handle for its GPU resources. [`SceneHost::regenerate`] is the only way to
//! replace it, and it always releases the old handle before the new one is
//! installed.

use rand::Rng;

use crate::generator::generate;
use crate::params::ParameterSet;
use crate::point_cloud::PointCloud;

/// Uploads point clouds somewhere renderable and frees them again.
///
/// The wgpu renderer implements this with vertex buffers.
pub trait GeometryBackend {
    /// Resources backing one uploaded cloud.
    type Handle;

    fn upload(&mut self, cloud: &PointCloud) -> Self::Handle;

    /// Free the resources. The handle is consumed, so it can't be released twice.
    fn release(&mut self, handle: Self::Handle);
}

/// A cloud that is currently on screen.
#[derive(Debug)]
pub struct Installed<H> {
    pub cloud: PointCloud,
    pub handle: H,
    /// Rotation about the vertical axis, in radians.
    pub rotation: f32,
}

/// Owns the single live point cloud.
pub struct SceneHost<B: GeometryBackend> {
    current: Option<Installed<B::Handle>>,
    generation: u64,
}

impl<B: GeometryBackend> SceneHost<B> {
    pub fn new() -> Self {
        Self {
            current: None,
            generation: 0,
        }
    }

    /// Build a new cloud from `params` and make it the displayed one.
    ///
    /// Safe on first use, when nothing is installed yet. The new cloud starts
    /// with the previous cloud's rotation so a regeneration doesn't jump.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, backend: &mut B, params: &ParameterSet, rng: &mut R) {
        let cloud = generate(params, rng);
        self.install(backend, cloud);
    }

    /// Replace the displayed cloud with an already generated one.
    pub fn install(&mut self, backend: &mut B, cloud: PointCloud) {
        let rotation = self.rotation();
        if let Some(old) = self.current.take() {
            backend.release(old.handle);
        }
        let handle = backend.upload(&cloud);
        self.current = Some(Installed {
            cloud,
            handle,
            rotation,
        });
        self.generation += 1;
    }

    /// Release the displayed cloud, leaving the scene empty.
    pub fn clear(&mut self, backend: &mut B) {
        if let Some(old) = self.current.take() {
            backend.release(old.handle);
        }
    }

    pub fn current(&self) -> Option<&Installed<B::Handle>> {
        self.current.as_ref()
    }

    pub fn cloud(&self) -> Option<&PointCloud> {
        self.current.as_ref().map(|c| &c.cloud)
    }

    pub fn handle(&self) -> Option<&B::Handle> {
        self.current.as_ref().map(|c| &c.handle)
    }

    /// Rotation of the displayed cloud, 0 when empty.
    pub fn rotation(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |c| c.rotation)
    }

    /// Set the displayed cloud's rotation. Does nothing when the scene is empty.
    pub fn set_rotation(&mut self, angle: f32) {
        if let Some(current) = &mut self.current {
            current.rotation = angle;
        }
    }

    pub fn point_count(&self) -> u32 {
        self.cloud().map_or(0, PointCloud::point_count)
    }

    /// How many clouds have been installed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<B: GeometryBackend> Default for SceneHost<B> {
    fn default() -> Self {
        Self::new()
    }
}

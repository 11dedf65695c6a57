use bytemuck::{Pod, Zeroable};
use glam::Mat4;

pub const GALAXY_SHADER: &str = include_str!("galaxy.wgsl");
pub const PRESENT_SHADER: &str = include_str!("present.wgsl");

/// Vertices per point sprite (two triangles).
pub const QUAD_VERTICES: u32 = 6;

/// Per-frame uniforms for the galaxy pass. Layout matches `Uniforms` in
/// `galaxy.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub _padding: f32,
}

impl Uniforms {
    pub fn new(view_proj: Mat4, rotation: f32, viewport: (u32, u32), point_size: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: Mat4::from_rotation_y(rotation).to_cols_array_2d(),
            viewport: [viewport.0 as f32, viewport.1 as f32],
            point_size,
            _padding: 0.0,
        }
    }
}

//! Blending options for the point cloud.

use serde::{Deserialize, Serialize};

/// Blend mode for galaxy points.
///
/// Controls how point colors combine with the background and each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Additive blending (default).
    ///
    /// Overlapping points become brighter, which makes the dense core glow.
    #[default]
    Additive,

    /// Standard alpha blending.
    Alpha,
}

impl BlendMode {
    /// The wgpu blend state for this mode.
    pub fn to_blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

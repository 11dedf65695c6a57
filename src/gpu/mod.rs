//! wgpu rendering: surface setup, the galaxy pass, the present pass, and the
//! optional egui overlay.

#[cfg(feature = "egui")]
pub mod egui_integration;
mod galaxy;
mod scene_target;

use std::sync::Arc;

use glam::Mat4;
use winit::window::Window;

use crate::error::GpuError;
use crate::params::Rgb;
use crate::shader::Uniforms;
use crate::textures::AlphaMap;
use crate::visuals::BlendMode;

#[cfg(feature = "egui")]
use egui_integration::{EguiFrameOutput, EguiIntegration};
pub use galaxy::{PointBuffers, PointUploader};
use galaxy::GalaxyRenderer;
use scene_target::{SceneTarget, SCENE_FORMAT};

/// Everything the galaxy pass needs for one frame.
pub struct SceneFrame<'a> {
    pub view_proj: Mat4,
    /// Rotation of the cloud about the vertical axis.
    pub rotation: f32,
    pub point_size: f32,
    pub points: Option<&'a PointBuffers>,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    galaxy: GalaxyRenderer,
    target: SceneTarget,
    uploader: PointUploader,
    clear_color: wgpu::Color,
    #[cfg(feature = "egui")]
    pub egui: EguiIntegration,
}

impl GpuState {
    /// Set up the device and pipelines for `window`.
    ///
    /// `drawing_buffer` is the offscreen resolution (see
    /// [`Viewport::drawing_buffer_size`](crate::viewport::Viewport::drawing_buffer_size)).
    pub async fn new(
        window: Arc<Window>,
        drawing_buffer: (u32, u32),
        background: Rgb,
        blend_mode: BlendMode,
        alpha_map: &AlphaMap,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;
        let device = Arc::new(device);

        // Colors are authored as plain 0..1 channel values, so write them to
        // a non-sRGB surface untouched. egui also expects gamma-space output.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = match surface_caps.formats.iter().find(|f| !f.is_srgb()).copied() {
            Some(format) => format,
            None => {
                let format = surface_caps.formats.first().copied().ok_or(GpuError::NoAdapter)?;
                log::warn!("No linear surface format available, colors will be gamma-encoded ({:?})", format);
                format
            }
        };
        log::info!("Surface format {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let galaxy = GalaxyRenderer::new(&device, &queue, SCENE_FORMAT, blend_mode, alpha_map);
        let target = SceneTarget::new(&device, drawing_buffer.0, drawing_buffer.1, surface_format);
        let uploader = PointUploader::new(device.clone());

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(&device, surface_format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            galaxy,
            target,
            uploader,
            clear_color: wgpu::Color {
                r: background.r as f64,
                g: background.g as f64,
                b: background.b as f64,
                a: 1.0,
            },
            #[cfg(feature = "egui")]
            egui,
        })
    }

    /// Backend that uploads point clouds into this device's buffers.
    pub fn uploader(&mut self) -> &mut PointUploader {
        &mut self.uploader
    }

    /// Reconfigure the surface and the offscreen target. Zero-sized surfaces
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, drawing_buffer: (u32, u32)) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.target.resize(&self.device, drawing_buffer.0, drawing_buffer.1);
            log::debug!(
                "Resized surface to {}x{}, drawing buffer {}x{}",
                new_size.width,
                new_size.height,
                drawing_buffer.0,
                drawing_buffer.1
            );
        }
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        scene: &SceneFrame<'_>,
        #[cfg(feature = "egui")] ui: Option<&EguiFrameOutput>,
    ) -> Result<(), wgpu::SurfaceError> {
        let uniforms = Uniforms::new(scene.view_proj, scene.rotation, self.target.size(), scene.point_size);
        self.galaxy.update_uniforms(&self.queue, &uniforms);

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Galaxy Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(points) = scene.points {
                self.galaxy.draw(&mut render_pass, points);
            }
        }

        self.target.present(&mut encoder, &view);

        #[cfg(feature = "egui")]
        if let Some(ui) = ui {
            self.egui.render(
                &self.device,
                &self.queue,
                &mut encoder,
                &view,
                ui,
                [self.config.width, self.config.height],
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "egui")]
        if let Some(ui) = ui {
            self.egui.cleanup(ui);
        }

        Ok(())
    }
}

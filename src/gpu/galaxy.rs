//! Point-sprite pipeline and vertex buffers for the galaxy.

use std::sync::Arc;

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::point_cloud::PointCloud;
use crate::scene::GeometryBackend;
use crate::shader::{Uniforms, GALAXY_SHADER, QUAD_VERTICES};
use crate::textures::AlphaMap;
use crate::visuals::BlendMode;

/// Bytes per position or color entry (three f32).
const VERTEX_STRIDE: wgpu::BufferAddress = 12;

/// Vertex buffers for one uploaded cloud.
///
/// Empty clouds own no buffers, since zero-sized vertex buffers can't be
/// bound.
#[derive(Debug)]
pub struct PointBuffers {
    positions: Option<wgpu::Buffer>,
    colors: Option<wgpu::Buffer>,
    count: u32,
}

/// Uploads point clouds into vertex buffers.
pub struct PointUploader {
    device: Arc<wgpu::Device>,
}

impl PointUploader {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self { device }
    }
}

impl GeometryBackend for PointUploader {
    type Handle = PointBuffers;

    fn upload(&mut self, cloud: &PointCloud) -> PointBuffers {
        if cloud.is_empty() {
            return PointBuffers {
                positions: None,
                colors: None,
                count: 0,
            };
        }

        let positions = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Positions"),
            contents: bytemuck::cast_slice(&cloud.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let colors = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Colors"),
            contents: bytemuck::cast_slice(&cloud.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        PointBuffers {
            positions: Some(positions),
            colors: Some(colors),
            count: cloud.point_count(),
        }
    }

    fn release(&mut self, handle: PointBuffers) {
        for buffer in [handle.positions, handle.colors].into_iter().flatten() {
            buffer.destroy();
        }
    }
}

/// Pipeline, uniforms and alpha map for drawing points.
pub struct GalaxyRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GalaxyRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        blend_mode: BlendMode,
        alpha_map: &AlphaMap,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Uniform Buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let alpha_texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Alpha Map"),
                size: wgpu::Extent3d {
                    width: alpha_map.width,
                    height: alpha_map.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &alpha_map.data,
        );
        let alpha_view = alpha_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Alpha Map Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Galaxy Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Galaxy Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&alpha_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Galaxy Shader"),
            source: wgpu::ShaderSource::Wgsl(GALAXY_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Galaxy Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Galaxy Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: VERTEX_STRIDE,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // position
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: VERTEX_STRIDE,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3, // color
                        }],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(blend_mode.to_blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // No depth attachment: points never occlude each other.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &Uniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record the draw. Empty clouds draw nothing.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, points: &PointBuffers) {
        let (Some(positions), Some(colors)) = (&points.positions, &points.colors) else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, positions.slice(..));
        render_pass.set_vertex_buffer(1, colors.slice(..));
        render_pass.draw(0..QUAD_VERTICES, 0..points.count);
    }
}

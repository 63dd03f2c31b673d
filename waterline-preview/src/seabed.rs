//! Opaque stage for the preview: a seabed that slopes up through the water
//! line, so the absorption gradient and the shoreline are both visible.

use glam::Vec3;
use waterline_render::pipeline::vertex_buffer_layout;
use waterline_render::render_targets::DEPTH_FORMAT;
use waterline_render::shared::Vertex;
use waterline_render::{
    GpuMesh, RenderStage, Renderer, RenderingContext, SceneResources, WaterSettings,
};

pub const SEABED_SHADER: &str = include_str!("../shaders/seabed.wgsl");

const SAND: Vec3 = Vec3::new(0.76, 0.69, 0.5);
const DEPTH_BELOW_WATER: f32 = 1.0;
/// Rise per world unit along +X.
const SLOPE: f32 = 0.12;

/// Floor height under grid point `(x, z)` of a water body.
pub fn floor_height(water: &WaterSettings, x: f32, z: f32) -> f32 {
    let ripple = (z * 0.9).sin() * 0.08;
    water.level - DEPTH_BELOW_WATER + x * SLOPE + ripple
}

/// Flat-shaded floor covering the same area as the water grid.
pub fn seabed_mesh(water: &WaterSettings) -> (Vec<Vertex>, Vec<u32>) {
    let n = water.tiles_count;
    let step = water.tile_size;
    let point = |i: u32, j: u32| {
        let (x, z) = (i as f32 * step, j as f32 * step);
        Vec3::new(x, floor_height(water, x, z), z)
    };

    let mut vertices = Vec::with_capacity((n * n * 6) as usize);
    for i in 0..n {
        for j in 0..n {
            let (a, b, c, d) = (point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1));
            for tri in [[a, d, c], [a, c, b]] {
                let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
                vertices.extend(tri.iter().map(|&p| Vertex::new(p, normal, SAND)));
            }
        }
    }
    let indices = (0..vertices.len() as u32).collect();
    (vertices, indices)
}

pub struct SeabedRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: GpuMesh,
}

impl SeabedRenderer {
    pub fn new(
        device: &wgpu::Device,
        scene: &SceneResources,
        color_format: wgpu::TextureFormat,
        water: &WaterSettings,
    ) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Seabed"),
            source: wgpu::ShaderSource::Wgsl(SEABED_SHADER.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Seabed Pipeline Layout"),
            bind_group_layouts: &[scene.layout()],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Seabed Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[vertex_buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (vertices, indices) = seabed_mesh(water);
        let mesh = GpuMesh::upload(device, "Seabed", &vertices, &indices);

        Self { pipeline, mesh }
    }
}

impl Renderer for SeabedRenderer {
    fn label(&self) -> &str {
        "Seabed"
    }

    fn stage(&self) -> RenderStage {
        RenderStage::Opaque
    }

    fn render(&mut self, ctx: &mut RenderingContext<'_>) -> waterline_render::Result<()> {
        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Seabed Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, ctx.scene_bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
        Ok(())
    }
}

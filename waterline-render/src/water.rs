//! The water surface renderer: one indexed draw in the transparent stage.

use wgpu::util::DeviceExt;

use crate::mesh::{GpuMesh, WaterGrid};
use crate::passes::water::render_water_pass;
use crate::pipeline;
use crate::scene::SceneResources;
use crate::schedule::{RenderStage, Renderer, RenderingContext};
use crate::settings::WaterSettings;
use crate::Result;

pub struct WaterRenderer {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    mesh: GpuMesh,
    settings: WaterSettings,
}

impl WaterRenderer {
    pub fn new(
        device: &wgpu::Device,
        scene: &SceneResources,
        color_format: wgpu::TextureFormat,
        settings: WaterSettings,
    ) -> Result<Self> {
        settings.validate()?;

        let material_layout = pipeline::create_water_bgl(device);
        let pipeline =
            pipeline::create_water_pipeline(device, scene.layout(), &material_layout, color_format);

        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Material"),
            contents: bytemuck::bytes_of(&settings.uniforms()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Material Bind Group"),
            layout: &material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });

        let mesh = GpuMesh::from_grid(device, &WaterGrid::generate(&settings));

        log::info!(
            "Water renderer ready: {}x{} tiles of {} at level {}",
            settings.tiles_count,
            settings.tiles_count,
            settings.tile_size,
            settings.level
        );

        Ok(Self {
            pipeline,
            material_layout,
            material_buffer,
            material_bind_group,
            mesh,
            settings,
        })
    }

    pub fn settings(&self) -> &WaterSettings {
        &self.settings
    }

    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }

    /// Replace the material and, if the grid shape or albedo changed, the mesh.
    /// Invalid settings leave the renderer untouched.
    pub fn set_settings(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        settings: WaterSettings,
    ) -> Result<()> {
        settings.validate()?;

        let old = self.settings;
        if old.tiles_count != settings.tiles_count
            || old.tile_size != settings.tile_size
            || old.level != settings.level
            || old.color != settings.color
        {
            log::debug!("Water grid changed, regenerating mesh");
            self.mesh = GpuMesh::from_grid(device, &WaterGrid::generate(&settings));
        }

        queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::bytes_of(&settings.uniforms()),
        );
        self.settings = settings;
        Ok(())
    }
}

impl Renderer for WaterRenderer {
    fn label(&self) -> &str {
        "Water Surface"
    }

    fn stage(&self) -> RenderStage {
        RenderStage::Transparent
    }

    fn render(&mut self, ctx: &mut RenderingContext<'_>) -> Result<()> {
        render_water_pass(
            ctx.encoder,
            ctx.color_view,
            ctx.depth_view,
            &self.pipeline,
            ctx.scene_bind_group,
            &self.material_bind_group,
            &self.mesh,
        );
        Ok(())
    }
}

//! Group 0: per-frame scene uniforms plus the opaque snapshot the water samples.

use glam::Vec3;
use waterline_gpu_shared::{GlobalLightData, SceneUniforms};

use crate::camera::Camera;
use crate::render_targets::{create_opaque_snapshot, OpaqueSnapshot};
use crate::{pipeline, validate, Result};

/// Single directional light. `direction` is the way the light travels, so a
/// sun overhead shines along -Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.4, -1.0, -0.3),
            color: Vec3::splat(0.9),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub light: DirectionalLight,
    pub ambient: Vec3,
    pub clear_color: wgpu::Color,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            light: DirectionalLight::default(),
            ambient: Vec3::splat(0.15),
            clear_color: wgpu::Color::BLACK,
        }
    }
}

impl Environment {
    /// Assemble this frame's scene block. The light direction is normalized
    /// here; a zero direction stays zero and fails validation on upload.
    pub fn scene_uniforms(
        &self,
        camera: &mut Camera,
        surface_size: (u32, u32),
        time: f32,
    ) -> SceneUniforms {
        SceneUniforms {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_dir: camera.look_dir().extend(0.0).to_array(),
            camera_pos: camera.position().extend(1.0).to_array(),
            surface_size: [surface_size.0 as f32, surface_size.1 as f32],
            near_plane: camera.near_plane(),
            far_plane: camera.far_plane(),
            light: GlobalLightData::new(self.light.direction.normalize_or_zero(), self.light.color),
            ambient_color: self.ambient.to_array(),
            time,
        }
    }
}

/// GPU side of group 0.
pub struct SceneResources {
    layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    snapshot: OpaqueSnapshot,
    bind_group: wgpu::BindGroup,
    uniforms: Option<SceneUniforms>,
}

fn create_scene_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    sampler: &wgpu::Sampler,
    snapshot: &OpaqueSnapshot,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&snapshot.color_view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(&snapshot.depth_view),
            },
        ],
    })
}

impl SceneResources {
    /// `color_format` must match the live color target the snapshot copies from.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let layout = pipeline::create_scene_bgl(device);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = pipeline::create_snapshot_sampler(device);
        let snapshot = create_opaque_snapshot(device, color_format, width.max(1), height.max(1));
        let bind_group = create_scene_bind_group(device, &layout, &buffer, &sampler, &snapshot);

        log::debug!("Scene resources created at {width}x{height} ({color_format:?})");

        Self {
            layout,
            buffer,
            sampler,
            snapshot,
            bind_group,
            uniforms: None,
        }
    }

    /// Validate and upload this frame's scene block. On error the previous
    /// contents stay on the GPU.
    pub fn update(&mut self, queue: &wgpu::Queue, uniforms: SceneUniforms) -> Result<()> {
        validate::scene_uniforms(&uniforms)?;
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniforms));
        self.uniforms = Some(uniforms);
        Ok(())
    }

    /// Recreate the snapshot for a new target size. Zero sizes are ignored.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || self.snapshot.size() == (width, height) {
            return;
        }
        self.snapshot = create_opaque_snapshot(device, self.snapshot.color_format, width, height);
        self.bind_group =
            create_scene_bind_group(device, &self.layout, &self.buffer, &self.sampler, &self.snapshot);
        log::debug!("Opaque snapshot resized to {width}x{height}");
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn snapshot(&self) -> &OpaqueSnapshot {
        &self.snapshot
    }

    /// Last successfully uploaded scene block, if any.
    pub fn uniforms(&self) -> Option<&SceneUniforms> {
        self.uniforms.as_ref()
    }

    /// Whether a valid scene block has been uploaded.
    pub fn is_ready(&self) -> bool {
        self.uniforms.is_some()
    }
}

//! Textures the water stage reads or writes: the opaque snapshot and the
//! depth target hosts can use for their opaque pass.

/// Depth format for the live depth buffer and its snapshot. Copyable and sampleable.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Copy of the opaque pass output, taken before any transparent work.
///
/// The water pass samples these while writing to the live targets, so the
/// two never alias.
pub struct OpaqueSnapshot {
    pub color_texture: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub color_format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl OpaqueSnapshot {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Create snapshot textures matching a `color_format` target of the given size.
pub fn create_opaque_snapshot(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> OpaqueSnapshot {
    let size = extent(width, height);
    let usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;

    let color_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Opaque Snapshot Color"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: color_format,
        usage,
        view_formats: &[],
    });

    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Opaque Snapshot Depth"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage,
        view_formats: &[],
    });

    let view_desc = wgpu::TextureViewDescriptor::default();

    OpaqueSnapshot {
        color_view: color_texture.create_view(&view_desc),
        color_texture,
        depth_view: depth_texture.create_view(&view_desc),
        depth_texture,
        color_format,
        width,
        height,
    }
}

/// Live depth buffer for the opaque and water passes. `COPY_SRC` so it can be snapshotted.
pub fn create_depth_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Scene Depth"),
        size: extent(width, height),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

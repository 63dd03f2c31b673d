//! Opaque snapshot copy, the barrier between the opaque and transparent stages.

use crate::render_targets::OpaqueSnapshot;
use crate::{Error, Result};

/// Copy the finished opaque color and depth into `snapshot`.
///
/// Both sources must match the snapshot size; the color source must share its format.
pub fn capture_opaque(
    encoder: &mut wgpu::CommandEncoder,
    color_source: &wgpu::Texture,
    depth_source: &wgpu::Texture,
    snapshot: &OpaqueSnapshot,
) -> Result<()> {
    let target = (color_source.width(), color_source.height());
    if target != snapshot.size() || (depth_source.width(), depth_source.height()) != target {
        return Err(Error::SnapshotMismatch {
            snapshot: snapshot.size(),
            target,
        });
    }

    let size = wgpu::Extent3d {
        width: snapshot.width,
        height: snapshot.height,
        depth_or_array_layers: 1,
    };

    encoder.copy_texture_to_texture(
        wgpu::ImageCopyTexture {
            texture: color_source,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyTexture {
            texture: &snapshot.color_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        size,
    );

    encoder.copy_texture_to_texture(
        wgpu::ImageCopyTexture {
            texture: depth_source,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::DepthOnly,
        },
        wgpu::ImageCopyTexture {
            texture: &snapshot.depth_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::DepthOnly,
        },
        size,
    );

    Ok(())
}

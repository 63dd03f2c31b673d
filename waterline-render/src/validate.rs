//! Host-side checks for the numerical preconditions of the water program.
//!
//! Violations would not crash the GPU; they would produce garbage pixels
//! (division by zero in depth linearization, NaN from normalizing a zero
//! light direction). Uploads go through these first.

use waterline_gpu_shared::{SceneUniforms, WaterUniforms};

use crate::{Error, Result};

const MIN_LENGTH: f32 = 1e-6;

fn finite(values: &[f32], what: &'static str) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFinite(what))
    }
}

/// Check clip planes, surface size, light direction and finiteness.
pub fn scene_uniforms(scene: &SceneUniforms) -> Result<()> {
    finite(scene.view_proj.as_flattened(), "view_proj")?;
    finite(&scene.camera_pos, "camera_pos")?;
    finite(&scene.camera_dir, "camera_dir")?;
    finite(&scene.light.direction, "light direction")?;
    finite(&scene.light.color, "light color")?;
    finite(&scene.ambient_color, "ambient_color")?;
    finite(&[scene.time], "time")?;

    let (near, far) = (scene.near_plane, scene.far_plane);
    if !(near.is_finite() && far.is_finite() && near > 0.0 && near < far) {
        return Err(Error::ClipPlanes { near, far });
    }

    let [width, height] = scene.surface_size;
    if !(width >= 1.0 && height >= 1.0) {
        return Err(Error::EmptySurface { width, height });
    }

    if scene.light.direction().length() < MIN_LENGTH {
        return Err(Error::DegenerateVector("light direction"));
    }

    Ok(())
}

/// Check that the uploaded surface size matches the target being drawn.
/// Screen UVs index the snapshot through it, so a stale size misplaces every
/// depth lookup.
pub fn surface_size(scene: &SceneUniforms, target: (u32, u32)) -> Result<()> {
    let [width, height] = scene.surface_size;
    if width != target.0 as f32 || height != target.1 as f32 {
        return Err(Error::SurfaceSizeMismatch {
            uniforms: (width, height),
            target,
        });
    }
    Ok(())
}

/// Check the material block: positive specular exponent, non-negative density.
pub fn water_uniforms(water: &WaterUniforms) -> Result<()> {
    finite(
        &[water.specular, water.density, water.alpha, water.wave_height],
        "water scalars",
    )?;
    finite(&water.specular_color, "specular_color")?;
    finite(&water.wave_speed, "wave_speed")?;
    finite(&water.wave_scale, "wave_scale")?;

    if water.specular <= 0.0 {
        return Err(Error::Material(format!(
            "specular exponent must be positive, got {}",
            water.specular
        )));
    }
    if water.density < 0.0 {
        return Err(Error::Material(format!(
            "density must not be negative, got {}",
            water.density
        )));
    }
    if !(0.0..=1.0).contains(&water.alpha) {
        return Err(Error::Material(format!(
            "base alpha must be within [0, 1], got {}",
            water.alpha
        )));
    }

    Ok(())
}

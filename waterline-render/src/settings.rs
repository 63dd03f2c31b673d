//! Water material and grid configuration.

use glam::{Vec2, Vec3};
use waterline_gpu_shared::WaterUniforms;

use crate::{validate, Error, Result};

/// Everything that shapes one water body: its grid, colour, lighting response,
/// absorption and waves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterSettings {
    /// Edge length of one grid tile in world units.
    pub tile_size: f32,
    /// Tiles along each horizontal axis.
    pub tiles_count: u32,
    /// Albedo, written into every vertex.
    pub color: Vec3,
    /// Phong exponent.
    pub specular: f32,
    pub specular_color: Vec3,
    /// Beer-Lambert absorption coefficient; higher reads as murkier water.
    pub density: f32,
    /// Base opacity. Carried in the material block; the fragment stage
    /// derives opacity from water thickness alone.
    pub alpha: f32,
    /// World height of the undisplaced surface.
    pub level: f32,
    pub wave_speed: Vec2,
    pub wave_scale: Vec2,
    pub wave_height: f32,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            tile_size: 0.75,
            tiles_count: 15,
            color: Vec3::new(0.2, 0.5, 0.96),
            specular: 64.0,
            specular_color: Vec3::new(0.75, 0.84, 0.97),
            density: 150.0,
            alpha: 1.0,
            level: -0.25,
            wave_speed: Vec2::new(0.8, 0.4),
            wave_scale: Vec2::new(0.4, 0.4),
            wave_height: 0.2,
        }
    }
}

impl WaterSettings {
    /// Pack the material block for group 1.
    pub fn uniforms(&self) -> WaterUniforms {
        WaterUniforms {
            specular: self.specular,
            density: self.density,
            alpha: self.alpha,
            wave_height: self.wave_height,
            specular_color: self.specular_color.to_array(),
            wave_speed: self.wave_speed.to_array(),
            wave_scale: self.wave_scale.to_array(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tiles_count == 0 {
            return Err(Error::Material("grid must have at least one tile".into()));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(Error::Material(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if !(self.level.is_finite() && self.color.is_finite()) {
            return Err(Error::NonFinite("water level or color"));
        }
        validate::water_uniforms(&self.uniforms())
    }
}

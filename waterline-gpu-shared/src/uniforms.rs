use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Directional light data, nested in `SceneUniforms`.
/// `direction` is the unit direction the light travels in, from the light
/// into the scene; `w` is unused.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GlobalLightData {
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

impl GlobalLightData {
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.extend(0.0).to_array(),
            color: color.extend(1.0).to_array(),
        }
    }

    pub fn direction(&self) -> Vec3 {
        Vec3::from_slice(&self.direction[..3])
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_slice(&self.color[..3])
    }
}

/// Per-frame scene data. Matches GPU bind group 0, binding 0.
/// Shared by every shading stage that draws into the frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_dir: [f32; 4],
    pub camera_pos: [f32; 4],
    /// Output surface size in pixels, used to turn fragment coordinates into screen UV.
    pub surface_size: [f32; 2],
    pub near_plane: f32,
    pub far_plane: f32,
    pub light: GlobalLightData,
    pub ambient_color: [f32; 3],
    /// Seconds since the host started animating. Never decreases.
    pub time: f32,
}

impl SceneUniforms {
    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }

    pub fn camera_dir(&self) -> Vec3 {
        Vec3::from_slice(&self.camera_dir[..3])
    }

    pub fn camera_pos(&self) -> Vec3 {
        Vec3::from_slice(&self.camera_pos[..3])
    }

    pub fn surface_size(&self) -> Vec2 {
        Vec2::from_array(self.surface_size)
    }

    pub fn ambient_color(&self) -> Vec3 {
        Vec3::from_array(self.ambient_color)
    }
}

/// Water material data. Matches GPU bind group 1, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaterUniforms {
    /// Specular exponent.
    pub specular: f32,
    /// Absorption density; higher values turn opaque over shorter distances.
    pub density: f32,
    /// Base alpha, reserved for material blending. The absorption alpha does not read it.
    pub alpha: f32,
    pub wave_height: f32,
    pub specular_color: [f32; 3],
    pub _pad0: f32,
    pub wave_speed: [f32; 2],
    pub wave_scale: [f32; 2],
}

impl WaterUniforms {
    pub fn specular_color(&self) -> Vec3 {
        Vec3::from_array(self.specular_color)
    }

    pub fn wave_speed(&self) -> Vec2 {
        Vec2::from_array(self.wave_speed)
    }

    pub fn wave_scale(&self) -> Vec2 {
        Vec2::from_array(self.wave_scale)
    }
}

/// Interleaved vertex record: position, normal, color at shader locations 0, 1, 2.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Not read by the water program; kept so every stage shares one vertex format.
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }
}

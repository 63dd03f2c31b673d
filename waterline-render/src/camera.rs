//! Perspective camera producing the view-projection and eye data for the
//! scene uniforms.

use glam::{Mat4, Quat, Vec3};

/// Left-handed perspective camera. Matrices are rebuilt on first read after
/// any parameter changes.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    rotation: Quat,
    /// Vertical field of view in degrees.
    fov: f32,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,

    dirty: bool,
    view: Mat4,
    proj: Mat4,
    view_proj: Mat4,
}

impl Camera {
    pub fn new(
        position: Vec3,
        rotation: Quat,
        fov: f32,
        aspect_ratio: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            rotation,
            fov,
            aspect_ratio,
            near_plane,
            far_plane,
            dirty: true,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            view_proj: Mat4::IDENTITY,
        };
        camera.refresh();
        camera
    }

    /// Camera at `eye` facing `target`, with +Y up.
    pub fn looking_at(
        eye: Vec3,
        target: Vec3,
        fov: f32,
        aspect_ratio: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Self {
        let view = Mat4::look_at_lh(eye, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        Self::new(eye, rotation, fov, aspect_ratio, near_plane, far_plane)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.dirty = true;
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.dirty = true;
    }

    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    pub fn set_clip_planes(&mut self, near_plane: f32, far_plane: f32) {
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self.dirty = true;
    }

    /// Unit forward vector, +Z in camera space.
    pub fn look_dir(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn view(&mut self) -> Mat4 {
        self.refresh();
        self.view
    }

    pub fn proj(&mut self) -> Mat4 {
        self.refresh();
        self.proj
    }

    pub fn view_proj(&mut self) -> Mat4 {
        self.refresh();
        self.view_proj
    }

    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.view = Mat4::from_rotation_translation(self.rotation, self.position).inverse();
        self.proj = Mat4::perspective_lh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        );
        self.view_proj = self.proj * self.view;
        self.dirty = false;
    }
}

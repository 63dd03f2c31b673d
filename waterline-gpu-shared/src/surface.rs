//! CPU mirror of the water program in `shaders/water.wgsl`.
//!
//! Every function here is a pure function of its arguments, the same way each
//! vertex or fragment invocation is on the GPU. Keep the two in lockstep: a
//! change to the WGSL math must land here too, and the tests below are the
//! executable contract for both.

use glam::{Vec2, Vec3, Vec4};

use crate::uniforms::{SceneUniforms, WaterUniforms};

/// Pseudo-random gradient for a lattice point, each component in [-1, 1].
pub fn hash_gradient(p: Vec2) -> Vec2 {
    let q = Vec2::new(
        p.dot(Vec2::new(127.1, 311.7)),
        p.dot(Vec2::new(269.5, 183.3)),
    );
    let s = Vec2::new(q.x.sin(), q.y.sin()) * 43758.5453;
    // WGSL fract is x - floor(x), which differs from f32::fract for negatives.
    (s - s.floor()) * 2.0 - 1.0
}

/// 2D gradient noise. Continuous, seedless, and zero on every lattice point.
///
/// Each corner contributes `dot(gradient, offset)` with `|gradient| <= sqrt(2)`
/// and `|offset| <= sqrt(2)`, and the blend is convex, so the result is always
/// within [-2, 2] and in practice close to [-1, 1].
pub fn gradient_noise(v: Vec2) -> f32 {
    let cell = v.floor();
    let f = v - cell;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash_gradient(cell).dot(f);
    let b = hash_gradient(cell + Vec2::X).dot(f - Vec2::X);
    let c = hash_gradient(cell + Vec2::Y).dot(f - Vec2::Y);
    let d = hash_gradient(cell + Vec2::ONE).dot(f - Vec2::ONE);

    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

/// WGSL `mix`.
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wave animation parameters of a water material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub speed: Vec2,
    pub scale: Vec2,
    pub height: f32,
}

impl Wave {
    pub fn from_uniforms(water: &WaterUniforms) -> Self {
        Self {
            speed: water.wave_speed(),
            scale: water.wave_scale(),
            height: water.wave_height,
        }
    }

    /// Point in the noise field sampled for a vertex at `position`.
    pub fn sample_point(&self, position: Vec3, time: f32) -> Vec2 {
        Vec2::new(position.x, position.z) * self.scale + time * self.speed
    }

    /// Lift `position` vertically by the noise height. X and Z are untouched.
    pub fn displace(&self, position: Vec3, time: f32) -> Vec3 {
        let height = gradient_noise(self.sample_point(position, time)) * self.height;
        Vec3::new(position.x, position.y + height, position.z)
    }
}

/// Normal from the screen-space derivatives of the displaced world position.
///
/// `dpdx` / `dpdy` are the per-pixel changes along the two screen axes, with
/// screen y growing downwards. For a viewer above the surface the result
/// points down, along the light's direction of travel, so `dot(normal, light)`
/// is positive on lit faces. The result is constant across a primitive,
/// giving the faceted look.
pub fn reconstruct_normal(dpdx: Vec3, dpdy: Vec3) -> Vec3 {
    dpdy.normalize().cross(dpdx.normalize()).normalize()
}

/// Ambient + Lambert diffuse + specular lighting for one directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub camera_pos: Vec3,
    /// Unit direction the light travels in.
    pub light_dir: Vec3,
    pub light_color: Vec3,
    pub ambient: Vec3,
    pub specular_color: Vec3,
    pub specular: f32,
}

impl Lighting {
    pub fn from_uniforms(scene: &SceneUniforms, water: &WaterUniforms) -> Self {
        Self {
            camera_pos: scene.camera_pos(),
            light_dir: scene.light.direction(),
            light_color: scene.light.color(),
            ambient: scene.ambient_color(),
            specular_color: water.specular_color(),
            specular: water.specular,
        }
    }

    /// Light reaching the surface, before the albedo is applied.
    pub fn irradiance(&self, world_pos: Vec3, normal: Vec3) -> Vec3 {
        let view_dir = (world_pos - self.camera_pos).normalize();
        let reflected = reflect(-self.light_dir, normal);

        let diffuse = normal.dot(self.light_dir).max(0.0);
        let specular = view_dir.dot(reflected).max(0.0).powf(self.specular);

        self.ambient + self.light_color * diffuse + self.specular_color * specular
    }

    pub fn shade(&self, albedo: Vec3, world_pos: Vec3, normal: Vec3) -> Vec3 {
        albedo * self.irradiance(world_pos, normal)
    }
}

/// WGSL `reflect`: `i - 2 * dot(n, i) * n`.
fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * n.dot(i) * n
}

/// Map a [0, 1] depth-buffer value to [-1, 1] NDC depth.
pub fn depth_to_ndc(depth: f32) -> f32 {
    depth * 2.0 - 1.0
}

/// Perspective linearization of an NDC depth, normalized by `far`.
/// Returns `near / far` at the near plane and `1` at the far plane.
pub fn linearize_depth(ndc_depth: f32, near: f32, far: f32) -> f32 {
    2.0 * near * far / (far + near - ndc_depth * (far - near)) / far
}

/// Beer-Lambert style absorption: `1 - 2^(-density * dist)`.
///
/// Zero at `dist = 0`, rising towards 1. Negative `dist` gives a negative
/// value, which the fragment stage clamps to fully transparent.
pub fn absorption_alpha(density: f32, dist: f32) -> f32 {
    1.0 - (-density * dist).exp2()
}

/// Depth-based translucency against the opaque depth snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Translucency {
    pub near: f32,
    pub far: f32,
    pub density: f32,
}

impl Translucency {
    pub fn from_uniforms(scene: &SceneUniforms, water: &WaterUniforms) -> Self {
        Self {
            near: scene.near_plane,
            far: scene.far_plane,
            density: water.density,
        }
    }

    /// Linear, far-normalized distance for a [0, 1] depth-buffer value.
    pub fn linearize(&self, depth: f32) -> f32 {
        linearize_depth(depth_to_ndc(depth), self.near, self.far)
    }

    /// Water thickness the view ray crosses before hitting opaque geometry.
    pub fn thickness(&self, opaque_depth: f32, surface_depth: f32) -> f32 {
        self.linearize(opaque_depth) - self.linearize(surface_depth)
    }

    /// Unclamped absorption alpha; negative when the surface is behind the opaque depth.
    pub fn alpha(&self, opaque_depth: f32, surface_depth: f32) -> f32 {
        absorption_alpha(self.density, self.thickness(opaque_depth, surface_depth))
    }
}

/// Screen UV of a fragment from its framebuffer position.
pub fn screen_uv(frag_coord: Vec2, surface_size: Vec2) -> Vec2 {
    frag_coord / surface_size
}

/// Inputs of one water fragment invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentInput {
    pub albedo: Vec3,
    pub world_pos: Vec3,
    pub dpdx: Vec3,
    pub dpdy: Vec3,
    /// Fragment depth in [0, 1], as written to the depth buffer.
    pub depth: f32,
    /// Opaque snapshot depth at this fragment's screen UV.
    pub opaque_depth: f32,
}

/// Evaluate `fs_main`: straight RGBA with alpha clamped to [0, 1).
pub fn shade_fragment(lighting: &Lighting, translucency: &Translucency, input: &FragmentInput) -> Vec4 {
    let normal = reconstruct_normal(input.dpdx, input.dpdy);
    let color = lighting.shade(input.albedo, input.world_pos, normal);
    let alpha = translucency.alpha(input.opaque_depth, input.depth);
    color.extend(alpha.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    fn sample_points() -> impl Iterator<Item = Vec2> {
        (-40..40).flat_map(|i| {
            (-40..40).map(move |j| Vec2::new(i as f32 * 0.173 + 0.01, j as f32 * 0.291 - 0.02))
        })
    }

    #[test]
    fn noise_is_finite_and_bounded() {
        for p in sample_points() {
            let n = gradient_noise(p);
            assert!(n.is_finite(), "noise({p}) = {n}");
            assert!(n.abs() <= 2.0, "noise({p}) = {n}");
        }
    }

    #[test]
    fn noise_is_pure() {
        for p in sample_points().take(200) {
            assert_eq!(gradient_noise(p).to_bits(), gradient_noise(p).to_bits());
        }
    }

    #[test]
    fn noise_vanishes_on_lattice_points() {
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (-3.0, 7.0), (12.0, -5.0)] {
            assert_eq!(gradient_noise(Vec2::new(x, y)), 0.0);
        }
    }

    #[test]
    fn noise_is_continuous_across_cells() {
        let eps = 1e-4;
        for x in [1.0f32, 2.0, -1.0] {
            let p = Vec2::new(x, 0.37);
            let left = gradient_noise(p - Vec2::new(eps, 0.0));
            let right = gradient_noise(p + Vec2::new(eps, 0.0));
            assert!(approx(left, right, 1e-2), "jump at x={x}: {left} vs {right}");
        }
    }

    #[test]
    fn hash_gradient_components_in_unit_range() {
        for p in sample_points().take(400) {
            let g = hash_gradient(p.floor());
            assert!(g.x >= -1.0 && g.x <= 1.0);
            assert!(g.y >= -1.0 && g.y <= 1.0);
        }
    }

    #[test]
    fn displacement_at_origin_leaves_y_unchanged() {
        let wave = Wave {
            speed: Vec2::new(0.8, 0.4),
            scale: Vec2::new(0.4, 0.4),
            height: 0.2,
        };
        let p = Vec3::new(0.0, -0.25, 0.0);
        assert_eq!(gradient_noise(wave.sample_point(p, 0.0)), 0.0);
        assert_eq!(wave.displace(p, 0.0), p);
    }

    #[test]
    fn displacement_only_moves_y() {
        let wave = Wave {
            speed: Vec2::new(0.8, 0.4),
            scale: Vec2::new(0.4, 0.4),
            height: 0.2,
        };
        let p = Vec3::new(3.3, 1.0, -2.1);
        for t in [0.0, 0.5, 10.0] {
            let d = wave.displace(p, t);
            assert_eq!(d.x, p.x);
            assert_eq!(d.z, p.z);
            assert!((d.y - p.y).abs() <= 2.0 * wave.height);
        }
    }

    #[test]
    fn time_slides_the_noise_field() {
        let wave = Wave {
            speed: Vec2::new(1.0, 0.0),
            scale: Vec2::ONE,
            height: 1.0,
        };
        // Moving one unit along x at t = 0 samples the same point as t = 1 at the origin.
        let later = wave.displace(Vec3::new(0.3, 0.0, 0.6), 1.0);
        let shifted = wave.displace(Vec3::new(1.3, 0.0, 0.6), 0.0);
        assert!(approx(later.y, shifted.y, 1e-5));
    }

    /// World position under pixel `(px, py)` on the plane `y = level`, with
    /// pixel y growing downwards as in the framebuffer.
    fn unproject_to_plane(view_proj: Mat4, size: Vec2, pixel: Vec2, level: f32) -> Vec3 {
        let ndc = Vec2::new(pixel.x / size.x * 2.0 - 1.0, 1.0 - pixel.y / size.y * 2.0);
        let inv = view_proj.inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        let t = (level - near.y) / (far.y - near.y);
        near + (far - near) * t
    }

    fn camera_above_water() -> (Mat4, Vec3, Vec2) {
        let eye = Vec3::new(1.6, 4.2, -3.3);
        let target = Vec3::new(5.6, -0.25, 5.6);
        let size = Vec2::new(640.0, 360.0);
        let proj = Mat4::perspective_lh(55f32.to_radians(), size.x / size.y, 0.1, 100.0);
        (proj * Mat4::look_at_lh(eye, target, Vec3::Y), eye, size)
    }

    fn screen_derivatives(view_proj: Mat4, size: Vec2, pixel: Vec2, level: f32) -> (Vec3, Vec3, Vec3) {
        let p = unproject_to_plane(view_proj, size, pixel, level);
        let dpdx = unproject_to_plane(view_proj, size, pixel + Vec2::X, level) - p;
        let dpdy = unproject_to_plane(view_proj, size, pixel + Vec2::Y, level) - p;
        (p, dpdx, dpdy)
    }

    #[test]
    fn flat_surface_seen_from_above_faces_the_light() {
        let (view_proj, eye, size) = camera_above_water();
        for pixel in [Vec2::new(320.0, 180.0), Vec2::new(100.0, 300.0), Vec2::new(600.0, 250.0)] {
            let (p, dpdx, dpdy) = screen_derivatives(view_proj, size, pixel, -0.25);
            assert!(approx(p.y, -0.25, 1e-4));

            let n = reconstruct_normal(dpdx, dpdy);
            assert!(approx(n.length(), 1.0, 1e-5));
            assert!(approx(n.y, -1.0, 1e-4), "normal at {pixel}: {n}");

            let lighting = Lighting {
                camera_pos: eye,
                light_dir: Vec3::new(-0.4, -1.0, -0.3).normalize(),
                light_color: Vec3::splat(0.9),
                ambient: Vec3::splat(0.15),
                specular_color: Vec3::ZERO,
                specular: 64.0,
            };
            let lit = lighting.irradiance(p, n);
            assert!(lit.x > 0.15 + 0.5, "only ambient reaches {p}: {lit}");
        }
    }

    #[test]
    fn normal_is_unit_for_unnormalized_derivatives() {
        let n = reconstruct_normal(Vec3::new(3.0, 0.5, 0.0), Vec3::new(0.0, -0.2, 0.01));
        assert!(approx(n.length(), 1.0, 1e-5));
    }

    fn lighting_scenario() -> Lighting {
        Lighting {
            camera_pos: Vec3::new(0.0, 10.0, 0.0),
            light_dir: Vec3::NEG_Y,
            light_color: Vec3::ONE,
            ambient: Vec3::splat(0.1),
            specular_color: Vec3::ZERO,
            specular: 64.0,
        }
    }

    #[test]
    fn ambient_plus_full_diffuse_scales_albedo() {
        let lighting = lighting_scenario();
        let color = lighting.shade(Vec3::new(0.2, 0.3, 0.4), Vec3::ZERO, Vec3::NEG_Y);
        assert!(approx(color.x, 0.22, 1e-6));
        assert!(approx(color.y, 0.33, 1e-6));
        assert!(approx(color.z, 0.44, 1e-6));
    }

    #[test]
    fn lighting_is_never_negative() {
        let mut lighting = lighting_scenario();
        lighting.specular_color = Vec3::new(0.75, 0.84, 0.97);
        let normals = [
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::new(0.3, -0.9, 0.1).normalize(),
        ];
        let lights = [Vec3::Y, Vec3::NEG_Y, Vec3::new(1.0, 1.0, 0.0).normalize()];
        for n in normals {
            for l in lights {
                lighting.light_dir = l;
                let c = lighting.shade(Vec3::new(0.2, 0.5, 0.96), Vec3::new(1.0, 0.0, 2.0), n);
                assert!(c.min_element() >= 0.0, "negative channel for n={n} l={l}: {c}");
            }
        }
    }

    #[test]
    fn specular_peaks_along_reflection() {
        let mut lighting = lighting_scenario();
        lighting.specular_color = Vec3::ONE;
        lighting.ambient = Vec3::ZERO;
        lighting.light_color = Vec3::ZERO;
        lighting.specular = 8.0;
        // Sun up and towards +x, shining down at 45 degrees.
        lighting.light_dir = Vec3::new(-1.0, -1.0, 0.0).normalize();
        // Mirror position: above the surface on the side away from the sun.
        lighting.camera_pos = Vec3::new(-1.0, 1.0, 0.0);
        let peak = lighting.irradiance(Vec3::ZERO, Vec3::NEG_Y);
        assert!(approx(peak.x, 1.0, 1e-5));
        // Looking with the sun at the viewer's back sees no highlight.
        lighting.camera_pos = Vec3::new(1.0, 1.0, 0.0);
        let off = lighting.irradiance(Vec3::ZERO, Vec3::NEG_Y);
        assert!(off.x < 0.1);
    }

    #[test]
    fn absorption_is_zero_at_contact() {
        assert_eq!(absorption_alpha(150.0, 0.0), 0.0);
        assert_eq!(absorption_alpha(0.5, 0.0), 0.0);
    }

    #[test]
    fn absorption_half_at_one_half_life() {
        assert!(approx(absorption_alpha(0.5, 2.0), 0.5, 1e-6));
    }

    #[test]
    fn absorption_is_monotonic_and_saturates() {
        let mut previous = absorption_alpha(1.0, 0.0);
        for i in 1..100 {
            let a = absorption_alpha(1.0, i as f32 * 0.1);
            assert!(a > previous);
            assert!(a < 1.0);
            previous = a;
        }
        assert!(approx(absorption_alpha(1.0, 100.0), 1.0, 1e-6));
    }

    #[test]
    fn absorption_negative_behind_opaque() {
        assert!(absorption_alpha(1.0, -0.5) < 0.0);
    }

    fn project_depth(proj: Mat4, view_z: f32) -> f32 {
        let clip = proj * Vec4::new(0.0, 0.0, view_z, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn linearized_depth_round_trip() {
        let (near, far) = (0.1, 100.0);
        let proj = Mat4::perspective_lh(60f32.to_radians(), 4.0 / 3.0, near, far);
        let t = Translucency { near, far, density: 1.0 };

        assert!(approx(t.linearize(project_depth(proj, far)), 1.0, 1e-3));
        assert!(approx(t.linearize(project_depth(proj, near)), near / far, 1e-6));
        assert!(approx(t.linearize(project_depth(proj, 25.0)), 0.25, 1e-3));
    }

    #[test]
    fn linearize_ndc_endpoints() {
        assert!(approx(linearize_depth(1.0, 0.1, 1000.0), 1.0, 1e-6));
        assert!(approx(linearize_depth(-1.0, 0.1, 1000.0), 0.1 / 1000.0, 1e-9));
    }

    #[test]
    fn surface_at_water_line_is_transparent() {
        let (near, far) = (0.1, 1000.0);
        let proj = Mat4::perspective_lh(60f32.to_radians(), 1.0, near, far);
        let t = Translucency { near, far, density: 150.0 };
        let depth = project_depth(proj, 50.0);
        assert!(approx(t.linearize(depth) * far, 50.0, 0.05));
        assert_eq!(t.thickness(depth, depth), 0.0);
        assert_eq!(t.alpha(depth, depth), 0.0);
    }

    #[test]
    fn deeper_opaque_means_more_opaque_water() {
        let (near, far) = (0.1, 100.0);
        let proj = Mat4::perspective_lh(60f32.to_radians(), 1.0, near, far);
        let t = Translucency { near, far, density: 150.0 };
        let surface = project_depth(proj, 10.0);
        let shallow = t.alpha(project_depth(proj, 10.05), surface);
        let deep = t.alpha(project_depth(proj, 11.0), surface);
        assert!(shallow > 0.0);
        assert!(deep > shallow);
        assert!(deep < 1.0 + f32::EPSILON);
    }

    #[test]
    fn screen_uv_divides_by_surface_size() {
        let uv = screen_uv(Vec2::new(400.0, 150.0), Vec2::new(800.0, 600.0));
        assert_eq!(uv, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn fragment_clamps_alpha_behind_opaque() {
        let lighting = lighting_scenario();
        let t = Translucency { near: 0.1, far: 100.0, density: 150.0 };
        let input = FragmentInput {
            albedo: Vec3::new(0.2, 0.3, 0.4),
            world_pos: Vec3::ZERO,
            dpdx: Vec3::X,
            dpdy: Vec3::NEG_Z,
            depth: 0.9,
            opaque_depth: 0.5,
        };
        let out = shade_fragment(&lighting, &t, &input);
        assert_eq!(out.w, 0.0);
        assert!(approx(out.x, 0.22, 1e-5));
    }

    #[test]
    fn uniform_constructors_agree_with_fields() {
        use crate::uniforms::GlobalLightData;

        let scene = SceneUniforms {
            camera_pos: [1.0, 2.0, 3.0, 1.0],
            near_plane: 0.1,
            far_plane: 100.0,
            light: GlobalLightData::new(Vec3::Y, Vec3::ONE),
            ambient_color: [0.1, 0.1, 0.1],
            ..Default::default()
        };
        let water = WaterUniforms {
            specular: 64.0,
            density: 150.0,
            specular_color: [0.75, 0.84, 0.97],
            wave_speed: [0.8, 0.4],
            wave_scale: [0.4, 0.4],
            wave_height: 0.2,
            ..Default::default()
        };

        let lighting = Lighting::from_uniforms(&scene, &water);
        assert_eq!(lighting.camera_pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(lighting.specular, 64.0);

        let t = Translucency::from_uniforms(&scene, &water);
        assert_eq!((t.near, t.far, t.density), (0.1, 100.0, 150.0));

        let wave = Wave::from_uniforms(&water);
        assert_eq!(wave.speed, Vec2::new(0.8, 0.4));
        assert_eq!(wave.height, 0.2);
    }
}

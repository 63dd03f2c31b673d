mod cli;
mod gpu;
mod readback;
mod seabed;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use waterline_render::render_targets::create_depth_target;
use waterline_render::{
    Camera, Environment, FrameClock, FrameSchedule, FrameTargets, SceneResources, WaterRenderer,
    WaterSettings,
};

use cli::Cli;
use seabed::SeabedRenderer;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn water_settings(cli: &Cli) -> WaterSettings {
    let mut settings = WaterSettings::default();
    if let Some(density) = cli.density {
        settings.density = density;
    }
    if let Some(height) = cli.wave_height {
        settings.wave_height = height;
    }
    if let Some(tiles) = cli.tiles {
        settings.tiles_count = tiles;
    }
    settings
}

/// Three-quarter view over the middle of the grid.
fn preview_camera(water: &WaterSettings, aspect: f32) -> Camera {
    let half = water.tiles_count as f32 * water.tile_size * 0.5;
    let target = Vec3::new(half, water.level, half);
    let eye = target + Vec3::new(-half * 0.6, half * 0.9, -half * 1.6);
    Camera::looking_at(eye, target, 55.0, aspect, 0.1, 100.0)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    anyhow::ensure!(cli.width > 0 && cli.height > 0, "output size must be non-zero");

    let water = water_settings(&cli);
    water.validate().context("invalid water settings")?;

    let (device, queue) = gpu::create_device()?;
    let (color_texture, color_view) =
        gpu::create_color_target(&device, COLOR_FORMAT, cli.width, cli.height);
    let (depth_texture, depth_view) = create_depth_target(&device, cli.width, cli.height);

    let mut scene = SceneResources::new(&device, COLOR_FORMAT, cli.width, cli.height);
    let mut schedule = FrameSchedule::new();
    schedule.add(Box::new(SeabedRenderer::new(&device, &scene, COLOR_FORMAT, &water)));
    schedule.add(Box::new(WaterRenderer::new(&device, &scene, COLOR_FORMAT, water)?));

    let env = Environment::default();
    let mut camera = preview_camera(&water, cli.width as f32 / cli.height as f32);
    let mut clock = FrameClock::new();
    clock.advance(cli.time);

    let targets = FrameTargets {
        color_texture: &color_texture,
        color_view: &color_view,
        depth_texture: &depth_texture,
        depth_view: &depth_view,
    };

    for index in 0..cli.frames {
        if index > 0 {
            clock.advance(1.0 / cli.fps);
        }
        scene.update(
            &queue,
            env.scene_uniforms(&mut camera, (cli.width, cli.height), clock.elapsed()),
        )?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Preview Frame"),
        });
        schedule.record(&mut encoder, &targets, &scene, env.clear_color)?;
        queue.submit(Some(encoder.finish()));

        let image = readback::read_texture(&device, &queue, &color_texture)?;
        let path = cli.frame_path(index);
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote {} (t = {:.3}s)", path.display(), clock.elapsed());
    }

    Ok(())
}

//! Frame ordering: opaque work, then the snapshot copy, then transparent work.
//!
//! The water pass reads a copy of the opaque color and depth while drawing
//! into the live targets. The copy has to land after every opaque renderer
//! and before any transparent one, so the schedule inserts it as an explicit
//! barrier step instead of letting renderers share one target.

use crate::passes::{clear::render_clear_pass, snapshot::capture_opaque};
use crate::scene::SceneResources;
use crate::{validate, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderStage {
    /// Writes color and depth; visible to transparent stages via the snapshot.
    Opaque,
    /// Reads the snapshot and blends over the live targets.
    Transparent,
}

/// Live targets a frame is recorded into. The textures must allow `COPY_SRC`.
pub struct FrameTargets<'a> {
    pub color_texture: &'a wgpu::Texture,
    pub color_view: &'a wgpu::TextureView,
    pub depth_texture: &'a wgpu::Texture,
    pub depth_view: &'a wgpu::TextureView,
}

/// What a renderer sees while recording.
pub struct RenderingContext<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
    pub scene_bind_group: &'a wgpu::BindGroup,
}

pub trait Renderer {
    fn label(&self) -> &str;

    fn stage(&self) -> RenderStage;

    fn render(&mut self, ctx: &mut RenderingContext<'_>) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
    Clear,
    Render { stage: RenderStage, index: usize },
    CaptureOpaque,
}

/// Ordered steps for renderers with the given stages, in registration order.
pub fn plan_steps(stages: &[RenderStage]) -> Vec<FrameStep> {
    let by_stage = |wanted: RenderStage| {
        stages
            .iter()
            .enumerate()
            .filter(move |&(_, &stage)| stage == wanted)
            .map(|(index, &stage)| FrameStep::Render { stage, index })
    };

    let mut steps = Vec::with_capacity(stages.len() + 2);
    steps.push(FrameStep::Clear);
    steps.extend(by_stage(RenderStage::Opaque));

    let transparent: Vec<_> = by_stage(RenderStage::Transparent).collect();
    if !transparent.is_empty() {
        steps.push(FrameStep::CaptureOpaque);
        steps.extend(transparent);
    }

    steps
}

#[derive(Default)]
pub struct FrameSchedule {
    renderers: Vec<Box<dyn Renderer>>,
}

impl FrameSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer. Returns its index.
    pub fn add(&mut self, renderer: Box<dyn Renderer>) -> usize {
        log::debug!(
            "Registered renderer '{}' in {:?} stage",
            renderer.label(),
            renderer.stage()
        );
        self.renderers.push(renderer);
        self.renderers.len() - 1
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn renderer_mut(&mut self, index: usize) -> Option<&mut (dyn Renderer + 'static)> {
        self.renderers.get_mut(index).map(|r| r.as_mut())
    }

    pub fn plan(&self) -> Vec<FrameStep> {
        let stages: Vec<_> = self.renderers.iter().map(|r| r.stage()).collect();
        plan_steps(&stages)
    }

    /// Record one frame into `encoder`. Until `scene` holds valid uniforms
    /// only the clear is recorded. The uploaded surface size must match the
    /// targets.
    pub fn record(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &FrameTargets<'_>,
        scene: &SceneResources,
        clear_color: wgpu::Color,
    ) -> Result<()> {
        let Some(uniforms) = scene.uniforms() else {
            log::warn!("Scene uniforms not uploaded yet, skipping frame");
            render_clear_pass(encoder, targets.color_view, targets.depth_view, clear_color);
            return Ok(());
        };
        let target = (targets.color_texture.width(), targets.color_texture.height());
        validate::surface_size(uniforms, target)?;

        for step in self.plan() {
            match step {
                FrameStep::Clear => {
                    log::trace!("Clearing frame targets");
                    render_clear_pass(encoder, targets.color_view, targets.depth_view, clear_color);
                }
                FrameStep::CaptureOpaque => {
                    log::trace!("Capturing opaque snapshot");
                    capture_opaque(
                        encoder,
                        targets.color_texture,
                        targets.depth_texture,
                        scene.snapshot(),
                    )?;
                }
                FrameStep::Render { index, .. } => {
                    let renderer = &mut self.renderers[index];
                    log::trace!("Executing renderer: {}", renderer.label());
                    let mut ctx = RenderingContext {
                        encoder: &mut *encoder,
                        color_view: targets.color_view,
                        depth_view: targets.depth_view,
                        scene_bind_group: scene.bind_group(),
                    };
                    renderer.render(&mut ctx)?;
                }
            }
        }
        Ok(())
    }
}

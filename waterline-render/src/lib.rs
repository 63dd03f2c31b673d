//! Waterline wgpu integration.
//!
//! Builds the water surface stage on top of a host's opaque pass: the
//! binding layouts the WGSL program expects, the water pipeline, the opaque
//! colour/depth snapshot the water samples, and a frame schedule that records
//! opaque work, the snapshot copy and transparent work in that order.

pub mod camera;
pub mod clock;
pub mod mesh;
pub mod passes;
pub mod pipeline;
pub mod render_targets;
pub mod scene;
pub mod schedule;
pub mod settings;
pub mod validate;
pub mod water;

pub use camera::Camera;
pub use clock::FrameClock;
pub use mesh::{GpuMesh, WaterGrid};
pub use scene::{DirectionalLight, Environment, SceneResources};
pub use schedule::{FrameSchedule, FrameStep, FrameTargets, RenderStage, Renderer, RenderingContext};
pub use settings::WaterSettings;
pub use water::WaterRenderer;

pub use waterline_gpu_shared as shared;

/// Backends the water stage runs on. GL cannot sample the copied depth
/// snapshot (or copy depth between textures), so it is left out.
pub const SUPPORTED_BACKENDS: wgpu::Backends = wgpu::Backends::PRIMARY;

/// Result type for host-side operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Host-side failures. The shader has no error path, so everything that can
/// go wrong is caught here before a draw is issued.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid clip planes: near {near} must be positive and below far {far}")]
    ClipPlanes { near: f32, far: f32 },

    #[error("surface size must be non-zero, got {width}x{height}")]
    EmptySurface { width: f32, height: f32 },

    #[error("degenerate vector: {0} has zero length")]
    DegenerateVector(&'static str),

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("invalid water material: {0}")]
    Material(String),

    #[error("snapshot size {snapshot:?} does not match target size {target:?}")]
    SnapshotMismatch { snapshot: (u32, u32), target: (u32, u32) },

    #[error("surface size uniform {uniforms:?} does not match target size {target:?}")]
    SurfaceSizeMismatch { uniforms: (f32, f32), target: (u32, u32) },

    #[error("wgpu error: {0}")]
    Wgpu(String),
}

impl From<wgpu::Error> for Error {
    fn from(err: wgpu::Error) -> Self {
        Error::Wgpu(err.to_string())
    }
}

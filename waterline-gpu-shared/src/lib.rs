//! GPU-facing data for the Waterline water stage.
//!
//! `uniforms` holds the Pod blocks uploaded by the host, `shaders` the WGSL
//! program, and `surface` a CPU mirror of that program's math.

pub mod shaders;
pub mod surface;
pub mod uniforms;

pub use uniforms::{GlobalLightData, SceneUniforms, Vertex, WaterUniforms};

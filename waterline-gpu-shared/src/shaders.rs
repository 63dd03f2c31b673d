//! Embedded WGSL shader sources.

/// Water surface program: `vs_main` displaces the grid, `fs_main` lights it and
/// derives alpha from the opaque depth snapshot.
pub const WATER_SHADER: &str = include_str!("../shaders/water.wgsl");

/// Entry point names inside `WATER_SHADER`.
pub const WATER_VERTEX_ENTRY: &str = "vs_main";
pub const WATER_FRAGMENT_ENTRY: &str = "fs_main";

//! Render pass recording for the water frame.

pub mod clear;
pub mod snapshot;
pub mod water;

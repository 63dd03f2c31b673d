//! Animation time for the wave function.

use std::time::Instant;

/// Monotonic elapsed time in seconds, fed to the scene uniforms each frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            delta: 0.0,
        }
    }

    /// Advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.advance(dt)
    }

    /// Advance by `dt` seconds. Negative or non-finite steps are dropped.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.delta = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += self.delta;
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

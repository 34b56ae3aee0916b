//! Time utilities for the frame loop

use std::time::{Duration, Instant};

/// Frame rate used when none is configured
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Wall-clock length of one frame
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / fps.max(1) as u64)
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Fractional milliseconds, used as the frame clock
    pub fn elapsed_ms_f64(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

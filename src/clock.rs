//! Wall-clock frame timing
//!
//! The simulation itself never reads the wall clock; this is the binary's
//! source of per-frame deltas and timestamps.

use std::time::Instant;

use crate::consts::MAX_FRAME_DT;

/// Monotonic frame timer for the driving loop
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last_frame: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last_frame: now,
        }
    }

    /// Milliseconds since the clock was created
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Seconds since the previous call, clamped so a stalled or backgrounded
    /// process cannot tunnel fast entities through each other on resume.
    pub fn frame_delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DT)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

// src/clock.rs

use crate::config::ClockSettings;
use bevy::prelude::*;
use std::time::Duration;

/// Delta used for a single step requested while paused.
pub const STEP_DELTA: Duration = Duration::from_micros(16_667);

/// Per-session frame timing.
///
/// Simulation time only advances while running (or for a requested single
/// step) and never by more than `max_delta` per frame. Wall time follows the
/// unclamped frame deltas, paused or not; the speed controller's rate limit
/// and decay deadline are measured against it.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    max_delta: Duration,
    elapsed: Duration,
    delta: Duration,
    wall: Duration,
    frame: u64,
    paused: bool,
    step_requested: bool,
}

impl SimulationClock {
    pub fn new(settings: &ClockSettings) -> Self {
        Self {
            max_delta: settings.max_delta,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            wall: Duration::ZERO,
            frame: 0,
            paused: false,
            step_requested: false,
        }
    }

    /// Consumes one rendered frame and returns the simulation delta in seconds.
    pub fn advance(&mut self, raw_delta: Duration) -> f32 {
        self.wall += raw_delta;
        let delta = if self.paused {
            if std::mem::take(&mut self.step_requested) {
                STEP_DELTA.min(self.max_delta)
            } else {
                Duration::ZERO
            }
        } else if raw_delta > self.max_delta {
            debug!(
                "Clamping stalled frame: {:.3}s -> {:.3}s",
                raw_delta.as_secs_f32(),
                self.max_delta.as_secs_f32()
            );
            self.max_delta
        } else {
            raw_delta
        };
        self.delta = delta;
        self.elapsed += delta;
        if !delta.is_zero() {
            self.frame += 1;
        }
        self.delta_secs()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if !paused {
            self.step_requested = false;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance exactly one tick on the next frame. Ignored while running.
    pub fn request_step(&mut self) {
        if self.paused {
            self.step_requested = true;
        }
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn wall(&self) -> Duration {
        self.wall
    }

    /// Number of frames that advanced simulation time.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

use bevy::prelude::*;
use std::collections::VecDeque;

const SPEED_HISTORY_LEN: usize = 300;

/// User intent for the simulation clock; applied to every session.
#[derive(Resource, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub struct SimulationControl {
    pub paused: bool,
    /// One tick while paused, consumed by the next frame.
    pub step: bool,
}

/// Recent (session seconds, speed) samples for the HUD plot.
#[derive(Resource, Default, Debug)]
pub struct SpeedHistory {
    pub samples: VecDeque<(f64, f64)>,
}

impl SpeedHistory {
    pub fn record(&mut self, time: f64, speed: f64) {
        if self.samples.back().is_some_and(|(t, _)| *t >= time) {
            return;
        }
        if self.samples.len() == SPEED_HISTORY_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back((time, speed));
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

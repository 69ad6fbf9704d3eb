//! Periodic wave sources

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::wavefront::Wavefront;
use crate::config::SimConfig;

/// A point emitter that releases one full-circle wavefront per period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSource {
    pub centre: DVec2,
    pub period: f64,
    pub speed: f64,
    pub max_distance: f64,
    /// Pulses this source emits per run
    pub max_pulses: u32,
    /// Simulation time accumulated toward the next pulse
    pub time_since_pulse: f64,
    /// Pulses emitted so far this run
    pub pulse_count: u32,
}

impl WaveSource {
    /// Create an idle source; its first pulse is released by `emit_first`
    pub fn new(centre: DVec2, config: &SimConfig) -> Self {
        Self {
            centre,
            period: config.period,
            speed: config.speed,
            max_distance: config.max_distance,
            max_pulses: config.max_wavefronts_per_source,
            time_since_pulse: 0.0,
            pulse_count: 0,
        }
    }

    /// Adopt new run parameters (between runs only)
    pub fn retune(&mut self, config: &SimConfig) {
        self.period = config.period;
        self.speed = config.speed;
        self.max_distance = config.max_distance;
        self.max_pulses = config.max_wavefronts_per_source;
        self.reset();
    }

    /// Rewind the spawn clock for a fresh run
    pub fn reset(&mut self) {
        self.time_since_pulse = 0.0;
        self.pulse_count = 0;
    }

    /// Whether every pulse for this run has been emitted
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pulse_count >= self.max_pulses
    }

    /// Release the pulse a run starts with: radius zero, clock at zero
    ///
    /// Returns false when the source has nothing left to emit.
    pub fn emit_first(&mut self, barrier_count: usize, staged: &mut Vec<Wavefront>) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.time_since_pulse = 0.0;
        self.pulse(barrier_count, staged);
        true
    }

    /// Advance the spawn clock, staging every pulse that falls due
    ///
    /// Each pulse is born with the radius it has already grown since its
    /// own instant within this tick, so several pulses in one long tick get
    /// distinct radii. Returns the number of pulses emitted.
    pub fn advance(&mut self, dt: f64, barrier_count: usize, staged: &mut Vec<Wavefront>) -> u32 {
        self.time_since_pulse += dt;

        let mut emitted = 0;
        while self.time_since_pulse >= self.period && !self.is_exhausted() {
            self.time_since_pulse -= self.period;
            self.pulse(barrier_count, staged);
            emitted += 1;
        }
        emitted
    }

    fn pulse(&mut self, barrier_count: usize, staged: &mut Vec<Wavefront>) {
        self.pulse_count += 1;
        staged.push(Wavefront::from_pulse(
            self.centre,
            self.time_since_pulse,
            self.speed,
            self.max_distance,
            barrier_count,
        ));
    }
}

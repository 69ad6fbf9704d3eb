//! Wave Diffraction - circular wavefronts bent around line barriers
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sources, wavefronts, barriers, tick)
//! - `config`: Run parameters and validation
//! - `frame`: Per-tick arc descriptions for a renderer
//! - `scene`: Serializable authoring snapshots

pub mod config;
pub mod error;
pub mod frame;
pub mod scene;
pub mod sim;

pub use config::{Bounds, SimConfig};
pub use error::{AuthoringError, ConfigError, SceneError};
pub use frame::{Frame, WavefrontView};
pub use scene::Scene;

use glam::DVec2;
use std::f64::consts::TAU;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Largest frame delta a host should feed into one tick
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Parameter defaults
    pub const DEFAULT_SPEED: f64 = 200.0; // units per second
    pub const DEFAULT_PERIOD: f64 = 1.0; // seconds between pulses
    pub const DEFAULT_MAX_DISTANCE: f64 = 1500.0;
    pub const DEFAULT_WAVEFRONTS_PER_SOURCE: u32 = 10;
    pub const DEFAULT_MAX_SOURCES: usize = 3;
    pub const DEFAULT_MAX_BARRIERS: usize = 10;
    pub const DEFAULT_MAX_LIVE_WAVEFRONTS: usize = 4096;

    /// Default bounded field
    pub const FIELD_WIDTH: f64 = 1920.0;
    pub const FIELD_HEIGHT: f64 = 1080.0;

    /// Edge walls sit this far inside the field edge
    pub const EDGE_INSET: f64 = 2.0;
    /// Edge walls reach this far past the neighbouring wall so corners cross
    pub const EDGE_OVERHANG: f64 = 1.0;
}

/// Normalize an angle to [0, 2π)
///
/// Total and idempotent: every finite input maps to exactly one
/// representative, non-finite input maps to 0.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Bearing of `to` as seen from `from`, normalized to [0, 2π)
#[inline]
pub fn bearing(from: DVec2, to: DVec2) -> f64 {
    direction_angle(to - from)
}

/// Angle of a direction vector, normalized to [0, 2π)
#[inline]
pub fn direction_angle(dir: DVec2) -> f64 {
    normalize_angle(dir.y.atan2(dir.x))
}

/// Convert polar (r, theta) around `centre` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(centre: DVec2, r: f64, theta: f64) -> DVec2 {
    centre + DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Smallest unsigned angle between two directions, in [0, π]
pub fn non_reflex_difference(a: f64, b: f64) -> f64 {
    let difference = (normalize_angle(a) - normalize_angle(b)).abs();
    if difference > std::f64::consts::PI {
        TAU - difference
    } else {
        difference
    }
}

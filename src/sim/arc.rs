//! Angular domains and drawable arcs
//!
//! Angles are measured from the +x axis and increase toward +y. An arc runs
//! from `start` to `end` in the increasing-angle direction. Angles are
//! normalized to [0, 2π); the one exception is `TAU`, which only appears as
//! the closing boundary of an arc that ends at angle zero.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{normalize_angle, polar_to_cartesian};

/// The angular span a wavefront was born with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularDomain {
    pub start: f64,
    pub end: f64,
}

impl AngularDomain {
    /// Whole circle, stored as the pair (0, 2π)
    pub const FULL: Self = Self {
        start: 0.0,
        end: TAU,
    };

    /// Domain from `start` to `end`; equal angles give the whole circle
    pub fn new(start: f64, end: f64) -> Self {
        let start = normalize_angle(start);
        let end = normalize_angle(end);
        if start == end {
            Self::FULL
        } else {
            Self { start, end }
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Whether the domain crosses angle zero
    #[inline]
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Angular span (handles wraparound)
    pub fn span(&self) -> f64 {
        let span = self.end - self.start;
        if span < 0.0 { span + TAU } else { span }
    }

    /// Whether an angle lies in `[start, end)`
    ///
    /// A wrapping domain covers `[start, 2π) ∪ [0, end)`.
    pub fn contains(&self, angle: f64) -> bool {
        let angle = normalize_angle(angle);
        if self.start < self.end {
            angle >= self.start && angle < self.end
        } else {
            angle >= self.start || angle < self.end
        }
    }
}

impl Default for AngularDomain {
    fn default() -> Self {
        Self::FULL
    }
}

/// One drawable piece of a wavefront
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleArc {
    pub start: f64,
    pub end: f64,
}

impl VisibleArc {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Equal boundaries (mod 2π) mean the arc closes on itself
    pub fn is_full_circle(&self) -> bool {
        normalize_angle(self.start) == normalize_angle(self.end)
    }

    /// Swept angle from start to end
    pub fn sweep(&self) -> f64 {
        if self.is_full_circle() {
            TAU
        } else {
            (self.end - self.start).rem_euclid(TAU)
        }
    }

    /// Whether the arc passes through the given direction
    pub fn covers(&self, angle: f64) -> bool {
        if self.is_full_circle() {
            return true;
        }
        let offset = (normalize_angle(angle) - normalize_angle(self.start)).rem_euclid(TAU);
        offset <= self.sweep()
    }

    /// Sample points along the arc (for polyline renderers)
    pub fn sample_points(&self, centre: DVec2, radius: f64, num_points: usize) -> Vec<DVec2> {
        let sweep = self.sweep();
        (0..num_points)
            .map(|i| {
                let t = i as f64 / (num_points - 1).max(1) as f64;
                polar_to_cartesian(centre, radius, self.start + t * sweep)
            })
            .collect()
    }
}

/// Pair sorted boundaries into arcs: (b0, b1), (b2, b3), ...
///
/// An odd boundary left over at the end closes through 2π onto the first.
pub fn pair_boundaries(sorted: &[f64]) -> Vec<VisibleArc> {
    let count = sorted.len();
    (0..count)
        .step_by(2)
        .map(|i| VisibleArc::new(sorted[i], sorted[(i + 1) % count]))
        .collect()
}

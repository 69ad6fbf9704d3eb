//! Per-tick description of what a renderer should draw
//!
//! A frame is a plain snapshot: it borrows nothing from the simulation and
//! serializes straight to JSON for headless hosts.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Barrier, RunPhase, Simulation, VisibleArc, Wavefront};

/// One wavefront as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavefrontView {
    pub id: u32,
    pub centre: DVec2,
    pub radius: f64,
    /// Arcs to stroke at `radius` around `centre`
    pub arcs: Vec<VisibleArc>,
    /// Stroke intensity, 255 at birth fading to 0 at the travel limit
    pub intensity: u8,
}

impl From<&Wavefront> for WavefrontView {
    fn from(wavefront: &Wavefront) -> Self {
        Self {
            id: wavefront.id,
            centre: wavefront.centre(),
            radius: wavefront.radius(),
            arcs: wavefront.arcs().to_vec(),
            intensity: wavefront.intensity(),
        }
    }
}

impl WavefrontView {
    /// Polyline approximation of every arc, `points_per_arc` samples each
    pub fn polylines(&self, points_per_arc: usize) -> Vec<Vec<DVec2>> {
        self.arcs
            .iter()
            .map(|arc| arc.sample_points(self.centre, self.radius, points_per_arc))
            .collect()
    }
}

/// Everything drawable at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub time_ticks: u64,
    pub elapsed: f64,
    pub phase: RunPhase,
    /// Live wavefronts with at least one visible arc
    pub wavefronts: Vec<WavefrontView>,
    /// Every barrier, edge walls included
    pub barriers: Vec<Barrier>,
    pub sources: Vec<DVec2>,
}

impl Frame {
    /// Total number of arcs across all wavefronts
    pub fn arc_count(&self) -> usize {
        self.wavefronts.iter().map(|w| w.arcs.len()).sum()
    }
}

impl Simulation {
    /// Snapshot the current state for drawing
    pub fn frame(&self) -> Frame {
        Frame {
            time_ticks: self.time_ticks(),
            elapsed: self.elapsed(),
            phase: self.phase(),
            wavefronts: self
                .wavefronts()
                .iter()
                .filter(|w| !w.arcs().is_empty())
                .map(WavefrontView::from)
                .collect(),
            barriers: self.barriers().to_vec(),
            sources: self.sources().iter().map(|s| s.centre).collect(),
        }
    }
}

//! Line-segment barriers
//!
//! A barrier is fixed once a run starts. It blocks line of sight for every
//! wavefront and diffracts wavefronts at its two endpoints.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::Bounds;
use crate::consts::{EDGE_INSET, EDGE_OVERHANG};

/// Index of a barrier in the run's barrier list
pub type BarrierIndex = usize;

/// Squared lengths at or below this are treated as zero-length barriers
pub const DEGENERATE_LENGTH_SQ: f64 = 1e-12;

/// Which end of a barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// Slot of this endpoint in a per-wavefront latch array
    #[inline]
    pub fn latch_slot(self, index: BarrierIndex) -> usize {
        match self {
            Endpoint::Start => 2 * index,
            Endpoint::End => 2 * index + 1,
        }
    }
}

/// A static line segment obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BarrierEnds", into = "BarrierEnds")]
pub struct Barrier {
    pub start: DVec2,
    pub end: DVec2,
    /// `end - start`
    pub offset: DVec2,
}

/// Serialized form; `offset` is derived on load
#[derive(Serialize, Deserialize)]
struct BarrierEnds {
    start: DVec2,
    end: DVec2,
}

impl From<BarrierEnds> for Barrier {
    fn from(ends: BarrierEnds) -> Self {
        Barrier::new(ends.start, ends.end)
    }
}

impl From<Barrier> for BarrierEnds {
    fn from(barrier: Barrier) -> Self {
        BarrierEnds {
            start: barrier.start,
            end: barrier.end,
        }
    }
}

impl Barrier {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self {
            start,
            end,
            offset: end - start,
        }
    }

    /// Zero-length barriers never intersect anything
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.offset.length_squared() <= DEGENERATE_LENGTH_SQ
    }

    pub fn length(&self) -> f64 {
        self.offset.length()
    }

    /// Point at parameter `t` along `start + t * offset`
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec2 {
        self.start + self.offset * t
    }

    #[inline]
    pub fn endpoint(&self, endpoint: Endpoint) -> DVec2 {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Direction along the barrier leading away from `endpoint`
    #[inline]
    pub fn direction_from(&self, endpoint: Endpoint) -> DVec2 {
        match endpoint {
            Endpoint::Start => self.offset,
            Endpoint::End => -self.offset,
        }
    }

    /// The four walls enclosing a bounded field
    ///
    /// Each wall sits `EDGE_INSET` inside the field edge and reaches
    /// `EDGE_OVERHANG` past its neighbours, so every corner is a proper
    /// crossing and nothing leaks out through a corner.
    pub fn edge_walls(bounds: &Bounds) -> [Barrier; 4] {
        let (min, max) = (bounds.min, bounds.max);
        let near = EDGE_OVERHANG;
        let inset = EDGE_INSET;
        [
            // Top
            Barrier::new(
                DVec2::new(min.x + near, min.y + inset),
                DVec2::new(max.x - near, min.y + inset),
            ),
            // Right
            Barrier::new(
                DVec2::new(max.x - inset, min.y + near),
                DVec2::new(max.x - inset, max.y - near),
            ),
            // Bottom
            Barrier::new(
                DVec2::new(max.x - near, max.y - inset),
                DVec2::new(min.x + near, max.y - inset),
            ),
            // Left
            Barrier::new(
                DVec2::new(min.x + inset, max.y - near),
                DVec2::new(min.x + inset, min.y + near),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::segments_intersect;

    #[test]
    fn test_offset_and_point_at() {
        let barrier = Barrier::new(DVec2::new(50.0, -10.0), DVec2::new(50.0, 10.0));
        assert_eq!(barrier.offset, DVec2::new(0.0, 20.0));
        assert_eq!(barrier.point_at(0.5), DVec2::new(50.0, 0.0));
        assert!((barrier.length() - 20.0).abs() < 1e-12);
        assert_eq!(barrier.direction_from(Endpoint::End), DVec2::new(0.0, -20.0));
    }

    #[test]
    fn test_degenerate_detection() {
        let p = DVec2::new(3.0, 4.0);
        assert!(Barrier::new(p, p).is_degenerate());
        assert!(!Barrier::new(p, p + DVec2::X).is_degenerate());
    }

    #[test]
    fn test_latch_slots() {
        assert_eq!(Endpoint::Start.latch_slot(3), 6);
        assert_eq!(Endpoint::End.latch_slot(3), 7);
    }

    #[test]
    fn test_edge_walls_match_field_layout() {
        let walls = Barrier::edge_walls(&Bounds::default());
        assert_eq!(walls[0].start, DVec2::new(1.0, 2.0));
        assert_eq!(walls[0].end, DVec2::new(1919.0, 2.0));
        assert_eq!(walls[1].start, DVec2::new(1918.0, 1.0));
        assert_eq!(walls[2].end, DVec2::new(1.0, 1078.0));
        assert_eq!(walls[3].start, DVec2::new(2.0, 1079.0));
    }

    #[test]
    fn test_edge_wall_corners_cross() {
        let walls = Barrier::edge_walls(&Bounds::default());
        for i in 0..4 {
            let a = walls[i];
            let b = walls[(i + 1) % 4];
            assert!(
                segments_intersect(a.start, a.end, b.start, b.end),
                "walls {} and {} should cross at their corner",
                i,
                (i + 1) % 4
            );
        }
    }

    #[test]
    fn test_serde_derives_offset() {
        let json = r#"{"start":[0.0,0.0],"end":[3.0,4.0]}"#;
        let barrier: Barrier = serde_json::from_str(json).unwrap();
        assert_eq!(barrier.offset, DVec2::new(3.0, 4.0));
        let back = serde_json::to_string(&barrier).unwrap();
        assert!(!back.contains("offset"));
    }
}

//! Intersection tests between wavefronts, sight lines and barriers
//!
//! Both tests are closed form and stateless. Degenerate (zero-length)
//! barriers never report a hit.

use glam::DVec2;

use super::barrier::Barrier;

/// Result of intersecting a circle with a barrier's supporting line
///
/// Roots are parameters along `barrier.start + t * barrier.offset`;
/// `weight1 <= weight2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleLineHit {
    /// `<= 0` means the infinite line is missed or only touched
    pub discriminant: f64,
    pub weight1: f64,
    pub weight2: f64,
}

impl CircleLineHit {
    pub fn miss() -> Self {
        Self {
            discriminant: 0.0,
            weight1: 0.0,
            weight2: 0.0,
        }
    }

    /// Whether the circle properly crosses the line within reach of the segment
    ///
    /// Tangency counts as no contact, and so does a crossing whose two roots
    /// both fall before `start` or both fall past `end`.
    pub fn reaches_segment(&self) -> bool {
        if self.discriminant <= 0.0 {
            return false;
        }
        let before_start = self.weight1 < 0.0 && self.weight2 < 0.0;
        let past_end = self.weight1 > 1.0 && self.weight2 > 1.0;
        !(before_start || past_end)
    }
}

/// Solve where a circle crosses the line through a barrier
///
/// Quadratic in `t`: |start + t*offset - centre|² = radius²,
/// with discriminant r²|o|² - (o × d)² for d = start - centre.
pub fn circle_line_intersection(centre: DVec2, radius: f64, barrier: &Barrier) -> CircleLineHit {
    if barrier.is_degenerate() {
        return CircleLineHit::miss();
    }

    let length_sq = barrier.offset.length_squared();
    let centre_offset = barrier.start - centre;
    let cross = barrier.offset.perp_dot(centre_offset);
    let dot = barrier.offset.dot(centre_offset);

    let discriminant = radius * radius * length_sq - cross * cross;
    let foot = -dot / length_sq;
    if discriminant <= 0.0 {
        // Missed or tangent: report the closest point on the line
        return CircleLineHit {
            discriminant,
            weight1: foot,
            weight2: foot,
        };
    }

    let spread = discriminant.sqrt() / length_sq;
    CircleLineHit {
        discriminant,
        weight1: foot - spread,
        weight2: foot + spread,
    }
}

/// Whether segments p1-p2 and p3-p4 properly cross
///
/// Two-sided cross-product sign test: each segment's endpoints must lie
/// strictly on opposite sides of the other. Touching, collinear overlap and
/// zero-length segments are not crossings.
pub fn segments_intersect(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    let sides_of_first = (p3 - p1).perp_dot(d1) * (p4 - p1).perp_dot(d1);
    let sides_of_second = (p1 - p3).perp_dot(d2) * (p2 - p3).perp_dot(d2);

    sides_of_first < 0.0 && sides_of_second < 0.0
}

/// Whether the sight line `from`-`to` properly crosses a barrier
#[inline]
pub fn blocks(barrier: &Barrier, from: DVec2, to: DVec2) -> bool {
    segments_intersect(from, to, barrier.start, barrier.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Barrier {
        Barrier::new(DVec2::new(50.0, -10.0), DVec2::new(50.0, 10.0))
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(10.0, 0.0)
        ));
    }

    #[test]
    fn test_segments_disjoint() {
        assert!(!segments_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0)
        ));
        // Lines cross, segments do not
        assert!(!segments_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(3.0, 0.0),
            DVec2::new(2.0, 1.0)
        ));
    }

    #[test]
    fn test_touching_is_not_crossing() {
        // T-junction: second segment ends on the first
        assert!(!segments_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(5.0, 5.0)
        ));
        // Collinear overlap
        assert!(!segments_intersect(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(15.0, 0.0)
        ));
    }

    #[test]
    fn test_degenerate_segment_never_crosses() {
        let p = DVec2::new(5.0, 0.0);
        assert!(!segments_intersect(DVec2::new(0.0, -5.0), DVec2::new(0.0, 5.0), p, p));
        assert!(!segments_intersect(p, p, DVec2::new(0.0, -5.0), DVec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_circle_line_two_roots() {
        let hit = circle_line_intersection(DVec2::ZERO, 60.0, &wall());
        assert!(hit.discriminant > 0.0);
        // y = ±sqrt(60² - 50²) ≈ ±33.17, t = (y + 10) / 20
        let y = (60.0f64 * 60.0 - 50.0 * 50.0).sqrt();
        assert!((hit.weight1 - (-y + 10.0) / 20.0).abs() < 1e-9);
        assert!((hit.weight2 - (y + 10.0) / 20.0).abs() < 1e-9);
        assert!(hit.reaches_segment());
    }

    #[test]
    fn test_circle_line_roots_inside_segment() {
        let hit = circle_line_intersection(DVec2::ZERO, 50.5, &wall());
        assert!(hit.weight1 > 0.0 && hit.weight1 < 0.5);
        assert!(hit.weight2 > 0.5 && hit.weight2 < 1.0);
        let p = wall().point_at(hit.weight1);
        assert!((p.length() - 50.5).abs() < 1e-9);
    }

    #[test]
    fn test_circle_line_tangent_is_not_contact() {
        let hit = circle_line_intersection(DVec2::ZERO, 50.0, &wall());
        assert_eq!(hit.discriminant, 0.0);
        assert_eq!(hit.weight1, 0.5);
        assert!(!hit.reaches_segment());
    }

    #[test]
    fn test_circle_short_of_line() {
        let hit = circle_line_intersection(DVec2::ZERO, 40.0, &wall());
        assert!(hit.discriminant < 0.0);
        assert!(!hit.reaches_segment());
    }

    #[test]
    fn test_circle_crosses_line_beyond_segment() {
        // Line x = 50 is crossed at y = ±33, both before the start at y = 40
        let barrier = Barrier::new(DVec2::new(50.0, 40.0), DVec2::new(50.0, 60.0));
        let hit = circle_line_intersection(DVec2::ZERO, 60.0, &barrier);
        assert!(hit.discriminant > 0.0);
        assert!(hit.weight1 < 0.0 && hit.weight2 < 0.0);
        assert!(!hit.reaches_segment());
    }

    #[test]
    fn test_circle_line_degenerate_barrier() {
        let p = DVec2::new(10.0, 0.0);
        let hit = circle_line_intersection(DVec2::ZERO, 10.0, &Barrier::new(p, p));
        assert_eq!(hit, CircleLineHit::miss());
        assert!(!hit.reaches_segment());
    }

    #[test]
    fn test_blocks_sight_line() {
        assert!(blocks(&wall(), DVec2::ZERO, DVec2::new(100.0, 0.0)));
        assert!(!blocks(&wall(), DVec2::ZERO, DVec2::new(0.0, 100.0)));
    }
}

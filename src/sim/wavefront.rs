//! Wavefront propagation, occlusion and diffraction
//!
//! The heart of the simulation. Every tick a wavefront:
//! 1. grows its radius by `speed * dt`,
//! 2. intersects its circle with every barrier it did not diffract around,
//! 3. turns each reachable barrier crossing into a candidate boundary angle,
//!    dropping candidates hidden behind other barriers or outside its own
//!    angular domain,
//! 4. spawns a diffracted child the first time its growth reaches a barrier
//!    endpoint,
//! 5. pairs the surviving boundaries into drawable arcs.
//!
//! Visibility is rebuilt from scratch every tick; only the per-endpoint
//! diffraction latches persist.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arc::{AngularDomain, VisibleArc, pair_boundaries};
use super::barrier::{Barrier, BarrierIndex, Endpoint};
use super::collision::{blocks, circle_line_intersection};
use crate::{bearing, direction_angle, non_reflex_difference, normalize_angle, polar_to_cartesian};

/// An expanding circular front, possibly restricted to an angular domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wavefront {
    /// Assigned by the simulation when the wavefront joins the population
    pub id: u32,
    centre: DVec2,
    radius: f64,
    speed: f64,
    max_distance: f64,
    domain: AngularDomain,
    time_alive: f64,
    /// Barrier this front diffracted around; never intersected again
    source_barrier: Option<BarrierIndex>,
    /// One latch per (barrier, endpoint), see `Endpoint::latch_slot`
    diffracted: Vec<bool>,
    /// Boundary angles left after occlusion this tick, sorted
    boundaries: Vec<f64>,
    /// Drawable arcs derived from `boundaries`
    arcs: Vec<VisibleArc>,
}

/// Where the circle meets one side of a barrier this tick
#[derive(Debug, Clone, Copy)]
struct Candidate {
    angle: f64,
    usable: bool,
}

impl Wavefront {
    /// Full-circle wavefront with nothing diffracted yet
    pub fn new(
        centre: DVec2,
        radius: f64,
        speed: f64,
        max_distance: f64,
        barrier_count: usize,
    ) -> Self {
        let mut wavefront = Self {
            id: 0,
            centre,
            radius,
            speed,
            max_distance,
            domain: AngularDomain::FULL,
            time_alive: 0.0,
            source_barrier: None,
            diffracted: vec![false; 2 * barrier_count],
            boundaries: Vec::new(),
            arcs: Vec::new(),
        };
        wavefront.reset_boundaries();
        wavefront
    }

    /// Wavefront released by a source pulse `elapsed` seconds ago
    pub fn from_pulse(
        centre: DVec2,
        elapsed: f64,
        speed: f64,
        max_distance: f64,
        barrier_count: usize,
    ) -> Self {
        Self::new(centre, speed * elapsed, speed, max_distance, barrier_count)
            .with_time_alive(elapsed)
    }

    pub fn with_domain(mut self, domain: AngularDomain) -> Self {
        self.domain = domain;
        self.reset_boundaries();
        self
    }

    pub fn with_time_alive(mut self, time_alive: f64) -> Self {
        self.time_alive = time_alive;
        self
    }

    /// Mark the barrier this front was diffracted around
    pub fn diffracted_from(mut self, barrier: BarrierIndex) -> Self {
        self.source_barrier = Some(barrier);
        self
    }

    #[inline]
    pub fn centre(&self) -> DVec2 {
        self.centre
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    #[inline]
    pub fn domain(&self) -> AngularDomain {
        self.domain
    }

    #[inline]
    pub fn time_alive(&self) -> f64 {
        self.time_alive
    }

    #[inline]
    pub fn source_barrier(&self) -> Option<BarrierIndex> {
        self.source_barrier
    }

    pub fn barrier_count(&self) -> usize {
        self.diffracted.len() / 2
    }

    /// Whether this front has already diffracted at the given barrier end
    pub fn has_diffracted(&self, barrier: BarrierIndex, endpoint: Endpoint) -> bool {
        self.diffracted
            .get(endpoint.latch_slot(barrier))
            .copied()
            .unwrap_or(false)
    }

    /// Boundary angles that survived occlusion on the last tick, sorted
    pub fn visible_boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Drawable arcs at the current radius
    pub fn arcs(&self) -> &[VisibleArc] {
        &self.arcs
    }

    /// Distance travelled since the pulse this front descends from
    #[inline]
    pub fn travelled(&self) -> f64 {
        self.time_alive * self.speed
    }

    /// Stroke intensity fading from 255 to 0 over the travel budget
    pub fn intensity(&self) -> u8 {
        let remaining = 1.0 - self.travelled() / self.max_distance;
        (255.0 * remaining).clamp(0.0, 255.0) as u8
    }

    /// Out of energy
    pub fn is_exhausted(&self) -> bool {
        self.travelled() >= self.max_distance
    }

    /// Fully shadowed or out of energy
    pub fn is_dead(&self) -> bool {
        self.boundaries.is_empty() || self.is_exhausted()
    }

    /// Point on the front at the given angle
    #[inline]
    pub fn point_at(&self, angle: f64) -> DVec2 {
        polar_to_cartesian(self.centre, self.radius, angle)
    }

    /// Advance one tick; returns true once the wavefront has died
    ///
    /// Diffracted children are pushed onto `staged` and must not be
    /// advanced until the next tick.
    pub fn advance(&mut self, dt: f64, barriers: &[Barrier], staged: &mut Vec<Wavefront>) -> bool {
        self.grow(dt);
        self.update_intersections(barriers, staged);

        if self.is_dead() {
            self.arcs.clear();
            return true;
        }
        self.derive_arcs(barriers);
        false
    }

    fn grow(&mut self, dt: f64) {
        self.time_alive += dt;
        self.radius += self.speed * dt;
        self.boundaries.clear();
    }

    /// Rebuild this tick's boundaries from every reachable barrier
    fn update_intersections(&mut self, barriers: &[Barrier], staged: &mut Vec<Wavefront>) {
        if self.diffracted.len() < 2 * barriers.len() {
            self.diffracted.resize(2 * barriers.len(), false);
        }

        let start_point = self.point_at(self.domain.start);
        let end_point = self.point_at(self.domain.end);
        let mut start_shadowed = false;
        let mut end_shadowed = false;

        for (index, barrier) in barriers.iter().enumerate() {
            if self.source_barrier == Some(index) {
                continue;
            }

            let hit = circle_line_intersection(self.centre, self.radius, barrier);
            if !hit.reaches_segment() {
                continue;
            }

            let first = self.candidate(barriers, index, hit.weight1, Endpoint::Start);
            let second = self.candidate(barriers, index, hit.weight2, Endpoint::End);

            // The domain's own edges may have slipped behind this barrier
            start_shadowed |= blocks(barrier, self.centre, start_point);
            end_shadowed |= blocks(barrier, self.centre, end_point);

            if hit.weight1 <= 0.0 && first.usable {
                self.try_diffract(index, barrier, Endpoint::Start, first.angle, staged);
            }
            if hit.weight2 >= 1.0 && second.usable {
                self.try_diffract(index, barrier, Endpoint::End, second.angle, staged);
            }

            for candidate in [first, second] {
                if candidate.usable {
                    self.boundaries.push(candidate.angle);
                }
            }
        }

        if !start_shadowed {
            self.boundaries.push(self.domain.start);
        }
        if !end_shadowed {
            self.boundaries.push(self.domain.end);
        }
        self.boundaries.sort_by(f64::total_cmp);
    }

    /// Boundary candidate for one root of the circle/line solve
    ///
    /// A root beyond the segment clamps to the endpoint's bearing: the front
    /// has already swept past that end.
    fn candidate(
        &self,
        barriers: &[Barrier],
        index: BarrierIndex,
        weight: f64,
        endpoint: Endpoint,
    ) -> Candidate {
        let barrier = &barriers[index];
        let beyond = match endpoint {
            Endpoint::Start => weight < 0.0,
            Endpoint::End => weight > 1.0,
        };

        let (angle, point) = if beyond {
            let angle = bearing(self.centre, barrier.endpoint(endpoint));
            (angle, self.point_at(angle))
        } else {
            let point = barrier.point_at(weight);
            (bearing(self.centre, point), point)
        };

        let occluded = barriers
            .iter()
            .enumerate()
            .any(|(other, wall)| other != index && blocks(wall, self.centre, point));

        Candidate {
            angle,
            usable: !occluded && self.domain.contains(angle),
        }
    }

    fn try_diffract(
        &mut self,
        index: BarrierIndex,
        barrier: &Barrier,
        endpoint: Endpoint,
        incidence: f64,
        staged: &mut Vec<Wavefront>,
    ) {
        let slot = endpoint.latch_slot(index);
        if self.diffracted[slot] {
            return;
        }
        self.diffracted[slot] = true;

        let child = self.diffract(index, barrier, endpoint, incidence);
        log::debug!(
            "Wavefront {} diffracted at barrier {} {:?} ({:.1}, {:.1}), child radius {:.2}",
            self.id,
            index,
            endpoint,
            child.centre.x,
            child.centre.y,
            child.radius
        );
        staged.push(child);
    }

    /// Child front anchored at a barrier end, co-located with this front
    fn diffract(
        &self,
        index: BarrierIndex,
        barrier: &Barrier,
        endpoint: Endpoint,
        incidence: f64,
    ) -> Wavefront {
        let anchor = barrier.endpoint(endpoint);
        let along = direction_angle(barrier.direction_from(endpoint));
        let (start, end) = diffraction_spread(incidence, along);
        let radius = (self.radius - self.centre.distance(anchor)).max(0.0);

        Wavefront::new(
            anchor,
            radius,
            self.speed,
            self.max_distance,
            self.barrier_count(),
        )
        .with_domain(AngularDomain::new(start, end))
        .with_time_alive(self.time_alive)
        .diffracted_from(index)
    }

    fn reset_boundaries(&mut self) {
        self.boundaries.clear();
        self.boundaries.push(self.domain.start);
        self.boundaries.push(self.domain.end);
        self.boundaries.sort_by(f64::total_cmp);
        self.derive_arcs(&[]);
    }

    /// Pair the boundaries into arcs
    ///
    /// A domain that wraps through angle zero is split there, unless a
    /// barrier hides the zero direction.
    fn derive_arcs(&mut self, barriers: &[Barrier]) {
        let mut sorted = self.boundaries.clone();
        if self.domain.wraps() {
            let zero = self.point_at(0.0);
            if !barriers.iter().any(|b| blocks(b, self.centre, zero)) {
                sorted.push(0.0);
                sorted.push(TAU);
            }
        }
        sorted.sort_by(f64::total_cmp);
        self.arcs = pair_boundaries(&sorted);
    }
}

/// Angular domain of a front diffracted at a barrier end
///
/// `incidence` is the bearing from the parent's centre to the endpoint,
/// `along` the bearing along the barrier away from that endpoint. `along`
/// is bent by δ²/π toward `incidence` (δ the non-reflex angle between
/// them) so grazing incidence spreads wider. The pair is ordered so the
/// domain runs the short way round.
pub fn diffraction_spread(incidence: f64, along: f64) -> (f64, f64) {
    let incidence = normalize_angle(incidence);
    let along = normalize_angle(along);
    let bend = non_reflex_difference(along, incidence).powi(2) / PI;

    let bent = if is_ahead(incidence, along) {
        normalize_angle(along + bend)
    } else {
        normalize_angle(along - bend)
    };

    if is_ahead(incidence, bent) {
        (bent, incidence)
    } else {
        (incidence, bent)
    }
}

/// Whether `angle` is reached from `base` by turning less than half a turn
/// in the increasing-angle direction
#[inline]
fn is_ahead(angle: f64, base: f64) -> bool {
    (angle > base && angle - base < PI) || (angle < base && base - angle > PI)
}

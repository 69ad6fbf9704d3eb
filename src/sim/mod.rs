//! Deterministic simulation module
//!
//! All propagation logic lives here. This module must be pure and deterministic:
//! - Explicit timestep only, supplied by the host
//! - Stable iteration order (creation order for barriers, sources, wavefronts)
//! - Wavefronts born in a tick join the population after the sweep
//! - No rendering or platform dependencies

pub mod arc;
pub mod barrier;
pub mod collision;
pub mod source;
pub mod state;
pub mod tick;
pub mod wavefront;

pub use arc::{AngularDomain, VisibleArc, pair_boundaries};
pub use barrier::{Barrier, BarrierIndex, Endpoint};
pub use collision::{CircleLineHit, blocks, circle_line_intersection, segments_intersect};
pub use source::WaveSource;
pub use state::{RunPhase, Simulation};
pub use tick::{TickInput, TickSummary, step, tick};
pub use wavefront::{Wavefront, diffraction_spread};

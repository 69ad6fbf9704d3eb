//! Simulation tick
//!
//! Advances the population by one explicit time step. Wavefronts born
//! during a tick (source pulses and diffraction children) are staged and
//! merged only after every existing wavefront has been advanced, so the
//! outcome never depends on the order of the sweep.

use super::state::{RunPhase, Simulation};

/// One-shot commands from the host for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave editing and start propagating
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// End the run, keeping the layout
    pub reset: bool,
    /// End the run and remove every source and authored barrier
    pub clear: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Wavefronts released by source pulses
    pub emitted: usize,
    /// Wavefronts spawned by diffraction
    pub diffracted: usize,
    /// Wavefronts that died
    pub retired: usize,
    /// Staged wavefronts dropped by the population cap
    pub dropped: usize,
    /// Live wavefronts after the tick
    pub live: usize,
    /// The run finished on this tick
    pub run_ended: bool,
}

/// Apply host commands, then advance the simulation by `dt` seconds
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f64) -> TickSummary {
    if input.clear {
        sim.clear();
    } else if input.reset {
        sim.reset();
    }
    if input.start {
        sim.start();
    }
    if input.pause {
        sim.toggle_pause();
    }

    step(sim, dt)
}

/// Advance the simulation by one step without host commands
///
/// Does nothing unless the run is in the `Running` phase.
pub fn step(sim: &mut Simulation, dt: f64) -> TickSummary {
    if sim.phase() != RunPhase::Running {
        return TickSummary {
            live: sim.wavefronts.len(),
            ..Default::default()
        };
    }

    sim.time_ticks += 1;
    sim.elapsed += dt;

    let barrier_count = sim.barriers.len();
    let mut staged = Vec::new();
    for source in &mut sim.sources {
        source.advance(dt, barrier_count, &mut staged);
    }
    let emitted = staged.len();

    let before = sim.wavefronts.len();
    {
        let Simulation {
            barriers,
            wavefronts,
            ..
        } = &mut *sim;
        wavefronts.retain_mut(|wavefront| !wavefront.advance(dt, barriers.as_slice(), &mut staged));
    }
    let retired = before - sim.wavefronts.len();
    let diffracted = staged.len() - emitted;

    // Pulses were staged first, so the cap drops diffraction children first
    let dropped = sim.admit(staged);

    let run_ended = sim.run_ended();
    if run_ended {
        sim.finish();
    }

    log::trace!(
        "Tick {}: +{} pulse(s), +{} diffracted, -{} retired, {} live",
        sim.time_ticks,
        emitted,
        diffracted,
        retired,
        sim.wavefronts.len()
    );

    TickSummary {
        emitted,
        diffracted,
        retired,
        dropped,
        live: sim.wavefronts.len(),
        run_ended,
    }
}

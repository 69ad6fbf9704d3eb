//! Simulation state and lifecycle
//!
//! One `Simulation` owns everything a run needs: parameters, barriers,
//! sources and the live wavefront population. Authoring only happens while
//! editing; barriers are frozen once a run starts.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::barrier::{Barrier, BarrierIndex};
use super::source::WaveSource;
use super::wavefront::Wavefront;
use crate::config::SimConfig;
use crate::error::{AuthoringError, ConfigError, SceneError};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Placing sources and barriers, nothing propagates
    Editing,
    /// Wavefronts propagate every tick
    Running,
    /// Run suspended, population frozen
    Paused,
    /// Every source is spent and every wavefront has died
    Finished,
}

/// Complete simulation state (deterministic)
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    phase: RunPhase,
    /// Edge walls first, then authored barriers in creation order
    pub(crate) barriers: Vec<Barrier>,
    edge_count: usize,
    pub(crate) sources: Vec<WaveSource>,
    /// Live wavefronts, in creation order
    pub(crate) wavefronts: Vec<Wavefront>,
    /// Simulated seconds since the run started
    pub(crate) elapsed: f64,
    /// Ticks advanced since the run started
    pub(crate) time_ticks: u64,
    next_id: u32,
}

impl Simulation {
    /// Create an empty simulation in the editing phase
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self {
            config,
            phase: RunPhase::Editing,
            barriers: Vec::new(),
            edge_count: 0,
            sources: Vec::new(),
            wavefronts: Vec::new(),
            elapsed: 0.0,
            time_ticks: 0,
            next_id: 1,
        };
        sim.rebuild_edges();
        Ok(sim)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// All barriers: edge walls, then authored ones
    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    /// Barriers placed by the author (edge walls excluded)
    pub fn authored_barriers(&self) -> &[Barrier] {
        &self.barriers[self.edge_count..]
    }

    pub fn sources(&self) -> &[WaveSource] {
        &self.sources
    }

    pub fn wavefronts(&self) -> &[Wavefront] {
        &self.wavefronts
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Allocate a new wavefront ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Place a new source
    pub fn add_source(&mut self, position: DVec2) -> Result<usize, AuthoringError> {
        self.ensure_editing()?;
        if self.sources.len() >= self.config.max_sources {
            return Err(AuthoringError::SourceLimit {
                max: self.config.max_sources,
            });
        }
        if let Some(bounds) = self.config.bounds {
            if !bounds.contains_inside_walls(position) {
                return Err(AuthoringError::OutOfBounds {
                    x: position.x,
                    y: position.y,
                });
            }
        }

        self.sources.push(WaveSource::new(position, &self.config));
        log::debug!("Source {} placed at ({:.1}, {:.1})", self.sources.len() - 1, position.x, position.y);
        Ok(self.sources.len() - 1)
    }

    /// Place a new barrier
    ///
    /// Zero-length barriers are accepted; they never interact with anything.
    pub fn add_barrier(&mut self, start: DVec2, end: DVec2) -> Result<BarrierIndex, AuthoringError> {
        self.ensure_editing()?;
        if self.authored_barriers().len() >= self.config.max_barriers {
            return Err(AuthoringError::BarrierLimit {
                max: self.config.max_barriers,
            });
        }

        let barrier = Barrier::new(start, end);
        if barrier.is_degenerate() {
            log::debug!("Barrier at ({:.1}, {:.1}) has zero length", start.x, start.y);
        }
        self.barriers.push(barrier);
        Ok(self.barriers.len() - 1)
    }

    /// Replace the run parameters (editing only)
    ///
    /// Existing sources adopt the new parameters; sources and barriers over
    /// the new caps are dropped, newest first.
    pub fn reconfigure(&mut self, config: SimConfig) -> Result<(), SceneError> {
        self.ensure_editing()?;
        config.validate()?;

        let bounds_changed = config.bounds != self.config.bounds;
        self.config = config;

        if self.sources.len() > self.config.max_sources {
            log::info!(
                "Dropping {} source(s) over the new limit",
                self.sources.len() - self.config.max_sources
            );
            self.sources.truncate(self.config.max_sources);
        }
        for source in &mut self.sources {
            source.retune(&self.config);
        }

        let authored_limit = self.edge_count + self.config.max_barriers;
        if self.barriers.len() > authored_limit {
            log::info!(
                "Dropping {} barrier(s) over the new limit",
                self.barriers.len() - authored_limit
            );
            self.barriers.truncate(authored_limit);
        }
        if bounds_changed {
            self.rebuild_edges();
        }
        Ok(())
    }

    /// Begin propagating
    ///
    /// Every source releases its first pulse here with radius zero; the
    /// first tick grows it.
    pub fn start(&mut self) {
        if self.phase != RunPhase::Editing {
            return;
        }
        log::info!(
            "Run started: {} source(s), {} barrier(s)",
            self.sources.len(),
            self.barriers.len()
        );
        self.phase = RunPhase::Running;

        let barrier_count = self.barriers.len();
        let mut staged = Vec::new();
        for source in &mut self.sources {
            source.emit_first(barrier_count, &mut staged);
        }
        self.admit(staged);
    }

    /// Merge newly born wavefronts into the population, assigning IDs
    ///
    /// Anything over `max_live_wavefronts` is dropped from the back of
    /// `staged`. Returns the number dropped.
    pub(crate) fn admit(&mut self, mut staged: Vec<Wavefront>) -> usize {
        let room = self
            .config
            .max_live_wavefronts
            .saturating_sub(self.wavefronts.len());
        let dropped = staged.len().saturating_sub(room);
        if dropped > 0 {
            log::warn!(
                "Live wavefront cap of {} reached, dropping {} new wavefront(s)",
                self.config.max_live_wavefronts,
                dropped
            );
            staged.truncate(room);
        }

        for mut wavefront in staged {
            wavefront.id = self.next_entity_id();
            self.wavefronts.push(wavefront);
        }
        dropped
    }

    pub fn pause(&mut self) {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == RunPhase::Paused {
            self.phase = RunPhase::Running;
        }
    }

    /// Flip between running and paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            RunPhase::Running => self.pause(),
            RunPhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// End the run, keeping sources and barriers for the next one
    pub fn reset(&mut self) {
        self.wavefronts.clear();
        for source in &mut self.sources {
            source.reset();
        }
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.next_id = 1;
        if self.phase != RunPhase::Editing {
            log::info!("Run reset");
        }
        self.phase = RunPhase::Editing;
    }

    /// Reset and remove every source and authored barrier
    pub fn clear(&mut self) {
        self.reset();
        self.sources.clear();
        self.barriers.truncate(self.edge_count);
    }

    /// Every source is spent and nothing is left alive
    pub fn run_ended(&self) -> bool {
        self.wavefronts.is_empty() && self.sources.iter().all(WaveSource::is_exhausted)
    }

    pub(crate) fn finish(&mut self) {
        log::info!(
            "Run finished after {} ticks ({:.2}s simulated)",
            self.time_ticks,
            self.elapsed
        );
        self.phase = RunPhase::Finished;
    }

    fn ensure_editing(&self) -> Result<(), AuthoringError> {
        if self.phase == RunPhase::Editing {
            Ok(())
        } else {
            Err(AuthoringError::NotEditing)
        }
    }

    /// Swap in edge walls matching the configured bounds
    fn rebuild_edges(&mut self) {
        let authored = self.barriers.split_off(self.edge_count);
        self.barriers.clear();
        if let Some(bounds) = self.config.bounds {
            self.barriers.extend(Barrier::edge_walls(&bounds));
        }
        self.edge_count = self.barriers.len();
        self.barriers.extend(authored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;

    #[test]
    fn test_new_bounded_has_edge_walls() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.barriers().len(), 4);
        assert!(sim.authored_barriers().is_empty());
        assert_eq!(sim.phase(), RunPhase::Editing);

        let open = Simulation::new(SimConfig::unbounded()).unwrap();
        assert!(open.barriers().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimConfig {
            period: -1.0,
            ..SimConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_source_limit() {
        let config = SimConfig {
            max_sources: 2,
            ..SimConfig::unbounded()
        };
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.add_source(DVec2::ZERO), Ok(0));
        assert_eq!(sim.add_source(DVec2::X), Ok(1));
        assert_eq!(
            sim.add_source(DVec2::Y),
            Err(AuthoringError::SourceLimit { max: 2 })
        );
    }

    #[test]
    fn test_source_must_be_inside_walls() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert!(sim.add_source(DVec2::new(960.0, 540.0)).is_ok());
        assert_eq!(
            sim.add_source(DVec2::new(1.0, 540.0)),
            Err(AuthoringError::OutOfBounds { x: 1.0, y: 540.0 })
        );
    }

    #[test]
    fn test_barrier_limit_excludes_edges() {
        let config = SimConfig {
            max_barriers: 1,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.add_barrier(DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0)), Ok(4));
        assert_eq!(
            sim.add_barrier(DVec2::new(100.0, 200.0), DVec2::new(200.0, 200.0)),
            Err(AuthoringError::BarrierLimit { max: 1 })
        );
    }

    #[test]
    fn test_authoring_locked_outside_editing() {
        let mut sim = Simulation::new(SimConfig::unbounded()).unwrap();
        sim.start();
        assert_eq!(sim.phase(), RunPhase::Running);
        assert_eq!(sim.add_source(DVec2::ZERO), Err(AuthoringError::NotEditing));
        assert_eq!(
            sim.add_barrier(DVec2::ZERO, DVec2::X),
            Err(AuthoringError::NotEditing)
        );
    }

    #[test]
    fn test_pause_resume_transitions() {
        let mut sim = Simulation::new(SimConfig::unbounded()).unwrap();
        sim.pause();
        assert_eq!(sim.phase(), RunPhase::Editing);
        sim.start();
        sim.toggle_pause();
        assert_eq!(sim.phase(), RunPhase::Paused);
        sim.start(); // no effect while paused
        assert_eq!(sim.phase(), RunPhase::Paused);
        sim.toggle_pause();
        assert_eq!(sim.phase(), RunPhase::Running);
    }

    #[test]
    fn test_reset_keeps_layout_and_clear_removes_it() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.add_source(DVec2::new(500.0, 500.0)).unwrap();
        sim.add_barrier(DVec2::new(600.0, 400.0), DVec2::new(600.0, 600.0)).unwrap();
        sim.start();
        sim.sources[0].pulse_count = 3;

        sim.reset();
        assert_eq!(sim.phase(), RunPhase::Editing);
        assert_eq!(sim.sources().len(), 1);
        assert_eq!(sim.sources()[0].pulse_count, 0);
        assert_eq!(sim.authored_barriers().len(), 1);

        sim.clear();
        assert!(sim.sources().is_empty());
        assert!(sim.authored_barriers().is_empty());
        assert_eq!(sim.barriers().len(), 4);
    }

    #[test]
    fn test_reconfigure_truncates_and_retunes() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        for x in [300.0, 600.0, 900.0] {
            sim.add_source(DVec2::new(x, 500.0)).unwrap();
        }
        for y in [100.0, 200.0] {
            sim.add_barrier(DVec2::new(100.0, y), DVec2::new(200.0, y)).unwrap();
        }

        let config = SimConfig {
            speed: 350.0,
            max_sources: 1,
            max_barriers: 1,
            ..SimConfig::default()
        };
        sim.reconfigure(config).unwrap();
        assert_eq!(sim.sources().len(), 1);
        assert_eq!(sim.sources()[0].centre, DVec2::new(300.0, 500.0));
        assert_eq!(sim.sources()[0].speed, 350.0);
        assert_eq!(sim.authored_barriers().len(), 1);
        assert_eq!(sim.authored_barriers()[0].start, DVec2::new(100.0, 100.0));
    }

    #[test]
    fn test_reconfigure_rebuilds_edges() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.add_barrier(DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0)).unwrap();

        let config = SimConfig {
            bounds: Some(Bounds::from_size(800.0, 600.0)),
            ..SimConfig::default()
        };
        sim.reconfigure(config).unwrap();
        assert_eq!(sim.barriers().len(), 5);
        assert_eq!(sim.barriers()[1].start, DVec2::new(798.0, 1.0));
        assert_eq!(sim.authored_barriers()[0].start, DVec2::new(100.0, 100.0));

        sim.reconfigure(SimConfig::unbounded()).unwrap();
        assert_eq!(sim.barriers().len(), 1);
        assert!(sim.authored_barriers().len() == 1);
    }

    #[test]
    fn test_start_releases_first_pulses() {
        let mut sim = Simulation::new(SimConfig::unbounded()).unwrap();
        sim.add_source(DVec2::ZERO).unwrap();
        sim.add_source(DVec2::new(100.0, 0.0)).unwrap();
        sim.start();
        assert_eq!(sim.wavefronts().len(), 2);
        assert_eq!(sim.wavefronts()[0].id, 1);
        assert_eq!(sim.wavefronts()[1].id, 2);
        assert_eq!(sim.wavefronts()[1].centre(), DVec2::new(100.0, 0.0));
        assert!(sim.wavefronts().iter().all(|w| w.radius() == 0.0));
        assert!(sim.sources().iter().all(|s| s.pulse_count == 1));

        // A second start while running changes nothing
        sim.start();
        assert_eq!(sim.wavefronts().len(), 2);
    }

    #[test]
    fn test_start_respects_live_cap() {
        let config = SimConfig {
            max_live_wavefronts: 1,
            ..SimConfig::unbounded()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.add_source(DVec2::ZERO).unwrap();
        sim.add_source(DVec2::X).unwrap();
        sim.start();
        assert_eq!(sim.wavefronts().len(), 1);
        assert_eq!(sim.wavefronts()[0].centre(), DVec2::ZERO);
    }

    #[test]
    fn test_run_ended_with_no_sources() {
        let sim = Simulation::new(SimConfig::unbounded()).unwrap();
        assert!(sim.run_ended());
    }
}

//! Serializable authoring snapshots
//!
//! A scene is everything a user authors before pressing start: run
//! parameters, source positions and barriers. Edge walls are not stored;
//! they follow from the configured bounds when the scene is built.

use std::f64::consts::TAU;
use std::fs;
use std::path::Path;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{Bounds, SimConfig};
use crate::consts::EDGE_INSET;
use crate::error::SceneError;
use crate::polar_to_cartesian;
use crate::sim::{Barrier, Simulation};

/// Shortest and longest barrier produced by `Scene::random`
const RANDOM_BARRIER_LENGTH: (f64, f64) = (40.0, 400.0);

/// Authored layout plus the parameters to run it with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub config: SimConfig,
    pub sources: Vec<DVec2>,
    pub barriers: Vec<Barrier>,
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: Self = serde_json::from_str(json)?;
        scene.config.validate()?;
        Ok(scene)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;
        log::info!(
            "Loaded scene from {}: {} source(s), {} barrier(s)",
            path.display(),
            scene.sources.len(),
            scene.barriers.len()
        );
        Ok(scene)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Saved scene to {}", path.display());
        Ok(())
    }

    /// Create a simulation in the editing phase holding this layout
    ///
    /// Fails on the first source or barrier the configuration rejects.
    pub fn build(&self) -> Result<Simulation, SceneError> {
        let mut sim = Simulation::new(self.config.clone())?;
        for &position in &self.sources {
            sim.add_source(position)?;
        }
        for barrier in &self.barriers {
            sim.add_barrier(barrier.start, barrier.end)?;
        }
        Ok(sim)
    }

    /// Seeded random layout inside the configured field
    ///
    /// Counts are clamped to the configured limits. An open plane uses the
    /// default field size for placement.
    pub fn random(seed: u64, config: SimConfig, sources: usize, barriers: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = config.bounds.unwrap_or_default();
        let margin = EDGE_INSET + 1.0;
        let min = field.min + DVec2::splat(margin);
        let max = field.max - DVec2::splat(margin);

        let random_point = |rng: &mut Pcg32| {
            DVec2::new(rng.random_range(min.x..max.x), rng.random_range(min.y..max.y))
        };

        let source_count = sources.min(config.max_sources);
        let positions: Vec<DVec2> = (0..source_count).map(|_| random_point(&mut rng)).collect();

        let barrier_count = barriers.min(config.max_barriers);
        let walls: Vec<Barrier> = (0..barrier_count)
            .map(|_| {
                let start = random_point(&mut rng);
                let length = rng.random_range(RANDOM_BARRIER_LENGTH.0..RANDOM_BARRIER_LENGTH.1);
                let heading = rng.random_range(0.0..TAU);
                let end = clamp_to(&field, margin, polar_to_cartesian(start, length, heading));
                Barrier::new(start, end)
            })
            .collect();

        log::debug!(
            "Random scene from seed {}: {} source(s), {} barrier(s)",
            seed,
            positions.len(),
            walls.len()
        );
        Self {
            config,
            sources: positions,
            barriers: walls,
        }
    }
}

fn clamp_to(field: &Bounds, margin: f64, point: DVec2) -> DVec2 {
    point.clamp(field.min + DVec2::splat(margin), field.max - DVec2::splat(margin))
}

impl Simulation {
    /// Snapshot the authored layout (edge walls excluded)
    pub fn scene(&self) -> Scene {
        Scene {
            config: self.config().clone(),
            sources: self.sources().iter().map(|s| s.centre).collect(),
            barriers: self.authored_barriers().to_vec(),
        }
    }
}

//! Error types for configuration, authoring and scene I/O.
//!
//! The simulation core itself never fails: numeric edge cases are guarded
//! in place. These errors only surface at the boundary where a host hands
//! parameters, sources, barriers or files to the engine.

use thiserror::Error;

/// Invalid run parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A parameter that must be strictly positive and finite was not.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// A population cap was zero.
    #[error("{0} must be at least 1")]
    ZeroCap(&'static str),
    /// The bounded field has no interior once the edge walls are inset.
    #[error("bounds ({min_x}, {min_y})..({max_x}, {max_y}) leave no room inside the edge walls")]
    DegenerateBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}

/// A rejected authoring request (source placement, barrier creation).
#[derive(Debug, Error, PartialEq)]
pub enum AuthoringError {
    /// Sources and barriers can only change while the run is being edited.
    #[error("the simulation is not in the editing phase")]
    NotEditing,
    /// The configured source limit is already reached.
    #[error("source limit of {max} reached")]
    SourceLimit { max: usize },
    /// The configured barrier limit is already reached.
    #[error("barrier limit of {max} reached")]
    BarrierLimit { max: usize },
    /// The source position lies outside the walled field.
    #[error("source at ({x}, {y}) lies outside the field")]
    OutOfBounds { x: f64, y: f64 },
}

/// Failure to load, save or build a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Authoring(#[from] AuthoringError),
}

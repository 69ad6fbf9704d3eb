//! Run parameters
//!
//! Fixed for the duration of a run; a host edits them between runs and
//! hands them over through `Simulation::reconfigure`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SceneError};

/// Rectangular field enclosed by edge walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Field of the given size with its corner at the origin
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether a point lies strictly inside the edge walls
    pub fn contains_inside_walls(&self, point: DVec2) -> bool {
        point.x > self.min.x + EDGE_INSET
            && point.x < self.max.x - EDGE_INSET
            && point.y > self.min.y + EDGE_INSET
            && point.y < self.max.y - EDGE_INSET
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Wavefront growth speed (units per second)
    pub speed: f64,
    /// Seconds between pulses of one source
    pub period: f64,
    /// Travel distance after which a wavefront has run out of energy
    pub max_distance: f64,
    /// Pulses each source emits per run
    pub max_wavefronts_per_source: u32,
    /// Sources that may be placed
    pub max_sources: usize,
    /// Authored barriers that may be placed (edge walls excluded)
    pub max_barriers: usize,
    /// Walled field; `None` leaves the plane open
    pub bounds: Option<Bounds>,
    /// Hard cap on simultaneously live wavefronts
    pub max_live_wavefronts: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            period: DEFAULT_PERIOD,
            max_distance: DEFAULT_MAX_DISTANCE,
            max_wavefronts_per_source: DEFAULT_WAVEFRONTS_PER_SOURCE,
            max_sources: DEFAULT_MAX_SOURCES,
            max_barriers: DEFAULT_MAX_BARRIERS,
            bounds: Some(Bounds::default()),
            max_live_wavefronts: DEFAULT_MAX_LIVE_WAVEFRONTS,
        }
    }
}

impl SimConfig {
    /// Default parameters on an open plane (no edge walls)
    pub fn unbounded() -> Self {
        Self {
            bounds: None,
            ..Self::default()
        }
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("speed", self.speed),
            ("period", self.period),
            ("max_distance", self.max_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.max_wavefronts_per_source == 0 {
            return Err(ConfigError::ZeroCap("max_wavefronts_per_source"));
        }
        if self.max_sources == 0 {
            return Err(ConfigError::ZeroCap("max_sources"));
        }
        if self.max_live_wavefronts == 0 {
            return Err(ConfigError::ZeroCap("max_live_wavefronts"));
        }
        if let Some(bounds) = self.bounds {
            let margin = 2.0 * EDGE_INSET;
            if !(bounds.width() > margin && bounds.height() > margin) {
                return Err(ConfigError::DegenerateBounds {
                    min_x: bounds.min.x,
                    min_y: bounds.min.y,
                    max_x: bounds.max.x,
                    max_y: bounds.max.y,
                });
            }
        }
        Ok(())
    }

    /// Travel time after which a wavefront dies of exhaustion
    pub fn lifetime(&self) -> f64 {
        self.max_distance / self.speed
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
        assert!(SimConfig::unbounded().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        let config = SimConfig {
            speed: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "speed",
                value: 0.0
            })
        );

        let config = SimConfig {
            period: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "period", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_caps() {
        let config = SimConfig {
            max_sources: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCap("max_sources")));
    }

    #[test]
    fn test_rejects_tiny_bounds() {
        let config = SimConfig {
            bounds: Some(Bounds::from_size(3.0, 100.0)),
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DegenerateBounds { .. })
        ));
    }

    #[test]
    fn test_bounds_inside_walls() {
        let bounds = Bounds::default();
        assert!(bounds.contains_inside_walls(DVec2::new(960.0, 540.0)));
        assert!(!bounds.contains_inside_walls(DVec2::new(2.0, 540.0)));
        assert!(!bounds.contains_inside_walls(DVec2::new(960.0, 1078.0)));
        assert!(!bounds.contains_inside_walls(DVec2::new(-5.0, -5.0)));
    }

    #[test]
    fn test_json_roundtrip_with_partial_input() {
        let config = SimConfig::from_json(r#"{ "speed": 120.0, "bounds": null }"#).unwrap();
        assert_eq!(config.speed, 120.0);
        assert_eq!(config.period, DEFAULT_PERIOD);
        assert!(config.bounds.is_none());

        let back = SimConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        assert!(SimConfig::from_json(r#"{ "speed": -1.0 }"#).is_err());
        assert!(SimConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_to_json_names_every_field() {
        let json = SimConfig::default().to_json().unwrap();
        for field in ["speed", "period", "max_distance", "max_live_wavefronts", "bounds"] {
            assert!(json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_lifetime() {
        let config = SimConfig::default();
        assert!((config.lifetime() - 7.5).abs() < 1e-12);
    }
}

//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Default gravity applied when none is given
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.807, 0.0];

/// Default fixed time step of the backend
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Engine-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.807 in Y)
    pub gravity: [f32; 3],

    /// Time step handed to the backend
    pub time_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl PhysicsConfig {
    /// Parse a configuration from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PhysicsError::InvalidConfig(e.to_string()))
    }

    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.gravity = [x, y, z];
        self
    }

    /// Set time step
    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }
}

/// Solver settings for the Rapier backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RapierConfig {
    /// Solver iterations per step
    pub solver_iterations: usize,

    /// Maximum number of fixed substeps per frame
    pub max_substeps: u32,

    /// Enable continuous collision detection on generated bodies
    pub ccd_enabled: bool,

    /// Allow inactive bodies to fall asleep
    pub sleeping_enabled: bool,
}

impl Default for RapierConfig {
    fn default() -> Self {
        Self {
            solver_iterations: 4,
            max_substeps: 6,
            ccd_enabled: false,
            sleeping_enabled: true,
        }
    }
}

impl RapierConfig {
    /// Create a configuration for high-precision simulation
    pub fn high_precision() -> Self {
        Self {
            solver_iterations: 8,
            max_substeps: 8,
            ccd_enabled: true,
            ..Default::default()
        }
    }

    /// Create a configuration for fast simulation (lower quality)
    pub fn fast() -> Self {
        Self {
            solver_iterations: 2,
            max_substeps: 2,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, [0.0, -9.807, 0.0]);
        assert!((config.time_step - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_json_partial() {
        let config = PhysicsConfig::from_json(r#"{ "gravity": [0.0, -1.62, 0.0] }"#).unwrap();
        assert_eq!(config.gravity, [0.0, -1.62, 0.0]);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = PhysicsConfig::from_json("{ gravity: nope").unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidConfig(_)));
    }
}

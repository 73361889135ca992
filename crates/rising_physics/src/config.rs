//! Locomotion configuration

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Tuning for kinematic agent movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Longest sub-step as a fraction of the mover's radius
    pub max_step_fraction: f32,

    /// Upper bound on sub-steps for one displacement
    pub max_substeps: u32,

    /// Push-out passes when an agent starts embedded in geometry
    pub depenetration_iterations: u32,

    /// Extra distance added when pushing out, so the result is not touching
    pub skin: f32,

    /// Height of agent capsules
    pub agent_height: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            max_step_fraction: 0.5,
            max_substeps: 64,
            depenetration_iterations: 4,
            skin: 1e-3,
            agent_height: 1.8,
        }
    }
}

impl LocomotionConfig {
    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.max_step_fraction > 0.0 && self.max_step_fraction <= 1.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_step_fraction must be in (0, 1], got {}",
                self.max_step_fraction
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be positive".into()));
        }
        if !(self.skin >= 0.0) || !(self.agent_height > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "skin must be non-negative and agent_height positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LocomotionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_step() {
        let config = LocomotionConfig {
            max_step_fraction: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LocomotionConfig {
            max_step_fraction: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

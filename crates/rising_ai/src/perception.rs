//! Player detection with hysteresis

use serde::{Deserialize, Serialize};

/// Detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Distance under which the player is noticed
    pub radius: f32,
    /// Multiplier on `radius` beyond which a chase is abandoned
    pub hysteresis: f32,
    /// Also require a clear sight line to notice the player
    pub require_line_of_sight: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            radius: 12.0,
            hysteresis: 1.5,
            require_line_of_sight: false,
        }
    }
}

/// Detection queries for one configuration
#[derive(Debug, Clone, Default)]
pub struct Perception {
    config: DetectionConfig,
}

impl Perception {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Distance beyond which a target is lost
    pub fn lose_radius(&self) -> f32 {
        self.config.radius * self.config.hysteresis.max(1.0)
    }

    /// Whether a sight-line test is worth running at this distance
    pub fn needs_line_of_sight(&self, distance: f32) -> bool {
        self.config.require_line_of_sight && distance < self.config.radius
    }

    /// Check if a target at `distance` is noticed
    ///
    /// `line_of_sight` is ignored unless the configuration requires it.
    pub fn can_detect(&self, distance: f32, line_of_sight: bool) -> bool {
        distance < self.config.radius && (!self.config.require_line_of_sight || line_of_sight)
    }

    /// Check if a chased target has escaped
    pub fn has_lost(&self, distance: f32) -> bool {
        !(distance <= self.lose_radius())
    }
}

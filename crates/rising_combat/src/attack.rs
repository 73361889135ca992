//! Attack descriptors and melee combo timing

use rising_core::AgentId;
use rising_math::Vec3;
use serde::{Deserialize, Serialize};

/// One melee swing, produced by a controller and consumed the same frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackDescriptor {
    pub owner: AgentId,
    pub origin: Vec3,
    /// Unit XZ direction the swing faces
    pub forward: Vec3,
    pub range: f32,
    pub damage: i32,
    pub backstab_eligible: bool,
}

impl AttackDescriptor {
    /// Create a descriptor, flattening and normalizing `forward`
    pub fn new(owner: AgentId, origin: Vec3, forward: Vec3, range: f32, damage: i32) -> Self {
        let forward = forward.flat().normalize_or_zero();
        Self {
            owner,
            origin,
            forward: if forward == Vec3::ZERO { Vec3::Z } else { forward },
            range: range.max(0.0),
            damage,
            backstab_eligible: false,
        }
    }

    pub fn with_backstab(mut self, eligible: bool) -> Self {
        self.backstab_eligible = eligible;
        self
    }
}

/// Melee combo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Animation clip per combo step, played in order
    pub steps: Vec<String>,
    /// Idle time after a swing before the combo restarts
    pub combo_window: f32,
    /// Swing length if the animation never reports completion
    pub attack_duration: f32,
    /// Delay from swing start to the hit
    pub hit_delay: f32,
    /// Forward impulse applied at swing start
    pub lunge_speed: f32,
    /// Playback speed of swing clips
    pub time_scale: f32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            steps: vec!["attack_1".to_string(), "attack_2".to_string()],
            combo_window: 0.5,
            attack_duration: 0.6,
            hit_delay: 0.1,
            lunge_speed: 6.0,
            time_scale: 1.5,
        }
    }
}

impl ComboConfig {
    /// Clip for a step, wrapping around
    pub fn clip(&self, step: usize) -> &str {
        if self.steps.is_empty() {
            return "attack";
        }
        &self.steps[step % self.steps.len()]
    }

    pub fn len(&self) -> usize {
        self.steps.len().max(1)
    }
}

/// Tracks which combo step the next swing uses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboTracker {
    next_step: usize,
    idle_time: f32,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a swing, returning its step index
    pub fn begin(&mut self, config: &ComboConfig) -> usize {
        let step = self.next_step % config.len();
        self.next_step = (step + 1) % config.len();
        self.idle_time = 0.0;
        step
    }

    /// Advance idle time between swings; the chain breaks once the window passes
    pub fn update(&mut self, delta_time: f32, config: &ComboConfig) {
        self.idle_time += delta_time;
        if self.idle_time > config.combo_window {
            self.next_step = 0;
        }
    }

    pub fn next_step(&self) -> usize {
        self.next_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_normalizes_forward() {
        let attack = AttackDescriptor::new(AgentId::new(0, 0), Vec3::ZERO, Vec3::new(0.0, 3.0, 2.0), 2.0, 1);
        assert_eq!(attack.forward, Vec3::Z);
        assert!(!attack.backstab_eligible);
        assert!(attack.with_backstab(true).backstab_eligible);
    }

    #[test]
    fn test_combo_cycles_within_window() {
        let config = ComboConfig::default();
        let mut combo = ComboTracker::new();

        assert_eq!(combo.begin(&config), 0);
        combo.update(0.2, &config);
        assert_eq!(combo.begin(&config), 1);
        combo.update(0.2, &config);
        assert_eq!(combo.begin(&config), 0);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let config = ComboConfig::default();
        let mut combo = ComboTracker::new();

        assert_eq!(combo.begin(&config), 0);
        combo.update(0.3, &config);
        combo.update(0.3, &config);
        assert_eq!(combo.begin(&config), 0);
        assert_eq!(config.clip(1), "attack_2");
    }
}

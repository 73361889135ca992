//! Integer health with an invulnerability window

use serde::{Deserialize, Serialize};

/// Why a damage application did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    AlreadyDead,
    Invulnerable,
    NoDamage,
}

/// Result of [`Health::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageResult {
    Applied {
        dealt: i32,
        remaining: i32,
        /// True only on the application that took health to zero
        died: bool,
    },
    Ignored(IgnoreReason),
}

impl DamageResult {
    pub fn dealt(&self) -> i32 {
        match self {
            Self::Applied { dealt, .. } => *dealt,
            Self::Ignored(_) => 0,
        }
    }

    pub fn died(&self) -> bool {
        matches!(self, Self::Applied { died: true, .. })
    }
}

/// Health of one agent
///
/// Health never goes up and never below zero. Reaching zero flips the agent
/// to dead exactly once; every later damage call is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
    /// Remaining invulnerability time
    #[serde(skip)]
    invulnerability_timer: f32,
    #[serde(skip)]
    dead: bool,
}

impl Health {
    /// Create a health pool, full
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            invulnerability_timer: 0.0,
            dead: false,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Health as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability_timer > 0.0
    }

    pub fn invulnerability_remaining(&self) -> f32 {
        self.invulnerability_timer.max(0.0)
    }

    /// Open (or extend) an invulnerability window
    pub fn grant_invulnerability(&mut self, duration: f32) {
        if duration.is_finite() {
            self.invulnerability_timer = self.invulnerability_timer.max(duration);
        }
    }

    /// Apply damage
    pub fn take_damage(&mut self, amount: i32) -> DamageResult {
        if self.dead {
            return DamageResult::Ignored(IgnoreReason::AlreadyDead);
        }
        if self.is_invulnerable() {
            return DamageResult::Ignored(IgnoreReason::Invulnerable);
        }
        if amount <= 0 {
            return DamageResult::Ignored(IgnoreReason::NoDamage);
        }

        let dealt = amount.min(self.current);
        self.current -= dealt;
        let died = self.current <= 0;
        if died {
            self.dead = true;
        }

        DamageResult::Applied {
            dealt,
            remaining: self.current,
            died,
        }
    }

    /// Count down the invulnerability window
    pub fn update(&mut self, delta_time: f32) {
        if self.invulnerability_timer > 0.0 {
            self.invulnerability_timer = (self.invulnerability_timer - delta_time).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_and_death() {
        let mut health = Health::new(3);

        assert_eq!(health.take_damage(1), DamageResult::Applied { dealt: 1, remaining: 2, died: false });
        let killing = health.take_damage(5);
        assert_eq!(killing, DamageResult::Applied { dealt: 2, remaining: 0, died: true });
        assert!(health.is_dead());
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_dead_is_idempotent() {
        let mut health = Health::new(1);
        assert!(health.take_damage(1).died());

        for _ in 0..3 {
            assert_eq!(health.take_damage(10), DamageResult::Ignored(IgnoreReason::AlreadyDead));
        }
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_invulnerability_window() {
        let mut health = Health::new(5);
        health.grant_invulnerability(0.3);

        assert_eq!(health.take_damage(2), DamageResult::Ignored(IgnoreReason::Invulnerable));
        assert_eq!(health.current(), 5);

        health.update(0.2);
        assert!(health.is_invulnerable());
        health.update(0.2);
        assert!(!health.is_invulnerable());
        assert_eq!(health.take_damage(2).dealt(), 2);
    }

    #[test]
    fn test_non_positive_damage_ignored() {
        let mut health = Health::new(5);
        assert_eq!(health.take_damage(0), DamageResult::Ignored(IgnoreReason::NoDamage));
        assert_eq!(health.take_damage(-3), DamageResult::Ignored(IgnoreReason::NoDamage));
        assert_eq!(health.current(), 5);
    }

    #[test]
    fn test_grant_keeps_longer_window() {
        let mut health = Health::new(5);
        health.grant_invulnerability(0.5);
        health.grant_invulnerability(0.1);
        assert!((health.invulnerability_remaining() - 0.5).abs() < 1e-6);
    }
}

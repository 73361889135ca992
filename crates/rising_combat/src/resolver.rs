//! Melee hit resolution
//!
//! [`resolve_attack`] is a pure function of the attack, a plain snapshot of
//! the target and the rules. The same inputs always give the same outcome.

use rising_core::{AgentId, AgentKind};
use rising_math::{horizontal_direction, horizontal_distance, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attack::AttackDescriptor;
use crate::damage::{HitOutcome, HitReaction, HitTier};

/// Tunable thresholds for hit resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Slack added to an attack's range
    pub range_tolerance: f32,
    /// Minimum cosine between the swing and the direction to the target
    pub min_alignment: f32,
    /// Fraction of damage a block absorbs
    pub block_reduction: f32,
    /// Minimum cosine between the swing and the target's facing for a backstab
    pub backstab_alignment: f32,
    pub critical_multiplier: f32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            range_tolerance: 0.5,
            min_alignment: 0.5,
            block_reduction: 0.5,
            backstab_alignment: 0.5,
            critical_multiplier: 2.0,
        }
    }
}

/// Rejected combat rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl CombatRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        let checks = [
            ("range_tolerance", self.range_tolerance, 0.0, f32::MAX),
            ("min_alignment", self.min_alignment, -1.0, 1.0),
            ("block_reduction", self.block_reduction, 0.0, 1.0),
            ("backstab_alignment", self.backstab_alignment, -1.0, 1.0),
            ("critical_multiplier", self.critical_multiplier, 1.0, f32::MAX),
        ];
        for (field, value, min, max) in checks {
            if !(value >= min && value <= max) {
                return Err(RulesError::OutOfRange { field, value, min, max });
            }
        }
        Ok(())
    }
}

/// What the resolver needs to know about a potential target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Vec3,
    /// Unit XZ facing
    pub facing: Vec3,
    pub alive: bool,
    /// Holding a block (only meaningful for the player)
    pub blocking: bool,
    pub invulnerable: bool,
}

impl TargetSnapshot {
    pub fn new(id: AgentId, kind: AgentKind, position: Vec3, facing: Vec3) -> Self {
        Self {
            id,
            kind,
            position,
            facing,
            alive: true,
            blocking: false,
            invulnerable: false,
        }
    }

    pub fn with_alive(mut self, alive: bool) -> Self {
        self.alive = alive;
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_invulnerable(mut self, invulnerable: bool) -> Self {
        self.invulnerable = invulnerable;
        self
    }
}

/// Decide whether one attack lands on one target
pub fn resolve_attack(
    attack: &AttackDescriptor,
    target: &TargetSnapshot,
    rules: &CombatRules,
) -> Option<HitOutcome> {
    if !target.alive || target.id == attack.owner {
        return None;
    }

    let distance = horizontal_distance(attack.origin, target.position);
    if !(distance <= attack.range + rules.range_tolerance) {
        return None;
    }

    // A target standing exactly on the origin counts as in front
    let direction = match horizontal_direction(attack.origin, target.position) {
        Some(direction) => {
            if attack.forward.dot(direction) <= rules.min_alignment {
                return None;
            }
            direction
        }
        None => attack.forward,
    };

    let hit = |damage: i32, tier: HitTier, reaction: HitReaction| HitOutcome {
        attacker: attack.owner,
        target: target.id,
        damage,
        tier,
        reaction,
        direction,
    };

    if target.invulnerable {
        return Some(hit(0, HitTier::Evaded, HitReaction::None));
    }

    let backstab = attack.backstab_eligible
        && attack.forward.dot(target.facing.flat().normalize_or_zero()) > rules.backstab_alignment;
    if backstab {
        let damage = (attack.damage as f32 * rules.critical_multiplier).round() as i32;
        return Some(hit(damage, HitTier::Critical, HitReaction::Hurt));
    }

    if target.blocking && target.kind == AgentKind::Player {
        let damage = (attack.damage as f32 * (1.0 - rules.block_reduction)).ceil() as i32;
        return Some(hit(damage.max(0), HitTier::Blocked, HitReaction::BlockHit));
    }

    Some(hit(attack.damage, HitTier::Base, HitReaction::Hurt))
}

/// Resolve one attack against many candidates, in order
pub fn resolve_attack_all(
    attack: &AttackDescriptor,
    targets: &[TargetSnapshot],
    rules: &CombatRules,
) -> Vec<HitOutcome> {
    targets
        .iter()
        .filter(|target| target.alive && target.id != attack.owner)
        .filter_map(|target| resolve_attack(attack, target, rules))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: AgentId = AgentId::new(0, 0);
    const ENEMY: AgentId = AgentId::new(1, 0);

    fn player_swing(damage: i32) -> AttackDescriptor {
        AttackDescriptor::new(PLAYER, Vec3::ZERO, Vec3::Z, 2.0, damage).with_backstab(true)
    }

    fn enemy_at(x: f32, z: f32, facing: Vec3) -> TargetSnapshot {
        TargetSnapshot::new(ENEMY, AgentKind::Enemy, Vec3::ground(x, z), facing)
    }

    #[test]
    fn test_backstab_is_critical() {
        let rules = CombatRules::default();
        // Enemy has its back to the attacker
        let outcome = resolve_attack(&player_swing(1), &enemy_at(0.0, 2.0, Vec3::Z), &rules).unwrap();
        assert_eq!(outcome.tier, HitTier::Critical);
        assert_eq!(outcome.damage, 2);
        assert_eq!(outcome.reaction, HitReaction::Hurt);
    }

    #[test]
    fn test_facing_attacker_is_base() {
        let rules = CombatRules::default();
        let outcome = resolve_attack(&player_swing(1), &enemy_at(0.0, 2.0, Vec3::NEG_Z), &rules).unwrap();
        assert_eq!(outcome.tier, HitTier::Base);
        assert_eq!(outcome.damage, 1);
    }

    #[test]
    fn test_range_tolerance() {
        let rules = CombatRules::default();
        assert!(resolve_attack(&player_swing(1), &enemy_at(0.0, 2.5, Vec3::NEG_Z), &rules).is_some());
        assert!(resolve_attack(&player_swing(1), &enemy_at(0.0, 2.51, Vec3::NEG_Z), &rules).is_none());
    }

    #[test]
    fn test_alignment_cutoff() {
        let rules = CombatRules::default();
        // 90 degrees off the swing
        assert!(resolve_attack(&player_swing(1), &enemy_at(1.5, 0.0, Vec3::NEG_X), &rules).is_none());
        // Behind the attacker
        assert!(resolve_attack(&player_swing(1), &enemy_at(0.0, -1.0, Vec3::Z), &rules).is_none());
        // Exactly on the origin
        assert!(resolve_attack(&player_swing(1), &enemy_at(0.0, 0.0, Vec3::NEG_Z), &rules).is_some());
    }

    #[test]
    fn test_dead_and_self_ignored() {
        let rules = CombatRules::default();
        let dead = enemy_at(0.0, 1.0, Vec3::NEG_Z).with_alive(false);
        assert!(resolve_attack(&player_swing(1), &dead, &rules).is_none());

        let me = TargetSnapshot::new(PLAYER, AgentKind::Player, Vec3::ground(0.0, 1.0), Vec3::Z);
        assert!(resolve_attack(&player_swing(1), &me, &rules).is_none());
    }

    #[test]
    fn test_block_rounds_up() {
        let rules = CombatRules::default();
        let swing = AttackDescriptor::new(ENEMY, Vec3::ground(0.0, 1.0), Vec3::NEG_Z, 1.5, 3);
        let blocking = TargetSnapshot::new(PLAYER, AgentKind::Player, Vec3::ZERO, Vec3::Z).with_blocking(true);

        let outcome = resolve_attack(&swing, &blocking, &rules).unwrap();
        assert_eq!(outcome.tier, HitTier::Blocked);
        assert_eq!(outcome.damage, 2);
        assert_eq!(outcome.reaction, HitReaction::BlockHit);
    }

    #[test]
    fn test_backstab_ignores_block() {
        let rules = CombatRules::default();
        let swing = AttackDescriptor::new(ENEMY, Vec3::ground(0.0, -1.0), Vec3::Z, 1.5, 1).with_backstab(true);
        // Blocking toward +Z while struck from behind
        let blocking = TargetSnapshot::new(PLAYER, AgentKind::Player, Vec3::ZERO, Vec3::Z).with_blocking(true);

        let outcome = resolve_attack(&swing, &blocking, &rules).unwrap();
        assert_eq!(outcome.tier, HitTier::Critical);
        assert_eq!(outcome.damage, 2);
    }

    #[test]
    fn test_invulnerable_evades() {
        let rules = CombatRules::default();
        let dodging = enemy_at(0.0, 1.0, Vec3::Z).with_invulnerable(true);
        let outcome = resolve_attack(&player_swing(3), &dodging, &rules).unwrap();
        assert_eq!(outcome.tier, HitTier::Evaded);
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.reaction, HitReaction::None);
    }

    #[test]
    fn test_resolution_is_pure() {
        let rules = CombatRules::default();
        let swing = player_swing(1);
        let target = enemy_at(0.3, 1.7, Vec3::X);
        let first = resolve_attack(&swing, &target, &rules);
        for _ in 0..10 {
            assert_eq!(resolve_attack(&swing, &target, &rules), first);
        }
    }

    #[test]
    fn test_resolve_all_skips_owner_and_dead() {
        let rules = CombatRules::default();
        let targets = [
            TargetSnapshot::new(PLAYER, AgentKind::Player, Vec3::ZERO, Vec3::Z),
            enemy_at(0.0, 1.0, Vec3::NEG_Z),
            TargetSnapshot::new(AgentId::new(2, 0), AgentKind::Enemy, Vec3::ground(0.2, 1.0), Vec3::NEG_Z)
                .with_alive(false),
            TargetSnapshot::new(AgentId::new(3, 0), AgentKind::Enemy, Vec3::ground(0.0, 9.0), Vec3::NEG_Z),
        ];
        let hits = resolve_attack_all(&player_swing(1), &targets, &rules);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, ENEMY);
    }

    #[test]
    fn test_rules_validation() {
        assert!(CombatRules::default().validate().is_ok());
        let bad = CombatRules {
            block_reduction: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}

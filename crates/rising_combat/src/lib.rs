//! Rising Combat - Health, Attacks and Hit Resolution
//!
//! # Features
//!
//! - Integer health that only goes down, with an invulnerability window
//! - Attack descriptors emitted by controllers
//! - Melee combo timing
//! - Pure hit resolution with range, alignment, block and backstab rules
//!
//! # Example
//!
//! ```ignore
//! use rising_combat::prelude::*;
//!
//! let swing = AttackDescriptor::new(player, origin, facing, 2.0, 1).with_backstab(true);
//! let target = TargetSnapshot::new(enemy, AgentKind::Enemy, enemy_pos, enemy_facing);
//!
//! if let Some(hit) = resolve_attack(&swing, &target, &CombatRules::default()) {
//!     health.take_damage(hit.damage);
//! }
//! ```

pub mod attack;
pub mod damage;
pub mod health;
pub mod resolver;

pub mod prelude {
    pub use crate::attack::{AttackDescriptor, ComboConfig, ComboTracker};
    pub use crate::damage::{HitOutcome, HitReaction, HitTier};
    pub use crate::health::{DamageResult, Health, IgnoreReason};
    pub use crate::resolver::{
        resolve_attack, resolve_attack_all, CombatRules, RulesError, TargetSnapshot,
    };
}

pub use prelude::*;

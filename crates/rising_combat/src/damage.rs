//! Hit tiers and resolved hit outcomes

use rising_core::AgentId;
use rising_math::Vec3;
use serde::{Deserialize, Serialize};

/// How hard a hit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTier {
    /// Plain hit
    Base,
    /// Backstab, damage multiplied
    Critical,
    /// Absorbed by a block, damage reduced
    Blocked,
    /// Target was invulnerable, no damage
    Evaded,
}

impl Default for HitTier {
    fn default() -> Self {
        Self::Base
    }
}

/// What the target should play in response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitReaction {
    Hurt,
    BlockHit,
    None,
}

/// A hit the resolver decided should land
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub attacker: AgentId,
    pub target: AgentId,
    pub damage: i32,
    pub tier: HitTier,
    pub reaction: HitReaction,
    /// Unit XZ direction from attacker to target, for knockback and effects
    pub direction: Vec3,
}

impl HitOutcome {
    pub fn deals_damage(&self) -> bool {
        self.damage > 0
    }
}

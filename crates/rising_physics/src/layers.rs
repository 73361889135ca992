//! Collision layers and filtering

use serde::{Deserialize, Serialize};

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Static level geometry (walls, towers, houses, doors)
    pub const ENVIRONMENT: Self = Self(0);
    /// The player agent
    pub const PLAYER: Self = Self(1);
    /// Enemy agents
    pub const ENEMIES: Self = Self(2);
    /// Non-solid marker volumes such as entrances
    pub const TRIGGERS: Self = Self(3);

    /// Get the layer as a bitmask
    pub fn as_mask(&self) -> u32 {
        1 << self.0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::ENVIRONMENT
    }
}

/// Collision groups for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    /// Which groups this object belongs to (membership)
    pub memberships: u32,
    /// Which groups this object can collide with (filter)
    pub filter: u32,
}

impl CollisionGroups {
    /// Collide with everything
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Create from a single layer that collides with specific layers
    pub fn from_layer(layer: CollisionLayer, collides_with: &[CollisionLayer]) -> Self {
        let memberships = layer.as_mask();
        let filter = collides_with.iter().fold(0u32, |acc, l| acc | l.as_mask());
        Self { memberships, filter }
    }

    /// Groups of a walking agent: blocked by the level and by other agents
    pub fn mover(layer: CollisionLayer) -> Self {
        Self::from_layer(
            layer,
            &[CollisionLayer::ENVIRONMENT, CollisionLayer::PLAYER, CollisionLayer::ENEMIES],
        )
    }

    /// Groups of a sight line: blocked by the level only
    pub fn sight() -> Self {
        Self::from_layer(CollisionLayer::PLAYER, &[CollisionLayer::ENVIRONMENT])
    }

    /// Check if this filter accepts objects on a layer
    pub fn accepts(&self, layer: CollisionLayer) -> bool {
        self.filter & layer.as_mask() != 0
    }

    /// Check if two groups can collide
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mover_groups() {
        let player = CollisionGroups::mover(CollisionLayer::PLAYER);
        let enemy = CollisionGroups::mover(CollisionLayer::ENEMIES);

        assert!(player.can_collide(&enemy));
        assert!(player.accepts(CollisionLayer::ENVIRONMENT));
        assert!(!player.accepts(CollisionLayer::TRIGGERS));
    }

    #[test]
    fn test_sight_ignores_agents() {
        let sight = CollisionGroups::sight();
        assert!(sight.accepts(CollisionLayer::ENVIRONMENT));
        assert!(!sight.accepts(CollisionLayer::ENEMIES));
    }
}

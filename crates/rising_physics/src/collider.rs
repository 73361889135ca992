//! Collision volumes for level geometry and agents

use rising_core::AgentId;
use rising_math::{horizontal_distance, nearest_point_on_volume, resolve_circle_vs_volume, CircleContact, Vec3, AABB};
use serde::{Deserialize, Serialize};

use crate::layers::CollisionLayer;

/// Collision shape in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Axis-aligned box
    Box(AABB),
    /// Vertical capsule standing on `base`
    Capsule {
        base: Vec3,
        radius: f32,
        height: f32,
    },
}

impl CollisionShape {
    /// Tight axis-aligned bounds of the shape
    pub fn bounds(&self) -> AABB {
        match *self {
            Self::Box(aabb) => aabb,
            Self::Capsule { base, radius, height } => AABB::new(
                Vec3::new(base.x - radius, base.y, base.z - radius),
                Vec3::new(base.x + radius, base.y + height, base.z + radius),
            ),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Box(aabb) => aabb.min.is_finite() && aabb.max.is_finite() && aabb.is_valid(),
            Self::Capsule { base, radius, height } => {
                base.is_finite() && radius.is_finite() && height.is_finite() && *radius >= 0.0 && *height >= 0.0
            }
        }
    }

    /// Test a ground circle against the XZ footprint of the shape
    ///
    /// A capsule's footprint is a circle. Coincident centers push along +X.
    pub fn circle_contact(&self, center: Vec3, radius: f32) -> CircleContact {
        match *self {
            Self::Box(ref aabb) => resolve_circle_vs_volume(center, radius, aabb),
            Self::Capsule { base, radius: own, .. } => {
                if !center.is_finite() || !radius.is_finite() {
                    return CircleContact::NONE;
                }
                let distance = horizontal_distance(center, base);
                let combined = radius + own;
                if distance >= combined {
                    return CircleContact::NONE;
                }
                let push_direction = if distance > 1e-6 {
                    (center - base).flat() / distance
                } else {
                    Vec3::X
                };
                CircleContact {
                    colliding: true,
                    push_direction,
                    overlap: combined - distance,
                }
            }
        }
    }

    /// Closest point of the XZ footprint to `point`, at the point's height
    pub fn nearest_point(&self, point: Vec3) -> Vec3 {
        match *self {
            Self::Box(ref aabb) => nearest_point_on_volume(point, aabb),
            Self::Capsule { base, radius, .. } => {
                let offset = (point - base).flat();
                let distance = offset.length();
                if distance <= radius {
                    return point;
                }
                Vec3::new(base.x, point.y, base.z) + offset * (radius / distance)
            }
        }
    }

    /// Check if a ground point lies inside the footprint
    pub fn contains_xz(&self, point: Vec3) -> bool {
        match *self {
            Self::Box(ref aabb) => aabb.contains_xz(point),
            Self::Capsule { base, radius, .. } => horizontal_distance(point, base) < radius,
        }
    }
}

/// Who a volume belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeOwner {
    /// Level geometry, built once at load
    Static,
    /// An agent proxy, rebuilt every frame
    Agent(AgentId),
}

/// A shape tagged with solidity, layer and owner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionVolume {
    pub shape: CollisionShape,
    pub solid: bool,
    pub layer: CollisionLayer,
    pub owner: VolumeOwner,
}

impl CollisionVolume {
    /// Solid static box on the environment layer
    pub fn wall(aabb: AABB) -> Self {
        Self {
            shape: CollisionShape::Box(aabb),
            solid: true,
            layer: CollisionLayer::ENVIRONMENT,
            owner: VolumeOwner::Static,
        }
    }

    /// Non-solid static box on the trigger layer
    pub fn trigger(aabb: AABB) -> Self {
        Self {
            shape: CollisionShape::Box(aabb),
            solid: false,
            layer: CollisionLayer::TRIGGERS,
            owner: VolumeOwner::Static,
        }
    }

    /// Solid static capsule on the environment layer, such as a column
    pub fn pillar(base: Vec3, radius: f32, height: f32) -> Self {
        Self {
            shape: CollisionShape::Capsule { base, radius, height },
            solid: true,
            layer: CollisionLayer::ENVIRONMENT,
            owner: VolumeOwner::Static,
        }
    }

    /// Capsule proxy for an agent
    pub fn agent(id: AgentId, base: Vec3, radius: f32, height: f32, layer: CollisionLayer) -> Self {
        Self {
            shape: CollisionShape::Capsule { base, radius, height },
            solid: true,
            layer,
            owner: VolumeOwner::Agent(id),
        }
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn bounds(&self) -> AABB {
        self.shape.bounds()
    }

    pub fn is_static(&self) -> bool {
        self.owner == VolumeOwner::Static
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_bounds() {
        let shape = CollisionShape::Capsule {
            base: Vec3::ground(1.0, 2.0),
            radius: 0.5,
            height: 1.8,
        };
        let bounds = shape.bounds();
        assert_eq!(bounds.min, Vec3::new(0.5, 0.0, 1.5));
        assert_eq!(bounds.max, Vec3::new(1.5, 1.8, 2.5));
    }

    #[test]
    fn test_invalid_box() {
        let inverted = CollisionShape::Box(AABB::new(Vec3::ONE, Vec3::ZERO));
        assert!(!inverted.is_valid());
        let nan = CollisionShape::Box(AABB::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE));
        assert!(!nan.is_valid());
    }

    #[test]
    fn test_capsule_footprint_contact() {
        let pillar = CollisionShape::Capsule {
            base: Vec3::ground(2.0, 0.0),
            radius: 1.0,
            height: 3.0,
        };

        let contact = pillar.circle_contact(Vec3::ground(0.6, 0.0), 0.5);
        assert!(contact.colliding);
        assert_eq!(contact.push_direction, Vec3::NEG_X);
        assert!((contact.overlap - 0.1).abs() < 1e-5);

        assert!(!pillar.circle_contact(Vec3::ground(0.4, 0.0), 0.5).colliding);

        // Dead center still pushes somewhere
        let centered = pillar.circle_contact(Vec3::ground(2.0, 0.0), 0.5);
        assert_eq!(centered.push_direction, Vec3::X);
        assert!((centered.overlap - 1.5).abs() < 1e-5);

        assert!(pillar.contains_xz(Vec3::ground(2.5, 0.5)));
        assert!(!pillar.contains_xz(Vec3::ground(3.0, 1.0)));
        assert_eq!(pillar.nearest_point(Vec3::ground(0.0, 0.0)), Vec3::ground(1.0, 0.0));
    }

    #[test]
    fn test_builders() {
        let door = CollisionVolume::wall(AABB::new(Vec3::ZERO, Vec3::ONE)).with_solid(false);
        assert!(!door.solid);
        assert!(door.is_static());

        let agent = CollisionVolume::agent(AgentId::new(1, 0), Vec3::ZERO, 0.5, 1.8, CollisionLayer::ENEMIES);
        assert_eq!(agent.owner, VolumeOwner::Agent(AgentId::new(1, 0)));
    }
}

//! Axis-separated kinematic movement
//!
//! Agents are ground circles. A displacement is applied one axis at a time
//! (X, then Z) so that a diagonal push into a wall keeps the component that
//! runs along it. Long displacements are cut into sub-steps no longer than
//! a fraction of the radius, which keeps fast lunges from tunneling through
//! thin geometry.

use rising_core::AgentId;
use rising_math::{horizontal_distance, Vec3};
use serde::{Deserialize, Serialize};

use crate::collider::VolumeOwner;
use crate::layers::{CollisionGroups, CollisionLayer};
use crate::query::{OverlapHit, QueryFilter};
use crate::world::CollisionWorld;

/// Outcome of [`move_and_slide`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub position: Vec3,
    pub blocked_x: bool,
    pub blocked_z: bool,
}

impl MoveResult {
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_z
    }
}

/// Outcome of [`depenetrate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Depenetration {
    pub position: Vec3,
    /// True when the circle was moved
    pub corrected: bool,
    /// True when it is still overlapping after every pass
    pub still_embedded: bool,
}

fn mover_filter(world: &CollisionWorld, self_id: AgentId) -> QueryFilter {
    let layer = world
        .agent(self_id)
        .map(|proxy| proxy.layer)
        .unwrap_or(CollisionLayer::PLAYER);
    QueryFilter::new()
        .with_groups(CollisionGroups::mover(layer))
        .excluding(self_id)
}

/// Check whether stepping from `from` to `to` is allowed
///
/// Static overlap blocks unless the step reduces an existing penetration.
/// Agent overlap blocks only while the step closes the gap to that agent,
/// so agents that already overlap can always move apart.
fn step_allowed(world: &CollisionWorld, from: Vec3, to: Vec3, radius: f32, filter: &QueryFilter) -> bool {
    let hits = world.overlap_circle(to, radius, filter);
    if hits.is_empty() {
        return true;
    }

    let static_depth = |hits: &[OverlapHit]| -> f32 {
        hits.iter()
            .filter(|hit| hit.owner == VolumeOwner::Static)
            .map(|hit| hit.overlap)
            .sum()
    };

    let depth_after = static_depth(&hits);
    if depth_after > 0.0 {
        let before = world.overlap_circle(from, radius, &filter.statics_only());
        if depth_after >= static_depth(&before) - 1e-6 {
            return false;
        }
    }

    hits.iter().all(|hit| match hit.owner {
        VolumeOwner::Static => true,
        VolumeOwner::Agent(_) => {
            horizontal_distance(to, hit.point) >= horizontal_distance(from, hit.point)
        }
    })
}

/// Move a ground circle by `displacement`, sliding along whatever blocks it
///
/// The vertical component of the displacement is ignored.
pub fn move_and_slide(
    position: Vec3,
    radius: f32,
    displacement: Vec3,
    world: &CollisionWorld,
    self_id: AgentId,
) -> MoveResult {
    let displacement = displacement.flat();
    if !displacement.is_finite() || !position.is_finite() || displacement == Vec3::ZERO {
        return MoveResult {
            position,
            blocked_x: false,
            blocked_z: false,
        };
    }

    let config = world.config();
    let max_step = (radius * config.max_step_fraction).max(1e-3);
    let length = displacement.length();
    let steps = ((length / max_step).ceil() as u32).clamp(1, config.max_substeps);
    let step = displacement / steps as f32;
    let filter = mover_filter(world, self_id);

    let mut current = position;
    let mut blocked_x = false;
    let mut blocked_z = false;

    for _ in 0..steps {
        if !blocked_x && step.x != 0.0 {
            let candidate = Vec3::new(current.x + step.x, current.y, current.z);
            if step_allowed(world, current, candidate, radius, &filter) {
                current = candidate;
            } else {
                blocked_x = true;
            }
        }
        if !blocked_z && step.z != 0.0 {
            let candidate = Vec3::new(current.x, current.y, current.z + step.z);
            if step_allowed(world, current, candidate, radius, &filter) {
                current = candidate;
            } else {
                blocked_z = true;
            }
        }
        if blocked_x && blocked_z {
            break;
        }
    }

    MoveResult {
        position: current,
        blocked_x,
        blocked_z,
    }
}

/// Push an embedded circle out of solid level geometry
pub fn depenetrate(position: Vec3, radius: f32, world: &CollisionWorld) -> Depenetration {
    let filter = QueryFilter::new().statics_only();
    let skin = world.config().skin;
    let mut current = position;
    let mut corrected = false;

    for _ in 0..world.config().depenetration_iterations.max(1) {
        let hits = world.overlap_circle(current, radius, &filter);
        let Some(deepest) = hits
            .iter()
            .max_by(|a, b| a.overlap.total_cmp(&b.overlap))
        else {
            return Depenetration {
                position: current,
                corrected,
                still_embedded: false,
            };
        };
        current += deepest.push_direction * (deepest.overlap + skin);
        corrected = true;
    }

    let still_embedded = world.overlaps_static(current, radius);
    if still_embedded {
        log::debug!("Circle at {:?} still embedded after depenetration", current);
    }
    Depenetration {
        position: current,
        corrected,
        still_embedded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::CollisionVolume;
    use crate::config::LocomotionConfig;
    use crate::world::AgentProxy;
    use approx::assert_relative_eq;
    use rising_math::AABB;

    const ME: AgentId = AgentId::new(0, 0);
    const OTHER: AgentId = AgentId::new(1, 0);

    fn world_with(walls: Vec<AABB>) -> CollisionWorld {
        let statics = walls.into_iter().map(CollisionVolume::wall).collect();
        CollisionWorld::new(statics, LocomotionConfig::default()).unwrap()
    }

    #[test]
    fn test_free_move() {
        let world = world_with(vec![]);
        let result = move_and_slide(Vec3::ZERO, 0.5, Vec3::ground(1.0, -2.0), &world, ME);
        assert_relative_eq!(result.position.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(result.position.z, -2.0, epsilon = 1e-5);
        assert!(!result.blocked());
    }

    #[test]
    fn test_wall_slide_keeps_parallel_component() {
        // Wall face at x = 0.5, circle touching it
        let world = world_with(vec![AABB::new(Vec3::new(0.5, 0.0, -5.0), Vec3::new(1.5, 2.5, 5.0))]);
        let result = move_and_slide(Vec3::ZERO, 0.5, Vec3::ground(0.2, 0.2), &world, ME);

        assert!(result.blocked_x);
        assert!(!result.blocked_z);
        assert_eq!(result.position.x, 0.0);
        assert_relative_eq!(result.position.z, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_no_tunneling_through_thin_wall() {
        let world = world_with(vec![AABB::new(Vec3::new(2.0, 0.0, -5.0), Vec3::new(2.05, 2.5, 5.0))]);
        let result = move_and_slide(Vec3::ZERO, 0.4, Vec3::ground(10.0, 0.0), &world, ME);

        assert!(result.blocked_x);
        assert!(result.position.x + 0.4 <= 2.0 + 1e-4);
    }

    #[test]
    fn test_static_capsule_blocks_and_pushes_out() {
        let pillar = CollisionVolume::pillar(Vec3::ground(2.0, 0.0), 1.0, 3.0);
        let world = CollisionWorld::new(vec![pillar], LocomotionConfig::default()).unwrap();

        let result = move_and_slide(Vec3::ZERO, 0.5, Vec3::ground(4.0, 0.0), &world, ME);
        assert!(result.blocked_x);
        assert!(result.position.x <= 0.5 + 1e-4);
        assert!(!world.overlaps_static(result.position, 0.5));

        let pushed = depenetrate(Vec3::ground(1.8, 0.0), 0.5, &world);
        assert!(pushed.corrected);
        assert!(!pushed.still_embedded);
        assert!(pushed.position.x < 0.5);
        assert_relative_eq!(pushed.position.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_agents_block_approach_but_not_separation() {
        let mut world = world_with(vec![]);
        world.set_agents([
            AgentProxy::new(ME, Vec3::ZERO, 0.5, CollisionLayer::ENEMIES),
            AgentProxy::new(OTHER, Vec3::ground(0.1, 0.0), 0.5, CollisionLayer::ENEMIES),
        ]);

        let toward = move_and_slide(Vec3::ZERO, 0.5, Vec3::ground(0.05, 0.0), &world, ME);
        assert!(toward.blocked_x);
        assert_eq!(toward.position, Vec3::ZERO);

        let away = move_and_slide(Vec3::ZERO, 0.5, Vec3::ground(-0.05, 0.0), &world, ME);
        assert!(!away.blocked_x);
        assert_relative_eq!(away.position.x, -0.05, epsilon = 1e-5);
    }

    #[test]
    fn test_nan_displacement_is_ignored() {
        let world = world_with(vec![]);
        let result = move_and_slide(Vec3::ZERO, 0.5, Vec3::ground(f32::NAN, 1.0), &world, ME);
        assert_eq!(result.position, Vec3::ZERO);
    }

    #[test]
    fn test_depenetrate_pushes_out() {
        let world = world_with(vec![AABB::new(Vec3::new(0.3, 0.0, -5.0), Vec3::new(1.5, 2.5, 5.0))]);
        let result = depenetrate(Vec3::ZERO, 0.5, &world);

        assert!(result.corrected);
        assert!(!result.still_embedded);
        assert!(result.position.x <= -0.2);
        assert!(!world.overlaps_static(result.position, 0.5));
    }

    #[test]
    fn test_depenetrate_center_inside() {
        let world = world_with(vec![AABB::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.5, 1.0))]);
        let result = depenetrate(Vec3::ground(0.0, 0.0), 0.5, &world);
        // Exact tie between faces resolves to +X
        assert!(result.position.x >= 1.5);
        assert!(!result.still_embedded);
    }
}

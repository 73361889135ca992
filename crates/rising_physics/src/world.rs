//! Collision world - static level geometry plus per-frame agent proxies

use rising_core::AgentId;
use rising_math::{eye_point, line_of_sight, Vec3, AABB};

use crate::collider::CollisionVolume;
use crate::config::LocomotionConfig;
use crate::error::{PhysicsError, Result};
use crate::layers::{CollisionGroups, CollisionLayer};

/// Ground circle standing in for an agent during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentProxy {
    pub id: AgentId,
    pub position: Vec3,
    pub radius: f32,
    pub layer: CollisionLayer,
}

impl AgentProxy {
    pub fn new(id: AgentId, position: Vec3, radius: f32, layer: CollisionLayer) -> Self {
        Self { id, position, radius, layer }
    }

    /// Capsule volume of this proxy
    pub fn to_volume(&self, height: f32) -> CollisionVolume {
        CollisionVolume::agent(self.id, self.position, self.radius, height, self.layer)
    }
}

/// Static volumes never change after construction. Agent proxies are
/// replaced wholesale each frame through [`CollisionWorld::set_agents`].
pub struct CollisionWorld {
    config: LocomotionConfig,
    statics: Vec<CollisionVolume>,
    agents: Vec<AgentProxy>,
}

impl CollisionWorld {
    /// Create a world from level geometry, rejecting malformed volumes
    pub fn new(statics: Vec<CollisionVolume>, config: LocomotionConfig) -> Result<Self> {
        config.validate()?;
        for (index, volume) in statics.iter().enumerate() {
            if !volume.shape.is_valid() {
                return Err(PhysicsError::InvalidVolume(format!(
                    "static volume {index} has bounds {:?}",
                    volume.bounds()
                )));
            }
        }

        log::debug!("Collision world built with {} static volumes", statics.len());
        Ok(Self {
            config,
            statics,
            agents: Vec::new(),
        })
    }

    /// World without level geometry
    pub fn empty() -> Self {
        Self {
            config: LocomotionConfig::default(),
            statics: Vec::new(),
            agents: Vec::new(),
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn static_volumes(&self) -> &[CollisionVolume] {
        &self.statics
    }

    /// Solid static volumes whose layer the groups accept
    pub fn solid_statics(&self, groups: CollisionGroups) -> impl Iterator<Item = &CollisionVolume> + '_ {
        self.statics
            .iter()
            .filter(move |volume| volume.solid && groups.accepts(volume.layer))
    }

    /// Replace the agent proxies for this frame
    pub fn set_agents(&mut self, agents: impl IntoIterator<Item = AgentProxy>) {
        self.agents.clear();
        self.agents.extend(agents);
    }

    pub fn agents(&self) -> &[AgentProxy] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Result<&AgentProxy> {
        self.agents
            .iter()
            .find(|proxy| proxy.id == id)
            .ok_or(PhysicsError::AgentNotInWorld(id))
    }

    /// Move an agent's proxy after it has moved, so later movers see it
    pub fn update_agent(&mut self, id: AgentId, position: Vec3) -> Result<()> {
        let proxy = self
            .agents
            .iter_mut()
            .find(|proxy| proxy.id == id)
            .ok_or(PhysicsError::AgentNotInWorld(id))?;
        proxy.position = position;
        Ok(())
    }

    /// Drop an agent's proxy, e.g. when it dies mid-frame
    pub fn remove_agent(&mut self, id: AgentId) -> bool {
        let before = self.agents.len();
        self.agents.retain(|proxy| proxy.id != id);
        self.agents.len() != before
    }

    /// Check if a ground circle overlaps solid level geometry
    pub fn overlaps_static(&self, center: Vec3, radius: f32) -> bool {
        self.solid_statics(CollisionGroups::ALL)
            .any(|volume| volume.shape.circle_contact(center, radius).colliding)
    }

    /// Check if a ground position has its center inside solid geometry
    pub fn is_embedded(&self, center: Vec3) -> bool {
        self.solid_statics(CollisionGroups::ALL)
            .any(|volume| volume.shape.contains_xz(center))
    }

    /// Sight line between two ground positions, measured at eye height
    ///
    /// Capsules block sight with their bounding box.
    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        let blockers: Vec<AABB> = self
            .solid_statics(CollisionGroups::sight())
            .map(CollisionVolume::bounds)
            .collect();
        line_of_sight(eye_point(from), eye_point(to), &blockers)
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_wall() -> CollisionWorld {
        let wall = CollisionVolume::wall(AABB::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(2.0, 2.5, 1.0)));
        let gate = CollisionVolume::trigger(AABB::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(-1.0, 2.5, 1.0)));
        CollisionWorld::new(vec![wall, gate], LocomotionConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_volume() {
        let bad = CollisionVolume::wall(AABB::new(Vec3::ONE, Vec3::ZERO));
        assert!(CollisionWorld::new(vec![bad], LocomotionConfig::default()).is_err());
    }

    #[test]
    fn test_overlaps_static_only_solid() {
        let world = world_with_wall();
        assert!(world.overlaps_static(Vec3::ground(0.8, 0.0), 0.5));
        // Trigger volumes never block
        assert!(!world.overlaps_static(Vec3::ground(-0.8, 0.0), 0.5));
        assert!(!world.overlaps_static(Vec3::ground(0.0, 3.0), 0.5));
    }

    #[test]
    fn test_line_of_sight() {
        let world = world_with_wall();
        assert!(!world.line_of_sight(Vec3::ZERO, Vec3::ground(4.0, 0.0)));
        assert!(world.line_of_sight(Vec3::ZERO, Vec3::ground(-4.0, 0.0)));
    }

    #[test]
    fn test_static_capsule_blocks() {
        let pillar = CollisionVolume::pillar(Vec3::ground(2.0, 0.0), 1.0, 3.0);
        let world = CollisionWorld::new(vec![pillar], LocomotionConfig::default()).unwrap();

        assert!(world.overlaps_static(Vec3::ground(2.0, 0.0), 0.5));
        assert!(world.overlaps_static(Vec3::ground(0.6, 0.0), 0.5));
        assert!(!world.overlaps_static(Vec3::ground(0.4, 0.0), 0.5));
        assert!(world.is_embedded(Vec3::ground(2.2, 0.2)));
        assert!(!world.line_of_sight(Vec3::ZERO, Vec3::ground(4.0, 0.0)));
        assert!(world.line_of_sight(Vec3::ground(0.0, 2.0), Vec3::ground(4.0, 2.0)));
    }

    #[test]
    fn test_agent_proxies() {
        let mut world = CollisionWorld::empty();
        let id = AgentId::new(0, 0);
        world.set_agents([AgentProxy::new(id, Vec3::ZERO, 0.5, CollisionLayer::PLAYER)]);
        assert!(world.agent(id).is_ok());

        world.update_agent(id, Vec3::ground(1.0, 1.0)).unwrap();
        assert_eq!(world.agent(id).unwrap().position, Vec3::ground(1.0, 1.0));

        assert!(world.remove_agent(id));
        assert!(!world.remove_agent(id));
        assert!(world.agent(id).is_err());
        assert!(world.update_agent(id, Vec3::ZERO).is_err());
    }
}

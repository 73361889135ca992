//! Overlap queries against the collision world

use rising_core::AgentId;
use rising_math::Vec3;

use crate::collider::VolumeOwner;
use crate::layers::CollisionGroups;
use crate::world::CollisionWorld;

/// One volume overlapping the queried circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    /// Volume that was hit
    pub owner: VolumeOwner,
    /// Closest point of a static footprint, or the center of an agent
    pub point: Vec3,
    /// Unit XZ direction that separates the circle from the volume
    pub push_direction: Vec3,
    /// Penetration depth along `push_direction`
    pub overlap: f32,
}

/// Options for overlap queries
#[derive(Debug, Clone, Copy)]
pub struct QueryFilter {
    /// Only report solid volumes
    pub solid_only: bool,
    /// Layers the query accepts
    pub groups: CollisionGroups,
    /// Agent to ignore, usually the querying agent itself
    pub exclude: Option<AgentId>,
    pub include_static: bool,
    pub include_agents: bool,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            solid_only: true,
            groups: CollisionGroups::ALL,
            exclude: None,
            include_static: true,
            include_agents: true,
        }
    }
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set collision filter
    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.groups = groups;
        self
    }

    /// Skip one agent
    pub fn excluding(mut self, id: AgentId) -> Self {
        self.exclude = Some(id);
        self
    }

    /// Report non-solid volumes too
    pub fn with_non_solid(mut self) -> Self {
        self.solid_only = false;
        self
    }

    pub fn statics_only(mut self) -> Self {
        self.include_agents = false;
        self
    }

    pub fn agents_only(mut self) -> Self {
        self.include_static = false;
        self
    }
}

impl CollisionWorld {
    /// Find every volume a ground circle overlaps
    ///
    /// Static hits come first in level order, then agents in proxy order.
    pub fn overlap_circle(&self, center: Vec3, radius: f32, filter: &QueryFilter) -> Vec<OverlapHit> {
        let mut hits = Vec::new();

        if filter.include_static {
            for volume in self.static_volumes() {
                if filter.solid_only && !volume.solid {
                    continue;
                }
                if !filter.groups.accepts(volume.layer) {
                    continue;
                }
                let contact = volume.shape.circle_contact(center, radius);
                if contact.colliding {
                    hits.push(OverlapHit {
                        owner: volume.owner,
                        point: volume.shape.nearest_point(center),
                        push_direction: contact.push_direction,
                        overlap: contact.overlap,
                    });
                }
            }
        }

        if filter.include_agents {
            let height = self.config().agent_height;
            for proxy in self.agents() {
                if filter.exclude == Some(proxy.id) || !filter.groups.accepts(proxy.layer) {
                    continue;
                }
                let contact = proxy.to_volume(height).shape.circle_contact(center, radius);
                if contact.colliding {
                    hits.push(OverlapHit {
                        owner: VolumeOwner::Agent(proxy.id),
                        point: proxy.position,
                        push_direction: contact.push_direction,
                        overlap: contact.overlap,
                    });
                }
            }
        }

        hits
    }
}

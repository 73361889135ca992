//! Agents shared by the player and enemies

use rising_ai::EnemyBrain;
use rising_combat::{Health, TargetSnapshot};
use rising_core::{AgentId, AgentKind};
use rising_math::{turn_towards, Vec3};
use rising_physics::{AgentProxy, CollisionLayer};
use serde::{Deserialize, Serialize};

/// Id reserved for the player; enemy ids come from the arena and never reach it
pub const PLAYER_ID: AgentId = AgentId::new(u32::MAX, 0);

/// Body of a player or enemy
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    /// Ground position, Y stays fixed
    pub position: Vec3,
    /// Unit XZ forward, used for both movement and combat
    facing: Vec3,
    pub radius: f32,
    /// Units per second
    pub speed: f32,
    pub attack_range: f32,
    pub health: Health,
}

impl Agent {
    pub fn new(id: AgentId, kind: AgentKind, position: Vec3, max_health: i32) -> Self {
        Self {
            id,
            kind,
            position,
            facing: Vec3::Z,
            radius: 0.5,
            speed: 0.0,
            attack_range: 0.0,
            health: Health::new(max_health),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.01);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_attack_range(mut self, range: f32) -> Self {
        self.attack_range = range;
        self
    }

    pub fn with_facing(mut self, facing: Vec3) -> Self {
        self.set_facing(facing);
        self
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Face a direction; zero and non-finite directions are ignored
    pub fn set_facing(&mut self, direction: Vec3) {
        let direction = direction.flat().normalize_or_zero();
        if direction != Vec3::ZERO {
            self.facing = direction;
        }
    }

    /// Turn toward a direction by at most `max_angle` radians
    pub fn turn_towards(&mut self, direction: Vec3, max_angle: f32) {
        self.set_facing(turn_towards(self.facing, direction, max_angle));
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn layer(&self) -> CollisionLayer {
        match self.kind {
            AgentKind::Player => CollisionLayer::PLAYER,
            AgentKind::Enemy => CollisionLayer::ENEMIES,
        }
    }

    /// Collision proxy at the current position
    pub fn proxy(&self) -> AgentProxy {
        AgentProxy::new(self.id, self.position, self.radius, self.layer())
    }
}

/// Frozen view of an agent at frame start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Vec3,
    pub facing: Vec3,
    pub radius: f32,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub blocking: bool,
    pub invulnerable: bool,
}

impl AgentSnapshot {
    pub fn capture(agent: &Agent, blocking: bool) -> Self {
        Self {
            id: agent.id,
            kind: agent.kind,
            position: agent.position,
            facing: agent.facing,
            radius: agent.radius,
            health: agent.health.current(),
            max_health: agent.health.max(),
            alive: agent.is_alive(),
            blocking,
            invulnerable: agent.health.is_invulnerable(),
        }
    }

    /// View handed to the combat resolver
    pub fn target(&self) -> TargetSnapshot {
        TargetSnapshot::new(self.id, self.kind, self.position, self.facing)
            .with_alive(self.alive)
            .with_blocking(self.blocking)
            .with_invulnerable(self.invulnerable)
    }
}

/// An enemy in the arena
pub struct EnemyAgent {
    pub agent: Agent,
    /// Archetype tag actually in use
    pub tag: String,
    pub brain: EnemyBrain,
}

impl EnemyAgent {
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::capture(&self.agent, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_is_not_null() {
        assert!(!PLAYER_ID.is_null());
        assert_eq!(PLAYER_ID.index(), u32::MAX);
    }

    #[test]
    fn test_facing_stays_unit() {
        let mut agent = Agent::new(AgentId::new(0, 0), AgentKind::Enemy, Vec3::ZERO, 3);
        agent.set_facing(Vec3::new(3.0, 2.0, 0.0));
        assert_eq!(agent.facing(), Vec3::X);

        agent.set_facing(Vec3::ZERO);
        agent.set_facing(Vec3::new(f32::NAN, 0.0, 1.0));
        assert_eq!(agent.facing(), Vec3::X);

        agent.turn_towards(Vec3::NEG_X, 0.1);
        assert!((agent.facing().length() - 1.0).abs() < 1e-5);
        assert!(agent.facing().x > 0.99);
    }

    #[test]
    fn test_snapshot_target() {
        let mut agent = Agent::new(PLAYER_ID, AgentKind::Player, Vec3::ground(1.0, 2.0), 10)
            .with_facing(Vec3::NEG_Z);
        agent.health.grant_invulnerability(0.3);

        let snapshot = AgentSnapshot::capture(&agent, true);
        let target = snapshot.target();
        assert_eq!(target.id, PLAYER_ID);
        assert_eq!(target.facing, Vec3::NEG_Z);
        assert!(target.blocking);
        assert!(target.invulnerable);
        assert_eq!(agent.proxy().layer, CollisionLayer::PLAYER);
    }
}

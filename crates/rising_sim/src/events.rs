//! Events emitted by a simulation frame

use rising_combat::HitTier;
use rising_core::{AgentId, AgentKind};
use rising_math::Vec3;
use serde::{Deserialize, Serialize};

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    Spawned {
        agent: AgentId,
        kind: AgentKind,
        /// Archetype tag actually used, None for the player
        archetype: Option<String>,
        position: Vec3,
    },
    /// A swing or enemy attack began
    AttackStarted { agent: AgentId, clip: String },
    /// Damage landed at full strength or as a critical
    Hit {
        attacker: AgentId,
        target: AgentId,
        damage: i32,
        tier: HitTier,
        remaining: i32,
    },
    /// Damage landed on a block
    Blocked {
        attacker: AgentId,
        target: AgentId,
        damage: i32,
        remaining: i32,
    },
    /// The target was invulnerable
    Evaded { attacker: AgentId, target: AgentId },
    Died { agent: AgentId, kind: AgentKind },
    /// A corpse left the arena
    Removed { agent: AgentId },
    StateChanged {
        agent: AgentId,
        from: String,
        to: String,
    },
}

impl SimEvent {
    /// Agent the event is mainly about
    pub fn agent(&self) -> AgentId {
        match self {
            Self::Spawned { agent, .. }
            | Self::AttackStarted { agent, .. }
            | Self::Died { agent, .. }
            | Self::Removed { agent }
            | Self::StateChanged { agent, .. } => *agent,
            Self::Hit { target, .. } | Self::Blocked { target, .. } | Self::Evaded { target, .. } => {
                *target
            }
        }
    }

    pub fn is_damage(&self) -> bool {
        matches!(self, Self::Hit { .. } | Self::Blocked { .. })
    }
}

/// Result of one [`crate::Simulation::tick`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Frame counter after this tick
    pub frame: u64,
    /// Delta actually simulated after clamping, zero if the tick was skipped
    pub delta: f32,
    pub events: Vec<SimEvent>,
}

impl FrameReport {
    pub fn skipped(&self) -> bool {
        self.delta == 0.0
    }

    /// State changes of one agent as `(from, to)` names
    pub fn transitions_of(&self, agent: AgentId) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SimEvent::StateChanged { agent: a, from, to } if *a == agent => {
                    Some((from.as_str(), to.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = SimEvent::Hit {
            attacker: AgentId::new(0, 0),
            target: AgentId::new(1, 0),
            damage: 2,
            tier: HitTier::Critical,
            remaining: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "hit");
        assert_eq!(json["tier"], "Critical");
        assert_eq!(event.agent(), AgentId::new(1, 0));
        assert!(event.is_damage());
    }

    #[test]
    fn test_transitions_of() {
        let agent = AgentId::new(2, 0);
        let report = FrameReport {
            frame: 1,
            delta: 0.016,
            events: vec![
                SimEvent::StateChanged {
                    agent,
                    from: "patrol".into(),
                    to: "chase".into(),
                },
                SimEvent::Removed { agent: AgentId::new(5, 0) },
            ],
        };
        assert_eq!(report.transitions_of(agent), vec![("patrol", "chase")]);
        assert!(!report.skipped());
    }
}

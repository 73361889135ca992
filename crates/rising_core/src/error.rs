//! Recoverable simulation errors
//!
//! None of these stop the simulation. Each one is handled where it occurs
//! (default archetype or clip, deterministic push direction, no-op on a
//! stale reference) and then reported once through [`crate::Diagnostics`].

use core::fmt;
use thiserror::Error;

use crate::id::AgentId;

/// Kind of external resource a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Archetype,
    AnimationClip,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archetype => write!(f, "archetype"),
            Self::AnimationClip => write!(f, "animation clip"),
        }
    }
}

/// Simulation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Unknown archetype tag or animation clip
    #[error("Missing {kind} '{name}', substituted '{fallback}'")]
    MissingResource {
        kind: ResourceKind,
        name: String,
        fallback: String,
    },

    /// Degenerate geometry such as an agent centered inside a wall
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An agent id that no longer refers to a live agent
    #[error("Stale agent reference: {0}")]
    StaleReference(AgentId),
}

impl SimError {
    /// Key used to deduplicate reports of the same failure
    pub fn report_key(&self) -> String {
        match self {
            Self::MissingResource { kind, name, .. } => format!("missing:{kind}:{name}"),
            Self::InvalidGeometry(what) => format!("geometry:{what}"),
            Self::StaleReference(id) => format!("stale:{id}"),
        }
    }
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::MissingResource {
            kind: ResourceKind::Archetype,
            name: "dragon".into(),
            fallback: "minion".into(),
        };
        assert_eq!(err.to_string(), "Missing archetype 'dragon', substituted 'minion'");

        let err = SimError::StaleReference(AgentId::new(4, 2));
        assert_eq!(err.to_string(), "Stale agent reference: 4v2");
    }

    #[test]
    fn test_report_key_ignores_fallback() {
        let a = SimError::MissingResource {
            kind: ResourceKind::AnimationClip,
            name: "hurt".into(),
            fallback: "idle".into(),
        };
        let b = SimError::MissingResource {
            kind: ResourceKind::AnimationClip,
            name: "hurt".into(),
            fallback: "other".into(),
        };
        assert_eq!(a.report_key(), b.report_key());
    }
}

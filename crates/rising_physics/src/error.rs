//! Error types for the collision system

use rising_core::AgentId;
use thiserror::Error;

/// Collision system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A static volume with NaN or inverted bounds
    #[error("Invalid collision volume: {0}")]
    InvalidVolume(String),

    /// Invalid configuration
    #[error("Invalid locomotion configuration: {0}")]
    InvalidConfig(String),

    /// Agent has no proxy in the collision world this frame
    #[error("Agent has no collision proxy: {0}")]
    AgentNotInWorld(AgentId),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;

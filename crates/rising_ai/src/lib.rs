//! Rising AI - Enemy Behavior
//!
//! This crate decides what enemies want to do each frame.
//!
//! # Features
//!
//! - Finite State Machine with priorities, global and terminal states
//! - Data-driven archetypes (warrior, mage, rogue, minion)
//! - Player detection with hysteresis
//! - Steering: seek, arrive, separation, wander
//!
//! # Example
//!
//! ```ignore
//! use rising_ai::prelude::*;
//!
//! let mut brain = EnemyBrain::new(Archetype::warrior(), EnemyAiConfig::default(), anchor, &mut rng);
//! let output = brain.update(&frame, 1.0 / 60.0, &mut rng);
//! ```

pub mod archetype;
pub mod enemy;
pub mod perception;
pub mod state_machine;
pub mod steering;

pub mod prelude {
    pub use crate::archetype::{Archetype, ArchetypeTable, DEFAULT_ARCHETYPE};
    pub use crate::enemy::{BrainContext, BrainOutput, EnemyAiConfig, EnemyBrain, EnemyFrame, EnemyState};
    pub use crate::perception::{DetectionConfig, Perception};
    pub use crate::state_machine::{State, StateChange, StateMachine, Transition};
    pub use crate::steering::{arrive, pick_wander_target, sample_interval, seek, separation, SteeringOutput};
}

pub use prelude::*;

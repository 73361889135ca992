//! Rising Sim - Frame Driver
//!
//! Ties the player controller, enemy brains, combat resolution and
//! collision together into one deterministic per-frame tick.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   InputSnapshot   ┌─────────────────────────────┐
//! │     Host     │ ────────────────▶ │         Simulation          │
//! │ (input, UI,  │                   │  player ─▶ locomotion ─┐    │
//! │  animation)  │ ◀──────────────── │  enemies ─▶ brains ────┤    │
//! └──────────────┘  SimEvent, traits │  combat resolver ◀─────┘    │
//!                                    └─────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rising_sim::prelude::*;
//!
//! let level = GridLevel::default_courtyard();
//! let mut sim = Simulation::new(SimConfig::load_or_default(), &level)?;
//! let report = sim.tick(1.0 / 60.0, &InputSnapshot::moving(0.0, -1.0));
//! ```

pub mod agent;
pub mod collab;
pub mod config;
pub mod driver;
pub mod events;
pub mod player;

pub mod prelude {
    pub use crate::agent::{Agent, AgentSnapshot, EnemyAgent, PLAYER_ID};
    pub use crate::collab::{
        AnimationDriver, AnimationRecorder, Headless, HealthObserver, HealthRecorder, InputSnapshot,
        LevelSource, OpenField, PlayOptions, PlayRecord, FALLBACK_CLIP,
    };
    pub use crate::config::{ConfigError, SimConfig};
    pub use crate::driver::Simulation;
    pub use crate::events::{FrameReport, SimEvent};
    pub use crate::player::{PlayerConfig, PlayerController, PlayerOutput, PlayerState};
    pub use rising_level::GridLevel;
}

pub use prelude::*;

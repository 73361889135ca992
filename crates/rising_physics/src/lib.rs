//! Rising Physics - Kinematic Collision
//!
//! Agents in the arena never need rigid-body dynamics. They walk, lunge and
//! dodge on a flat ground plane and must not pass through walls or each
//! other. This crate provides just that:
//!
//! - Static collision volumes built once from the level
//! - Per-frame agent proxies (ground circles / capsules)
//! - Collision layers for solid filtering
//! - Overlap and line-of-sight queries
//! - Axis-separated, sub-stepped `move_and_slide` and `depenetrate`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              CollisionWorld               │
//! │  ┌──────────────┐  ┌──────────────────┐  │
//! │  │Static volumes│  │ Agent proxies    │  │
//! │  │ (immutable)  │  │ (set per frame)  │  │
//! │  └──────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────┘
//!            │                    │
//!            ▼                    ▼
//!    overlap / sight queries   move_and_slide
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rising_physics::prelude::*;
//!
//! let world = CollisionWorld::new(level_volumes, LocomotionConfig::default())?;
//! let result = move_and_slide(position, 0.5, velocity * dt, &world, agent_id);
//! ```

pub mod collider;
pub mod config;
pub mod error;
pub mod layers;
pub mod locomotion;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::collider::{CollisionShape, CollisionVolume, VolumeOwner};
    pub use crate::config::LocomotionConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::layers::{CollisionGroups, CollisionLayer};
    pub use crate::locomotion::{depenetrate, move_and_slide, Depenetration, MoveResult};
    pub use crate::query::{OverlapHit, QueryFilter};
    pub use crate::world::{AgentProxy, CollisionWorld};
}

pub use prelude::*;

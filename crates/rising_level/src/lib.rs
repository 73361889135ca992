//! Rising Level - Arena Layouts
//!
//! This crate turns a tile grid into static collision geometry and spawn
//! points.
//!
//! # Features
//!
//! - Typed cells (walls, towers, houses, doors, entrances, spawns)
//! - ASCII and numeric layout parsing
//! - Rasterization into [`rising_physics::CollisionVolume`]s
//! - A built-in courtyard
//!
//! # Example
//!
//! ```ignore
//! use rising_level::prelude::*;
//!
//! let level = GridLevel::from_ascii(DEFAULT_COURTYARD, DEFAULT_CELL_SIZE)?;
//! let volumes = level.static_volumes();
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod layout;

pub mod prelude {
    pub use crate::cell::CellType;
    pub use crate::error::{LevelError, Result};
    pub use crate::grid::{GridLevel, DEFAULT_CELL_SIZE};
    pub use crate::layout::DEFAULT_COURTYARD;
}

pub use prelude::*;

//! # rising_core - Rising Arena Core
//!
//! Foundational primitives shared by every simulation crate:
//! - **Agent ids**: generational identifiers that detect stale references
//! - **Arena**: slot storage for live agents with deferred removal
//! - **Errors**: the recoverable error taxonomy of the simulation
//! - **Diagnostics**: one-time reporting of self-healed failures
//!
//! Nothing in this crate is fatal. Every error is something the simulation
//! recovers from while it keeps ticking.

pub mod arena;
pub mod diagnostics;
pub mod error;
pub mod id;

pub use arena::*;
pub use diagnostics::*;
pub use error::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::AgentArena;
    pub use crate::diagnostics::Diagnostics;
    pub use crate::error::{ResourceKind, SimError};
    pub use crate::id::{AgentId, AgentKind};
}

//! Agent identifiers with generation counters

use core::fmt;
use serde::{Deserialize, Serialize};

/// A unique agent identifier with a generation counter for safe slot reuse
///
/// A removed agent's slot can be handed out again, but with a bumped
/// generation, so an id captured before the removal never resolves to the
/// newcomer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId {
    /// Lower 32 bits: index, Upper 32 bits: generation
    bits: u64,
}

impl AgentId {
    /// Create a new ID from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// Create a null/invalid ID
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    /// Check if this ID is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    /// Get the index portion
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    /// Get the generation portion
    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }

    /// Get the raw bits
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.bits
    }

    /// Create from raw bits
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "AgentId(null)")
        } else {
            write!(f, "AgentId({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

/// Which side an agent fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Player,
    Enemy,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = AgentId::new(42, 7);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 7);
        assert!(!id.is_null());
    }

    #[test]
    fn test_null_id() {
        assert!(AgentId::null().is_null());
        assert!(AgentId::default().is_null());
        assert_eq!(AgentId::null().to_string(), "null");
    }

    #[test]
    fn test_generation_distinguishes_ids() {
        let first = AgentId::new(3, 0);
        let reused = AgentId::new(3, 1);
        assert_ne!(first, reused);
        assert_eq!(first.index(), reused.index());
        assert_eq!(AgentId::from_bits(reused.to_bits()), reused);
    }
}

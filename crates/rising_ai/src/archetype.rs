//! Data-driven enemy archetypes

use std::collections::BTreeMap;

use rising_core::{Diagnostics, ResourceKind, SimError};
use serde::{Deserialize, Serialize};

/// Tag used when a requested archetype does not exist
pub const DEFAULT_ARCHETYPE: &str = "minion";

/// Stats of one enemy type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Archetype {
    pub health: i32,
    /// Chase speed in units per second
    pub speed: f32,
    pub attack_range: f32,
    pub attack_damage: i32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Telegraph time from attack start to the hit
    pub windup: f32,
    /// Attack length if the animation never reports completion
    pub attack_duration: f32,
    /// Multiplier on the base collision radius
    pub collision_scale: f32,
    pub backstab_eligible: bool,
    /// Model name for the renderer
    pub model: String,
}

impl Default for Archetype {
    fn default() -> Self {
        Self::minion()
    }
}

impl Archetype {
    pub fn minion() -> Self {
        Self {
            health: 3,
            speed: 2.5,
            attack_range: 1.5,
            attack_damage: 1,
            attack_cooldown: 1.5,
            windup: 0.5,
            attack_duration: 1.0,
            collision_scale: 0.8,
            backstab_eligible: false,
            model: "skel_minion".to_string(),
        }
    }

    pub fn warrior() -> Self {
        Self {
            health: 6,
            speed: 2.0,
            attack_range: 1.8,
            attack_damage: 2,
            attack_cooldown: 2.0,
            windup: 0.7,
            attack_duration: 1.2,
            collision_scale: 1.2,
            backstab_eligible: false,
            model: "skel_warrior".to_string(),
        }
    }

    pub fn rogue() -> Self {
        Self {
            health: 4,
            speed: 3.5,
            attack_range: 1.4,
            attack_damage: 1,
            attack_cooldown: 1.0,
            windup: 0.35,
            attack_duration: 0.7,
            collision_scale: 0.9,
            backstab_eligible: true,
            model: "skel_rogue".to_string(),
        }
    }

    pub fn mage() -> Self {
        Self {
            health: 3,
            speed: 2.0,
            attack_range: 6.0,
            attack_damage: 2,
            attack_cooldown: 2.5,
            windup: 0.9,
            attack_duration: 1.4,
            collision_scale: 1.0,
            backstab_eligible: false,
            model: "skel_mage".to_string(),
        }
    }

    /// Collision radius for a given base radius
    pub fn collision_radius(&self, base_radius: f32) -> f32 {
        base_radius * self.collision_scale.max(0.1)
    }
}

/// Archetypes keyed by tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub default_tag: String,
    pub entries: BTreeMap<String, Archetype>,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ArchetypeTable {
    /// Table with warrior, mage, rogue and minion
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("minion".to_string(), Archetype::minion());
        entries.insert("warrior".to_string(), Archetype::warrior());
        entries.insert("rogue".to_string(), Archetype::rogue());
        entries.insert("mage".to_string(), Archetype::mage());
        Self {
            default_tag: DEFAULT_ARCHETYPE.to_string(),
            entries,
        }
    }

    /// Add any built-in archetype the table lacks
    pub fn with_builtin_fallbacks(mut self) -> Self {
        for (tag, archetype) in Self::builtin().entries {
            self.entries.entry(tag).or_insert(archetype);
        }
        self
    }

    pub fn insert(&mut self, tag: impl Into<String>, archetype: Archetype) {
        self.entries.insert(tag.into(), archetype);
    }

    pub fn get(&self, tag: &str) -> Option<&Archetype> {
        self.entries.get(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Look up a tag, falling back to the default archetype
    ///
    /// The first miss for each unknown tag is reported through `diagnostics`.
    /// Returns the tag actually used alongside its stats.
    pub fn resolve(&self, tag: &str, diagnostics: &mut Diagnostics) -> (String, Archetype) {
        if let Some(archetype) = self.entries.get(tag) {
            return (tag.to_string(), archetype.clone());
        }

        diagnostics.report(&SimError::MissingResource {
            kind: ResourceKind::Archetype,
            name: tag.to_string(),
            fallback: self.default_tag.clone(),
        });

        match self.entries.get(&self.default_tag) {
            Some(archetype) => (self.default_tag.clone(), archetype.clone()),
            None => (DEFAULT_ARCHETYPE.to_string(), Archetype::minion()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = ArchetypeTable::builtin();
        let tags: Vec<_> = table.tags().collect();
        assert_eq!(tags, vec!["mage", "minion", "rogue", "warrior"]);
        assert!(table.get("rogue").unwrap().backstab_eligible);
    }

    #[test]
    fn test_unknown_tag_falls_back_once() {
        let table = ArchetypeTable::builtin();
        let mut diagnostics = Diagnostics::new();

        let (tag, archetype) = table.resolve("dragon", &mut diagnostics);
        assert_eq!(tag, "minion");
        assert_eq!(archetype, Archetype::minion());

        table.resolve("dragon", &mut diagnostics);
        assert_eq!(diagnostics.distinct(), 1);
        assert_eq!(diagnostics.occurrences(), 2);
    }

    #[test]
    fn test_known_tag_is_silent() {
        let table = ArchetypeTable::builtin();
        let mut diagnostics = Diagnostics::new();
        let (tag, archetype) = table.resolve("warrior", &mut diagnostics);
        assert_eq!(tag, "warrior");
        assert_eq!(archetype.health, 6);
        assert_eq!(diagnostics.occurrences(), 0);
    }

    #[test]
    fn test_builtin_fallbacks_keep_overrides() {
        let mut table = ArchetypeTable {
            default_tag: DEFAULT_ARCHETYPE.to_string(),
            entries: BTreeMap::new(),
        };
        table.insert("rogue", Archetype { health: 9, ..Archetype::rogue() });

        let table = table.with_builtin_fallbacks();
        assert_eq!(table.tags().count(), 4);
        assert_eq!(table.get("rogue").unwrap().health, 9);
    }

    #[test]
    fn test_collision_radius() {
        assert!((Archetype::warrior().collision_radius(0.5) - 0.6).abs() < 1e-6);
    }
}

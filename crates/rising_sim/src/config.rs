//! Simulation configuration
//!
//! Every section has defaults, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! seed = 7
//! max_delta = 0.1
//!
//! [rules]
//! critical_multiplier = 3.0
//!
//! [archetypes.entries.brute]
//! health = 12
//! speed = 1.5
//! ```
//!
//! # Sources (in priority order)
//!
//! 1. Environment variable: `RISING_CONFIG=/path/to/file.toml`
//! 2. `rising.toml` in the working directory
//! 3. Built-in defaults

use std::path::Path;

use rising_ai::{ArchetypeTable, EnemyAiConfig};
use rising_combat::{CombatRules, RulesError};
use rising_level::LevelError;
use rising_physics::{LocomotionConfig, PhysicsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerConfig;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "RISING_CONFIG";

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "rising.toml";

/// Errors raised while loading configuration or building a simulation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid combat rules: {0}")]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything tunable about a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for wander timing and targets
    pub seed: u64,
    /// Longest delta simulated in one tick
    pub max_delta: f32,
    /// Collision radius before archetype scaling
    pub base_radius: f32,
    /// Crossfade time for looping clips
    pub fade_time: f32,
    pub rules: CombatRules,
    pub archetypes: ArchetypeTable,
    pub player: PlayerConfig,
    pub enemy: EnemyAiConfig,
    pub locomotion: LocomotionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            max_delta: 0.1,
            base_radius: 0.5,
            fade_time: 0.2,
            rules: CombatRules::default(),
            archetypes: ArchetypeTable::builtin(),
            player: PlayerConfig::default(),
            enemy: EnemyAiConfig::default(),
            locomotion: LocomotionConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.archetypes = config.archetypes.with_builtin_fallbacks();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from `RISING_CONFIG`, then `rising.toml`, falling back to defaults
    ///
    /// A file that exists but fails to load is reported and skipped.
    pub fn load_or_default() -> Self {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            candidates.push(path);
        }
        candidates.push(CONFIG_FILE.to_string());

        for path in candidates {
            if !Path::new(&path).exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => return config,
                Err(err) => log::warn!("Ignoring config {}: {}", path, err),
            }
        }

        log::info!("Using default configuration");
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        self.locomotion.validate()?;

        if !(self.max_delta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_delta must be positive, got {}",
                self.max_delta
            )));
        }
        if !(self.base_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "base_radius must be positive, got {}",
                self.base_radius
            )));
        }
        if self.enemy.wander_interval_min > self.enemy.wander_interval_max {
            return Err(ConfigError::Invalid(format!(
                "wander interval is empty: [{}, {}]",
                self.enemy.wander_interval_min, self.enemy.wander_interval_max
            )));
        }
        if self.archetypes.get(&self.archetypes.default_tag).is_none() {
            return Err(ConfigError::Invalid(format!(
                "default archetype '{}' is not in the table",
                self.archetypes.default_tag
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_delta, 0.1);
        assert_eq!(config.enemy.detection.radius, 12.0);
    }

    #[test]
    fn test_partial_toml() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 42

            [rules]
            critical_multiplier = 3.0

            [player]
            attack_range = 2.5

            [archetypes.entries.brute]
            health = 12
            speed = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.rules.critical_multiplier, 3.0);
        assert_eq!(config.rules.block_reduction, 0.5);
        assert_eq!(config.player.attack_range, 2.5);
        assert_eq!(config.player.speed, 5.0);

        let brute = config.archetypes.get("brute").unwrap();
        assert_eq!(brute.health, 12);
        // Unset archetype fields take the default archetype's values
        assert_eq!(brute.attack_range, 1.5);
        assert!(config.archetypes.get("warrior").is_some());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SimConfig::from_toml_str("max_delta = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("[rules]\nblock_reduction = 2.0"),
            Err(ConfigError::Rules(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("seed = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config = SimConfig::from_toml_str(include_str!("../../../config/rising.toml")).unwrap();
        let defaults = SimConfig::default();
        assert_eq!(config.seed, defaults.seed);
        assert_eq!(config.rules, defaults.rules);
        assert_eq!(config.player, defaults.player);
        assert_eq!(config.enemy, defaults.enemy);
        assert_eq!(config.locomotion, defaults.locomotion);

        let brute = config.archetypes.get("brute").unwrap();
        assert_eq!(brute.health, 12);
        assert_eq!(brute.attack_duration, 1.0);
        assert_eq!(config.archetypes.entries.len(), 5);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SimConfig::load("/nonexistent/rising.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}

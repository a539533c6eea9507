//! Encounter configuration with documented defaults
//!
//! Tuning values that a designer may want to change per difficulty or per
//! arena live here. Pattern-level constants (cooldowns, shot counts, radii)
//! are fixed in `patterns::catalog` and the per-module constants.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{NemesisError, Result};
use crate::core::types::{ArenaBounds, Millis, Vec2};

/// Boss body and arena settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossSettings {
    /// Starting and maximum health
    pub max_health: f32,
    /// Where the boss appears; `None` spawns at the arena center
    pub spawn_position: Option<Vec2>,
    /// Arena rectangle the boss is clamped to when relocating
    pub arena: ArenaBounds,
    /// RNG seed for deterministic encounters (replays, tests)
    pub seed: Option<u64>,
}

impl Default for BossSettings {
    fn default() -> Self {
        Self {
            max_health: 5000.0,
            spawn_position: None,
            arena: ArenaBounds::default(),
            seed: None,
        }
    }
}

/// Encounter-level timer intervals (milliseconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// How often the boss re-reads the player's weapon
    pub adaptation_interval_ms: Millis,
    /// Time between morph form changes
    pub morph_interval_ms: Millis,
    /// Morph interval once the final phase is reached
    ///
    /// Must not be longer than `morph_interval_ms`.
    pub final_phase_morph_interval_ms: Millis,
    /// Time between internally selected attacks
    pub attack_pattern_interval_ms: Millis,
    /// Time between combo windows offered to the combo orchestrator
    pub combo_interval_ms: Millis,
    /// Delay between the telegraph cue and the pattern actually firing
    pub telegraph_lead_ms: Millis,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            adaptation_interval_ms: 5_000,
            morph_interval_ms: 15_000,
            final_phase_morph_interval_ms: 8_000,
            attack_pattern_interval_ms: 3_000,
            combo_interval_ms: 10_000,
            telegraph_lead_ms: 800,
        }
    }
}

/// Complete encounter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    pub boss: BossSettings,
    pub timers: TimerSettings,
    /// Externally computed difficulty scaling applied after resistances
    pub damage_multiplier: f32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            boss: BossSettings::default(),
            timers: TimerSettings::default(),
            damage_multiplier: 1.0,
        }
    }
}

impl EncounterConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a fixed RNG seed
    pub fn seeded(seed: u64) -> Self {
        let mut config = Self::default();
        config.boss.seed = Some(seed);
        config
    }

    /// Where the boss spawns
    pub fn spawn_position(&self) -> Vec2 {
        self.boss
            .spawn_position
            .map(|p| self.boss.arena.clamp(p))
            .unwrap_or_else(|| self.boss.arena.center())
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.boss.max_health > 0.0) {
            return Err(NemesisError::InvalidConfig(format!(
                "max_health ({}) must be positive",
                self.boss.max_health
            )));
        }

        if !self.boss.arena.is_valid() {
            return Err(NemesisError::InvalidConfig(format!(
                "arena bounds are inverted: {:?}",
                self.boss.arena
            )));
        }

        let t = &self.timers;
        let intervals = [
            ("adaptation_interval_ms", t.adaptation_interval_ms),
            ("morph_interval_ms", t.morph_interval_ms),
            ("final_phase_morph_interval_ms", t.final_phase_morph_interval_ms),
            ("attack_pattern_interval_ms", t.attack_pattern_interval_ms),
            ("combo_interval_ms", t.combo_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(NemesisError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }

        if t.final_phase_morph_interval_ms > t.morph_interval_ms {
            return Err(NemesisError::InvalidConfig(format!(
                "final_phase_morph_interval_ms ({}) should be <= morph_interval_ms ({})",
                t.final_phase_morph_interval_ms, t.morph_interval_ms
            )));
        }

        if !(self.damage_multiplier >= 0.0) {
            return Err(NemesisError::InvalidConfig(format!(
                "damage_multiplier ({}) must be >= 0",
                self.damage_multiplier
            )));
        }

        Ok(())
    }
}

/// Parse and validate a config from TOML text
pub fn parse_config(contents: &str) -> Result<EncounterConfig> {
    let config: EncounterConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config from a TOML file
pub fn load_config(path: &Path) -> Result<EncounterConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EncounterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_spawn_defaults_to_arena_center() {
        let config = EncounterConfig::default();
        assert_eq!(config.spawn_position(), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_rejects_longer_final_morph_interval() {
        let mut config = EncounterConfig::default();
        config.timers.final_phase_morph_interval_ms = 20_000;
        assert!(matches!(config.validate(), Err(NemesisError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_multiplier() {
        let mut config = EncounterConfig::default();
        config.damage_multiplier = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = EncounterConfig::default();
        config.timers.attack_pattern_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = parse_config(
            r#"
            damage_multiplier = 1.5

            [boss]
            max_health = 1200.0
            seed = 7
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.boss.max_health, 1200.0);
        assert_eq!(config.boss.seed, Some(7));
        assert_eq!(config.damage_multiplier, 1.5);
        assert_eq!(config.timers.morph_interval_ms, 15_000);
    }

    #[test]
    fn test_load_default_file() {
        let config = load_config(Path::new("data/encounter/default.toml"))
            .expect("Should load default encounter config");
        assert!(config.boss.max_health > 0.0);
        assert_eq!(config.timers.telegraph_lead_ms, 800);
    }
}

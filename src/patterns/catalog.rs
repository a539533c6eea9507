//! Pattern identifiers and the static pattern table
//!
//! Every pattern the boss knows is a variant of [`PatternId`]. The table maps
//! each one to its fixed cooldown and the executor that carries it out, so a
//! missing executor is a compile error rather than a runtime lookup miss.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::NemesisError;
use crate::core::types::Millis;
use crate::patterns::engine::PatternEngine;
use crate::patterns::executors;
use crate::player::PlayerAccessor;

/// Every attack pattern in the boss's repertoire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternId {
    /// Reads the player's state and picks a counter
    Adaptive,
    /// Teleport near the player, then spread
    PhaseShift,
    Beam,
    Shield,
    Cloak,
    Artillery,
    Spread,
    Bombs,
    Drones,
    Mines,
}

/// Runs a pattern's behaviour; the engine handles gating and cooldowns
pub type PatternExecutor = fn(&mut PatternEngine, Option<&dyn PlayerAccessor>);

/// One row of the pattern table
pub struct PatternSpec {
    pub id: PatternId,
    pub cooldown_ms: Millis,
    pub executor: PatternExecutor,
}

static PATTERN_TABLE: [PatternSpec; PatternId::COUNT] = [
    PatternSpec { id: PatternId::Adaptive, cooldown_ms: 3_000, executor: executors::adaptive },
    PatternSpec { id: PatternId::PhaseShift, cooldown_ms: 6_000, executor: executors::phase_shift },
    PatternSpec { id: PatternId::Beam, cooldown_ms: 8_000, executor: executors::beam },
    PatternSpec { id: PatternId::Shield, cooldown_ms: 12_000, executor: executors::shield },
    PatternSpec { id: PatternId::Cloak, cooldown_ms: 10_000, executor: executors::cloak },
    PatternSpec { id: PatternId::Artillery, cooldown_ms: 7_000, executor: executors::artillery },
    PatternSpec { id: PatternId::Spread, cooldown_ms: 2_000, executor: executors::spread },
    PatternSpec { id: PatternId::Bombs, cooldown_ms: 6_000, executor: executors::bombs },
    PatternSpec { id: PatternId::Drones, cooldown_ms: 10_000, executor: executors::drones },
    PatternSpec { id: PatternId::Mines, cooldown_ms: 9_000, executor: executors::mines },
];

impl PatternId {
    pub const COUNT: usize = 10;

    /// All patterns, in table order
    pub const ALL: [PatternId; PatternId::COUNT] = [
        PatternId::Adaptive,
        PatternId::PhaseShift,
        PatternId::Beam,
        PatternId::Shield,
        PatternId::Cloak,
        PatternId::Artillery,
        PatternId::Spread,
        PatternId::Bombs,
        PatternId::Drones,
        PatternId::Mines,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static PatternSpec {
        &PATTERN_TABLE[self.index()]
    }

    pub fn cooldown_ms(self) -> Millis {
        self.spec().cooldown_ms
    }

    pub fn executor(self) -> PatternExecutor {
        self.spec().executor
    }

    /// Name used by orchestrators and the telegraph UI
    pub fn name(self) -> &'static str {
        match self {
            PatternId::Adaptive => "adaptive",
            PatternId::PhaseShift => "phaseShift",
            PatternId::Beam => "beam",
            PatternId::Shield => "shield",
            PatternId::Cloak => "cloak",
            PatternId::Artillery => "artillery",
            PatternId::Spread => "spread",
            PatternId::Bombs => "bombs",
            PatternId::Drones => "drones",
            PatternId::Mines => "mines",
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternId {
    type Err = NemesisError;

    /// Accepts the canonical camelCase name, snake_case, or any casing of either
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        PatternId::ALL
            .into_iter()
            .find(|id| id.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| NemesisError::UnknownPattern(s.to_string()))
    }
}

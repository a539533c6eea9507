//! Health-threshold phases
//!
//! Phases only ever advance. Each threshold crossed moves the boss one phase
//! further and swaps its default pattern.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patterns::PatternId;

/// Health fractions at which phases 1..=4 begin
pub const PHASE_THRESHOLDS: [f32; 4] = [0.8, 0.6, 0.4, 0.2];

/// Highest phase index
pub const FINAL_PHASE: u8 = 4;

/// The boss's current default attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternChoice {
    Pattern(PatternId),
    /// Every pick randomizes over the whole pattern table
    All,
}

impl PatternChoice {
    pub fn name(&self) -> &'static str {
        match self {
            PatternChoice::Pattern(id) => id.name(),
            PatternChoice::All => "all",
        }
    }
}

impl fmt::Display for PatternChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for PatternChoice {
    fn default() -> Self {
        PatternChoice::Pattern(PatternId::Adaptive)
    }
}

/// Phase implied by a health fraction (number of thresholds at or above it)
pub fn phase_for_fraction(health_fraction: f32) -> u8 {
    PHASE_THRESHOLDS
        .iter()
        .filter(|&&threshold| health_fraction <= threshold)
        .count() as u8
}

/// Default pattern on entering a phase
pub fn phase_pattern(phase: u8) -> Option<PatternChoice> {
    match phase {
        1 => Some(PatternChoice::Pattern(PatternId::Beam)),
        2 => Some(PatternChoice::Pattern(PatternId::Drones)),
        3 => Some(PatternChoice::Pattern(PatternId::Artillery)),
        4 => Some(PatternChoice::All),
        _ => None,
    }
}

//! The boss itself: phases, morph forms and the encounter state machine

pub mod encounter;
pub mod morph;
pub mod phase;

pub use encounter::{BossEncounter, EncounterTimers};
pub use morph::{MorphCycle, MorphForm};
pub use phase::{phase_for_fraction, phase_pattern, PatternChoice, FINAL_PHASE, PHASE_THRESHOLDS};

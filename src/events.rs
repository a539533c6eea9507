//! Combat events emitted for collaborators
//!
//! Telegraph UI, audio, particles and the tutorial layer never reach into the
//! encounter. They drain these events after each update and react to them.

use serde::{Deserialize, Serialize};

use crate::boss::morph::MorphForm;
use crate::boss::phase::PatternChoice;
use crate::core::types::{EntityHandle, Millis, Vec2, WeaponId};
use crate::effects::EffectKind;
use crate::entities::{EntityKind, TerminationCause};
use crate::patterns::PatternId;
use crate::player::DamageSource;

/// Why an active effect left its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectEndReason {
    /// Duration elapsed
    Expired,
    /// Target became invalid (beam only)
    TargetLost,
    /// A new instance of the same kind took the slot
    Replaced,
    /// Boss defeated; it stops attacking
    Defeated,
    /// Boss torn down
    Destroyed,
}

/// Log entry for a single combat occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Upcoming pattern cue; the pattern fires after `lead_ms`
    Telegraph { pattern: PatternId, lead_ms: Millis },
    PatternExecuted { pattern: PatternId, at: Millis },
    /// Boss resisted part of a hit
    ResistanceCue { weapon: WeaponId, resistance: f32 },
    DamageTaken { raw: f32, effective: f32, weapon: WeaponId },
    PhaseChanged { phase: u8, pattern: PatternChoice },
    MorphChanged { form: MorphForm, index: usize, pattern: PatternId },
    /// Player switched weapons; the boss records it as its adaptation target
    AdaptationTarget { weapon: WeaponId },
    /// A combo orchestrator may chain patterns now
    ComboWindow,
    EffectStarted { effect: EffectKind, duration_ms: Millis },
    EffectEnded { effect: EffectKind, reason: EffectEndReason },
    EntitySpawned { handle: EntityHandle, kind: EntityKind, position: Vec2 },
    EntityTerminated { handle: EntityHandle, kind: EntityKind, cause: TerminationCause },
    Detonation { kind: EntityKind, position: Vec2, radius: f32, damage_dealt: f32 },
    PlayerHit { amount: f32, source: DamageSource },
    BossRelocated { from: Vec2, to: Vec2 },
    Defeated,
    Destroyed,
}

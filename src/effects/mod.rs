//! Timed active effects - beam, shield, cloak
//!
//! Unlike patterns, which fire and forget, an active effect keeps running for
//! its duration and is advanced by the pattern engine every tick. Each kind
//! has exactly one slot; starting a kind again replaces the running instance.

pub mod beam;
pub mod cloak;
pub mod constants;
pub mod runner;
pub mod shield;

use serde::{Deserialize, Serialize};

use crate::core::types::Millis;
use crate::events::{CombatEvent, EffectEndReason};
use crate::player::PlayerAccessor;

pub use beam::BeamEffect;
pub use cloak::CloakEffect;
pub use runner::{ActiveEffects, EffectsTick};
pub use shield::ShieldEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Beam,
    Shield,
    Cloak,
}

/// Outcome of advancing one effect
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectUpdate {
    /// Set when the effect is done and must leave its slot
    pub ended: Option<EffectEndReason>,
    /// Ambush strikes owed (cloak only)
    pub ambushes: u32,
}

/// Shared contract of every timed effect
pub trait TimedEffect {
    const KIND: EffectKind;

    fn started_at(&self) -> Millis;

    fn duration_ms(&self) -> Millis;

    fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.started_at())
    }

    fn remaining(&self, now: Millis) -> Millis {
        self.duration_ms().saturating_sub(self.elapsed(now))
    }

    fn is_expired(&self, now: Millis) -> bool {
        self.elapsed(now) >= self.duration_ms()
    }

    /// Advance the effect to `now`
    fn update(
        &mut self,
        now: Millis,
        player: Option<&mut (dyn PlayerAccessor + '_)>,
        events: &mut Vec<CombatEvent>,
    ) -> EffectUpdate;

    /// Kind-specific cleanup, run once before the slot is freed
    fn expire(&mut self);
}

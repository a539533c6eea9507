//! Stealth mode with periodic ambushes
//!
//! While cloaked the boss is hard to see and every ambush interval it owes a
//! phase shift. The engine performs those shifts outside the cooldown gate.

use crate::core::types::Millis;
use crate::effects::constants::{CLOAK_AMBUSH_INTERVAL_MS, CLOAK_DURATION_MS, CLOAK_VISIBILITY};
use crate::effects::{EffectKind, EffectUpdate, TimedEffect};
use crate::events::{CombatEvent, EffectEndReason};
use crate::player::PlayerAccessor;

#[derive(Debug, Clone, PartialEq)]
pub struct CloakEffect {
    pub started_at: Millis,
    pub duration_ms: Millis,
    pub ambush_interval_ms: Millis,
    /// 1.0 = fully visible
    pub visibility: f32,
    next_ambush_at: Millis,
}

impl CloakEffect {
    pub fn new(now: Millis) -> Self {
        Self {
            started_at: now,
            duration_ms: CLOAK_DURATION_MS,
            ambush_interval_ms: CLOAK_AMBUSH_INTERVAL_MS,
            visibility: CLOAK_VISIBILITY,
            next_ambush_at: now + CLOAK_AMBUSH_INTERVAL_MS,
        }
    }
}

impl TimedEffect for CloakEffect {
    const KIND: EffectKind = EffectKind::Cloak;

    fn started_at(&self) -> Millis {
        self.started_at
    }

    fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    fn update(
        &mut self,
        now: Millis,
        _player: Option<&mut (dyn PlayerAccessor + '_)>,
        _events: &mut Vec<CombatEvent>,
    ) -> EffectUpdate {
        let end = self.started_at + self.duration_ms;
        let mut ambushes = 0;
        // Ambushes strictly inside the cloak window
        while self.next_ambush_at < end && self.next_ambush_at <= now {
            ambushes += 1;
            self.next_ambush_at += self.ambush_interval_ms;
        }

        EffectUpdate {
            ended: self.is_expired(now).then_some(EffectEndReason::Expired),
            ambushes,
        }
    }

    fn expire(&mut self) {
        self.visibility = 1.0;
    }
}

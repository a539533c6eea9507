//! Damage-reduction shield
//!
//! Purely defensive. While the slot is occupied, the encounter's damage
//! intake consults `strength` and absorbs that fraction of every hit.

use crate::core::types::Millis;
use crate::effects::constants::{SHIELD_DURATION_MS, SHIELD_RADIUS, SHIELD_STRENGTH};
use crate::effects::{EffectKind, EffectUpdate, TimedEffect};
use crate::events::{CombatEvent, EffectEndReason};
use crate::player::PlayerAccessor;

#[derive(Debug, Clone, PartialEq)]
pub struct ShieldEffect {
    pub started_at: Millis,
    pub duration_ms: Millis,
    /// Fraction of incoming damage absorbed
    pub strength: f32,
    pub radius: f32,
    pub raised: bool,
}

impl ShieldEffect {
    pub fn new(now: Millis) -> Self {
        Self {
            started_at: now,
            duration_ms: SHIELD_DURATION_MS,
            strength: SHIELD_STRENGTH,
            radius: SHIELD_RADIUS,
            raised: true,
        }
    }

    /// Reduction to apply to a hit right now
    pub fn reduction(&self) -> f32 {
        if self.raised {
            self.strength
        } else {
            0.0
        }
    }
}

impl TimedEffect for ShieldEffect {
    const KIND: EffectKind = EffectKind::Shield;

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
        EffectUpdate {
            ended: self.is_expired(now).then_some(EffectEndReason::Expired),
            ..Default::default()
        }
    }

    fn expire(&mut self) {
        self.raised = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_lasts_full_duration() {
        let mut shield = ShieldEffect::new(1_000);
        let mut events = Vec::new();
        assert!(shield.update(5_999, None, &mut events).ended.is_none());
        assert_eq!(shield.remaining(5_999), 1);
        assert_eq!(
            shield.update(6_000, None, &mut events).ended,
            Some(EffectEndReason::Expired)
        );
    }

    #[test]
    fn test_lowered_shield_absorbs_nothing() {
        let mut shield = ShieldEffect::new(0);
        assert_eq!(shield.reduction(), SHIELD_STRENGTH);
        shield.expire();
        assert_eq!(shield.reduction(), 0.0);
    }
}

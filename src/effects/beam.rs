//! Continuous beam locked onto the player
//!
//! Damage lands on fixed sub-interval boundaries, not every tick, so the
//! total is independent of frame rate.

use crate::core::types::{Millis, Vec2};
use crate::effects::constants::{BEAM_DAMAGE_INTERVAL_MS, BEAM_DAMAGE_PER_TICK, BEAM_DURATION_MS};
use crate::effects::{EffectKind, EffectUpdate, TimedEffect};
use crate::events::{CombatEvent, EffectEndReason};
use crate::player::{DamageSource, PlayerAccessor};

#[derive(Debug, Clone, PartialEq)]
pub struct BeamEffect {
    pub started_at: Millis,
    pub duration_ms: Millis,
    pub damage_per_tick: f32,
    pub interval_ms: Millis,
    /// Where the beam starts (boss position at cast time)
    pub origin: Vec2,
    /// Last known target position
    pub target: Vec2,
    /// Whether damage is still being dealt
    pub firing: bool,
    next_damage_at: Millis,
    /// Damage applications so far
    pub hits: u32,
}

impl BeamEffect {
    pub fn new(now: Millis, origin: Vec2, target: Vec2) -> Self {
        Self {
            started_at: now,
            duration_ms: BEAM_DURATION_MS,
            damage_per_tick: BEAM_DAMAGE_PER_TICK,
            interval_ms: BEAM_DAMAGE_INTERVAL_MS,
            origin,
            target,
            firing: true,
            next_damage_at: now + BEAM_DAMAGE_INTERVAL_MS,
            hits: 0,
        }
    }

    fn end_time(&self) -> Millis {
        self.started_at + self.duration_ms
    }
}

impl TimedEffect for BeamEffect {
    const KIND: EffectKind = EffectKind::Beam;

    fn started_at(&self) -> Millis {
        self.started_at
    }

    fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    fn update(
        &mut self,
        now: Millis,
        player: Option<&mut (dyn PlayerAccessor + '_)>,
        events: &mut Vec<CombatEvent>,
    ) -> EffectUpdate {
        let player = match player {
            Some(p) if p.is_alive() => p,
            _ => {
                return EffectUpdate {
                    ended: Some(EffectEndReason::TargetLost),
                    ..Default::default()
                }
            }
        };

        self.target = player.position();

        let limit = now.min(self.end_time());
        while self.firing && self.next_damage_at <= limit {
            player.apply_damage(self.damage_per_tick, DamageSource::Beam);
            events.push(CombatEvent::PlayerHit {
                amount: self.damage_per_tick,
                source: DamageSource::Beam,
            });
            self.hits += 1;
            self.next_damage_at += self.interval_ms;
        }

        EffectUpdate {
            ended: self.is_expired(now).then_some(EffectEndReason::Expired),
            ..Default::default()
        }
    }

    fn expire(&mut self) {
        self.firing = false;
    }
}

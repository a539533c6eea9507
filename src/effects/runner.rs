//! One slot per effect kind
//!
//! Starting an effect whose slot is occupied expires the old instance first
//! (cleanup included) and restarts the timer with the new one.

use crate::core::types::Millis;
use crate::effects::{BeamEffect, CloakEffect, EffectKind, EffectUpdate, ShieldEffect, TimedEffect};
use crate::events::{CombatEvent, EffectEndReason};
use crate::player::PlayerAccessor;

/// What the effects asked of the engine this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectsTick {
    /// Forced phase shifts owed by the cloak
    pub ambushes: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    beam: Option<BeamEffect>,
    shield: Option<ShieldEffect>,
    cloak: Option<CloakEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_beam(&mut self, beam: BeamEffect, events: &mut Vec<CombatEvent>) {
        start_in(&mut self.beam, beam, events);
    }

    pub fn start_shield(&mut self, shield: ShieldEffect, events: &mut Vec<CombatEvent>) {
        start_in(&mut self.shield, shield, events);
    }

    pub fn start_cloak(&mut self, cloak: CloakEffect, events: &mut Vec<CombatEvent>) {
        start_in(&mut self.cloak, cloak, events);
    }

    pub fn beam(&self) -> Option<&BeamEffect> {
        self.beam.as_ref()
    }

    pub fn shield(&self) -> Option<&ShieldEffect> {
        self.shield.as_ref()
    }

    pub fn cloak(&self) -> Option<&CloakEffect> {
        self.cloak.as_ref()
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Beam => self.beam.is_some(),
            EffectKind::Shield => self.shield.is_some(),
            EffectKind::Cloak => self.cloak.is_some(),
        }
    }

    pub fn active_kinds(&self) -> Vec<EffectKind> {
        [EffectKind::Beam, EffectKind::Shield, EffectKind::Cloak]
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.beam.is_none() && self.shield.is_none() && self.cloak.is_none()
    }

    /// Damage fraction absorbed by the shield (0.0 when down)
    pub fn shield_reduction(&self) -> f32 {
        self.shield.as_ref().map_or(0.0, ShieldEffect::reduction)
    }

    /// Hit visibility of the boss (1.0 unless cloaked)
    pub fn visibility(&self) -> f32 {
        self.cloak.as_ref().map_or(1.0, |c| c.visibility)
    }

    /// Advance every running effect and free the slots of finished ones
    pub fn update(
        &mut self,
        now: Millis,
        mut player: Option<&mut (dyn PlayerAccessor + '_)>,
        events: &mut Vec<CombatEvent>,
    ) -> EffectsTick {
        step_slot(&mut self.beam, now, player.as_deref_mut(), events);
        step_slot(&mut self.shield, now, player.as_deref_mut(), events);
        let cloak = step_slot(&mut self.cloak, now, player.as_deref_mut(), events);

        EffectsTick {
            ambushes: cloak.ambushes,
        }
    }

    /// Expire everything (boss defeat or teardown)
    pub fn clear(&mut self, reason: EffectEndReason, events: &mut Vec<CombatEvent>) {
        end_slot(&mut self.beam, reason, events);
        end_slot(&mut self.shield, reason, events);
        end_slot(&mut self.cloak, reason, events);
    }
}

fn start_in<E: TimedEffect>(slot: &mut Option<E>, effect: E, events: &mut Vec<CombatEvent>) {
    end_slot(slot, EffectEndReason::Replaced, events);
    tracing::debug!("{:?} started for {} ms", E::KIND, effect.duration_ms());
    events.push(CombatEvent::EffectStarted {
        effect: E::KIND,
        duration_ms: effect.duration_ms(),
    });
    *slot = Some(effect);
}

fn step_slot<E: TimedEffect>(
    slot: &mut Option<E>,
    now: Millis,
    player: Option<&mut (dyn PlayerAccessor + '_)>,
    events: &mut Vec<CombatEvent>,
) -> EffectUpdate {
    let Some(effect) = slot.as_mut() else {
        return EffectUpdate::default();
    };

    let update = effect.update(now, player, events);
    if let Some(reason) = update.ended {
        end_slot(slot, reason, events);
    }
    update
}

fn end_slot<E: TimedEffect>(slot: &mut Option<E>, reason: EffectEndReason, events: &mut Vec<CombatEvent>) {
    if let Some(mut effect) = slot.take() {
        effect.expire();
        tracing::debug!("{:?} ended: {:?}", E::KIND, reason);
        events.push(CombatEvent::EffectEnded { effect: E::KIND, reason });
    }
}

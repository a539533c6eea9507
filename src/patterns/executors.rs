//! Pattern executors
//!
//! Each executor only describes what a pattern does. Gating, cooldowns and
//! the `PatternExecuted` event are the engine's job. Staggered volleys fire
//! their first shot immediately and queue the rest.

use rand::Rng;

use crate::core::types::{degrees_of, direction_from_degrees, Millis, Vec2};
use crate::effects::{BeamEffect, CloakEffect, ShieldEffect};
use crate::entities::constants::{
    ARTILLERY_MIN_FLIGHT_MS, ARTILLERY_SHELL_SPEED, BOMB_FUSE_MS, DRONE_ORBIT_RADIUS, FAN_SHOT_DAMAGE,
    MINE_MAX_RING, MINE_MIN_RING, SPREAD_SHOT_DAMAGE,
};
use crate::entities::SpawnedEntity;
use crate::patterns::constants::*;
use crate::patterns::engine::PatternEngine;
use crate::patterns::scheduler::TaskAction;
use crate::patterns::PatternId;
use crate::player::PlayerAccessor;

fn living(player: Option<&dyn PlayerAccessor>) -> Option<&dyn PlayerAccessor> {
    player.filter(|p| p.is_alive())
}

/// Counter the player's current state
///
/// Low health invites a spread, a strong shield invites the beam, anything
/// else gets an aimed five-shot fan.
pub fn adaptive(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>) {
    let Some(target) = living(player) else {
        tracing::debug!("Adaptive: no player to read");
        return;
    };

    if target.health_fraction() < ADAPTIVE_LOW_HEALTH {
        engine.execute_pattern(PatternId::Spread, Some(target));
        return;
    }
    if target.shield_fraction() > ADAPTIVE_HIGH_SHIELD {
        engine.execute_pattern(PatternId::Beam, Some(target));
        return;
    }

    let origin = engine.position();
    let base = degrees_of(target.position() - origin);
    let half = FAN_SHOT_COUNT / 2;
    for step in -half..=half {
        let direction = direction_from_degrees(base + step as f32 * FAN_STEP_DEG);
        engine.spawn(SpawnedEntity::projectile(origin, direction, FAN_SHOT_DAMAGE, engine.now()));
    }
}

/// Teleport next to the player after a short lead, then spread
pub fn phase_shift(engine: &mut PatternEngine, _player: Option<&dyn PlayerAccessor>) {
    engine.schedule(PHASE_SHIFT_LEAD_MS, TaskAction::Relocate);
}

pub(crate) fn relocate(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>) {
    let Some(target) = living(player) else {
        tracing::debug!("Phase shift: no player, holding position");
        return;
    };

    let angle = engine.rng().gen_range(0.0..360.0);
    let distance = engine.rng().gen_range(PHASE_SHIFT_MIN_RADIUS..PHASE_SHIFT_MAX_RADIUS);
    let destination = target.position() + direction_from_degrees(angle) * distance;
    let landed = engine.set_position(destination);
    tracing::debug!("Phase shift to ({:.0}, {:.0})", landed.x, landed.y);

    engine.execute_pattern(PatternId::Spread, Some(target));
}

pub fn beam(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>) {
    let Some(target) = living(player) else {
        tracing::debug!("Beam: no target");
        return;
    };
    let effect = BeamEffect::new(engine.now(), engine.position(), target.position());
    let (effects, events) = engine.effects_and_events();
    effects.start_beam(effect, events);
}

pub fn shield(engine: &mut PatternEngine, _player: Option<&dyn PlayerAccessor>) {
    let effect = ShieldEffect::new(engine.now());
    let (effects, events) = engine.effects_and_events();
    effects.start_shield(effect, events);
}

pub fn cloak(engine: &mut PatternEngine, _player: Option<&dyn PlayerAccessor>) {
    let effect = CloakEffect::new(engine.now());
    let (effects, events) = engine.effects_and_events();
    effects.start_cloak(effect, events);
}

/// Three lead-predicted shells, half a second apart
pub fn artillery(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>) {
    if living(player).is_none() {
        tracing::debug!("Artillery: no target, holding fire");
        return;
    }
    fire_artillery_shot(engine, player, 0);
    for shot in 1..ARTILLERY_SHOT_COUNT {
        engine.schedule(shot as Millis * ARTILLERY_STAGGER_MS, TaskAction::ArtilleryShot { shot });
    }
}

pub(crate) fn fire_artillery_shot(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>, shot: u32) {
    let Some(target) = living(player) else {
        tracing::debug!("Artillery shot {} skipped, target gone", shot);
        return;
    };
    let origin = engine.position();
    let (impact, flight_ms) = lead_target(origin, target.position(), target.velocity(), ARTILLERY_SHELL_SPEED);
    engine.spawn(SpawnedEntity::artillery_shell(origin, impact, flight_ms, engine.now()));
}

/// Predict where a moving target will be when a shell arrives
///
/// Two refinement passes; the flight time is never shorter than the minimum
/// so point-blank shells still read as artillery.
pub fn lead_target(origin: Vec2, target: Vec2, velocity: Vec2, speed: f32) -> (Vec2, Millis) {
    let mut predicted = target;
    for _ in 0..2 {
        let travel_secs = origin.distance(predicted) / speed;
        predicted = target + velocity * travel_secs;
    }
    let flight_ms = ((origin.distance(predicted) / speed) * 1000.0).round() as Millis;
    (predicted, flight_ms.max(ARTILLERY_MIN_FLIGHT_MS))
}

/// Seven shots across a 120 degree arc, 50 ms apart
pub fn spread(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>) {
    let center = match living(player) {
        Some(target) => degrees_of(target.position() - engine.position()),
        None => DEFAULT_FACING_DEG,
    };
    let step = SPREAD_ARC_DEG / (SPREAD_SHOT_COUNT - 1) as f32;
    let first = center - SPREAD_ARC_DEG / 2.0;

    fire_spread_shot(engine, first);
    for shot in 1..SPREAD_SHOT_COUNT {
        let direction_deg = first + shot as f32 * step;
        engine.schedule(shot as Millis * SPREAD_STAGGER_MS, TaskAction::SpreadShot { direction_deg });
    }
}

pub(crate) fn fire_spread_shot(engine: &mut PatternEngine, direction_deg: f32) {
    let direction = direction_from_degrees(direction_deg);
    engine.spawn(SpawnedEntity::projectile(
        engine.position(),
        direction,
        SPREAD_SHOT_DAMAGE,
        engine.now(),
    ));
}

/// Three bombs lobbed at the player, each with its own fuse
pub fn bombs(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>) {
    throw_bomb(engine, player, 0);
    for shot in 1..BOMB_COUNT {
        engine.schedule(shot as Millis * BOMB_STAGGER_MS, TaskAction::ThrowBomb { shot });
    }
}

pub(crate) fn throw_bomb(engine: &mut PatternEngine, player: Option<&dyn PlayerAccessor>, shot: u32) {
    let origin = engine.position();
    let angle = engine.rng().gen_range(0.0..360.0);
    let landing = match living(player) {
        Some(target) => {
            let scatter = engine.rng().gen_range(0.0..BOMB_SCATTER);
            target.position() + direction_from_degrees(angle) * scatter
        }
        None => origin + direction_from_degrees(angle) * BOMB_BLIND_RANGE,
    };
    let landing = engine.arena().clamp(landing);

    let handle = engine.spawn(SpawnedEntity::bomb(origin, landing, engine.now()));
    engine.schedule(BOMB_FUSE_MS, TaskAction::DetonateFuse(handle));
    tracing::trace!("Bomb {} thrown toward ({:.0}, {:.0})", shot, landing.x, landing.y);
}

/// Three homing drones spawned around the boss
pub fn drones(engine: &mut PatternEngine, _player: Option<&dyn PlayerAccessor>) {
    let origin = engine.position();
    for i in 0..DRONE_COUNT {
        let offset = direction_from_degrees(i as f32 * DRONE_SPACING_DEG) * DRONE_ORBIT_RADIUS;
        let at = engine.arena().clamp(origin + offset);
        engine.spawn(SpawnedEntity::drone(at, engine.now()));
    }
}

/// Five mines in a ring around the boss
pub fn mines(engine: &mut PatternEngine, _player: Option<&dyn PlayerAccessor>) {
    let origin = engine.position();
    let spacing = 360.0 / MINE_COUNT as f32;
    for i in 0..MINE_COUNT {
        let distance = engine.rng().gen_range(MINE_MIN_RING..MINE_MAX_RING);
        let at = engine.arena().clamp(origin + direction_from_degrees(i as f32 * spacing) * distance);
        engine.spawn(SpawnedEntity::mine(at, engine.now()));
    }
}

//! Pattern engine integration tests
//!
//! Drives the engine the way a game loop would: fixed ticks, a simulated
//! player, and the event outbox as the only window into what happened.

use nemesis::core::types::{ArenaBounds, Millis, Vec2, WeaponId};
use nemesis::effects::EffectKind;
use nemesis::entities::{EntityKind, TerminationCause};
use nemesis::events::CombatEvent;
use nemesis::patterns::{PatternEngine, PatternId};
use nemesis::player::{DamageSource, PlayerAccessor};
use proptest::prelude::*;

struct TestPlayer {
    position: Vec2,
    velocity: Vec2,
    health: f32,
    shield: f32,
    hits: Vec<(f32, DamageSource)>,
    knockback: Vec2,
}

impl TestPlayer {
    fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            health: 1.0,
            shield: 0.0,
            hits: Vec::new(),
            knockback: Vec2::ZERO,
        }
    }

    fn damage_from(&self, matches: impl Fn(DamageSource) -> bool) -> f32 {
        self.hits.iter().filter(|(_, s)| matches(*s)).map(|(a, _)| a).sum()
    }
}

impl PlayerAccessor for TestPlayer {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn velocity(&self) -> Vec2 {
        self.velocity
    }
    fn current_weapon(&self) -> WeaponId {
        WeaponId::from("laser")
    }
    fn health_fraction(&self) -> f32 {
        self.health
    }
    fn shield_fraction(&self) -> f32 {
        self.shield
    }
    fn apply_damage(&mut self, amount: f32, source: DamageSource) {
        self.hits.push((amount, source));
    }
    fn apply_knockback(&mut self, impulse: Vec2) {
        self.knockback += impulse;
    }
}

const BOSS_AT: Vec2 = Vec2::new(640.0, 360.0);

fn engine() -> PatternEngine {
    PatternEngine::new(BOSS_AT, ArenaBounds::default(), Some(42))
}

/// Run `total` ms in 16 ms ticks, collecting every event
fn run(engine: &mut PatternEngine, total: Millis, mut player: Option<&mut TestPlayer>) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let mut elapsed = 0;
    while elapsed < total {
        let step = (total - elapsed).min(16);
        match player.as_deref_mut() {
            Some(p) => engine.update(step, Some(p)),
            None => engine.update(step, None),
        }
        events.extend(engine.drain_events());
        elapsed += step;
    }
    events
}

fn spawned(events: &[CombatEvent], kind: EntityKind) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CombatEvent::EntitySpawned { kind: k, .. } if *k == kind))
        .count()
}

fn detonations(events: &[CombatEvent], kind: EntityKind) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CombatEvent::Detonation { kind: k, .. } if *k == kind))
        .count()
}

#[test]
fn test_every_pattern_gated_by_its_cooldown() {
    for id in PatternId::ALL {
        let mut engine = engine();
        let player = TestPlayer::at(640.0, 620.0);

        assert!(engine.execute_pattern(id, Some(&player)), "{} should run", id);
        assert!(!engine.execute_pattern(id, Some(&player)), "{} should be gated", id);
        assert_eq!(engine.execution_count(id), 1);
    }
}

#[test]
fn test_cooldown_table() {
    let expected = [
        (PatternId::Adaptive, 3_000),
        (PatternId::PhaseShift, 6_000),
        (PatternId::Beam, 8_000),
        (PatternId::Shield, 12_000),
        (PatternId::Cloak, 10_000),
        (PatternId::Artillery, 7_000),
        (PatternId::Spread, 2_000),
        (PatternId::Bombs, 6_000),
        (PatternId::Drones, 10_000),
        (PatternId::Mines, 9_000),
    ];
    for (id, cooldown) in expected {
        assert_eq!(id.cooldown_ms(), cooldown, "{}", id);
    }
}

proptest! {
    #[test]
    fn prop_second_call_inside_window_is_noop(index in 0usize..PatternId::COUNT, wait in 0u64..12_000) {
        let id = PatternId::ALL[index];
        let mut engine = engine();
        engine.execute_pattern(id, None);
        engine.update(wait, None);

        let ran = engine.execute_pattern(id, None);
        prop_assert_eq!(ran, wait >= id.cooldown_ms());
        prop_assert_eq!(engine.execution_count(id), if ran { 2 } else { 1 });
    }
}

#[test]
fn test_unknown_name_logged_noop() {
    let mut engine = engine();
    assert!(!engine.execute_pattern_by_name("meteorStorm", None));
    assert!(engine.drain_events().is_empty());
    assert!(engine.execute_pattern_by_name("spread", None));
}

#[test]
fn test_artillery_without_player_spawns_nothing() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Artillery, None);
    let events = run(&mut engine, 2_000, None);

    assert_eq!(spawned(&events, EntityKind::ArtilleryShell), 0);
    assert!(engine.entities().is_empty());
}

#[test]
fn test_artillery_fires_three_staggered_shells() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 600.0);
    engine.execute_pattern(PatternId::Artillery, Some(&player));
    assert_eq!(spawned(&engine.drain_events(), EntityKind::ArtilleryShell), 1);

    let events = run(&mut engine, 496, Some(&mut player));
    assert_eq!(spawned(&events, EntityKind::ArtilleryShell), 0);
    let events = run(&mut engine, 1_000, Some(&mut player));
    assert_eq!(spawned(&events, EntityKind::ArtilleryShell), 2);
}

#[test]
fn test_artillery_leads_moving_player() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 600.0);
    player.velocity = Vec2::new(100.0, 0.0);
    engine.execute_pattern(PatternId::Artillery, Some(&player));

    let (_, shell) = engine
        .entities()
        .iter()
        .find(|(_, e)| e.kind == EntityKind::ArtilleryShell)
        .unwrap();
    assert!(shell.velocity.x > 0.0);
}

#[test]
fn test_spread_seven_shots_over_arc() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Spread, None);
    let mut events = engine.drain_events();
    events.extend(run(&mut engine, 320, None));

    assert_eq!(spawned(&events, EntityKind::Projectile), 7);
}

#[test]
fn test_adaptive_fan_toward_player() {
    let mut engine = engine();
    let player = TestPlayer::at(640.0, 620.0);
    engine.execute_pattern(PatternId::Adaptive, Some(&player));

    let shots: Vec<_> = engine.entities().iter().map(|(_, e)| e.velocity).collect();
    assert_eq!(shots.len(), 5);
    // Fan centred on the player, straight down
    assert!(shots.iter().all(|v| v.y > 0.0));
}

#[test]
fn test_adaptive_low_health_delegates_to_spread() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 620.0);
    player.health = 0.2;
    engine.execute_pattern(PatternId::Adaptive, Some(&player));

    assert_eq!(engine.execution_count(PatternId::Spread), 1);
    assert!(engine.cooldown_remaining(PatternId::Spread) > 0);
}

#[test]
fn test_adaptive_high_shield_delegates_to_beam() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 620.0);
    player.shield = 0.9;
    engine.execute_pattern(PatternId::Adaptive, Some(&player));

    assert!(engine.effects().is_active(EffectKind::Beam));
}

#[test]
fn test_adaptive_without_player_is_noop() {
    let mut engine = engine();
    assert!(engine.execute_pattern(PatternId::Adaptive, None));
    assert!(engine.entities().is_empty());
}

#[test]
fn test_beam_ticks_on_interval() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 620.0);
    engine.execute_pattern(PatternId::Beam, Some(&player));
    let events = run(&mut engine, 3_200, Some(&mut player));

    let beam_hits = player.hits.iter().filter(|(_, s)| *s == DamageSource::Beam).count();
    assert_eq!(beam_hits, 30);
    assert!((player.damage_from(|s| s == DamageSource::Beam) - 120.0).abs() < 1e-3);
    assert!(events.contains(&CombatEvent::EffectEnded {
        effect: EffectKind::Beam,
        reason: nemesis::events::EffectEndReason::Expired,
    }));
}

#[test]
fn test_beam_clears_when_player_dies() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 620.0);
    engine.execute_pattern(PatternId::Beam, Some(&player));
    run(&mut engine, 500, Some(&mut player));

    player.health = 0.0;
    run(&mut engine, 16, Some(&mut player));
    assert!(!engine.effects().is_active(EffectKind::Beam));
}

#[test]
fn test_shield_window() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Shield, None);
    run(&mut engine, 4_992, None);
    assert!((engine.effects().shield_reduction() - 0.7).abs() < 1e-6);
    run(&mut engine, 16, None);
    assert_eq!(engine.effects().shield_reduction(), 0.0);
}

#[test]
fn test_cloak_ambush_bypasses_cooldown() {
    let mut engine = engine();
    let mut player = TestPlayer::at(300.0, 300.0);
    engine.execute_pattern(PatternId::PhaseShift, Some(&player));
    engine.execute_pattern(PatternId::Cloak, Some(&player));
    run(&mut engine, 1_008, Some(&mut player));

    assert_eq!(engine.execution_count(PatternId::PhaseShift), 2);
    // The ambush does not refresh the gate
    assert_eq!(engine.cooldown_remaining(PatternId::PhaseShift), 6_000 - 1_008);
    assert!(engine.effects().visibility() < 1.0);
}

#[test]
fn test_cloak_expiry_restores_visibility() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Cloak, None);
    run(&mut engine, 5_008, None);
    assert_eq!(engine.effects().visibility(), 1.0);
    assert_eq!(engine.execution_count(PatternId::PhaseShift), 4);
}

#[test]
fn test_phase_shift_lands_near_player_then_spreads() {
    let mut engine = engine();
    let mut player = TestPlayer::at(300.0, 300.0);
    engine.execute_pattern(PatternId::PhaseShift, Some(&player));
    let events = run(&mut engine, 320, Some(&mut player));

    assert!(events.iter().any(|e| matches!(e, CombatEvent::BossRelocated { .. })));
    let distance = engine.position().distance(player.position);
    assert!((150.0..=250.0).contains(&distance), "landed {} away", distance);
    assert_eq!(engine.execution_count(PatternId::Spread), 1);
}

#[test]
fn test_phase_shift_clamped_to_arena() {
    let mut engine = engine();
    let mut player = TestPlayer::at(5.0, 5.0);
    engine.execute_pattern(PatternId::PhaseShift, Some(&player));
    run(&mut engine, 320, Some(&mut player));
    assert!(ArenaBounds::default().contains(engine.position()));
}

#[test]
fn test_phase_shift_holds_without_player() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::PhaseShift, None);
    run(&mut engine, 500, None);
    assert_eq!(engine.position(), BOSS_AT);
}

#[test]
fn test_mine_detonates_once_on_proximity() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Mines, None);
    let (handle, mine) = engine.entities().iter().next().unwrap();
    let mine_at = mine.position;
    assert_eq!(mine.proximity_radius, Some(80.0));

    let mut player = TestPlayer::at(mine_at.x + 10.0, mine_at.y);
    let events = run(&mut engine, 16, Some(&mut player));

    assert_eq!(detonations(&events, EntityKind::Mine), 1);
    assert!(events.contains(&CombatEvent::EntityTerminated {
        handle,
        kind: EntityKind::Mine,
        cause: TerminationCause::Proximity,
    }));
    assert!(player.knockback.length() > 0.0);

    // The rest expire on their own; the triggered one never fires again
    let events = run(&mut engine, 5_000, Some(&mut player));
    let again = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::Detonation { position, .. } if *position == mine_at))
        .count();
    assert_eq!(again, 0);
    assert_eq!(detonations(&events, EntityKind::Mine), 4);
}

#[test]
fn test_mine_both_triggers_same_tick() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Mines, None);
    let (_, mine) = engine.entities().iter().next().unwrap();
    let mut player = TestPlayer::at(mine.position.x, mine.position.y + 5.0);
    engine.drain_events();

    engine.update(5_000, Some(&mut player));
    let events = engine.drain_events();
    assert_eq!(detonations(&events, EntityKind::Mine), 5);
    let proximity = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::EntityTerminated { cause: TerminationCause::Proximity, .. }))
        .count();
    assert_eq!(proximity, 1);
}

#[test]
fn test_mines_ring_radius() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Mines, None);
    for (_, mine) in engine.entities().iter() {
        let distance = mine.position.distance(BOSS_AT);
        assert!((100.0..=200.0).contains(&distance), "mine at {}", distance);
    }
}

#[test]
fn test_bomb_fuse_scatters_secondaries() {
    let mut engine = engine();
    let mut player = TestPlayer::at(900.0, 600.0);
    engine.execute_pattern(PatternId::Bombs, Some(&player));
    let events = run(&mut engine, 1_104, Some(&mut player));

    assert_eq!(detonations(&events, EntityKind::Bomb), 1);
    assert_eq!(spawned(&events, EntityKind::Burst), 5);
    assert_eq!(spawned(&events, EntityKind::Bomb), 3);
}

#[test]
fn test_bombs_without_player_land_near_boss() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Bombs, None);
    // Third fuse is due at 2008
    let events = run(&mut engine, 1_904, None);
    assert_eq!(detonations(&events, EntityKind::Bomb), 2);
    let bursts_spawned = spawned(&events, EntityKind::Burst);
    assert_eq!(bursts_spawned, 10);
}

#[test]
fn test_destroyed_bomb_fuse_never_fires() {
    let mut engine = engine();
    let mut player = TestPlayer::at(900.0, 600.0);
    engine.execute_pattern(PatternId::Bombs, Some(&player));
    let (first, _) = engine.entities().iter().next().unwrap();
    assert!(engine.destroy_entity(first));
    engine.drain_events();

    // The second bomb takes the swept slot before the first fuse comes due
    let early = run(&mut engine, 1_400, Some(&mut player));
    let second = early
        .iter()
        .find_map(|e| match e {
            CombatEvent::EntitySpawned { handle, kind: EntityKind::Bomb, .. } => Some(*handle),
            _ => None,
        })
        .unwrap();
    assert_eq!(second.index, first.index);
    assert_ne!(second.generation, first.generation);
    assert_eq!(detonations(&early, EntityKind::Bomb), 0);
    assert_eq!(spawned(&early, EntityKind::Burst), 0);

    let late = run(&mut engine, 504, Some(&mut player));
    assert_eq!(detonations(&late, EntityKind::Bomb), 1);
    assert_eq!(spawned(&late, EntityKind::Burst), 5);
    assert!(!late.iter().chain(early.iter()).any(|e| matches!(
        e,
        CombatEvent::EntityTerminated { handle, .. } if *handle == first
    )));
}

#[test]
fn test_drones_home_and_fire() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 700.0);
    engine.execute_pattern(PatternId::Drones, Some(&player));
    assert_eq!(engine.entities().len(), 3);

    let events = run(&mut engine, 1_008, Some(&mut player));
    assert_eq!(spawned(&events, EntityKind::DroneShot), 3);
}

#[test]
fn test_drones_hold_without_player() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Drones, None);
    let before: Vec<Vec2> = engine.entities().iter().map(|(_, e)| e.position).collect();
    let events = run(&mut engine, 2_000, None);

    let after: Vec<Vec2> = engine.entities().iter().map(|(_, e)| e.position).collect();
    assert_eq!(before, after);
    assert_eq!(spawned(&events, EntityKind::DroneShot), 0);
}

#[test]
fn test_destroyed_drone_releases_fire_loop() {
    let mut engine = engine();
    engine.execute_pattern(PatternId::Drones, None);
    let (handle, _) = engine.entities().iter().next().unwrap();

    assert!(engine.destroy_entity(handle));
    let drone = engine.entities().get(handle).unwrap();
    assert!(!drone.active);
    assert!(!drone.has_fire_loop());

    run(&mut engine, 16, None);
    assert!(!engine.entities().is_live(handle));
    assert_eq!(engine.entities().len(), 2);
}

#[test]
fn test_destroy_silences_pending_tasks() {
    let mut engine = engine();
    let mut player = TestPlayer::at(640.0, 620.0);
    engine.execute_pattern(PatternId::Spread, Some(&player));
    engine.execute_pattern(PatternId::Bombs, Some(&player));
    engine.execute_pattern(PatternId::Drones, Some(&player));
    engine.execute_pattern(PatternId::Cloak, Some(&player));
    assert!(engine.pending_tasks() > 0);

    engine.destroy();
    engine.drain_events();
    let events = run(&mut engine, 3_000, Some(&mut player));

    assert!(events.is_empty());
    assert!(engine.effects().is_empty());
    assert!(engine.entities().iter().all(|(_, e)| !e.active));
    assert!(player.hits.is_empty());
}

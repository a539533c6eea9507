//! The boss encounter: health, phases, morph cycle and timers over one engine
//!
//! Two state axes run independently. Phase is monotonic and driven by damage;
//! morph form is cyclic and driven by time. Both feed `current_pattern`,
//! which the internal attack timer telegraphs and then executes through the
//! same gated entry point external orchestrators use.

use serde::Serialize;

use crate::boss::morph::{MorphCycle, MorphForm};
use crate::boss::phase::{phase_for_fraction, phase_pattern, PatternChoice, FINAL_PHASE};
use crate::combat::damage::{DamageOutcome, DamagePipeline};
use crate::combat::resistance::ResistanceMap;
use crate::core::config::EncounterConfig;
use crate::core::error::Result;
use crate::core::types::{Millis, Vec2, WeaponId};
use crate::effects::ActiveEffects;
use crate::entities::EntityArena;
use crate::events::CombatEvent;
use crate::history::ProgressHistory;
use crate::patterns::{PatternEngine, PatternId, TaskAction};
use crate::player::PlayerAccessor;

/// Elapsed time on each encounter timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncounterTimers {
    pub adaptation: Millis,
    pub morph: Millis,
    pub attack_pattern: Millis,
    pub combo: Millis,
}

pub struct BossEncounter {
    config: EncounterConfig,
    health: f32,
    max_health: f32,
    phase: u8,
    morph: MorphCycle,
    current_pattern: PatternChoice,
    pipeline: DamagePipeline,
    timers: EncounterTimers,
    morph_interval_ms: Millis,
    last_adapted_weapon: Option<WeaponId>,
    engine: PatternEngine,
    defeated: bool,
    destroyed: bool,
}

impl BossEncounter {
    /// Spawn a boss with an explicit morph list and resistance map
    pub fn new(config: EncounterConfig, morph_forms: Vec<MorphForm>, resistances: ResistanceMap) -> Result<Self> {
        config.validate()?;

        let engine = PatternEngine::new(config.spawn_position(), config.boss.arena, config.boss.seed);
        let morph = MorphCycle::new(morph_forms);
        tracing::info!(
            "Boss spawned: {} hp, {} morph forms, {} resisted weapons",
            config.boss.max_health,
            morph.len(),
            resistances.len()
        );

        Ok(Self {
            health: config.boss.max_health,
            max_health: config.boss.max_health,
            phase: 0,
            morph,
            current_pattern: PatternChoice::default(),
            pipeline: DamagePipeline::new(resistances, config.damage_multiplier),
            timers: EncounterTimers::default(),
            morph_interval_ms: config.timers.morph_interval_ms,
            last_adapted_weapon: None,
            engine,
            defeated: false,
            destroyed: false,
            config,
        })
    }

    /// Spawn a boss shaped by earlier runs
    pub fn from_history(config: EncounterConfig, history: &ProgressHistory) -> Result<Self> {
        Self::new(config, history.morph_forms(), history.resistance_map())
    }

    /// Advance the encounter by one tick
    ///
    /// The engine runs first (cooldowns, due tasks, effects, entities), then
    /// the four encounter timers. After defeat only the engine runs, so live
    /// entities can still resolve while the disarmed engine refuses attacks.
    pub fn update(&mut self, delta: Millis, mut player: Option<&mut (dyn PlayerAccessor + '_)>) {
        if self.destroyed {
            return;
        }
        self.engine.update(delta, player.as_deref_mut());
        if self.defeated {
            return;
        }

        self.timers.adaptation += delta;
        self.timers.morph += delta;
        self.timers.attack_pattern += delta;
        self.timers.combo += delta;

        if self.timers.adaptation >= self.config.timers.adaptation_interval_ms {
            self.timers.adaptation = 0;
            self.adapt(player.as_deref());
        }

        if self.timers.morph >= self.morph_interval_ms {
            self.timers.morph = 0;
            self.advance_morph();
        }

        if self.timers.attack_pattern >= self.config.timers.attack_pattern_interval_ms {
            self.timers.attack_pattern = 0;
            self.select_attack();
        }

        if self.timers.combo >= self.config.timers.combo_interval_ms {
            self.timers.combo = 0;
            self.engine.push_event(CombatEvent::ComboWindow);
        }
    }

    /// Record the player's weapon as the adaptation target when it changes
    ///
    /// Signal only: the resistance map is fixed for the whole encounter.
    fn adapt(&mut self, player: Option<&dyn PlayerAccessor>) {
        let Some(player) = player else {
            tracing::debug!("Adaptation skipped, no player");
            return;
        };
        let weapon = player.current_weapon();
        if self.last_adapted_weapon.as_ref() == Some(&weapon) {
            return;
        }
        tracing::debug!("Adapting to {}", weapon);
        self.last_adapted_weapon = Some(weapon.clone());
        self.engine.push_event(CombatEvent::AdaptationTarget { weapon });
    }

    fn advance_morph(&mut self) {
        let form = self.morph.advance();
        let pattern = form.recommended_pattern();
        // Final phase keeps randomizing over everything
        if self.current_pattern != PatternChoice::All {
            self.current_pattern = PatternChoice::Pattern(pattern);
        }
        tracing::info!("Morphed into {} ({}/{})", form, self.morph.index() + 1, self.morph.len());
        self.engine.push_event(CombatEvent::MorphChanged {
            form,
            index: self.morph.index(),
            pattern,
        });
    }

    /// Telegraph the current pattern and queue its gated execution
    fn select_attack(&mut self) {
        let pattern = match self.current_pattern {
            PatternChoice::Pattern(id) => id,
            PatternChoice::All => self.engine.random_pattern(),
        };
        if !self.engine.is_ready(pattern) {
            tracing::debug!("Skipping telegraph, {} still cooling down", pattern);
            return;
        }

        let lead_ms = self.config.timers.telegraph_lead_ms;
        self.engine.push_event(CombatEvent::Telegraph { pattern, lead_ms });
        self.engine.schedule(lead_ms, TaskAction::ExecutePattern(pattern));
    }

    /// Apply a hit from the player
    ///
    /// Resistance, the external multiplier and an active shield all reduce
    /// the hit. Every threshold crossed fires its phase transition once, in
    /// order. Hits after defeat or teardown are ignored.
    ///
    /// Cloak visibility is not applied here: `amount` is a hit that landed.
    /// Hosts decide whether a shot connects, using [`Self::hit_visibility`].
    pub fn take_damage(&mut self, amount: f32, weapon: &WeaponId) -> DamageOutcome {
        if self.destroyed || self.defeated {
            return DamageOutcome::none();
        }

        let shield = self.engine.effects().shield_reduction();
        let outcome = self.pipeline.compute(amount, weapon, shield);
        if outcome.resistance > 0.0 {
            self.engine.push_event(CombatEvent::ResistanceCue {
                weapon: weapon.clone(),
                resistance: outcome.resistance,
            });
        }

        self.health = (self.health - outcome.effective).max(0.0);
        self.engine.push_event(CombatEvent::DamageTaken {
            raw: outcome.raw,
            effective: outcome.effective,
            weapon: weapon.clone(),
        });

        let reached = phase_for_fraction(self.health_fraction());
        while self.phase < reached {
            self.on_phase_transition(self.phase + 1);
        }

        if self.health <= 0.0 {
            self.defeated = true;
            tracing::info!("Boss defeated at {} ms", self.engine.now());
            self.engine.push_event(CombatEvent::Defeated);
            self.engine.disarm();
        }

        outcome
    }

    /// Enter a later phase
    ///
    /// Sets the phase's default pattern and, on the final phase, shortens
    /// the morph interval. Returns false (and changes nothing) for a phase
    /// that is not ahead of the current one.
    pub fn on_phase_transition(&mut self, new_phase: u8) -> bool {
        if new_phase <= self.phase || new_phase > FINAL_PHASE {
            tracing::debug!("Ignoring transition to phase {} from {}", new_phase, self.phase);
            return false;
        }

        self.phase = new_phase;
        if let Some(choice) = phase_pattern(new_phase) {
            self.current_pattern = choice;
        }
        if new_phase == FINAL_PHASE {
            self.morph_interval_ms = self
                .morph_interval_ms
                .min(self.config.timers.final_phase_morph_interval_ms);
        }

        tracing::info!("Phase {} begins, pattern {}", new_phase, self.current_pattern);
        self.engine.push_event(CombatEvent::PhaseChanged {
            phase: new_phase,
            pattern: self.current_pattern,
        });
        true
    }

    /// Gated pattern execution for combo orchestrators
    ///
    /// Refused once the boss is defeated or destroyed.
    pub fn execute_pattern(&mut self, id: PatternId, player: Option<&dyn PlayerAccessor>) -> bool {
        if self.destroyed || self.defeated {
            return false;
        }
        self.engine.execute_pattern(id, player)
    }

    pub fn execute_pattern_by_name(&mut self, name: &str, player: Option<&dyn PlayerAccessor>) -> bool {
        if self.destroyed || self.defeated {
            return false;
        }
        self.engine.execute_pattern_by_name(name, player)
    }

    /// Tear down every effect and entity; idempotent
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.engine.destroy();
        self.engine.push_event(CombatEvent::Destroyed);
        tracing::info!("Boss destroyed");
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.engine.drain_events()
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn health_fraction(&self) -> f32 {
        self.health / self.max_health
    }

    pub fn phase_index(&self) -> u8 {
        self.phase
    }

    pub fn current_pattern(&self) -> PatternChoice {
        self.current_pattern
    }

    pub fn current_pattern_name(&self) -> &'static str {
        self.current_pattern.name()
    }

    pub fn current_morph_form(&self) -> MorphForm {
        self.morph.current()
    }

    pub fn morph_index(&self) -> usize {
        self.morph.index()
    }

    pub fn morph_forms(&self) -> &[MorphForm] {
        self.morph.forms()
    }

    pub fn morph_interval_ms(&self) -> Millis {
        self.morph_interval_ms
    }

    pub fn timers(&self) -> EncounterTimers {
        self.timers
    }

    pub fn last_adapted_weapon(&self) -> Option<&WeaponId> {
        self.last_adapted_weapon.as_ref()
    }

    pub fn resistances(&self) -> &ResistanceMap {
        self.pipeline.resistances()
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.pipeline.multiplier()
    }

    pub fn boss_position(&self) -> Vec2 {
        self.engine.position()
    }

    pub fn is_cloaked(&self) -> bool {
        self.engine.effects().cloak().is_some()
    }

    /// 1.0 normally, lower while cloaked
    pub fn hit_visibility(&self) -> f32 {
        self.engine.effects().visibility()
    }

    pub fn shield_strength(&self) -> f32 {
        self.engine.effects().shield_reduction()
    }

    pub fn cooldown_remaining(&self, id: PatternId) -> Millis {
        self.engine.cooldown_remaining(id)
    }

    pub fn active_effects(&self) -> &ActiveEffects {
        self.engine.effects()
    }

    pub fn entities(&self) -> &EntityArena {
        self.engine.entities()
    }

    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;
    use crate::player::DamageSource;

    struct Gunner {
        weapon: &'static str,
    }

    impl PlayerAccessor for Gunner {
        fn position(&self) -> Vec2 {
            Vec2::new(640.0, 600.0)
        }
        fn velocity(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn current_weapon(&self) -> WeaponId {
            WeaponId::from(self.weapon)
        }
        fn health_fraction(&self) -> f32 {
            1.0
        }
        fn shield_fraction(&self) -> f32 {
            0.0
        }
        fn apply_damage(&mut self, _amount: f32, _source: DamageSource) {}
    }

    fn boss() -> BossEncounter {
        BossEncounter::new(EncounterConfig::seeded(3), Vec::new(), ResistanceMap::new()).unwrap()
    }

    fn laser() -> WeaponId {
        WeaponId::from("laser")
    }

    fn phase_events(events: &[CombatEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::PhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_resisted_hit() {
        let resistances: ResistanceMap = [(laser(), 0.5)].into_iter().collect();
        let mut boss = BossEncounter::new(EncounterConfig::seeded(1), Vec::new(), resistances).unwrap();

        let outcome = boss.take_damage(100.0, &laser());
        assert_eq!(outcome.effective, 50.0);
        assert_eq!(boss.health(), 4950.0);
        assert!(boss
            .drain_events()
            .iter()
            .any(|e| matches!(e, CombatEvent::ResistanceCue { .. })));
    }

    #[test]
    fn test_phase_fires_once_per_threshold() {
        let mut boss = boss();
        boss.take_damage(1_000.0, &laser());
        boss.take_damage(10.0, &laser());
        boss.take_damage(10.0, &laser());

        assert_eq!(boss.phase_index(), 1);
        assert_eq!(phase_events(&boss.drain_events()), vec![1]);
        assert_eq!(boss.current_pattern(), PatternChoice::Pattern(PatternId::Beam));
    }

    #[test]
    fn test_big_hit_walks_every_phase() {
        let mut boss = boss();
        boss.take_damage(2_750.0, &laser());

        assert_eq!(boss.phase_index(), 2);
        assert_eq!(boss.current_pattern_name(), "drones");
        assert_eq!(phase_events(&boss.drain_events()), vec![1, 2]);
    }

    #[test]
    fn test_final_phase_shortens_morph() {
        let mut boss = boss();
        boss.take_damage(4_100.0, &laser());

        assert_eq!(boss.phase_index(), FINAL_PHASE);
        assert_eq!(boss.current_pattern(), PatternChoice::All);
        assert_eq!(boss.morph_interval_ms(), 8_000);
    }

    #[test]
    fn test_manual_transition_never_goes_back() {
        let mut boss = boss();
        assert!(boss.on_phase_transition(3));
        assert!(!boss.on_phase_transition(2));
        assert!(!boss.on_phase_transition(3));
        assert!(!boss.on_phase_transition(5));
        assert_eq!(boss.phase_index(), 3);
    }

    #[test]
    fn test_defeat_reported_once() {
        let mut boss = boss();
        boss.take_damage(10_000.0, &laser());
        boss.take_damage(10.0, &laser());

        assert!(boss.is_defeated());
        assert_eq!(boss.health(), 0.0);
        let defeats = boss
            .drain_events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::Defeated))
            .count();
        assert_eq!(defeats, 1);
    }

    #[test]
    fn test_shield_absorbs_damage() {
        let mut boss = boss();
        assert!(boss.execute_pattern(PatternId::Shield, None));
        let outcome = boss.take_damage(100.0, &laser());
        assert!((outcome.effective - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_morph_cycles_with_list_length() {
        let forms = vec![MorphForm::Phantom, MorphForm::Apex];
        let mut boss = BossEncounter::new(EncounterConfig::seeded(2), forms, ResistanceMap::new()).unwrap();

        boss.update(15_000, None);
        assert_eq!(boss.current_morph_form(), MorphForm::Apex);
        boss.update(15_000, None);
        assert_eq!(boss.morph_index(), 0);
        assert_eq!(boss.current_morph_form(), MorphForm::Phantom);
    }

    #[test]
    fn test_morph_sets_recommended_pattern() {
        let mut boss = boss();
        boss.update(15_000, None);
        assert_eq!(boss.current_morph_form(), MorphForm::Swarmer);
        assert_eq!(boss.current_pattern(), PatternChoice::Pattern(PatternId::Drones));
    }

    #[test]
    fn test_adaptation_records_weapon_changes() {
        let mut boss = boss();
        let mut player = Gunner { weapon: "laser" };
        boss.update(5_000, Some(&mut player));
        assert_eq!(boss.last_adapted_weapon(), Some(&laser()));

        player.weapon = "rocket";
        boss.update(5_000, Some(&mut player));
        assert_eq!(boss.last_adapted_weapon(), Some(&WeaponId::from("rocket")));
        let targets = boss
            .drain_events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::AdaptationTarget { .. }))
            .count();
        assert_eq!(targets, 2);
        assert!(boss.resistances().is_empty());
    }

    #[test]
    fn test_attack_timer_telegraphs_then_executes() {
        let mut boss = boss();
        let mut player = Gunner { weapon: "laser" };
        boss.update(3_000, Some(&mut player));
        let events = boss.drain_events();
        assert!(events.contains(&CombatEvent::Telegraph {
            pattern: PatternId::Adaptive,
            lead_ms: 800,
        }));
        assert!(!events.iter().any(|e| matches!(e, CombatEvent::PatternExecuted { .. })));

        boss.update(800, Some(&mut player));
        assert!(boss.drain_events().contains(&CombatEvent::PatternExecuted {
            pattern: PatternId::Adaptive,
            at: 3_800,
        }));
    }

    #[test]
    fn test_combo_window() {
        let mut boss = boss();
        boss.update(10_000, None);
        assert!(boss.drain_events().contains(&CombatEvent::ComboWindow));
    }

    #[test]
    fn test_destroy_tears_everything_down() {
        let mut boss = boss();
        boss.execute_pattern(PatternId::Cloak, None);
        boss.execute_pattern(PatternId::Mines, None);
        boss.destroy();
        boss.destroy();

        assert!(boss.is_destroyed());
        assert!(!boss.active_effects().is_active(EffectKind::Cloak));
        assert_eq!(boss.hit_visibility(), 1.0);
        assert!(boss.entities().iter().all(|(_, e)| !e.active));
        assert!(!boss.execute_pattern(PatternId::Spread, None));
        assert_eq!(boss.take_damage(100.0, &laser()), DamageOutcome::none());
    }
}

//! Pattern engine: cooldown gate, effect slots, entity arena, task queue
//!
//! The engine owns everything a pattern leaves behind. Each frame the host
//! calls [`PatternEngine::update`] with the elapsed time and the player; the
//! engine then advances cooldowns, runs due tasks, ticks effects and sweeps
//! the arena, in that order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::{direction_from_degrees, ArenaBounds, EntityHandle, Millis, Vec2};
use crate::effects::ActiveEffects;
use crate::entities::{resolve_blast, Detonation, EntityArena, SpawnedEntity, TerminationCause};
use crate::events::{CombatEvent, EffectEndReason};
use crate::patterns::executors;
use crate::patterns::scheduler::{TaskAction, TaskQueue};
use crate::patterns::PatternId;
use crate::player::{DamageSource, PlayerAccessor};

pub struct PatternEngine {
    now: Millis,
    cooldowns: [Millis; PatternId::COUNT],
    executions: [u32; PatternId::COUNT],
    effects: ActiveEffects,
    entities: EntityArena,
    tasks: TaskQueue,
    position: Vec2,
    arena: ArenaBounds,
    rng: ChaCha8Rng,
    events: Vec<CombatEvent>,
    alive: bool,
    armed: bool,
}

impl PatternEngine {
    /// Create an engine for a boss standing at `position`
    ///
    /// A seed makes every random choice (relocation, scatter, final-phase
    /// picks) reproducible; `None` seeds from the OS.
    pub fn new(position: Vec2, arena: ArenaBounds, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            now: 0,
            cooldowns: [0; PatternId::COUNT],
            executions: [0; PatternId::COUNT],
            effects: ActiveEffects::new(),
            entities: EntityArena::new(),
            tasks: TaskQueue::new(),
            position: arena.clamp(position),
            arena,
            rng,
            events: Vec::new(),
            alive: true,
            armed: true,
        }
    }

    /// Run a pattern if it is off cooldown
    ///
    /// Returns whether the pattern ran. A pattern on cooldown, or any call
    /// after the engine was disarmed or torn down, is a silent no-op.
    pub fn execute_pattern(&mut self, id: PatternId, player: Option<&dyn PlayerAccessor>) -> bool {
        if !self.alive || !self.armed {
            tracing::debug!("Ignoring {}, engine disarmed", id);
            return false;
        }
        let remaining = self.cooldowns[id.index()];
        if remaining > 0 {
            tracing::debug!("{} on cooldown ({} ms left)", id, remaining);
            return false;
        }

        self.run_pattern(id, player);
        self.cooldowns[id.index()] = id.cooldown_ms();
        true
    }

    /// Name-keyed entry point for scripted callers
    ///
    /// Unknown names are logged and ignored.
    pub fn execute_pattern_by_name(&mut self, name: &str, player: Option<&dyn PlayerAccessor>) -> bool {
        match name.parse::<PatternId>() {
            Ok(id) => self.execute_pattern(id, player),
            Err(err) => {
                tracing::warn!("{}", err);
                false
            }
        }
    }

    /// Execute without consulting or touching the cooldown (cloak ambushes)
    pub(crate) fn run_pattern(&mut self, id: PatternId, player: Option<&dyn PlayerAccessor>) {
        if !self.armed {
            return;
        }
        tracing::debug!("Executing {} at {} ms", id, self.now);
        (id.executor())(self, player);
        self.executions[id.index()] += 1;
        self.events.push(CombatEvent::PatternExecuted {
            pattern: id,
            at: self.now,
        });
    }

    /// Advance the engine by `delta` milliseconds
    pub fn update(&mut self, delta: Millis, mut player: Option<&mut (dyn PlayerAccessor + '_)>) {
        if !self.alive {
            return;
        }

        for cooldown in &mut self.cooldowns {
            *cooldown = cooldown.saturating_sub(delta);
        }
        self.now += delta;

        self.run_due_tasks(player.as_deref_mut());

        let tick = self.effects.update(self.now, player.as_deref_mut(), &mut self.events);
        for _ in 0..tick.ambushes {
            tracing::debug!("Cloak ambush");
            self.run_pattern(PatternId::PhaseShift, player.as_deref());
        }

        self.sweep_entities(delta, player);
    }

    fn run_due_tasks(&mut self, mut player: Option<&mut (dyn PlayerAccessor + '_)>) {
        while let Some(task) = self.tasks.pop_due(self.now) {
            if !self.alive {
                return;
            }
            if !self.armed && !matches!(task.action, TaskAction::DetonateFuse(_)) {
                tracing::debug!("Dropping {:?}, engine disarmed", task.action);
                continue;
            }
            match task.action {
                TaskAction::ExecutePattern(id) => {
                    self.execute_pattern(id, player.as_deref());
                }
                TaskAction::SpreadShot { direction_deg } => {
                    executors::fire_spread_shot(self, direction_deg);
                }
                TaskAction::ArtilleryShot { shot } => {
                    executors::fire_artillery_shot(self, player.as_deref(), shot);
                }
                TaskAction::ThrowBomb { shot } => {
                    executors::throw_bomb(self, player.as_deref(), shot);
                }
                TaskAction::Relocate => {
                    executors::relocate(self, player.as_deref());
                }
                TaskAction::DetonateFuse(handle) => {
                    if self.entities.is_live(handle) {
                        self.terminate_entity(handle, TerminationCause::Fuse, player.as_deref_mut());
                    } else {
                        tracing::debug!("Fuse for {:?} skipped, bomb already gone", handle);
                    }
                }
            }
        }
    }

    /// Advance every live entity, apply what it did to the player, then
    /// drop finished ones and add newly spawned ones
    fn sweep_entities(&mut self, delta: Millis, mut player: Option<&mut (dyn PlayerAccessor + '_)>) {
        let now = self.now;
        let mut contacts = Vec::new();
        let mut ended = Vec::new();
        let mut spawns = Vec::new();

        {
            let view = player.as_deref();
            for (handle, entity) in self.entities.iter_mut() {
                if !entity.active {
                    continue;
                }
                let step = entity.advance(now, delta, view);
                spawns.extend(step.spawns);
                if let Some(damage) = step.contact_damage {
                    contacts.push((entity.kind, damage));
                }
                if let Some(cause) = step.terminate {
                    let blast = entity.terminate(cause);
                    ended.push((handle, entity.kind, cause, blast));
                }
            }
        }

        for (kind, amount) in contacts {
            if let Some(target) = player.as_deref_mut() {
                let source = DamageSource::Impact(kind);
                target.apply_damage(amount, source);
                self.events.push(CombatEvent::PlayerHit { amount, source });
            }
        }

        for (handle, kind, cause, blast) in ended {
            self.events.push(CombatEvent::EntityTerminated { handle, kind, cause });
            if let Some(blast) = blast {
                self.resolve_detonation(blast, player.as_deref_mut());
            }
        }

        let removed = self.entities.sweep();
        if removed > 0 {
            tracing::trace!("Swept {} entities", removed);
        }

        for entity in spawns {
            self.spawn(entity);
        }
    }

    fn terminate_entity(
        &mut self,
        handle: EntityHandle,
        cause: TerminationCause,
        player: Option<&mut (dyn PlayerAccessor + '_)>,
    ) -> bool {
        let Some(entity) = self.entities.get_mut(handle) else {
            return false;
        };
        if !entity.active {
            return false;
        }
        let kind = entity.kind;
        let blast = entity.terminate(cause);

        self.events.push(CombatEvent::EntityTerminated { handle, kind, cause });
        if let Some(blast) = blast {
            self.resolve_detonation(blast, player);
        }
        true
    }

    fn resolve_detonation(&mut self, blast: Detonation, player: Option<&mut (dyn PlayerAccessor + '_)>) {
        let mut dealt = 0.0;
        if let Some(target) = player.filter(|p| p.is_alive()) {
            if let Some(hit) = resolve_blast(blast.position, blast.radius, blast.damage, target.position()) {
                let source = DamageSource::Explosion(blast.kind);
                target.apply_damage(hit.damage, source);
                target.apply_knockback(hit.knockback);
                self.events.push(CombatEvent::PlayerHit {
                    amount: hit.damage,
                    source,
                });
                dealt = hit.damage;
            }
        }

        tracing::debug!(
            "{:?} detonated at ({:.0}, {:.0}), {:.1} damage dealt",
            blast.kind,
            blast.position.x,
            blast.position.y,
            dealt
        );
        self.events.push(CombatEvent::Detonation {
            kind: blast.kind,
            position: blast.position,
            radius: blast.radius,
            damage_dealt: dealt,
        });

        for _ in 0..blast.secondary_bursts {
            let angle = self.rng.gen_range(0.0..360.0);
            let distance = self.rng.gen_range(0.0..blast.radius.max(1.0));
            let at = blast.position + direction_from_degrees(angle) * distance;
            self.spawn(SpawnedEntity::burst(at, self.now));
        }
    }

    /// Player-side destruction of a spawned entity (shooting down a drone)
    ///
    /// Destroyed entities never detonate. Returns false for stale handles.
    pub fn destroy_entity(&mut self, handle: EntityHandle) -> bool {
        self.terminate_entity(handle, TerminationCause::Destroyed, None)
    }

    /// Stop attacking for good (boss defeated)
    ///
    /// Effects end, queued attacks and follow-up shots are dropped and every
    /// later pattern call is refused. Entities already in the arena keep
    /// running and resolve normally, fuses included.
    pub fn disarm(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.effects.clear(EffectEndReason::Defeated, &mut self.events);
        tracing::info!("Pattern engine disarmed at {} ms", self.now);
    }

    /// Tear everything down; safe to call more than once
    ///
    /// Effects are expired, entities force-terminated without detonating,
    /// and the task queue goes quiet. Later updates are no-ops.
    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.effects.clear(EffectEndReason::Destroyed, &mut self.events);

        let mut ended = Vec::new();
        for (handle, entity) in self.entities.iter_mut() {
            if entity.active {
                entity.terminate(TerminationCause::Forced);
                ended.push((handle, entity.kind));
            }
        }
        for (handle, kind) in ended {
            self.events.push(CombatEvent::EntityTerminated {
                handle,
                kind,
                cause: TerminationCause::Forced,
            });
        }
        tracing::info!("Pattern engine torn down at {} ms", self.now);
    }

    pub(crate) fn spawn(&mut self, entity: SpawnedEntity) -> EntityHandle {
        let kind = entity.kind;
        let position = entity.position;
        let handle = self.entities.insert(entity);
        self.events.push(CombatEvent::EntitySpawned { handle, kind, position });
        handle
    }

    /// Queue an action `delay` milliseconds from now
    pub(crate) fn schedule(&mut self, delay: Millis, action: TaskAction) {
        self.tasks.schedule(self.now + delay, action);
    }

    pub(crate) fn set_position(&mut self, position: Vec2) -> Vec2 {
        let from = self.position;
        self.position = self.arena.clamp(position);
        self.events.push(CombatEvent::BossRelocated {
            from,
            to: self.position,
        });
        self.position
    }

    pub(crate) fn effects_and_events(&mut self) -> (&mut ActiveEffects, &mut Vec<CombatEvent>) {
        (&mut self.effects, &mut self.events)
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub(crate) fn push_event(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Pick any pattern uniformly (final-phase selection)
    pub(crate) fn random_pattern(&mut self) -> PatternId {
        PatternId::ALL[self.rng.gen_range(0..PatternId::COUNT)]
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn arena(&self) -> ArenaBounds {
        self.arena
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn cooldown_remaining(&self, id: PatternId) -> Millis {
        self.cooldowns[id.index()]
    }

    /// False once [`PatternEngine::disarm`] or [`PatternEngine::destroy`] ran
    pub fn is_armed(&self) -> bool {
        self.alive && self.armed
    }

    pub fn is_ready(&self, id: PatternId) -> bool {
        self.is_armed() && self.cooldowns[id.index()] == 0
    }

    /// How many times a pattern has actually run (ambushes included)
    pub fn execution_count(&self, id: PatternId) -> u32 {
        self.executions[id.index()]
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn entities(&self) -> &EntityArena {
        &self.entities
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }
}

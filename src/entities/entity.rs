//! Spawned entities and their per-tick lifecycle
//!
//! Every entity follows the same contract: born at a simulation time, lives
//! for a fixed span, terminates exactly once. What termination does depends
//! on the kind - plain shots just vanish, explosives detonate.

use serde::{Deserialize, Serialize};

use crate::core::types::{Millis, Vec2};
use crate::entities::constants::*;
use crate::entities::detonation::Detonation;
use crate::player::PlayerAccessor;

/// What an entity is, for collaborators and damage attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Projectile,
    DroneShot,
    Drone,
    Mine,
    Bomb,
    /// Secondary explosion scattered by a bomb
    Burst,
    ArtilleryShell,
}

impl EntityKind {
    /// Does this kind explode when it ends naturally?
    pub fn is_explosive(self) -> bool {
        matches!(
            self,
            EntityKind::Mine | EntityKind::Bomb | EntityKind::Burst | EntityKind::ArtilleryShell
        )
    }
}

/// Why an entity ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// Lifespan elapsed
    Expired,
    /// Touched the player
    Impact,
    /// Player entered the trigger radius (mines)
    Proximity,
    /// Fuse burned down (bombs)
    Fuse,
    /// Shot down or otherwise destroyed by the player
    Destroyed,
    /// Boss torn down
    Forced,
}

impl TerminationCause {
    /// Causes that set off explosives; destruction and teardown do not
    pub fn detonates(self) -> bool {
        !matches!(self, TerminationCause::Destroyed | TerminationCause::Forced)
    }
}

/// Repeating fire timer owned by a drone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireLoop {
    pub interval_ms: Millis,
    pub elapsed_ms: Millis,
}

impl FireLoop {
    pub fn new(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0,
        }
    }

    /// Advance; true once per elapsed interval
    pub fn advance(&mut self, delta: Millis) -> bool {
        self.elapsed_ms += delta;
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            true
        } else {
            false
        }
    }
}

/// Kind-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Flies in a straight line
    Projectile,
    /// Homes on the player and fires while its loop is attached
    Drone { fire_loop: Option<FireLoop> },
    /// Sits still until the player comes close
    Mine,
    /// Lobbed toward a landing point, fuse handled by the scheduler
    Bomb { landing: Vec2 },
    Burst,
    /// Travels to a predicted impact point
    ArtilleryShell { impact_point: Vec2 },
}

/// Result of advancing one entity by one tick
#[derive(Debug, Clone, Default)]
pub struct EntityStep {
    /// Termination requested this tick
    pub terminate: Option<TerminationCause>,
    /// Direct damage to the player from contact
    pub contact_damage: Option<f32>,
    /// New entities to add after the sweep (drone shots)
    pub spawns: Vec<SpawnedEntity>,
}

/// An entity owned by the pattern engine's arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub kind: EntityKind,
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    pub damage: f32,
    pub lifespan_ms: Millis,
    pub born_at: Millis,
    pub explosion_radius: Option<f32>,
    /// Trigger radius (mines only)
    pub proximity_radius: Option<f32>,
    pub active: bool,
    /// Set by termination; never cleared
    pub terminated: Option<TerminationCause>,
    pub behavior: Behavior,
}

impl SpawnedEntity {
    fn base(kind: EntityKind, position: Vec2, damage: f32, lifespan_ms: Millis, now: Millis, behavior: Behavior) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            damage,
            lifespan_ms,
            born_at: now,
            explosion_radius: None,
            proximity_radius: None,
            active: true,
            terminated: None,
            behavior,
        }
    }

    /// Plain shot flying along `direction`
    pub fn projectile(position: Vec2, direction: Vec2, damage: f32, now: Millis) -> Self {
        let mut shot = Self::base(
            EntityKind::Projectile,
            position,
            damage,
            PROJECTILE_LIFESPAN_MS,
            now,
            Behavior::Projectile,
        );
        shot.velocity = direction.normalize_or_zero() * PROJECTILE_SPEED;
        shot
    }

    /// Weak shot fired by a drone
    pub fn drone_shot(position: Vec2, direction: Vec2, now: Millis) -> Self {
        let mut shot = Self::base(
            EntityKind::DroneShot,
            position,
            DRONE_SHOT_DAMAGE,
            PROJECTILE_LIFESPAN_MS,
            now,
            Behavior::Projectile,
        );
        shot.velocity = direction.normalize_or_zero() * DRONE_SHOT_SPEED;
        shot
    }

    /// Pursuit drone; all of its damage goes through the shots it fires
    pub fn drone(position: Vec2, now: Millis) -> Self {
        Self::base(
            EntityKind::Drone,
            position,
            0.0,
            DRONE_LIFESPAN_MS,
            now,
            Behavior::Drone {
                fire_loop: Some(FireLoop::new(DRONE_FIRE_INTERVAL_MS)),
            },
        )
    }

    pub fn mine(position: Vec2, now: Millis) -> Self {
        let mut mine = Self::base(EntityKind::Mine, position, MINE_DAMAGE, MINE_LIFESPAN_MS, now, Behavior::Mine);
        mine.explosion_radius = Some(MINE_EXPLOSION_RADIUS);
        mine.proximity_radius = Some(MINE_PROXIMITY_RADIUS);
        mine
    }

    /// Bomb thrown from `position` toward `landing`
    pub fn bomb(position: Vec2, landing: Vec2, now: Millis) -> Self {
        let mut bomb = Self::base(
            EntityKind::Bomb,
            position,
            BOMB_DAMAGE,
            BOMB_LIFESPAN_MS,
            now,
            Behavior::Bomb { landing },
        );
        bomb.velocity = (landing - position).normalize_or_zero() * BOMB_SPEED;
        bomb.explosion_radius = Some(BOMB_EXPLOSION_RADIUS);
        bomb
    }

    pub fn burst(position: Vec2, now: Millis) -> Self {
        let mut burst = Self::base(EntityKind::Burst, position, BURST_DAMAGE, BURST_FUSE_MS, now, Behavior::Burst);
        burst.explosion_radius = Some(BURST_RADIUS);
        burst
    }

    /// Shell that reaches `impact_point` after `flight_ms`
    pub fn artillery_shell(origin: Vec2, impact_point: Vec2, flight_ms: Millis, now: Millis) -> Self {
        let mut shell = Self::base(
            EntityKind::ArtilleryShell,
            origin,
            ARTILLERY_DAMAGE,
            flight_ms,
            now,
            Behavior::ArtilleryShell { impact_point },
        );
        let secs = (flight_ms.max(1)) as f32 / 1000.0;
        shell.velocity = (impact_point - origin) / secs;
        shell.explosion_radius = Some(ARTILLERY_EXPLOSION_RADIUS);
        shell
    }

    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.born_at)
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        self.age(now) >= self.lifespan_ms
    }

    /// Whether a drone still holds its fire loop
    pub fn has_fire_loop(&self) -> bool {
        matches!(self.behavior, Behavior::Drone { fire_loop: Some(_) })
    }

    /// Advance one tick: move, run behaviour, decide whether to terminate
    ///
    /// Only one termination cause is reported per tick; behaviour triggers
    /// (contact, proximity) take precedence over lifespan expiry.
    pub fn advance(&mut self, now: Millis, delta: Millis, player: Option<&dyn PlayerAccessor>) -> EntityStep {
        let mut step = EntityStep::default();
        if !self.active {
            return step;
        }

        let dt = delta as f32 / 1000.0;
        let target = player.filter(|p| p.is_alive()).map(|p| p.position());

        match &mut self.behavior {
            Behavior::Projectile => {
                self.position += self.velocity * dt;
                if let Some(target) = target {
                    if self.position.distance(target) <= CONTACT_RADIUS {
                        step.contact_damage = Some(self.damage);
                        step.terminate = Some(TerminationCause::Impact);
                    }
                }
            }
            Behavior::Drone { fire_loop } => {
                // No target: hold position and skip firing
                if let Some(target) = target {
                    let to_target = target - self.position;
                    let distance = to_target.length();
                    if distance > DRONE_HOLD_DISTANCE {
                        let travel = (DRONE_SPEED * dt).min(distance - DRONE_HOLD_DISTANCE);
                        self.position += to_target.normalize_or_zero() * travel;
                    }
                    if let Some(fire_loop) = fire_loop.as_mut() {
                        if fire_loop.advance(delta) {
                            step.spawns.push(SpawnedEntity::drone_shot(self.position, target - self.position, now));
                        }
                    }
                }
            }
            Behavior::Mine => {
                if let (Some(target), Some(trigger)) = (target, self.proximity_radius) {
                    if self.position.distance(target) < trigger {
                        step.terminate = Some(TerminationCause::Proximity);
                    }
                }
            }
            Behavior::Bomb { landing } => {
                let remaining = *landing - self.position;
                let travel = BOMB_SPEED * dt;
                if remaining.length() <= travel {
                    self.position = *landing;
                    self.velocity = Vec2::ZERO;
                } else {
                    self.position += self.velocity * dt;
                }
            }
            Behavior::Burst => {}
            Behavior::ArtilleryShell { impact_point } => {
                let remaining = *impact_point - self.position;
                let travel = self.velocity.length() * dt;
                if remaining.length() <= travel {
                    self.position = *impact_point;
                } else {
                    self.position += self.velocity * dt;
                }
                if let Some(target) = target {
                    if self.position.distance(target) <= CONTACT_RADIUS {
                        step.terminate = Some(TerminationCause::Impact);
                    }
                }
            }
        }

        if step.terminate.is_none() && self.is_expired(now) {
            step.terminate = Some(TerminationCause::Expired);
        }

        step
    }

    /// End this entity; runs at most once
    ///
    /// Releases any attached fire loop and returns the explosion to resolve,
    /// if the kind and cause call for one.
    pub fn terminate(&mut self, cause: TerminationCause) -> Option<Detonation> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.terminated = Some(cause);
        self.velocity = Vec2::ZERO;

        if let Behavior::Drone { fire_loop } = &mut self.behavior {
            fire_loop.take();
        }

        if !(self.kind.is_explosive() && cause.detonates()) {
            return None;
        }

        Some(Detonation {
            kind: self.kind,
            position: self.position,
            radius: self.explosion_radius.unwrap_or(0.0),
            damage: self.damage,
            secondary_bursts: if self.kind == EntityKind::Bomb {
                BOMB_SECONDARY_COUNT
            } else {
                0
            },
        })
    }
}

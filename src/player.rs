//! The player as seen by the boss
//!
//! The engine never owns the player. Each entry point borrows it through
//! [`PlayerAccessor`] for the duration of the call, and any entry point may
//! be handed `None` when the player is unreachable (dead, respawning,
//! between scenes). Behaviours that need the player then hold or skip.

use serde::{Deserialize, Serialize};

use crate::core::types::{Vec2, WeaponId};
use crate::entities::EntityKind;

/// What dealt damage to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    /// Continuous beam tick
    Beam,
    /// Direct hit by a spawned entity (projectile, drone shot, shell)
    Impact(EntityKind),
    /// Area damage from a detonation
    Explosion(EntityKind),
}

/// Interface the host game implements for its player
pub trait PlayerAccessor {
    fn position(&self) -> Vec2;

    /// Current velocity in units per second (used for lead prediction)
    fn velocity(&self) -> Vec2;

    fn current_weapon(&self) -> WeaponId;

    /// Health as a fraction of maximum (0.0 to 1.0)
    fn health_fraction(&self) -> f32;

    /// Shield as a fraction of maximum (0.0 to 1.0)
    fn shield_fraction(&self) -> f32;

    fn is_alive(&self) -> bool {
        self.health_fraction() > 0.0
    }

    fn apply_damage(&mut self, amount: f32, source: DamageSource);

    /// Push the player; hosts without physics may ignore it
    fn apply_knockback(&mut self, _impulse: Vec2) {}
}

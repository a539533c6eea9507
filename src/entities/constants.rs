//! Spawned-entity constants - all tunable values in one place
//!
//! Distances are arena units, speeds are units per second, times are ms.

use crate::core::types::Millis;

// Contact
pub const CONTACT_RADIUS: f32 = 20.0;
pub const KNOCKBACK_FORCE: f32 = 300.0;

// Plain projectiles
pub const PROJECTILE_SPEED: f32 = 300.0;
pub const PROJECTILE_LIFESPAN_MS: Millis = 3_000;
pub const SPREAD_SHOT_DAMAGE: f32 = 10.0;
pub const FAN_SHOT_DAMAGE: f32 = 12.0;

// Drones
pub const DRONE_SPEED: f32 = 120.0;
pub const DRONE_LIFESPAN_MS: Millis = 8_000;
pub const DRONE_FIRE_INTERVAL_MS: Millis = 1_000;
pub const DRONE_HOLD_DISTANCE: f32 = 60.0;
pub const DRONE_ORBIT_RADIUS: f32 = 80.0;
pub const DRONE_SHOT_DAMAGE: f32 = 5.0;
pub const DRONE_SHOT_SPEED: f32 = 250.0;

// Mines
pub const MINE_PROXIMITY_RADIUS: f32 = 80.0;
pub const MINE_LIFESPAN_MS: Millis = 5_000;
pub const MINE_DAMAGE: f32 = 30.0;
pub const MINE_EXPLOSION_RADIUS: f32 = 100.0;
pub const MINE_MIN_RING: f32 = 100.0;
pub const MINE_MAX_RING: f32 = 200.0;

// Bombs
pub const BOMB_FUSE_MS: Millis = 1_000;
pub const BOMB_LIFESPAN_MS: Millis = 1_500;
pub const BOMB_DAMAGE: f32 = 40.0;
pub const BOMB_EXPLOSION_RADIUS: f32 = 120.0;
pub const BOMB_SPEED: f32 = 400.0;
pub const BOMB_SECONDARY_COUNT: u32 = 5;
pub const BURST_DAMAGE: f32 = 10.0;
pub const BURST_RADIUS: f32 = 40.0;
pub const BURST_FUSE_MS: Millis = 150;

// Artillery
pub const ARTILLERY_DAMAGE: f32 = 50.0;
pub const ARTILLERY_EXPLOSION_RADIUS: f32 = 90.0;
pub const ARTILLERY_SHELL_SPEED: f32 = 350.0;
pub const ARTILLERY_MIN_FLIGHT_MS: Millis = 400;

//! Pattern shape constants (counts, angles, delays)

use crate::core::types::Millis;

/// Facing used when no player is known (+Y, down the screen)
pub const DEFAULT_FACING_DEG: f32 = 90.0;

// Adaptive
pub const ADAPTIVE_LOW_HEALTH: f32 = 0.3;
pub const ADAPTIVE_HIGH_SHIELD: f32 = 0.7;
pub const FAN_SHOT_COUNT: i32 = 5;
pub const FAN_STEP_DEG: f32 = 10.0;

// Phase shift
pub const PHASE_SHIFT_LEAD_MS: Millis = 300;
pub const PHASE_SHIFT_MIN_RADIUS: f32 = 150.0;
pub const PHASE_SHIFT_MAX_RADIUS: f32 = 250.0;

// Artillery
pub const ARTILLERY_SHOT_COUNT: u32 = 3;
pub const ARTILLERY_STAGGER_MS: Millis = 500;

// Spread
pub const SPREAD_SHOT_COUNT: u32 = 7;
pub const SPREAD_ARC_DEG: f32 = 120.0;
pub const SPREAD_STAGGER_MS: Millis = 50;

// Bombs
pub const BOMB_COUNT: u32 = 3;
pub const BOMB_STAGGER_MS: Millis = 500;
/// Random scatter around the player's position
pub const BOMB_SCATTER: f32 = 40.0;
/// Throw distance when no player is known
pub const BOMB_BLIND_RANGE: f32 = 150.0;

// Drones
pub const DRONE_COUNT: u32 = 3;
pub const DRONE_SPACING_DEG: f32 = 120.0;

// Mines
pub const MINE_COUNT: u32 = 5;

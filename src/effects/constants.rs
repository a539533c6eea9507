//! Active-effect tuning

use crate::core::types::Millis;

// Beam
pub const BEAM_DURATION_MS: Millis = 3_000;
pub const BEAM_DAMAGE_INTERVAL_MS: Millis = 100;
pub const BEAM_DAMAGE_PER_TICK: f32 = 4.0;

// Shield
pub const SHIELD_DURATION_MS: Millis = 5_000;
/// Fraction of incoming damage the shield absorbs
pub const SHIELD_STRENGTH: f32 = 0.7;
pub const SHIELD_RADIUS: f32 = 120.0;

// Cloak
pub const CLOAK_DURATION_MS: Millis = 5_000;
pub const CLOAK_AMBUSH_INTERVAL_MS: Millis = 1_000;
/// Hit visibility while cloaked (1.0 = fully visible)
pub const CLOAK_VISIBILITY: f32 = 0.25;

//! Damage pipeline constants

/// Highest resistance any weapon may reach (the boss always takes some damage)
pub const MAX_RESISTANCE: f32 = 0.9;

/// Resistance granted per unit of usage share when deriving from weapon stats
///
/// A weapon used for every shot in prior runs ends up at 0.5 resistance.
pub const USAGE_RESISTANCE_SCALE: f32 = 0.5;

/// Usage shares below this produce no resistance at all
pub const MIN_USAGE_SHARE: f32 = 0.1;

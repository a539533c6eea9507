//! Damage intake pipeline
//!
//! `effective = amount * (1 - resistance[weapon]) * multiplier * (1 - shield)`
//!
//! Pure computation. The encounter owns one pipeline and feeds it the shield
//! strength of whatever shield effect is active at the time of the hit.

use serde::{Deserialize, Serialize};

use crate::combat::resistance::ResistanceMap;
use crate::core::types::WeaponId;

/// Breakdown of a single hit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Damage as dealt by the player
    pub raw: f32,
    /// Fraction resisted by weapon adaptation
    pub resistance: f32,
    /// Fraction absorbed by an active shield
    pub shield_reduction: f32,
    /// Damage actually removed from health
    pub effective: f32,
}

impl DamageOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn was_resisted(&self) -> bool {
        self.resistance > 0.0
    }
}

/// Combines resistance lookup with the external difficulty multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagePipeline {
    resistances: ResistanceMap,
    multiplier: f32,
}

impl DamagePipeline {
    pub fn new(resistances: ResistanceMap, multiplier: f32) -> Self {
        Self {
            resistances,
            multiplier: sanitize_multiplier(multiplier),
        }
    }

    pub fn resistances(&self) -> &ResistanceMap {
        &self.resistances
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Compute the damage a hit actually deals
    ///
    /// `shield_reduction` is the strength of the active shield (0.0 when none).
    pub fn compute(&self, amount: f32, weapon: &WeaponId, shield_reduction: f32) -> DamageOutcome {
        let raw = amount.max(0.0);
        let resistance = self.resistances.get(weapon);
        let shield_reduction = shield_reduction.clamp(0.0, 1.0);
        let effective = raw * (1.0 - resistance) * self.multiplier * (1.0 - shield_reduction);

        DamageOutcome {
            raw,
            resistance,
            shield_reduction,
            effective,
        }
    }
}

fn sanitize_multiplier(multiplier: f32) -> f32 {
    if multiplier.is_finite() {
        multiplier.max(0.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(resistance: f32, multiplier: f32) -> DamagePipeline {
        let map: ResistanceMap = [(WeaponId::from("laser"), resistance)].into_iter().collect();
        DamagePipeline::new(map, multiplier)
    }

    #[test]
    fn test_half_resistance_halves_damage() {
        let outcome = pipeline(0.5, 1.0).compute(100.0, &"laser".into(), 0.0);
        assert_eq!(outcome.effective, 50.0);
        assert!(outcome.was_resisted());
    }

    #[test]
    fn test_unresisted_weapon_full_damage() {
        let outcome = pipeline(0.5, 1.0).compute(100.0, &"rocket".into(), 0.0);
        assert_eq!(outcome.effective, 100.0);
        assert!(!outcome.was_resisted());
    }

    #[test]
    fn test_multiplier_applies_after_resistance() {
        let outcome = pipeline(0.5, 1.5).compute(100.0, &"laser".into(), 0.0);
        assert_eq!(outcome.effective, 75.0);
    }

    #[test]
    fn test_shield_reduction_stacks() {
        let outcome = pipeline(0.5, 1.0).compute(100.0, &"laser".into(), 0.7);
        assert!((outcome.effective - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let p = pipeline(0.0, -3.0);
        assert_eq!(p.multiplier(), 0.0);
        assert_eq!(p.compute(-20.0, &"laser".into(), 0.0).effective, 0.0);
    }
}

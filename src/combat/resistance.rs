//! Per-weapon damage resistance
//!
//! Resistances are fractions of incoming damage the boss ignores, keyed by
//! the weapon that dealt it. They are computed from cross-run history before
//! the encounter starts and stay fixed for the encounter.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::constants::MAX_RESISTANCE;
use crate::core::types::WeaponId;

/// Weapon id -> resisted fraction in `[0, MAX_RESISTANCE]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResistanceMap {
    fractions: AHashMap<WeaponId, f32>,
}

impl ResistanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a weapon's resistance, clamped into the valid range
    pub fn insert(&mut self, weapon: WeaponId, fraction: f32) {
        self.fractions.insert(weapon, clamp_resistance(fraction));
    }

    /// Resisted fraction for a weapon (0.0 when unknown)
    pub fn get(&self, weapon: &WeaponId) -> f32 {
        self.fractions.get(weapon).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeaponId, f32)> {
        self.fractions.iter().map(|(w, f)| (w, *f))
    }

    /// Weapon with the highest resistance, if any is above zero
    pub fn strongest(&self) -> Option<(&WeaponId, f32)> {
        self.iter()
            .filter(|(_, f)| *f > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    }
}

impl FromIterator<(WeaponId, f32)> for ResistanceMap {
    fn from_iter<I: IntoIterator<Item = (WeaponId, f32)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (weapon, fraction) in iter {
            map.insert(weapon, fraction);
        }
        map
    }
}

fn clamp_resistance(fraction: f32) -> f32 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, MAX_RESISTANCE)
}

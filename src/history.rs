//! Cross-run progress consumed at boss creation
//!
//! The host persists which bosses were defeated and how the player fights.
//! This module turns that record into the two inputs the encounter needs:
//! the morph form list and the per-weapon resistance map.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::boss::morph::{MorphCycle, MorphForm};
use crate::combat::constants::{MIN_USAGE_SHARE, USAGE_RESISTANCE_SCALE};
use crate::combat::resistance::ResistanceMap;
use crate::core::error::Result;
use crate::core::types::WeaponId;

/// Persisted progress from earlier runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressHistory {
    /// Ids of bosses defeated in earlier runs
    pub defeated_bosses: Vec<String>,
    /// Precomputed resistance fractions; take precedence over usage stats
    pub weapon_resistances: AHashMap<WeaponId, f32>,
    /// Shots fired per weapon across earlier runs
    pub weapon_usage: AHashMap<WeaponId, u64>,
}

impl ProgressHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Morph forms in canonical order, with Apex always last
    ///
    /// Unknown boss ids are skipped. With no recognised history the default
    /// three-form cycle is used.
    pub fn morph_forms(&self) -> Vec<MorphForm> {
        let mut forms: BTreeSet<MorphForm> = BTreeSet::new();
        for id in &self.defeated_bosses {
            match id.parse::<MorphForm>() {
                Ok(MorphForm::Apex) => {}
                Ok(form) => {
                    forms.insert(form);
                }
                Err(_) => tracing::debug!("Ignoring unknown defeated boss '{}'", id),
            }
        }

        if forms.is_empty() {
            return MorphCycle::default_forms();
        }

        let mut forms: Vec<MorphForm> = forms.into_iter().collect();
        forms.push(MorphForm::Apex);
        forms
    }

    /// Resistance map for the encounter
    ///
    /// Explicit fractions win. Otherwise each weapon resists in proportion to
    /// its share of historical usage, so the favoured weapon is punished most.
    pub fn resistance_map(&self) -> ResistanceMap {
        if !self.weapon_resistances.is_empty() {
            return self
                .weapon_resistances
                .iter()
                .map(|(w, f)| (w.clone(), *f))
                .collect();
        }

        let total: u64 = self.weapon_usage.values().sum();
        if total == 0 {
            return ResistanceMap::new();
        }

        self.weapon_usage
            .iter()
            .filter_map(|(weapon, count)| {
                let share = *count as f32 / total as f32;
                (share >= MIN_USAGE_SHARE).then(|| (weapon.clone(), share * USAGE_RESISTANCE_SCALE))
            })
            .collect()
    }

    /// Weapon the player used most, if any
    pub fn favourite_weapon(&self) -> Option<&WeaponId> {
        self.weapon_usage
            .iter()
            .filter(|(_, count)| **count > 0)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(weapon, _)| weapon)
    }
}

/// Load progress history from a JSON file
pub fn load_history(path: &Path) -> Result<ProgressHistory> {
    let contents = fs::read_to_string(path)?;
    let history = serde_json::from_str(&contents)?;
    Ok(history)
}

//! Morph forms derived from prior runs
//!
//! Every boss the player defeated in earlier runs becomes a form the final
//! boss can take. Forms cycle on a timer independently of phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::NemesisError;
use crate::patterns::PatternId;

/// A boss identity the final boss can morph into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphForm {
    Sentinel,
    Swarmer,
    Bombardier,
    Phantom,
    Warden,
    Sapper,
    /// Fixed last form, always present
    Apex,
}

impl MorphForm {
    /// Forms used when no history exists
    pub const DEFAULT_CYCLE: [MorphForm; 3] = [MorphForm::Sentinel, MorphForm::Swarmer, MorphForm::Bombardier];

    /// Pattern this form favours
    pub fn recommended_pattern(self) -> PatternId {
        match self {
            MorphForm::Sentinel => PatternId::Beam,
            MorphForm::Swarmer => PatternId::Drones,
            MorphForm::Bombardier => PatternId::Bombs,
            MorphForm::Phantom => PatternId::Cloak,
            MorphForm::Warden => PatternId::Shield,
            MorphForm::Sapper => PatternId::Mines,
            MorphForm::Apex => PatternId::Adaptive,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MorphForm::Sentinel => "sentinel",
            MorphForm::Swarmer => "swarmer",
            MorphForm::Bombardier => "bombardier",
            MorphForm::Phantom => "phantom",
            MorphForm::Warden => "warden",
            MorphForm::Sapper => "sapper",
            MorphForm::Apex => "apex",
        }
    }
}

impl fmt::Display for MorphForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MorphForm {
    type Err = NemesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" => Ok(MorphForm::Sentinel),
            "swarmer" => Ok(MorphForm::Swarmer),
            "bombardier" => Ok(MorphForm::Bombardier),
            "phantom" => Ok(MorphForm::Phantom),
            "warden" => Ok(MorphForm::Warden),
            "sapper" => Ok(MorphForm::Sapper),
            "apex" => Ok(MorphForm::Apex),
            _ => Err(NemesisError::UnknownMorphForm(s.to_string())),
        }
    }
}

/// Cyclic sequence of forms; never empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphCycle {
    forms: Vec<MorphForm>,
    index: usize,
}

impl MorphCycle {
    /// Build a cycle; an empty list falls back to the default forms plus Apex
    pub fn new(forms: Vec<MorphForm>) -> Self {
        let forms = if forms.is_empty() {
            Self::default_forms()
        } else {
            forms
        };
        Self { forms, index: 0 }
    }

    pub fn default_forms() -> Vec<MorphForm> {
        let mut forms = MorphForm::DEFAULT_CYCLE.to_vec();
        forms.push(MorphForm::Apex);
        forms
    }

    pub fn current(&self) -> MorphForm {
        self.forms[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn forms(&self) -> &[MorphForm] {
        &self.forms
    }

    /// Move to the next form, wrapping around
    pub fn advance(&mut self) -> MorphForm {
        self.index = (self.index + 1) % self.forms.len();
        self.current()
    }
}

impl Default for MorphCycle {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

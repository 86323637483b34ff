//! Covering options.

use serde::{Deserialize, Serialize};

use crate::error::EnumerationError;

/// How choices left open by the greedy merge are filled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DontCareFill {
    /// First level of each open factor, first branch of each open union.
    #[default]
    FirstLevel,
    /// Per-row ChaCha8 draws seeded from `seed + row`.
    Seeded { seed: u64 },
}

/// Everything that determines a covering subset for a given tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CoveringOptions {
    pub strength: usize,
    pub fill: DontCareFill,
}

impl Default for CoveringOptions {
    fn default() -> Self {
        Self {
            strength: 2,
            fill: DontCareFill::FirstLevel,
        }
    }
}

impl CoveringOptions {
    pub fn with_strength(strength: usize) -> Self {
        Self {
            strength,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EnumerationError> {
        if self.strength < 1 {
            return Err(EnumerationError::InvalidStrength(self.strength));
        }
        Ok(())
    }
}

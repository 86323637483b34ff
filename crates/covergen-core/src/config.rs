//! Harness configuration.
//!
//! Every field has a default, so a partial JSON document is enough:
//! `{"strength": 3, "parallel": true}`.

use covergen_explore::{CoveringOptions, DontCareFill};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// What the harness does when a case fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing case in emission order.
    #[default]
    AbortOnFirst,
    /// Record failures and keep going until `max_failures`.
    Record,
}

/// Configuration for a single harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Covering strength.
    pub strength: usize,
    /// How open choices are filled when selecting cases.
    pub fill: DontCareFill,
    pub failure_policy: FailurePolicy,
    /// Maximum cases to execute; `None` runs the whole sequence.
    pub max_cases: Option<u64>,
    /// Maximum failures recorded before stopping (prevents runaway on a badly broken unit).
    pub max_failures: u32,
    /// Run each chunk of cases on the rayon pool.
    pub parallel: bool,
    /// Dedicated pool size; `None` uses the global rayon pool.
    pub threads: Option<usize>,
    /// Cases decoded and tested per parallel batch.
    pub chunk_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            strength: 2,
            fill: DontCareFill::FirstLevel,
            failure_policy: FailurePolicy::AbortOnFirst,
            max_cases: None,
            max_failures: 100,
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

impl HarnessConfig {
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| HarnessError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        self.covering_options().validate()?;
        if self.chunk_size == 0 {
            return Err(HarnessError::Config("chunk_size must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(HarnessError::Config("threads must be at least 1".into()));
        }
        if self.max_failures == 0 {
            return Err(HarnessError::Config("max_failures must be at least 1".into()));
        }
        Ok(())
    }

    pub fn covering_options(&self) -> CoveringOptions {
        CoveringOptions {
            strength: self.strength,
            fill: self.fill,
        }
    }
}

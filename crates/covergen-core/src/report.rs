//! Run reports.

use serde::{Deserialize, Serialize};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every case in the sequence was executed.
    Complete,
    /// `max_cases` was reached first.
    CaseLimitReached,
    /// `max_failures` was reached first.
    FailureLimitReached,
}

/// One failing case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Position in emission order, from zero.
    pub ordinal: u64,
    /// Reproduction token.
    pub token: String,
    pub message: String,
    /// `Debug` rendering of the case.
    pub case: String,
}

/// Outcome of a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub executed: u64,
    pub failures: Vec<FailureRecord>,
    pub stop_reason: StopReason,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

//! Execution harness for covering test-case sequences.
//!
//! Drives a [`CaseSpace`]'s covering subset through a caller-supplied test
//! function, sequentially or on a rayon pool, and reports each failure with
//! the token that reproduces it.

pub mod config;
pub mod error;
pub mod harness;
pub mod report;

pub use config::{FailurePolicy, HarnessConfig};
pub use covergen_explore::{CaseSpace, CoveringOptions, DontCareFill};
pub use error::HarnessError;
pub use harness::Harness;
pub use report::{FailureRecord, RunReport, StopReason};

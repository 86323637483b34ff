//! Strength-N covering enumeration over factory trees.
//!
//! Given a factory tree and a strength `N`, selects identifiers whose cases
//! jointly realize every combination of levels for any `N` mutually
//! compatible factors:
//! 1. Enumerate compatible factor sets of size `N` (plus smaller maximal ones).
//! 2. Expand each set into target tuples, one per level combination.
//! 3. Greedily merge targets into partial rows.
//! 4. Fill each row's open choices and encode it as an identifier.
//!
//! [`CaseSpace`] owns a tree, caches its covering subsets and exposes them
//! as lazy, restartable sequences of cases.

pub mod error;
pub mod options;
pub mod solver;
pub mod space;
pub mod subset;

pub use error::EnumerationError;
pub use options::{CoveringOptions, DontCareFill};
pub use solver::coverage::{audit_covering, covering_subset, CoverageReport};
pub use solver::Target;
pub use space::{CaseSpace, Cases};
pub use subset::{CoveringSubset, Identifiers};

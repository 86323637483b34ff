//! Covering subsets and their identifier sequences.

use std::sync::Arc;

use covergen_factory::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// The identifiers selected for one covering request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoveringSubset {
    /// The whole domain, `0..size`, never materialized.
    Exhaustive { size: BigUint },
    /// Merged rows, in creation order.
    Selected { identifiers: Vec<BigUint> },
}

impl CoveringSubset {
    pub fn len(&self) -> BigUint {
        match self {
            Self::Exhaustive { size } => size.clone(),
            Self::Selected { identifiers } => BigUint::from(identifiers.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len().is_zero()
    }

    pub fn is_exhaustive(&self) -> bool {
        matches!(self, Self::Exhaustive { .. })
    }
}

/// Lazy walk over a shared [`CoveringSubset`].
///
/// Cloning yields an independent cursor; [`Identifiers::rewind`] restarts
/// the walk from the first identifier.
#[derive(Debug, Clone)]
pub struct Identifiers {
    subset: Arc<CoveringSubset>,
    cursor: BigUint,
}

impl Identifiers {
    pub fn new(subset: Arc<CoveringSubset>) -> Self {
        Self {
            subset,
            cursor: BigUint::zero(),
        }
    }

    pub fn rewind(&mut self) {
        self.cursor = BigUint::zero();
    }

    /// Identifiers not yet yielded.
    pub fn remaining(&self) -> BigUint {
        let total = self.subset.len();
        if self.cursor >= total {
            return BigUint::zero();
        }
        total - &self.cursor
    }
}

impl Iterator for Identifiers {
    type Item = BigUint;

    fn next(&mut self) -> Option<BigUint> {
        let identifier = match self.subset.as_ref() {
            CoveringSubset::Exhaustive { size } => {
                if &self.cursor >= size {
                    return None;
                }
                self.cursor.clone()
            }
            CoveringSubset::Selected { identifiers } => {
                identifiers.get(self.cursor.to_usize()?)?.clone()
            }
        };
        self.cursor += 1u32;
        Some(identifier)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().to_usize() {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::MAX, None),
        }
    }
}

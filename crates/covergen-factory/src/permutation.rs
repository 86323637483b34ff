//! Permutation engine: rank <-> permutation via the factorial number system.
//!
//! A rank in `[0, n!)` is split by descending factorials into a Lehmer
//! code `d_0 .. d_{n-1}` with `d_k < n - k`. Each digit indexes the list of
//! candidates not yet placed, so the code converts to a permutation by
//! successive removal. The mapping is a bijection.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::FactoryError;

/// A reordering of `len()` items: position `i` of the output takes input `indices[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// The identity permutation over `n` items.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Build from explicit indices. Returns `None` unless `indices` is a
    /// permutation of `0..indices.len()`.
    pub fn from_indices(indices: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; indices.len()];
        for &index in &indices {
            if index >= seen.len() || seen[index] {
                return None;
            }
            seen[index] = true;
        }
        Some(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Reorder `items`, which must have exactly `len()` elements.
    pub fn apply<T>(&self, items: Vec<T>) -> Result<Vec<T>, FactoryError> {
        if items.len() != self.indices.len() {
            return Err(FactoryError::PermutationLength {
                expected: self.indices.len(),
                actual: items.len(),
            });
        }
        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        Ok(self
            .indices
            .iter()
            .filter_map(|&index| slots[index].take())
            .collect())
    }
}

/// `n!`
pub fn rank_count(n: usize) -> BigUint {
    (2..=n).fold(BigUint::one(), |acc, k| acc * k)
}

/// Lehmer code of `rank` for permutations of `n` items.
pub fn lehmer_code(n: usize, rank: &BigUint) -> Result<Vec<usize>, FactoryError> {
    let count = rank_count(n);
    if *rank >= count {
        return Err(FactoryError::out_of_range(rank, &count));
    }
    let mut rest = rank.clone();
    let mut code = Vec::with_capacity(n);
    // Walk the factorials downwards: (n-1)!, (n-2)!, ..., 0!.
    let mut weight = if n == 0 { BigUint::one() } else { rank_count(n - 1) };
    for k in 0..n {
        let digit = &rest / &weight;
        rest %= &weight;
        code.push(digit.to_usize().unwrap_or(0));
        let remaining = n - k - 1;
        if remaining > 0 {
            weight /= remaining;
        }
    }
    Ok(code)
}

/// Rank of a Lehmer code; inverse of [`lehmer_code`].
pub fn rank_from_lehmer(code: &[usize]) -> BigUint {
    let n = code.len();
    let mut rank = BigUint::zero();
    for (k, &digit) in code.iter().enumerate() {
        let radix = n - k;
        rank = rank * radix + digit;
    }
    rank
}

/// Decode `rank` in `[0, n!)` into its permutation of `0..n`.
pub fn permutation_at(n: usize, rank: &BigUint) -> Result<Permutation, FactoryError> {
    let code = lehmer_code(n, rank)?;
    let mut candidates: Vec<usize> = (0..n).collect();
    let indices = code
        .into_iter()
        .map(|digit| candidates.remove(digit))
        .collect();
    Ok(Permutation { indices })
}

/// Rank of a permutation; inverse of [`permutation_at`].
pub fn rank_of(permutation: &Permutation) -> BigUint {
    let mut candidates: Vec<usize> = (0..permutation.len()).collect();
    let code: Vec<usize> = permutation
        .indices
        .iter()
        .map(|index| {
            let digit = candidates.partition_point(|candidate| candidate < index);
            candidates.remove(digit);
            digit
        })
        .collect();
    rank_from_lehmer(&code)
}

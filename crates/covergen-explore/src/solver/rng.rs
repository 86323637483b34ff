//! Per-row RNG seeding with ChaCha8.
//!
//! Each merged row gets its own ChaCha8Rng seeded from
//! `(seed + row_index)`. Same seed -> same identifiers, always.

use covergen_factory::{DontCare, FactorId, FirstChoice};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::options::DontCareFill;

/// Create a deterministic RNG for a given seed and row index.
pub fn row_rng(seed: u64, row: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(row))
}

/// Fills open choices with seeded draws.
#[derive(Debug, Clone)]
pub struct SeededFill {
    rng: ChaCha8Rng,
}

impl SeededFill {
    pub fn new(seed: u64, row: u64) -> Self {
        Self {
            rng: row_rng(seed, row),
        }
    }
}

impl DontCare for SeededFill {
    fn level(&mut self, _factor: FactorId, levels: usize) -> usize {
        if levels <= 1 {
            return 0;
        }
        self.rng.gen_range(0..levels)
    }

    fn branch(&mut self, _node: usize, branches: usize) -> usize {
        if branches <= 1 {
            return 0;
        }
        self.rng.gen_range(0..branches)
    }
}

/// The filler for one row under `fill`.
pub fn filler(fill: &DontCareFill, row: usize) -> Box<dyn DontCare> {
    match fill {
        DontCareFill::FirstLevel => Box::new(FirstChoice),
        DontCareFill::Seeded { seed } => Box::new(SeededFill::new(*seed, row as u64)),
    }
}

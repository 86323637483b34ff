//! Target tuples: every level combination of a factor set.

use covergen_factory::{FactorId, Layout};

use super::Target;

/// Level combinations of `factors` in odometer order, last factor fastest.
pub fn targets_for_set(layout: &Layout, factors: &[FactorId]) -> SetTargets {
    let radices: Vec<usize> = factors
        .iter()
        .map(|factor| layout.factor(*factor).levels)
        .collect();
    let exhausted = radices.iter().any(|&levels| levels == 0);
    SetTargets {
        factors: factors.to_vec(),
        counters: vec![0; factors.len()],
        radices,
        exhausted,
    }
}

/// Number of targets a factor set expands to.
pub fn target_count(layout: &Layout, factors: &[FactorId]) -> usize {
    factors
        .iter()
        .map(|factor| layout.factor(*factor).levels)
        .product()
}

/// Lazy iterator returned by [`targets_for_set`].
#[derive(Debug, Clone)]
pub struct SetTargets {
    factors: Vec<FactorId>,
    counters: Vec<usize>,
    radices: Vec<usize>,
    exhausted: bool,
}

impl Iterator for SetTargets {
    type Item = Target;

    fn next(&mut self) -> Option<Target> {
        if self.exhausted {
            return None;
        }
        let target = Target {
            choices: self
                .factors
                .iter()
                .copied()
                .zip(self.counters.iter().copied())
                .collect(),
        };

        // Advance, carrying leftwards.
        self.exhausted = true;
        for position in (0..self.counters.len()).rev() {
            self.counters[position] += 1;
            if self.counters[position] < self.radices[position] {
                self.exhausted = false;
                break;
            }
            self.counters[position] = 0;
        }
        Some(target)
    }
}

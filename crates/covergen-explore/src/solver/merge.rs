//! Greedy merge of targets into rows.
//!
//! Targets are taken set by set, each set in odometer order. A target some
//! row already realizes is skipped. Otherwise it joins the compatible row
//! that already fixes the most of its choices; among those, the row where
//! it completes the most still-uncovered targets; the earliest row after
//! that. With no compatible row a new row is opened.

use std::collections::HashSet;

use covergen_factory::{FactorId, Layout};

use super::targets::targets_for_set;
use super::{Row, Target};

/// Merge the targets of every set in `sets`, returning rows in creation order.
pub fn merge_targets(layout: &Layout, sets: &[Vec<FactorId>]) -> Vec<Row> {
    let mut merger = Merger::new(layout, sets);
    for set in sets {
        for target in targets_for_set(layout, set) {
            merger.add(target);
        }
    }
    merger.into_rows()
}

/// Incremental merge state over a fixed list of factor sets.
pub struct Merger<'a> {
    layout: &'a Layout,
    sets: &'a [Vec<FactorId>],
    /// Indices into `sets` of the sets holding each factor.
    sets_by_factor: Vec<Vec<usize>>,
    /// Targets of `sets` realized by the fixed choices of some row.
    covered: HashSet<Target>,
    rows: Vec<Row>,
}

impl<'a> Merger<'a> {
    pub fn new(layout: &'a Layout, sets: &'a [Vec<FactorId>]) -> Self {
        let mut sets_by_factor = vec![Vec::new(); layout.factors().len()];
        for (index, set) in sets.iter().enumerate() {
            for factor in set {
                sets_by_factor[factor.0].push(index);
            }
        }
        Self {
            layout,
            sets,
            sets_by_factor,
            covered: HashSet::new(),
            rows: Vec::new(),
        }
    }

    pub fn add(&mut self, target: Target) {
        if self.covered.contains(&target) {
            return;
        }

        let mut best: Option<(usize, (usize, usize))> = None;
        for (index, row) in self.rows.iter().enumerate() {
            let Some(matched) = row.overlap(self.layout, &target) else {
                continue;
            };
            if matched == target.len() {
                return;
            }
            let score = (matched, self.gain(row, &target));
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        let index = match best {
            Some((index, _)) => index,
            None => {
                self.rows.push(Row::new(self.layout));
                self.rows.len() - 1
            }
        };
        self.absorb(index, &target);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Uncovered targets `row` would realize once `target` joins it.
    fn gain(&self, row: &Row, target: &Target) -> usize {
        self.touched_sets(row, target)
            .into_iter()
            .filter_map(|set| project(&self.sets[set], row.levels(), Some(target)))
            .filter(|projected| !self.covered.contains(projected))
            .count()
    }

    fn absorb(&mut self, index: usize, target: &Target) {
        let touched = self.touched_sets(&self.rows[index], target);
        self.rows[index].absorb(self.layout, target);
        for set in touched {
            if let Some(projected) = project(&self.sets[set], self.rows[index].levels(), None) {
                self.covered.insert(projected);
            }
        }
    }

    /// Sets holding a factor that `target` would newly fix in `row`.
    fn touched_sets(&self, row: &Row, target: &Target) -> Vec<usize> {
        let mut touched: Vec<usize> = target
            .choices
            .iter()
            .filter(|(factor, _)| row.levels()[factor.0].is_none())
            .flat_map(|(factor, _)| self.sets_by_factor[factor.0].iter().copied())
            .collect();
        touched.sort_unstable();
        touched.dedup();
        touched
    }
}

/// The target of `set` fixed by `levels`, with `overlay` taking precedence.
fn project(set: &[FactorId], levels: &[Option<usize>], overlay: Option<&Target>) -> Option<Target> {
    let choices = set
        .iter()
        .map(|&factor| {
            let level = overlay
                .and_then(|target| {
                    target
                        .choices
                        .iter()
                        .find(|(fixed, _)| *fixed == factor)
                        .map(|&(_, level)| level)
                })
                .or(levels[factor.0])?;
            Some((factor, level))
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Target { choices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::factor_sets::required_sets;
    use covergen_factory::Shape;

    fn flat(levels: &[usize]) -> Layout {
        Layout::compile(&Shape::Product {
            children: levels
                .iter()
                .map(|&levels| Shape::Level { levels })
                .collect(),
            permutation_len: None,
        })
        .unwrap()
    }

    fn merged(layout: &Layout, strength: usize) -> Vec<Row> {
        merge_targets(layout, &required_sets(layout, strength))
    }

    #[test]
    fn test_strength_one_needs_widest_factor_rows() {
        let layout = flat(&[3, 2]);
        let rows = merged(&layout, 1);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].levels(), &[Some(0), Some(0)]);
        assert_eq!(rows[1].levels(), &[Some(1), Some(1)]);
        assert_eq!(rows[2].levels(), &[Some(2), None]);
    }

    #[test]
    fn test_covered_target_is_skipped() {
        let layout = flat(&[2, 2]);
        let sets = vec![vec![FactorId(0), FactorId(1)]];
        let t = |a: usize, b: usize| Target {
            choices: vec![(FactorId(0), a), (FactorId(1), b)],
        };
        let mut merger = Merger::new(&layout, &sets);
        merger.add(t(0, 0));
        merger.add(t(0, 0));
        merger.add(t(1, 1));
        assert_eq!(merger.rows().len(), 2);
    }

    #[test]
    fn test_equal_overlap_prefers_the_larger_gain() {
        let layout = flat(&[2, 2, 2]);
        let sets = required_sets(&layout, 2);
        let target = |choices: &[(usize, usize)]| Target {
            choices: choices
                .iter()
                .map(|&(factor, level)| (FactorId(factor), level))
                .collect(),
        };
        let mut merger = Merger::new(&layout, &sets);
        merger.add(target(&[(0, 0), (1, 0)]));
        merger.add(target(&[(0, 0), (1, 1)]));
        // Realizes f1=0,f2=1, which row 0 would otherwise complete.
        merger.add(target(&[(0, 1), (1, 0), (2, 1)]));

        // Both open rows match f0=0; only row 1 completes two new targets.
        merger.add(target(&[(0, 0), (2, 1)]));
        let rows = merger.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].levels(), &[Some(0), Some(0), None]);
        assert_eq!(rows[1].levels(), &[Some(0), Some(1), Some(1)]);
    }

    #[test]
    fn test_pairwise_three_binary_factors_is_compact() {
        // A strength-2 covering array for three binary factors needs 4 rows.
        let layout = flat(&[2, 2, 2]);
        let rows = merged(&layout, 2);
        assert!(rows.len() <= 6, "got {} rows", rows.len());
        assert!(rows.len() >= 4);
    }

    #[test]
    fn test_pairwise_packing_stays_near_optimum() {
        // Optimal pairwise arrays: 9 rows for 3^4, 6 rows for 2^10.
        let rows = merged(&flat(&[3, 3, 3, 3]), 2);
        assert!((9..=14).contains(&rows.len()), "got {} rows", rows.len());

        let rows = merged(&flat(&[2; 10]), 2);
        assert!((6..=14).contains(&rows.len()), "got {} rows", rows.len());
    }
}

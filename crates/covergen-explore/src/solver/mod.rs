pub mod coverage;
pub mod factor_sets;
pub mod merge;
pub mod rng;
pub mod targets;

use covergen_factory::{FactorId, Layout};
use serde::Serialize;

/// A combination of levels for mutually compatible factors that some
/// covering case must realize. Choices are sorted by factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Target {
    pub choices: Vec<(FactorId, usize)>,
}

impl Target {
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A partial assignment under construction by the greedy merge.
///
/// Tracks the level fixed for each factor and the branch each union is
/// committed to by those levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    levels: Vec<Option<usize>>,
    branches: Vec<Option<usize>>,
}

impl Row {
    pub fn new(layout: &Layout) -> Self {
        Self {
            levels: vec![None; layout.factors().len()],
            branches: vec![None; layout.node_count()],
        }
    }

    /// Level assignment indexed by factor.
    pub fn levels(&self) -> &[Option<usize>] {
        &self.levels
    }

    /// `None` if `target` conflicts with this row, otherwise how many of its
    /// choices the row already fixes.
    pub fn overlap(&self, layout: &Layout, target: &Target) -> Option<usize> {
        let mut matched = 0;
        for &(factor, level) in &target.choices {
            match self.levels[factor.0] {
                Some(fixed) if fixed == level => matched += 1,
                Some(_) => return None,
                None => {
                    let path = &layout.factor(factor).branch_path;
                    let conflict = path.iter().any(|&(node, branch)| {
                        self.branches[node].is_some_and(|taken| taken != branch)
                    });
                    if conflict {
                        return None;
                    }
                }
            }
        }
        Some(matched)
    }

    /// Fix every choice of `target`. The caller must have checked `overlap`.
    pub fn absorb(&mut self, layout: &Layout, target: &Target) {
        for &(factor, level) in &target.choices {
            self.levels[factor.0] = Some(level);
            for &(node, branch) in &layout.factor(factor).branch_path {
                self.branches[node] = Some(branch);
            }
        }
    }
}

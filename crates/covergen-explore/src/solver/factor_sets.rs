//! Compatible factor sets.
//!
//! A set of factors is compatible when no two of them sit under different
//! branches of one union, i.e. some case can fix all of them at once. Sets
//! are built bottom-up and capped at the strength:
//! - a factor contributes `{}` and `{f}`;
//! - a product combines one set from each part;
//! - a union offers the non-empty sets of any single branch, plus `{}`.
//!
//! A set is maximal when no further factor can join it.

use covergen_factory::{FactorId, Layout, LayoutNode};

/// A compatible set of factors, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorSet {
    pub factors: Vec<FactorId>,
    pub maximal: bool,
}

impl FactorSet {
    fn empty(maximal: bool) -> Self {
        Self {
            factors: Vec::new(),
            maximal,
        }
    }

    fn single(factor: FactorId) -> Self {
        Self {
            factors: vec![factor],
            maximal: true,
        }
    }
}

/// Every compatible set of at most `cap` factors under `node`.
pub fn compatible_sets(layout: &Layout, node: usize, cap: usize) -> Vec<FactorSet> {
    match layout.node(node) {
        LayoutNode::Factor { factor } => leaf_sets(*factor),
        LayoutNode::Product {
            children,
            digits,
            unit,
            ..
        } => {
            let mut acc = vec![FactorSet::empty(true)];
            for child in children {
                acc = combine(&acc, &compatible_sets(layout, *child, cap), cap);
            }
            for factor in digits.iter().chain(unit) {
                acc = combine(&acc, &leaf_sets(*factor), cap);
            }
            acc
        }
        LayoutNode::Union { branches, .. } => {
            let mut sets = vec![FactorSet::empty(branches.is_empty())];
            for branch in branches {
                sets.extend(
                    compatible_sets(layout, *branch, cap)
                        .into_iter()
                        .filter(|set| !set.factors.is_empty()),
                );
            }
            sets
        }
    }
}

/// The factor sets whose level combinations a strength-`strength`
/// covering must realize: every compatible set of exactly `strength`
/// factors, plus every maximal compatible set smaller than that.
///
/// Returned in lexicographic order of factor ids.
pub fn required_sets(layout: &Layout, strength: usize) -> Vec<Vec<FactorId>> {
    let mut sets: Vec<Vec<FactorId>> = compatible_sets(layout, layout.root(), strength)
        .into_iter()
        .filter(|set| {
            !set.factors.is_empty() && (set.factors.len() == strength || set.maximal)
        })
        .map(|set| set.factors)
        .collect();
    sets.sort();
    sets
}

/// Size of the largest compatible factor set under `node`.
pub fn widest_compatible(layout: &Layout, node: usize) -> usize {
    match layout.node(node) {
        LayoutNode::Factor { .. } => 1,
        LayoutNode::Product {
            children,
            digits,
            unit,
            ..
        } => {
            children
                .iter()
                .map(|child| widest_compatible(layout, *child))
                .sum::<usize>()
                + digits.len()
                + usize::from(unit.is_some())
        }
        LayoutNode::Union { branches, .. } => branches
            .iter()
            .map(|branch| widest_compatible(layout, *branch))
            .max()
            .unwrap_or(0),
    }
}

fn leaf_sets(factor: FactorId) -> Vec<FactorSet> {
    vec![FactorSet::empty(false), FactorSet::single(factor)]
}

fn combine(left: &[FactorSet], right: &[FactorSet], cap: usize) -> Vec<FactorSet> {
    let mut out = Vec::new();
    for a in left {
        for b in right {
            if a.factors.len() + b.factors.len() > cap {
                continue;
            }
            let mut factors = a.factors.clone();
            factors.extend_from_slice(&b.factors);
            out.push(FactorSet {
                factors,
                maximal: a.maximal && b.maximal,
            });
        }
    }
    out
}

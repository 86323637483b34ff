//! Strength-N covering selection and audit.
//!
//! [`covering_subset`] runs the full pipeline over a compiled layout:
//! required factor sets, target tuples, greedy merge, don't-care fill.
//! [`audit_covering`] checks any identifier list against the same targets.

use std::collections::HashSet;

use covergen_factory::{BigUint, ChoicePoint, FactorId, Layout};
use serde::Serialize;
use tracing::{debug, info};

use super::factor_sets::{required_sets, widest_compatible};
use super::merge::merge_targets;
use super::rng::filler;
use super::targets::{target_count, targets_for_set};
use super::Target;
use crate::error::EnumerationError;
use crate::options::CoveringOptions;
use crate::subset::CoveringSubset;

/// Result of auditing identifiers against the strength-N targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Targets required at this strength.
    pub total_targets: usize,
    /// Targets realized by at least one identifier.
    pub covered: usize,
    /// Targets no identifier realizes, in target order.
    pub missing: Vec<Target>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Select identifiers whose cases realize every strength-N target.
pub fn covering_subset(
    layout: &Layout,
    options: &CoveringOptions,
) -> Result<CoveringSubset, EnumerationError> {
    options.validate()?;

    let widest = widest_compatible(layout, layout.root());
    if options.strength >= widest {
        info!(
            strength = options.strength,
            widest,
            size = %layout.size(),
            "strength covers every factor, enumerating whole domain"
        );
        return Ok(CoveringSubset::Exhaustive {
            size: layout.size().clone(),
        });
    }

    let sets = required_sets(layout, options.strength);
    let total_targets: usize = sets.iter().map(|set| target_count(layout, set)).sum();
    debug!(
        strength = options.strength,
        factors = layout.factors().len(),
        sets = sets.len(),
        total_targets,
        "expanding covering targets"
    );

    let rows = merge_targets(layout, &sets);

    // Distinct rows can fill out to the same case; keep the first.
    let mut seen = HashSet::new();
    let mut identifiers = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let mut fill = filler(&options.fill, index);
        let identifier = layout.encode(row.levels(), fill.as_mut())?;
        if seen.insert(identifier.clone()) {
            identifiers.push(identifier);
        }
    }

    info!(
        strength = options.strength,
        total_targets,
        rows = rows.len(),
        selected = identifiers.len(),
        size = %layout.size(),
        "covering subset selected"
    );
    Ok(CoveringSubset::Selected { identifiers })
}

/// Check which strength-N targets `identifiers` realize.
pub fn audit_covering<'a, I>(
    layout: &Layout,
    strength: usize,
    identifiers: I,
) -> Result<CoverageReport, EnumerationError>
where
    I: IntoIterator<Item = &'a BigUint>,
{
    CoveringOptions::with_strength(strength).validate()?;
    let sets = required_sets(layout, strength);

    let mut covered: HashSet<Target> = HashSet::new();
    for identifier in identifiers {
        let mut levels: Vec<Option<usize>> = vec![None; layout.factors().len()];
        for choice in layout.decode(identifier)? {
            if let ChoicePoint::Level { factor, level } = choice {
                levels[factor.0] = Some(level);
            }
        }
        for set in &sets {
            if let Some(target) = project(&levels, set) {
                covered.insert(target);
            }
        }
    }

    let mut total_targets = 0;
    let mut missing = Vec::new();
    for set in &sets {
        for target in targets_for_set(layout, set) {
            total_targets += 1;
            if !covered.contains(&target) {
                missing.push(target);
            }
        }
    }

    Ok(CoverageReport {
        total_targets,
        covered: total_targets - missing.len(),
        missing,
    })
}

fn project(levels: &[Option<usize>], set: &[FactorId]) -> Option<Target> {
    let choices = set
        .iter()
        .map(|factor| levels[factor.0].map(|level| (*factor, level)))
        .collect::<Option<Vec<_>>>()?;
    Some(Target { choices })
}

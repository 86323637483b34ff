//! Compiled layout of a factory tree.
//!
//! Flattens a [`Shape`] into an arena of nodes and numbers every factor
//! depth-first. A factor is one independent choice-point:
//! - each Level node, with one level per value;
//! - each Singleton, with a single level;
//! - each Lehmer digit `k < m - 1` of a permutation over `m` items, with
//!   `m - k` levels (the last digit is always 0 and is not a factor);
//! - a unit factor for a product with neither children nor digits, so that
//!   such a branch still has something to cover.
//!
//! The factors under one node always form a contiguous index range.

use std::ops::Range;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::FactoryError;
use crate::identifier::{join_mixed_radix, locate_branch, product, split_mixed_radix};
use crate::permutation::{lehmer_code, rank_count, rank_from_lehmer};
use crate::shape::Shape;

/// Index of a factor in depth-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactorId(pub usize);

/// Where a factor comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorKind {
    Level,
    Singleton,
    Unit,
    LehmerDigit { position: usize },
}

/// One choice-point dimension of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    pub id: FactorId,
    pub kind: FactorKind,
    pub levels: usize,
    /// `(union node, branch)` pairs from the root down to this factor.
    pub branch_path: Vec<(usize, usize)>,
}

/// One decision made while decoding an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChoicePoint {
    Level { factor: FactorId, level: usize },
    Branch { node: usize, branch: usize },
}

/// A node of the compiled tree.
#[derive(Debug, Clone)]
pub enum LayoutNode {
    Factor {
        factor: FactorId,
    },
    Product {
        children: Vec<usize>,
        radices: Vec<BigUint>,
        permutation_len: Option<usize>,
        digits: Vec<FactorId>,
        unit: Option<FactorId>,
    },
    Union {
        branches: Vec<usize>,
        offsets: Vec<BigUint>,
    },
}

#[derive(Debug, Clone)]
struct NodeEntry {
    node: LayoutNode,
    size: BigUint,
    factors: Range<usize>,
}

/// Supplies values for choice-points a partial assignment leaves open.
pub trait DontCare {
    /// Level for an unassigned factor with `levels` levels.
    fn level(&mut self, factor: FactorId, levels: usize) -> usize;
    /// Branch for a union none of whose factors are assigned.
    fn branch(&mut self, node: usize, branches: usize) -> usize;
}

/// Fills every open choice with its first level or branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoice;

impl DontCare for FirstChoice {
    fn level(&mut self, _factor: FactorId, _levels: usize) -> usize {
        0
    }

    fn branch(&mut self, _node: usize, _branches: usize) -> usize {
        0
    }
}

/// Flattened factory tree with its factor table.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: Vec<NodeEntry>,
    factors: Vec<Factor>,
    root: usize,
}

impl Layout {
    /// Compile `shape`, rejecting level leaves without levels and unions
    /// without branches.
    pub fn compile(shape: &Shape) -> Result<Self, FactoryError> {
        let mut builder = Builder::default();
        let mut path = Vec::new();
        let root = builder.build(shape, &mut path)?;
        Ok(Self {
            nodes: builder.nodes,
            factors: builder.factors,
            root,
        })
    }

    pub fn size(&self) -> &BigUint {
        &self.nodes[self.root].size
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn factor(&self, id: FactorId) -> &Factor {
        &self.factors[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, node: usize) -> &LayoutNode {
        &self.nodes[node].node
    }

    /// Whether two factors can both take part in one case, i.e. they do not
    /// sit under different branches of the same union.
    pub fn compatible(&self, a: FactorId, b: FactorId) -> bool {
        let path_a = &self.factors[a.0].branch_path;
        let path_b = &self.factors[b.0].branch_path;
        for (x, y) in path_a.iter().zip(path_b) {
            if x.0 != y.0 {
                return true;
            }
            if x.1 != y.1 {
                return false;
            }
        }
        true
    }

    /// Choice-points taken by `identifier`, in depth-first order.
    pub fn decode(&self, identifier: &BigUint) -> Result<Vec<ChoicePoint>, FactoryError> {
        if identifier >= self.size() {
            return Err(FactoryError::out_of_range(identifier, self.size()));
        }
        let mut choices = Vec::new();
        self.decode_node(self.root, identifier, &mut choices)?;
        Ok(choices)
    }

    fn decode_node(
        &self,
        node: usize,
        identifier: &BigUint,
        choices: &mut Vec<ChoicePoint>,
    ) -> Result<(), FactoryError> {
        match &self.nodes[node].node {
            LayoutNode::Factor { factor } => {
                let level = identifier
                    .to_usize()
                    .ok_or_else(|| FactoryError::out_of_range(identifier, &self.nodes[node].size))?;
                choices.push(ChoicePoint::Level {
                    factor: *factor,
                    level,
                });
            }
            LayoutNode::Product {
                children,
                radices,
                permutation_len,
                digits,
                unit,
            } => {
                let (parts, rank) = split_mixed_radix(identifier, radices);
                for (child, part) in children.iter().zip(&parts) {
                    self.decode_node(*child, part, choices)?;
                }
                if let Some(len) = permutation_len {
                    let code = lehmer_code(*len, &rank)?;
                    for (factor, level) in digits.iter().zip(code) {
                        choices.push(ChoicePoint::Level {
                            factor: *factor,
                            level,
                        });
                    }
                }
                if let Some(factor) = unit {
                    choices.push(ChoicePoint::Level {
                        factor: *factor,
                        level: 0,
                    });
                }
            }
            LayoutNode::Union { branches, offsets } => {
                let (branch, local) = locate_branch(identifier, offsets, &self.nodes[node].size)
                    .ok_or_else(|| FactoryError::out_of_range(identifier, &self.nodes[node].size))?;
                choices.push(ChoicePoint::Branch { node, branch });
                self.decode_node(branches[branch], &local, choices)?;
            }
        }
        Ok(())
    }

    /// Identifier of the case fixing every assigned factor, with open
    /// choices resolved by `filler`.
    ///
    /// `assignment` is indexed by factor; missing entries count as open.
    pub fn encode(
        &self,
        assignment: &[Option<usize>],
        filler: &mut dyn DontCare,
    ) -> Result<BigUint, FactoryError> {
        self.encode_node(self.root, assignment, filler)
    }

    fn encode_node(
        &self,
        node: usize,
        assignment: &[Option<usize>],
        filler: &mut dyn DontCare,
    ) -> Result<BigUint, FactoryError> {
        match &self.nodes[node].node {
            LayoutNode::Factor { factor } => {
                let level = self.resolve_level(*factor, assignment, filler)?;
                Ok(BigUint::from(level))
            }
            LayoutNode::Product {
                children,
                radices,
                permutation_len,
                digits,
                ..
            } => {
                let parts = children
                    .iter()
                    .map(|child| self.encode_node(*child, assignment, filler))
                    .collect::<Result<Vec<_>, _>>()?;
                let rank = match permutation_len {
                    Some(len) if *len > 0 => {
                        let mut code = digits
                            .iter()
                            .map(|factor| self.resolve_level(*factor, assignment, filler))
                            .collect::<Result<Vec<_>, _>>()?;
                        code.push(0);
                        rank_from_lehmer(&code)
                    }
                    _ => BigUint::zero(),
                };
                Ok(join_mixed_radix(&parts, radices, &rank))
            }
            LayoutNode::Union { branches, offsets } => {
                let mut active = branches.iter().enumerate().filter(|(_, branch)| {
                    self.nodes[**branch]
                        .factors
                        .clone()
                        .any(|factor| assignment.get(factor).copied().flatten().is_some())
                });
                let chosen = match (active.next(), active.next()) {
                    (Some((index, _)), None) => index,
                    (None, _) => filler.branch(node, branches.len()) % branches.len().max(1),
                    (Some(_), Some(_)) => return Err(FactoryError::ConflictingBranches { node }),
                };
                let local = self.encode_node(branches[chosen], assignment, filler)?;
                Ok(&offsets[chosen] + local)
            }
        }
    }

    fn resolve_level(
        &self,
        factor: FactorId,
        assignment: &[Option<usize>],
        filler: &mut dyn DontCare,
    ) -> Result<usize, FactoryError> {
        let levels = self.factors[factor.0].levels;
        match assignment.get(factor.0).copied().flatten() {
            Some(level) if level < levels => Ok(level),
            Some(level) => Err(FactoryError::out_of_range(
                &BigUint::from(level),
                &BigUint::from(levels),
            )),
            None => Ok(filler.level(factor, levels) % levels.max(1)),
        }
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<NodeEntry>,
    factors: Vec<Factor>,
}

impl Builder {
    fn build(
        &mut self,
        shape: &Shape,
        path: &mut Vec<(usize, usize)>,
    ) -> Result<usize, FactoryError> {
        match shape {
            Shape::Level { levels: 0 } => Err(FactoryError::NoLevels),
            Shape::Level { levels } => Ok(self.leaf(FactorKind::Level, *levels, path)),
            Shape::Singleton => Ok(self.leaf(FactorKind::Singleton, 1, path)),
            Shape::Product {
                children,
                permutation_len,
            } => {
                let first = self.factors.len();
                let children = children
                    .iter()
                    .map(|child| self.build(child, path))
                    .collect::<Result<Vec<_>, _>>()?;
                let radices: Vec<BigUint> = children
                    .iter()
                    .map(|child| self.nodes[*child].size.clone())
                    .collect();
                let len = permutation_len.unwrap_or(0);
                let digits: Vec<FactorId> = (0..len.saturating_sub(1))
                    .map(|position| {
                        self.push_factor(FactorKind::LehmerDigit { position }, len - position, path)
                    })
                    .collect();
                let unit = (children.is_empty() && digits.is_empty())
                    .then(|| self.push_factor(FactorKind::Unit, 1, path));
                let ranks = permutation_len.map(rank_count).unwrap_or_else(BigUint::one);
                let size = product(&radices) * ranks;
                Ok(self.push_node(
                    LayoutNode::Product {
                        children,
                        radices,
                        permutation_len: *permutation_len,
                        digits,
                        unit,
                    },
                    size,
                    first..self.factors.len(),
                ))
            }
            Shape::Union { branches } if branches.is_empty() => Err(FactoryError::NoBranches),
            Shape::Union { branches } => {
                let first = self.factors.len();
                let node = self.push_node(
                    LayoutNode::Union {
                        branches: Vec::new(),
                        offsets: Vec::new(),
                    },
                    BigUint::zero(),
                    first..first,
                );
                let mut ids = Vec::with_capacity(branches.len());
                let mut offsets = Vec::with_capacity(branches.len());
                let mut total = BigUint::zero();
                for (index, branch) in branches.iter().enumerate() {
                    path.push((node, index));
                    let id = self.build(branch, path)?;
                    path.pop();
                    offsets.push(total.clone());
                    total += &self.nodes[id].size;
                    ids.push(id);
                }
                let entry = &mut self.nodes[node];
                entry.node = LayoutNode::Union {
                    branches: ids,
                    offsets,
                };
                entry.size = total;
                entry.factors = first..self.factors.len();
                Ok(node)
            }
        }
    }

    fn leaf(&mut self, kind: FactorKind, levels: usize, path: &[(usize, usize)]) -> usize {
        let factor = self.push_factor(kind, levels, path);
        self.push_node(
            LayoutNode::Factor { factor },
            BigUint::from(levels),
            factor.0..factor.0 + 1,
        )
    }

    fn push_factor(&mut self, kind: FactorKind, levels: usize, path: &[(usize, usize)]) -> FactorId {
        let id = FactorId(self.factors.len());
        self.factors.push(Factor {
            id,
            kind,
            levels,
            branch_path: path.to_vec(),
        });
        id
    }

    fn push_node(&mut self, node: LayoutNode, size: BigUint, factors: Range<usize>) -> usize {
        self.nodes.push(NodeEntry {
            node,
            size,
            factors,
        });
        self.nodes.len() - 1
    }
}

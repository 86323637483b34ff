//! Type-erased mirror of a factory tree.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::permutation::rank_count;

/// Structure of a factory tree, without its values or combiners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A factor with `levels` values.
    Level { levels: usize },
    /// A fixed value.
    Singleton,
    /// Cartesian product of `children`, optionally followed by a
    /// permutation over `permutation_len` items.
    Product {
        children: Vec<Shape>,
        permutation_len: Option<usize>,
    },
    /// Disjoint union of `branches`.
    Union { branches: Vec<Shape> },
}

impl Shape {
    /// Number of cases the shape describes.
    pub fn size(&self) -> BigUint {
        match self {
            Shape::Level { levels } => BigUint::from(*levels),
            Shape::Singleton => BigUint::one(),
            Shape::Product {
                children,
                permutation_len,
            } => {
                let ranks = permutation_len.map(rank_count).unwrap_or_else(BigUint::one);
                children.iter().fold(ranks, |acc, child| acc * child.size())
            }
            Shape::Union { branches } => branches
                .iter()
                .fold(BigUint::zero(), |acc, branch| acc + branch.size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_composition() {
        let shape = Shape::Union {
            branches: vec![
                Shape::Singleton,
                Shape::Product {
                    children: vec![Shape::Level { levels: 3 }, Shape::Level { levels: 2 }],
                    permutation_len: Some(3),
                },
            ],
        };
        // 1 + 3 * 2 * 3!
        assert_eq!(shape.size(), BigUint::from(37u32));
    }

    #[test]
    fn test_empty_product_has_one_case() {
        let shape = Shape::Product {
            children: vec![],
            permutation_len: None,
        };
        assert_eq!(shape.size(), BigUint::one());
    }

    #[test]
    fn test_shape_json_is_tagged() {
        let json = serde_json::to_value(Shape::Level { levels: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "level", "levels": 4 }));
    }
}

use num_bigint::BigUint;

use super::{BoxedFactory, Factory};
use crate::error::FactoryError;
use crate::identifier::{branch_offsets, locate_branch};
use crate::shape::Shape;

/// Disjoint union of same-typed branches.
///
/// Each branch owns a consecutive identifier range, in branch order. The
/// branches need not produce distinct values; only their identifiers are
/// disjoint.
pub struct Interleaved<T> {
    branches: Vec<BoxedFactory<T>>,
    offsets: Vec<BigUint>,
    size: BigUint,
}

impl<T> Interleaved<T> {
    pub fn new(branches: Vec<BoxedFactory<T>>) -> Result<Self, FactoryError> {
        if branches.is_empty() {
            return Err(FactoryError::NoBranches);
        }
        let sizes: Vec<BigUint> = branches.iter().map(|branch| branch.size()).collect();
        let (offsets, size) = branch_offsets(&sizes);
        Ok(Self {
            branches,
            offsets,
            size,
        })
    }
}

impl<T> Factory for Interleaved<T> {
    type Case = T;

    fn size(&self) -> BigUint {
        self.size.clone()
    }

    fn case_at(&self, identifier: &BigUint) -> Result<T, FactoryError> {
        let (branch, local) = locate_branch(identifier, &self.offsets, &self.size)
            .ok_or_else(|| FactoryError::out_of_range(identifier, &self.size))?;
        self.branches[branch].case_at(&local)
    }

    fn shape(&self) -> Shape {
        Shape::Union {
            branches: self.branches.iter().map(|branch| branch.shape()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::level::Level;
    use crate::factory::singleton::Singleton;

    #[test]
    fn test_branches_take_consecutive_ranges() {
        let factory = Interleaved::new(vec![
            Singleton::new(-1).boxed(),
            Level::new(vec![7, 8, 9]).unwrap().boxed(),
            Level::new(vec![7]).unwrap().boxed(),
        ])
        .unwrap();
        assert_eq!(factory.size(), BigUint::from(5u32));
        let all: Vec<i32> = (0..5u32)
            .map(|id| factory.case_at(&BigUint::from(id)).unwrap())
            .collect();
        // Equal values from different branches are allowed.
        assert_eq!(all, vec![-1, 7, 8, 9, 7]);
        assert!(factory.case_at(&BigUint::from(5u32)).is_err());
    }

    #[test]
    fn test_no_branches_rejected() {
        assert!(matches!(
            Interleaved::<u8>::new(Vec::new()),
            Err(FactoryError::NoBranches)
        ));
    }

    #[test]
    fn test_nested_shape() {
        let inner = Interleaved::new(vec![Singleton::new(1).boxed()]).unwrap();
        let outer = Interleaved::new(vec![inner.boxed(), Singleton::new(2).boxed()]).unwrap();
        assert_eq!(
            outer.shape(),
            Shape::Union {
                branches: vec![
                    Shape::Union {
                        branches: vec![Shape::Singleton]
                    },
                    Shape::Singleton
                ]
            }
        );
    }
}

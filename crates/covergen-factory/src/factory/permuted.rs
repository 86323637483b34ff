//! Homogeneous products that also draw a permutation.
//!
//! The permutation rank is the most significant digit of the identifier,
//! above the children's mixed-radix digits.

use num_bigint::BigUint;

use super::synthesized::decode_children_with_rest;
use super::{check_range, BoxedFactory, Factory};
use crate::error::FactoryError;
use crate::identifier::product;
use crate::permutation::{permutation_at, rank_count, Permutation};
use crate::shape::Shape;

type Combiner<T, R> = Box<dyn Fn(Vec<T>, Permutation) -> R + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Reorder the child values themselves before combining.
    Shuffle,
    /// Hand the combiner a permutation over one more item than there are children.
    Extended,
}

/// Product of a homogeneous list of factories times the permutations of
/// a sequence.
pub struct Permuted<T, R> {
    children: Vec<BoxedFactory<T>>,
    combiner: Combiner<T, R>,
    mode: Mode,
    permutation_len: usize,
    radices: Vec<BigUint>,
    size: BigUint,
}

impl<T, R> Permuted<T, R>
where
    T: 'static,
    R: 'static,
{
    /// Each case is `combiner(values)` with the child values in one of
    /// their `n!` orders.
    pub fn shuffling<F>(children: Vec<BoxedFactory<T>>, combiner: F) -> Self
    where
        F: Fn(Vec<T>) -> R + Send + Sync + 'static,
    {
        let len = children.len();
        Self::build(
            children,
            Box::new(move |values, _| combiner(values)),
            Mode::Shuffle,
            len,
        )
    }

    /// Each case is `combiner(values, permutation)` where the permutation
    /// ranges over `n + 1` items, for reordering a sequence that the `n`
    /// child values generate (for example `n` deltas building `n + 1` items).
    pub fn with_permutation<F>(children: Vec<BoxedFactory<T>>, combiner: F) -> Self
    where
        F: Fn(Vec<T>, Permutation) -> R + Send + Sync + 'static,
    {
        let len = children.len() + 1;
        Self::build(children, Box::new(combiner), Mode::Extended, len)
    }

    fn build(
        children: Vec<BoxedFactory<T>>,
        combiner: Combiner<T, R>,
        mode: Mode,
        permutation_len: usize,
    ) -> Self {
        let radices: Vec<BigUint> = children.iter().map(|child| child.size()).collect();
        let size = product(&radices) * rank_count(permutation_len);
        Self {
            children,
            combiner,
            mode,
            permutation_len,
            radices,
            size,
        }
    }

    pub fn permutation_len(&self) -> usize {
        self.permutation_len
    }
}

impl<T, R> Factory for Permuted<T, R> {
    type Case = R;

    fn size(&self) -> BigUint {
        self.size.clone()
    }

    fn case_at(&self, identifier: &BigUint) -> Result<R, FactoryError> {
        check_range(identifier, &self.size)?;
        let (values, rank) = decode_children_with_rest(&self.children, &self.radices, identifier)?;
        let permutation = permutation_at(self.permutation_len, &rank)?;
        let values = match self.mode {
            Mode::Shuffle => permutation.apply(values)?,
            Mode::Extended => values,
        };
        Ok((self.combiner)(values, permutation))
    }

    fn shape(&self) -> Shape {
        Shape::Product {
            children: self.children.iter().map(|child| child.shape()).collect(),
            permutation_len: Some(self.permutation_len),
        }
    }
}

//! Cartesian-product factories.
//!
//! [`Synthesized`] takes a tuple of differently-typed children and a
//! combiner over the tuple of their cases. [`SynthesizedList`] takes a
//! homogeneous list of children and a combiner over a `Vec`.
//!
//! Identifiers are mixed radix over the children's sizes, first child least
//! significant.

use std::marker::PhantomData;

use num_bigint::BigUint;

use super::{check_range, BoxedFactory, Factory};
use crate::error::FactoryError;
use crate::identifier::{product, split_mixed_radix};
use crate::shape::Shape;

/// A fixed-arity tuple of factories.
pub trait FactoryTuple: Send + Sync {
    type Cases;

    fn sizes(&self) -> Vec<BigUint>;

    fn shapes(&self) -> Vec<Shape>;

    /// Decode one child identifier per element, in tuple order.
    fn cases_at(&self, identifiers: &[BigUint]) -> Result<Self::Cases, FactoryError>;
}

macro_rules! impl_factory_tuple {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: Factory),+> FactoryTuple for ($($name,)+) {
            type Cases = ($(<$name as Factory>::Case,)+);

            fn sizes(&self) -> Vec<BigUint> {
                vec![$(self.$index.size()),+]
            }

            fn shapes(&self) -> Vec<Shape> {
                vec![$(self.$index.shape()),+]
            }

            fn cases_at(&self, identifiers: &[BigUint]) -> Result<Self::Cases, FactoryError> {
                Ok(($(self.$index.case_at(&identifiers[$index])?,)+))
            }
        }
    };
}

impl_factory_tuple!(A: 0);
impl_factory_tuple!(A: 0, B: 1);
impl_factory_tuple!(A: 0, B: 1, C: 2);
impl_factory_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_factory_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_factory_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, G: 5);

/// Product of a tuple of factories, combined by a typed closure.
pub struct Synthesized<P, F, R> {
    parts: P,
    combiner: F,
    radices: Vec<BigUint>,
    size: BigUint,
    _case: PhantomData<fn() -> R>,
}

impl<P, F, R> Synthesized<P, F, R>
where
    P: FactoryTuple,
    F: Fn(P::Cases) -> R + Send + Sync,
{
    pub fn new(parts: P, combiner: F) -> Self {
        let radices = parts.sizes();
        let size = product(&radices);
        Self {
            parts,
            combiner,
            radices,
            size,
            _case: PhantomData,
        }
    }
}

impl<P, F, R> Factory for Synthesized<P, F, R>
where
    P: FactoryTuple,
    F: Fn(P::Cases) -> R + Send + Sync,
{
    type Case = R;

    fn size(&self) -> BigUint {
        self.size.clone()
    }

    fn case_at(&self, identifier: &BigUint) -> Result<R, FactoryError> {
        check_range(identifier, &self.size)?;
        let (parts, _) = split_mixed_radix(identifier, &self.radices);
        let cases = self.parts.cases_at(&parts)?;
        Ok((self.combiner)(cases))
    }

    fn shape(&self) -> Shape {
        Shape::Product {
            children: self.parts.shapes(),
            permutation_len: None,
        }
    }
}

/// Product of a homogeneous list of factories.
///
/// With no children the domain has one case, `combiner(vec![])`.
pub struct SynthesizedList<T, F, R> {
    children: Vec<BoxedFactory<T>>,
    combiner: F,
    radices: Vec<BigUint>,
    size: BigUint,
    _case: PhantomData<fn() -> R>,
}

impl<T, F, R> SynthesizedList<T, F, R>
where
    F: Fn(Vec<T>) -> R + Send + Sync,
{
    pub fn new(children: Vec<BoxedFactory<T>>, combiner: F) -> Self {
        let radices: Vec<BigUint> = children.iter().map(|child| child.size()).collect();
        let size = product(&radices);
        Self {
            children,
            combiner,
            radices,
            size,
            _case: PhantomData,
        }
    }
}

impl<T, F, R> Factory for SynthesizedList<T, F, R>
where
    F: Fn(Vec<T>) -> R + Send + Sync,
{
    type Case = R;

    fn size(&self) -> BigUint {
        self.size.clone()
    }

    fn case_at(&self, identifier: &BigUint) -> Result<R, FactoryError> {
        check_range(identifier, &self.size)?;
        let values = decode_children(&self.children, &self.radices, identifier)?;
        Ok((self.combiner)(values))
    }

    fn shape(&self) -> Shape {
        Shape::Product {
            children: self.children.iter().map(|child| child.shape()).collect(),
            permutation_len: None,
        }
    }
}

/// Decode each child's digit of `identifier`; the quotient above the
/// children is returned alongside.
pub(crate) fn decode_children_with_rest<T>(
    children: &[BoxedFactory<T>],
    radices: &[BigUint],
    identifier: &BigUint,
) -> Result<(Vec<T>, BigUint), FactoryError> {
    let (parts, rest) = split_mixed_radix(identifier, radices);
    let values = children
        .iter()
        .zip(&parts)
        .map(|(child, part)| child.case_at(part))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((values, rest))
}

fn decode_children<T>(
    children: &[BoxedFactory<T>],
    radices: &[BigUint],
    identifier: &BigUint,
) -> Result<Vec<T>, FactoryError> {
    decode_children_with_rest(children, radices, identifier).map(|(values, _)| values)
}

//! The `Factory` trait and its implementations.

pub mod interleaved;
pub mod level;
pub mod permuted;
pub mod singleton;
pub mod synthesized;

use num_bigint::BigUint;

use crate::error::FactoryError;
use crate::shape::Shape;

/// A finite domain of test cases with an identifier bijection.
///
/// Every identifier in `[0, size())` decodes to exactly one combination of
/// choice-points. Factories are immutable after construction and may be
/// shared across threads.
pub trait Factory: Send + Sync {
    type Case;

    /// Number of identifiers in the domain.
    fn size(&self) -> BigUint;

    /// The case named by `identifier`.
    fn case_at(&self, identifier: &BigUint) -> Result<Self::Case, FactoryError>;

    /// Type-erased structure of this factory and its children.
    fn shape(&self) -> Shape;

    fn boxed(self) -> BoxedFactory<Self::Case>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// A factory behind a trait object, for heterogeneous children.
pub type BoxedFactory<T> = Box<dyn Factory<Case = T>>;

impl<F: Factory + ?Sized> Factory for Box<F> {
    type Case = F::Case;

    fn size(&self) -> BigUint {
        (**self).size()
    }

    fn case_at(&self, identifier: &BigUint) -> Result<Self::Case, FactoryError> {
        (**self).case_at(identifier)
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

pub(crate) fn check_range(identifier: &BigUint, size: &BigUint) -> Result<(), FactoryError> {
    if identifier >= size {
        return Err(FactoryError::out_of_range(identifier, size));
    }
    Ok(())
}

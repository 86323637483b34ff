use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::Factory;
use crate::error::FactoryError;
use crate::shape::Shape;

/// A one-case domain for fixed or degenerate inputs.
#[derive(Debug, Clone)]
pub struct Singleton<T> {
    value: T,
}

impl<T> Singleton<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> Factory for Singleton<T>
where
    T: Clone + Send + Sync,
{
    type Case = T;

    fn size(&self) -> BigUint {
        BigUint::one()
    }

    fn case_at(&self, identifier: &BigUint) -> Result<T, FactoryError> {
        if !identifier.is_zero() {
            return Err(FactoryError::out_of_range(identifier, &BigUint::one()));
        }
        Ok(self.value.clone())
    }

    fn shape(&self) -> Shape {
        Shape::Singleton
    }
}

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use super::{check_range, Factory};
use crate::error::FactoryError;
use crate::shape::Shape;

/// One factor: identifier `i` selects the `i`-th value.
#[derive(Debug, Clone)]
pub struct Level<T> {
    values: Vec<T>,
}

impl<T> Level<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(values: impl IntoIterator<Item = T>) -> Result<Self, FactoryError> {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Err(FactoryError::NoLevels);
        }
        Ok(Self { values })
    }
}

impl<T> Factory for Level<T>
where
    T: Clone + Send + Sync,
{
    type Case = T;

    fn size(&self) -> BigUint {
        BigUint::from(self.values.len())
    }

    fn case_at(&self, identifier: &BigUint) -> Result<T, FactoryError> {
        check_range(identifier, &self.size())?;
        identifier
            .to_usize()
            .and_then(|index| self.values.get(index))
            .cloned()
            .ok_or_else(|| FactoryError::out_of_range(identifier, &self.size()))
    }

    fn shape(&self) -> Shape {
        Shape::Level {
            levels: self.values.len(),
        }
    }
}

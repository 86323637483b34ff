use covergen_factory::FactoryError;

/// Errors raised while computing or enumerating a covering subset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumerationError {
    #[error("strength must be at least 1, got {0}")]
    InvalidStrength(usize),

    #[error("factory error: {0}")]
    Factory(#[from] FactoryError),
}

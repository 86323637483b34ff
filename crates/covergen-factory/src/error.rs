use num_bigint::BigUint;

/// Errors raised while building factories or decoding identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("identifier {identifier} is out of range for a domain of size {size}")]
    OutOfRange { identifier: BigUint, size: BigUint },

    #[error("malformed reproduction token '{token}': {reason}")]
    MalformedToken { token: String, reason: String },

    #[error("level factory has no levels")]
    NoLevels,

    #[error("interleaved factory has no branches")]
    NoBranches,

    #[error("choices select more than one branch of interleaved node {node}")]
    ConflictingBranches { node: usize },

    #[error("permutation over {expected} items applied to {actual} items")]
    PermutationLength { expected: usize, actual: usize },
}

impl FactoryError {
    pub(crate) fn out_of_range(identifier: &BigUint, size: &BigUint) -> Self {
        FactoryError::OutOfRange {
            identifier: identifier.clone(),
            size: size.clone(),
        }
    }
}

use covergen_explore::EnumerationError;
use covergen_factory::FactoryError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarnessError {
    #[error("enumeration error: {0}")]
    Enumeration(#[from] EnumerationError),

    #[error("factory error: {0}")]
    Factory(#[from] FactoryError),

    /// A case failed; `token` reproduces it. `ordinal` is its position in
    /// the run, absent when the case was replayed from a token.
    #[error("test case {token} failed: {message}")]
    CaseFailed {
        ordinal: Option<u64>,
        token: String,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

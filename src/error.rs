use thiserror::Error;

/// Errors raised while building a tree or running a filtering pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdError {
    /// A point (or a candidate position) has the wrong number of coordinates.
    #[error("dimensionality mismatch at index {index}: expected {expected}, found {found}")]
    Dimensionality {
        index: usize,
        expected: usize,
        found: usize,
    },
    /// Not enough information to determine the dimensionality of the tree.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Pruning left a subtree without any candidate. This indicates a bug.
    #[error("no candidate center survived pruning")]
    EmptyCandidateSet,
}

pub type Result<T> = std::result::Result<T, KdError>;

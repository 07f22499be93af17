//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of menu node invariants.
/// These are independent of storage and presentation concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The parallel key/value sequences of an attribute map disagree in length.
    #[error("attribute sequences differ in length: {keys} keys, {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("menu node has no label: {name}")]
    MissingLabel { name: String },

    #[error("invalid menu node name '{name}': must end with '{suffix}'")]
    InvalidNodeName { name: String, suffix: String },

    #[error("tree node not found: {0}")]
    NodeNotFound(String),

    #[error("content stored in the inactive reference slot of: {name}")]
    ConflictingContent { name: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

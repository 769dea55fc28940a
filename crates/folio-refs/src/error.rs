//! Error types for reference operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefError {
    #[error("invalid branch name: {name}: {reason}")]
    InvalidBranchName { name: String, reason: String },

    #[error("invalid tag name: {name}: {reason}")]
    InvalidTagName { name: String, reason: String },

    /// A branch with this name already exists.
    #[error("branch already exists: {name}")]
    AlreadyExists { name: String },
}

/// Convenience type alias for ref operations.
pub type RefResult<T> = std::result::Result<T, RefError>;

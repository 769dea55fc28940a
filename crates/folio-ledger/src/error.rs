use folio_types::{ContentHash, VersionId};

/// Errors produced by version store operations.
///
/// Unknown versions and branches are not errors; operations report them as
/// `None` or `false`. These variants cover data that should exist but cannot
/// be read, and environmental failures.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A known version's snapshot blob is gone.
    #[error("blob {hash} for version {version} is missing")]
    MissingBlob { version: VersionId, hash: ContentHash },

    /// Stored data exists but cannot be decoded or fails verification.
    #[error("corrupt {what}: {reason}")]
    Corrupt { what: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] folio_refs::RefError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. } | Self::MissingBlob { .. })
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

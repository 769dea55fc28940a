use folio_types::ContentHash;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {expected}: computed {computed}")]
    HashMismatch {
        expected: ContentHash,
        computed: ContentHash,
    },

    /// The blob bytes are not a snapshot envelope this build can read.
    #[error("corrupt blob: {0}")]
    Corrupt(String),

    /// Envelope written by a newer schema.
    #[error("unsupported snapshot schema version {found} (max {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// The snapshot holds values the envelope cannot represent.
    #[error("snapshot cannot be encoded: {0}")]
    Unencodable(String),

    /// Serialization failure on write.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for errors that mean stored data is unreadable, as opposed to
    /// an environmental failure.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::HashMismatch { .. } | Self::Corrupt(_) | Self::UnsupportedSchema { .. }
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

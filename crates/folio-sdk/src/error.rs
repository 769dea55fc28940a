use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("block {index} does not exist; document has {len} blocks")]
    BlockOutOfRange { index: usize, len: usize },

    #[error("version not found: {0}")]
    VersionNotFound(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] folio_ledger::LedgerError),
}

pub type SdkResult<T> = Result<T, SdkError>;

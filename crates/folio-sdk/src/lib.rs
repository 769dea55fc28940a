//! High-level SDK for Folio.
//!
//! [`EditSession`] is the entry point for applications that edit documents:
//! it holds a live snapshot, applies edits through the tree navigator,
//! records a change for each one, and commits to a version store.

pub mod error;
pub mod session;

pub use error::{SdkError, SdkResult};
pub use session::EditSession;

// Re-export key types
pub use folio_diff::{DocumentDiff, HunkKind};
pub use folio_doc::{Block, Change, ChangeKind, Snapshot};
pub use folio_ledger::{MergeOutcome, StoreConfig, Version, VersionStore};
pub use folio_merge::MergeStrategy;
pub use folio_types::VersionId;

//! Version store for Folio documents.
//!
//! This crate is the heart of Folio. It provides:
//! - [`Version`] records linking a committed snapshot to its parent, author,
//!   message, audit [`folio_doc::Change`]s and content hash
//! - [`VersionStore`], a content-addressed, branchable commit history with
//!   checkout, rollback, merge, tagging, history and retention cleanup
//! - [`StoreConfig`], per-store settings loaded from `folio.toml`
//!
//! Snapshots are stored once per unique content hash through a
//! [`folio_store::BlobStore`]; the index of versions and branch pointers is a
//! single JSON record written atomically after every state change.

pub mod config;
pub mod error;
pub mod index;
pub mod merge;
pub mod retention;
pub mod store;
pub mod version;

pub use config::{StoreConfig, CONFIG_FILE};
pub use error::{LedgerError, LedgerResult};
pub use index::{IndexRecord, INDEX_FILE};
pub use merge::MergeOutcome;
pub use retention::CleanupReport;
pub use store::VersionStore;
pub use version::Version;

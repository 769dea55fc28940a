//! Content-addressed blob storage for Folio snapshots.
//!
//! Each committed snapshot is encoded once into a versioned JSON envelope
//! (see [`codec`]) and stored under the BLAKE3 hash of those bytes. Identical
//! content always lands on the same key, so a second write of the same
//! snapshot is a no-op.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one file per blob under `<root>/blobs/`, written atomically
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written.
//! 2. Reads verify the content hash when verification is enabled.
//! 3. The store never interprets blob contents; decoding lives in [`codec`].
//! 4. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use codec::{decode_snapshot, encode_snapshot, SNAPSHOT_FORMAT, SNAPSHOT_SCHEMA_VERSION};
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::{BlobStore, WriteOutcome};

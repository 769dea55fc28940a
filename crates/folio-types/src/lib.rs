//! Foundation types for Folio.
//!
//! Every other Folio crate depends on `folio-types`. The types here carry no
//! document semantics; they identify stored content and order history.
//!
//! # Key Types
//!
//! - [`ContentHash`] -- content-addressed identifier of a serialized snapshot (BLAKE3)
//! - [`VersionId`] -- short, deterministic identifier of a committed version
//! - [`Timestamp`] -- wall-clock milliseconds plus a logical tie-breaker

pub mod error;
pub mod hash;
pub mod temporal;
pub mod version_id;

pub use error::TypeError;
pub use hash::ContentHash;
pub use temporal::Timestamp;
pub use version_id::VersionId;

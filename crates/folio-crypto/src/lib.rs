//! Hashing primitives for Folio.
//!
//! Provides domain-separated BLAKE3 hashing. Snapshot blobs and version
//! identifiers are hashed under different domain tags so the two can never
//! collide even when fed identical bytes.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;

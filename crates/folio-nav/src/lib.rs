//! Tree navigation for Folio snapshots.
//!
//! [`Navigator`] borrows a [`folio_doc::Snapshot`] mutably and offers search
//! by kind, text, pattern, heading level and id, resolution of a
//! [`folio_doc::Position`] to the element under it, block-level mutation
//! (insert, delete, replace, move), text extraction over a
//! [`folio_doc::Range`], and a read-only structural validator.

pub mod builders;
pub mod navigator;
pub mod validation;

pub use builders::{create_header, create_paragraph};
pub use navigator::{Navigator, NodeRef, PatternMatch};
pub use validation::{validate_structure, StructureIssue};

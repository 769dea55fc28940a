//! Document snapshot model for Folio.
//!
//! A [`Snapshot`] is the in-memory form of one document state: an ordered
//! sequence of [`Block`]s, a [`DocumentMetadata`] record, opaque
//! [`FormatFragments`] the block tree cannot express, and a
//! [`PositionMapping`] linking elements back to their location in the native
//! file format. Snapshots are produced by an external converter, mutated in
//! place during an edit session, and treated as immutable once committed.
//!
//! # Key Types
//!
//! - [`Block`] / [`Inline`] -- closed sum types for structural and inline content
//! - [`Position`] / [`Range`] -- addresses into a snapshot
//! - [`Change`] -- audit record produced by edit operations
//! - [`ElementKind`] -- kind tags used for searching

pub mod block;
pub mod change;
pub mod fragments;
pub mod inline;
pub mod kind;
pub mod mapping;
pub mod metadata;
pub mod position;
pub mod snapshot;

pub use block::{Attr, Block, Cell, ListItem};
pub use change::{Change, ChangeKind};
pub use fragments::{FormatFragments, FragmentKind, FragmentRef};
pub use inline::{flatten_inlines, inlines_text, words_to_inlines, Inline};
pub use kind::{BlockKind, ElementKind, InlineKind};
pub use mapping::PositionMapping;
pub use metadata::{DocumentComment, DocumentMetadata, PageMargins, PageSize, StyleDefinition};
pub use position::{Position, Range};
pub use snapshot::{IntegrityIssue, Snapshot, SnapshotStats};

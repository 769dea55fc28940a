//! Diff engine for Folio snapshots.
//!
//! Compares two snapshots in three independent passes (block content,
//! metadata, styles) and produces a [`DocumentDiff`] of [`DiffHunk`]s.
//! Content-only diffs can be replayed forwards or backwards with
//! [`apply_diff`].
//!
//! # Key Types
//!
//! - [`DiffEngine`] -- pass configuration (similarity threshold)
//! - [`DocumentDiff`] / [`DiffHunk`] / [`DiffSummary`] -- diff result
//! - [`ChangeSummary`] -- human-readable digest from [`summarize_changes`]
//!
//! Text renderers ([`generate_text_diff`], [`generate_html_diff`]) and the
//! word-level diff ([`get_word_level_diff`]) run the same alignment over
//! flattened text instead of blocks.

pub mod apply;
pub mod content;
pub mod engine;
pub mod hunk;
pub mod metadata;
pub mod render;
pub mod similarity;
pub mod styles;
pub mod words;

pub use apply::apply_diff;
pub use engine::{diff_documents, DiffEngine, DEFAULT_SIMILARITY_THRESHOLD};
pub use hunk::{DiffHunk, DiffSummary, DocumentDiff, HunkKind, HunkTarget};
pub use render::{generate_html_diff, generate_text_diff, summarize_changes, ChangeSummary};
pub use similarity::similarity;
pub use words::{get_word_level_diff, WordOp};

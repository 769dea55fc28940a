use tracing::debug;

use folio_doc::Snapshot;

use crate::content::diff_content;
use crate::hunk::DocumentDiff;
use crate::metadata::diff_metadata;
use crate::styles::diff_styles;

/// Pairs scoring strictly above this are treated as edits of one block.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffEngine {
    pub similarity_threshold: f64,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl DiffEngine {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    /// Diff `old` against `new`, labelling the sides `v1` and `v2`.
    pub fn diff_documents(&self, old: &Snapshot, new: &Snapshot) -> DocumentDiff {
        self.diff_labeled(old, new, "v1", "v2")
    }

    /// Content hunks first, then metadata, then styles.
    pub fn diff_labeled(
        &self,
        old: &Snapshot,
        new: &Snapshot,
        source_version: &str,
        target_version: &str,
    ) -> DocumentDiff {
        let mut hunks = diff_content(
            &old.block_texts(),
            &new.block_texts(),
            self.similarity_threshold,
        );
        hunks.extend(diff_metadata(&old.metadata, &new.metadata));
        hunks.extend(diff_styles(&old.metadata, &new.metadata));
        debug!(
            source = source_version,
            target = target_version,
            hunks = hunks.len(),
            "computed document diff"
        );
        DocumentDiff::new(source_version, target_version, hunks)
    }
}

/// Diff with the default engine settings.
pub fn diff_documents(old: &Snapshot, new: &Snapshot) -> DocumentDiff {
    DiffEngine::default().diff_documents(old, new)
}

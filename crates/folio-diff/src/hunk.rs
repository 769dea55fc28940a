use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use folio_doc::Position;
use folio_types::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HunkKind {
    Insert,
    Delete,
    Modify,
    Move,
    StyleChange,
    MetadataChange,
}

/// What a hunk applies to. Only block targets are replayed by `apply_diff`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum HunkTarget {
    Block { position: Position },
    Metadata { field: String },
    Style { name: String },
}

impl HunkTarget {
    pub fn block(index: usize) -> Self {
        Self::Block {
            position: Position::block(index),
        }
    }

    pub fn block_index(&self) -> Option<usize> {
        match self {
            Self::Block { position } => Some(position.block),
            _ => None,
        }
    }
}

impl fmt::Display for HunkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block { position } => write!(f, "block {position}"),
            Self::Metadata { field } => write!(f, "metadata.{field}"),
            Self::Style { name } => write!(f, "style {name}"),
        }
    }
}

/// One discrete difference between two snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub kind: HunkKind,
    /// Position in the target snapshot for inserts and modifies, in the
    /// source snapshot for deletes.
    pub location: HunkTarget,
    /// Source-side position of a modified block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_location: Option<Position>,
    #[serde(default)]
    pub old_content: Option<Value>,
    #[serde(default)]
    pub new_content: Option<Value>,
    pub confidence: f64,
    pub description: String,
}

impl DiffHunk {
    pub fn new(kind: HunkKind, location: HunkTarget) -> Self {
        Self {
            kind,
            location,
            old_location: None,
            old_content: None,
            new_content: None,
            confidence: 1.0,
            description: String::new(),
        }
    }

    pub fn with_old(mut self, content: impl Into<Value>) -> Self {
        self.old_content = Some(content.into());
        self
    }

    pub fn with_new(mut self, content: impl Into<Value>) -> Self {
        self.new_content = Some(content.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn block_index(&self) -> Option<usize> {
        self.location.block_index()
    }

    pub fn old_text(&self) -> Option<&str> {
        self.old_content.as_ref().and_then(Value::as_str)
    }

    pub fn new_text(&self) -> Option<&str> {
        self.new_content.as_ref().and_then(Value::as_str)
    }
}

/// Per-kind hunk counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_changes: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub modifications: usize,
    pub moves: usize,
    pub style_changes: usize,
    pub metadata_changes: usize,
}

impl DiffSummary {
    pub fn from_hunks(hunks: &[DiffHunk]) -> Self {
        let mut summary = Self {
            total_changes: hunks.len(),
            ..Self::default()
        };
        for hunk in hunks {
            let slot = match hunk.kind {
                HunkKind::Insert => &mut summary.insertions,
                HunkKind::Delete => &mut summary.deletions,
                HunkKind::Modify => &mut summary.modifications,
                HunkKind::Move => &mut summary.moves,
                HunkKind::StyleChange => &mut summary.style_changes,
                HunkKind::MetadataChange => &mut summary.metadata_changes,
            };
            *slot += 1;
        }
        summary
    }
}

/// Complete diff between a source and a target snapshot.
///
/// Hunks are only reachable through methods that keep `summary` in step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentDiff {
    pub source_version: String,
    pub target_version: String,
    pub timestamp: Timestamp,
    hunks: Vec<DiffHunk>,
    summary: DiffSummary,
}

impl DocumentDiff {
    pub fn new(
        source_version: impl Into<String>,
        target_version: impl Into<String>,
        hunks: Vec<DiffHunk>,
    ) -> Self {
        let summary = DiffSummary::from_hunks(&hunks);
        Self {
            source_version: source_version.into(),
            target_version: target_version.into(),
            timestamp: Timestamp::now(),
            hunks,
            summary,
        }
    }

    pub fn hunks(&self) -> &[DiffHunk] {
        &self.hunks
    }

    pub fn summary(&self) -> &DiffSummary {
        &self.summary
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn hunks_of_kind(&self, kind: HunkKind) -> impl Iterator<Item = &DiffHunk> {
        self.hunks.iter().filter(move |h| h.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_hunks_by_kind() {
        assert_eq!(DocumentDiff::new("a", "b", vec![]).summary().total_changes, 0);
        let diff = DocumentDiff::new(
            "a",
            "b",
            vec![
                DiffHunk::new(HunkKind::Insert, HunkTarget::block(0)).with_new("x"),
                DiffHunk::new(
                    HunkKind::MetadataChange,
                    HunkTarget::Metadata {
                        field: "title".into(),
                    },
                ),
            ],
        );
        assert_eq!(diff.summary().total_changes, 2);
        assert_eq!(diff.summary().insertions, 1);
        assert_eq!(diff.summary().metadata_changes, 1);
        assert_eq!(diff.hunks_of_kind(HunkKind::Insert).count(), 1);
    }

    #[test]
    fn text_accessors() {
        let h = DiffHunk::new(HunkKind::Modify, HunkTarget::block(2))
            .with_old("a")
            .with_new(Value::Null);
        assert_eq!(h.old_text(), Some("a"));
        assert_eq!(h.new_text(), None);
        assert_eq!(h.block_index(), Some(2));
        assert_eq!(h.location.to_string(), "block 2");
    }

    #[test]
    fn hunk_serializes_with_tagged_target() {
        let h = DiffHunk::new(HunkKind::StyleChange, HunkTarget::Style { name: "H1".into() });
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["kind"], "style_change");
        assert_eq!(json["location"]["target"], "style");
        assert_eq!(json["location"]["name"], "H1");
    }
}

use std::fmt;

use serde::Serialize;

use folio_doc::Snapshot;

/// A reason two branch heads cannot be merged automatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeConflict {
    BlockCountMismatch { source: usize, target: usize },
    TitleMismatch {
        source: Option<String>,
        target: Option<String>,
    },
}

impl MergeConflict {
    /// Short locator of the conflicting area.
    pub fn location(&self) -> &'static str {
        match self {
            Self::BlockCountMismatch { .. } => "document_blocks",
            Self::TitleMismatch { .. } => "metadata.title",
        }
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockCountMismatch { source, target } => write!(
                f,
                "different number of blocks (source {source}, target {target})"
            ),
            Self::TitleMismatch { source, target } => write!(
                f,
                "different titles (source {:?}, target {:?})",
                source.as_deref().unwrap_or_default(),
                target.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Coarse conflict check between the source and target heads.
pub fn detect_conflicts(source: &Snapshot, target: &Snapshot) -> Vec<MergeConflict> {
    let mut conflicts = Vec::new();
    if source.blocks.len() != target.blocks.len() {
        conflicts.push(MergeConflict::BlockCountMismatch {
            source: source.blocks.len(),
            target: target.blocks.len(),
        });
    }
    if source.metadata.title != target.metadata.title {
        conflicts.push(MergeConflict::TitleMismatch {
            source: source.metadata.title.clone(),
            target: target.metadata.title.clone(),
        });
    }
    conflicts
}

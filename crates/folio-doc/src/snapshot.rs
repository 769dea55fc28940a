//! The snapshot bundle and its derived statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::fragments::FormatFragments;
use crate::kind::BlockKind;
use crate::mapping::PositionMapping;
use crate::metadata::DocumentMetadata;

/// One document state: blocks, metadata, fragments and position mapping.
///
/// Snapshots are mutated in place during editing and treated as immutable
/// once committed; callers hand a clone to the version store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub fragments: FormatFragments,
    #[serde(default)]
    pub mapping: PositionMapping,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub word_count: usize,
    pub character_count: usize,
    pub paragraph_count: usize,
    pub heading_count: usize,
    pub block_count: usize,
}

/// A violation of the snapshot's cross-component invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A block references a fragment id that has no mapping entry.
    UnmappedFragment { block: usize, fragment: String },
    /// Forward and reverse mapping entries for this element disagree.
    MappingNotInverse { element: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedFragment { block, fragment } => {
                write!(f, "block {block}: fragment '{fragment}' has no mapping entry")
            }
            Self::MappingNotInverse { element } => {
                write!(f, "mapping for '{element}' is not an exact inverse")
            }
        }
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text of each block, in order.
    pub fn block_texts(&self) -> Vec<String> {
        self.blocks.iter().map(Block::plain_text).collect()
    }

    /// All block texts joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.block_texts().join("\n\n")
    }

    pub fn stats(&self) -> SnapshotStats {
        let text = self.plain_text();
        let count = |kind| self.blocks.iter().filter(|b| b.kind() == kind).count();
        SnapshotStats {
            word_count: text.split_whitespace().count(),
            character_count: text.chars().count(),
            paragraph_count: count(BlockKind::Paragraph),
            heading_count: count(BlockKind::Heading),
            block_count: self.blocks.len(),
        }
    }

    /// Check fragment references against the mapping and the mapping against
    /// itself. An empty result means the snapshot is consistent.
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            for fragment in block.fragment_refs() {
                if self.mapping.location_of(fragment).is_none() {
                    issues.push(IntegrityIssue::UnmappedFragment {
                        block: index,
                        fragment: fragment.to_string(),
                    });
                }
            }
        }
        issues.extend(
            self.mapping
                .inverse_violations()
                .into_iter()
                .map(|element| IntegrityIssue::MappingNotInverse { element }),
        );
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::Inline;

    fn sample() -> Snapshot {
        let mut snap = Snapshot::with_blocks(vec![
            Block::heading(1, "Report"),
            Block::paragraph("First para here"),
            Block::Paragraph(vec![
                Inline::text("See"),
                Inline::FootnoteRef {
                    fragment: "fn1".into(),
                },
            ]),
        ]);
        snap.metadata.title = Some("Report".into());
        snap
    }

    #[test]
    fn stats_count_words_and_kinds() {
        let stats = sample().stats();
        assert_eq!(stats.block_count, 3);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.word_count, 5);
    }

    #[test]
    fn unmapped_fragment_reported() {
        let mut snap = sample();
        let issues = snap.check_integrity();
        assert_eq!(
            issues,
            vec![IntegrityIssue::UnmappedFragment {
                block: 2,
                fragment: "fn1".into()
            }]
        );
        snap.mapping.add_mapping("fn1", "/w:footnotes/w:footnote[1]", 2);
        assert!(snap.check_integrity().is_empty());
    }

    #[test]
    fn json_roundtrip_preserves_everything() {
        let mut snap = sample();
        snap.fragments.add_embedded("img", vec![1, 2, 3]);
        snap.mapping.add_mapping("fn1", "loc", 2);
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert_eq!(back.block_texts(), snap.block_texts());
    }
}

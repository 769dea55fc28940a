//! Read-only structural checks. Nothing here repairs the snapshot.

use std::fmt;

use folio_doc::{Block, BlockKind, Snapshot};

pub const MIN_HEADING_LEVEL: u8 = 1;
pub const MAX_HEADING_LEVEL: u8 = 6;

/// One structural problem, reported against its top-level block index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureIssue {
    InvalidHeadingLevel { block: usize, level: u8 },
    MissingContent { block: usize, kind: BlockKind },
    MalformedHeading { block: usize, id: String },
    DanglingFragment { block: usize, fragment: String },
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeadingLevel { block, level } => write!(
                f,
                "block {block}: heading level {level} outside {MIN_HEADING_LEVEL}..={MAX_HEADING_LEVEL}"
            ),
            Self::MissingContent { block, kind } => {
                write!(f, "block {block}: {kind} has no content")
            }
            Self::MalformedHeading { block, id } => {
                write!(f, "block {block}: heading identifier {id:?} contains whitespace")
            }
            Self::DanglingFragment { block, fragment } => {
                write!(f, "block {block}: fragment '{fragment}' has no mapping entry")
            }
        }
    }
}

pub fn validate_structure(snapshot: &Snapshot) -> Vec<StructureIssue> {
    let mut issues = Vec::new();
    for (index, block) in snapshot.blocks.iter().enumerate() {
        check_block(index, block, &mut issues);
        for fragment in block.fragment_refs() {
            if snapshot.mapping.location_of(fragment).is_none() {
                issues.push(StructureIssue::DanglingFragment {
                    block: index,
                    fragment: fragment.to_string(),
                });
            }
        }
    }
    issues
}

fn check_block(index: usize, block: &Block, issues: &mut Vec<StructureIssue>) {
    match block {
        Block::Heading { level, attr, .. } => {
            if !(MIN_HEADING_LEVEL..=MAX_HEADING_LEVEL).contains(level) {
                issues.push(StructureIssue::InvalidHeadingLevel {
                    block: index,
                    level: *level,
                });
            }
            if attr.id.chars().any(char::is_whitespace) {
                issues.push(StructureIssue::MalformedHeading {
                    block: index,
                    id: attr.id.clone(),
                });
            }
        }
        Block::List { items, .. } if items.is_empty() => issues.push(missing(index, block)),
        Block::Table { rows, .. } if rows.is_empty() => issues.push(missing(index, block)),
        Block::Raw {
            content, fragment, ..
        } if content.is_empty() && fragment.is_none() => issues.push(missing(index, block)),
        _ => {}
    }
    for nested in block.nested_blocks() {
        check_block(index, nested, issues);
    }
}

fn missing(index: usize, block: &Block) -> StructureIssue {
    StructureIssue::MissingContent {
        block: index,
        kind: block.kind(),
    }
}

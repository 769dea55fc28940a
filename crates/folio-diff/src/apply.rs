//! Replay of content hunks onto a snapshot.

use tracing::debug;

use folio_doc::{Position, Snapshot};
use folio_nav::{create_paragraph, Navigator};

use crate::hunk::{DiffHunk, HunkKind, HunkTarget};

/// A block hunk reduced to what replay needs.
struct Step {
    kind: HunkKind,
    index: usize,
    text: String,
}

fn text_of(content: Option<&serde_json::Value>) -> String {
    content
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn step(hunk: &DiffHunk, reverse: bool) -> Option<Step> {
    let forward = hunk.block_index()?;
    let (kind, index, text) = match (hunk.kind, reverse) {
        (HunkKind::Insert, false) => (HunkKind::Insert, forward, hunk.new_content.as_ref()),
        (HunkKind::Delete, false) => (HunkKind::Delete, forward, None),
        (HunkKind::Modify, false) => (HunkKind::Modify, forward, hunk.new_content.as_ref()),
        (HunkKind::Insert, true) => (HunkKind::Delete, forward, None),
        (HunkKind::Delete, true) => (HunkKind::Insert, forward, hunk.old_content.as_ref()),
        (HunkKind::Modify, true) => {
            let index = hunk.old_location.map(|p: Position| p.block).unwrap_or(forward);
            (HunkKind::Modify, index, hunk.old_content.as_ref())
        }
        _ => return None,
    };
    Some(Step {
        kind,
        index,
        text: text_of(text),
    })
}

/// Apply `diff` to a clone of `snapshot`.
///
/// With `reverse`, old and new content swap, inserts and deletes trade
/// places, and modifies address their source-side position, so applying a
/// diff and then its reverse restores the original block texts.
///
/// Block hunks replay in three phases: deletes by descending index, inserts
/// by ascending index, then modifies. Inserted and modified blocks are
/// fresh paragraphs built from the hunk text. Metadata and style hunks are
/// not replayed.
pub fn apply_diff(snapshot: &Snapshot, diff: &crate::DocumentDiff, reverse: bool) -> Snapshot {
    let mut result = snapshot.clone();
    let steps: Vec<Step> = diff.hunks().iter().filter_map(|h| step(h, reverse)).collect();

    let mut deletes: Vec<&Step> = steps.iter().filter(|s| s.kind == HunkKind::Delete).collect();
    deletes.sort_by(|a, b| b.index.cmp(&a.index));
    let mut inserts: Vec<&Step> = steps.iter().filter(|s| s.kind == HunkKind::Insert).collect();
    inserts.sort_by_key(|s| s.index);
    let modifies = steps.iter().filter(|s| s.kind == HunkKind::Modify);

    let mut nav = Navigator::new(&mut result);
    for s in deletes {
        nav.delete_block(s.index);
    }
    for s in inserts {
        nav.insert_block(s.index, create_paragraph(&s.text));
    }
    for s in modifies {
        nav.replace_block(s.index, create_paragraph(&s.text));
    }
    let skipped = diff
        .hunks()
        .iter()
        .filter(|h| !matches!(h.location, HunkTarget::Block { .. }))
        .count();
    debug!(steps = steps.len(), skipped, reverse, "applied diff");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::diff_documents;
    use folio_doc::Block;
    use proptest::prelude::*;

    fn doc(texts: &[&str]) -> Snapshot {
        Snapshot::with_blocks(texts.iter().map(|t| Block::paragraph(t)).collect())
    }

    #[test]
    fn forward_and_reverse_roundtrip() {
        let a = doc(&["intro", "Hello", "middle part", "to be removed"]);
        let b = doc(&["new opening", "intro", "Hello world", "middle part"]);
        let diff = diff_documents(&a, &b);
        let forward = apply_diff(&a, &diff, false);
        assert_eq!(forward.block_texts(), b.block_texts());
        let back = apply_diff(&forward, &diff, true);
        assert_eq!(back.block_texts(), a.block_texts());
    }

    #[test]
    fn empty_paragraph_insert_is_replayed() {
        let a = doc(&["x"]);
        let b = doc(&["x", ""]);
        let diff = diff_documents(&a, &b);
        assert_eq!(apply_diff(&a, &diff, false).block_texts(), b.block_texts());
    }

    #[test]
    fn metadata_hunks_are_not_replayed() {
        let a = doc(&["x"]);
        let mut b = a.clone();
        b.metadata.title = Some("New".into());
        let applied = apply_diff(&a, &diff_documents(&a, &b), false);
        assert_eq!(applied.metadata.title, None);
    }

    #[test]
    fn out_of_range_delete_is_noop() {
        let a = doc(&["only"]);
        let diff = crate::DocumentDiff::new(
            "a",
            "b",
            vec![DiffHunk::new(HunkKind::Delete, HunkTarget::block(9))],
        );
        assert_eq!(apply_diff(&a, &diff, false).block_texts(), a.block_texts());
    }

    fn paragraphs() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(
            proptest::collection::vec("[a-e]{1,4}", 0..4).prop_map(|w| w.join(" ")),
            0..6,
        )
    }

    proptest! {
        #[test]
        fn diff_apply_duality(a in paragraphs(), b in paragraphs()) {
            let sa = Snapshot::with_blocks(a.iter().map(|t| Block::paragraph(t)).collect());
            let sb = Snapshot::with_blocks(b.iter().map(|t| Block::paragraph(t)).collect());
            let diff = diff_documents(&sa, &sb);
            let applied = apply_diff(&sa, &diff, false);
            prop_assert_eq!(applied.block_texts(), sb.block_texts());
        }

        #[test]
        fn undo_law(a in paragraphs(), b in paragraphs()) {
            let sa = Snapshot::with_blocks(a.iter().map(|t| Block::paragraph(t)).collect());
            let sb = Snapshot::with_blocks(b.iter().map(|t| Block::paragraph(t)).collect());
            let diff = diff_documents(&sa, &sb);
            let undone = apply_diff(&apply_diff(&sa, &diff, false), &diff, true);
            prop_assert_eq!(undone.block_texts(), sa.block_texts());
        }
    }
}

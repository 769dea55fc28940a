//! Block content pass: align per-block texts and classify each change.

use similar::{capture_diff_slices, Algorithm, DiffTag};

use folio_doc::Position;

use crate::hunk::{DiffHunk, HunkKind, HunkTarget};
use crate::similarity::similarity;

const PREVIEW_CHARS: usize = 50;

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn delete_hunk(index: usize, text: &str) -> DiffHunk {
    DiffHunk::new(HunkKind::Delete, HunkTarget::block(index))
        .with_old(text)
        .with_description(format!("Deleted block {}: '{}'", index + 1, preview(text)))
}

fn insert_hunk(index: usize, text: &str) -> DiffHunk {
    DiffHunk::new(HunkKind::Insert, HunkTarget::block(index))
        .with_new(text)
        .with_description(format!("Inserted block {}: '{}'", index + 1, preview(text)))
}

/// Diff two block-text sequences.
///
/// Replace runs pair blocks positionally. A pair whose similarity exceeds
/// `threshold` becomes one modify hunk at the new position; any other pair
/// becomes a delete at the old position plus an insert at the new one.
/// Unpaired leftovers of an uneven run are plain deletes or inserts.
pub fn diff_content(old: &[String], new: &[String], threshold: f64) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {}
            DiffTag::Delete => {
                hunks.extend(old_range.map(|i| delete_hunk(i, &old[i])));
            }
            DiffTag::Insert => {
                hunks.extend(new_range.map(|j| insert_hunk(j, &new[j])));
            }
            DiffTag::Replace => {
                let paired = old_range.len().min(new_range.len());
                for (i, j) in old_range.clone().zip(new_range.clone()) {
                    let ratio = similarity(&old[i], &new[j]);
                    if ratio > threshold {
                        let mut hunk = DiffHunk::new(HunkKind::Modify, HunkTarget::block(j))
                            .with_old(old[i].as_str())
                            .with_new(new[j].as_str())
                            .with_description(format!("Modified block {}", j + 1));
                        hunk.old_location = Some(Position::block(i));
                        hunk.confidence = ratio;
                        hunks.push(hunk);
                    } else {
                        hunks.push(delete_hunk(i, &old[i]));
                        hunks.push(insert_hunk(j, &new[j]));
                    }
                }
                hunks.extend(old_range.skip(paired).map(|i| delete_hunk(i, &old[i])));
                hunks.extend(new_range.skip(paired).map(|j| insert_hunk(j, &new[j])));
            }
        }
    }
    hunks
}

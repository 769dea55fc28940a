use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};
use strum::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WordOp {
    Equal,
    Delete,
    Insert,
}

/// Whitespace-tokenized diff. Replaced runs expand to their deletes
/// followed by their inserts.
pub fn get_word_level_diff(old: &str, new: &str) -> Vec<(WordOp, String)> {
    let a: Vec<&str> = old.split_whitespace().collect();
    let b: Vec<&str> = new.split_whitespace().collect();
    let mut out = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &a, &b) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let deleted = || a[old_range.clone()].iter().map(|w| (WordOp::Delete, w.to_string()));
        let inserted = || b[new_range.clone()].iter().map(|w| (WordOp::Insert, w.to_string()));
        match tag {
            DiffTag::Equal => {
                out.extend(a[old_range.clone()].iter().map(|w| (WordOp::Equal, w.to_string())))
            }
            DiffTag::Delete => out.extend(deleted()),
            DiffTag::Insert => out.extend(inserted()),
            DiffTag::Replace => {
                out.extend(deleted());
                out.extend(inserted());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_expands_to_delete_then_insert() {
        let diff = get_word_level_diff("the quick fox", "the slow fox jumps");
        assert_eq!(
            diff,
            vec![
                (WordOp::Equal, "the".to_string()),
                (WordOp::Delete, "quick".to_string()),
                (WordOp::Insert, "slow".to_string()),
                (WordOp::Equal, "fox".to_string()),
                (WordOp::Insert, "jumps".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_is_not_a_token() {
        assert!(get_word_level_diff("a  b", "a b")
            .iter()
            .all(|(op, _)| *op == WordOp::Equal));
    }
}

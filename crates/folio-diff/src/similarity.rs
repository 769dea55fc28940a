use similar::{DiffTag, TextDiff};

/// Text similarity in `[0, 1]`.
///
/// Characters matched by a Myers alignment divided by the length of the
/// shorter text. Two empty texts score 1.0; one empty text scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    match (len_a, len_b) {
        (0, 0) => return 1.0,
        (0, _) | (_, 0) => return 0.0,
        _ => {}
    }
    let diff = TextDiff::from_chars(a, b);
    let matched: usize = diff
        .ops()
        .iter()
        .filter(|op| op.tag() == DiffTag::Equal)
        .map(|op| op.old_range().len())
        .sum();
    matched as f64 / len_a.min(len_b) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_edge_cases() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "x"), 0.0);
        assert_eq!(similarity("x", ""), 0.0);
    }

    #[test]
    fn appended_text_is_fully_similar() {
        assert_eq!(similarity("Hello", "Hello world"), 1.0);
        assert_eq!(similarity("Hello world", "Hello"), 1.0);
    }

    #[test]
    fn small_edit_stays_above_threshold() {
        assert!(similarity("The quick brown fox", "The quick red fox") > 0.7);
    }

    #[test]
    fn unrelated_text_scores_low() {
        assert!(similarity("abcdefgh", "zyxwvuts") < 0.3);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(similarity("héllo", "héllo!"), 1.0);
    }
}

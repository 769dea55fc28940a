//! Metadata pass: scalar fields, keyword sets, page geometry.

use serde::Serialize;
use serde_json::Value;

use folio_doc::DocumentMetadata;

use crate::hunk::{DiffHunk, HunkKind, HunkTarget};

fn json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn metadata_hunk(field: &str, old: Value, new: Value, description: String) -> DiffHunk {
    DiffHunk::new(
        HunkKind::MetadataChange,
        HunkTarget::Metadata {
            field: field.to_string(),
        },
    )
    .with_old(old)
    .with_new(new)
    .with_description(description)
}

pub fn diff_metadata(old: &DocumentMetadata, new: &DocumentMetadata) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();

    for ((field, a), (_, b)) in old.scalar_fields().into_iter().zip(new.scalar_fields()) {
        if a != b {
            hunks.push(metadata_hunk(
                field,
                json(&a),
                json(&b),
                format!(
                    "Changed {field} from '{}' to '{}'",
                    a.unwrap_or_default(),
                    b.unwrap_or_default()
                ),
            ));
        }
    }

    if old.keyword_set() != new.keyword_set() {
        hunks.push(metadata_hunk(
            "keywords",
            json(&old.keywords),
            json(&new.keywords),
            "Changed document keywords".into(),
        ));
    }
    if old.page_margins != new.page_margins {
        hunks.push(metadata_hunk(
            "page_margins",
            json(&old.page_margins),
            json(&new.page_margins),
            "Changed page margins".into(),
        ));
    }
    if old.page_size != new.page_size {
        hunks.push(metadata_hunk(
            "page_size",
            json(&old.page_size),
            json(&new.page_size),
            "Changed page size".into(),
        ));
    }
    hunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_doc::PageSize;

    #[test]
    fn equal_metadata_no_hunks() {
        let m = DocumentMetadata::titled("T");
        assert!(diff_metadata(&m, &m.clone()).is_empty());
    }

    #[test]
    fn title_change_reported_with_values() {
        let a = DocumentMetadata::titled("Draft");
        let b = DocumentMetadata::titled("Final");
        let hunks = diff_metadata(&a, &b);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_text(), Some("Draft"));
        assert_eq!(hunks[0].new_text(), Some("Final"));
        assert_eq!(hunks[0].description, "Changed title from 'Draft' to 'Final'");
    }

    #[test]
    fn keyword_order_is_irrelevant() {
        let mut a = DocumentMetadata::default();
        a.keywords = vec!["x".into(), "y".into()];
        let mut b = DocumentMetadata::default();
        b.keywords = vec!["y".into(), "x".into()];
        assert!(diff_metadata(&a, &b).is_empty());
        b.keywords.push("z".into());
        assert_eq!(diff_metadata(&a, &b)[0].location.to_string(), "metadata.keywords");
    }

    #[test]
    fn page_geometry_compared_structurally() {
        let a = DocumentMetadata::default();
        let mut b = DocumentMetadata::default();
        b.page_size = Some(PageSize {
            width: 612.0,
            height: 792.0,
        });
        let hunks = diff_metadata(&a, &b);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_content, Some(Value::Null));
        assert_eq!(hunks[0].new_content.as_ref().unwrap()["width"], 612.0);
    }
}

//! Style pass: added, removed and redefined named styles.

use serde_json::Value;

use folio_doc::{DocumentMetadata, StyleDefinition};

use crate::hunk::{DiffHunk, HunkKind, HunkTarget};

fn style_json(style: &StyleDefinition) -> Value {
    serde_json::to_value(style).unwrap_or(Value::Null)
}

fn target(name: &str) -> HunkTarget {
    HunkTarget::Style {
        name: name.to_string(),
    }
}

pub fn diff_styles(old: &DocumentMetadata, new: &DocumentMetadata) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    for (name, style) in &new.styles {
        if !old.styles.contains_key(name) {
            hunks.push(
                DiffHunk::new(HunkKind::Insert, target(name))
                    .with_new(style_json(style))
                    .with_description(format!("Added style '{name}'")),
            );
        }
    }
    for (name, style) in &old.styles {
        match new.styles.get(name) {
            None => hunks.push(
                DiffHunk::new(HunkKind::Delete, target(name))
                    .with_old(style_json(style))
                    .with_description(format!("Removed style '{name}'")),
            ),
            Some(updated) if updated != style => hunks.push(
                DiffHunk::new(HunkKind::StyleChange, target(name))
                    .with_old(style_json(style))
                    .with_new(style_json(updated))
                    .with_description(format!("Modified style '{name}'")),
            ),
            Some(_) => {}
        }
    }
    hunks
}

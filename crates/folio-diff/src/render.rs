//! Human-facing renderings of a diff.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use folio_doc::Snapshot;

use crate::hunk::{DocumentDiff, HunkKind};

/// Unified diff of the two snapshots' flattened text.
pub fn generate_text_diff(old: &Snapshot, new: &Snapshot, context_lines: usize) -> String {
    let (a, b) = (old.plain_text(), new.plain_text());
    let diff = TextDiff::from_lines(a.as_str(), b.as_str());
    let mut unified = diff.unified_diff();
    unified
        .context_radius(context_lines)
        .header("document_v1.txt", "document_v2.txt");
    unified.to_string()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Side-by-side HTML table of the two snapshots' flattened text.
pub fn generate_html_diff(old: &Snapshot, new: &Snapshot) -> String {
    let (a, b) = (old.plain_text(), new.plain_text());
    let diff = TextDiff::from_lines(a.as_str(), b.as_str());
    let mut html = String::from(
        "<table class=\"folio-diff\">\n<thead><tr><th></th><th>Version 1</th><th></th><th>Version 2</th></tr></thead>\n<tbody>\n",
    );
    for change in diff.iter_all_changes() {
        let text = escape_html(change.value().trim_end_matches('\n'));
        let old_no = change.old_index().map(|i| (i + 1).to_string()).unwrap_or_default();
        let new_no = change.new_index().map(|i| (i + 1).to_string()).unwrap_or_default();
        let row = match change.tag() {
            ChangeTag::Equal => format!(
                "<tr><td>{old_no}</td><td>{text}</td><td>{new_no}</td><td>{text}</td></tr>\n"
            ),
            ChangeTag::Delete => format!(
                "<tr><td>{old_no}</td><td class=\"del\">{text}</td><td></td><td></td></tr>\n"
            ),
            ChangeTag::Insert => format!(
                "<tr><td></td><td></td><td>{new_no}</td><td class=\"add\">{text}</td></tr>\n"
            ),
        };
        html.push_str(&row);
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Human-readable digest of a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub overview: String,
    pub content_changes: Vec<String>,
    pub metadata_changes: Vec<String>,
    pub style_changes: Vec<String>,
}

pub fn summarize_changes(diff: &DocumentDiff) -> ChangeSummary {
    let counts = diff.summary();
    let mut content_changes = Vec::new();
    if counts.insertions > 0 {
        content_changes.push(format!("Added {} new sections", counts.insertions));
    }
    if counts.deletions > 0 {
        content_changes.push(format!("Removed {} sections", counts.deletions));
    }
    if counts.modifications > 0 {
        content_changes.push(format!("Modified {} sections", counts.modifications));
    }
    let descriptions = |kind| {
        diff.hunks_of_kind(kind)
            .map(|h| h.description.clone())
            .collect::<Vec<_>>()
    };
    ChangeSummary {
        overview: format!("Found {} changes between versions", counts.total_changes),
        content_changes,
        metadata_changes: descriptions(HunkKind::MetadataChange),
        style_changes: descriptions(HunkKind::StyleChange),
    }
}

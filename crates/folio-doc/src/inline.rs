//! Inline content within paragraphs and headings.

use serde::{Deserialize, Serialize};

use crate::block::Attr;
use crate::kind::InlineKind;

/// An inline element. Container variants nest further inlines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Space,
    SoftBreak,
    LineBreak,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Underline(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Code(String),
    Link {
        target: String,
        title: String,
        content: Vec<Inline>,
    },
    Image {
        target: String,
        alt: Vec<Inline>,
    },
    Span {
        attr: Attr,
        content: Vec<Inline>,
    },
    /// Reference to a footnote or endnote held in the fragment store.
    FootnoteRef {
        fragment: String,
    },
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn kind(&self) -> InlineKind {
        match self {
            Self::Text(_) => InlineKind::Text,
            Self::Space => InlineKind::Space,
            Self::SoftBreak => InlineKind::SoftBreak,
            Self::LineBreak => InlineKind::LineBreak,
            Self::Emphasis(_) => InlineKind::Emphasis,
            Self::Strong(_) => InlineKind::Strong,
            Self::Underline(_) => InlineKind::Underline,
            Self::Strikeout(_) => InlineKind::Strikeout,
            Self::Code(_) => InlineKind::Code,
            Self::Link { .. } => InlineKind::Link,
            Self::Image { .. } => InlineKind::Image,
            Self::Span { .. } => InlineKind::Span,
            Self::FootnoteRef { .. } => InlineKind::FootnoteRef,
        }
    }

    /// Nested inlines, if this is a container.
    pub fn children(&self) -> &[Inline] {
        match self {
            Self::Emphasis(c) | Self::Strong(c) | Self::Underline(c) | Self::Strikeout(c) => c,
            Self::Link { content, .. } | Self::Span { content, .. } => content,
            Self::Image { alt, .. } => alt,
            _ => &[],
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Span { attr, .. } if !attr.id.is_empty() => Some(&attr.id),
            _ => None,
        }
    }

    /// Plain text of this inline and everything nested in it.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.append_text(&mut out);
        out
    }

    pub(crate) fn append_text(&self, out: &mut String) {
        match self {
            Self::Text(s) | Self::Code(s) => out.push_str(s),
            Self::Space | Self::SoftBreak => out.push(' '),
            Self::LineBreak => out.push('\n'),
            Self::FootnoteRef { .. } => {}
            _ => {
                for child in self.children() {
                    child.append_text(out);
                }
            }
        }
    }

    pub(crate) fn collect_fragment_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Self::FootnoteRef { fragment } = self {
            out.push(fragment);
        }
        for child in self.children() {
            child.collect_fragment_refs(out);
        }
    }
}

/// Plain text of a run of inlines.
pub fn inlines_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.append_text(&mut out);
    }
    out
}

/// Depth-first preorder listing of an inline tree.
///
/// The index of an inline in this listing is its inline index within the
/// enclosing block.
pub fn flatten_inlines(inlines: &[Inline]) -> Vec<&Inline> {
    fn walk<'a>(inlines: &'a [Inline], out: &mut Vec<&'a Inline>) {
        for inline in inlines {
            out.push(inline);
            walk(inline.children(), out);
        }
    }
    let mut out = Vec::new();
    walk(inlines, &mut out);
    out
}

/// Split text into alternating word and space inlines.
pub fn words_to_inlines(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            out.push(Inline::Space);
        }
        out.push(Inline::text(word));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Inline> {
        vec![
            Inline::text("Hello"),
            Inline::Space,
            Inline::Strong(vec![Inline::text("bold"), Inline::Emphasis(vec![Inline::text("deep")])]),
            Inline::FootnoteRef { fragment: "fn1".into() },
        ]
    }

    #[test]
    fn plain_text_descends_containers() {
        assert_eq!(inlines_text(&sample()), "Hello bolddeep");
    }

    #[test]
    fn preorder_flattening() {
        let inlines = sample();
        let kinds: Vec<_> = flatten_inlines(&inlines).iter().map(|i| i.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                InlineKind::Text,
                InlineKind::Space,
                InlineKind::Strong,
                InlineKind::Text,
                InlineKind::Emphasis,
                InlineKind::Text,
                InlineKind::FootnoteRef,
            ]
        );
    }

    #[test]
    fn words_split_with_spaces() {
        let inlines = words_to_inlines("one  two three");
        assert_eq!(inlines.len(), 5);
        assert_eq!(inlines_text(&inlines), "one two three");
        assert!(words_to_inlines("").is_empty());
    }

    #[test]
    fn fragment_refs_found_when_nested() {
        let inline = Inline::Emphasis(vec![Inline::FootnoteRef { fragment: "n2".into() }]);
        let mut refs = Vec::new();
        inline.collect_fragment_refs(&mut refs);
        assert_eq!(refs, vec!["n2"]);
    }

    #[test]
    fn serde_uses_adjacent_tags() {
        let json = serde_json::to_value(Inline::text("x")).unwrap();
        assert_eq!(json, serde_json::json!({"t": "text", "c": "x"}));
        let back: Inline = serde_json::from_value(json).unwrap();
        assert_eq!(back, Inline::text("x"));
    }
}

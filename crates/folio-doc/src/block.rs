//! Structural (block-level) document content.

use serde::{Deserialize, Serialize};

use crate::inline::{inlines_text, words_to_inlines, Inline};
use crate::kind::BlockKind;

/// Identifier, classes, and key/value attributes attached to an element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attr {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

pub type ListItem = Vec<Block>;
pub type Cell = Vec<Block>;

/// A structural element of the document body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        #[serde(default)]
        attr: Attr,
        content: Vec<Inline>,
    },
    CodeBlock {
        #[serde(default)]
        attr: Attr,
        text: String,
    },
    BlockQuote(Vec<Block>),
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Table {
        header: Vec<Cell>,
        rows: Vec<Vec<Cell>>,
    },
    /// Native-format content carried through untouched. `fragment` names
    /// the fragment-store entry holding the full original markup.
    Raw {
        format: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fragment: Option<String>,
    },
    HorizontalRule,
}

impl Block {
    /// A paragraph whose words are separated by explicit space inlines.
    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph(words_to_inlines(text))
    }

    pub fn heading(level: u8, text: &str) -> Self {
        Self::Heading {
            level,
            attr: Attr::default(),
            content: words_to_inlines(text),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph(_) => BlockKind::Paragraph,
            Self::Heading { .. } => BlockKind::Heading,
            Self::CodeBlock { .. } => BlockKind::CodeBlock,
            Self::BlockQuote(_) => BlockKind::BlockQuote,
            Self::List { .. } => BlockKind::List,
            Self::Table { .. } => BlockKind::Table,
            Self::Raw { .. } => BlockKind::Raw,
            Self::HorizontalRule => BlockKind::HorizontalRule,
        }
    }

    /// Direct inline content. Empty for blocks that hold no inlines.
    pub fn inlines(&self) -> &[Inline] {
        match self {
            Self::Paragraph(c) | Self::Heading { content: c, .. } => c,
            _ => &[],
        }
    }

    pub fn inlines_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Self::Paragraph(c) | Self::Heading { content: c, .. } => Some(c),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Heading { attr, .. } | Self::CodeBlock { attr, .. } if !attr.id.is_empty() => {
                Some(&attr.id)
            }
            _ => None,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Blocks nested directly or indirectly inside containers, in document order.
    pub fn nested_blocks(&self) -> Vec<&Block> {
        match self {
            Self::BlockQuote(blocks) => blocks.iter().collect(),
            Self::List { items, .. } => items.iter().flatten().collect(),
            Self::Table { header, rows } => header
                .iter()
                .flatten()
                .chain(rows.iter().flatten().flatten())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Plain text of the block. Nested blocks are joined by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Paragraph(c) | Self::Heading { content: c, .. } => inlines_text(c),
            Self::CodeBlock { text, .. } => text.clone(),
            Self::Raw { .. } | Self::HorizontalRule => String::new(),
            _ => self
                .nested_blocks()
                .iter()
                .map(|b| b.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Fragment ids this block (or anything inside it) depends on.
    pub fn fragment_refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fragment_refs(&mut out);
        out
    }

    fn collect_fragment_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Self::Raw {
            fragment: Some(id), ..
        } = self
        {
            out.push(id);
        }
        for inline in self.inlines() {
            inline.collect_fragment_refs(out);
        }
        for nested in self.nested_blocks() {
            nested.collect_fragment_refs(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_builder_and_text() {
        let p = Block::paragraph("The quick fox");
        assert_eq!(p.kind(), BlockKind::Paragraph);
        assert_eq!(p.plain_text(), "The quick fox");
        assert_eq!(p.inlines().len(), 5);
    }

    #[test]
    fn heading_exposes_level_and_id() {
        let mut h = Block::heading(2, "Intro");
        assert_eq!(h.heading_level(), Some(2));
        assert_eq!(h.id(), None);
        if let Block::Heading { attr, .. } = &mut h {
            attr.id = "intro".into();
        }
        assert_eq!(h.id(), Some("intro"));
    }

    #[test]
    fn container_text_joins_nested() {
        let list = Block::List {
            ordered: false,
            items: vec![vec![Block::paragraph("a")], vec![Block::paragraph("b")]],
        };
        assert_eq!(list.plain_text(), "a\nb");

        let table = Block::Table {
            header: vec![vec![Block::paragraph("h")]],
            rows: vec![vec![vec![Block::paragraph("r1")], vec![Block::paragraph("r2")]]],
        };
        assert_eq!(table.plain_text(), "h\nr1\nr2");
    }

    #[test]
    fn fragment_refs_cover_raw_and_footnotes() {
        let quote = Block::BlockQuote(vec![
            Block::Raw {
                format: "openxml".into(),
                content: "<w:sdt/>".into(),
                fragment: Some("sdt1".into()),
            },
            Block::Paragraph(vec![Inline::FootnoteRef {
                fragment: "fn1".into(),
            }]),
        ]);
        assert_eq!(quote.fragment_refs(), vec!["sdt1", "fn1"]);
        assert!(Block::HorizontalRule.fragment_refs().is_empty());
    }

    #[test]
    fn serde_roundtrip_heading() {
        let h = Block::heading(1, "Title");
        let json = serde_json::to_string(&h).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}

use std::cell::OnceCell;

use regex::Regex;
use tracing::debug;

use folio_doc::{flatten_inlines, Block, ElementKind, Inline, Position, Range, Snapshot};

use crate::validation::{validate_structure, StructureIssue};

/// Borrowed view of an element located by the navigator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeRef<'a> {
    Block(&'a Block),
    Inline(&'a Inline),
}

impl NodeRef<'_> {
    pub fn plain_text(&self) -> String {
        match self {
            Self::Block(b) => b.plain_text(),
            Self::Inline(i) => i.plain_text(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Block(b) => b.kind().into(),
            Self::Inline(i) => i.kind().into(),
        }
    }
}

/// One regex hit inside a block's plain text.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatch<'a> {
    /// Block position with `char_offset` at the match start, in characters.
    pub position: Position,
    pub block: &'a Block,
    pub matched: String,
}

/// Search and mutation over a borrowed snapshot.
///
/// Block texts are cached for search; every mutation drops the cache.
pub struct Navigator<'a> {
    snapshot: &'a mut Snapshot,
    text_cache: OnceCell<Vec<String>>,
}

impl<'a> Navigator<'a> {
    pub fn new(snapshot: &'a mut Snapshot) -> Self {
        Self {
            snapshot,
            text_cache: OnceCell::new(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &*self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.blocks.is_empty()
    }

    fn texts(&self) -> &[String] {
        self.text_cache.get_or_init(|| self.snapshot.block_texts())
    }

    fn invalidate(&mut self) {
        self.text_cache = OnceCell::new();
    }

    // ---- search ----

    /// Every element of `kind`. Inline kinds search each block's inline tree
    /// and return inline positions in preorder.
    pub fn find_by_kind(&self, kind: impl Into<ElementKind>) -> Vec<(Position, NodeRef<'_>)> {
        let kind = kind.into();
        let mut out = Vec::new();
        for (b, block) in self.snapshot.blocks.iter().enumerate() {
            match kind {
                ElementKind::Block(k) => {
                    if block.kind() == k {
                        out.push((Position::block(b), NodeRef::Block(block)));
                    }
                }
                ElementKind::Inline(k) => {
                    for (i, inline) in flatten_inlines(block.inlines()).into_iter().enumerate() {
                        if inline.kind() == k {
                            out.push((Position::inline(b, i), NodeRef::Inline(inline)));
                        }
                    }
                }
            }
        }
        out
    }

    pub fn find_by_text(&self, text: &str, case_sensitive: bool) -> Vec<(Position, &Block)> {
        let needle = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        self.texts()
            .iter()
            .enumerate()
            .filter(|(_, haystack)| {
                if case_sensitive {
                    haystack.contains(&needle)
                } else {
                    haystack.to_lowercase().contains(&needle)
                }
            })
            .map(|(b, _)| (Position::block(b), &self.snapshot.blocks[b]))
            .collect()
    }

    /// Regex search over block texts. An invalid pattern yields no matches.
    pub fn find_by_pattern(&self, pattern: &str) -> Vec<PatternMatch<'_>> {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                debug!(pattern, error = %e, "invalid search pattern");
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        for (b, text) in self.texts().iter().enumerate() {
            for m in re.find_iter(text) {
                let offset = text[..m.start()].chars().count();
                out.push(PatternMatch {
                    position: Position::block(b).with_char(offset),
                    block: &self.snapshot.blocks[b],
                    matched: m.as_str().to_string(),
                });
            }
        }
        out
    }

    pub fn find_headings(&self, level: Option<u8>) -> Vec<(Position, &Block)> {
        self.snapshot
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| match (block.heading_level(), level) {
                (Some(_), None) => true,
                (Some(actual), Some(wanted)) => actual == wanted,
                (None, _) => false,
            })
            .map(|(b, block)| (Position::block(b), block))
            .collect()
    }

    /// First block or span carrying `id`, in document order.
    pub fn find_by_id(&self, id: &str) -> Option<(Position, NodeRef<'_>)> {
        for (b, block) in self.snapshot.blocks.iter().enumerate() {
            if block.id() == Some(id) {
                return Some((Position::block(b), NodeRef::Block(block)));
            }
            for (i, inline) in flatten_inlines(block.inlines()).into_iter().enumerate() {
                if inline.id() == Some(id) {
                    return Some((Position::inline(b, i), NodeRef::Inline(inline)));
                }
            }
        }
        None
    }

    /// Resolve a position to the element under it.
    ///
    /// Returns `None` when the block or inline index is out of range, or when
    /// the char offset runs past the element's text.
    pub fn get_element_at(&self, pos: &Position) -> Option<NodeRef<'_>> {
        let block = self.snapshot.blocks.get(pos.block)?;
        let node = match pos.inline {
            None => NodeRef::Block(block),
            Some(i) => NodeRef::Inline(*flatten_inlines(block.inlines()).get(i)?),
        };
        if let Some(offset) = pos.char_offset {
            if offset > node.plain_text().chars().count() {
                return None;
            }
        }
        Some(node)
    }

    // ---- mutation ----

    /// Insert at `index` clamped into `[0, len]`. Returns the index used.
    pub fn insert_block(&mut self, index: usize, block: Block) -> usize {
        let index = index.min(self.snapshot.blocks.len());
        self.snapshot.blocks.insert(index, block);
        self.invalidate();
        debug!(index, "inserted block");
        index
    }

    pub fn delete_block(&mut self, index: usize) -> Option<Block> {
        if index >= self.snapshot.blocks.len() {
            return None;
        }
        let removed = self.snapshot.blocks.remove(index);
        self.invalidate();
        debug!(index, "deleted block");
        Some(removed)
    }

    /// Swap in `block` at `index`, returning the previous block.
    pub fn replace_block(&mut self, index: usize, block: Block) -> Option<Block> {
        let slot = self.snapshot.blocks.get_mut(index)?;
        let previous = std::mem::replace(slot, block);
        self.invalidate();
        debug!(index, "replaced block");
        Some(previous)
    }

    /// Move the block at `from` so it lands before the block currently at `to`.
    ///
    /// `to` is clamped into `[0, len]`, then shifted down by one when it lies
    /// past `from`. Returns false if `from` is out of range.
    pub fn move_block(&mut self, from: usize, to: usize) -> bool {
        let len = self.snapshot.blocks.len();
        if from >= len {
            return false;
        }
        let mut to = to.min(len);
        let block = self.snapshot.blocks.remove(from);
        if to > from {
            to -= 1;
        }
        self.snapshot.blocks.insert(to, block);
        self.invalidate();
        debug!(from, to, "moved block");
        true
    }

    // ---- extraction ----

    /// Text under `range`. Within one block the text is sliced at the start
    /// and end char offsets; across blocks the first block is cut at the
    /// start offset, the last at the end offset, and the pieces are joined
    /// by blank lines. Out-of-range blocks contribute nothing.
    pub fn get_text_range(&self, range: &Range) -> String {
        let texts = self.texts();
        let (first, last) = (range.start.block, range.end.block);
        if first == last {
            let Some(text) = texts.get(first) else {
                return String::new();
            };
            let from = range.start.char_offset.unwrap_or(0);
            let to = range.end.char_offset.unwrap_or(usize::MAX);
            return char_slice(text, from, to);
        }
        let mut pieces = Vec::new();
        for (b, text) in texts.iter().enumerate().take(last + 1).skip(first) {
            let piece = if b == first {
                char_slice(text, range.start.char_offset.unwrap_or(0), usize::MAX)
            } else if b == last {
                char_slice(text, 0, range.end.char_offset.unwrap_or(usize::MAX))
            } else {
                text.clone()
            };
            pieces.push(piece);
        }
        pieces.join("\n\n")
    }

    pub fn validate_structure(&self) -> Vec<StructureIssue> {
        validate_structure(self.snapshot())
    }
}

fn char_slice(text: &str, from: usize, to: usize) -> String {
    if to <= from {
        return String::new();
    }
    text.chars().skip(from).take(to - from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{create_header, create_paragraph};
    use folio_doc::{Attr, BlockKind, InlineKind};
    use proptest::prelude::*;

    fn sample() -> Snapshot {
        Snapshot::with_blocks(vec![
            create_header(1, "Introduction", Some("intro")),
            create_paragraph("The quick brown fox"),
            Block::Paragraph(vec![
                Inline::text("A"),
                Inline::Space,
                Inline::Strong(vec![Inline::text("bold")]),
                Inline::Span {
                    attr: Attr::with_id("note"),
                    content: vec![Inline::text("claim")],
                },
            ]),
            create_header(2, "Details", None),
        ])
    }

    fn texts(snap: &Snapshot) -> Vec<String> {
        snap.block_texts()
    }

    #[test]
    fn find_blocks_and_inlines_by_kind() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        let headings = nav.find_by_kind(BlockKind::Heading);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[1].0, Position::block(3));

        let strong = nav.find_by_kind(InlineKind::Strong);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].0, Position::inline(2, 2));
    }

    #[test]
    fn text_search_respects_case() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        assert_eq!(nav.find_by_text("quick", true).len(), 1);
        assert!(nav.find_by_text("QUICK", true).is_empty());
        assert_eq!(nav.find_by_text("QUICK", false)[0].0, Position::block(1));
    }

    #[test]
    fn pattern_search_reports_char_offsets() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        let hits = nav.find_by_pattern(r"\b\w{5}\b");
        let first = &hits[0];
        assert_eq!(first.position, Position::block(1).with_char(4));
        assert_eq!(first.matched, "quick");
        assert!(nav.find_by_pattern("(unclosed").is_empty());
    }

    #[test]
    fn headings_by_level() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        assert_eq!(nav.find_headings(None).len(), 2);
        assert_eq!(nav.find_headings(Some(2))[0].0, Position::block(3));
        assert!(nav.find_headings(Some(4)).is_empty());
    }

    #[test]
    fn find_by_id_checks_blocks_then_spans() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        assert_eq!(nav.find_by_id("intro").map(|(p, _)| p), Some(Position::block(0)));
        let (pos, node) = nav.find_by_id("note").unwrap();
        assert_eq!(pos, Position::inline(2, 4));
        assert_eq!(node.plain_text(), "claim");
        assert!(nav.find_by_id("missing").is_none());
    }

    #[test]
    fn element_resolution_rejects_out_of_range() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        assert!(matches!(nav.get_element_at(&Position::block(1)), Some(NodeRef::Block(_))));
        let inner = nav.get_element_at(&Position::inline(2, 3)).unwrap();
        assert_eq!(inner.plain_text(), "bold");
        assert!(nav.get_element_at(&Position::block(9)).is_none());
        assert!(nav.get_element_at(&Position::inline(2, 42)).is_none());
        assert!(nav.get_element_at(&Position::inline(2, 3).with_char(4)).is_some());
        assert!(nav.get_element_at(&Position::inline(2, 3).with_char(5)).is_none());
    }

    #[test]
    fn insert_clamps_and_delete_is_checked() {
        let mut snap = sample();
        let mut nav = Navigator::new(&mut snap);
        assert_eq!(nav.insert_block(100, create_paragraph("tail")), 4);
        assert!(nav.delete_block(5).is_none());
        assert_eq!(nav.len(), 5);
        assert_eq!(nav.delete_block(4).unwrap().plain_text(), "tail");
    }

    #[test]
    fn mutation_invalidates_search_cache() {
        let mut snap = sample();
        let mut nav = Navigator::new(&mut snap);
        assert!(nav.find_by_text("zebra", true).is_empty());
        nav.replace_block(1, create_paragraph("a zebra"));
        assert_eq!(nav.find_by_text("zebra", true)[0].0, Position::block(1));
    }

    #[test]
    fn replace_out_of_range_leaves_sequence() {
        let mut snap = sample();
        let before = texts(&snap);
        let mut nav = Navigator::new(&mut snap);
        assert!(nav.replace_block(10, create_paragraph("x")).is_none());
        assert_eq!(texts(&snap), before);
    }

    #[test]
    fn move_adjusts_for_removal() {
        let mut snap = Snapshot::with_blocks(
            ["a", "b", "c", "d"].iter().map(|t| create_paragraph(t)).collect(),
        );
        let mut nav = Navigator::new(&mut snap);
        assert!(nav.move_block(0, 2));
        assert!(!nav.move_block(7, 0));
        assert_eq!(texts(&snap), vec!["b", "a", "c", "d"]);

        let mut nav = Navigator::new(&mut snap);
        assert!(nav.move_block(3, 0));
        assert!(nav.move_block(0, 99));
        assert_eq!(texts(&snap), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn text_range_single_and_multi_block() {
        let mut snap = sample();
        let nav = Navigator::new(&mut snap);
        let single = Range::new(Position::block(1).with_char(4), Position::block(1).with_char(9));
        assert_eq!(nav.get_text_range(&single), "quick");

        let multi = Range::new(Position::block(0).with_char(5), Position::block(1).with_char(3));
        assert_eq!(nav.get_text_range(&multi), "duction\n\nThe");

        assert_eq!(nav.get_text_range(&Range::blocks(8, 8)), "");
    }

    #[test]
    fn delete_then_reinsert_restores_and_validates() {
        let mut snap = Snapshot::with_blocks(vec![
            create_paragraph("first"),
            create_paragraph("second"),
        ]);
        let original = snap.blocks.clone();
        let mut nav = Navigator::new(&mut snap);
        let removed = nav.delete_block(0).unwrap();
        nav.insert_block(0, removed);
        assert!(nav.validate_structure().is_empty());
        assert_eq!(snap.blocks, original);
    }

    proptest! {
        #[test]
        fn insert_then_delete_is_identity(
            words in proptest::collection::vec("[a-z]{1,6}", 0..8),
            index in 0usize..10,
        ) {
            let mut snap = Snapshot::with_blocks(words.iter().map(|w| create_paragraph(w)).collect());
            let original = snap.blocks.clone();
            let mut nav = Navigator::new(&mut snap);
            let at = nav.insert_block(index, create_paragraph("inserted"));
            nav.delete_block(at);
            prop_assert_eq!(&snap.blocks, &original);
        }
    }
}

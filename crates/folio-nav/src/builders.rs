//! Minimal well-formed blocks from plain text.

use folio_doc::{words_to_inlines, Attr, Block};

/// A paragraph of whitespace-separated words.
pub fn create_paragraph(text: &str) -> Block {
    Block::Paragraph(words_to_inlines(text))
}

/// A heading at `level`. An empty or absent `id` leaves the heading unnamed.
pub fn create_header(level: u8, text: &str, id: Option<&str>) -> Block {
    Block::Heading {
        level,
        attr: Attr::with_id(id.unwrap_or_default()),
        content: words_to_inlines(text),
    }
}

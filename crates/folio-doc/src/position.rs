//! Addresses into a snapshot.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// `(block, inline?, char?)` address.
///
/// Ordering compares the block index, then the inline index, then the char
/// offset. When a component is present on one side and missing on the other
/// while every shallower component is equal, the two positions are
/// incomparable: neither is less than the other. Positions in different
/// blocks always compare by block index alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub block: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_offset: Option<usize>,
}

impl Position {
    pub fn block(block: usize) -> Self {
        Self {
            block,
            inline: None,
            char_offset: None,
        }
    }

    pub fn inline(block: usize, inline: usize) -> Self {
        Self {
            block,
            inline: Some(inline),
            char_offset: None,
        }
    }

    pub fn with_char(mut self, offset: usize) -> Self {
        self.char_offset = Some(offset);
        self
    }
}

fn cmp_component(a: Option<usize>, b: Option<usize>) -> Option<Ordering> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (None, None) => Some(Ordering::Equal),
        _ => None,
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.block.cmp(&other.block) {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        match cmp_component(self.inline, other.inline)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        cmp_component(self.char_offset, other.char_offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block)?;
        if let Some(i) = self.inline {
            write!(f, "/{i}")?;
        }
        if let Some(c) = self.char_offset {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

/// Inclusive span between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Blocks `first..=last` with no char slicing.
    pub fn blocks(first: usize, last: usize) -> Self {
        Self::new(Position::block(first), Position::block(last))
    }

    /// True unless `pos` is strictly before `start` or strictly after `end`.
    /// Incomparable positions therefore count as contained.
    pub fn contains(&self, pos: &Position) -> bool {
        !(*pos < self.start) && !(self.end < *pos)
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        !(self.end < other.start) && !(other.end < self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn block_index_dominates() {
        let a = Position::inline(1, 9).with_char(9);
        let b = Position::block(2);
        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn deeper_components_break_ties() {
        assert!(Position::inline(1, 2) < Position::inline(1, 3));
        assert!(Position::inline(1, 2).with_char(4) < Position::inline(1, 2).with_char(5));
        assert_eq!(
            Position::block(3).partial_cmp(&Position::block(3)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn missing_component_is_not_less_either_way() {
        // Latent asymmetry kept deliberately: a shallower position is not
        // ordered against a deeper one in the same block.
        let shallow = Position::block(1);
        let deep = Position::inline(1, 0);
        assert!(!(shallow < deep));
        assert!(!(deep < shallow));
        assert_eq!(shallow.partial_cmp(&deep), None);

        let no_char = Position::inline(1, 2);
        let with_char = Position::inline(1, 2).with_char(0);
        assert_eq!(no_char.partial_cmp(&with_char), None);
    }

    #[test]
    fn range_contains_incomparable_positions() {
        let r = Range::new(Position::inline(2, 1), Position::inline(4, 0));
        assert!(r.contains(&Position::block(3)));
        assert!(r.contains(&Position::block(2)));
        assert!(r.contains(&Position::inline(2, 1)));
        assert!(!r.contains(&Position::inline(2, 0)));
        assert!(!r.contains(&Position::block(5)));
    }

    #[test]
    fn range_overlap() {
        let a = Range::blocks(0, 3);
        let b = Range::blocks(3, 6);
        let c = Range::blocks(4, 6);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Position::block(4).to_string(), "4");
        assert_eq!(Position::inline(4, 2).with_char(7).to_string(), "4/2:7");
    }

    proptest! {
        #[test]
        fn different_blocks_compare_by_block(
            a in 0usize..100, b in 0usize..100,
            ia in proptest::option::of(0usize..10), ib in proptest::option::of(0usize..10),
            ca in proptest::option::of(0usize..10), cb in proptest::option::of(0usize..10),
        ) {
            prop_assume!(a != b);
            let pa = Position { block: a, inline: ia, char_offset: ca };
            let pb = Position { block: b, inline: ib, char_offset: cb };
            prop_assert_eq!(pa.partial_cmp(&pb), Some(a.cmp(&b)));
        }

        #[test]
        fn same_block_full_positions_are_lexicographic(
            block in 0usize..10,
            ia in 0usize..10, ib in 0usize..10,
            ca in 0usize..10, cb in 0usize..10,
        ) {
            let pa = Position::inline(block, ia).with_char(ca);
            let pb = Position::inline(block, ib).with_char(cb);
            prop_assert_eq!(pa.partial_cmp(&pb), Some((ia, ca).cmp(&(ib, cb))));
        }

        #[test]
        fn never_both_less(
            a in (0usize..3, proptest::option::of(0usize..3), proptest::option::of(0usize..3)),
            b in (0usize..3, proptest::option::of(0usize..3), proptest::option::of(0usize..3)),
        ) {
            let pa = Position { block: a.0, inline: a.1, char_offset: a.2 };
            let pb = Position { block: b.0, inline: b.1, char_offset: b.2 };
            prop_assert!(!(pa < pb && pb < pa));
        }
    }
}

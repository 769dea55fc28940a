use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind tag of a [`crate::Block`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading,
    CodeBlock,
    BlockQuote,
    List,
    Table,
    Raw,
    HorizontalRule,
}

/// Kind tag of a [`crate::Inline`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InlineKind {
    Text,
    Space,
    SoftBreak,
    LineBreak,
    Emphasis,
    Strong,
    Underline,
    Strikeout,
    Code,
    Link,
    Image,
    Span,
    FootnoteRef,
}

/// Either a block or an inline kind. Used by kind-based search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Block(BlockKind),
    Inline(InlineKind),
}

impl From<BlockKind> for ElementKind {
    fn from(kind: BlockKind) -> Self {
        Self::Block(kind)
    }
}

impl From<InlineKind> for ElementKind {
    fn from(kind: InlineKind) -> Self {
        Self::Inline(kind)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block(k) => write!(f, "{k}"),
            Self::Inline(k) => write!(f, "{k}"),
        }
    }
}

impl std::str::FromStr for ElementKind {
    type Err = strum::ParseError;

    /// Block kinds take precedence; `"text"` and friends resolve to inlines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BlockKind>()
            .map(Self::Block)
            .or_else(|_| s.parse::<InlineKind>().map(Self::Inline))
    }
}

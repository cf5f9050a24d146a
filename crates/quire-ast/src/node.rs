//! Node types stored in the document arena.

use std::fmt;

use crate::directive::{BlockDirective, Directive};

/// Handle to a node inside a [`Document`](crate::Document).
///
/// Ids are only meaningful for the document that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Source position of a node (1-based line and column).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourcePos {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

impl SourcePos {
    /// Create a position from a line and column.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// List flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Unordered (`<ul>`).
    Bullet,
    /// Ordered (`<ol>`) starting at `start`.
    Ordered {
        /// First item number.
        start: u64,
    },
}

/// A node kind the renderer does not handle itself.
///
/// Keeps the pulldown-cmark events of the whole subtree so a fallback
/// renderer can reproduce it.
#[derive(Clone, Debug, PartialEq)]
pub struct OtherNode {
    /// Short name used in diagnostics (e.g. `table`, `strikethrough`).
    pub name: &'static str,
    /// Owned events from the node's start event to its end event inclusive.
    pub events: Vec<pulldown_cmark::Event<'static>>,
}

impl OtherNode {
    /// Create an unrecognized node without captured events.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            events: Vec::new(),
        }
    }
}

/// Node kind together with its kind-specific fields.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Document,
    BlockQuote,
    List {
        kind: ListKind,
        /// Tight lists do not wrap item content in `<p>`.
        tight: bool,
    },
    Item,
    Paragraph,
    Heading {
        /// Heading level, 1 to 6.
        level: u8,
    },
    ThematicBreak,
    FootnoteDefinition,
    HtmlBlock,
    CustomBlock,
    HtmlInline,
    CustomInline,
    Text,
    SoftBreak,
    LineBreak,
    Code,
    Emph,
    Strong,
    Link {
        url: String,
        title: String,
    },
    Image {
        url: String,
        title: String,
    },
    CodeBlock {
        /// Fence info string (empty for indented blocks).
        info: String,
    },
    Other(OtherNode),
}

impl NodeKind {
    /// Heading level, or `0` for anything that is not a heading.
    #[must_use]
    pub fn heading_level(&self) -> u8 {
        match self {
            Self::Heading { level } => *level,
            _ => 0,
        }
    }

    /// Leaf kinds produce only an enter event during traversal.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::SoftBreak
                | Self::LineBreak
                | Self::Code
                | Self::HtmlInline
                | Self::HtmlBlock
                | Self::ThematicBreak
                | Self::CodeBlock { .. }
        )
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::BlockQuote => "block quote",
            Self::List { .. } => "list",
            Self::Item => "list item",
            Self::Paragraph => "paragraph",
            Self::Heading { .. } => "heading",
            Self::ThematicBreak => "thematic break",
            Self::FootnoteDefinition => "footnote definition",
            Self::HtmlBlock => "HTML block",
            Self::CustomBlock => "custom block",
            Self::HtmlInline => "inline HTML",
            Self::CustomInline => "custom inline",
            Self::Text => "text",
            Self::SoftBreak => "soft break",
            Self::LineBreak => "line break",
            Self::Code => "inline code",
            Self::Emph => "emphasis",
            Self::Strong => "strong emphasis",
            Self::Link { .. } => "link",
            Self::Image { .. } => "image",
            Self::CodeBlock { .. } => "code block",
            Self::Other(other) => other.name,
        }
    }
}

/// A node in the document arena.
#[derive(Clone, Debug)]
pub struct Node {
    /// What the node is.
    pub kind: NodeKind,
    /// Raw text payload for Text, Code, `CodeBlock`, `HtmlBlock` and `HtmlInline`.
    pub literal: Option<String>,
    /// Extended directive metadata.
    pub directive: Option<Directive>,
    /// Where the node starts in the source.
    pub position: SourcePos,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            literal: None,
            directive: None,
            position: SourcePos::default(),
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
        }
    }

    /// Literal text, or `""` when the node has none.
    #[must_use]
    pub fn literal(&self) -> &str {
        self.literal.as_deref().unwrap_or_default()
    }

    /// The Block directive, if this node carries one.
    #[must_use]
    pub fn block_directive(&self) -> Option<&BlockDirective> {
        match &self.directive {
            Some(Directive::Block(block)) => Some(block),
            _ => None,
        }
    }

    /// A heading carrying a Block directive delimits a section.
    #[must_use]
    pub fn is_section_heading(&self) -> bool {
        self.kind.heading_level() > 0 && self.block_directive().is_some()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev
    }

    #[must_use]
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next
    }

    #[must_use]
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    #[must_use]
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }
}

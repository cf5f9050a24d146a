//! Arena-backed document tree.

use crate::cursor::{Cursor, Direction};
use crate::directive::Directive;
use crate::node::{Node, NodeId, NodeKind, SourcePos};

/// A parsed document.
///
/// Nodes live in a flat arena; the root Document node is always at index 0.
/// The tree is built once (by [`Document::parse`] or the `append` builder)
/// and then only read.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    /// The Document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a document has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append a new last child to `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        node.prev = self.nodes[parent.0].last_child;

        match node.prev {
            Some(prev) => self.nodes[prev.0].next = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        self.nodes[parent.0].last_child = Some(id);
        self.nodes.push(node);
        id
    }

    /// Set the literal payload of a node.
    pub fn set_literal(&mut self, id: NodeId, literal: impl Into<String>) {
        self.node_mut(id).literal = Some(literal.into());
    }

    /// Append to the literal payload of a node.
    pub fn push_literal(&mut self, id: NodeId, text: &str) {
        self.node_mut(id)
            .literal
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    /// Attach directive metadata to a node.
    pub fn set_directive(&mut self, id: NodeId, directive: Directive) {
        self.node_mut(id).directive = Some(directive);
    }

    /// Record where a node starts in the source.
    pub fn set_position(&mut self, id: NodeId, position: SourcePos) {
        self.node_mut(id).position = position;
    }

    /// Enter/exit walk over the subtree rooted at `root`.
    #[must_use]
    pub fn cursor(&self, root: NodeId) -> Cursor<'_> {
        Cursor::new(self, root)
    }

    /// Direct children of a node, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.node(node).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Whether any Text or Code node in the subtree has non-empty content.
    #[must_use]
    pub fn has_text(&self, id: NodeId) -> bool {
        self.cursor(id).any(|event| {
            let node = self.node(event.node);
            event.direction == Direction::Enter
                && matches!(node.kind, NodeKind::Text | NodeKind::Code)
                && !node.literal().is_empty()
        })
    }

    /// Concatenated Text and Code literals of the subtree.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for event in self.cursor(id) {
            let node = self.node(event.node);
            if event.direction != Direction::Enter {
                continue;
            }
            match node.kind {
                NodeKind::Text | NodeKind::Code => text.push_str(node.literal()),
                NodeKind::SoftBreak | NodeKind::LineBreak => text.push(' '),
                _ => {}
            }
        }
        text
    }

    /// Section headings (headings carrying a Block directive) in document order.
    #[must_use]
    pub fn sections(&self) -> Vec<NodeId> {
        self.cursor(self.root())
            .filter(|event| event.direction == Direction::Enter)
            .map(|event| event.node)
            .filter(|&id| self.node(id).is_section_heading())
            .collect()
    }

    /// Find the section heading whose Block directive has the given `id`.
    #[must_use]
    pub fn find_section(&self, id: &str) -> Option<NodeId> {
        self.sections().into_iter().find(|&heading| {
            self.node(heading)
                .block_directive()
                .and_then(|block| block.id.as_deref())
                == Some(id)
        })
    }
}

/// Iterator over the direct children of a node.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.node(id).next;
        Some(id)
    }
}

//! Enter/exit traversal over the document arena.

use crate::document::Document;
use crate::node::NodeId;

/// Whether a traversal event opens or closes a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Enter,
    Exit,
}

/// A single traversal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub node: NodeId,
    pub direction: Direction,
}

impl Event {
    #[must_use]
    pub fn enter(node: NodeId) -> Self {
        Self {
            node,
            direction: Direction::Enter,
        }
    }

    #[must_use]
    pub fn exit(node: NodeId) -> Self {
        Self {
            node,
            direction: Direction::Exit,
        }
    }
}

/// Lazy enter/exit walk over a subtree.
///
/// Container nodes yield an enter and an exit event; leaf nodes (see
/// [`NodeKind::is_leaf`](crate::NodeKind::is_leaf)) yield only an enter event.
/// The walk ends after the exit event of `root`.
///
/// The cursor can be repositioned while walking: [`reset`](Self::reset)
/// makes a given event the next one, [`skip_subtree`](Self::skip_subtree)
/// jumps past the rest of a node.
///
/// # Example
///
/// ```
/// use quire_ast::{Direction, Document, NodeKind};
///
/// let mut doc = Document::new();
/// let para = doc.append(doc.root(), NodeKind::Paragraph);
/// let text = doc.append(para, NodeKind::Text);
///
/// let events: Vec<_> = doc.cursor(doc.root()).map(|e| (e.node, e.direction)).collect();
/// assert_eq!(
///     events,
///     vec![
///         (doc.root(), Direction::Enter),
///         (para, Direction::Enter),
///         (text, Direction::Enter),
///         (para, Direction::Exit),
///         (doc.root(), Direction::Exit),
///     ]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<Event>,
}

impl<'a> Cursor<'a> {
    /// Start a walk at the enter event of `root`.
    #[must_use]
    pub fn new(doc: &'a Document, root: NodeId) -> Self {
        Self {
            doc,
            root,
            next: Some(Event::enter(root)),
        }
    }

    /// Root of the walk.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Make `(node, direction)` the next event.
    ///
    /// The walk then continues from that position through the rest of the
    /// root's subtree.
    pub fn reset(&mut self, node: NodeId, direction: Direction) {
        self.next = Some(Event { node, direction });
    }

    /// Skip the remaining descendants of `node` and its own exit event.
    pub fn skip_subtree(&mut self, node: NodeId) {
        self.next = self.after(Event::exit(node));
    }

    /// Event following `event` in document order.
    fn after(&self, event: Event) -> Option<Event> {
        let node = self.doc.node(event.node);

        if event.direction == Direction::Enter && !node.kind.is_leaf() {
            return Some(match node.first_child() {
                Some(child) => Event::enter(child),
                None => Event::exit(event.node),
            });
        }

        if event.node == self.root {
            return None;
        }

        match node.next_sibling() {
            Some(sibling) => Some(Event::enter(sibling)),
            None => node.parent().map(Event::exit),
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let event = self.next?;
        self.next = self.after(event);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::{NodeKind, OtherNode};

    /// Document: root > [para > [text, emph > [text]], hr, para > [text]]
    fn sample() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let p1 = doc.append(root, NodeKind::Paragraph);
        let t1 = doc.append(p1, NodeKind::Text);
        let em = doc.append(p1, NodeKind::Emph);
        let t2 = doc.append(em, NodeKind::Text);
        let hr = doc.append(root, NodeKind::ThematicBreak);
        let p2 = doc.append(root, NodeKind::Paragraph);
        let t3 = doc.append(p2, NodeKind::Text);
        (doc, vec![root, p1, t1, em, t2, hr, p2, t3])
    }

    fn trace(cursor: Cursor<'_>) -> Vec<(usize, char)> {
        cursor
            .map(|e| {
                let dir = match e.direction {
                    Direction::Enter => 'e',
                    Direction::Exit => 'x',
                };
                (e.node.index(), dir)
            })
            .collect()
    }

    #[test]
    fn test_full_walk() {
        let (doc, _) = sample();
        assert_eq!(
            trace(doc.cursor(doc.root())),
            vec![
                (0, 'e'),
                (1, 'e'),
                (2, 'e'),
                (3, 'e'),
                (4, 'e'),
                (3, 'x'),
                (1, 'x'),
                (5, 'e'),
                (6, 'e'),
                (7, 'e'),
                (6, 'x'),
                (0, 'x'),
            ]
        );
    }

    #[test]
    fn test_subtree_walk_stops_at_root_exit() {
        let (doc, ids) = sample();
        assert_eq!(
            trace(doc.cursor(ids[3])),
            vec![(3, 'e'), (4, 'e'), (3, 'x')]
        );
    }

    #[test]
    fn test_reset_continues_past_sibling() {
        let (doc, ids) = sample();
        let mut cursor = doc.cursor(doc.root());
        cursor.reset(ids[5], Direction::Enter);
        assert_eq!(
            trace(cursor),
            vec![(5, 'e'), (6, 'e'), (7, 'e'), (6, 'x'), (0, 'x')]
        );
    }

    #[test]
    fn test_skip_subtree() {
        let (doc, ids) = sample();
        let mut cursor = doc.cursor(doc.root());
        assert_eq!(cursor.next(), Some(Event::enter(ids[0])));
        assert_eq!(cursor.next(), Some(Event::enter(ids[1])));
        cursor.skip_subtree(ids[1]);
        assert_eq!(cursor.next(), Some(Event::enter(ids[5])));
    }

    #[test]
    fn test_empty_container_enters_and_exits() {
        let mut doc = Document::new();
        let other = doc.append(doc.root(), NodeKind::Other(OtherNode::new("table")));
        assert_eq!(
            trace(doc.cursor(doc.root())),
            vec![
                (0, 'e'),
                (other.index(), 'e'),
                (other.index(), 'x'),
                (0, 'x')
            ]
        );
    }

    #[test]
    fn test_leaf_root_yields_single_event() {
        let (doc, ids) = sample();
        assert_eq!(trace(doc.cursor(ids[5])), vec![(5, 'e')]);
    }
}

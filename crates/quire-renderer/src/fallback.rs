//! Fallback rendering for node kinds the dispatcher does not handle.

use quire_ast::{Document, NodeId, NodeKind};

/// Renders a whole subtree to HTML.
///
/// Called once per unrecognized node; the returned markup is inserted as-is
/// and the node's children are not visited afterwards.
pub trait FallbackRenderer: Send + Sync {
    fn render(&self, doc: &Document, node: NodeId) -> String;
}

/// Replays the pulldown-cmark events captured for the node through
/// [`pulldown_cmark::html::push_html`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EventFallback;

impl FallbackRenderer for EventFallback {
    fn render(&self, doc: &Document, node: NodeId) -> String {
        let node = doc.node(node);
        let NodeKind::Other(other) = &node.kind else {
            return String::new();
        };
        if other.events.is_empty() {
            tracing::warn!(
                kind = other.name,
                position = %node.position,
                "No captured events for node, rendering nothing"
            );
            return String::new();
        }

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, other.events.iter().cloned());
        html
    }
}

//! Document model for the Quire renderer.
//!
//! A parsed document is stored as an arena of [`Node`]s addressed by [`NodeId`].
//! Nodes link to their parent, siblings and children by id, so the tree can be
//! walked in any direction without shared ownership. Renderers only ever hold a
//! `&Document` and ids into it.
//!
//! # Traversal
//!
//! [`Cursor`] walks a subtree as a sequence of enter/exit [`Event`]s, the same
//! order a cmark-style iterator produces. It can be reset to any node and can
//! skip the rest of a subtree, which is what section rendering and the
//! fallback renderer rely on.
//!
//! # Directives
//!
//! Nodes may carry a [`Directive`]: extended metadata for sections, images,
//! videos and links that plain Markdown cannot express.
//!
//! # Example
//!
//! ```
//! use quire_ast::{Direction, Document, NodeKind, ParseOptions};
//!
//! let doc = Document::parse("# [Intro]($section#intro)\n\nHello", ParseOptions::default())?;
//! let intro = doc.find_section("intro").expect("section exists");
//! assert_eq!(doc.node(intro).kind.heading_level(), 1);
//!
//! let entered = doc
//!     .cursor(doc.root())
//!     .filter(|event| event.direction == Direction::Enter)
//!     .filter(|event| matches!(doc.node(event.node).kind, NodeKind::Text))
//!     .count();
//! assert_eq!(entered, 2);
//! # Ok::<(), quire_ast::DirectiveError>(())
//! ```

mod cursor;
pub mod directive;
mod document;
mod markdown;
mod node;

pub use cursor::{Cursor, Direction, Event};
pub use directive::{
    BlockDirective, Directive, DirectiveError, ImageDirective, LinkDirective, VideoDirective,
};
pub use document::{Children, Document};
pub use markdown::ParseOptions;
pub use node::{ListKind, Node, NodeId, NodeKind, OtherNode, SourcePos};

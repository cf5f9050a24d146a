//! HTML rendering for Quire documents.
//!
//! Walks a [`quire_ast::Document`] with its enter/exit cursor and writes an
//! HTML fragment (no `<html>`/`<body>` wrapper) to any [`std::io::Write`] sink.
//!
//! # Components
//!
//! - [`HtmlRenderer`]: per-kind emission rules, section truncation, directive
//!   resolution for links, images and videos, and code block rendering.
//! - [`TocBuilder`]: nested `<ul>` tree from the top-level headings.
//! - [`Highlighter`]: syntax highlighting collaborator, with
//!   [`SyntectHighlighter`] (default) and [`PlainHighlighter`].
//! - [`FallbackRenderer`]: collaborator for node kinds without a dedicated
//!   rule, with [`EventFallback`] (default).
//!
//! # Errors
//!
//! Sink failures surface as [`RenderError::Io`]. Unsupported constructs and
//! highlighter failures are fatal ([`RenderError::is_fatal`]) and carry the
//! document path and source position.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use quire_ast::{Document, ParseOptions};
//!
//! let doc = Document::parse("- one\n- two\n", ParseOptions::default())?;
//! let mut html = Vec::new();
//! quire_renderer::render(&doc, doc.root(), true, Path::new("list.md"), &mut html)?;
//! assert_eq!(String::from_utf8(html)?, "<ul><li>one</li><li>two</li></ul>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod code_block;
mod directive;
mod error;
mod fallback;
mod highlight;
mod renderer;
mod toc;
mod util;

use std::io::Write;
use std::path::Path;

use quire_ast::{Document, NodeId};

pub use code_block::RAW_HTML_FENCE;
pub use error::RenderError;
pub use fallback::{EventFallback, FallbackRenderer};
pub use highlight::{HighlightError, Highlighter, PlainHighlighter, SyntectHighlighter};
pub use renderer::HtmlRenderer;
pub use toc::TocBuilder;
pub use util::escape_html;

/// Render `doc` from `start` with the default collaborators.
///
/// Same contract as [`HtmlRenderer::render`], including for the root: the
/// walk stops at the first section heading, and with `render_heading` false
/// the root has no sibling to start from, so nothing is written. Use
/// [`HtmlRenderer::render_document`] to render every section.
pub fn render(
    doc: &Document,
    start: NodeId,
    render_heading: bool,
    path: &Path,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    HtmlRenderer::new(doc)
        .with_path(path)
        .render(start, render_heading, out)
}

/// Write the table of contents of `doc`.
pub fn build_toc(doc: &Document, out: &mut dyn Write) -> Result<(), RenderError> {
    TocBuilder::new(doc).build(out)
}

//! Node dispatcher: walks cursor events and emits HTML.

use std::io::Write;
use std::path::Path;

use quire_ast::{Cursor, Direction, Directive, Document, Event, ListKind, NodeId, NodeKind};

use crate::code_block::{CodeBlock, render_code_block};
use crate::directive::{Flow, render_image, render_link};
use crate::error::RenderError;
use crate::fallback::{EventFallback, FallbackRenderer};
use crate::highlight::{Highlighter, SyntectHighlighter};
use crate::util::{DEFAULT_PATH, escape_html, tag, write_id_class};

/// HTML renderer for a parsed [`Document`].
///
/// The renderer borrows the document and its collaborators; it holds no state
/// between calls, so one renderer can produce several fragments of the same
/// document.
///
/// # Sections
///
/// A section is a heading carrying a Block directive. Rendering started at a
/// node stops before the next section heading, which makes it possible to
/// render a single section out of a larger document:
///
/// ```
/// use quire_ast::{Document, ParseOptions};
/// use quire_renderer::HtmlRenderer;
///
/// let doc = Document::parse(
///     "# [One]($section#one)\n\nFirst\n\n# [Two]($section#two)\n\nSecond\n",
///     ParseOptions::default(),
/// )?;
/// let mut out = Vec::new();
/// HtmlRenderer::new(&doc).render_section("one", false, &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "<p>First</p>");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HtmlRenderer<'a> {
    doc: &'a Document,
    path: &'a Path,
    highlighter: &'a dyn Highlighter,
    fallback: &'a dyn FallbackRenderer,
}

impl<'a> HtmlRenderer<'a> {
    /// Create a renderer with syntect highlighting and event-replay fallback.
    #[must_use]
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            path: Path::new(DEFAULT_PATH),
            highlighter: &SyntectHighlighter,
            fallback: &EventFallback,
        }
    }

    /// Set the document path used in diagnostics.
    #[must_use]
    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = path;
        self
    }

    /// Set the highlighter for fenced code blocks with a language.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: &'a dyn Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Set the renderer for nodes without a dedicated emission rule.
    #[must_use]
    pub fn with_fallback(mut self, fallback: &'a dyn FallbackRenderer) -> Self {
        self.fallback = fallback;
        self
    }

    /// Render the whole document, section headings included.
    pub fn render_document(&self, out: &mut dyn Write) -> Result<(), RenderError> {
        tracing::debug!(path = %self.path.display(), "Rendering document");
        self.walk(self.doc.root(), None, out)
    }

    /// Render the section whose heading has the Block directive id `id`.
    ///
    /// With `render_heading` false only the section body is emitted.
    pub fn render_section(
        &self,
        id: &str,
        render_heading: bool,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let heading = self
            .doc
            .find_section(id)
            .ok_or_else(|| RenderError::SectionNotFound(id.to_owned()))?;
        self.render(heading, render_heading, out)
    }

    /// Render from `start` up to the next section boundary.
    ///
    /// With `render_heading` true the walk begins at `start` itself,
    /// otherwise at its next sibling. The walk stops, without emitting, when
    /// it enters a section heading other than `start`, or when it would leave
    /// a container that encloses `start`. Containers opened during the walk
    /// that enclose the stopping heading are closed first.
    pub fn render(
        &self,
        start: NodeId,
        render_heading: bool,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let begin = if render_heading {
            Some(start)
        } else {
            self.doc.node(start).next_sibling()
        };
        let Some(begin) = begin else {
            tracing::debug!(path = %self.path.display(), "Nothing to render after start node");
            return Ok(());
        };

        tracing::debug!(
            path = %self.path.display(),
            start = start.index(),
            render_heading,
            "Rendering section"
        );
        self.walk(begin, Some(start), out)
    }

    /// Emit events from `begin` on. Section boundaries apply only when a
    /// `start` node is given.
    fn walk(
        &self,
        begin: NodeId,
        start: Option<NodeId>,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut cursor = self.doc.cursor(self.doc.root());
        cursor.reset(begin, Direction::Enter);

        while let Some(event) = cursor.next() {
            if start.is_some_and(|start| self.is_boundary(start, event)) {
                tracing::debug!(
                    path = %self.path.display(),
                    node = event.node.index(),
                    "Stopping at section boundary"
                );
                if event.direction == Direction::Enter {
                    self.close_open_containers(&mut cursor, begin, event.node, out)?;
                }
                break;
            }
            self.render_event(&mut cursor, event, out)?;
        }

        Ok(())
    }

    /// Emit the exit events of the containers entered since `begin` that
    /// still enclose `boundary`, innermost first.
    fn close_open_containers(
        &self,
        cursor: &mut Cursor<'_>,
        begin: NodeId,
        boundary: NodeId,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut current = self.doc.node(boundary).parent();
        while let Some(id) = current {
            if self.doc.is_ancestor(id, begin) {
                break;
            }
            self.render_event(cursor, Event::exit(id), out)?;
            current = self.doc.node(id).parent();
        }
        Ok(())
    }

    fn is_boundary(&self, start: NodeId, event: Event) -> bool {
        match event.direction {
            Direction::Enter => {
                event.node != start && self.doc.node(event.node).is_section_heading()
            }
            Direction::Exit => self.doc.is_ancestor(event.node, start),
        }
    }

    fn render_event(
        &self,
        cursor: &mut Cursor<'_>,
        event: Event,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let id = event.node;
        let node = self.doc.node(id);
        let entering = event.direction == Direction::Enter;

        match &node.kind {
            NodeKind::Document | NodeKind::CustomBlock | NodeKind::CustomInline => {}
            NodeKind::BlockQuote => tag(out, entering, "blockquote")?,
            NodeKind::List { kind, .. } => match (kind, entering) {
                (ListKind::Bullet, true) => out.write_all(b"<ul>")?,
                (ListKind::Bullet, false) => out.write_all(b"</ul>")?,
                (ListKind::Ordered { start: 1 }, true) => out.write_all(b"<ol>")?,
                (ListKind::Ordered { start }, true) => write!(out, "<ol start=\"{start}\">")?,
                (ListKind::Ordered { .. }, false) => out.write_all(b"</ol>")?,
            },
            NodeKind::Item => tag(out, entering, "li")?,
            // Text literals hold decoded entities and are written as-is, so
            // `&lt;` in the source reaches the output as `<`.
            NodeKind::HtmlBlock | NodeKind::HtmlInline | NodeKind::Text => {
                if entering {
                    out.write_all(node.literal().as_bytes())?;
                }
            }
            NodeKind::Paragraph => {
                if !self.in_tight_list(id) {
                    tag(out, entering, "p")?;
                }
            }
            NodeKind::Heading { level } => {
                if entering {
                    write!(out, "<h{level}")?;
                    if let Some(directive @ Directive::Block(_)) = &node.directive {
                        write_id_class(out, directive)?;
                    }
                    out.write_all(b">")?;
                } else {
                    write!(out, "</h{level}>")?;
                }
            }
            NodeKind::ThematicBreak => {
                if entering {
                    out.write_all(b"<hr>")?;
                }
            }
            NodeKind::SoftBreak => {
                if entering {
                    out.write_all(b" ")?;
                }
            }
            NodeKind::LineBreak => {
                if entering {
                    out.write_all(b"<br>")?;
                }
            }
            NodeKind::Code => {
                if entering {
                    write!(out, "<code>{}</code>", escape_html(node.literal()))?;
                }
            }
            NodeKind::Emph => tag(out, entering, "em")?,
            NodeKind::Strong => tag(out, entering, "strong")?,
            NodeKind::Link { .. } => {
                if render_link(node, event.direction, self.path, out)? == Flow::SkipChildren {
                    cursor.skip_subtree(id);
                }
            }
            NodeKind::Image { .. } => {
                if render_image(self.doc, id, event.direction, self.path, out)?
                    == Flow::SkipChildren
                {
                    cursor.skip_subtree(id);
                }
            }
            NodeKind::CodeBlock { info } => {
                if entering {
                    let block = CodeBlock {
                        code: node.literal(),
                        info,
                        position: node.position,
                        path: self.path,
                    };
                    render_code_block(&block, self.highlighter, out)?;
                }
            }
            NodeKind::FootnoteDefinition => {
                tracing::error!(
                    path = %self.path.display(),
                    line = node.position.line,
                    column = node.position.column,
                    "Footnote definitions are not supported"
                );
                return Err(RenderError::Unsupported {
                    feature: "footnote definition".to_owned(),
                    path: self.path.to_path_buf(),
                    position: node.position,
                });
            }
            NodeKind::Other(_) => {
                if entering {
                    out.write_all(self.fallback.render(self.doc, id).as_bytes())?;
                    cursor.skip_subtree(id);
                }
            }
        }

        Ok(())
    }

    /// Whether a paragraph sits directly in an item of a tight list.
    fn in_tight_list(&self, paragraph: NodeId) -> bool {
        let Some(item) = self.doc.node(paragraph).parent() else {
            return false;
        };
        if !matches!(self.doc.node(item).kind, NodeKind::Item) {
            return false;
        }
        self.doc
            .node(item)
            .parent()
            .is_some_and(|list| {
                matches!(self.doc.node(list).kind, NodeKind::List { tight: true, .. })
            })
    }
}

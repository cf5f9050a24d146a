//! Table of contents built from top-level headings.

use std::cmp::Ordering;
use std::io::Write;
use std::path::Path;

use quire_ast::{Direction, Document, NodeId, NodeKind};

use crate::error::RenderError;
use crate::util::{DEFAULT_PATH, escape_html, tag};

/// Builds a nested `<ul>` tree from the headings directly under the document root.
///
/// Heading levels may jump by more than one; every skipped level still gets
/// its own `<ul><li>` so the output is always balanced.
///
/// # Example
///
/// ```
/// use quire_ast::{Document, ParseOptions};
/// use quire_renderer::TocBuilder;
///
/// let doc = Document::parse("# [A]($section#a)\n\n## B\n", ParseOptions::default())?;
/// let mut out = Vec::new();
/// TocBuilder::new(&doc).build(&mut out)?;
/// assert_eq!(
///     String::from_utf8(out)?,
///     "<ul><li><a href=\"#a\">A</a><ul><li>B</li></ul></li></ul>"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TocBuilder<'a> {
    doc: &'a Document,
    path: &'a Path,
}

impl<'a> TocBuilder<'a> {
    #[must_use]
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            path: Path::new(DEFAULT_PATH),
        }
    }

    /// Set the document path used in diagnostics.
    #[must_use]
    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = path;
        self
    }

    /// Write the TOC to `out`.
    pub fn build(&self, out: &mut dyn Write) -> Result<(), RenderError> {
        let mut level = 1;
        let mut first = true;

        out.write_all(b"<ul>")?;

        for heading in self.doc.children(self.doc.root()) {
            let heading_level = self.doc.node(heading).kind.heading_level();
            if heading_level == 0 || self.is_hidden(heading) {
                continue;
            }

            match heading_level.cmp(&level) {
                Ordering::Greater => {
                    if first {
                        out.write_all(b"<li>")?;
                    }
                    for _ in level..heading_level {
                        out.write_all(b"<ul><li>")?;
                    }
                }
                Ordering::Less => {
                    out.write_all(b"</li>")?;
                    for _ in heading_level..level {
                        out.write_all(b"</ul></li>")?;
                    }
                    out.write_all(b"<li>")?;
                }
                Ordering::Equal => {
                    if !first {
                        out.write_all(b"</li>")?;
                    }
                    out.write_all(b"<li>")?;
                }
            }

            self.render_entry(heading, out)?;
            level = heading_level;
            first = false;
        }

        if !first {
            out.write_all(b"</li>")?;
        }
        while level > 1 {
            out.write_all(b"</ul></li>")?;
            level -= 1;
        }
        out.write_all(b"</ul>")?;

        tracing::debug!(path = %self.path.display(), "Built table of contents");
        Ok(())
    }

    /// A section marker whose caption has no text stays out of the TOC.
    fn is_hidden(&self, heading: NodeId) -> bool {
        if self.doc.node(heading).block_directive().is_none() {
            return false;
        }
        let caption = self
            .doc
            .children(heading)
            .find(|&child| matches!(self.doc.node(child).kind, NodeKind::Link { .. }))
            .unwrap_or(heading);
        !self.doc.has_text(caption)
    }

    fn render_entry(&self, heading: NodeId, out: &mut dyn Write) -> Result<(), RenderError> {
        let anchor = self
            .doc
            .node(heading)
            .block_directive()
            .and_then(|block| block.id.as_deref());

        if let Some(id) = anchor {
            write!(out, "<a href=\"#{}\">", escape_html(id))?;
        }
        self.render_inlines(heading, out)?;
        if anchor.is_some() {
            out.write_all(b"</a>")?;
        }
        Ok(())
    }

    /// Inline content of a heading. Links contribute only their text.
    fn render_inlines(&self, heading: NodeId, out: &mut dyn Write) -> Result<(), RenderError> {
        for event in self.doc.cursor(heading) {
            if event.node == heading {
                continue;
            }
            let node = self.doc.node(event.node);
            let entering = event.direction == Direction::Enter;

            match &node.kind {
                NodeKind::Text if entering => out.write_all(node.literal().as_bytes())?,
                NodeKind::SoftBreak if entering => out.write_all(b" ")?,
                NodeKind::LineBreak if entering => out.write_all(b"<br>")?,
                NodeKind::Code if entering => {
                    write!(out, "<code>{}</code>", escape_html(node.literal()))?;
                }
                NodeKind::Emph => tag(out, entering, "em")?,
                NodeKind::Strong => tag(out, entering, "strong")?,
                NodeKind::Text
                | NodeKind::SoftBreak
                | NodeKind::LineBreak
                | NodeKind::Code
                | NodeKind::Link { .. } => {}
                kind => {
                    tracing::error!(
                        path = %self.path.display(),
                        line = node.position.line,
                        column = node.position.column,
                        kind = kind.name(),
                        "Unsupported inline in table of contents heading"
                    );
                    return Err(RenderError::Unsupported {
                        feature: format!("{} in table of contents", kind.name()),
                        path: self.path.to_path_buf(),
                        position: node.position,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quire_ast::ParseOptions;

    use super::*;

    fn toc(markdown: &str) -> Result<String, RenderError> {
        let doc = Document::parse(markdown, ParseOptions::default()).unwrap();
        let mut out = Vec::new();
        TocBuilder::new(&doc).build(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(toc("just text").unwrap(), "<ul></ul>");
    }

    #[test]
    fn test_same_level() {
        assert_eq!(
            toc("# A\n\n# B\n").unwrap(),
            "<ul><li>A</li><li>B</li></ul>"
        );
    }

    #[test]
    fn test_nested_and_back() {
        assert_eq!(
            toc("# A\n\n## B\n\n# C\n").unwrap(),
            "<ul><li>A<ul><li>B</li></ul></li><li>C</li></ul>"
        );
    }

    #[test]
    fn test_level_jump_opens_each_level() {
        assert_eq!(
            toc("# A\n\n### B\n").unwrap(),
            "<ul><li>A<ul><li><ul><li>B</li></ul></li></ul></li></ul>"
        );
    }

    #[test]
    fn test_first_heading_deeper_than_one() {
        assert_eq!(
            toc("## A\n\n## B\n").unwrap(),
            "<ul><li><ul><li>A</li><li>B</li></ul></li></ul>"
        );
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            toc("# *A* **B** `c<d`\n").unwrap(),
            "<ul><li><em>A</em> <strong>B</strong> <code>c&lt;d</code></li></ul>"
        );
    }

    #[test]
    fn test_links_render_text_only() {
        assert_eq!(
            toc("# See [docs](/docs)\n").unwrap(),
            "<ul><li>See docs</li></ul>"
        );
    }

    #[test]
    fn test_section_anchor() {
        assert_eq!(
            toc("## [Intro]($section#intro)\n").unwrap(),
            "<ul><li><ul><li><a href=\"#intro\">Intro</a></li></ul></li></ul>"
        );
    }

    #[test]
    fn test_hidden_section_marker() {
        assert_eq!(
            toc("# []($section#hidden)\n\n# Shown\n").unwrap(),
            "<ul><li>Shown</li></ul>"
        );
    }

    #[test]
    fn test_nested_headings_are_ignored() {
        assert_eq!(
            toc("> # Quoted\n\n# Top\n").unwrap(),
            "<ul><li>Top</li></ul>"
        );
    }

    #[test]
    fn test_unsupported_inline() {
        let err = toc("# Logo ![x](logo.png)\n").unwrap_err();
        assert!(matches!(err, RenderError::Unsupported { .. }));
        assert_eq!(
            err.to_string(),
            "<input>:1:8: image in table of contents is not supported"
        );
    }
}

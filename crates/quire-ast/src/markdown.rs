//! Builds a [`Document`] from pulldown-cmark events.

use pulldown_cmark::{CodeBlockKind, Event as MdEvent, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::directive::{Directive, DirectiveError, parse_directive};
use crate::document::Document;
use crate::node::{ListKind, NodeId, NodeKind, OtherNode, SourcePos};

/// Markdown extensions enabled while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParseOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
            tasklists: true,
            smart_punctuation: false,
        }
    }
}

impl ParseOptions {
    /// Equivalent pulldown-cmark option flags.
    #[must_use]
    pub fn to_pulldown(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        options
    }
}

impl Document {
    /// Parse Markdown into a document.
    ///
    /// Links and images whose destination starts with `$` become directives
    /// (see [`crate::directive`]).
    ///
    /// Text literals hold the decoded text: entity and numeric character
    /// references are already resolved, so `&lt;` is stored as `<`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError`] when a directive is malformed.
    pub fn parse(markdown: &str, options: ParseOptions) -> Result<Self, DirectiveError> {
        let parser = Parser::new_ext(markdown, options.to_pulldown());
        let mut builder = TreeBuilder::new(markdown);
        for (event, range) in parser.into_offset_iter() {
            builder.event(event, range.start)?;
        }
        let doc = builder.finish();
        tracing::debug!(nodes = doc.len(), "Parsed document");
        Ok(doc)
    }
}

/// Maps byte offsets to 1-based line/column positions.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    fn position(&self, offset: usize) -> SourcePos {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line.saturating_sub(1)];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        SourcePos::new(line, column + 1)
    }
}

/// Events captured for an unrecognized node.
struct Capture {
    node: NodeId,
    events: Vec<MdEvent<'static>>,
}

/// Open list and whether any of its items had an explicit paragraph.
struct OpenList {
    node: NodeId,
    loose: bool,
}

struct TreeBuilder<'a> {
    doc: Document,
    lines: LineIndex<'a>,
    stack: Vec<NodeId>,
    lists: Vec<OpenList>,
    captures: Vec<Capture>,
    /// Paragraph opened for inline content of a tight list item.
    implicit_paragraph: Option<NodeId>,
    in_metadata: bool,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            doc,
            lines: LineIndex::new(source),
            stack: vec![root],
            lists: Vec::new(),
            captures: Vec::new(),
            implicit_paragraph: None,
            in_metadata: false,
        }
    }

    fn finish(self) -> Document {
        self.doc
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn append(&mut self, kind: NodeKind, position: SourcePos) -> NodeId {
        let parent = self.current();
        let id = self.doc.append(parent, kind);
        self.doc.set_position(id, position);
        id
    }

    fn open(&mut self, kind: NodeKind, position: SourcePos) -> NodeId {
        let id = self.append(kind, position);
        self.stack.push(id);
        id
    }

    fn close(&mut self) -> NodeId {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        let id = self.current();
        // `current` now points at the parent; report the node just closed.
        self.doc.node(id).last_child().unwrap_or(id)
    }

    fn event(&mut self, event: MdEvent<'_>, offset: usize) -> Result<(), DirectiveError> {
        if self.in_metadata {
            if matches!(event, MdEvent::End(TagEnd::MetadataBlock(_))) {
                self.in_metadata = false;
            }
            return Ok(());
        }

        for capture in &mut self.captures {
            capture.events.push(event.clone().into_static());
        }

        let position = self.lines.position(offset);
        if is_inline(&event) {
            self.prepare_inline(position);
        } else if is_block_start(&event) {
            self.close_implicit_paragraph();
        }

        match event {
            MdEvent::Start(tag) => self.start(tag, position)?,
            MdEvent::End(tag) => self.end(tag),
            MdEvent::Text(text) => self.text(&text, position),
            MdEvent::Code(code) => {
                let id = self.append(NodeKind::Code, position);
                self.doc.set_literal(id, code.as_ref());
            }
            MdEvent::Html(html) => {
                let current = self.current();
                if matches!(self.doc.node(current).kind, NodeKind::HtmlBlock) {
                    self.doc.push_literal(current, &html);
                } else {
                    let id = self.append(NodeKind::HtmlBlock, position);
                    self.doc.set_literal(id, html.as_ref());
                }
            }
            MdEvent::InlineHtml(html) => {
                let id = self.append(NodeKind::HtmlInline, position);
                self.doc.set_literal(id, html.as_ref());
            }
            MdEvent::SoftBreak => {
                self.append(NodeKind::SoftBreak, position);
            }
            MdEvent::HardBreak => {
                self.append(NodeKind::LineBreak, position);
            }
            MdEvent::Rule => {
                self.append(NodeKind::ThematicBreak, position);
            }
            event @ (MdEvent::FootnoteReference(_)
            | MdEvent::TaskListMarker(_)
            | MdEvent::InlineMath(_)
            | MdEvent::DisplayMath(_)) => {
                let name = match event {
                    MdEvent::FootnoteReference(_) => "footnote reference",
                    MdEvent::TaskListMarker(_) => "task list marker",
                    _ => "math",
                };
                self.append(
                    NodeKind::Other(OtherNode {
                        name,
                        events: vec![event.into_static()],
                    }),
                    position,
                );
            }
        }

        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>, position: SourcePos) -> Result<(), DirectiveError> {
        if let Some(name) = other_tag_name(&tag) {
            let id = self.open(NodeKind::Other(OtherNode::new(name)), position);
            self.captures.push(Capture {
                node: id,
                events: vec![MdEvent::Start(tag).into_static()],
            });
            return Ok(());
        }

        match tag {
            Tag::Paragraph => {
                if matches!(self.doc.node(self.current()).kind, NodeKind::Item)
                    && let Some(list) = self.lists.last_mut()
                {
                    list.loose = true;
                }
                self.open(NodeKind::Paragraph, position);
            }
            Tag::Heading { level, .. } => {
                self.open(
                    NodeKind::Heading {
                        level: heading_level_to_num(level),
                    },
                    position,
                );
            }
            Tag::BlockQuote(_) => {
                self.open(NodeKind::BlockQuote, position);
            }
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let id = self.open(NodeKind::CodeBlock { info }, position);
                self.doc.set_literal(id, String::new());
            }
            Tag::HtmlBlock => {
                let id = self.open(NodeKind::HtmlBlock, position);
                self.doc.set_literal(id, String::new());
            }
            Tag::List(start) => {
                let kind = start.map_or(ListKind::Bullet, |start| ListKind::Ordered { start });
                let node = self.open(NodeKind::List { kind, tight: true }, position);
                self.lists.push(OpenList { node, loose: false });
            }
            Tag::Item => {
                self.open(NodeKind::Item, position);
            }
            Tag::FootnoteDefinition(_) => {
                self.open(NodeKind::FootnoteDefinition, position);
            }
            Tag::MetadataBlock(_) => {
                self.in_metadata = true;
            }
            Tag::Emphasis => {
                self.open(NodeKind::Emph, position);
            }
            Tag::Strong => {
                self.open(NodeKind::Strong, position);
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                let directive = parse_directive(&dest_url, &title, position)?;
                let parent = self.current();
                let first_in_heading = self.doc.node(parent).kind.heading_level() > 0
                    && self.doc.node(parent).first_child().is_none();

                let id = self.open(
                    NodeKind::Link {
                        url: dest_url.to_string(),
                        title: title.to_string(),
                    },
                    position,
                );
                if let Some(directive) = directive {
                    if first_in_heading && matches!(directive, Directive::Block(_)) {
                        self.doc.set_directive(parent, directive.clone());
                    }
                    self.doc.set_directive(id, directive);
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let directive = parse_directive(&dest_url, &title, position)?;
                let id = self.open(
                    NodeKind::Image {
                        url: dest_url.to_string(),
                        title: title.to_string(),
                    },
                    position,
                );
                if let Some(directive) = directive {
                    self.doc.set_directive(id, directive);
                }
            }
            // Covered by `other_tag_name`
            Tag::Table(_)
            | Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::Strikethrough
            | Tag::Superscript
            | Tag::Subscript
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
        }

        Ok(())
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Item => {
                self.close_implicit_paragraph();
                self.close();
            }
            TagEnd::List(_) => {
                let id = self.close();
                if let Some(list) = self.lists.pop()
                    && let NodeKind::List { tight, .. } = &mut self.doc.node_mut(list.node).kind
                {
                    debug_assert_eq!(list.node, id);
                    *tight = !list.loose;
                }
            }
            TagEnd::Image => {
                let id = self.close();
                self.fill_image_alt(id);
            }
            TagEnd::MetadataBlock(_) => {}
            tag if is_other_end(tag) => {
                let id = self.close();
                if let Some(capture) = self.captures.pop() {
                    debug_assert_eq!(capture.node, id);
                    if let NodeKind::Other(other) = &mut self.doc.node_mut(capture.node).kind {
                        other.events = capture.events;
                    }
                }
            }
            _ => {
                self.close();
            }
        }
    }

    fn text(&mut self, text: &str, position: SourcePos) {
        let current = self.current();
        if matches!(
            self.doc.node(current).kind,
            NodeKind::CodeBlock { .. } | NodeKind::HtmlBlock
        ) {
            self.doc.push_literal(current, text);
            return;
        }

        // pulldown-cmark splits text runs; keep adjacent runs in one node
        if let Some(last) = self.doc.node(current).last_child()
            && matches!(self.doc.node(last).kind, NodeKind::Text)
        {
            self.doc.push_literal(last, text);
            return;
        }

        let id = self.append(NodeKind::Text, position);
        self.doc.set_literal(id, text);
    }

    /// Open an implicit paragraph when inline content lands directly in an item.
    fn prepare_inline(&mut self, position: SourcePos) {
        if matches!(self.doc.node(self.current()).kind, NodeKind::Item) {
            let id = self.open(NodeKind::Paragraph, position);
            self.implicit_paragraph = Some(id);
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if let Some(id) = self.implicit_paragraph
            && self.current() == id
        {
            self.stack.pop();
            self.implicit_paragraph = None;
        }
    }

    /// Image directives default their alt text to the image description.
    fn fill_image_alt(&mut self, id: NodeId) {
        let alt = self.doc.text_content(id);
        if alt.is_empty() {
            return;
        }
        if let Some(Directive::Image(image)) = &mut self.doc.node_mut(id).directive
            && image.alt.is_none()
        {
            image.alt = Some(alt);
        }
    }
}

fn is_inline(event: &MdEvent<'_>) -> bool {
    match event {
        MdEvent::Text(_)
        | MdEvent::Code(_)
        | MdEvent::InlineHtml(_)
        | MdEvent::SoftBreak
        | MdEvent::HardBreak
        | MdEvent::FootnoteReference(_)
        | MdEvent::TaskListMarker(_)
        | MdEvent::InlineMath(_)
        | MdEvent::DisplayMath(_) => true,
        MdEvent::Start(tag) => matches!(
            tag,
            Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Superscript
                | Tag::Subscript
                | Tag::Link { .. }
                | Tag::Image { .. }
        ),
        _ => false,
    }
}

fn is_block_start(event: &MdEvent<'_>) -> bool {
    match event {
        MdEvent::Rule | MdEvent::Html(_) => true,
        MdEvent::Start(tag) => !matches!(
            tag,
            Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Superscript
                | Tag::Subscript
                | Tag::Link { .. }
                | Tag::Image { .. }
        ),
        _ => false,
    }
}

/// Name for tags that become [`NodeKind::Other`].
fn other_tag_name(tag: &Tag<'_>) -> Option<&'static str> {
    Some(match tag {
        Tag::Table(_) => "table",
        Tag::TableHead => "table head",
        Tag::TableRow => "table row",
        Tag::TableCell => "table cell",
        Tag::Strikethrough => "strikethrough",
        Tag::Superscript => "superscript",
        Tag::Subscript => "subscript",
        Tag::DefinitionList => "definition list",
        Tag::DefinitionListTitle => "definition title",
        Tag::DefinitionListDefinition => "definition",
        _ => return None,
    })
}

fn is_other_end(tag: TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
    )
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive::ImageDirective;

    fn parse(markdown: &str) -> Document {
        Document::parse(markdown, ParseOptions::default()).unwrap()
    }

    fn kinds(doc: &Document, id: NodeId) -> Vec<&'static str> {
        doc.children(id).map(|c| doc.node(c).kind.name()).collect()
    }

    #[test]
    fn test_paragraph_and_heading() {
        let doc = parse("# Title\n\nSome *text*");
        assert_eq!(kinds(&doc, doc.root()), vec!["heading", "paragraph"]);

        let para = doc.children(doc.root()).nth(1).unwrap();
        assert_eq!(kinds(&doc, para), vec!["text", "emphasis"]);
        assert_eq!(doc.text_content(para), "Some text");
    }

    #[test]
    fn test_tight_list_gets_implicit_paragraphs() {
        let doc = parse("- one\n- two\n");
        let list = doc.node(doc.root()).first_child().unwrap();
        assert!(matches!(
            doc.node(list).kind,
            NodeKind::List {
                kind: ListKind::Bullet,
                tight: true
            }
        ));

        let item = doc.node(list).first_child().unwrap();
        assert_eq!(kinds(&doc, item), vec!["paragraph"]);
        assert_eq!(doc.text_content(item), "one");
    }

    #[test]
    fn test_loose_list() {
        let doc = parse("1. one\n\n2. two\n");
        let list = doc.node(doc.root()).first_child().unwrap();
        assert!(matches!(
            doc.node(list).kind,
            NodeKind::List {
                kind: ListKind::Ordered { start: 1 },
                tight: false
            }
        ));
    }

    #[test]
    fn test_nested_tight_list() {
        let doc = parse("- a\n  - b\n");
        let list = doc.node(doc.root()).first_child().unwrap();
        let item = doc.node(list).first_child().unwrap();
        assert_eq!(kinds(&doc, item), vec!["paragraph", "list"]);
    }

    #[test]
    fn test_code_block_literal_and_info() {
        let doc = parse("```rust ignore\nfn main() {}\n```\n");
        let block = doc.node(doc.root()).first_child().unwrap();
        let node = doc.node(block);
        assert_eq!(
            node.kind,
            NodeKind::CodeBlock {
                info: "rust ignore".to_owned()
            }
        );
        assert_eq!(node.literal(), "fn main() {}\n");
        assert_eq!(node.position, SourcePos::new(1, 1));
    }

    #[test]
    fn test_positions() {
        let doc = parse("para\n\n> quote *x*\n");
        let quote = doc.children(doc.root()).nth(1).unwrap();
        assert_eq!(doc.node(quote).position, SourcePos::new(3, 1));

        let para = doc.node(quote).first_child().unwrap();
        let emph = doc.children(para).nth(1).unwrap();
        assert_eq!(doc.node(emph).position, SourcePos::new(3, 9));
    }

    #[test]
    fn test_section_directive_attaches_to_heading() {
        let doc = parse("## [Intro]($section#intro.lead)\n");
        let heading = doc.node(doc.root()).first_child().unwrap();
        let block = doc.node(heading).block_directive().unwrap();
        assert_eq!(block.id.as_deref(), Some("intro"));
        assert_eq!(block.classes, vec!["lead"]);

        let link = doc.node(heading).first_child().unwrap();
        assert!(doc.node(link).block_directive().is_some());
    }

    #[test]
    fn test_section_link_not_first_does_not_mark_heading() {
        let doc = parse("## Intro [x]($section#intro)\n");
        let heading = doc.node(doc.root()).first_child().unwrap();
        assert!(doc.node(heading).directive.is_none());
    }

    #[test]
    fn test_image_directive_alt_defaults_to_description() {
        let doc = parse("![A cat]($image \"src=cat.png caption='Ours'\")\n");
        let para = doc.node(doc.root()).first_child().unwrap();
        let image = doc.node(para).first_child().unwrap();
        assert_eq!(
            doc.node(image).directive,
            Some(Directive::Image(ImageDirective {
                id: None,
                classes: Vec::new(),
                src: "cat.png".to_owned(),
                alt: Some("A cat".to_owned()),
                caption: Some("Ours".to_owned()),
            }))
        );
    }

    #[test]
    fn test_malformed_directive_is_an_error() {
        let err = Document::parse("text [x]($nope)\n", ParseOptions::default()).unwrap_err();
        assert!(matches!(err, DirectiveError::UnknownName { .. }));
    }

    #[test]
    fn test_table_becomes_other_with_events() {
        let doc = parse("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let table = doc.node(doc.root()).first_child().unwrap();
        let NodeKind::Other(other) = &doc.node(table).kind else {
            panic!("expected table node");
        };
        assert_eq!(other.name, "table");
        assert!(matches!(other.events.first(), Some(MdEvent::Start(Tag::Table(_)))));
        assert!(matches!(other.events.last(), Some(MdEvent::End(TagEnd::Table))));
    }

    #[test]
    fn test_html_block_literal() {
        let doc = parse("<div>\nhi\n</div>\n");
        let block = doc.node(doc.root()).first_child().unwrap();
        assert_eq!(doc.node(block).kind, NodeKind::HtmlBlock);
        assert_eq!(doc.node(block).literal(), "<div>\nhi\n</div>\n");
    }

    #[test]
    fn test_front_matter_is_dropped() {
        let doc = parse("---\ntitle: x\n---\n\nBody\n");
        assert_eq!(kinds(&doc, doc.root()), vec!["paragraph"]);
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let doc = parse("a [b c\n");
        let para = doc.node(doc.root()).first_child().unwrap();
        assert_eq!(kinds(&doc, para), vec!["text"]);
        assert_eq!(doc.text_content(para), "a [b c");
    }

    #[test]
    fn test_entities_are_decoded_in_text() {
        let doc = parse("a &lt;b&gt; &amp; c\n");
        let para = doc.node(doc.root()).first_child().unwrap();
        assert_eq!(kinds(&doc, para), vec!["text"]);
        assert_eq!(doc.text_content(para), "a <b> & c");
    }
}

//! Link and image rendering, including directive resolution.
//!
//! A Link or Image node either renders as its plain Markdown counterpart or,
//! when it carries a directive, as the element the directive describes:
//!
//! | Node | Directive | Output |
//! |---|---|---|
//! | Link | none | `<a href>` around the link text |
//! | Link | Link | `<a id class href target>` around the link text |
//! | Link, Image | Block | nothing; children render normally |
//! | Image | none | `<img>`, in a `<figure data-title>` when titled |
//! | Image | Image | `<img id class src alt>`, in a `<figure>` when captioned |
//! | Image | Video | `<video ...><source src></video>` |

use std::io::Write;
use std::path::Path;

use quire_ast::{
    Direction, Directive, Document, ImageDirective, LinkDirective, Node, NodeId, NodeKind,
    VideoDirective,
};

use crate::error::RenderError;
use crate::util::{escape_html, write_id_class};

/// What the dispatcher does after a node was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Keep walking into the node's children.
    Continue,
    /// The node was rendered completely; skip its children and exit event.
    SkipChildren,
}

/// Render a Link node.
pub(crate) fn render_link(
    node: &Node,
    direction: Direction,
    path: &Path,
    out: &mut dyn Write,
) -> Result<Flow, RenderError> {
    let NodeKind::Link { url, title } = &node.kind else {
        return Ok(Flow::Continue);
    };

    match (&node.directive, direction) {
        (None, Direction::Enter) => {
            write!(out, "<a href=\"{}\"", escape_html(url))?;
            if !title.is_empty() {
                write!(out, " title=\"{}\"", escape_html(title))?;
            }
            out.write_all(b">")?;
        }
        (Some(directive @ Directive::Link(link)), Direction::Enter) => {
            write_link_open(out, directive, link)?;
        }
        (None | Some(Directive::Link(_)), Direction::Exit) => out.write_all(b"</a>")?,
        (Some(Directive::Block(_)), _) => {}
        (Some(directive @ (Directive::Image(_) | Directive::Video(_))), _) => {
            return Err(unsupported(node, directive, "link", path));
        }
    }

    Ok(Flow::Continue)
}

/// Render an Image node.
///
/// Images are emitted whole on enter; their description is used as alt text
/// and their children are skipped.
pub(crate) fn render_image(
    doc: &Document,
    id: NodeId,
    direction: Direction,
    path: &Path,
    out: &mut dyn Write,
) -> Result<Flow, RenderError> {
    let node = doc.node(id);
    let NodeKind::Image { url, title } = &node.kind else {
        return Ok(Flow::Continue);
    };

    match &node.directive {
        Some(Directive::Block(_)) => Ok(Flow::Continue),
        Some(directive @ Directive::Link(_)) => Err(unsupported(node, directive, "image", path)),
        _ if direction == Direction::Exit => Ok(Flow::Continue),
        None => {
            write_plain_image(out, url, title, &doc.text_content(id))?;
            Ok(Flow::SkipChildren)
        }
        Some(directive @ Directive::Image(image)) => {
            write_image(out, directive, image)?;
            Ok(Flow::SkipChildren)
        }
        Some(directive @ Directive::Video(video)) => {
            write_video(out, directive, video)?;
            Ok(Flow::SkipChildren)
        }
    }
}

fn write_link_open(
    out: &mut dyn Write,
    directive: &Directive,
    link: &LinkDirective,
) -> Result<(), RenderError> {
    out.write_all(b"<a")?;
    write_id_class(out, directive)?;
    write!(out, " href=\"{}\"", escape_html(&link.src))?;
    if let Some(target) = &link.target {
        write!(out, " target=\"{}\"", escape_html(target))?;
    }
    out.write_all(b">")?;
    Ok(())
}

fn write_plain_image(
    out: &mut dyn Write,
    url: &str,
    title: &str,
    alt: &str,
) -> Result<(), RenderError> {
    let url = escape_html(url);
    let alt = escape_html(alt);
    if title.is_empty() {
        write!(out, "<img src=\"{url}\" alt=\"{alt}\">")?;
    } else {
        let title = escape_html(title);
        write!(
            out,
            "<figure data-title=\"{title}\"><img src=\"{url}\" alt=\"{alt}\" title=\"{title}\"></figure>"
        )?;
    }
    Ok(())
}

fn write_image(
    out: &mut dyn Write,
    directive: &Directive,
    image: &ImageDirective,
) -> Result<(), RenderError> {
    if image.caption.is_some() {
        out.write_all(b"<figure>")?;
    }

    out.write_all(b"<img")?;
    write_id_class(out, directive)?;
    write!(out, " src=\"{}\"", escape_html(&image.src))?;
    if let Some(alt) = &image.alt {
        write!(out, " alt=\"{}\"", escape_html(alt))?;
    }
    out.write_all(b">")?;

    if let Some(caption) = &image.caption {
        write!(out, "<figcaption>{}</figcaption></figure>", escape_html(caption))?;
    }
    Ok(())
}

fn write_video(
    out: &mut dyn Write,
    directive: &Directive,
    video: &VideoDirective,
) -> Result<(), RenderError> {
    out.write_all(b"<video")?;
    write_id_class(out, directive)?;

    let flags = [
        ("loop", video.r#loop),
        ("autoplay", video.autoplay),
        ("muted", video.muted),
        ("controls", video.controls),
    ];
    for (name, value) in flags {
        if value == Some(true) {
            write!(out, " {name}")?;
        }
    }
    if video.pip == Some(false) {
        out.write_all(b" disablepictureinpicture")?;
    }

    write!(
        out,
        "><source src=\"{}\"></video>",
        escape_html(&video.src)
    )?;
    Ok(())
}

fn unsupported(node: &Node, directive: &Directive, carrier: &str, path: &Path) -> RenderError {
    tracing::error!(
        path = %path.display(),
        line = node.position.line,
        column = node.position.column,
        directive = directive.kind_name(),
        "Directive cannot be resolved on this node"
    );
    RenderError::Unsupported {
        feature: format!("${} directive on {carrier}", directive.kind_name()),
        path: path.to_path_buf(),
        position: node.position,
    }
}

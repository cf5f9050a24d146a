//! Extended directive metadata attached to document nodes.
//!
//! Directives describe constructs plain Markdown has no syntax for: section
//! markers, images with captions, videos and links with extra attributes.
//!
//! # Authoring syntax
//!
//! The Markdown adapter recognises links and images whose destination starts
//! with `$name`. The destination may continue with `#id` and `.class` tokens;
//! further `key=value` attributes go in the link title:
//!
//! ```text
//! # [Getting started]($section#start.lead)
//! ![A cat]($image#hero "src=cat.png caption='Our cat'")
//! ![]($video "src=intro.mp4 loop autoplay pip=false")
//! [Docs]($link "src=https://example.com target=_blank")
//! ```
//!
//! # Example
//!
//! ```
//! use quire_ast::{Directive, SourcePos};
//! use quire_ast::directive::parse_directive;
//!
//! let directive = parse_directive("$section#intro.lead", "", SourcePos::new(1, 1))?
//!     .expect("destination is a directive");
//! assert!(matches!(directive, Directive::Block(_)));
//! assert_eq!(directive.id(), Some("intro"));
//! assert_eq!(directive.classes(), ["lead"]);
//! # Ok::<(), quire_ast::DirectiveError>(())
//! ```

mod args;

pub use args::DirectiveArgs;

use crate::node::SourcePos;

/// Prefix that marks a link destination as a directive.
pub const DIRECTIVE_PREFIX: char = '$';

/// Section marker. Carries no output of its own; headings use it for `id`/`class`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockDirective {
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// Image with optional alt text and caption.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageDirective {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub src: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

/// Video element.
///
/// Every flag is tri-state: `None` means the author did not set it and no
/// attribute is emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoDirective {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub src: String,
    pub r#loop: Option<bool>,
    pub autoplay: Option<bool>,
    pub muted: Option<bool>,
    pub controls: Option<bool>,
    /// Picture-in-picture. Only an explicit `false` has an effect.
    pub pip: Option<bool>,
}

/// Link with optional `target`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkDirective {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub src: String,
    pub target: Option<String>,
}

/// Directive attached to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Block(BlockDirective),
    Image(ImageDirective),
    Video(VideoDirective),
    Link(LinkDirective),
}

impl Directive {
    /// The `id` attribute, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Block(d) => d.id.as_deref(),
            Self::Image(d) => d.id.as_deref(),
            Self::Video(d) => d.id.as_deref(),
            Self::Link(d) => d.id.as_deref(),
        }
    }

    /// CSS class tokens in authoring order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        match self {
            Self::Block(d) => &d.classes,
            Self::Image(d) => &d.classes,
            Self::Video(d) => &d.classes,
            Self::Link(d) => &d.classes,
        }
    }

    /// Directive name as written after `$`.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Block(_) => "section",
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::Link(_) => "link",
        }
    }
}

/// Error in directive syntax.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// `$name` is not a known directive.
    #[error("{position}: unknown directive '${name}'")]
    UnknownName { name: String, position: SourcePos },
    /// Image, video and link directives need a source URL.
    #[error("{position}: ${directive} directive requires a 'src' attribute")]
    MissingSource {
        directive: &'static str,
        position: SourcePos,
    },
    /// A boolean flag had a value other than `true`/`false`.
    #[error("{position}: invalid value '{value}' for '{flag}', expected true or false")]
    InvalidFlag {
        flag: String,
        value: String,
        position: SourcePos,
    },
}

/// Parse a link destination and title into a directive.
///
/// Returns `Ok(None)` when the destination does not start with `$`.
///
/// # Errors
///
/// Returns [`DirectiveError`] for unknown names, a missing `src` or
/// malformed boolean flags.
pub fn parse_directive(
    destination: &str,
    title: &str,
    position: SourcePos,
) -> Result<Option<Directive>, DirectiveError> {
    let Some(rest) = destination.strip_prefix(DIRECTIVE_PREFIX) else {
        return Ok(None);
    };

    let name_end = rest.find(['#', '.']).unwrap_or(rest.len());
    let (name, selectors) = rest.split_at(name_end);
    let mut args = DirectiveArgs::parse(&format!("{selectors} {title}"));

    let directive = match name {
        "section" | "block" => Directive::Block(BlockDirective {
            id: args.id.take(),
            classes: std::mem::take(&mut args.classes),
        }),
        "image" => Directive::Image(ImageDirective {
            src: require_src(&mut args, "image", position)?,
            alt: args.take("alt"),
            caption: args.take("caption"),
            id: args.id.take(),
            classes: std::mem::take(&mut args.classes),
        }),
        "video" => Directive::Video(VideoDirective {
            src: require_src(&mut args, "video", position)?,
            r#loop: args.flag("loop", position)?,
            autoplay: args.flag("autoplay", position)?,
            muted: args.flag("muted", position)?,
            controls: args.flag("controls", position)?,
            pip: args.flag("pip", position)?,
            id: args.id.take(),
            classes: std::mem::take(&mut args.classes),
        }),
        "link" => Directive::Link(LinkDirective {
            src: require_src(&mut args, "link", position)?,
            target: args.take("target"),
            id: args.id.take(),
            classes: std::mem::take(&mut args.classes),
        }),
        _ => {
            return Err(DirectiveError::UnknownName {
                name: name.to_owned(),
                position,
            });
        }
    };

    Ok(Some(directive))
}

fn require_src(
    args: &mut DirectiveArgs,
    directive: &'static str,
    position: SourcePos,
) -> Result<String, DirectiveError> {
    args.take("src")
        .filter(|src| !src.is_empty())
        .ok_or(DirectiveError::MissingSource {
            directive,
            position,
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(destination: &str, title: &str) -> Directive {
        parse_directive(destination, title, SourcePos::new(1, 1))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_plain_destination_is_not_a_directive() {
        let result = parse_directive("https://example.com", "", SourcePos::new(1, 1)).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_section() {
        let directive = parse("$section#intro.lead.wide", "");
        assert_eq!(
            directive,
            Directive::Block(BlockDirective {
                id: Some("intro".to_owned()),
                classes: vec!["lead".to_owned(), "wide".to_owned()],
            })
        );
    }

    #[test]
    fn test_block_alias() {
        assert!(matches!(parse("$block", ""), Directive::Block(_)));
    }

    #[test]
    fn test_image_with_caption() {
        let directive = parse("$image#hero", "src=cat.png caption='Our cat' alt=\"A cat\"");
        assert_eq!(
            directive,
            Directive::Image(ImageDirective {
                id: Some("hero".to_owned()),
                classes: Vec::new(),
                src: "cat.png".to_owned(),
                alt: Some("A cat".to_owned()),
                caption: Some("Our cat".to_owned()),
            })
        );
    }

    #[test]
    fn test_video_flags() {
        let Directive::Video(video) = parse("$video", "src=clip.mp4 loop autoplay=true pip=false")
        else {
            panic!("expected video directive");
        };
        assert_eq!(video.src, "clip.mp4");
        assert_eq!(video.r#loop, Some(true));
        assert_eq!(video.autoplay, Some(true));
        assert_eq!(video.muted, None);
        assert_eq!(video.controls, None);
        assert_eq!(video.pip, Some(false));
    }

    #[test]
    fn test_link_target() {
        let Directive::Link(link) = parse("$link.external", "src=https://example.com target=_blank")
        else {
            panic!("expected link directive");
        };
        assert_eq!(link.src, "https://example.com");
        assert_eq!(link.target.as_deref(), Some("_blank"));
        assert_eq!(link.classes, vec!["external"]);
    }

    #[test]
    fn test_unknown_name() {
        let err = parse_directive("$gallery", "", SourcePos::new(3, 7)).unwrap_err();
        assert_eq!(err.to_string(), "3:7: unknown directive '$gallery'");
    }

    #[test]
    fn test_missing_src() {
        let err = parse_directive("$image", "alt=x", SourcePos::new(1, 1)).unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::MissingSource {
                directive: "image",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_flag() {
        let err = parse_directive("$video", "src=a.mp4 muted=sometimes", SourcePos::new(1, 1))
            .unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidFlag { ref flag, .. } if flag == "muted"));
    }

    #[test]
    fn test_accessors() {
        let directive = parse("$link#docs.a.b", "src=/docs");
        assert_eq!(directive.id(), Some("docs"));
        assert_eq!(directive.classes(), ["a", "b"]);
        assert_eq!(directive.kind_name(), "link");
    }
}

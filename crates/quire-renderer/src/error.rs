//! Render error types.

use std::io;
use std::path::PathBuf;

use quire_ast::SourcePos;

use crate::highlight::HighlightError;

/// Error returned by [`HtmlRenderer`](crate::HtmlRenderer) and
/// [`TocBuilder`](crate::TocBuilder).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing to the output sink failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The document uses a construct the renderer does not support yet.
    #[error("{}:{position}: {feature} is not supported", .path.display())]
    Unsupported {
        feature: String,
        path: PathBuf,
        position: SourcePos,
    },

    /// Syntax highlighting of a code block failed.
    #[error("{}:{position}: {source}", .path.display())]
    Highlight {
        path: PathBuf,
        position: SourcePos,
        source: HighlightError,
    },

    /// No section heading carries the requested id.
    #[error("Section not found: {0}")]
    SectionNotFound(String),
}

impl RenderError {
    /// Whether the error should stop the whole run rather than a single document.
    ///
    /// Unsupported constructs and highlighter failures point at gaps in the
    /// feature set or the project setup, not at one bad input.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::Highlight { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_highlight_message_has_position() {
        let err = RenderError::Highlight {
            path: Path::new("docs/guide.md").to_path_buf(),
            position: SourcePos::new(12, 1),
            source: HighlightError::NoLanguage("zig".to_owned()),
        };
        assert_eq!(
            err.to_string(),
            "docs/guide.md:12:1: unable to find highlighting grammar for language 'zig'"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unsupported_message() {
        let err = RenderError::Unsupported {
            feature: "footnote definition".to_owned(),
            path: PathBuf::from("a.md"),
            position: SourcePos::new(3, 4),
        };
        assert_eq!(err.to_string(), "a.md:3:4: footnote definition is not supported");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_io_and_missing_section_are_not_fatal() {
        let io = RenderError::from(io::Error::other("broken pipe"));
        assert!(!io.is_fatal());
        assert!(!RenderError::SectionNotFound("intro".to_owned()).is_fatal());
    }
}

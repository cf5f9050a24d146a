//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod sections;
pub(crate) mod toc;

use std::path::Path;

use quire_ast::Document;
use quire_renderer::{Highlighter, PlainHighlighter, SyntectHighlighter};

pub(crate) use render::RenderArgs;
pub(crate) use sections::SectionsArgs;
pub(crate) use toc::TocArgs;

use crate::config::Config;
use crate::error::CliError;

/// Read and parse a Markdown file with the configured extensions.
pub(crate) fn load_document(path: &Path, config: &Config) -> Result<Document, CliError> {
    let markdown = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Document::parse(&markdown, config.markdown.parse_options()).map_err(|source| {
        CliError::Directive {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Highlighter selected by the `[highlight]` settings.
pub(crate) fn highlighter(config: &Config) -> &'static dyn Highlighter {
    if config.highlight.enabled {
        &SyntectHighlighter
    } else {
        &PlainHighlighter
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        std::fs::write(&path, "# [A]($section#a)\n").unwrap();

        let doc = load_document(&path, &Config::default()).unwrap();
        assert!(doc.find_section("a").is_some());
    }

    #[test]
    fn test_load_missing_document() {
        let tmp = TempDir::new().unwrap();
        let err = load_document(&tmp.path().join("nope.md"), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_directive_error_names_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.md");
        std::fs::write(&path, "\n[x]($gallery)\n").unwrap();

        let err = load_document(&path, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::Directive { .. }));
        assert!(
            err.to_string()
                .ends_with("bad.md:2:1: unknown directive '$gallery'")
        );
    }
}

//! Syntax highlighting collaborators for fenced code blocks.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::util::escape_html;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Failure reported by a [`Highlighter`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    /// No grammar is registered for the language.
    #[error("unable to find highlighting grammar for language '{0}'")]
    NoLanguage(String),
    /// The highlighter failed while processing the code.
    #[error("error while syntax highlighting: {0}")]
    Other(String),
}

/// Converts code in a given language into HTML.
///
/// Implementations append the highlighted markup to `out`. The renderer wraps
/// it in `<pre><code class="LANG">`, so the output must not include those
/// tags itself.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, language: &str, code: &str, out: &mut String)
    -> Result<(), HighlightError>;
}

/// Highlighter backed by syntect's bundled grammars.
///
/// Emits `<span class="...">` markup (one class per scope atom), to be styled
/// with a stylesheet generated from any syntect theme.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntectHighlighter;

impl Highlighter for SyntectHighlighter {
    fn highlight(
        &self,
        language: &str,
        code: &str,
        out: &mut String,
    ) -> Result<(), HighlightError> {
        let syntax = SYNTAX_SET
            .find_syntax_by_token(language)
            .ok_or_else(|| HighlightError::NoLanguage(language.to_owned()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::Other(e.to_string()))?;
        }
        out.push_str(&generator.finalize());
        Ok(())
    }
}

/// Highlighter that only escapes the code.
///
/// Used when highlighting is disabled; never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(
        &self,
        _language: &str,
        code: &str,
        out: &mut String,
    ) -> Result<(), HighlightError> {
        out.push_str(&escape_html(code));
        Ok(())
    }
}

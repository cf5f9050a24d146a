//! Fenced code block rendering.
//!
//! The fence info decides how a block is emitted:
//!
//! | Fence info | Output |
//! |---|---|
//! | empty | `<pre><code>` with escaped content |
//! | `=html ...` | literal content, unescaped, no wrapper |
//! | `LANG ...` | `<pre><code class="LANG">` with highlighter output |

use std::io::Write;
use std::path::Path;

use quire_ast::SourcePos;

use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::util::escape_html;

/// Fence language that passes the block through as raw HTML.
pub const RAW_HTML_FENCE: &str = "=html";

/// Code block content together with its diagnostics context.
pub(crate) struct CodeBlock<'a> {
    pub code: &'a str,
    pub info: &'a str,
    pub position: SourcePos,
    pub path: &'a Path,
}

/// First whitespace-delimited token of the fence info.
fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

pub(crate) fn render_code_block(
    block: &CodeBlock<'_>,
    highlighter: &dyn Highlighter,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    let Some(language) = fence_language(block.info) else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(block.code))?;
        return Ok(());
    };

    if language == RAW_HTML_FENCE {
        out.write_all(block.code.as_bytes())?;
        return Ok(());
    }

    // Nothing is written when highlighting fails
    let mut highlighted = String::with_capacity(block.code.len() * 2);
    if let Err(source) = highlighter.highlight(language, block.code, &mut highlighted) {
        tracing::error!(
            path = %block.path.display(),
            line = block.position.line,
            column = block.position.column,
            error = %source,
            "Syntax highlighting failed"
        );
        return Err(RenderError::Highlight {
            path: block.path.to_path_buf(),
            position: block.position,
            source,
        });
    }

    write!(
        out,
        "<pre><code class=\"{}\">{highlighted}</code></pre>",
        escape_html(language)
    )?;
    Ok(())
}

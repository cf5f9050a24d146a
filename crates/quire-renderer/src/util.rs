//! Shared helpers for HTML emission.

use std::io::{self, Write};

use quire_ast::Directive;

/// Path reported in diagnostics when none was set.
pub(crate) const DEFAULT_PATH: &str = "<input>";

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Write `<name>` on enter and `</name>` on exit.
pub(crate) fn tag(out: &mut dyn Write, entering: bool, name: &str) -> io::Result<()> {
    if entering {
        write!(out, "<{name}>")
    } else {
        write!(out, "</{name}>")
    }
}

/// Write ` id="..."` and ` class="a b "` for a directive.
///
/// Class tokens are each followed by a space, so the attribute value keeps a
/// trailing space.
pub(crate) fn write_id_class(out: &mut dyn Write, directive: &Directive) -> io::Result<()> {
    if let Some(id) = directive.id() {
        write!(out, " id=\"{}\"", escape_html(id))?;
    }
    let classes = directive.classes();
    if !classes.is_empty() {
        out.write_all(b" class=\"")?;
        for class in classes {
            write!(out, "{} ", escape_html(class))?;
        }
        out.write_all(b"\"")?;
    }
    Ok(())
}

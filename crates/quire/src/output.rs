//! Colored diagnostics on stderr.

use std::path::Path;

use console::{Style, Term};

use crate::error::CliError;

/// Terminal output for progress and diagnostics.
///
/// Rendered HTML goes to stdout or files; everything meant for the user goes
/// through here so it never mixes with document output.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Report a written output file.
    pub(crate) fn wrote(&self, path: &Path) {
        let line = format!("{} {}", self.green.apply_to("Wrote"), path.display());
        let _ = self.term.write_line(&line);
    }

    /// Report how many documents were rendered.
    pub(crate) fn rendered(&self, count: usize) {
        let noun = if count == 1 { "document" } else { "documents" };
        let _ = self
            .term
            .write_line(&self.green.apply_to(format!("Rendered {count} {noun}")).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error. Fatal render errors get a note that the run stopped.
    pub(crate) fn error(&self, err: &CliError) {
        let _ = self
            .term
            .write_line(&self.red.apply_to(format!("Error: {err}")).to_string());
        if let CliError::Render(render) = err
            && render.is_fatal()
        {
            let _ = self.term.write_line(
                &self
                    .dim
                    .apply_to("Rendering stopped; no output was written for this run.")
                    .to_string(),
            );
        }
    }
}

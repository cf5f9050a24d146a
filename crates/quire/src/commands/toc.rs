//! `quire toc` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use quire_renderer::TocBuilder;

use crate::commands::load_document;
use crate::config::Config;
use crate::error::CliError;

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    /// Markdown file to build the table of contents for.
    file: PathBuf,
}

impl TocArgs {
    /// Execute the toc command.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let config = Config::load(config_path, None)?;
        let doc = load_document(&self.file, &config)?;

        let mut html = Vec::new();
        TocBuilder::new(&doc)
            .with_path(&self.file)
            .build(&mut html)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&html)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
        Ok(())
    }
}

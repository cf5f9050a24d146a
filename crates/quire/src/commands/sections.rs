//! `quire sections` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use quire_ast::Document;

use crate::commands::load_document;
use crate::config::Config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sections command.
#[derive(Args)]
pub(crate) struct SectionsArgs {
    /// Markdown file to list sections of.
    file: PathBuf,
}

impl SectionsArgs {
    /// Execute the sections command.
    ///
    /// Prints one `ID<TAB>LINE:COLUMN<TAB>TITLE` line per section heading.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let config = Config::load(config_path, None)?;
        let doc = load_document(&self.file, &config)?;

        let listing = list_sections(&doc);
        if listing.is_empty() {
            Output::new().warning(&format!("No sections in {}", self.file.display()));
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(listing.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

fn list_sections(doc: &Document) -> String {
    let mut listing = String::new();
    for heading in doc.sections() {
        let node = doc.node(heading);
        let id = node
            .block_directive()
            .and_then(|block| block.id.as_deref())
            .unwrap_or("-");
        listing.push_str(&format!(
            "{id}\t{}\t{}\n",
            node.position,
            doc.text_content(heading)
        ));
    }
    listing
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quire_ast::ParseOptions;

    use super::*;

    #[test]
    fn test_list_sections() {
        let doc = Document::parse(
            "# [Intro]($section#intro)\n\ntext\n\n## Plain\n\n## [Usage *now*]($section)\n",
            ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(
            list_sections(&doc),
            "intro\t1:1\tIntro\n-\t7:1\tUsage now\n"
        );
    }

    #[test]
    fn test_no_sections() {
        let doc = Document::parse("# Plain\n", ParseOptions::default()).unwrap();
        assert_eq!(list_sections(&doc), "");
    }
}

//! `quire render` command implementation.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use quire_renderer::HtmlRenderer;
use rayon::prelude::*;

use crate::commands::{highlighter, load_document};
use crate::config::{CliSettings, Config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to render.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Render only the section with this id.
    #[arg(short, long)]
    section: Option<String>,

    /// Omit the section heading itself.
    #[arg(long, requires = "section")]
    body_only: bool,

    /// Write `<stem>.html` files into this directory instead of stdout.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Disable syntax highlighting (overrides config).
    #[arg(long)]
    no_highlight: bool,
}

/// A rendered document waiting to be written.
struct Rendered {
    source: PathBuf,
    html: Vec<u8>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// Every file is rendered before anything is written, so a failure in one
    /// document leaves no partial output behind.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            highlight_enabled: self.no_highlight.then_some(false),
        };
        let config = Config::load(config_path, Some(&settings))?;
        tracing::debug!(
            config = ?config.config_path,
            files = self.files.len(),
            highlight = config.highlight.enabled,
            "Rendering files"
        );

        if let Some(dir) = &self.out_dir {
            check_output_paths(dir, &self.files)?;
        }

        let rendered = self
            .files
            .par_iter()
            .map(|path| self.render_file(path, &config))
            .collect::<Result<Vec<_>, _>>()?;

        match &self.out_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                for doc in &rendered {
                    let target = output_path(dir, &doc.source);
                    std::fs::write(&target, &doc.html)?;
                    output.wrote(&target);
                }
                output.rendered(rendered.len());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                for doc in &rendered {
                    stdout.write_all(&doc.html)?;
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }

        Ok(())
    }

    fn render_file(&self, path: &Path, config: &Config) -> Result<Rendered, CliError> {
        let doc = load_document(path, config)?;
        let renderer = HtmlRenderer::new(&doc)
            .with_path(path)
            .with_highlighter(highlighter(config));

        let mut html = Vec::new();
        match &self.section {
            Some(id) => renderer.render_section(id, !self.body_only, &mut html)?,
            None => renderer.render_document(&mut html)?,
        }

        Ok(Rendered {
            source: path.to_path_buf(),
            html,
        })
    }
}

/// `DIR/<stem>.html` for a source file.
fn output_path(dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "index".into(), |stem| stem.to_string_lossy());
    dir.join(format!("{stem}.html"))
}

/// Fail when two sources map to the same output file.
fn check_output_paths(dir: &Path, files: &[PathBuf]) -> Result<(), CliError> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for source in files {
        let target = output_path(dir, source);
        if let Some(first) = seen.get(&target) {
            return Err(CliError::OutputCollision {
                first: first.to_path_buf(),
                second: source.clone(),
                target,
            });
        }
        seen.insert(target, source);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn args(files: Vec<PathBuf>, out_dir: &Path) -> RenderArgs {
        RenderArgs {
            files,
            section: None,
            body_only: false,
            out_dir: Some(out_dir.to_path_buf()),
            no_highlight: true,
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("docs/guide.md")),
            PathBuf::from("out/guide.html")
        );
    }

    #[test]
    fn test_renders_files_into_out_dir() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("quire.toml");
        std::fs::write(&config, "").unwrap();
        let a = tmp.path().join("a.md");
        let b = tmp.path().join("b.md");
        std::fs::write(&a, "# A\n").unwrap();
        std::fs::write(&b, "- x\n- y\n").unwrap();
        let out = tmp.path().join("site");

        args(vec![a, b], &out).execute(Some(&config)).unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("a.html")).unwrap(),
            "<h1>A</h1>"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("b.html")).unwrap(),
            "<ul><li>x</li><li>y</li></ul>"
        );
    }

    #[test]
    fn test_section_body_only() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("quire.toml");
        std::fs::write(&config, "").unwrap();
        let doc = tmp.path().join("doc.md");
        std::fs::write(
            &doc,
            "# [One]($section#one)\n\nfirst\n\n# [Two]($section#two)\n\nsecond\n",
        )
        .unwrap();
        let out = tmp.path().join("site");

        let mut render = args(vec![doc], &out);
        render.section = Some("two".to_owned());
        render.body_only = true;
        render.execute(Some(&config)).unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("doc.html")).unwrap(),
            "<p>second</p>"
        );
    }

    #[test]
    fn test_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("quire.toml");
        std::fs::write(&config, "[markdown]\nfootnotes = true\n").unwrap();
        let good = tmp.path().join("good.md");
        let bad = tmp.path().join("bad.md");
        std::fs::write(&good, "fine\n").unwrap();
        std::fs::write(&bad, "x[^1]\n\n[^1]: note\n").unwrap();
        let out = tmp.path().join("site");

        let err = args(vec![good, bad], &out)
            .execute(Some(&config))
            .unwrap_err();

        assert!(matches!(&err, CliError::Render(render) if render.is_fatal()));
        assert!(!out.exists());
    }

    #[test]
    fn test_same_stem_in_out_dir_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("quire.toml");
        std::fs::write(&config, "").unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::create_dir_all(tmp.path().join("b")).unwrap();
        let first = tmp.path().join("a/x.md");
        let second = tmp.path().join("b/x.md");
        std::fs::write(&first, "one\n").unwrap();
        std::fs::write(&second, "two\n").unwrap();
        let out = tmp.path().join("site");

        let err = args(vec![first.clone(), second.clone()], &out)
            .execute(Some(&config))
            .unwrap_err();

        assert!(matches!(
            &err,
            CliError::OutputCollision { target, first: a, second: b }
                if *target == out.join("x.html") && *a == first && *b == second
        ));
        assert!(!out.exists());
    }
}

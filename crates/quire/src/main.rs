//! Quire CLI - Markdown to HTML document renderer.
//!
//! Provides commands for:
//! - `render`: Render documents or single sections to HTML
//! - `toc`: Build the table of contents of a document
//! - `sections`: List the section headings of a document

mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, SectionsArgs, TocArgs};
use output::Output;

/// Quire - Markdown to HTML document renderer.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long, global = true, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Markdown files to HTML.
    Render(RenderArgs),
    /// Print the table of contents of a Markdown file.
    Toc(TocArgs),
    /// List the sections of a Markdown file.
    Sections(SectionsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Render(args) => args.execute(config),
        Commands::Toc(args) => args.execute(config),
        Commands::Sections(args) => args.execute(config),
    };

    if let Err(err) = result {
        output.error(&err);
        std::process::exit(1);
    }
}

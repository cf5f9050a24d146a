//! CLI error types.

use std::path::PathBuf;

use quire_ast::DirectiveError;
use quire_renderer::RenderError;

use crate::config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}:{source}", .path.display())]
    Directive {
        path: PathBuf,
        source: DirectiveError,
    },

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error(
        "{} and {} would both be written to {}",
        .first.display(),
        .second.display(),
        .target.display()
    )]
    OutputCollision {
        target: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

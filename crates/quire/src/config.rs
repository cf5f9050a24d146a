//! Configuration loading.
//!
//! Parses `quire.toml` with serde and discovers it in the working directory or
//! its parents. Command-line flags are applied on top through [`CliSettings`].

use std::path::{Path, PathBuf};

use quire_ast::ParseOptions;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub(crate) struct CliSettings {
    /// Override syntax highlighting.
    pub highlight_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Markdown extensions.
    pub markdown: MarkdownConfig,
    /// Code block highlighting.
    pub highlight: HighlightConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[markdown]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            tables: options.tables,
            strikethrough: options.strikethrough,
            footnotes: options.footnotes,
            tasklists: options.tasklists,
            smart_punctuation: options.smart_punctuation,
        }
    }
}

impl MarkdownConfig {
    /// Parser options for these settings.
    pub(crate) fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            tables: self.tables,
            strikethrough: self.strikethrough,
            footnotes: self.footnotes,
            tasklists: self.tasklists,
            smart_punctuation: self.smart_punctuation,
        }
    }
}

/// `[highlight]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(crate) struct HighlightConfig {
    /// Whether fenced code with a language is syntax highlighted.
    pub enabled: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `quire.toml` in the current directory and its parents, falling back
    /// to defaults when none exists.
    pub(crate) fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(enabled) = settings.highlight_enabled {
            self.highlight.enabled = enabled;
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.markdown.tables);
        assert!(config.markdown.strikethrough);
        assert!(!config.markdown.footnotes);
        assert!(config.markdown.tasklists);
        assert!(!config.markdown.smart_punctuation);
        assert!(config.highlight.enabled);
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.highlight.enabled);
        assert_eq!(config.markdown.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_parse_sections() {
        let toml = r"
[markdown]
footnotes = true
tables = false

[highlight]
enabled = false
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.markdown.footnotes);
        assert!(!config.markdown.tables);
        assert!(config.markdown.strikethrough);
        assert!(!config.highlight.enabled);
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[markdown]\nsmart_punctuation = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert!(config.markdown.smart_punctuation);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[highlight]\nenabled = \"yes\"\n").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[highlight]\nenabled = true\n").unwrap();

        let settings = CliSettings {
            highlight_enabled: Some(false),
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(!config.highlight.enabled);
    }

    #[test]
    fn test_discover_in_parent() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("docs/guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            discover_config(&nested),
            Some(tmp.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_nearest_wins() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_config(&nested), Some(nested.join(CONFIG_FILENAME)));
    }
}

//! Run configuration, loaded from YAML and overridden by flags.

use litdoc_core::{GfmMarkdown, Pygmentize};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "litdoc.yaml";

/// Errors emitted while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// Config file path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// YAML failed to parse or had unknown keys.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one documentation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory pages are written into.
    pub output_dir: PathBuf,
    /// Highlighter executable.
    pub highlighter: String,
    /// Tab width passed to the highlighter.
    pub tab_size: u32,
    /// Per-file highlighter time limit in seconds; 0 disables it.
    pub timeout_secs: u64,
    /// Files processed concurrently.
    pub jobs: usize,
    /// Pass raw HTML in comments through instead of escaping it.
    pub raw_html: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
            highlighter: "pygmentize".to_string(),
            tab_size: 2,
            timeout_secs: 30,
            jobs: 1,
            raw_html: false,
        }
    }
}

impl Config {
    /// Parse a YAML document; an empty document yields the defaults.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config =
            serde_yaml::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&input)
    }

    /// Load `explicit` if given, else `litdoc.yaml` in `dir` if present,
    /// else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            log::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values the batch driver cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".to_string()));
        }
        if self.highlighter.trim().is_empty() {
            return Err(ConfigError::Invalid("highlighter must not be empty".to_string()));
        }
        Ok(())
    }

    /// Highlighter time limit, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Highlighter configured from these settings.
    pub fn highlighter(&self) -> Pygmentize {
        Pygmentize::new()
            .with_program(&self.highlighter)
            .with_tab_size(self.tab_size)
            .with_timeout(self.timeout())
    }

    /// Markdown renderer configured from these settings.
    pub fn markdown(&self) -> GfmMarkdown {
        if self.raw_html {
            GfmMarkdown::with_raw_html()
        } else {
            GfmMarkdown::new()
        }
    }
}

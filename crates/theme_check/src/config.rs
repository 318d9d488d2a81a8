//! Runtime configuration for `theme-check`.
//!
//! [`Config`] is the single source of truth for what gets checked: the pair
//! list, the required keys, the theme variants, and whether issues fail the
//! run. It is resolved in layers:
//!
//! 1. Built-in defaults ([`PairSet::editor_defaults`], [`RequiredKeys::default`])
//! 2. A TOML config file (`--config`, `THEME_CHECK_CONFIG`, or
//!    `theme-check.toml` in the working directory)
//! 3. Command-line flags and positional theme arguments
//!
//! ```toml
//! strict = true
//!
//! [[variants]]
//! label = "Dark"
//! path = "themes/evergarden-winter-theme.json"
//!
//! [[variants]]
//! label = "Light"
//! path = "themes/evergarden-winter-light-theme.json"
//!
//! [[pairs]]
//! foreground = "badge.foreground"
//! background = "badge.background"
//! label = "Badge"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cli::Cli;
use crate::pairs::PairSet;
use crate::validate::RequiredKeys;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "theme-check.toml";

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Pairs checked by the contrast analysis, in report order.
    pub pairs: PairSet,

    /// Keys the structural validator requires.
    pub required_keys: RequiredKeys,

    /// Theme files to check, in report order.
    pub variants: Vec<VariantSpec>,

    /// Turn issues into a failing exit code.
    pub strict: bool,

    /// Report output format.
    pub format: OutputFormat,

    /// Whether badges are colorized.
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pairs: PairSet::default(),
            required_keys: RequiredKeys::default(),
            variants: Vec::new(),
            strict: false,
            format: OutputFormat::Text,
            color: ColorMode::Auto,
        }
    }
}

/// A theme file and the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub label: String,
    pub path: PathBuf,
}

impl VariantSpec {
    /// Creates a labelled variant.
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Parse a command-line theme argument: `LABEL=PATH` or a bare `PATH`.
    ///
    /// A bare path is labelled with its file stem.
    pub fn parse(arg: &str) -> Self {
        match arg.split_once('=') {
            Some((label, path)) if !label.is_empty() && !path.is_empty() => {
                return Self::new(label, path);
            }
            _ => {}
        }
        let path = PathBuf::from(arg);
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(arg)
            .to_string();
        Self { label, path }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colorize when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always colorize
    Always,
    /// Never colorize
    Never,
}

impl ColorMode {
    /// Decide whether to colorize given the terminal state.
    pub fn enabled(self, is_tty: bool, no_color_env: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_tty && !no_color_env,
        }
    }
}

/// Error loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no themes to check; pass theme files or list [[variants]] in theme-check.toml")]
    NoThemes,
    #[error("the pair list is empty")]
    NoPairs,
}

impl Config {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from TOML text. Relative variant paths stay as written.
    ///
    /// # Errors
    /// Returns the TOML error if parsing fails.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load config from a TOML file.
    ///
    /// Relative variant paths are resolved against the file's directory.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            for variant in &mut config.variants {
                if variant.path.is_relative() {
                    variant.path = base.join(&variant.path);
                }
            }
        }
        debug!(
            config.path = %path.display(),
            config.pairs = config.pairs.len(),
            config.variants = config.variants.len(),
            "Config loaded"
        );
        Ok(config)
    }

    /// Load the explicit config file, or the default one if it exists, or
    /// fall back to built-in defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a config file exists but cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve the config for a parsed command line.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the config file cannot be loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::discover(cli.config.as_deref())?;

        let themes = cli.command.themes();
        if !themes.is_empty() {
            config.variants = themes.iter().map(|t| VariantSpec::parse(t)).collect();
        }
        if cli.strict {
            config.strict = true;
        }
        if let Some(format) = cli.format {
            config.format = format;
        }
        if let Some(color) = cli.color {
            config.color = color;
        }
        Ok(config)
    }

    /// Check that there is something to run.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoThemes`] or [`ConfigError::NoPairs`].
    pub fn ensure_runnable(&self, needs_pairs: bool) -> Result<(), ConfigError> {
        if self.variants.is_empty() {
            return Err(ConfigError::NoThemes);
        }
        if needs_pairs && self.pairs.is_empty() {
            return Err(ConfigError::NoPairs);
        }
        Ok(())
    }
}

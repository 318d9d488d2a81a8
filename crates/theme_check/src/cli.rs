//! Command-line interface for `theme-check`.
//!
//! # Examples
//!
//! ```bash
//! # Contrast report for a dark and a light variant
//! theme-check contrast Dark=themes/dark.json Light=themes/light.json
//!
//! # Structural validation, failing the run on any problem (for CI)
//! theme-check --strict validate themes/dark.json
//!
//! # Both checks, machine-readable
//! theme-check --format json check
//! ```

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::{ColorMode, Config, OutputFormat};
use crate::logging::LogFormat;
use crate::report::{ContrastReport, ReportStyle, ValidationSummary, Variant};

/// Exit code when `--strict` is set and the checks found problems.
pub const EXIT_FINDINGS: u8 = 1;

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: u8 = 2;

/// Validate editor color themes and audit WCAG contrast of UI color pairs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "theme-check",
    author,
    version,
    about = "Validate editor color themes and audit WCAG contrast",
    long_about = "Checks theme documents for required workbench colors and \
                  measures the WCAG 2.x contrast ratio of foreground/background \
                  color pairs."
)]
pub struct Cli {
    /// Path to a TOML config file
    ///
    /// Defaults to theme-check.toml in the working directory if present
    #[arg(long, short = 'c', env = "THEME_CHECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Exit with status 1 if any check fails
    #[arg(long, global = true)]
    pub strict: bool,

    /// Report format
    #[arg(long, short = 'f', value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// When to colorize status badges
    ///
    /// Auto respects the `NO_COLOR` environment variable
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorMode>,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check required color keys and token colors
    Validate(ThemeArgs),

    /// Measure contrast of every color pair
    Contrast(ThemeArgs),

    /// Run validation, then contrast analysis
    Check(ThemeArgs),

    /// Print the effective contrast pair list
    Pairs,
}

/// Theme files to check.
#[derive(Args, Debug, Clone, Default)]
pub struct ThemeArgs {
    /// Theme files as PATH or LABEL=PATH
    ///
    /// Replaces the variants listed in the config file
    #[arg(value_name = "THEME")]
    pub themes: Vec<String>,
}

impl Commands {
    /// Theme arguments given on the command line.
    pub fn themes(&self) -> &[String] {
        match self {
            Self::Validate(args) | Self::Contrast(args) | Self::Check(args) => &args.themes,
            Self::Pairs => &[],
        }
    }
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}

/// Resolve config, run the command, write the report to stdout.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or output fails.
pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_cli(cli)?;

    let color = config.color.enabled(
        io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    );
    colored::control::set_override(color);
    let style = ReportStyle { color };

    let mut stdout = io::stdout().lock();
    let findings = execute(&cli.command, &config, &style, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::from(exit_code(&config, findings)))
}

/// Map a finding count to the process exit status.
pub fn exit_code(config: &Config, findings: usize) -> u8 {
    if config.strict && findings > 0 {
        info!(findings, "Strict mode: failing the run");
        EXIT_FINDINGS
    } else {
        0
    }
}

/// Run one command against a resolved config, writing the report to `out`.
///
/// Returns the number of findings.
///
/// # Errors
///
/// Returns an error if there is nothing to check or writing fails.
pub fn execute<W: Write>(
    command: &Commands,
    config: &Config,
    style: &ReportStyle,
    out: &mut W,
) -> anyhow::Result<usize> {
    match command {
        Commands::Pairs => {
            write_pairs(config, out)?;
            Ok(0)
        }
        Commands::Validate(_) => {
            config.ensure_runnable(false)?;
            let variants = load_variants(config);
            let summary = ValidationSummary::build(&variants, &config.required_keys);
            match config.format {
                OutputFormat::Text => write!(out, "{}", summary.render_text(style))?,
                OutputFormat::Json => write_json(out, &summary)?,
            }
            Ok(summary.failure_count())
        }
        Commands::Contrast(_) => {
            config.ensure_runnable(true)?;
            let variants = load_variants(config);
            let report = ContrastReport::build(&variants, &config.pairs);
            match config.format {
                OutputFormat::Text => write!(out, "{}", report.render_text(style))?,
                OutputFormat::Json => write_json(out, &report.to_record())?,
            }
            Ok(report.finding_count())
        }
        Commands::Check(_) => {
            config.ensure_runnable(true)?;
            let variants = load_variants(config);
            let summary = ValidationSummary::build(&variants, &config.required_keys);
            let report = ContrastReport::build(&variants, &config.pairs);
            match config.format {
                OutputFormat::Text => {
                    write!(out, "{}", summary.render_text(style))?;
                    writeln!(out)?;
                    write!(out, "{}", report.render_text(style))?;
                }
                OutputFormat::Json => {
                    #[derive(Serialize)]
                    struct CheckRecord<'a> {
                        validation: &'a ValidationSummary,
                        contrast: crate::report::ContrastRecord,
                    }
                    write_json(
                        out,
                        &CheckRecord {
                            validation: &summary,
                            contrast: report.to_record(),
                        },
                    )?;
                }
            }
            Ok(summary.failure_count() + report.finding_count())
        }
    }
}

fn load_variants(config: &Config) -> Vec<Variant> {
    config.variants.iter().map(Variant::load).collect()
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_pairs<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    match config.format {
        OutputFormat::Json => write_json(out, &config.pairs),
        OutputFormat::Text => {
            for pair in &config.pairs {
                writeln!(
                    out,
                    "{}: {} on {}",
                    pair.label, pair.foreground, pair.background
                )?;
            }
            Ok(())
        }
    }
}

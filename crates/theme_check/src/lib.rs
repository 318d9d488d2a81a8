#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Theme Check
//!
//! Validation and WCAG contrast auditing for editor color themes.
//!
//! A theme document maps dotted UI-element keys to hex colors and carries a
//! list of syntax token-color rules. This crate:
//! - loads theme documents from JSON, TOML or YAML ([`theme`])
//! - checks the required workbench keys and token colors ([`validate`])
//! - measures the contrast of foreground/background pairs ([`analyze`])
//! - renders text and JSON reports per theme variant ([`report`])
//!
//! ## Quick start (library)
//!
//! ```rust
//! use theme_check::{PairSet, Theme, analyze, find_issues};
//!
//! let theme = Theme::from_json(
//!     r##"{"colors": {"editor.foreground": "#E2E3E4", "editor.background": "#0E1012"}}"##,
//! )
//! .unwrap();
//! let pairs = PairSet::default();
//!
//! for outcome in analyze(&theme, pairs.pairs()) {
//!     match outcome {
//!         Ok(result) => println!("{}: {:.2} {}", result.label, result.ratio, result.level),
//!         Err(err) => println!("{err}"),
//!     }
//! }
//! assert_eq!(find_issues(&theme, pairs.pairs()).count(), 0);
//! ```
//!
//! ## CLI usage
//!
//! ```bash
//! theme-check validate themes/dark.json
//! theme-check contrast Dark=themes/dark.json Light=themes/light.json
//! theme-check --strict --format json check
//! theme-check pairs
//! ```
//!
//! ## Feature flags
//!
//! - `yaml`: load `.yaml` / `.yml` theme documents
//! - `parallel`: evaluate pairs on a rayon pool (output order is unchanged)

pub mod analyze;
pub mod cli;
pub mod config;
pub mod logging;
pub mod pairs;
pub mod report;
pub mod theme;
pub mod validate;

pub use analyze::{
    Analysis, ContrastResult, PairError, PairOutcome, PairRole, analyze, evaluate, find_issues,
};
pub use config::{Config, ConfigError, VariantSpec};
pub use pairs::{ContrastPair, PairSet};
pub use report::{ContrastReport, ReportStyle, ValidationSummary, Variant};
pub use theme::{ColorValue, ResolveError, Theme, ThemeKind, ThemeLoadError};
pub use validate::{RequiredKeys, SchemaError, ValidationReport, validate};
pub use wcag::{Rgb, WcagLevel};

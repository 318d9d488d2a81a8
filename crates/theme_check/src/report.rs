//! Human-readable and JSON reports.
//!
//! Each theme variant is loaded and checked on its own. A variant that fails
//! to load becomes a line item in the report while the remaining variants
//! are still checked; results from different variants are never merged.

use std::fmt::Write as _;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use wcag::{WCAG_AA_NORMAL_TEXT, WCAG_AAA_NORMAL_TEXT, WcagLevel};

use crate::analyze::{OutcomeRecord, PairOutcome, analyze};
use crate::config::VariantSpec;
use crate::pairs::PairSet;
use crate::theme::{Theme, ThemeLoadError};
use crate::validate::{RequiredKeys, ValidationReport, validate};

/// Display width of the element column.
pub const ELEMENT_WIDTH: usize = 25;

/// One theme variant and the result of loading it.
#[derive(Debug)]
pub struct Variant {
    pub label: String,
    pub path: Option<PathBuf>,
    pub theme: Result<Theme, ThemeLoadError>,
}

impl Variant {
    /// Load the theme a [`VariantSpec`] points at. Load failures are kept, not returned.
    pub fn load(spec: &VariantSpec) -> Self {
        let theme = Theme::from_file(&spec.path);
        if let Err(err) = &theme {
            tracing::warn!(
                variant.label = %spec.label,
                variant.path = %spec.path.display(),
                error = %err,
                "Theme failed to load"
            );
        }
        Self {
            label: spec.label.clone(),
            path: Some(spec.path.clone()),
            theme,
        }
    }

    /// Wrap an already loaded theme.
    pub fn from_theme(label: impl Into<String>, theme: Theme) -> Self {
        Self {
            label: label.into(),
            path: None,
            theme: Ok(theme),
        }
    }
}

/// Rendering options for text reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    /// Colorize status badges with ANSI escapes.
    pub color: bool,
}

impl ReportStyle {
    /// Plain output without escapes.
    pub const PLAIN: Self = Self { color: false };

    fn badge(&self, level: WcagLevel) -> String {
        let badge = level.badge();
        if !self.color {
            return badge.to_string();
        }
        match level {
            WcagLevel::Aaa => badge.green().to_string(),
            WcagLevel::Aa => badge.yellow().to_string(),
            WcagLevel::Fail => badge.red().bold().to_string(),
        }
    }

    fn flag(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Pad or truncate `text` to exactly `width` display columns.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    if text.width() <= width {
        out.push_str(text);
    } else {
        let mut used = 0;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
    }
    let pad = width.saturating_sub(out.width());
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

// =============================================================================
// Contrast report
// =============================================================================

/// Contrast outcomes for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantContrast {
    pub label: String,
    /// Outcomes in pair order, or the load error message.
    pub outcomes: Result<Vec<PairOutcome>, String>,
}

impl VariantContrast {
    fn issues(&self) -> impl Iterator<Item = &crate::analyze::ContrastResult> {
        self.outcomes
            .iter()
            .flatten()
            .filter_map(|o| o.as_ref().ok())
            .filter(|r| r.is_issue())
    }

    fn unresolved(&self) -> impl Iterator<Item = &crate::analyze::PairError> {
        self.outcomes
            .iter()
            .flatten()
            .filter_map(|o| o.as_ref().err())
    }

    /// Number of measured pairs below 4.5:1.
    pub fn issue_count(&self) -> usize {
        self.issues().count()
    }

    /// Number of pairs whose keys did not resolve.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    /// Returns true if the theme could not be loaded.
    pub fn failed_to_load(&self) -> bool {
        self.outcomes.is_err()
    }

    fn has_findings(&self) -> bool {
        self.failed_to_load() || self.issue_count() > 0 || self.unresolved_count() > 0
    }
}

/// Contrast analysis of every variant against one pair set.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastReport {
    pub variants: Vec<VariantContrast>,
}

impl ContrastReport {
    /// Run the pair set over each variant independently.
    pub fn build(variants: &[Variant], pairs: &PairSet) -> Self {
        let variants = variants
            .iter()
            .map(|variant| VariantContrast {
                label: variant.label.clone(),
                outcomes: match &variant.theme {
                    Ok(theme) => Ok(analyze(theme, pairs.pairs()).outcomes()),
                    Err(err) => Err(err.to_string()),
                },
            })
            .collect();
        Self { variants }
    }

    /// Total number of defects: sub-AA pairs, unresolved pairs, load failures.
    pub fn finding_count(&self) -> usize {
        self.variants
            .iter()
            .map(|v| v.issue_count() + v.unresolved_count() + usize::from(v.failed_to_load()))
            .sum()
    }

    /// Render the table, issue list and legend.
    pub fn render_text(&self, style: &ReportStyle) -> String {
        let label_width = self
            .variants
            .iter()
            .map(|v| v.label.width())
            .chain(std::iter::once("Theme".len()))
            .max()
            .unwrap_or(5);

        let mut out = String::new();
        let _ = writeln!(out, "🔍 Theme Contrast Analysis");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} | {} | {:>6} | Status",
            fit_width("Theme", label_width),
            fit_width("Element", ELEMENT_WIDTH),
            "Ratio"
        );
        let _ = writeln!(
            out,
            "{}-|-{}-|-{}-|-{}",
            "-".repeat(label_width),
            "-".repeat(ELEMENT_WIDTH),
            "-".repeat(6),
            "-".repeat(6)
        );

        for variant in &self.variants {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} contrast tests", variant.label);
            let label = fit_width(&variant.label, label_width);
            match &variant.outcomes {
                Err(message) => {
                    let _ = writeln!(out, "{} {}: {}", style.flag("❌"), variant.label, message);
                }
                Ok(outcomes) => {
                    for outcome in outcomes {
                        match outcome {
                            Ok(result) => {
                                let _ = writeln!(
                                    out,
                                    "{label} | {} | {:>6.2} | {}",
                                    fit_width(&result.label, ELEMENT_WIDTH),
                                    result.ratio,
                                    style.badge(result.level)
                                );
                            }
                            Err(err) => {
                                let _ = writeln!(
                                    out,
                                    "{label} | {} | {:>6} | {}",
                                    fit_width(&err.label, ELEMENT_WIDTH),
                                    "n/a",
                                    style.flag("❓ UNRESOLVED")
                                );
                            }
                        }
                    }
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "🚨 POTENTIAL CONTRAST ISSUES TO REVIEW:");
        for variant in self.variants.iter().filter(|v| v.has_findings()) {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} issues:", variant.label);
            if let Err(message) = &variant.outcomes {
                let _ = writeln!(out, "  ❌ theme not loaded: {message}");
            }
            for issue in variant.issues() {
                let _ = writeln!(
                    out,
                    "  ❌ {}: {:.2} ({} on {})",
                    issue.label, issue.ratio, issue.foreground, issue.background
                );
            }
            for err in variant.unresolved() {
                let _ = writeln!(out, "  ❓ {err}");
            }
        }
        let _ = writeln!(out);
        if self.finding_count() == 0 {
            let _ = writeln!(out, "✅ No critical contrast issues found!");
        } else {
            let _ = writeln!(
                out,
                "💡 Consider improving these elements for better accessibility."
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "📊 WCAG Guidelines:");
        let _ = writeln!(
            out,
            "  • AAA: {WCAG_AAA_NORMAL_TEXT}:1 contrast (enhanced accessibility)"
        );
        let _ = writeln!(
            out,
            "  • AA: {WCAG_AA_NORMAL_TEXT}:1 contrast (minimum accessibility)"
        );
        out
    }

    /// Serializable form of this report.
    pub fn to_record(&self) -> ContrastRecord {
        ContrastRecord {
            variants: self
                .variants
                .iter()
                .map(|v| VariantContrastRecord {
                    label: v.label.clone(),
                    load_error: v.outcomes.as_ref().err().cloned(),
                    results: v
                        .outcomes
                        .iter()
                        .flatten()
                        .map(OutcomeRecord::from)
                        .collect(),
                    issues: v.issue_count(),
                    unresolved: v.unresolved_count(),
                })
                .collect(),
            findings: self.finding_count(),
        }
    }
}

/// JSON form of [`ContrastReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ContrastRecord {
    pub variants: Vec<VariantContrastRecord>,
    pub findings: usize,
}

/// JSON form of [`VariantContrast`].
#[derive(Debug, Clone, Serialize)]
pub struct VariantContrastRecord {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub results: Vec<OutcomeRecord>,
    pub issues: usize,
    pub unresolved: usize,
}

// =============================================================================
// Validation report
// =============================================================================

/// Structural validation of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantValidation {
    pub label: String,
    pub path: Option<PathBuf>,
    /// The report, or the load error message.
    pub outcome: Result<ValidationReport, String>,
}

impl VariantValidation {
    /// Returns true if the theme loaded and satisfies the structural contract.
    pub fn is_valid(&self) -> bool {
        self.outcome.as_ref().is_ok_and(ValidationReport::is_valid)
    }
}

impl Serialize for VariantValidation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("label", &self.label)?;
        if let Some(path) = &self.path {
            map.serialize_entry("path", path)?;
        }
        map.serialize_entry("valid", &self.is_valid())?;
        match &self.outcome {
            Ok(report) => {
                map.serialize_entry("missing_keys", &report.missing_keys())?;
                map.serialize_entry("report", report)?;
            }
            Err(message) => map.serialize_entry("load_error", message)?,
        }
        map.end()
    }
}

/// Structural validation of every variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub variants: Vec<VariantValidation>,
}

impl ValidationSummary {
    /// Validate each variant independently.
    pub fn build(variants: &[Variant], required: &RequiredKeys) -> Self {
        let variants = variants
            .iter()
            .map(|variant| VariantValidation {
                label: variant.label.clone(),
                path: variant.path.clone(),
                outcome: match &variant.theme {
                    Ok(theme) => Ok(validate(theme, required)),
                    Err(err) => Err(err.to_string()),
                },
            })
            .collect();
        Self { variants }
    }

    /// Number of variants that failed to load or are structurally invalid.
    pub fn failure_count(&self) -> usize {
        self.variants
            .iter()
            .filter(|v| !v.is_valid())
            .count()
    }

    /// Render pass/fail lines for every check.
    pub fn render_text(&self, style: &ReportStyle) -> String {
        let pass = "✅";
        let fail = style.flag("❌");
        let mark = |ok: bool| if ok { pass.to_string() } else { fail.clone() };

        let mut out = String::new();
        let _ = writeln!(out, "🎨 Theme Validation");
        for variant in &self.variants {
            let _ = writeln!(out);
            match &variant.path {
                Some(path) => {
                    let _ = writeln!(out, "{} ({})", variant.label, path.display());
                }
                None => {
                    let _ = writeln!(out, "{}", variant.label);
                }
            }
            let report = match &variant.outcome {
                Ok(report) => report,
                Err(message) => {
                    let _ = writeln!(out, "{fail} {}: {message}", variant.label);
                    continue;
                }
            };
            let _ = writeln!(out, "{pass} {}: Valid theme document", variant.label);
            let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| "(missing)".into());
            let _ = writeln!(
                out,
                "   Editor background: {}",
                or_missing(&report.editor_background)
            );
            let _ = writeln!(
                out,
                "   Editor foreground: {}",
                or_missing(&report.editor_foreground)
            );
            let _ = writeln!(out, "   Color properties: {}", report.color_count);
            let _ = writeln!(out, "   Token colors: {}", report.token_color_count);
            let _ = writeln!(
                out,
                "   Semantic tokens: {}",
                if report.has_semantic_tokens { "Yes" } else { "No" }
            );
            for check in &report.required {
                let _ = writeln!(out, "   {} {}", mark(check.present), check.key);
            }
            if report.has_required_keys() {
                let _ = writeln!(
                    out,
                    "{pass} {}: All required properties present",
                    variant.label
                );
            } else {
                let _ = writeln!(
                    out,
                    "{fail} {}: Missing properties: {}",
                    variant.label,
                    report.missing_keys().join(", ")
                );
            }
            if report.token_color_count > 0 {
                let _ = writeln!(out, "{pass} {}: tokenColors present", variant.label);
            } else {
                let _ = writeln!(out, "{fail} {}: tokenColors is empty", variant.label);
            }
        }
        out
    }
}

//! Contrast analysis of UI color pairs.
//!
//! [`analyze`] pairs a theme with a list of [`ContrastPair`]s and yields one
//! [`PairOutcome`] per pair, lazily and in input order. The returned
//! [`Analysis`] is a cheap borrowed view, so it can be iterated any number of
//! times with identical results.
//!
//! A pair whose keys do not resolve is an outcome of its own
//! ([`PairError`]); it is never dropped and never fed into the math.
//!
//! # Example
//!
//! ```rust
//! use theme_check::analyze::analyze;
//! use theme_check::pairs::ContrastPair;
//! use theme_check::theme::Theme;
//! use wcag::WcagLevel;
//!
//! let theme = Theme::new("Demo")
//!     .with_color("editor.foreground", "#E2E3E4")
//!     .with_color("editor.background", "#0E1012");
//! let pairs = [ContrastPair::new("editor.foreground", "editor.background", "Editor Text")];
//!
//! let result = analyze(&theme, &pairs).iter().next().unwrap().unwrap();
//! assert_eq!(result.level, WcagLevel::Aaa);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, trace, warn};
use wcag::{WCAG_AA_NORMAL_TEXT, WcagLevel, contrast_ratio};

use crate::pairs::ContrastPair;
use crate::theme::{ResolveError, Theme};

/// Which side of a pair a color key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairRole {
    Foreground,
    Background,
}

impl fmt::Display for PairRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        })
    }
}

/// Computed contrast for one pair in one theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastResult {
    pub label: String,
    pub foreground_key: String,
    pub background_key: String,
    /// Foreground value exactly as written in the theme.
    pub foreground: String,
    /// Background value exactly as written in the theme.
    pub background: String,
    pub ratio: f64,
    pub level: WcagLevel,
}

impl ContrastResult {
    /// Returns true if the pair falls below the AA minimum (4.5:1).
    pub fn is_issue(&self) -> bool {
        self.ratio < WCAG_AA_NORMAL_TEXT
    }
}

/// A pair that could not be measured because a key did not resolve.
///
/// `role` and `source` describe the first failing side. When both sides
/// fail, the background failure is kept in `also`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{label}: {role} {source}{}", background_suffix(.also))]
pub struct PairError {
    pub label: String,
    pub role: PairRole,
    #[source]
    pub source: ResolveError,
    pub also: Option<ResolveError>,
}

impl PairError {
    /// The first color key that failed to resolve.
    pub fn key(&self) -> &str {
        self.source.key()
    }

    /// Every failing key with its role, foreground first.
    pub fn failures(&self) -> impl Iterator<Item = (PairRole, &ResolveError)> {
        std::iter::once((self.role, &self.source))
            .chain(self.also.iter().map(|err| (PairRole::Background, err)))
    }
}

fn background_suffix(also: &Option<ResolveError>) -> String {
    also.as_ref()
        .map(|err| format!("; {} {err}", PairRole::Background))
        .unwrap_or_default()
}

/// Result of checking one pair.
pub type PairOutcome = Result<ContrastResult, PairError>;

/// Measure a single pair against a theme.
///
/// # Errors
/// Returns [`PairError`] if either key is missing or holds an invalid color.
/// Both sides are resolved, so a pair with two bad keys names both.
pub fn evaluate(theme: &Theme, pair: &ContrastPair) -> PairOutcome {
    let resolve = |key: &str, role: PairRole| {
        theme.resolve(key).inspect_err(|_| {
            warn!(
                pair.label = %pair.label,
                pair.role = %role,
                pair.key = %key,
                theme.name = theme.name().unwrap_or("<unnamed>"),
                "Contrast pair does not resolve"
            );
        })
    };
    let fg = resolve(&pair.foreground, PairRole::Foreground);
    let bg = resolve(&pair.background, PairRole::Background);
    let (fg, bg) = match (fg, bg) {
        (Ok(fg), Ok(bg)) => (fg, bg),
        (Err(source), bg) => {
            return Err(PairError {
                label: pair.label.clone(),
                role: PairRole::Foreground,
                source,
                also: bg.err(),
            });
        }
        (Ok(_), Err(source)) => {
            return Err(PairError {
                label: pair.label.clone(),
                role: PairRole::Background,
                source,
                also: None,
            });
        }
    };

    let ratio = contrast_ratio(fg, bg);
    let level = WcagLevel::classify(ratio);
    if ratio < WCAG_AA_NORMAL_TEXT {
        info!(pair.label = %pair.label, contrast.ratio = ratio, "Pair below AA minimum");
    } else {
        trace!(pair.label = %pair.label, contrast.ratio = ratio, contrast.level = %level, "Pair measured");
    }

    Ok(ContrastResult {
        label: pair.label.clone(),
        foreground_key: pair.foreground.clone(),
        background_key: pair.background.clone(),
        // Both keys resolved above, so the raw values exist.
        foreground: theme.color(&pair.foreground).unwrap_or_default().to_string(),
        background: theme.color(&pair.background).unwrap_or_default().to_string(),
        ratio,
        level,
    })
}

/// Analyze every pair against a theme.
pub fn analyze<'a>(theme: &'a Theme, pairs: &'a [ContrastPair]) -> Analysis<'a> {
    Analysis { theme, pairs }
}

/// Only the measured pairs below 4.5:1, in input order.
pub fn find_issues<'a>(
    theme: &'a Theme,
    pairs: &'a [ContrastPair],
) -> impl Iterator<Item = ContrastResult> + 'a {
    analyze(theme, pairs).issues()
}

/// A restartable, ordered view over the outcomes for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Analysis<'a> {
    theme: &'a Theme,
    pairs: &'a [ContrastPair],
}

impl<'a> Analysis<'a> {
    /// The theme under analysis.
    pub fn theme(&self) -> &'a Theme {
        self.theme
    }

    /// The pairs being checked.
    pub fn pairs(&self) -> &'a [ContrastPair] {
        self.pairs
    }

    /// Number of outcomes this analysis yields.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Lazily evaluate each pair in order.
    pub fn iter(&self) -> AnalysisIter<'a> {
        AnalysisIter {
            theme: self.theme,
            pairs: self.pairs.iter(),
        }
    }

    /// Measured pairs below 4.5:1, in order.
    pub fn issues(self) -> impl Iterator<Item = ContrastResult> + 'a {
        self.iter()
            .filter_map(Result::ok)
            .filter(ContrastResult::is_issue)
    }

    /// Pairs that could not be measured, in order.
    pub fn unresolved(self) -> impl Iterator<Item = PairError> + 'a {
        self.iter().filter_map(Result::err)
    }

    /// Evaluate every pair eagerly, preserving input order.
    #[cfg(not(feature = "parallel"))]
    pub fn outcomes(&self) -> Vec<PairOutcome> {
        self.iter().collect()
    }

    /// Evaluate every pair eagerly on the rayon pool, preserving input order.
    #[cfg(feature = "parallel")]
    pub fn outcomes(&self) -> Vec<PairOutcome> {
        use rayon::prelude::*;
        let theme = self.theme;
        self.pairs
            .par_iter()
            .map(|pair| evaluate(theme, pair))
            .collect()
    }
}

impl<'a> IntoIterator for Analysis<'a> {
    type Item = PairOutcome;
    type IntoIter = AnalysisIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Analysis<'a> {
    type Item = PairOutcome;
    type IntoIter = AnalysisIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Analysis::iter`].
#[derive(Debug, Clone)]
pub struct AnalysisIter<'a> {
    theme: &'a Theme,
    pairs: slice::Iter<'a, ContrastPair>,
}

impl Iterator for AnalysisIter<'_> {
    type Item = PairOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next().map(|pair| evaluate(self.theme, pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl ExactSizeIterator for AnalysisIter<'_> {}

impl FusedIterator for AnalysisIter<'_> {}

/// Serializable summary of one outcome, used by JSON reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeRecord {
    Measured {
        label: String,
        foreground: String,
        background: String,
        ratio: f64,
        level: WcagLevel,
    },
    Unresolved {
        label: String,
        role: PairRole,
        key: String,
        error: String,
        /// Background key that also failed, when both sides did.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        also_key: Option<String>,
    },
}

impl From<&PairOutcome> for OutcomeRecord {
    fn from(outcome: &PairOutcome) -> Self {
        match outcome {
            Ok(result) => Self::Measured {
                label: result.label.clone(),
                foreground: result.foreground.clone(),
                background: result.background.clone(),
                ratio: result.ratio,
                level: result.level,
            },
            Err(err) => Self::Unresolved {
                label: err.label.clone(),
                role: err.role,
                key: err.key().to_string(),
                error: err
                    .failures()
                    .map(|(role, source)| format!("{role} {source}"))
                    .collect::<Vec<_>>()
                    .join("; "),
                also_key: err.also.as_ref().map(|e| e.key().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_theme() -> Theme {
        Theme::new("Sample")
            .with_color("editor.foreground", "#E2E3E4")
            .with_color("editor.background", "#0E1012")
            .with_color("editorLineNumber.foreground", "#3C4043")
            .with_color("editorLineNumber.activeForeground", "#9AA0A6")
            .with_color("button.foreground", "#FFFFFF")
            .with_color("button.background", "#0066CC")
            .with_color("input.foreground", "#E2E3E480")
            .with_color("input.background", "#0E1012")
    }

    fn sample_pairs() -> Vec<ContrastPair> {
        vec![
            ContrastPair::new("editorLineNumber.foreground", "editor.background", "Line Numbers"),
            ContrastPair::new("editor.foreground", "editor.background", "Editor Text"),
            ContrastPair::new("button.foreground", "button.background", "Button Text"),
            ContrastPair::new("sideBar.foreground", "sideBar.background", "Sidebar Text"),
            ContrastPair::new(
                "editorLineNumber.activeForeground",
                "editor.background",
                "Active Line Number",
            ),
        ]
    }

    #[test]
    fn test_editor_text_end_to_end() {
        let theme = Theme::new("E2E")
            .with_color("editor.foreground", "#E2E3E4")
            .with_color("editor.background", "#0E1012");
        let pairs = [ContrastPair::new(
            "editor.foreground",
            "editor.background",
            "Editor Text",
        )];
        let result = analyze(&theme, &pairs).iter().next().unwrap().unwrap();
        assert!((result.ratio - 14.9).abs() < 0.1, "ratio = {}", result.ratio);
        assert_eq!(result.level, WcagLevel::Aaa);
        assert_eq!(result.foreground, "#E2E3E4");
        assert_eq!(result.background, "#0E1012");
        assert!(!result.is_issue());
    }

    #[test]
    fn test_output_order_mirrors_input() {
        let theme = sample_theme();
        let pairs = sample_pairs();
        let labels: Vec<String> = analyze(&theme, &pairs)
            .iter()
            .map(|outcome| match outcome {
                Ok(r) => r.label,
                Err(e) => e.label,
            })
            .collect();
        let expected: Vec<&str> = pairs.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_analysis_is_restartable() {
        let theme = sample_theme();
        let pairs = sample_pairs();
        let analysis = analyze(&theme, &pairs);
        let first: Vec<_> = analysis.iter().collect();
        let second: Vec<_> = analysis.into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(analysis.iter().len(), pairs.len());
    }

    #[test]
    fn test_classifications() {
        let theme = sample_theme();
        let pairs = sample_pairs();
        let levels: Vec<Option<WcagLevel>> = analyze(&theme, &pairs)
            .iter()
            .map(|o| o.ok().map(|r| r.level))
            .collect();
        assert_eq!(
            levels,
            vec![
                Some(WcagLevel::Fail),
                Some(WcagLevel::Aaa),
                Some(WcagLevel::Aa),
                None,
                Some(WcagLevel::Aaa),
            ]
        );
    }

    #[test]
    fn test_missing_key_is_surfaced_not_skipped() {
        let theme = sample_theme();
        let pairs = sample_pairs();
        let outcomes: Vec<_> = analyze(&theme, &pairs).iter().collect();
        assert_eq!(outcomes.len(), pairs.len());

        let err = outcomes[3].clone().unwrap_err();
        assert_eq!(err.label, "Sidebar Text");
        assert_eq!(err.role, PairRole::Foreground);
        assert_eq!(err.key(), "sideBar.foreground");
        assert!(matches!(err.source, ResolveError::UnresolvedKey { .. }));
    }

    #[test]
    fn test_single_missing_key_message() {
        let theme = Theme::new("t").with_color("editor.background", "#0E1012");
        let pair = ContrastPair::new("sideBar.foreground", "editor.background", "Sidebar Text");
        let err = evaluate(&theme, &pair).unwrap_err();
        assert_eq!(err.also, None);
        assert_eq!(
            err.to_string(),
            "Sidebar Text: foreground color 'sideBar.foreground' is not defined"
        );
    }

    #[test]
    fn test_both_missing_keys_are_reported() {
        let theme = sample_theme();
        let pair = ContrastPair::new("sideBar.foreground", "sideBar.background", "Sidebar Text");
        let err = evaluate(&theme, &pair).unwrap_err();
        assert_eq!(err.role, PairRole::Foreground);
        assert_eq!(err.key(), "sideBar.foreground");
        assert_eq!(
            err.also,
            Some(ResolveError::UnresolvedKey {
                key: "sideBar.background".into()
            })
        );
        let keys: Vec<(PairRole, &str)> = err.failures().map(|(r, e)| (r, e.key())).collect();
        assert_eq!(
            keys,
            vec![
                (PairRole::Foreground, "sideBar.foreground"),
                (PairRole::Background, "sideBar.background"),
            ]
        );
        assert_eq!(
            err.to_string(),
            "Sidebar Text: foreground color 'sideBar.foreground' is not defined; \
             background color 'sideBar.background' is not defined"
        );

        let outcome: PairOutcome = Err(err);
        let record = OutcomeRecord::from(&outcome);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["key"], "sideBar.foreground");
        assert_eq!(json["also_key"], "sideBar.background");
        assert_eq!(
            json["error"],
            "foreground color 'sideBar.foreground' is not defined; \
             background color 'sideBar.background' is not defined"
        );
    }

    #[test]
    fn test_invalid_foreground_and_missing_background_both_named() {
        let theme = sample_theme();
        let pair = ContrastPair::new("input.foreground", "nope.background", "Input Text");
        let err = evaluate(&theme, &pair).unwrap_err();
        assert!(matches!(err.source, ResolveError::InvalidColor { .. }));
        assert_eq!(err.also.as_ref().map(ResolveError::key), Some("nope.background"));
    }

    #[test]
    fn test_missing_background_reports_background_role() {
        let theme = Theme::new("t").with_color("a.foreground", "#ffffff");
        let pair = ContrastPair::new("a.foreground", "a.background", "A");
        let err = evaluate(&theme, &pair).unwrap_err();
        assert_eq!(err.role, PairRole::Background);
        assert_eq!(err.key(), "a.background");
        assert_eq!(err.also, None);
    }

    #[test]
    fn test_invalid_color_is_surfaced() {
        let theme = sample_theme();
        let pair = ContrastPair::new("input.foreground", "input.background", "Input Text");
        let err = evaluate(&theme, &pair).unwrap_err();
        assert!(matches!(err.source, ResolveError::InvalidColor { .. }));
    }

    #[test]
    fn test_find_issues_is_ordered_subset() {
        let theme = Theme::new("Issues")
            .with_color("a.fg", "#777777")
            .with_color("a.bg", "#FFFFFF")
            .with_color("b.fg", "#000000")
            .with_color("b.bg", "#FFFFFF")
            .with_color("c.fg", "#5A6068")
            .with_color("c.bg", "#0E1012")
            .with_color("d.fg", "#767676")
            .with_color("d.bg", "#FFFFFF");
        let pairs = vec![
            ContrastPair::new("a.fg", "a.bg", "A"),
            ContrastPair::new("b.fg", "b.bg", "B"),
            ContrastPair::new("missing", "b.bg", "Missing"),
            ContrastPair::new("c.fg", "c.bg", "C"),
            ContrastPair::new("d.fg", "d.bg", "D"),
        ];
        let issues: Vec<ContrastResult> = find_issues(&theme, &pairs).collect();
        let labels: Vec<&str> = issues.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C"]);
        assert!(issues.iter().all(|r| r.ratio < 4.5));

        let all: Vec<ContrastResult> = analyze(&theme, &pairs)
            .iter()
            .filter_map(Result::ok)
            .collect();
        assert!(issues.iter().all(|r| all.contains(r)));

        let unresolved: Vec<_> = analyze(&theme, &pairs).unresolved().collect();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].label, "Missing");
    }

    #[test]
    fn test_outcomes_match_lazy_iteration() {
        let theme = sample_theme();
        let pairs = sample_pairs();
        let analysis = analyze(&theme, &pairs);
        let eager = analysis.outcomes();
        let lazy: Vec<_> = analysis.iter().collect();
        assert_eq!(eager, lazy);
    }

    #[test]
    fn test_outcome_record_json_shape() {
        let theme = sample_theme();
        let pairs = sample_pairs();
        let records: Vec<OutcomeRecord> = analyze(&theme, &pairs)
            .iter()
            .map(|o| OutcomeRecord::from(&o))
            .collect();
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json[1]["status"], "measured");
        assert_eq!(json[1]["level"], "AAA");
        assert_eq!(json[3]["status"], "unresolved");
        assert_eq!(json[3]["role"], "foreground");
        assert_eq!(json[3]["key"], "sideBar.foreground");
        assert_eq!(json[3]["also_key"], "sideBar.background");
        assert!(json[0].get("also_key").is_none());
    }
}

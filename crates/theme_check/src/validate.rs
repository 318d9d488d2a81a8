//! Structural validation of theme documents.
//!
//! Checks the minimum contract a host editor expects: a fixed set of
//! workbench colors and a non-empty `tokenColors` list. Semantic token colors
//! are reported but never required. The result lists every required key with
//! its own pass/fail so callers can say exactly what to fix.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::theme::Theme;

/// The color keys every theme must define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredKeys(Vec<String>);

impl RequiredKeys {
    /// Wraps an explicit key list.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> &[String] {
        &self.0
    }
}

impl Default for RequiredKeys {
    fn default() -> Self {
        Self::new([
            "editor.background",
            "editor.foreground",
            "activityBar.background",
            "sideBar.background",
            "tab.activeBackground",
            "statusBar.background",
        ])
    }
}

/// Presence check for one required key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCheck {
    pub key: String,
    pub present: bool,
}

/// Outcome of validating one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// One entry per required key, in configured order.
    pub required: Vec<KeyCheck>,
    pub color_count: usize,
    pub token_color_count: usize,
    pub has_semantic_tokens: bool,
    /// The document's `semanticHighlighting` flag, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_highlighting: Option<bool>,
    pub editor_background: Option<String>,
    pub editor_foreground: Option<String>,
}

impl ValidationReport {
    /// Required keys that are absent, empty or not a string.
    pub fn missing_keys(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|check| !check.present)
            .map(|check| check.key.as_str())
            .collect()
    }

    /// Returns true if all required keys are present.
    pub fn has_required_keys(&self) -> bool {
        self.required.iter().all(|check| check.present)
    }

    /// Returns true if the theme satisfies the structural contract.
    pub fn is_valid(&self) -> bool {
        self.has_required_keys() && self.token_color_count > 0
    }

    /// Describe what is wrong, if anything.
    pub fn schema_error(&self) -> Option<SchemaError> {
        if self.is_valid() {
            return None;
        }
        Some(SchemaError {
            missing_keys: self.missing_keys().into_iter().map(String::from).collect(),
            empty_token_colors: self.token_color_count == 0,
        })
    }
}

/// A theme lacks required structure. Reported, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub missing_keys: Vec<String>,
    pub empty_token_colors: bool,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing_keys.is_empty() {
            parts.push(format!("Missing properties: {}", self.missing_keys.join(", ")));
        }
        if self.empty_token_colors {
            parts.push("tokenColors is empty".to_string());
        }
        f.write_str(&parts.join("; "))
    }
}

/// Check a theme against the required key set.
pub fn validate(theme: &Theme, required: &RequiredKeys) -> ValidationReport {
    let required_checks: Vec<KeyCheck> = required
        .keys()
        .iter()
        .map(|key| KeyCheck {
            key: key.clone(),
            present: theme.color(key).is_some_and(|v| !v.trim().is_empty()),
        })
        .collect();

    let report = ValidationReport {
        required: required_checks,
        color_count: theme.color_count(),
        token_color_count: theme.token_colors().len(),
        has_semantic_tokens: theme.semantic_token_colors().is_some(),
        semantic_highlighting: theme.semantic_highlighting(),
        editor_background: theme.color("editor.background").map(String::from),
        editor_foreground: theme.color("editor.foreground").map(String::from),
    };

    info!(
        theme.name = theme.name().unwrap_or("<unnamed>"),
        validate.missing = report.missing_keys().len(),
        validate.token_colors = report.token_color_count,
        validate.ok = report.is_valid(),
        "Theme validated"
    );
    report
}

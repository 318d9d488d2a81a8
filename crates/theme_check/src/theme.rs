//! Editor theme documents.
//!
//! A [`Theme`] mirrors the color-theme JSON consumed by VS Code style editors:
//!
//! ```json
//! {
//!   "name": "Evergarden Winter",
//!   "type": "dark",
//!   "colors": { "editor.background": "#0E1012", "editor.foreground": "#E2E3E4" },
//!   "tokenColors": [{ "scope": ["comment"], "settings": { "foreground": "#5A6068" } }],
//!   "semanticTokenColors": { "variable.readonly": "#E2E3E4" }
//! }
//! ```
//!
//! Color values are kept as the raw values found in the document. They are
//! only parsed into [`Rgb`] when a caller [`resolve`](Theme::resolve)s a key,
//! so one malformed value (a bad hex string, `null`, a number) is reported
//! against the pair that uses it instead of rejecting the whole file.
//!
//! # Example
//!
//! ```rust
//! use theme_check::theme::Theme;
//!
//! let theme = Theme::from_json(r##"{"colors": {"editor.background": "#0e1012"}}"##).unwrap();
//! assert_eq!(theme.color("editor.background"), Some("#0e1012"));
//! assert!(theme.resolve("editor.foreground").is_err());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use json_comments::StripComments;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wcag::{ColorParseError, Rgb};

/// A loaded color theme. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Human-readable theme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Declared base appearance (`"type"` in the document).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<ThemeKind>,

    /// Workbench colors keyed by dotted UI element name.
    #[serde(default)]
    colors: BTreeMap<String, ColorValue>,

    /// Ordered syntax highlighting rules.
    #[serde(default)]
    token_colors: Vec<TokenColorRule>,

    /// Optional semantic token styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    semantic_token_colors: Option<BTreeMap<String, SemanticStyle>>,

    /// Whether the theme opts into semantic highlighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    semantic_highlighting: Option<bool>,
}

/// A raw workbench color entry.
///
/// Editors accept `null` to mean "use the default", so the document is not
/// rejected for entries that are not strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Text(String),
    Other(serde_json::Value),
}

impl ColorValue {
    /// The value if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) => None,
        }
    }
}

/// Base appearance declared by a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeKind {
    Dark,
    Light,
    Hc,
    HcLight,
    #[serde(other)]
    Other,
}

/// One syntax highlighting rule (`tokenColors[i]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenColorRule {
    /// Optional description of the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Scope selector(s) this rule applies to. Absent means the default style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeSelector>,

    /// Style applied to matching tokens.
    #[serde(default)]
    pub settings: TokenStyle,
}

/// A rule's scope: either one (possibly comma-separated) string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeSelector {
    One(String),
    Many(Vec<String>),
}

impl ScopeSelector {
    /// Individual scope names, with comma-separated lists split apart.
    pub fn scopes(&self) -> Vec<&str> {
        match self {
            Self::One(s) => split_scopes(s).collect(),
            Self::Many(list) => list.iter().flat_map(|s| split_scopes(s)).collect(),
        }
    }
}

fn split_scopes(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// Display style of a token color rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

/// A semantic token style: a bare color or a style object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SemanticStyle {
    Color(String),
    Style(SemanticTokenStyle),
}

impl SemanticStyle {
    /// Foreground color of this style, if any.
    pub fn foreground(&self) -> Option<&str> {
        match self {
            Self::Color(c) => Some(c),
            Self::Style(s) => s.foreground.as_deref(),
        }
    }
}

/// Object form of a semantic token style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticTokenStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
}

impl Theme {
    /// Creates an empty theme with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    // ========================
    // Accessors
    // ========================

    /// Returns the theme name, if the document declares one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared base appearance.
    pub fn kind(&self) -> Option<ThemeKind> {
        self.kind
    }

    /// Returns the workbench color map.
    pub fn colors(&self) -> &BTreeMap<String, ColorValue> {
        &self.colors
    }

    /// Number of workbench color entries.
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Returns the raw value for a color key, if it is a string.
    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key).and_then(ColorValue::as_str)
    }

    /// Resolve a color key to an opaque sRGB value.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnresolvedKey`] if the key is absent, empty or
    /// `null`, [`ResolveError::NotAString`] for any other non-string value, and
    /// [`ResolveError::InvalidColor`] if its value is not an opaque hex color.
    pub fn resolve(&self, key: &str) -> Result<Rgb, ResolveError> {
        let value = match self.colors.get(key) {
            Some(ColorValue::Text(s)) if !s.trim().is_empty() => s,
            Some(ColorValue::Other(other)) if !other.is_null() => {
                return Err(ResolveError::NotAString {
                    key: key.to_string(),
                    value: other.to_string(),
                });
            }
            _ => {
                return Err(ResolveError::UnresolvedKey {
                    key: key.to_string(),
                });
            }
        };
        Rgb::from_hex(value).map_err(|source| ResolveError::InvalidColor {
            key: key.to_string(),
            value: value.clone(),
            source,
        })
    }

    /// Returns the syntax highlighting rules in document order.
    pub fn token_colors(&self) -> &[TokenColorRule] {
        &self.token_colors
    }

    /// Returns the semantic token styles, if present.
    pub fn semantic_token_colors(&self) -> Option<&BTreeMap<String, SemanticStyle>> {
        self.semantic_token_colors.as_ref()
    }

    /// Returns whether semantic highlighting is declared.
    pub fn semantic_highlighting(&self) -> Option<bool> {
        self.semantic_highlighting
    }

    // ========================
    // Builder Methods
    // ========================

    /// Sets one workbench color.
    pub fn with_color(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors.insert(key.into(), ColorValue::Text(value.into()));
        self
    }

    /// Appends a syntax highlighting rule.
    pub fn with_token_color(mut self, rule: TokenColorRule) -> Self {
        self.token_colors.push(rule);
        self
    }

    /// Sets one semantic token style.
    pub fn with_semantic_token_color(
        mut self,
        token_type: impl Into<String>,
        style: SemanticStyle,
    ) -> Self {
        self.semantic_token_colors
            .get_or_insert_with(BTreeMap::new)
            .insert(token_type.into(), style);
        self
    }

    // ========================
    // Loading
    // ========================

    /// Load a theme from JSON text.
    ///
    /// # Errors
    /// Returns [`ThemeLoadError::Parse`] if the text is not valid JSON or does
    /// not have the shape of a theme document.
    pub fn from_json(json: &str) -> Result<Self, ThemeLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a theme from JSON text that may contain `//` and `/* */` comments.
    ///
    /// # Errors
    /// Returns [`ThemeLoadError::Parse`] if the text without comments is not
    /// a valid theme document.
    pub fn from_jsonc(jsonc: &str) -> Result<Self, ThemeLoadError> {
        let stripped = StripComments::new(jsonc.as_bytes());
        Ok(serde_json::from_reader(stripped)?)
    }

    /// Load a theme from TOML text.
    ///
    /// # Errors
    /// Returns [`ThemeLoadError::Toml`] if TOML parsing fails.
    pub fn from_toml(toml: &str) -> Result<Self, ThemeLoadError> {
        Ok(toml::from_str(toml)?)
    }

    /// Load a theme from YAML text.
    ///
    /// # Errors
    /// Returns [`ThemeLoadError::Yaml`] if YAML parsing fails.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeLoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a theme from a file (format inferred by extension).
    ///
    /// Each call reads the file afresh and returns an independently owned value.
    ///
    /// # Errors
    /// Returns [`ThemeLoadError`] if reading or parsing fails, or the
    /// extension is not a supported format.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ThemeLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let theme = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("jsonc") => Self::from_jsonc(&content),
            Some("toml") => Self::from_toml(&content),
            Some("yaml" | "yml") => {
                #[cfg(feature = "yaml")]
                {
                    Self::from_yaml(&content)
                }
                #[cfg(not(feature = "yaml"))]
                {
                    Err(ThemeLoadError::UnsupportedFormat("yaml".into()))
                }
            }
            Some(ext) => Err(ThemeLoadError::UnsupportedFormat(ext.into())),
            None => Err(ThemeLoadError::UnsupportedFormat("unknown".into())),
        }?;
        debug!(
            theme.path = %path.display(),
            theme.name = theme.name().unwrap_or("<unnamed>"),
            theme.colors = theme.color_count(),
            theme.token_colors = theme.token_colors.len(),
            "Theme loaded"
        );
        Ok(theme)
    }
}

/// Error loading a theme document.
#[derive(Error, Debug)]
pub enum ThemeLoadError {
    #[error("Invalid JSON - {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid TOML - {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "yaml")]
    #[error("Invalid YAML - {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Error resolving a color key against a theme.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("color '{key}' is not defined")]
    UnresolvedKey { key: String },
    #[error("color '{key}' has non-string value {value}")]
    NotAString { key: String, value: String },
    #[error("color '{key}' has invalid value '{value}': {source}")]
    InvalidColor {
        key: String,
        value: String,
        #[source]
        source: ColorParseError,
    },
}

impl ResolveError {
    /// The color key that failed to resolve.
    pub fn key(&self) -> &str {
        match self {
            Self::UnresolvedKey { key }
            | Self::NotAString { key, .. }
            | Self::InvalidColor { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r##"{
        "name": "Sample Dark",
        "type": "dark",
        "$schema": "vscode://schemas/color-theme",
        "colors": {
            "editor.background": "#0E1012",
            "editor.foreground": "#E2E3E4",
            "editorCursor.foreground": "#E2E3E480"
        },
        "tokenColors": [
            { "name": "Comments", "scope": ["comment", "punctuation.definition.comment"],
              "settings": { "foreground": "#5A6068", "fontStyle": "italic" } },
            { "scope": "keyword, storage.type", "settings": { "foreground": "#C8A2C8" } },
            { "settings": { "foreground": "#E2E3E4" } }
        ],
        "semanticTokenColors": {
            "variable.readonly": "#D4C4A8",
            "parameter": { "foreground": "#A8C4D4", "italic": true }
        }
    }"##;

    #[test]
    fn test_from_json_reads_all_sections() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        assert_eq!(theme.name(), Some("Sample Dark"));
        assert_eq!(theme.kind(), Some(ThemeKind::Dark));
        assert_eq!(theme.color_count(), 3);
        assert_eq!(theme.token_colors().len(), 3);
        assert_eq!(theme.token_colors()[0].name.as_deref(), Some("Comments"));
        assert_eq!(
            theme.token_colors()[0].settings.font_style.as_deref(),
            Some("italic")
        );
        let semantic = theme.semantic_token_colors().unwrap();
        assert_eq!(semantic["variable.readonly"].foreground(), Some("#D4C4A8"));
        assert_eq!(semantic["parameter"].foreground(), Some("#A8C4D4"));
    }

    #[test]
    fn test_scope_selector_forms() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        let rules = theme.token_colors();
        assert_eq!(
            rules[0].scope.as_ref().unwrap().scopes(),
            vec!["comment", "punctuation.definition.comment"]
        );
        assert_eq!(
            rules[1].scope.as_ref().unwrap().scopes(),
            vec!["keyword", "storage.type"]
        );
        assert!(rules[2].scope.is_none());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let theme = Theme::from_json("{}").unwrap();
        assert_eq!(theme.name(), None);
        assert_eq!(theme.color_count(), 0);
        assert!(theme.token_colors().is_empty());
        assert!(theme.semantic_token_colors().is_none());
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let theme = Theme::from_json(r#"{"type": "sepia"}"#).unwrap();
        assert_eq!(theme.kind(), Some(ThemeKind::Other));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Theme::from_json("{ \"colors\": ").unwrap_err();
        assert!(matches!(err, ThemeLoadError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid JSON - "));
    }

    #[test]
    fn test_resolve_outcomes() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        assert_eq!(
            theme.resolve("editor.background"),
            Ok(Rgb::new(0x0e, 0x10, 0x12))
        );
        assert_eq!(
            theme.resolve("sideBar.background"),
            Err(ResolveError::UnresolvedKey {
                key: "sideBar.background".into()
            })
        );
        let err = theme.resolve("editorCursor.foreground").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidColor { .. }));
        assert_eq!(err.key(), "editorCursor.foreground");
    }

    #[test]
    fn test_resolve_treats_empty_value_as_unresolved() {
        let theme = Theme::new("t").with_color("editor.background", "  ");
        assert!(matches!(
            theme.resolve("editor.background"),
            Err(ResolveError::UnresolvedKey { .. })
        ));
    }

    #[test]
    fn test_from_file_json_twice_yields_equal_values() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let a = Theme::from_file(file.path()).unwrap();
        let b = Theme::from_file(file.path()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_file_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br##"
name = "Toml Theme"
type = "light"

[colors]
"editor.background" = "#ffffff"

[[tokenColors]]
scope = "comment"
settings = { foreground = "#6e7681" }
"##,
        )
        .unwrap();
        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.kind(), Some(ThemeKind::Light));
        assert_eq!(theme.resolve("editor.background"), Ok(Rgb::WHITE));
        assert_eq!(theme.token_colors().len(), 1);
    }

    #[test]
    fn test_non_string_color_does_not_reject_document() {
        let theme = Theme::from_json(
            r##"{"colors": {
                "editor.foreground": "#E2E3E4",
                "editor.background": "#0E1012",
                "badge.background": null,
                "badge.foreground": 12
            }}"##,
        )
        .unwrap();
        assert_eq!(theme.color_count(), 4);
        assert_eq!(theme.color("badge.background"), None);
        assert_eq!(theme.resolve("editor.foreground"), Ok(Rgb::new(0xe2, 0xe3, 0xe4)));
        assert_eq!(
            theme.resolve("badge.background"),
            Err(ResolveError::UnresolvedKey {
                key: "badge.background".into()
            })
        );
        let err = theme.resolve("badge.foreground").unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotAString {
                key: "badge.foreground".into(),
                value: "12".into()
            }
        );
        assert_eq!(err.to_string(), "color 'badge.foreground' has non-string value 12");
    }

    #[test]
    fn test_from_jsonc_strips_comments() {
        let theme = Theme::from_jsonc(
            r##"{
                // Base colors
                "name": "Commented",
                "colors": {
                    /* the canvas */
                    "editor.background": "#0E1012",
                    "editor.foreground": "#E2E3E4" // body text
                }
            }"##,
        )
        .unwrap();
        assert_eq!(theme.name(), Some("Commented"));
        assert_eq!(theme.color("editor.background"), Some("#0E1012"));
        assert_eq!(theme.color_count(), 2);
    }

    #[test]
    fn test_from_file_jsonc_accepts_comments_json_does_not() {
        let text = b"{\n  // dark\n  \"colors\": { \"editor.background\": \"#000000\" }\n}\n";

        let mut jsonc = tempfile::Builder::new().suffix(".jsonc").tempfile().unwrap();
        jsonc.write_all(text).unwrap();
        let theme = Theme::from_file(jsonc.path()).unwrap();
        assert_eq!(theme.resolve("editor.background"), Ok(Rgb::BLACK));

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(text).unwrap();
        assert!(matches!(
            Theme::from_file(json.path()),
            Err(ThemeLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        let err = Theme::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ThemeLoadError::UnsupportedFormat(ext) if ext == "xml"));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = Theme::from_file("/definitely/not/here/theme.json").unwrap_err();
        assert!(matches!(err, ThemeLoadError::Io(_)));
    }
}

//! Foreground/background color pairs that must stay legible together.

use serde::{Deserialize, Serialize};

/// One UI element whose text color is checked against its background.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContrastPair {
    /// Color key of the text.
    pub foreground: String,
    /// Color key of the surface behind the text.
    pub background: String,
    /// Display label used in reports.
    pub label: String,
}

impl ContrastPair {
    /// Creates a pair.
    pub fn new(
        foreground: impl Into<String>,
        background: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            foreground: foreground.into(),
            background: background.into(),
            label: label.into(),
        }
    }
}

/// An ordered, immutable list of contrast pairs.
///
/// Reports list results in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairSet(Vec<ContrastPair>);

impl PairSet {
    /// Wraps an explicit list.
    pub fn new(pairs: Vec<ContrastPair>) -> Self {
        Self(pairs)
    }

    /// The curated editor workbench pairs.
    pub fn editor_defaults() -> Self {
        const DEFAULTS: [(&str, &str, &str); 18] = [
            // Editor
            ("editor.foreground", "editor.background", "Editor Text"),
            ("editorLineNumber.foreground", "editor.background", "Line Numbers"),
            (
                "editorLineNumber.activeForeground",
                "editor.background",
                "Active Line Number",
            ),
            // Sidebar
            ("sideBar.foreground", "sideBar.background", "Sidebar Text"),
            ("sideBarTitle.foreground", "sideBar.background", "Sidebar Title"),
            // Tabs
            ("tab.activeForeground", "tab.activeBackground", "Active Tab Text"),
            (
                "tab.inactiveForeground",
                "tab.inactiveBackground",
                "Inactive Tab Text",
            ),
            // Status bar
            ("statusBar.foreground", "statusBar.background", "Status Bar Text"),
            (
                "statusBarItem.errorForeground",
                "statusBarItem.errorBackground",
                "Status Error",
            ),
            (
                "statusBarItem.warningForeground",
                "statusBarItem.warningBackground",
                "Status Warning",
            ),
            // Buttons
            ("button.foreground", "button.background", "Button Text"),
            // Inputs
            ("input.foreground", "input.background", "Input Text"),
            (
                "input.placeholderForeground",
                "input.background",
                "Input Placeholder",
            ),
            // Lists
            (
                "list.activeSelectionForeground",
                "list.activeSelectionBackground",
                "List Selection",
            ),
            ("list.hoverForeground", "list.hoverBackground", "List Hover"),
            // Widgets
            (
                "editorSuggestWidget.foreground",
                "editorSuggestWidget.background",
                "Suggestion Widget",
            ),
            ("quickInput.foreground", "quickInput.background", "Quick Input"),
            // Terminal
            ("terminal.foreground", "terminal.background", "Terminal Text"),
        ];
        Self(
            DEFAULTS
                .iter()
                .map(|(fg, bg, label)| ContrastPair::new(*fg, *bg, *label))
                .collect(),
        )
    }

    /// Returns the pairs in order.
    pub fn pairs(&self) -> &[ContrastPair] {
        &self.0
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the pairs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContrastPair> {
        self.0.iter()
    }
}

impl Default for PairSet {
    fn default() -> Self {
        Self::editor_defaults()
    }
}

impl From<Vec<ContrastPair>> for PairSet {
    fn from(pairs: Vec<ContrastPair>) -> Self {
        Self(pairs)
    }
}

impl AsRef<[ContrastPair]> for PairSet {
    fn as_ref(&self) -> &[ContrastPair] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a PairSet {
    type Item = &'a ContrastPair;
    type IntoIter = std::slice::Iter<'a, ContrastPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! WCAG 2.x relative luminance, contrast ratio, and conformance levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Minimum contrast for normal text at level AA.
pub const WCAG_AA_NORMAL_TEXT: f64 = 4.5;
/// Minimum contrast for normal text at level AAA.
pub const WCAG_AAA_NORMAL_TEXT: f64 = 7.0;

/// Linearize one 8-bit sRGB channel.
///
/// Uses the WCAG 2.x breakpoint `0.03928`, not the IEC `0.0031308`.
fn linearize(channel: u8) -> f64 {
    let cs = f64::from(channel) / 255.0;
    if cs <= 0.03928 {
        cs / 12.92
    } else {
        ((cs + 0.055) / 1.055).powf(2.4)
    }
}

/// Compute the WCAG relative luminance of a color.
///
/// `L = 0.2126 R + 0.7152 G + 0.0722 B` over linearized channels. Black is
/// `0.0`, white is `1.0`.
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// Compute the WCAG contrast ratio between two colors.
///
/// Symmetric in its arguments; ranges from `1.0` (identical luminance) to
/// `21.0` (black on white).
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let lighter = la.max(lb);
    let darker = la.min(lb);
    (lighter + 0.05) / (darker + 0.05)
}

/// Returns true if the pair meets WCAG AA for normal text (>= 4.5:1).
pub fn meets_wcag_aa(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= WCAG_AA_NORMAL_TEXT
}

/// Returns true if the pair meets WCAG AAA for normal text (>= 7:1).
pub fn meets_wcag_aaa(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= WCAG_AAA_NORMAL_TEXT
}

/// Conformance tier of a contrast ratio for normal-size text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WcagLevel {
    /// Below 4.5:1.
    Fail,
    /// At least 4.5:1.
    Aa,
    /// At least 7:1.
    Aaa,
}

impl WcagLevel {
    /// Classify a contrast ratio. Each tier's lower bound is inclusive.
    pub fn classify(ratio: f64) -> Self {
        if ratio >= WCAG_AAA_NORMAL_TEXT {
            Self::Aaa
        } else if ratio >= WCAG_AA_NORMAL_TEXT {
            Self::Aa
        } else {
            Self::Fail
        }
    }

    /// Short tier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::Fail => "FAIL",
        }
    }

    /// Tier name with a status marker, as printed in reports.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Aaa => "✅ AAA",
            Self::Aa => "⚠️ AA",
            Self::Fail => "❌ FAIL",
        }
    }

    /// Returns true if this tier is at least `required`.
    pub fn meets(&self, required: Self) -> bool {
        *self >= required
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! sRGB color values parsed from theme hex strings.
//!
//! Theme documents store colors as `#RRGGBB`. The `#RGB` shorthand is
//! accepted and expanded (`#abc` is `#aabbcc`). Translucent `#RRGGBBAA`
//! values are rejected: their perceived contrast depends on whatever is
//! composited underneath, which a static audit cannot know.
//!
//! # Example
//!
//! ```rust
//! use wcag::Rgb;
//!
//! let c = Rgb::from_hex("#0e1012").unwrap();
//! assert_eq!(c, Rgb::new(0x0e, 0x10, 0x12));
//! assert_eq!(c.to_string(), "#0e1012");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An opaque 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Error parsing a hex color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color value is empty")]
    Empty,
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),
    #[error("color '{value}' has {digits} hex digits, expected 3 or 6")]
    InvalidLength { value: String, digits: usize },
    #[error("color '{0}' carries an alpha channel; only opaque colors can be audited")]
    TranslucentColor(String),
    #[error("color '{0}' contains a non-hex digit")]
    InvalidDigit(String),
}

impl Rgb {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (`#000000`).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White (`#ffffff`).
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Parse a `#RRGGBB` or `#RGB` string.
    ///
    /// Surrounding whitespace is ignored; digits are case-insensitive.
    ///
    /// # Errors
    /// Returns [`ColorParseError`] if the string is not an opaque hex color.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let Some(digits) = raw.strip_prefix('#') else {
            return Err(ColorParseError::MissingHash(raw.to_string()));
        };
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(raw.to_string()));
        }

        // All digits are ASCII past this point, so byte slicing is safe.
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidDigit(raw.to_string()))
        };
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => Ok(Self::new(
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            )),
            4 | 8 => Err(ColorParseError::TranslucentColor(raw.to_string())),
            n => Err(ColorParseError::InvalidLength {
                value: raw.to_string(),
                digits: n,
            }),
        }
    }

    /// Returns the lower-case `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG relative luminance of this color, in `[0, 1]`.
    pub fn relative_luminance(self) -> f64 {
        crate::contrast::relative_luminance(self)
    }

    /// WCAG contrast ratio against another color, in `[1, 21]`.
    pub fn contrast_ratio(self, other: Self) -> f64 {
        crate::contrast::contrast_ratio(self, other)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(RgbVisitor)
    }
}

struct RgbVisitor;

impl Visitor<'_> for RgbVisitor {
    type Value = Rgb;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a hex color string like \"#rrggbb\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Rgb::from_hex(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        assert_eq!(Rgb::from_hex("#E2E3E4"), Ok(Rgb::new(0xe2, 0xe3, 0xe4)));
        assert_eq!(Rgb::from_hex("#0e1012"), Ok(Rgb::new(0x0e, 0x10, 0x12)));
    }

    #[test]
    fn test_parse_shorthand_expands_digits() {
        assert_eq!(Rgb::from_hex("#fff"), Ok(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#a1c"), Ok(Rgb::new(0xaa, 0x11, 0xcc)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Rgb::from_hex("  #000000 "), Ok(Rgb::BLACK));
    }

    #[test]
    fn test_parse_rejects_alpha() {
        assert!(matches!(
            Rgb::from_hex("#00000080"),
            Err(ColorParseError::TranslucentColor(_))
        ));
        assert!(matches!(
            Rgb::from_hex("#0008"),
            Err(ColorParseError::TranslucentColor(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Rgb::from_hex(""), Err(ColorParseError::Empty));
        assert!(matches!(
            Rgb::from_hex("ffffff"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            Rgb::from_hex("#ggg"),
            Err(ColorParseError::InvalidDigit(_))
        ));
        assert!(matches!(
            Rgb::from_hex("#12345"),
            Err(ColorParseError::InvalidLength { digits: 5, .. })
        ));
        // Multi-byte characters never reach the slicing path.
        assert!(matches!(
            Rgb::from_hex("#ééé"),
            Err(ColorParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Rgb::new(0xAB, 0xCD, 0xEF).to_string(), "#abcdef");
    }

    #[test]
    fn test_serde_string_form() {
        let c: Rgb = serde_json::from_str("\"#336699\"").unwrap();
        assert_eq!(c, Rgb::new(0x33, 0x66, 0x99));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#336699\"");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let err = serde_json::from_str::<Rgb>("\"blue\"").unwrap_err();
        assert!(err.to_string().contains("must start with '#'"));
    }
}

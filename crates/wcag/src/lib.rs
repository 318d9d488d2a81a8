#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # WCAG
//!
//! sRGB colors and the WCAG 2.x contrast math used to audit editor themes.
//!
//! - [`Rgb`] parses `#RRGGBB` / `#RGB` hex strings.
//! - [`relative_luminance`] and [`contrast_ratio`] implement the WCAG 2.x
//!   definitions (breakpoint `0.03928`, coefficients `0.2126 / 0.7152 / 0.0722`).
//! - [`WcagLevel`] classifies a ratio into AAA, AA or FAIL.
//!
//! ## Example
//!
//! ```rust
//! use wcag::{Rgb, WcagLevel, contrast_ratio};
//!
//! let fg: Rgb = "#E2E3E4".parse().unwrap();
//! let bg: Rgb = "#0E1012".parse().unwrap();
//!
//! let ratio = contrast_ratio(fg, bg);
//! assert_eq!(WcagLevel::classify(ratio), WcagLevel::Aaa);
//! ```

pub mod color;
pub mod contrast;

pub use color::{ColorParseError, Rgb};
pub use contrast::{
    WCAG_AA_NORMAL_TEXT, WCAG_AAA_NORMAL_TEXT, WcagLevel, contrast_ratio, meets_wcag_aa,
    meets_wcag_aaa, relative_luminance,
};

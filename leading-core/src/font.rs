//! Font handles and the width-measurement capability.
//!
//! The wrapping algorithm never touches a real rasterizer. Everything it
//! knows about glyph geometry comes through [`TextMeasurer`], which the host
//! graphics layer implements (see `leading-text` for the cosmic-text
//! backend). [`FixedAdvanceMeasurer`] is the dependency-free stand-in used by
//! tests, benchmarks and terminal-style callers.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::WrapError;
use crate::tokenizer::is_wide_char;

/// Font selection passed through to the measurer.
///
/// The core treats this as opaque apart from [`FontSpec::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// CSS-style family chain (e.g. `"Arial, Helvetica, sans-serif"`).
    pub family: String,
    /// Font size in pixels.
    pub size: f32,
    /// Font weight (100–900). 400 = normal, 700 = bold.
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: String::from("sans-serif"),
            size: 16.0,
            weight: 400,
            italic: false,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Default::default()
        }
    }

    /// Reject fonts no measurer could honour.
    pub fn validate(&self) -> Result<(), WrapError> {
        if self.family.trim().is_empty() {
            return Err(WrapError::InvalidArgument {
                name: "font",
                reason: "family is empty".into(),
            });
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(WrapError::InvalidArgument {
                name: "font",
                reason: format!("size must be a finite positive number, got {}", self.size),
            });
        }
        Ok(())
    }
}

/// How a measurer should account for glyph padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureMode {
    /// Final display measurement. Backends may round or pad.
    #[default]
    Display,
    /// Exact advance sum with no extra padding, for accumulating
    /// widths inside a line.
    Typographic,
}

/// Host capability: pixel width of a string in a font.
///
/// Implementations must be deterministic for a given `(text, font, mode)`
/// while a wrap is running; the wrapper probes the same substrings
/// repeatedly and assumes consistent answers.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec, mode: MeasureMode) -> f32;

    /// The font's natural line spacing in pixels.
    fn line_height(&mut self, font: &FontSpec) -> f32;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &mut T {
    fn measure(&mut self, text: &str, font: &FontSpec, mode: MeasureMode) -> f32 {
        (**self).measure(text, font, mode)
    }

    fn line_height(&mut self, font: &FontSpec) -> f32 {
        (**self).line_height(font)
    }
}

/// Monospace measurer: every grapheme advances by a fixed amount, wide
/// graphemes by twice that.
///
/// Display and typographic measurements are identical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Width of one narrow column in pixels.
    pub advance: f32,
    /// Natural line height in pixels.
    pub line_height: f32,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }

    /// Derive metrics from a font size: 0.6em advance, 1.2em line height.
    pub fn for_font(font: &FontSpec) -> Self {
        Self::new(font.size * 0.6, font.size * 1.2)
    }

    /// Number of columns `text` occupies.
    pub fn columns(text: &str) -> usize {
        text.graphemes(true)
            .map(|g| match g.chars().next() {
                Some(c) if is_wide_char(c) => 2,
                _ => 1,
            })
            .sum()
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&mut self, text: &str, _font: &FontSpec, _mode: MeasureMode) -> f32 {
        Self::columns(text) as f32 * self.advance
    }

    fn line_height(&mut self, _font: &FontSpec) -> f32 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_default() {
        let font = FontSpec::default();
        assert_eq!(font.family, "sans-serif");
        assert_eq!(font.size, 16.0);
        assert_eq!(font.weight, 400);
        assert!(!font.italic);
        assert!(font.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_family() {
        let font = FontSpec::new("   ", 12.0);
        assert!(matches!(
            font.validate(),
            Err(WrapError::InvalidArgument { name: "font", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_size() {
        for size in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let font = FontSpec::new("monospace", size);
            assert!(font.validate().is_err(), "size {size} should be rejected");
        }
    }

    #[test]
    fn test_fixed_advance_narrow() {
        let mut m = FixedAdvanceMeasurer::new(10.0, 20.0);
        let font = FontSpec::default();
        assert_eq!(m.measure("abc", &font, MeasureMode::Typographic), 30.0);
        assert_eq!(m.measure("", &font, MeasureMode::Display), 0.0);
        assert_eq!(m.line_height(&font), 20.0);
    }

    #[test]
    fn test_fixed_advance_wide_counts_double() {
        assert_eq!(FixedAdvanceMeasurer::columns("你好"), 4);
        assert_eq!(FixedAdvanceMeasurer::columns("a你"), 3);
        assert_eq!(FixedAdvanceMeasurer::columns("🚀🫠"), 4);
    }

    #[test]
    fn test_fixed_advance_counts_graphemes() {
        // "e" + combining acute accent is one grapheme.
        assert_eq!(FixedAdvanceMeasurer::columns("e\u{301}"), 1);
    }

    #[test]
    fn test_for_font_scales_with_size() {
        let m = FixedAdvanceMeasurer::for_font(&FontSpec::new("monospace", 20.0));
        assert!((m.advance - 12.0).abs() < 1e-5);
        assert!((m.line_height - 24.0).abs() < 1e-5);
    }

    #[test]
    fn test_measurer_through_mut_ref() {
        fn width_of<M: TextMeasurer>(mut measurer: M, text: &str) -> f32 {
            measurer.measure(text, &FontSpec::default(), MeasureMode::Display)
        }

        let mut inner = FixedAdvanceMeasurer::new(2.0, 4.0);
        assert_eq!(width_of(&mut inner, "ab"), 4.0);
        assert_eq!(width_of(inner, "abc"), 6.0);
    }

    #[test]
    fn test_font_serde_defaults() {
        let font: FontSpec = serde_json::from_str(r#"{"size": 24.0}"#).unwrap();
        assert_eq!(font.size, 24.0);
        assert_eq!(font.family, "sans-serif");
    }
}

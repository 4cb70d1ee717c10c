//! Size calculator — bounding box of wrapped text under a line-height policy.

use crate::font::{FontSpec, MeasureMode, TextMeasurer};
use crate::geometry::Size;
use crate::tokenizer::tokenize;
use crate::wrapper::{Line, LineWrapper, DEFAULT_WIDTH_CACHE_CAPACITY};
use crate::WrapError;

/// Line advance actually used: never less than the font's natural height,
/// so a tight `line_height` cannot clip glyphs.
pub fn effective_line_height<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    font: &FontSpec,
    line_height: f32,
) -> f32 {
    line_height.max(measurer.line_height(font))
}

/// Bounding size of already-wrapped lines.
///
/// Blank lines add height but no width.
pub fn measure_lines<M: TextMeasurer + ?Sized>(
    lines: &[Line],
    font: &FontSpec,
    line_height: f32,
    measurer: &mut M,
) -> Size {
    if lines.is_empty() {
        return Size::ZERO;
    }

    let increment = effective_line_height(measurer, font, line_height);
    let width = lines
        .iter()
        .filter_map(Line::as_str)
        .map(|text| measurer.measure(text, font, MeasureMode::Display))
        .fold(0.0f32, f32::max);

    Size {
        width,
        height: lines.len() as f32 * increment,
    }
}

/// Wrap `text` and return its bounding size.
///
/// Blank text is `{0, 0}` whatever the other arguments are; otherwise the
/// font and width are validated like [`wrapped_lines`](crate::wrapped_lines).
pub fn measure_with_line_height<M: TextMeasurer + ?Sized>(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    line_height: f32,
    measurer: &mut M,
) -> Result<Size, WrapError> {
    measure_wrapped(text, font, max_width, line_height, DEFAULT_WIDTH_CACHE_CAPACITY, measurer)
}

pub(crate) fn measure_wrapped<M: TextMeasurer + ?Sized>(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    line_height: f32,
    cache_capacity: usize,
    measurer: &mut M,
) -> Result<Size, WrapError> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Ok(Size::ZERO);
    }

    let lines = LineWrapper::new(font, max_width, &mut *measurer)?
        .with_cache_capacity(cache_capacity)
        .wrap(&tokens);
    Ok(measure_lines(&lines, font, line_height, measurer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedAdvanceMeasurer;

    const FONT_HEIGHT: f32 = 19.0;

    fn measurer() -> FixedAdvanceMeasurer {
        FixedAdvanceMeasurer::new(10.0, FONT_HEIGHT)
    }

    #[test]
    fn test_empty_is_zero() {
        let size = measure_with_line_height("", &FontSpec::default(), 42.0, 57.0, &mut measurer())
            .unwrap();
        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn test_empty_ignores_bad_arguments() {
        let bad_font = FontSpec::new("", -1.0);
        let size =
            measure_with_line_height("  \t ", &bad_font, -3.0, 0.0, &mut measurer()).unwrap();
        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn test_one_line_height_floor() {
        let font = FontSpec::default();
        for line_height in [FONT_HEIGHT - 1.0, FONT_HEIGHT, FONT_HEIGHT + 1.0, 1.0e6] {
            let size =
                measure_with_line_height("a", &font, f32::INFINITY, line_height, &mut measurer())
                    .unwrap();
            assert_eq!(size.height, line_height.max(FONT_HEIGHT), "line_height={line_height}");
            assert_eq!(size.width, 10.0);
        }
    }

    #[test]
    fn test_multi_line_size() {
        let size = measure_with_line_height(
            "the quick brown fox",
            &FontSpec::default(),
            100.0,
            30.0,
            &mut measurer(),
        )
        .unwrap();
        // "the quick" / "brown fox", both 90px.
        assert_eq!(size, Size { width: 90.0, height: 60.0 });
    }

    #[test]
    fn test_blank_lines_add_height_only() {
        let lines = vec![Line::from("abc"), Line::Blank, Line::from("a")];
        let size = measure_lines(&lines, &FontSpec::default(), 25.0, &mut measurer());
        assert_eq!(size, Size { width: 30.0, height: 75.0 });
    }

    #[test]
    fn test_invalid_font_rejected() {
        let font = FontSpec::new("mono", 0.0);
        let err = measure_with_line_height("abc", &font, 50.0, 20.0, &mut measurer()).unwrap_err();
        assert!(matches!(err, WrapError::InvalidArgument { .. }));
    }

    #[test]
    fn test_non_positive_width_rejected() {
        let err = measure_with_line_height("abc", &FontSpec::default(), 0.0, 20.0, &mut measurer())
            .unwrap_err();
        assert!(matches!(err, WrapError::OutOfRange { .. }));
    }

    #[test]
    fn test_effective_line_height() {
        let mut m = measurer();
        let font = FontSpec::default();
        assert_eq!(effective_line_height(&mut m, &font, 5.0), FONT_HEIGHT);
        assert_eq!(effective_line_height(&mut m, &font, 40.0), 40.0);
    }
}

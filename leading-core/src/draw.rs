//! Draw driver — feeds wrapped lines to a painter with a running vertical
//! offset.
//!
//! The first line is drawn at the layout origin. Every following line sits
//! `line_height` below the previous one; a blank line takes its slot
//! without a draw call.

use serde::{Deserialize, Serialize};

use crate::font::{FontSpec, MeasureMode, TextMeasurer};
use crate::geometry::{Point, Rect};
use crate::size::effective_line_height;
use crate::wrapper::{wrapped_lines, Line};
use crate::WrapError;

// ── Text alignment ──────────────────────────────────────────────────

/// Horizontal text alignment inside the layout rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Horizontal offset of a `line_width` line inside `box_width`.
    ///
    /// Alignment only applies to a finite box; lines wider than the box
    /// are never pushed left of its origin.
    pub fn offset(self, box_width: f32, line_width: f32) -> f32 {
        if !box_width.is_finite() {
            return 0.0;
        }
        let offset = match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => (box_width - line_width) / 2.0,
            TextAlign::Right => box_width - line_width,
        };
        offset.max(0.0)
    }
}

/// Paint used for text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// RGBA color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Brush {
    pub fn solid(color: [f32; 4]) -> Self {
        Self { color }
    }
}

/// Formatting applied by [`draw_wrapped_string`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawFormat {
    pub align: TextAlign,
    /// Skip lines starting at or below the bottom of the layout rectangle.
    pub clip: bool,
}

/// Host capability: draw one line of text with its top-left at `origin`.
pub trait LinePainter {
    fn draw_line(&mut self, text: &str, font: &FontSpec, brush: &Brush, origin: Point);
}

/// A drawing context that can both measure and paint, like a graphics
/// context handed out by a windowing toolkit.
pub trait TextSurface: TextMeasurer + LinePainter {}

impl<T: TextMeasurer + LinePainter + ?Sized> TextSurface for T {}

/// Wrap `text` to `max_width` and draw it line by line into `layout_rect`.
///
/// Returns the region covered by each drawn line: its display width and
/// the effective line height (never below the font's natural height).
#[allow(clippy::too_many_arguments)]
pub fn draw_wrapped_string<S: TextSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    font: &FontSpec,
    brush: &Brush,
    max_width: f32,
    line_height: f32,
    layout_rect: Rect,
    format: &DrawFormat,
) -> Result<Vec<Rect>, WrapError> {
    let lines = wrapped_lines(text, font, max_width, surface)?;
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let row_height = effective_line_height(surface, font, line_height);
    let mut regions = Vec::with_capacity(lines.len());
    let mut y = layout_rect.y;

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            y += line_height;
        }
        let Line::Content(text) = line else {
            continue;
        };
        if format.clip && y >= layout_rect.bottom() {
            log::debug!(
                "draw_wrapped_string: clipped {} of {} lines",
                lines.len() - i,
                lines.len()
            );
            break;
        }

        let width = surface.measure(text, font, MeasureMode::Display);
        let x = layout_rect.x + format.align.offset(layout_rect.width, width);
        let origin = Point::new(x, y);
        surface.draw_line(text, font, brush, origin);
        regions.push(Rect::new(x, y, width, row_height));
    }

    Ok(regions)
}

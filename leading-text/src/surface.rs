//! Raster surface — pairs a [`TextEngine`] with a [`Canvas`] so the
//! wrapping pipeline can measure and paint through one handle.

use leading_core::{Brush, FontSpec, LinePainter, MeasureMode, Point, TextMeasurer};

use crate::canvas::Canvas;
use crate::engine::TextEngine;

/// A drawing context over a CPU canvas.
pub struct RasterSurface<'a> {
    engine: &'a mut TextEngine,
    canvas: &'a mut Canvas,
    /// Glyph bitmaps composited so far.
    glyphs_drawn: usize,
}

impl<'a> RasterSurface<'a> {
    pub fn new(engine: &'a mut TextEngine, canvas: &'a mut Canvas) -> Self {
        Self {
            engine,
            canvas,
            glyphs_drawn: 0,
        }
    }

    pub fn glyphs_drawn(&self) -> usize {
        self.glyphs_drawn
    }

    pub fn canvas(&self) -> &Canvas {
        &*self.canvas
    }
}

impl TextMeasurer for RasterSurface<'_> {
    fn measure(&mut self, text: &str, font: &FontSpec, mode: MeasureMode) -> f32 {
        self.engine.measure(text, font, mode)
    }

    fn line_height(&mut self, font: &FontSpec) -> f32 {
        self.engine.line_height(font)
    }
}

impl LinePainter for RasterSurface<'_> {
    fn draw_line(&mut self, text: &str, font: &FontSpec, brush: &Brush, origin: Point) {
        self.glyphs_drawn += self
            .engine
            .draw_text(self.canvas, text, font, brush.color, origin);
    }
}

//! Text engine — measures and rasterizes lines using `cosmic-text`.
//!
//! The engine manages a `FontSystem` (font discovery + shaping) and a
//! `SwashCache` (glyph rasterization). It is the host-side
//! [`TextMeasurer`] for `leading-core`: every width the wrapper asks for is
//! the advance extent of a shaped, unwrapped cosmic-text buffer.
//!
//! ## Natural line height
//!
//! The font's natural line spacing comes from the matched face's
//! ascent + descent + leading, scaled to the requested size. Per-em ratios
//! are cached per face selection in an LRU.

use std::num::NonZeroUsize;

use cosmic_text::fontdb;
use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Stretch, Style, SwashCache,
    SwashContent, Weight,
};
use leading_core::{FontSpec, MeasureMode, Point, TextMeasurer};
use lru::LruCache;

use crate::canvas::Canvas;

/// Line spacing assumed when no face can be matched, in ems.
pub const FALLBACK_LINE_SPACING: f32 = 1.2;

const SPACING_CACHE_CAPACITY: usize = 64;

/// Face selection that determines line spacing (size-independent).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    weight: u16,
    italic: bool,
}

impl FaceKey {
    fn of(font: &FontSpec) -> Self {
        Self {
            family: font.family.clone(),
            weight: font.weight,
            italic: font.italic,
        }
    }
}

/// Core text engine wrapping cosmic-text.
pub struct TextEngine {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    /// Line spacing in ems per face selection.
    spacing: LruCache<FaceKey, f32>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Create a new text engine with system font discovery.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    /// Create an engine over an existing font system (e.g. one with
    /// bundled fonts loaded).
    pub fn with_font_system(font_system: FontSystem) -> Self {
        let faces = font_system.db().faces().count();
        if faces == 0 {
            log::warn!("TextEngine: no font faces available, widths will be zero");
        } else {
            log::info!("TextEngine: {faces} font faces available");
        }

        Self {
            font_system,
            swash_cache: SwashCache::new(),
            spacing: LruCache::new(
                NonZeroUsize::new(SPACING_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    /// Whether any font face was discovered.
    pub fn has_fonts(&self) -> bool {
        self.font_system.db().faces().next().is_some()
    }

    /// Shape `text` as a single unwrapped line.
    fn shape(&mut self, text: &str, font: &FontSpec) -> Buffer {
        let metrics = Metrics::new(font.size, font.size * FALLBACK_LINE_SPACING);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs_for(font), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Advance extent of `text` in pixels, unrounded.
    pub fn advance_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let buffer = self.shape(text, font);
        buffer
            .layout_runs()
            .map(|run| run.glyphs.iter().map(|g| g.x + g.w).fold(0.0f32, f32::max))
            .fold(0.0f32, f32::max)
    }

    /// Natural line spacing of `font` in pixels.
    pub fn natural_line_height(&mut self, font: &FontSpec) -> f32 {
        let key = FaceKey::of(font);
        if let Some(&ems) = self.spacing.get(&key) {
            return ems * font.size;
        }

        let ems = self.face_spacing(font).unwrap_or_else(|| {
            log::warn!(
                "TextEngine: no face matches '{}', assuming {FALLBACK_LINE_SPACING}em line spacing",
                font.family
            );
            FALLBACK_LINE_SPACING
        });
        self.spacing.put(key, ems);
        ems * font.size
    }

    /// Ascent + descent + leading of the best matching face, in ems.
    fn face_spacing(&mut self, font: &FontSpec) -> Option<f32> {
        let families = [family_of(&font.family)];
        let query = fontdb::Query {
            families: &families,
            weight: Weight(font.weight),
            stretch: Stretch::Normal,
            style: style_of(font),
        };
        let id = self.font_system.db().query(&query)?;
        let face = self.font_system.get_font(id)?;
        let metrics = face.as_swash().metrics(&[]);
        if metrics.units_per_em == 0 {
            return None;
        }
        Some((metrics.ascent + metrics.descent + metrics.leading) / metrics.units_per_em as f32)
    }

    /// Rasterize `text` with its line box's top-left at `origin`.
    ///
    /// Returns the number of glyph bitmaps composited.
    pub fn draw_text(
        &mut self,
        canvas: &mut Canvas,
        text: &str,
        font: &FontSpec,
        color: [f32; 4],
        origin: Point,
    ) -> usize {
        let buffer = self.shape(text, font);
        let mut drawn = 0;

        // Iterate layout runs → glyphs.
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((origin.x, origin.y), 1.0);

                let image = self.swash_cache.get_image(&mut self.font_system, physical.cache_key);

                let image = match image {
                    Some(img) => img,
                    None => continue, // whitespace or missing glyph
                };

                let width = image.placement.width;
                let height = image.placement.height;
                if width == 0 || height == 0 {
                    continue;
                }

                let x = physical.x + image.placement.left;
                let y = run.line_y as i32 + physical.y - image.placement.top;

                match image.content {
                    SwashContent::Mask => {
                        canvas.blend_mask(x, y, width, height, &image.data, color);
                    }
                    SwashContent::SubpixelMask => {
                        let coverage: Vec<u8> = image
                            .data
                            .chunks_exact(4)
                            .map(|p| ((p[0] as u16 + p[1] as u16 + p[2] as u16) / 3) as u8)
                            .collect();
                        canvas.blend_mask(x, y, width, height, &coverage, color);
                    }
                    SwashContent::Color => {
                        canvas.blend_rgba(x, y, width, height, &image.data);
                    }
                }
                drawn += 1;
            }
        }

        log::trace!("TextEngine: drew {drawn} glyphs for {} bytes at {origin:?}", text.len());
        drawn
    }
}

impl TextMeasurer for TextEngine {
    fn measure(&mut self, text: &str, font: &FontSpec, mode: MeasureMode) -> f32 {
        let width = self.advance_width(text, font);
        match mode {
            MeasureMode::Typographic => width,
            // Display widths cover every touched pixel column.
            MeasureMode::Display => width.ceil(),
        }
    }

    fn line_height(&mut self, font: &FontSpec) -> f32 {
        self.natural_line_height(font)
    }
}

// ── Font selection ──────────────────────────────────────────────────

/// Map a CSS-like family chain onto a cosmic-text family.
///
/// Only the first entry of the chain is used; cosmic-text handles fallback
/// for missing glyphs natively.
fn family_of(family: &str) -> Family<'_> {
    let first = family
        .split(',')
        .next()
        .unwrap_or(family)
        .trim()
        .trim_matches('"')
        .trim_matches('\'');
    match first.to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(first),
    }
}

fn style_of(font: &FontSpec) -> Style {
    if font.italic {
        Style::Italic
    } else {
        Style::Normal
    }
}

fn attrs_for(font: &FontSpec) -> Attrs<'_> {
    Attrs::new()
        .family(family_of(&font.family))
        .weight(Weight(font.weight))
        .style(style_of(font))
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine with system fonts, or `None` on hosts without any.
    fn engine() -> Option<TextEngine> {
        let engine = TextEngine::new();
        engine.has_fonts().then_some(engine)
    }

    #[test]
    fn test_family_of_generic() {
        assert_eq!(family_of("sans-serif"), Family::SansSerif);
        assert_eq!(family_of("Serif"), Family::Serif);
        assert_eq!(family_of("monospace, serif"), Family::Monospace);
    }

    #[test]
    fn test_family_of_css_chain() {
        assert_eq!(family_of("\"Times New Roman\", serif"), Family::Name("Times New Roman"));
        assert_eq!(family_of("'Fira Code'"), Family::Name("Fira Code"));
    }

    #[test]
    fn test_style_of() {
        let mut font = FontSpec::default();
        assert_eq!(style_of(&font), Style::Normal);
        font.italic = true;
        assert_eq!(style_of(&font), Style::Italic);
    }

    #[test]
    fn test_empty_text_has_zero_width() {
        let mut engine = TextEngine::with_font_system(FontSystem::new());
        assert_eq!(engine.advance_width("", &FontSpec::default()), 0.0);
    }

    #[test]
    fn test_measure_hello() {
        let Some(mut engine) = engine() else { return };
        let font = FontSpec::new("sans-serif", 24.0);
        let width = engine.measure("Hello, Leading!", &font, MeasureMode::Typographic);
        assert!(width > 0.0);
    }

    #[test]
    fn test_longer_text_is_wider() {
        let Some(mut engine) = engine() else { return };
        let font = FontSpec::default();
        let short = engine.measure("Hi", &font, MeasureMode::Typographic);
        let long = engine.measure("Hi there, world", &font, MeasureMode::Typographic);
        assert!(long > short, "{long} should exceed {short}");
    }

    #[test]
    fn test_bigger_font_is_wider() {
        let Some(mut engine) = engine() else { return };
        let small_font = FontSpec::new("sans-serif", 12.0);
        let large_font = FontSpec::new("sans-serif", 48.0);
        let small = engine.measure("A", &small_font, MeasureMode::Typographic);
        let large = engine.measure("A", &large_font, MeasureMode::Typographic);
        assert!(large > small);
    }

    #[test]
    fn test_display_mode_rounds_up() {
        let Some(mut engine) = engine() else { return };
        let font = FontSpec::new("sans-serif", 13.0);
        let exact = engine.measure("wrap me", &font, MeasureMode::Typographic);
        let display = engine.measure("wrap me", &font, MeasureMode::Display);
        assert_eq!(display, exact.ceil());
        assert!(display >= exact);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let Some(mut engine) = engine() else { return };
        let font = FontSpec::default();
        let a = engine.measure("consistent", &font, MeasureMode::Typographic);
        let b = engine.measure("consistent", &font, MeasureMode::Typographic);
        assert_eq!(a, b);
    }

    #[test]
    fn test_natural_line_height_scales() {
        let Some(mut engine) = engine() else { return };
        let small = engine.line_height(&FontSpec::new("sans-serif", 10.0));
        let large = engine.line_height(&FontSpec::new("sans-serif", 20.0));
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 1e-3, "{large} vs {small}");
    }

    #[test]
    fn test_unknown_family_still_has_line_height() {
        let mut engine = TextEngine::with_font_system(FontSystem::new());
        let height = engine.line_height(&FontSpec::new("ZZZNeverExists", 10.0));
        assert!(height > 0.0);
    }

    #[test]
    fn test_draw_text_inks_canvas() {
        let Some(mut engine) = engine() else { return };
        let mut canvas = Canvas::new(200, 60);
        let drawn = engine.draw_text(
            &mut canvas,
            "Ink",
            &FontSpec::new("sans-serif", 32.0),
            [0.0, 0.0, 0.0, 1.0],
            Point::new(4.0, 4.0),
        );
        assert!(drawn > 0);
        assert!(canvas.inked_pixels() > 0);
    }

    #[test]
    fn test_draw_whitespace_inks_nothing() {
        let Some(mut engine) = engine() else { return };
        let mut canvas = Canvas::new(64, 32);
        engine.draw_text(
            &mut canvas,
            "   ",
            &FontSpec::default(),
            [0.0, 0.0, 0.0, 1.0],
            Point::default(),
        );
        assert_eq!(canvas.inked_pixels(), 0);
    }
}

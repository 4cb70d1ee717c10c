//! Leading CLI — wraps text to a pixel width from the command line.
//!
//! Measures with system fonts through `leading-text` by default, or with a
//! fixed per-character advance under `--mono`. Prints one wrapped line per
//! output line followed by the bounding size.

mod args;

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use clap::Parser;
use leading_core::{
    measure_lines, Brush, FixedAdvanceMeasurer, Line, Rect, Size, TextMeasurer, WrapConfig,
    WrapError,
};
use leading_text::{Canvas, RasterSurface, TextEngine};
use log::info;

use args::Cli;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.wrap_config()?;

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let text = match &cli.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if cli.mono {
        if cli.render.is_some() {
            return Err("--render needs system fonts and cannot be combined with --mono".into());
        }
        let mut measurer = FixedAdvanceMeasurer::for_font(&config.font);
        report(&config, &text, &mut measurer)?;
        return Ok(());
    }

    let mut engine = TextEngine::new();
    let size = report(&config, &text, &mut engine)?;

    if let Some(path) = &cli.render {
        render(&config, &text, size, &mut engine, path)?;
    }

    Ok(())
}

/// Print the wrapped lines and their bounding size.
fn report<M: TextMeasurer + ?Sized>(
    config: &WrapConfig,
    text: &str,
    measurer: &mut M,
) -> Result<Size, Box<dyn Error>> {
    let (lines, size) = layout(config, text, measurer)?;
    for line in &lines {
        match line {
            Line::Content(content) => println!("{content}"),
            Line::Blank => println!(),
        }
    }

    info!("Wrapped into {} lines", lines.len());
    println!("-- {} x {}", size.width, size.height);
    Ok(size)
}

/// Wrap once and size the lines that came out.
fn layout<M: TextMeasurer + ?Sized>(
    config: &WrapConfig,
    text: &str,
    measurer: &mut M,
) -> Result<(Vec<Line>, Size), WrapError> {
    let lines = config.wrap(text, measurer)?;
    let size = measure_lines(&lines, &config.font, config.line_height, measurer);
    Ok((lines, size))
}

/// Rasterize onto a white canvas sized to the text and dump raw RGBA8.
fn render(
    config: &WrapConfig,
    text: &str,
    size: Size,
    engine: &mut TextEngine,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let width = (size.width.ceil() as u32).max(1);
    let height = (size.height.ceil() as u32).max(1);

    let mut canvas = Canvas::new(width, height);
    canvas.clear([1.0, 1.0, 1.0, 1.0]);

    let mut surface = RasterSurface::new(engine, &mut canvas);
    let layout_rect = Rect::new(0.0, 0.0, width as f32, height as f32);
    let regions = config.draw(&mut surface, text, &Brush::default(), layout_rect)?;
    let glyphs = surface.glyphs_drawn();

    fs::write(path, &canvas.data)?;
    info!(
        "Rendered {} lines ({glyphs} glyphs) into {width}x{height} RGBA8 at {}",
        regions.len(),
        path.display()
    );
    println!("-- wrote {width}x{height} RGBA8 to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leading_core::{FontSpec, MeasureMode};

    /// Counts typographic (wrapping) measurements.
    struct CountingMeasurer {
        inner: FixedAdvanceMeasurer,
        typographic: usize,
    }

    impl TextMeasurer for CountingMeasurer {
        fn measure(&mut self, text: &str, font: &FontSpec, mode: MeasureMode) -> f32 {
            if mode == MeasureMode::Typographic {
                self.typographic += 1;
            }
            self.inner.measure(text, font, mode)
        }

        fn line_height(&mut self, font: &FontSpec) -> f32 {
            self.inner.line_height(font)
        }
    }

    fn mono_config(max_width: Option<f32>) -> WrapConfig {
        WrapConfig {
            font: FontSpec::new("monospace", 10.0),
            max_width,
            line_height: 15.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_matches_config_measure() {
        let config = mono_config(Some(60.0));
        let text = "alpha beta gamma\n\ndelta";
        let mut m = FixedAdvanceMeasurer::for_font(&config.font);

        let (lines, size) = layout(&config, text, &mut m).unwrap();
        assert_eq!(lines, config.wrap(text, &mut m).unwrap());
        assert_eq!(size, config.measure(text, &mut m).unwrap());
    }

    #[test]
    fn test_layout_wraps_once() {
        let config = mono_config(None);
        let mut m = CountingMeasurer {
            inner: FixedAdvanceMeasurer::for_font(&config.font),
            typographic: 0,
        };

        let (lines, _) = layout(&config, "alpha beta gamma", &mut m).unwrap();
        assert_eq!(lines, vec![Line::from("alpha beta gamma")]);
        // "alpha", " ", "beta", "gamma".
        assert_eq!(m.typographic, 4);
    }

    #[test]
    fn test_layout_blank_text() {
        let config = mono_config(None);
        let mut m = FixedAdvanceMeasurer::for_font(&config.font);
        let (lines, size) = layout(&config, "  \n ", &mut m).unwrap();
        assert!(lines.is_empty());
        assert_eq!(size, Size::ZERO);
    }
}

//! Wrap configuration — font, width budget and line-height policy bundled
//! into one serde-loadable value.
//!
//! ```json
//! {
//!   "font": { "family": "monospace", "size": 14.0 },
//!   "max_width": 320.0,
//!   "line_height": 18.0,
//!   "align": "Center"
//! }
//! ```
//!
//! Every field is optional; an absent `max_width` means unbounded.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draw::{draw_wrapped_string, Brush, DrawFormat, TextAlign, TextSurface};
use crate::error::{check_max_width, ConfigError, WrapError};
use crate::font::{FontSpec, TextMeasurer};
use crate::geometry::{Rect, Size};
use crate::size::measure_wrapped;
use crate::tokenizer::tokenize;
use crate::wrapper::{Line, LineWrapper, DEFAULT_WIDTH_CACHE_CAPACITY};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    pub font: FontSpec,
    /// Width budget in pixels (`None` = unbounded).
    pub max_width: Option<f32>,
    /// Requested line advance in pixels; floored at the font's natural height.
    pub line_height: f32,
    /// Substring widths memoized per wrap call.
    pub width_cache_capacity: usize,
    pub align: TextAlign,
    /// Skip lines that start below the layout rectangle when drawing.
    pub clip: bool,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            max_width: None,
            line_height: 20.0,
            width_cache_capacity: DEFAULT_WIDTH_CACHE_CAPACITY,
            align: TextAlign::Left,
            clip: false,
        }
    }
}

impl WrapConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded wrap config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WrapError> {
        self.font.validate()?;
        check_max_width(self.max_width())
    }

    /// The width budget, `f32::INFINITY` when unbounded.
    pub fn max_width(&self) -> f32 {
        self.max_width.unwrap_or(f32::INFINITY)
    }

    pub fn format(&self) -> DrawFormat {
        DrawFormat {
            align: self.align,
            clip: self.clip,
        }
    }

    /// Wrap `text` with this configuration.
    pub fn wrap<M: TextMeasurer + ?Sized>(
        &self,
        text: &str,
        measurer: &mut M,
    ) -> Result<Vec<Line>, WrapError> {
        let wrapper = LineWrapper::new(&self.font, self.max_width(), measurer)?
            .with_cache_capacity(self.width_cache_capacity);
        Ok(wrapper.wrap(&tokenize(text)))
    }

    /// Bounding size of `text` with this configuration.
    pub fn measure<M: TextMeasurer + ?Sized>(
        &self,
        text: &str,
        measurer: &mut M,
    ) -> Result<Size, WrapError> {
        measure_wrapped(
            text,
            &self.font,
            self.max_width(),
            self.line_height,
            self.width_cache_capacity,
            measurer,
        )
    }

    /// Draw `text` into `layout_rect` with this configuration.
    pub fn draw<S: TextSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        brush: &Brush,
        layout_rect: Rect,
    ) -> Result<Vec<Rect>, WrapError> {
        draw_wrapped_string(
            surface,
            text,
            &self.font,
            brush,
            self.max_width(),
            self.line_height,
            layout_rect,
            &self.format(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedAdvanceMeasurer;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WrapConfig::default();
        assert_eq!(config.font, FontSpec::default());
        assert_eq!(config.max_width(), f32::INFINITY);
        assert_eq!(config.line_height, 20.0);
        assert_eq!(config.width_cache_capacity, DEFAULT_WIDTH_CACHE_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = WrapConfig::from_json_str(
            r#"{
                "font": { "family": "monospace", "size": 14.0 },
                "max_width": 320.0,
                "align": "Center"
            }"#,
        )
        .unwrap();
        assert_eq!(config.font.family, "monospace");
        assert_eq!(config.font.size, 14.0);
        assert_eq!(config.font.weight, 400);
        assert_eq!(config.max_width(), 320.0);
        assert_eq!(config.align, TextAlign::Center);
        assert_eq!(config.line_height, 20.0);
    }

    #[test]
    fn test_from_json_rejects_bad_width() {
        let err = WrapConfig::from_json_str(r#"{ "max_width": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(WrapError::OutOfRange { .. })));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = WrapConfig::from_json_str("{ max_width: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "line_height": 32.0, "clip": true }}"#).unwrap();
        let config = WrapConfig::load(file.path()).unwrap();
        assert_eq!(config.line_height, 32.0);
        assert!(config.clip);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WrapConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_wrap_and_measure() {
        let config = WrapConfig {
            max_width: Some(50.0),
            line_height: 10.0,
            ..Default::default()
        };
        let mut m = FixedAdvanceMeasurer::new(10.0, 12.0);
        let lines = config.wrap("alpha beta", &mut m).unwrap();
        assert_eq!(lines, vec![Line::from("alpha"), Line::from("beta")]);

        let size = config.measure("alpha beta", &mut m).unwrap();
        assert_eq!(size, Size { width: 50.0, height: 24.0 });
    }

    #[test]
    fn test_roundtrip_through_json() {
        let config = WrapConfig {
            max_width: Some(123.0),
            align: TextAlign::Right,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(WrapConfig::from_json_str(&json).unwrap(), config);
    }
}

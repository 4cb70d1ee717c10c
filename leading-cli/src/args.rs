//! Command-line arguments and how they overlay a [`WrapConfig`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use leading_core::{ConfigError, TextAlign, WrapConfig};

/// Wrap text to a pixel width and report the resulting lines and size
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Text to wrap (read from stdin when omitted)
    pub text: Option<String>,
    /// JSON wrap config; flags below override its fields
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Width budget in pixels (unbounded when omitted)
    #[arg(long, short = 'w')]
    pub max_width: Option<f32>,
    /// Requested line advance in pixels
    #[arg(long)]
    pub line_height: Option<f32>,
    /// Font family or CSS-like family list
    #[arg(long)]
    pub font_family: Option<String>,
    /// Font size in pixels
    #[arg(long)]
    pub font_size: Option<f32>,
    /// Horizontal alignment used when rendering
    #[arg(long, value_enum)]
    pub align: Option<Align>,
    /// Measure with a fixed per-character advance instead of system fonts
    #[arg(long)]
    pub mono: bool,
    /// Render the wrapped text to a raw RGBA8 file
    #[arg(long, value_name = "PATH")]
    pub render: Option<PathBuf>,
    /// Print the effective config as JSON and exit
    #[arg(long)]
    pub dump_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl From<Align> for TextAlign {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => TextAlign::Left,
            Align::Center => TextAlign::Center,
            Align::Right => TextAlign::Right,
        }
    }
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    pub fn wrap_config(&self) -> Result<WrapConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => WrapConfig::load(path)?,
            None => WrapConfig::default(),
        };

        if let Some(max_width) = self.max_width {
            config.max_width = Some(max_width);
        }
        if let Some(line_height) = self.line_height {
            config.line_height = line_height;
        }
        if let Some(family) = &self.font_family {
            config.font.family = family.clone();
        }
        if let Some(size) = self.font_size {
            config.font.size = size;
        }
        if let Some(align) = self.align {
            config.align = align.into();
        }

        config.validate()?;
        Ok(config)
    }
}

//! # leading-text
//!
//! `cosmic-text` backend for `leading-core`: real font measurement and a
//! CPU rasterizer so wrapped text can be drawn without a GPU.
//!
//! ## Architecture
//!
//! ```text
//! TextEngine (cosmic-text FontSystem + SwashCache)
//!     │  impl TextMeasurer
//!     ▼
//! RasterSurface ──► draw_line ──► glyph bitmaps ──► Canvas (RGBA8)
//! ```
//!
//! - **`engine`** — Shaping, width measurement, natural line height, glyph rasterization.
//! - **`canvas`** — RGBA8 pixel buffer with source-over compositing.
//! - **`surface`** — Measurer + painter pair accepted by `draw_wrapped_string`.

pub mod canvas;
pub mod engine;
pub mod surface;

// Re-exports for ergonomic use.
pub use canvas::Canvas;
pub use engine::{TextEngine, FALLBACK_LINE_SPACING};
pub use surface::RasterSurface;

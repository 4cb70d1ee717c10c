//! # leading-core
//!
//! Greedy line wrapping against a pluggable width measurer, plus the
//! line-height policy used to size and draw the result.
//!
//! ## Architecture
//!
//! ```text
//! text ──► tokenize ──► LineWrapper ──► Vec<Line>
//!                           │              │
//!                      TextMeasurer        ├──► measure_lines ──► Size
//!                      (host backend)      └──► draw_wrapped_string ──► LinePainter
//! ```
//!
//! - **`tokenizer`** — words, whitespace runs, line breaks, wide characters.
//! - **`wrapper`** — greedy fill with oversized-token splitting.
//! - **`size`** — bounding box with a `max(line_height, font height)` floor.
//! - **`draw`** — per-line draw calls with cumulative vertical offset.
//! - **`config`** — serde-loadable bundle of the above parameters.

pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod geometry;
pub mod size;
pub mod tokenizer;
pub mod wrapper;

// Re-exports for ergonomic use.
pub use config::WrapConfig;
pub use draw::{draw_wrapped_string, Brush, DrawFormat, LinePainter, TextAlign, TextSurface};
pub use error::{ConfigError, WrapError};
pub use font::{FixedAdvanceMeasurer, FontSpec, MeasureMode, TextMeasurer};
pub use geometry::{Point, Rect, Size};
pub use size::{effective_line_height, measure_lines, measure_with_line_height};
pub use tokenizer::{is_wide_char, tokenize, Token, TokenKind};
pub use wrapper::{wrap, wrapped_lines, Line, LineWrapper, DEFAULT_WIDTH_CACHE_CAPACITY};

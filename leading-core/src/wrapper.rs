//! Line wrapper — greedy fill of tokens into width-bounded lines.
//!
//! Tokens are appended to the current line while the accumulated
//! typographic width stays within `max_width`. A word that does not fit
//! starts a new line; a wide character is packed onto the line first and
//! the overflowing line is then cut back. Anything that cannot fit on a line
//! of its own goes through the split procedure, which searches grapheme
//! boundaries for the longest prefix that fits.
//!
//! ```text
//! tokens ──► LineWrapper ──► [Line::Content, Line::Blank, ...]
//!                 │
//!            width cache (LRU, per wrap call)
//!                 │
//!                 ▼
//!            TextMeasurer (host)
//! ```

use std::fmt;
use std::mem;
use std::num::NonZeroUsize;

use lru::LruCache;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{check_max_width, WrapError};
use crate::font::{FontSpec, MeasureMode, TextMeasurer};
use crate::tokenizer::{tokenize, Token, TokenKind};

/// Substring widths remembered during one wrap call.
pub const DEFAULT_WIDTH_CACHE_CAPACITY: usize = 1024;

/// Longest substring, in bytes, whose width is memoized.
const MAX_CACHED_KEY_LEN: usize = 256;

/// One line of wrapped output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Line {
    /// Text to draw.
    Content(String),
    /// Empty line from consecutive explicit breaks. Never measured or
    /// drawn, but still takes one line-height increment.
    Blank,
}

impl Line {
    /// The line's text, or `None` for a blank line.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Line::Content(text) => Some(text),
            Line::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Blank)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(""))
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::Content(text.to_owned())
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::Content(text)
    }
}

/// Greedy line wrapper bound to one font, width and measurer.
///
/// A wrapper is single-use: [`LineWrapper::wrap`] consumes it, so the
/// width cache never outlives the call that filled it.
pub struct LineWrapper<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a mut M,
    font: &'a FontSpec,
    max_width: f32,

    /// Typographic widths keyed by substring.
    widths: LruCache<String, f32>,
    space_width: Option<f32>,

    lines: Vec<Line>,
    current: String,
    current_width: f32,
    /// Whitespace separated the last content token from the next one.
    pending_space: bool,
}

impl<'a, M: TextMeasurer + ?Sized> LineWrapper<'a, M> {
    /// Validate the font and width and build a wrapper.
    ///
    /// Pass `f32::INFINITY` for an unbounded width.
    pub fn new(font: &'a FontSpec, max_width: f32, measurer: &'a mut M) -> Result<Self, WrapError> {
        font.validate()?;
        check_max_width(max_width)?;

        Ok(Self {
            measurer,
            font,
            max_width,
            widths: LruCache::new(cache_capacity(DEFAULT_WIDTH_CACHE_CAPACITY)),
            space_width: None,
            lines: Vec::new(),
            current: String::new(),
            current_width: 0.0,
            pending_space: false,
        })
    }

    /// Bound the number of memoized substring widths.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.widths = LruCache::new(cache_capacity(capacity));
        self
    }

    /// Wrap `tokens` into lines.
    pub fn wrap(mut self, tokens: &[Token<'_>]) -> Vec<Line> {
        if !tokens.iter().any(Token::is_content) {
            return Vec::new();
        }

        for token in tokens {
            match token.kind {
                TokenKind::Whitespace => {
                    if !self.current.is_empty() {
                        self.pending_space = true;
                    }
                }
                TokenKind::LineBreak => self.break_line(),
                TokenKind::Word | TokenKind::WideChar => self.push_content(token),
            }
        }

        if !self.current.is_empty() {
            self.close_line();
        }

        log::trace!(
            "LineWrapper: {} tokens -> {} lines (max_width={}, {} cached widths)",
            tokens.len(),
            self.lines.len(),
            self.max_width,
            self.widths.len(),
        );
        self.lines
    }

    // ---------------------------------------------------------------
    // Fill
    // ---------------------------------------------------------------

    fn push_content(&mut self, token: &Token<'_>) {
        let width = self.width_of(token.text);

        if self.current.is_empty() {
            self.pending_space = false;
            self.start_line(token.text, width);
            return;
        }

        let (separator, separator_width) = if mem::take(&mut self.pending_space) {
            (" ", self.space_width())
        } else {
            ("", 0.0)
        };

        if self.current_width + separator_width + width <= self.max_width {
            self.current.push_str(separator);
            self.current.push_str(token.text);
            self.current_width += separator_width + width;
            return;
        }

        match token.kind {
            TokenKind::WideChar => {
                // Pack first, then cut the overflowing line back.
                self.current.push_str(separator);
                self.current.push_str(token.text);
                let content = mem::take(&mut self.current);
                self.split_overflow(&content);
            }
            _ => {
                self.close_line();
                self.start_line(token.text, width);
            }
        }
    }

    fn start_line(&mut self, text: &str, width: f32) {
        if width <= self.max_width {
            self.current.push_str(text);
            self.current_width = width;
        } else {
            self.split_overflow(text);
        }
    }

    /// Explicit break: close the current line, or emit a blank one.
    fn break_line(&mut self) {
        if self.current.is_empty() {
            self.lines.push(Line::Blank);
        } else {
            self.close_line();
        }
        self.pending_space = false;
    }

    fn close_line(&mut self) {
        let text = mem::take(&mut self.current);
        self.lines.push(Line::Content(text));
        self.current_width = 0.0;
        self.pending_space = false;
    }

    // ---------------------------------------------------------------
    // Split procedure
    // ---------------------------------------------------------------

    /// Cut `text` into fitting lines. Whatever is left (a fitting tail, or
    /// a single grapheme wider than the budget) becomes the current line.
    ///
    /// Grapheme bounds are computed once per run and every cut is searched
    /// forward from the previous one, so a run costs measurements in
    /// proportion to the lines it yields, not to its remaining length.
    fn split_overflow(&mut self, text: &str) {
        let bounds: Vec<(usize, usize)> = text
            .grapheme_indices(true)
            .map(|(ix, g)| (ix, ix + g.len()))
            .collect();
        let mut first = 0;
        let mut cuts = 0;

        loop {
            // Whitespace at a cut is consumed by the break.
            while bounds
                .get(first)
                .is_some_and(|&(a, b)| text[a..b].trim().is_empty())
            {
                first += 1;
            }
            let Some(&(start, _)) = bounds.get(first) else {
                self.current.clear();
                self.current_width = 0.0;
                break;
            };

            let (last, width) = self.longest_fitting_run(text, &bounds, first);
            if last + 1 == bounds.len() {
                let width = match width {
                    Some(width) => width,
                    None => self.measure_run(&text[start..]),
                };
                self.current = text[start..].to_owned();
                self.current_width = width;
                break;
            }

            let head = text[start..bounds[last].1].trim_end();
            self.lines.push(Line::Content(head.to_owned()));
            cuts += 1;
            first = last + 1;
        }

        log::debug!(
            "LineWrapper: split {}-grapheme run into {} lines (max_width={:.1}px)",
            bounds.len(),
            cuts + usize::from(!self.current.is_empty()),
            self.max_width,
        );
    }

    /// Index of the last grapheme of the longest run starting at `first`
    /// that fits, never shorter than one grapheme, plus the run's width
    /// when it was measured on the way.
    ///
    /// The run length doubles until it overflows or reaches the end, then
    /// the boundary is bisected between the last fit and the first overflow.
    fn longest_fitting_run(
        &mut self,
        text: &str,
        bounds: &[(usize, usize)],
        first: usize,
    ) -> (usize, Option<f32>) {
        let start = bounds[first].0;
        let end_ix = bounds.len() - 1;
        // `lo` fits (or is the one-grapheme floor), `hi` does not.
        let mut lo = first;
        let mut lo_width = None;
        let mut hi = None;
        let mut step = 1;

        while lo < end_ix {
            let probe = (lo + step).min(end_ix);
            let width = self.measure_run(&text[start..bounds[probe].1]);
            if width <= self.max_width {
                lo = probe;
                lo_width = Some(width);
                step *= 2;
            } else {
                hi = Some(probe);
                break;
            }
        }

        if let Some(mut hi) = hi {
            while lo + 1 < hi {
                let mid = lo + (hi - lo) / 2;
                let width = self.measure_run(&text[start..bounds[mid].1]);
                if width <= self.max_width {
                    lo = mid;
                    lo_width = Some(width);
                } else {
                    hi = mid;
                }
            }
        }

        (lo, lo_width)
    }

    // ---------------------------------------------------------------
    // Measurement
    // ---------------------------------------------------------------

    fn width_of(&mut self, text: &str) -> f32 {
        if text.len() > MAX_CACHED_KEY_LEN {
            return self.measure_run(text);
        }
        if let Some(&width) = self.widths.get(text) {
            return width;
        }
        let width = self.measure_run(text);
        self.widths.put(text.to_owned(), width);
        width
    }

    /// Uncached typographic width.
    fn measure_run(&mut self, text: &str) -> f32 {
        self.measurer.measure(text, self.font, MeasureMode::Typographic)
    }

    fn space_width(&mut self) -> f32 {
        match self.space_width {
            Some(width) => width,
            None => {
                let width = self.width_of(" ");
                self.space_width = Some(width);
                width
            }
        }
    }
}

fn cache_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

/// Wrap pre-tokenized text.
///
/// The font and width are checked before any token is read.
pub fn wrap<M: TextMeasurer + ?Sized>(
    tokens: &[Token<'_>],
    font: &FontSpec,
    max_width: f32,
    measurer: &mut M,
) -> Result<Vec<Line>, WrapError> {
    Ok(LineWrapper::new(font, max_width, measurer)?.wrap(tokens))
}

/// Tokenize and wrap `text`. Pass `f32::INFINITY` for an unbounded width.
pub fn wrapped_lines<M: TextMeasurer + ?Sized>(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    measurer: &mut M,
) -> Result<Vec<Line>, WrapError> {
    let wrapper = LineWrapper::new(font, max_width, measurer)?;
    Ok(wrapper.wrap(&tokenize(text)))
}

// ===================================================================
// Tests
// ===================================================================

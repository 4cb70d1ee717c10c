//! Tokenizer — splits text into the atomic units the wrapper packs.
//!
//! Text is walked grapheme by grapheme (UAX #29), so a base character and
//! its combining marks, an emoji ZWJ sequence, or a `\r\n` pair are never
//! torn apart.
//!
//! ```text
//! "Hi  there\n你好"
//!   ──► Word("Hi") Whitespace("  ") Word("there") LineBreak("\n")
//!       WideChar("你") WideChar("好")
//! ```

use unicode_segmentation::UnicodeSegmentation;

/// Kind of an atomic unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of narrow-script, non-whitespace graphemes.
    Word,
    /// Run of whitespace between two content tokens.
    Whitespace,
    /// `\n` or `\r\n`.
    LineBreak,
    /// A single grapheme from a script without inter-word spacing.
    WideChar,
}

/// A slice of the input text tagged with its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    fn new(text: &'a str, kind: TokenKind) -> Self {
        Self { text, kind }
    }

    /// Whether this token carries visible content (word or wide char).
    pub fn is_content(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::WideChar)
    }
}

/// Whether `c` belongs to a script family written without spaces between
/// words, where a line may break between any two characters.
pub fn is_wide_char(c: char) -> bool {
    matches!(c as u32,
        // Hangul Jamo
        0x1100..=0x115F |
        // CJK radicals, symbols and punctuation, kana, bopomofo,
        // CJK Extension A and the unified ideographs
        0x2E80..=0x9FFF |
        // Yi
        0xA000..=0xA4CF |
        // Hangul syllables
        0xAC00..=0xD7A3 |
        // CJK compatibility ideographs
        0xF900..=0xFAFF |
        // Vertical forms, CJK compatibility forms
        0xFE10..=0xFE1F | 0xFE30..=0xFE4F |
        // Fullwidth forms
        0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 |
        // Pictographs, emoticons, transport and map symbols
        0x1F300..=0x1F64F | 0x1F680..=0x1F6FF |
        // Supplemental symbols and pictographs, extended-A
        0x1F900..=0x1F9FF | 0x1FA70..=0x1FAFF |
        // CJK Extension B onwards
        0x20000..=0x3FFFD
    )
}

fn is_line_break(grapheme: &str) -> bool {
    grapheme == "\n" || grapheme == "\r\n"
}

fn is_blank(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

fn is_wide(grapheme: &str) -> bool {
    grapheme.chars().next().is_some_and(is_wide_char)
}

/// Split `text` into ordered tokens.
///
/// Whitespace only survives between two content tokens on the same line,
/// and trailing line breaks are dropped, so text without any content
/// yields an empty sequence. Leading line breaks are kept as blank lines.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut raw = Vec::new();
    // Start offset of the run currently being accumulated.
    let mut run: Option<(usize, TokenKind)> = None;

    for (ix, grapheme) in text.grapheme_indices(true) {
        let kind = if is_line_break(grapheme) {
            TokenKind::LineBreak
        } else if is_blank(grapheme) {
            TokenKind::Whitespace
        } else if is_wide(grapheme) {
            TokenKind::WideChar
        } else {
            TokenKind::Word
        };

        match run {
            Some((_, run_kind))
                if run_kind == kind
                    && matches!(kind, TokenKind::Word | TokenKind::Whitespace) => {}
            _ => {
                if let Some((start, run_kind)) = run.take() {
                    raw.push(Token::new(&text[start..ix], run_kind));
                }
                match kind {
                    TokenKind::Word | TokenKind::Whitespace => run = Some((ix, kind)),
                    _ => raw.push(Token::new(grapheme, kind)),
                }
            }
        }
    }
    if let Some((start, kind)) = run {
        raw.push(Token::new(&text[start..], kind));
    }

    if !raw.iter().any(Token::is_content) {
        return Vec::new();
    }

    let mut tokens: Vec<Token<'_>> = raw
        .iter()
        .enumerate()
        .filter(|(i, token)| {
            token.kind != TokenKind::Whitespace
                || (*i > 0
                    && raw[i - 1].is_content()
                    && raw.get(i + 1).is_some_and(Token::is_content))
        })
        .map(|(_, token)| *token)
        .collect();

    while tokens.last().is_some_and(|t| t.kind == TokenKind::LineBreak) {
        tokens.pop();
    }

    log::trace!("tokenize: {} bytes -> {} tokens", text.len(), tokens.len());
    tokens
}

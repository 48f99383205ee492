//! Lexer for instruction lines.
//!
//! Splits an instruction into its mnemonic and operand tokens. Tokens are
//! separated by commas and/or whitespace, and empty tokens are discarded, so
//! `mov a,5`, `mov a , 5` and `mov a 5` lex identically. Token text is
//! borrowed from the source line.
//!
//! `msg` operand lists contain quoted literals and are scanned separately by
//! [`crate::message::scan`].

use alloc::vec::Vec;

use crate::error::Span;
use crate::ir::Word;
use crate::preprocessor::is_identifier;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'src str,
    /// Source location.
    pub span: Span,
}

/// The type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Register, label, or mnemonic name.
    Ident,
    /// Decimal integer literal that fits in a [`Word`].
    Number(Word),
    /// Anything else: `1x`, `'a'`, `2b-`, out-of-range literals.
    Invalid,
}

#[inline]
fn is_separator(ch: char) -> bool {
    ch == ',' || ch.is_whitespace()
}

/// Split `text` at the end of its mnemonic.
///
/// Returns the mnemonic and the remaining operand text (untrimmed). The
/// mnemonic ends at the first separator.
#[must_use]
pub fn split_mnemonic(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(is_separator) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

/// Parse a base-10 integer with optional sign.
///
/// Only `[+-]?[0-9]+` is accepted; values outside the [`Word`] range are
/// rejected.
#[must_use]
pub fn parse_number(text: &str) -> Option<Word> {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<Word>().ok()
}

/// Classify a single token.
#[must_use]
pub fn classify(text: &str) -> TokenKind {
    if let Some(v) = parse_number(text) {
        TokenKind::Number(v)
    } else if is_identifier(text) {
        TokenKind::Ident
    } else {
        TokenKind::Invalid
    }
}

/// Tokenize operand text.
///
/// `span` is the location of the first byte of `text`; each token's span is
/// offset from it.
#[must_use]
pub fn tokenize(text: &str, span: Span) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if is_separator(ch) {
            if let Some(s) = start.take() {
                tokens.push(token(text, s, i, span));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(token(text, s, text.len(), span));
    }

    tokens
}

fn token(text: &str, from: usize, to: usize, span: Span) -> Token<'_> {
    let word = &text[from..to];
    Token {
        kind: classify(word),
        text: word,
        span: Span::new(span.line, span.col + from as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<&str> {
        tokenize(text, Span::new(1, 1))
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn mnemonic_split() {
        assert_eq!(split_mnemonic("mov  a, 5"), ("mov", "  a, 5"));
        assert_eq!(split_mnemonic("ret"), ("ret", ""));
        assert_eq!(split_mnemonic("mov,a,5"), ("mov", ",a,5"));
    }

    #[test]
    fn separators_are_commas_and_whitespace() {
        assert_eq!(texts("a,5"), ["a", "5"]);
        assert_eq!(texts(" a ,  5 "), ["a", "5"]);
        assert_eq!(texts("a 5"), ["a", "5"]);
        assert_eq!(texts("a,,5"), ["a", "5"]);
        assert!(texts("  ").is_empty());
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("-1"), Some(-1));
        assert_eq!(parse_number("+7"), Some(7));
        assert_eq!(parse_number("007"), Some(7));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("0x10"), None);
        assert_eq!(parse_number("1_000"), None);
        assert_eq!(parse_number("99999999999999999999"), None);
    }

    #[test]
    fn classification() {
        assert_eq!(classify("-5"), TokenKind::Number(-5));
        assert_eq!(classify("reg_1"), TokenKind::Ident);
        assert_eq!(classify("1x"), TokenKind::Invalid);
        assert_eq!(classify("'a'"), TokenKind::Invalid);
    }

    #[test]
    fn token_spans_are_offset() {
        let tokens = tokenize(" a, 5", Span::new(3, 5));
        assert_eq!(tokens[0].span, Span::new(3, 6));
        assert_eq!(tokens[1].span, Span::new(3, 9));
    }
}

//! Message formatting for the `msg` instruction.
//!
//! The operand list of `msg` is a sequence of tokens separated by commas
//! and/or whitespace. A token is either a single-quoted literal, taken
//! verbatim without its quotes, or a bare run of characters naming a value.
//! Commas, spaces and `;` inside quotes belong to the literal.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::error::{InterpError, Span};
use crate::ir::{MsgPart, Operand, Word};
use crate::lexer::{classify, TokenKind};

#[inline]
fn is_separator(ch: char) -> bool {
    ch == ',' || ch.is_whitespace()
}

/// Scan the operand text of a `msg` instruction.
///
/// `span` is the location of the first byte of `text`.
///
/// # Errors
///
/// - [`InterpError::Syntax`] for a quote that is never closed.
/// - [`InterpError::MalformedOperand`] for a bare token that is neither an
///   integer literal nor a register name.
pub fn scan(text: &str, span: Span) -> Result<Vec<MsgPart>, InterpError> {
    let mut parts = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if is_separator(ch) {
            chars.next();
            continue;
        }

        let at = Span::new(span.line, span.col + start as u32);

        if ch == '\'' {
            chars.next();
            let body = start + 1;
            let close = loop {
                match chars.next() {
                    Some((i, '\'')) => break i,
                    Some(_) => {}
                    None => {
                        return Err(InterpError::Syntax {
                            msg: String::from("unterminated string literal"),
                            span: at,
                        })
                    }
                }
            };
            parts.push(MsgPart::Text(String::from(&text[body..close])));
            continue;
        }

        let mut end = text.len();
        while let Some(&(i, c)) = chars.peek() {
            if is_separator(c) || c == '\'' {
                end = i;
                break;
            }
            chars.next();
        }
        let word = &text[start..end];
        let operand = match classify(word) {
            TokenKind::Number(v) => Operand::Immediate(v),
            TokenKind::Ident => Operand::Register(String::from(word)),
            TokenKind::Invalid => {
                return Err(InterpError::MalformedOperand {
                    operand: String::from(word),
                    span: at,
                })
            }
        };
        parts.push(MsgPart::Value(operand));
    }

    Ok(parts)
}

/// Render message parts into the result string.
///
/// Literal text is copied as-is; every value part is resolved through
/// `resolve` and written in decimal. Parts are concatenated without
/// separators.
///
/// # Errors
///
/// Propagates the first error returned by `resolve`.
pub fn render<F>(parts: &[MsgPart], mut resolve: F) -> Result<String, InterpError>
where
    F: FnMut(&Operand) -> Result<Word, InterpError>,
{
    let mut out = String::new();
    for part in parts {
        match part {
            MsgPart::Text(text) => out.push_str(text),
            MsgPart::Value(op) => {
                let v = resolve(op)?;
                // Writing to a String cannot fail.
                let _ = write!(out, "{}", v);
            }
        }
    }
    Ok(out)
}

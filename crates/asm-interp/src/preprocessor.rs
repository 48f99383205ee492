//! Preprocessor for program source text.
//!
//! Strips `;` comments and blank lines, then classifies every surviving line
//! as either a label declaration or an instruction. The output is dense: the
//! index of a line in the returned vector is its statement index, which is
//! what labels resolve to. Each line keeps its [`Span`] in the original text.

use alloc::format;
use alloc::vec::Vec;

use crate::error::{InterpError, Span};

/// Classification of a preprocessed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'src> {
    /// `name:`, stored without the colon.
    Label(&'src str),
    /// Instruction text, comment stripped and trimmed.
    Instruction(&'src str),
}

/// A preprocessed line borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'src> {
    /// What the line is.
    pub kind: LineKind<'src>,
    /// Where it starts in the original source.
    pub span: Span,
}

/// Remove a trailing `;` comment from `line`.
///
/// A `;` inside a single-quoted literal does not start a comment, so
/// `msg 'a;b'` keeps its text intact.
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            ';' if !in_quote => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Whether `name` is a valid register or label name: an ASCII letter or `_`
/// followed by ASCII alphanumerics or `_`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Split a leading `name:` off `text`.
///
/// Returns `(name, rest)` when the text before the first `:` is a single
/// token. Quoted text never contains a label, so a quote before the colon
/// rules it out.
fn split_label(text: &str) -> Option<(&str, &str)> {
    let colon = text.find(':')?;
    let head = &text[..colon];
    if head.is_empty()
        || head
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b == b',' || b == b'\'')
    {
        return None;
    }
    Some((head, &text[colon + 1..]))
}

/// Preprocess raw program text into classified lines.
///
/// `name: instruction` on one line yields a label followed by an instruction.
///
/// # Errors
///
/// Returns [`InterpError::Syntax`] when a label declaration uses a name that
/// is not an identifier (e.g. `1st:`).
pub fn preprocess(source: &str) -> Result<Vec<SourceLine<'_>>, InterpError> {
    let mut out = Vec::new();

    for (idx, raw) in source.split('\n').enumerate() {
        let line_no = (idx + 1) as u32;
        let code = strip_comment(raw);
        let text = code.trim();
        if text.is_empty() {
            continue;
        }
        let col = column_of(raw, text);

        let Some((name, rest)) = split_label(text) else {
            out.push(SourceLine {
                kind: LineKind::Instruction(text),
                span: Span::new(line_no, col),
            });
            continue;
        };

        if !is_identifier(name) {
            return Err(InterpError::Syntax {
                msg: format!("invalid label name '{}'", name),
                span: Span::new(line_no, col),
            });
        }
        out.push(SourceLine {
            kind: LineKind::Label(name),
            span: Span::new(line_no, col),
        });

        let rest_trimmed = rest.trim();
        if !rest_trimmed.is_empty() {
            out.push(SourceLine {
                kind: LineKind::Instruction(rest_trimmed),
                span: Span::new(line_no, column_of(raw, rest_trimmed)),
            });
        }
    }

    Ok(out)
}

/// 1-based column of `part`, which must be a subslice of `line`.
fn column_of(line: &str, part: &str) -> u32 {
    let offset = part.as_ptr() as usize - line.as_ptr() as usize;
    (offset + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<LineKind<'_>> {
        preprocess(source).unwrap().into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn strips_comments_and_blank_lines() {
        let src = "\n; My first program\nmov  a, 5\n\ninc  a ; bump\n   \n";
        assert_eq!(
            kinds(src),
            [
                LineKind::Instruction("mov  a, 5"),
                LineKind::Instruction("inc  a"),
            ]
        );
    }

    #[test]
    fn comment_without_leading_space() {
        assert_eq!(kinds("ret;done"), [LineKind::Instruction("ret")]);
    }

    #[test]
    fn semicolon_inside_quotes_is_text() {
        assert_eq!(strip_comment("msg 'a;b' ; tail"), "msg 'a;b' ");
    }

    #[test]
    fn classifies_labels() {
        let src = "function:\n    div  a, 2\n    ret\n";
        assert_eq!(
            kinds(src),
            [
                LineKind::Label("function"),
                LineKind::Instruction("div  a, 2"),
                LineKind::Instruction("ret"),
            ]
        );
    }

    #[test]
    fn label_with_trailing_instruction_is_split() {
        assert_eq!(
            kinds("f: div a, 2"),
            [LineKind::Label("f"), LineKind::Instruction("div a, 2")]
        );
    }

    #[test]
    fn quoted_colon_is_not_a_label() {
        assert_eq!(
            kinds("msg 'x: ', a"),
            [LineKind::Instruction("msg 'x: ', a")]
        );
    }

    #[test]
    fn invalid_label_name() {
        let err = preprocess("mov a, 1\n1st:").unwrap_err();
        assert!(matches!(err, InterpError::Syntax { span, .. } if span == Span::new(2, 1)));
    }

    #[test]
    fn spans_point_at_original_lines() {
        let lines = preprocess("\n; header\n\n    mov a, 1\nloop:  inc a").unwrap();
        assert_eq!(lines[0].span, Span::new(4, 5));
        assert_eq!(lines[1].span, Span::new(5, 1));
        assert_eq!(lines[2].span, Span::new(5, 8));
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            kinds("mov a, 1\r\nend\r\n"),
            [LineKind::Instruction("mov a, 1"), LineKind::Instruction("end")]
        );
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("a"));
        assert!(is_identifier("proc_fact"));
        assert!(is_identifier("_tmp1"));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}

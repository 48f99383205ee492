//! Compile-time evaluation proc-macros for [`asm-interp`](https://crates.io/crates/asm-interp).
//!
//! Provides the [`interpret!`] and [`interpret_str!`] macros that run a
//! program at compile time, expanding to its output as a constant with zero
//! runtime overhead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use asm_interp_macros::{interpret, interpret_str};
//!
//! const GREETING: &str = interpret_str!("mov a, 6\nmul a, 7\nmsg 'answer: ', a\nend");
//! assert_eq!(GREETING, "answer: 42");
//!
//! // Programs that never reach `end` expand to `None`.
//! const NOTHING: Option<&str> = interpret!("mov a, 1");
//! assert_eq!(NOTHING, None);
//! ```

use proc_macro::TokenStream;

/// Statements a program may execute at compile time before the macro gives
/// up with an error.
const MAX_STEPS: u64 = 10_000_000;

/// Pending `call`s a program may have at compile time.
const MAX_CALL_DEPTH: usize = 4096;

/// Run a program at compile time, producing an `Option<&'static str>`.
///
/// # Syntax
///
/// ```rust,ignore
/// interpret!("program source")
/// ```
///
/// Expands to `Some("...")` when the program executes `end`, and to `None`
/// when control runs past the last line.
///
/// # Examples
///
/// ```rust,ignore
/// use asm_interp_macros::interpret;
///
/// const FACT: Option<&str> = interpret!("
///     mov a, 5
///     mov c, 1
/// loop:
///     mul c, a
///     dec a
///     cmp a, 1
///     jg loop
///     msg '5! = ', c
///     end
/// ");
/// assert_eq!(FACT, Some("5! = 120"));
/// ```
///
/// # Compile-time errors
///
/// If parsing or execution fails, or the step limit is exceeded, the macro
/// emits a compile-time error with the full `InterpError` diagnostic message.
#[proc_macro]
pub fn interpret(input: TokenStream) -> TokenStream {
    match interpret_impl(input) {
        Ok(ts) => ts,
        Err(err) => err.into_compile_error(),
    }
}

/// Run a program at compile time, producing a `&'static str`.
///
/// Unlike [`interpret!`] which returns `Option<&'static str>`, this macro
/// requires the program to reach `end` and fails to compile otherwise.
///
/// # Examples
///
/// ```rust,ignore
/// use asm_interp_macros::interpret_str;
///
/// const EMPTY: &str = interpret_str!("end");
/// assert_eq!(EMPTY, "");
/// ```
#[proc_macro]
pub fn interpret_str(input: TokenStream) -> TokenStream {
    match interpret_str_impl(input) {
        Ok(ts) => ts,
        Err(err) => err.into_compile_error(),
    }
}

// ─── Implementation ─────────────────────────────────────────────────────────

struct MacroInput {
    source: String,
    /// Span of the source literal for error reporting.
    source_span: proc_macro::Span,
}

fn parse_input(input: TokenStream) -> Result<MacroInput, syn_free::Error> {
    let mut tokens = input.into_iter().peekable();

    if tokens.peek().is_none() {
        return Err(syn_free::Error::new("expected program source string"));
    }
    let (source, source_span) = parse_string_literal(&mut tokens)?;

    // Allow a single trailing comma.
    if let Some(proc_macro::TokenTree::Punct(p)) = tokens.peek() {
        if p.as_char() == ',' {
            tokens.next();
        }
    }
    if let Some(extra) = tokens.next() {
        return Err(syn_free::Error::with_span(
            extra.span(),
            "unexpected extra tokens after source string",
        ));
    }

    Ok(MacroInput {
        source,
        source_span,
    })
}

fn interpret_impl(input: TokenStream) -> Result<TokenStream, syn_free::Error> {
    let mi = parse_input(input)?;
    let output = do_interpret(&mi)?;
    Ok(option_expr(output.as_deref()))
}

fn interpret_str_impl(input: TokenStream) -> Result<TokenStream, syn_free::Error> {
    let mi = parse_input(input)?;
    match do_interpret(&mi)? {
        Some(text) => Ok(str_expr(&text)),
        None => Err(syn_free::Error::with_span(
            mi.source_span,
            "program ran past its last line without reaching `end`",
        )),
    }
}

fn do_interpret(mi: &MacroInput) -> Result<Option<String>, syn_free::Error> {
    let mut interp = asm_interp::Interpreter::new();
    interp.limits(asm_interp::ExecutionLimits {
        max_steps: Some(MAX_STEPS),
        max_call_depth: Some(MAX_CALL_DEPTH),
        ..asm_interp::ExecutionLimits::default()
    });

    interp
        .run(&mi.source)
        .map_err(|e| syn_free::Error::with_span(mi.source_span, &format!("interpreter error: {e}")))
}

fn parse_string_literal(
    tokens: &mut std::iter::Peekable<proc_macro::token_stream::IntoIter>,
) -> Result<(String, proc_macro::Span), syn_free::Error> {
    let tt = tokens
        .next()
        .ok_or_else(|| syn_free::Error::new("expected program source string"))?;
    let proc_macro::TokenTree::Literal(lit) = &tt else {
        return Err(syn_free::Error::with_span(
            tt.span(),
            "expected program source string",
        ));
    };
    let span = tt.span();
    let source = source_text(&lit.to_string())
        .map_err(|msg| syn_free::Error::with_span(span, &msg))?;
    Ok((source, span))
}

/// Decode the value of a `str` literal from its token text.
///
/// Accepts `"..."`, `r"..."` and `r#"..."#` with any number of hashes. Byte
/// and C string literals carry no UTF-8 program text and are rejected.
fn source_text(raw: &str) -> Result<String, String> {
    match raw.as_bytes().first() {
        Some(b'"') => {
            let body = raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .ok_or_else(|| String::from("malformed string literal"))?;
            unescape_string(body)
        }
        Some(b'r') => {
            let after_r = &raw[1..];
            let hashes = after_r.len() - after_r.trim_start_matches('#').len();
            let fence = &after_r[..hashes];
            after_r[hashes..]
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix(fence))
                .and_then(|s| s.strip_suffix('"'))
                .map(String::from)
                .ok_or_else(|| String::from("malformed raw string literal"))
        }
        Some(b'b') => Err(String::from(
            "byte string literals are not supported, write the program as a `str` literal",
        )),
        Some(b'c') => Err(String::from(
            "C string literals are not supported, write the program as a `str` literal",
        )),
        _ => Err(format!("expected program source string, found `{raw}`")),
    }
}

/// Resolve the escapes of a non-raw string literal body, matching what
/// rustc produces for the same literal.
fn unescape_string(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 && byte <= 0x7F => out.push(char::from(byte)),
                    _ => return Err(format!("invalid escape `\\x{hex}`")),
                }
            }
            Some('u') => out.push(unicode_escape(&mut chars)?),
            // Line continuation: skip the newline and leading whitespace.
            Some('\n') => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            Some(other) => return Err(format!("unknown escape `\\{other}`")),
            None => return Err(String::from("string literal ends in a lone `\\`")),
        }
    }
    Ok(out)
}

/// `\u{...}`: one to six hex digits, underscores allowed after the first.
fn unicode_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<char, String> {
    if chars.next() != Some('{') {
        return Err(String::from("expected `{` after `\\u`"));
    }
    let mut digits = String::new();
    loop {
        match chars.next() {
            Some('}') => break,
            Some('_') if !digits.is_empty() => {}
            Some(c) if c.is_ascii_hexdigit() && digits.len() < 6 => digits.push(c),
            _ => return Err(String::from("malformed `\\u{...}` escape")),
        }
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid unicode escape `\\u{{{digits}}}`"))
}

fn str_expr(text: &str) -> TokenStream {
    TokenStream::from(proc_macro::TokenTree::Literal(
        proc_macro::Literal::string(text),
    ))
}

fn option_expr(output: Option<&str>) -> TokenStream {
    let code = match output {
        Some(text) => format!("::core::option::Option::Some({text:?})"),
        None => String::from("::core::option::Option::None"),
    };
    code.parse().unwrap_or_else(|_| {
        syn_free::Error::new("failed to build the expansion").into_compile_error()
    })
}

// ─── Minimal syn-free error type ─────────────────────────────────────────────
// The macro input is a single string literal, so it is parsed directly from
// `proc_macro::TokenStream` without `syn`.

mod syn_free {
    use proc_macro::{Delimiter, Group, Ident, Literal, Punct, Spacing, Span, TokenStream, TokenTree};

    pub struct Error {
        message: String,
        span: Option<Span>,
    }

    impl Error {
        pub fn new(msg: &str) -> Self {
            Self {
                message: msg.to_string(),
                span: None,
            }
        }

        pub fn with_span(span: Span, msg: &str) -> Self {
            Self {
                message: msg.to_string(),
                span: Some(span),
            }
        }

        /// `::core::compile_error!("message")`, spanned at the offending
        /// token when one is known.
        pub fn into_compile_error(self) -> TokenStream {
            let span = self.span.unwrap_or_else(Span::call_site);
            let mut msg = Literal::string(&self.message);
            msg.set_span(span);
            let mut args = Group::new(Delimiter::Parenthesis, TokenTree::from(msg).into());
            args.set_span(span);

            let colon = |spacing| {
                let mut p = Punct::new(':', spacing);
                p.set_span(span);
                TokenTree::from(p)
            };
            let mut bang = Punct::new('!', Spacing::Alone);
            bang.set_span(span);

            [
                colon(Spacing::Joint),
                colon(Spacing::Alone),
                TokenTree::from(Ident::new("core", span)),
                colon(Spacing::Joint),
                colon(Spacing::Alone),
                TokenTree::from(Ident::new("compile_error", span)),
                TokenTree::from(bang),
                TokenTree::from(args),
            ]
            .into_iter()
            .collect()
        }
    }
}

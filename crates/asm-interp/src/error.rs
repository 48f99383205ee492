//! Error types and source span tracking for diagnostics.

use alloc::string::String;
use core::fmt;

/// Source location for diagnostics.
///
/// Points back at the original program text: the 1-based line number before
/// comment and blank-line stripping, and the 1-based column where the
/// statement starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// 1-based line number in the original source.
    pub line: u32,
    /// 1-based column number (byte offset within line).
    pub col: u32,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// A dummy span for errors not tied to a source location.
    #[must_use]
    pub fn dummy() -> Self {
        Self { line: 0, col: 0 }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Error raised while parsing or executing a program.
///
/// Every variant is a contract violation by the program text. None of them
/// are recovered internally: the first one aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpError {
    /// Label was declared more than once.
    DuplicateLabel {
        /// The duplicated label name.
        label: String,
        /// Location of the second declaration.
        span: Span,
        /// Location of the first declaration.
        first_span: Span,
    },

    /// A register was read before any `mov` assigned it.
    UndefinedRegister {
        /// The register name.
        register: String,
        /// Location of the reading instruction.
        span: Span,
    },

    /// Jump or call target was never declared.
    UndefinedLabel {
        /// The undefined label name.
        label: String,
        /// Location of the jump or call.
        span: Span,
    },

    /// `div` with a divisor resolving to zero.
    DivisionByZero {
        /// Location of the `div` instruction.
        span: Span,
    },

    /// `ret` executed with an empty call stack.
    EmptyCallStack {
        /// Location of the `ret` instruction.
        span: Span,
    },

    /// Operand is neither an integer literal nor a register name.
    MalformedOperand {
        /// The offending token.
        operand: String,
        /// Location of the instruction.
        span: Span,
    },

    /// Mnemonic outside the instruction set.
    UnknownMnemonic {
        /// The mnemonic as written.
        mnemonic: String,
        /// Location of the instruction.
        span: Span,
    },

    /// Wrong operand count for the instruction.
    InvalidOperands {
        /// Description of what was expected.
        detail: String,
        /// Location of the instruction.
        span: Span,
    },

    /// Lexical error, e.g. an unterminated quoted literal.
    Syntax {
        /// The syntax error message.
        msg: String,
        /// Location of the error.
        span: Span,
    },

    /// A configured execution limit was exceeded.
    ResourceLimitExceeded {
        /// Human-readable name of the resource (e.g. "steps", "call depth").
        resource: String,
        /// The configured limit that was exceeded.
        limit: u64,
    },
}

impl InterpError {
    /// The source location the error points at, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            InterpError::DuplicateLabel { span, .. }
            | InterpError::UndefinedRegister { span, .. }
            | InterpError::UndefinedLabel { span, .. }
            | InterpError::DivisionByZero { span }
            | InterpError::EmptyCallStack { span }
            | InterpError::MalformedOperand { span, .. }
            | InterpError::UnknownMnemonic { span, .. }
            | InterpError::InvalidOperands { span, .. }
            | InterpError::Syntax { span, .. } => Some(*span),
            InterpError::ResourceLimitExceeded { .. } => None,
        }
    }
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpError::DuplicateLabel {
                label,
                span,
                first_span,
            } => {
                write!(
                    f,
                    "{}: duplicate label '{}' (first defined at {})",
                    span, label, first_span
                )
            }
            InterpError::UndefinedRegister { register, span } => {
                write!(f, "{}: register '{}' read before assignment", span, register)
            }
            InterpError::UndefinedLabel { label, span } => {
                write!(f, "{}: undefined label '{}'", span, label)
            }
            InterpError::DivisionByZero { span } => {
                write!(f, "{}: division by zero", span)
            }
            InterpError::EmptyCallStack { span } => {
                write!(f, "{}: return without call", span)
            }
            InterpError::MalformedOperand { operand, span } => {
                write!(
                    f,
                    "{}: malformed operand '{}' (expected integer or register)",
                    span, operand
                )
            }
            InterpError::UnknownMnemonic { mnemonic, span } => {
                write!(f, "{}: unknown mnemonic '{}'", span, mnemonic)
            }
            InterpError::InvalidOperands { detail, span } => {
                write!(f, "{}: invalid operands: {}", span, detail)
            }
            InterpError::Syntax { msg, span } => {
                write!(f, "{}: {}", span, msg)
            }
            InterpError::ResourceLimitExceeded { resource, limit } => {
                write!(
                    f,
                    "resource limit exceeded: {} (limit: {})",
                    resource, limit
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InterpError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn span_display() {
        let span = Span::new(3, 12);
        assert_eq!(format!("{}", span), "3:12");
    }

    #[test]
    fn span_dummy() {
        let span = Span::dummy();
        assert_eq!(span.line, 0);
        assert_eq!(span.col, 0);
    }

    #[test]
    fn error_duplicate_label_display() {
        let err = InterpError::DuplicateLabel {
            label: "loop".into(),
            span: Span::new(20, 1),
            first_span: Span::new(5, 1),
        };
        assert_eq!(
            format!("{}", err),
            "20:1: duplicate label 'loop' (first defined at 5:1)"
        );
    }

    #[test]
    fn error_undefined_register_display() {
        let err = InterpError::UndefinedRegister {
            register: "b".into(),
            span: Span::new(2, 5),
        };
        assert_eq!(format!("{}", err), "2:5: register 'b' read before assignment");
    }

    #[test]
    fn error_undefined_label_display() {
        let err = InterpError::UndefinedLabel {
            label: "nowhere".into(),
            span: Span::new(10, 1),
        };
        assert_eq!(format!("{}", err), "10:1: undefined label 'nowhere'");
    }

    #[test]
    fn error_malformed_operand_display() {
        let err = InterpError::MalformedOperand {
            operand: "1x".into(),
            span: Span::new(4, 3),
        };
        assert_eq!(
            format!("{}", err),
            "4:3: malformed operand '1x' (expected integer or register)"
        );
    }

    #[test]
    fn error_resource_limit_exceeded_display() {
        let err = InterpError::ResourceLimitExceeded {
            resource: "steps".into(),
            limit: 1_000_000,
        };
        assert_eq!(
            format!("{}", err),
            "resource limit exceeded: steps (limit: 1000000)"
        );
        assert_eq!(err.span(), None);
    }

    #[test]
    fn error_span_accessor() {
        let err = InterpError::DivisionByZero {
            span: Span::new(7, 5),
        };
        assert_eq!(err.span(), Some(Span::new(7, 5)));
        assert_eq!(format!("{}", err), "7:5: division by zero");
    }
}

//! # asm-interp: Pure Rust Interpreter for a Tiny Register Assembly Language
//!
//! `asm-interp` runs programs written in a small assembly-like language with
//! named integer registers, comparison-driven conditional jumps, subroutine
//! `call`/`ret`, and a `msg` instruction that formats the program's single
//! output string.
//!
//! ## Quick Start
//!
//! ```rust
//! use asm_interp::interpret;
//!
//! let program = "
//! ; My first program
//! mov  a, 5
//! inc  a
//! call function
//! msg  '(5+1)/2 = ', a    ; output message
//! end
//!
//! function:
//!     div  a, 2
//!     ret
//! ";
//! assert_eq!(interpret(program).unwrap().as_deref(), Some("(5+1)/2 = 3"));
//! ```
//!
//! ## Language
//!
//! | Instruction | Effect |
//! |---|---|
//! | `mov r, x` | `r = x` (creates `r`) |
//! | `inc r` / `dec r` | `r += 1` / `r -= 1` |
//! | `add`/`sub`/`mul`/`div r, x` | `r op= x` (`div` truncates toward zero) |
//! | `cmp x, y` | compare, for the jumps below |
//! | `jmp`/`je`/`jne`/`jg`/`jge`/`jl`/`jle L` | (conditional) jump to label `L` |
//! | `call L` / `ret` | subroutine call and return |
//! | `msg 'text', x, ...` | set the output string |
//! | `end` | stop and return the output |
//!
//! `x` is a decimal literal or a register name. Comments start with `;`.
//! Labels are declared as `name:` on their own line. Registers hold `i64`
//! values and all arithmetic wraps on overflow.
//!
//! ## Features
//!
//! - **`no_std` + `alloc`**: disable the default `std` feature.
//! - **`serde`**: `Serialize`/`Deserialize` for IR, errors and limits.
//! - **Parse once, run many**: [`Program`] is immutable and shareable.
//! - **Bounded execution**: opt-in [`ExecutionLimits`] for untrusted input.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Error types and source-span diagnostics.
pub mod error;
/// Public interpreter API: `Program`, `Interpreter`, `ExecutionLimits`.
pub mod interpreter;
/// Intermediate representation: operands, instructions, statements.
pub mod ir;
/// Label table construction and lookup.
pub mod labels;
/// Operand tokenizer with span tracking.
pub mod lexer;
/// Execution engine: registers, flag, call stack, dispatch loop.
pub mod machine;
/// `msg` operand scanning and result formatting.
pub mod message;
/// Instruction parser producing IR statements.
pub mod parser;
/// Preprocessor: comment/blank-line stripping and line classification.
pub mod preprocessor;

// Re-exports
pub use error::{InterpError, Span};
pub use interpreter::{ExecutionLimits, Interpreter, Program};
pub use ir::{
    ArithOp, Comparison, Condition, Instruction, Mnemonic, MsgPart, Operand, Statement, Word,
};
pub use labels::LabelTable;
pub use machine::{Machine, Registers, Step};

use alloc::string::String;

/// Interpret a complete program.
///
/// Returns `Ok(Some(output))` when an `end` instruction executes (the text
/// set by the last `msg`, or the empty string if none ran) and `Ok(None)`
/// when control runs past the last line without reaching `end`.
///
/// Execution is unbounded: a program that loops forever never returns. Use
/// [`Interpreter`] with [`ExecutionLimits`] for untrusted input.
///
/// # Errors
///
/// Returns [`InterpError`] when the program text is malformed (unknown
/// mnemonic, bad operand, duplicate label) or when execution hits a
/// contract violation (undefined register or label, division by zero,
/// `ret` without `call`).
///
/// # Examples
///
/// ```rust
/// use asm_interp::{interpret, InterpError};
///
/// assert_eq!(interpret("mov a, -7\ndiv a, 2\nmsg a\nend")?, Some("-3".into()));
/// assert_eq!(interpret("mov a, 1")?, None);
/// assert!(matches!(
///     interpret("mov a, b"),
///     Err(InterpError::UndefinedRegister { .. })
/// ));
/// # Ok::<(), InterpError>(())
/// ```
pub fn interpret(source: &str) -> Result<Option<String>, InterpError> {
    Program::parse(source)?.run()
}

//! Public interpreter API: parsed programs, execution limits and the
//! builder-style [`Interpreter`].
//!
//! This module ties together the preprocessor, parser, label table and
//! machine.

use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::error::InterpError;
use crate::ir::Statement;
use crate::labels::LabelTable;
use crate::machine::Machine;
use crate::parser;

/// A parsed program with its resolved label table.
///
/// Immutable once built; any number of [`Machine`]s may run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    statements: Vec<Statement>,
    labels: LabelTable,
}

impl Program {
    /// Preprocess and parse `source`, then build the label table.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError`] for unknown mnemonics, bad operands, an
    /// unterminated `msg` literal, or a duplicate label.
    ///
    /// # Examples
    ///
    /// ```
    /// use asm_interp::Program;
    ///
    /// let program = Program::parse("start:\n  mov a, 1 ; one\n  end")?;
    /// assert_eq!(program.len(), 3);
    /// assert_eq!(program.label_index("start"), Some(0));
    /// # Ok::<(), asm_interp::InterpError>(())
    /// ```
    pub fn parse(source: &str) -> Result<Self, InterpError> {
        let statements = parser::parse_program(source)?;
        let labels = LabelTable::build(&statements)?;
        debug!(
            "parsed {} statements, {} labels",
            statements.len(),
            labels.len()
        );
        Ok(Self { statements, labels })
    }

    /// The statements, in execution order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The label table.
    #[must_use]
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Statement index of a label declaration.
    #[must_use]
    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.labels.get(name)
    }

    /// Number of statements, labels included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the program has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Run with no limits. Shorthand for `Machine::new(self).run()`.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error.
    pub fn run(&self) -> Result<Option<String>, InterpError> {
        Machine::new(self).run()
    }

    /// Produce a human-readable listing: statement index, source location,
    /// and the normalized statement text.
    ///
    /// # Example output
    ///
    /// ```text
    ///    0  2:1      mov a, 5
    ///    1  4:1    function:
    ///    2  5:5      div a, 2
    /// ```
    #[must_use]
    pub fn listing(&self) -> String {
        use core::fmt::Write;

        let mut out = String::new();
        for (i, stmt) in self.statements.iter().enumerate() {
            let indent = match stmt {
                Statement::Label { .. } => "",
                Statement::Instruction { .. } => "  ",
            };
            let loc = alloc::format!("{}", stmt.span());
            let _ = writeln!(out, "{:>4}  {:<6} {}{}", i, loc, indent, stmt);
        }
        out
    }
}

/// Configurable bounds on a run.
///
/// The defaults impose no step or call-depth limit: a program that loops
/// forever runs forever. Set the limits when running untrusted programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionLimits {
    /// Maximum statements executed (labels included). Default: unbounded.
    pub max_steps: Option<u64>,
    /// Maximum pending `call`s. Default: unbounded.
    pub max_call_depth: Option<usize>,
    /// Maximum source size in bytes accepted by [`Interpreter::parse`].
    /// Default: 64 MiB.
    pub max_source_bytes: usize,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_call_depth: None,
            max_source_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Builder-pattern interpreter.
///
/// # Examples
///
/// ```rust
/// use asm_interp::{ExecutionLimits, Interpreter};
///
/// let mut interp = Interpreter::new();
/// interp.limits(ExecutionLimits {
///     max_steps: Some(10_000),
///     ..ExecutionLimits::default()
/// });
/// let out = interp.run("mov a, 6\nmul a, 7\nmsg 'answer: ', a\nend").unwrap();
/// assert_eq!(out.as_deref(), Some("answer: 42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    limits: ExecutionLimits,
}

impl Interpreter {
    /// Create an interpreter with default (unbounded) limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set execution limits.
    pub fn limits(&mut self, limits: ExecutionLimits) -> &mut Self {
        self.limits = limits;
        self
    }

    /// The configured limits.
    #[must_use]
    pub fn current_limits(&self) -> ExecutionLimits {
        self.limits
    }

    /// Parse `source`, enforcing the source size limit.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::ResourceLimitExceeded`] for oversized input,
    /// otherwise see [`Program::parse`].
    pub fn parse(&self, source: &str) -> Result<Program, InterpError> {
        if source.len() > self.limits.max_source_bytes {
            return Err(InterpError::ResourceLimitExceeded {
                resource: String::from("source bytes"),
                limit: self.limits.max_source_bytes as u64,
            });
        }
        Program::parse(source)
    }

    /// Create a machine for `program` that enforces the configured limits.
    #[must_use]
    pub fn machine<'p>(&self, program: &'p Program) -> Machine<'p> {
        Machine::with_limits(program, self.limits)
    }

    /// Parse and run `source`.
    ///
    /// # Errors
    ///
    /// Returns the first parse or runtime error.
    pub fn run(&self, source: &str) -> Result<Option<String>, InterpError> {
        let program = self.parse(source)?;
        self.run_program(&program)
    }

    /// Run an already parsed program.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error.
    pub fn run_program(&self, program: &Program) -> Result<Option<String>, InterpError> {
        self.machine(program).run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_accessors() {
        let program = Program::parse("mov a, 1\nf:\nret").unwrap();
        assert_eq!(program.len(), 3);
        assert!(!program.is_empty());
        assert_eq!(program.label_index("f"), Some(1));
        assert_eq!(program.labels().len(), 1);
    }

    #[test]
    fn empty_program_falls_off() {
        let program = Program::parse("; nothing here\n\n").unwrap();
        assert!(program.is_empty());
        assert_eq!(program.run(), Ok(None));
    }

    #[test]
    fn program_runs_repeatedly() {
        let program = Program::parse("mov a, 2\nmul a, a\nmsg a\nend").unwrap();
        assert_eq!(program.run(), Ok(Some("4".into())));
        assert_eq!(program.run(), Ok(Some("4".into())));
    }

    #[test]
    fn listing_format() {
        let program = Program::parse("mov  a,5\nf:\n    div a , 2").unwrap();
        let listing = program.listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "   0  1:1      mov a, 5");
        assert_eq!(lines[1], "   1  2:1    f:");
        assert_eq!(lines[2], "   2  3:5      div a, 2");
    }

    #[test]
    fn source_size_limit() {
        let mut interp = Interpreter::new();
        interp.limits(ExecutionLimits {
            max_source_bytes: 4,
            ..ExecutionLimits::default()
        });
        let err = interp.run("mov a, 1").unwrap_err();
        assert!(matches!(err, InterpError::ResourceLimitExceeded { limit: 4, .. }));
    }

    #[test]
    fn default_limits_are_unbounded() {
        let limits = Interpreter::new().current_limits();
        assert_eq!(limits.max_steps, None);
        assert_eq!(limits.max_call_depth, None);
    }
}

//! Intermediate representation: operands, instructions, and statements.
//!
//! Every program line is parsed exactly once into these types. Execution then
//! matches on [`Instruction`] instead of re-reading mnemonic strings.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::error::Span;

/// Value type of registers and integer literals.
///
/// Arithmetic on words wraps on overflow (two's complement).
pub type Word = i64;

/// A value-producing operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Decimal integer literal.
    Immediate(Word),
    /// Register name, looked up at execution time.
    Register(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Immediate(v) => write!(f, "{}", v),
            Operand::Register(name) => f.write_str(name),
        }
    }
}

/// One piece of a `msg` operand list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MsgPart {
    /// Quoted literal text, quotes stripped.
    Text(String),
    /// Operand rendered as its decimal value.
    Value(Operand),
}

impl fmt::Display for MsgPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsgPart::Text(text) => write!(f, "'{}'", text),
            MsgPart::Value(op) => write!(f, "{}", op),
        }
    }
}

/// Result of the last `cmp`.
///
/// A fresh machine starts at [`Comparison::Equal`], so a conditional jump
/// executed before any `cmp` behaves as if the operands were equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    /// `lhs == rhs`.
    #[default]
    Equal,
    /// `lhs < rhs`.
    Less,
    /// `lhs > rhs`.
    Greater,
}

impl From<Ordering> for Comparison {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Equal => Comparison::Equal,
            Ordering::Less => Comparison::Less,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

/// Branch condition of a jump instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// `jmp`: unconditional.
    Always,
    /// `je`
    Equal,
    /// `jne`
    NotEqual,
    /// `jg`
    Greater,
    /// `jge`
    GreaterEqual,
    /// `jl`
    Less,
    /// `jle`
    LessEqual,
}

impl Condition {
    /// Whether a jump with this condition is taken for `flag`.
    #[must_use]
    pub fn holds(self, flag: Comparison) -> bool {
        match self {
            Condition::Always => true,
            Condition::Equal => flag == Comparison::Equal,
            Condition::NotEqual => flag != Comparison::Equal,
            Condition::Greater => flag == Comparison::Greater,
            Condition::GreaterEqual => matches!(flag, Comparison::Equal | Comparison::Greater),
            Condition::Less => flag == Comparison::Less,
            Condition::LessEqual => matches!(flag, Comparison::Equal | Comparison::Less),
        }
    }

    fn mnemonic(self) -> Mnemonic {
        match self {
            Condition::Always => Mnemonic::Jmp,
            Condition::Equal => Mnemonic::Je,
            Condition::NotEqual => Mnemonic::Jne,
            Condition::Greater => Mnemonic::Jg,
            Condition::GreaterEqual => Mnemonic::Jge,
            Condition::Less => Mnemonic::Jl,
            Condition::LessEqual => Mnemonic::Jle,
        }
    }
}

/// Binary arithmetic operation with a register destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithOp {
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`: truncates toward zero.
    Div,
}

impl ArithOp {
    fn mnemonic(self) -> Mnemonic {
        match self {
            ArithOp::Add => Mnemonic::Add,
            ArithOp::Sub => Mnemonic::Sub,
            ArithOp::Mul => Mnemonic::Mul,
            ArithOp::Div => Mnemonic::Div,
        }
    }
}

/// The closed instruction set, keyed by mnemonic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mnemonic {
    Mov,
    Inc,
    Dec,
    Add,
    Sub,
    Mul,
    Div,
    Cmp,
    Jmp,
    Je,
    Jne,
    Jge,
    Jg,
    Jle,
    Jl,
    Call,
    Ret,
    Msg,
    End,
}

impl Mnemonic {
    /// Every mnemonic, in instruction-table order.
    pub const ALL: [Mnemonic; 19] = [
        Mnemonic::Mov,
        Mnemonic::Inc,
        Mnemonic::Dec,
        Mnemonic::Add,
        Mnemonic::Sub,
        Mnemonic::Mul,
        Mnemonic::Div,
        Mnemonic::Cmp,
        Mnemonic::Jmp,
        Mnemonic::Je,
        Mnemonic::Jne,
        Mnemonic::Jge,
        Mnemonic::Jg,
        Mnemonic::Jle,
        Mnemonic::Jl,
        Mnemonic::Call,
        Mnemonic::Ret,
        Mnemonic::Msg,
        Mnemonic::End,
    ];

    /// Look up a mnemonic by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }

    /// Lower-case source spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Mov => "mov",
            Mnemonic::Inc => "inc",
            Mnemonic::Dec => "dec",
            Mnemonic::Add => "add",
            Mnemonic::Sub => "sub",
            Mnemonic::Mul => "mul",
            Mnemonic::Div => "div",
            Mnemonic::Cmp => "cmp",
            Mnemonic::Jmp => "jmp",
            Mnemonic::Je => "je",
            Mnemonic::Jne => "jne",
            Mnemonic::Jge => "jge",
            Mnemonic::Jg => "jg",
            Mnemonic::Jle => "jle",
            Mnemonic::Jl => "jl",
            Mnemonic::Call => "call",
            Mnemonic::Ret => "ret",
            Mnemonic::Msg => "msg",
            Mnemonic::End => "end",
        }
    }

    /// Number of operands, or `None` for the variadic `msg`.
    #[must_use]
    pub fn arity(self) -> Option<usize> {
        match self {
            Mnemonic::Ret | Mnemonic::End => Some(0),
            Mnemonic::Inc
            | Mnemonic::Dec
            | Mnemonic::Jmp
            | Mnemonic::Je
            | Mnemonic::Jne
            | Mnemonic::Jge
            | Mnemonic::Jg
            | Mnemonic::Jle
            | Mnemonic::Jl
            | Mnemonic::Call => Some(1),
            Mnemonic::Mov
            | Mnemonic::Add
            | Mnemonic::Sub
            | Mnemonic::Mul
            | Mnemonic::Div
            | Mnemonic::Cmp => Some(2),
            Mnemonic::Msg => None,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, executable instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instruction {
    /// `mov dst, src`: creates `dst` if absent.
    Mov {
        /// Destination register.
        dst: String,
        /// Source value.
        src: Operand,
    },
    /// `inc reg`
    Inc(String),
    /// `dec reg`
    Dec(String),
    /// `add`/`sub`/`mul`/`div dst, src`
    Arith {
        /// Which operation.
        op: ArithOp,
        /// Destination register, must already exist.
        dst: String,
        /// Right-hand operand.
        src: Operand,
    },
    /// `cmp lhs, rhs`
    Cmp {
        /// Left-hand operand.
        lhs: Operand,
        /// Right-hand operand.
        rhs: Operand,
    },
    /// `jmp`/`je`/`jne`/`jg`/`jge`/`jl`/`jle label`
    Jump {
        /// When the jump is taken.
        cond: Condition,
        /// Target label.
        label: String,
    },
    /// `call label`
    Call(String),
    /// `ret`
    Ret,
    /// `msg part, part, ...`
    Msg(Vec<MsgPart>),
    /// `end`
    End,
}

impl Instruction {
    /// The mnemonic this instruction was written with.
    #[must_use]
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            Instruction::Mov { .. } => Mnemonic::Mov,
            Instruction::Inc(_) => Mnemonic::Inc,
            Instruction::Dec(_) => Mnemonic::Dec,
            Instruction::Arith { op, .. } => op.mnemonic(),
            Instruction::Cmp { .. } => Mnemonic::Cmp,
            Instruction::Jump { cond, .. } => cond.mnemonic(),
            Instruction::Call(_) => Mnemonic::Call,
            Instruction::Ret => Mnemonic::Ret,
            Instruction::Msg(_) => Mnemonic::Msg,
            Instruction::End => Mnemonic::End,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic();
        match self {
            Instruction::Mov { dst, src } | Instruction::Arith { dst, src, .. } => {
                write!(f, "{} {}, {}", m, dst, src)
            }
            Instruction::Inc(reg) | Instruction::Dec(reg) => write!(f, "{} {}", m, reg),
            Instruction::Cmp { lhs, rhs } => write!(f, "{} {}, {}", m, lhs, rhs),
            Instruction::Jump { label, .. } | Instruction::Call(label) => {
                write!(f, "{} {}", m, label)
            }
            Instruction::Ret | Instruction::End => write!(f, "{}", m),
            Instruction::Msg(parts) => {
                write!(f, "{}", m)?;
                for (i, part) in parts.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{}", sep, part)?;
                }
                Ok(())
            }
        }
    }
}

/// A preprocessed program line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// Label declaration (`name:`). Never executes anything.
    Label {
        /// Label name without the colon.
        name: String,
        /// Source location.
        span: Span,
    },
    /// An executable instruction.
    Instruction {
        /// The parsed instruction.
        instruction: Instruction,
        /// Source location.
        span: Span,
    },
}

impl Statement {
    /// Source location of the statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Statement::Label { span, .. } | Statement::Instruction { span, .. } => *span,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Label { name, .. } => write!(f, "{}:", name),
            Statement::Instruction { instruction, .. } => write!(f, "{}", instruction),
        }
    }
}

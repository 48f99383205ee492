//! Parser producing IR statements from preprocessed lines.
//!
//! Each instruction line is mapped once to an [`Instruction`]: the mnemonic
//! is looked up in the closed [`Mnemonic`] set, the operand count is checked,
//! and every operand token is classified as a literal or a register name.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{InterpError, Span};
use crate::ir::{ArithOp, Condition, Instruction, Mnemonic, Operand, Statement};
use crate::lexer::{self, Token, TokenKind};
use crate::message;
use crate::preprocessor::{self, LineKind};

/// Parse a complete program into statements.
///
/// # Errors
///
/// Returns the first preprocessing or parse error in source order.
pub fn parse_program(source: &str) -> Result<Vec<Statement>, InterpError> {
    let lines = preprocessor::preprocess(source)?;
    let mut statements = Vec::with_capacity(lines.len());
    for line in lines {
        let stmt = match line.kind {
            LineKind::Label(name) => Statement::Label {
                name: String::from(name),
                span: line.span,
            },
            LineKind::Instruction(text) => Statement::Instruction {
                instruction: parse_instruction(text, line.span)?,
                span: line.span,
            },
        };
        statements.push(stmt);
    }
    Ok(statements)
}

/// Parse a single instruction line (no label, no comment).
///
/// `span` is the location of the first byte of `text`.
///
/// # Errors
///
/// - [`InterpError::UnknownMnemonic`] if the mnemonic is not in the set.
/// - [`InterpError::InvalidOperands`] for a wrong operand count or a literal
///   where a register or label is required.
/// - [`InterpError::MalformedOperand`] for an operand that is neither a
///   literal nor a name.
/// - [`InterpError::Syntax`] for an unterminated `msg` literal.
pub fn parse_instruction(text: &str, span: Span) -> Result<Instruction, InterpError> {
    let (name, rest) = lexer::split_mnemonic(text);
    let mnemonic = Mnemonic::from_name(name).ok_or_else(|| InterpError::UnknownMnemonic {
        mnemonic: String::from(name),
        span,
    })?;
    let rest_span = Span::new(span.line, span.col + (text.len() - rest.len()) as u32);

    let ops = lexer::tokenize(rest, rest_span);
    check_arity(mnemonic, &ops, span)?;

    let instr = match mnemonic {
        Mnemonic::Mov => Instruction::Mov {
            dst: register(mnemonic, &ops[0])?,
            src: value(&ops[1])?,
        },
        Mnemonic::Inc => Instruction::Inc(register(mnemonic, &ops[0])?),
        Mnemonic::Dec => Instruction::Dec(register(mnemonic, &ops[0])?),
        Mnemonic::Add => arith(ArithOp::Add, mnemonic, &ops)?,
        Mnemonic::Sub => arith(ArithOp::Sub, mnemonic, &ops)?,
        Mnemonic::Mul => arith(ArithOp::Mul, mnemonic, &ops)?,
        Mnemonic::Div => arith(ArithOp::Div, mnemonic, &ops)?,
        Mnemonic::Cmp => Instruction::Cmp {
            lhs: value(&ops[0])?,
            rhs: value(&ops[1])?,
        },
        Mnemonic::Jmp => jump(Condition::Always, mnemonic, &ops)?,
        Mnemonic::Je => jump(Condition::Equal, mnemonic, &ops)?,
        Mnemonic::Jne => jump(Condition::NotEqual, mnemonic, &ops)?,
        Mnemonic::Jge => jump(Condition::GreaterEqual, mnemonic, &ops)?,
        Mnemonic::Jg => jump(Condition::Greater, mnemonic, &ops)?,
        Mnemonic::Jle => jump(Condition::LessEqual, mnemonic, &ops)?,
        Mnemonic::Jl => jump(Condition::Less, mnemonic, &ops)?,
        Mnemonic::Call => Instruction::Call(label(mnemonic, &ops[0])?),
        Mnemonic::Ret => Instruction::Ret,
        Mnemonic::End => Instruction::End,
        Mnemonic::Msg => Instruction::Msg(message::scan(rest, rest_span)?),
    };
    Ok(instr)
}

fn check_arity(mnemonic: Mnemonic, ops: &[Token<'_>], span: Span) -> Result<(), InterpError> {
    let Some(expected) = mnemonic.arity() else {
        return Ok(());
    };
    if ops.len() == expected {
        return Ok(());
    }
    Err(InterpError::InvalidOperands {
        detail: format!(
            "'{}' expects {} operand{}, found {}",
            mnemonic,
            expected,
            if expected == 1 { "" } else { "s" },
            ops.len()
        ),
        span,
    })
}

fn arith(op: ArithOp, mnemonic: Mnemonic, ops: &[Token<'_>]) -> Result<Instruction, InterpError> {
    Ok(Instruction::Arith {
        op,
        dst: register(mnemonic, &ops[0])?,
        src: value(&ops[1])?,
    })
}

fn jump(cond: Condition, mnemonic: Mnemonic, ops: &[Token<'_>]) -> Result<Instruction, InterpError> {
    Ok(Instruction::Jump {
        cond,
        label: label(mnemonic, &ops[0])?,
    })
}

/// A value-producing operand: literal or register.
fn value(tok: &Token<'_>) -> Result<Operand, InterpError> {
    match tok.kind {
        TokenKind::Number(v) => Ok(Operand::Immediate(v)),
        TokenKind::Ident => Ok(Operand::Register(String::from(tok.text))),
        TokenKind::Invalid => Err(malformed(tok)),
    }
}

/// A destination operand: must name a register.
fn register(mnemonic: Mnemonic, tok: &Token<'_>) -> Result<String, InterpError> {
    match tok.kind {
        TokenKind::Ident => Ok(String::from(tok.text)),
        TokenKind::Number(_) => Err(InterpError::InvalidOperands {
            detail: format!(
                "'{}' needs a register destination, found literal {}",
                mnemonic, tok.text
            ),
            span: tok.span,
        }),
        TokenKind::Invalid => Err(malformed(tok)),
    }
}

fn label(mnemonic: Mnemonic, tok: &Token<'_>) -> Result<String, InterpError> {
    match tok.kind {
        TokenKind::Ident => Ok(String::from(tok.text)),
        TokenKind::Number(_) | TokenKind::Invalid => Err(InterpError::InvalidOperands {
            detail: format!("'{}' needs a label name, found '{}'", mnemonic, tok.text),
            span: tok.span,
        }),
    }
}

fn malformed(tok: &Token<'_>) -> InterpError {
    InterpError::MalformedOperand {
        operand: String::from(tok.text),
        span: tok.span,
    }
}

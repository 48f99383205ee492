//! Serde round-trip tests for `asm_interp` IR types.
//!
//! Validates that the public types serialize to JSON and deserialize back
//! to identical values.

#![cfg(feature = "serde")]

use asm_interp::{
    ArithOp, Comparison, Condition, ExecutionLimits, Instruction, InterpError, Mnemonic, MsgPart,
    Operand, Program, Span, Statement,
};

/// Helper: serialize to JSON, deserialize back, assert equality.
fn round_trip<T>(val: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + core::fmt::Debug,
{
    let json = serde_json::to_string(val).expect("serialize");
    let back: T = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(val, &back, "round-trip mismatch for JSON: {json}");
}

// ─── Span ───────────────────────────────────────────────────────────────────

#[test]
fn serde_span() {
    round_trip(&Span::new(3, 7));
    round_trip(&Span::default());
}

// ─── Operands and flags ─────────────────────────────────────────────────────

#[test]
fn serde_operand() {
    round_trip(&Operand::Immediate(-1));
    round_trip(&Operand::Immediate(i64::MAX));
    round_trip(&Operand::Register("acc".into()));
}

#[test]
fn serde_enums() {
    for m in Mnemonic::ALL {
        round_trip(&m);
    }
    for c in [Comparison::Equal, Comparison::Less, Comparison::Greater] {
        round_trip(&c);
    }
    for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
        round_trip(&op);
    }
    round_trip(&Condition::GreaterEqual);
}

// ─── Statements ─────────────────────────────────────────────────────────────

#[test]
fn serde_parsed_program_statements() {
    let program = Program::parse(
        "mov a, 5\ncall f\nmsg 'a = ', a, 1\nend\nf:\n  div a, -2\n  cmp a, 0\n  jle f\n  ret",
    )
    .unwrap();
    for stmt in program.statements() {
        round_trip(stmt);
    }
}

#[test]
fn serde_msg_instruction() {
    round_trip(&Instruction::Msg(vec![
        MsgPart::Text("x = ".into()),
        MsgPart::Value(Operand::Register("x".into())),
    ]));
    round_trip(&Statement::Label {
        name: "loop".into(),
        span: Span::new(2, 1),
    });
}

// ─── Errors and config ──────────────────────────────────────────────────────

#[test]
fn serde_errors() {
    round_trip(&InterpError::DivisionByZero {
        span: Span::new(4, 2),
    });
    round_trip(&InterpError::DuplicateLabel {
        label: "a".into(),
        span: Span::new(3, 1),
        first_span: Span::new(1, 1),
    });
    round_trip(&InterpError::ResourceLimitExceeded {
        resource: "steps".into(),
        limit: 100,
    });
}

#[test]
fn serde_limits() {
    round_trip(&ExecutionLimits::default());
    round_trip(&ExecutionLimits {
        max_steps: Some(1_000),
        max_call_depth: Some(16),
        max_source_bytes: 4096,
    });
}

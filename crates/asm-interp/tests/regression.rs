//! Edge-case tests for lexical and control-flow corners.
//!
//! Each test pins one behavior at the boundary of the language: quoting,
//! line layout, the initial flag, and integer corner cases.

use asm_interp::{interpret, InterpError, Program, Span, Statement};

/// A `;` inside a quoted `msg` literal is part of the text, not a comment.
#[test]
fn semicolon_inside_msg_literal() {
    assert_eq!(
        interpret("msg 'a; b', 1 ; trailing comment\nend").unwrap(),
        Some("a; b1".into())
    );
}

/// A `:` inside a quoted `msg` literal does not declare a label.
#[test]
fn colon_inside_msg_literal() {
    assert_eq!(
        interpret("mov t, 5\nmsg 'time: ', t\nend").unwrap(),
        Some("time: 5".into())
    );
}

/// `name: instruction` on one line yields a label and an instruction.
#[test]
fn label_and_instruction_on_one_line() {
    let program = Program::parse("mov a, 0\nloop: inc a\ncmp a, 3\njne loop\nmsg a\nend").unwrap();
    assert!(matches!(&program.statements()[1], Statement::Label { name, .. } if name == "loop"));
    assert_eq!(program.statements()[2].span(), Span::new(2, 7));
    assert_eq!(program.run().unwrap(), Some("3".into()));
}

/// Windows line endings are accepted.
#[test]
fn crlf_line_endings() {
    assert_eq!(
        interpret("mov a, 2\r\nmul a, 21\r\nmsg a\r\nend\r\n").unwrap(),
        Some("42".into())
    );
}

/// Before any `cmp` the flag reads as Equal.
#[test]
fn jump_before_any_cmp_sees_equal() {
    assert_eq!(
        interpret("je eq\nmsg 'not equal'\nend\neq:\nmsg 'equal'\nend").unwrap(),
        Some("equal".into())
    );
    assert_eq!(
        interpret("jne ne\nmsg 'equal'\nend\nne:\nmsg 'not equal'\nend").unwrap(),
        Some("equal".into())
    );
}

/// A missing label is only an error when the jump is taken.
#[test]
fn untaken_jump_to_missing_label() {
    assert_eq!(
        interpret("mov a, 1\ncmp a, 0\njl missing\nmsg 'ok'\nend").unwrap(),
        Some("ok".into())
    );
    assert!(matches!(
        interpret("mov a, 1\ncmp a, 0\njg missing\nmsg 'ok'\nend"),
        Err(InterpError::UndefinedLabel { .. })
    ));
}

/// `ret` resumes at the statement after the `call`.
#[test]
fn ret_resumes_after_call() {
    assert_eq!(
        interpret("mov n, 0\ncall f\ncall f\nmsg n\nend\nf:\ninc n\nret").unwrap(),
        Some("2".into())
    );
}

/// `div` by a negative divisor rounds toward zero.
#[test]
fn div_rounds_toward_zero() {
    assert_eq!(
        interpret("mov a, 7\ndiv a, -2\nmsg a\nend").unwrap(),
        Some("-3".into())
    );
}

/// `i64::MIN / -1` wraps to `i64::MIN`.
#[test]
fn div_min_by_minus_one_wraps() {
    assert_eq!(
        interpret("mov a, -9223372036854775808\ndiv a, -1\nmsg a\nend").unwrap(),
        Some("-9223372036854775808".into())
    );
}

/// `msg` operands may be separated by bare commas.
#[test]
fn msg_without_spaces() {
    assert_eq!(
        interpret("mov a,5\nmsg a,'! = ',a\nend").unwrap(),
        Some("5! = 5".into())
    );
}

/// Mnemonics are matched without regard to case.
#[test]
fn mnemonics_are_case_insensitive() {
    assert_eq!(
        interpret("MOV a, 1\nInc a\nMSG a\nEND").unwrap(),
        Some("2".into())
    );
}

/// Register names are case-sensitive: `A` and `a` are distinct.
#[test]
fn registers_are_case_sensitive() {
    assert!(matches!(
        interpret("mov a, 1\nmsg A\nend"),
        Err(InterpError::UndefinedRegister { ref register, .. }) if register == "A"
    ));
}

/// A faulting instruction leaves its destination unchanged.
#[test]
fn failed_instruction_leaves_state_untouched() {
    let program = Program::parse("mov a, 9\ndiv a, 0").unwrap();
    let mut machine = asm_interp::Machine::new(&program);
    assert!(machine.run().is_err());
    assert_eq!(machine.register("a"), Some(9));
}

/// An empty quoted literal renders as nothing.
#[test]
fn empty_msg_literal() {
    assert_eq!(interpret("msg ''\nend").unwrap(), Some(String::new()));
}

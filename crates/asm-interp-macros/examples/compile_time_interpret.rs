//! Compile-time evaluation with `interpret!` and `interpret_str!`.
//!
//! These macros run a program while the crate compiles, producing
//! `Option<&'static str>` or `&'static str` constants with zero runtime
//! overhead.
//!
//! Run with: `cargo run --example compile_time_interpret -p asm-interp-macros`

use asm_interp_macros::{interpret, interpret_str};

// ── Compile-time constants ──────────────────────────────────────────────

/// Term 8 of the Fibonacci series, computed at compile time.
const FIB: &str = interpret_str!(
    "
mov   a, 8
mov   b, 0
mov   c, 0
mov   d, 0
mov   e, 1
call  proc_fib
call  print
end

proc_fib:
    cmp   c, 2
    jl    func_0
    mov   b, d
    add   b, e
    mov   d, e
    mov   e, b
    inc   c
    cmp   c, a
    jle   proc_fib
    ret

func_0:
    mov   b, c
    inc   c
    jmp   proc_fib

print:
    msg   'Term ', a, ' of Fibonacci series is: ', b
    ret
"
);

/// Greatest common divisor by repeated subtraction.
const GCD: &str = interpret_str!(
    "
mov a, 81
mov b, 153
loop:
    cmp a, b
    je done
    jg a_bigger
    sub b, a
    jmp loop
a_bigger:
    sub a, b
    jmp loop
done:
    msg 'gcd = ', a
    end
"
);

/// A program that never reaches `end`.
const NO_END: Option<&str> = interpret!("call f\nf:\nmsg 'unreachable result'");

fn main() {
    println!("=== compile-time interpretation ===\n");
    println!("fib:    {FIB}");
    println!("gcd:    {GCD}");
    println!("no end: {NO_END:?}");
}

#![no_main]
use libfuzzer_sys::fuzz_target;

use asm_interp::{ExecutionLimits, Interpreter, Machine, Program};

fuzz_target!(|data: &str| {
    // Bounded end-to-end run: must never panic, only return Ok/Err.
    let mut interp = Interpreter::new();
    interp.limits(ExecutionLimits {
        max_steps: Some(100_000),
        max_call_depth: Some(1_024),
        max_source_bytes: 1 << 16,
    });
    let _ = interp.run(data);

    // Single-step a second machine: the program counter never moves past
    // one-beyond-the-end and the step limit holds.
    let Ok(program) = Program::parse(data) else {
        return;
    };
    let _ = program.listing();
    let mut machine = Machine::with_limits(&program, interp.current_limits());
    while let Ok(asm_interp::Step::Continue) = machine.step() {
        assert!(machine.pc() <= program.len());
    }
    assert!(machine.steps() <= 100_000);
});

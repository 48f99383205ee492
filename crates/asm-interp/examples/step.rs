//! Single-stepping example: prints a program listing, then executes it one
//! statement at a time and dumps the machine state after each step.
//!
//! Run with: `cargo run --example step`

use asm_interp::{Interpreter, Step};

const SOURCE: &str = "
mov   a, 11           ; value1
mov   b, 3            ; value2
call  mod_func
msg   'mod(', a, ', ', b, ') = ', d
end

mod_func:
    mov   c, a
    div   c, b
    mul   c, b
    mov   d, a
    sub   d, c
    ret
";

fn main() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init();

    let interp = Interpreter::new();
    let program = match interp.parse(SOURCE) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("parse error: {e}");
            std::process::exit(1);
        }
    };

    println!("Listing:");
    for line in program.listing().lines() {
        println!("   {}", line);
    }

    println!("\nLabels:");
    for (name, index) in program.labels().iter() {
        println!("   {}: {}", name, index);
    }

    println!("\nTrace:");
    let mut machine = interp.machine(&program);
    loop {
        let pc = machine.pc();
        let step = match machine.step() {
            Ok(step) => step,
            Err(e) => {
                eprintln!("   error: {e}");
                std::process::exit(1);
            }
        };
        let regs: Vec<String> = machine
            .registers()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!(
            "   {:>3} -> {:>3}  flag={:<7} depth={}  [{}]",
            pc,
            machine.pc(),
            format!("{:?}", machine.comparison()),
            machine.call_depth(),
            regs.join(" ")
        );
        match step {
            Step::Continue => {}
            Step::Halted => {
                println!("\nResult: {:?}", machine.result().unwrap_or_default());
                break;
            }
            Step::FellOff => {
                println!("\nRan past the last line without `end`.");
                break;
            }
        }
    }
    println!("Steps: {}", machine.steps());
}

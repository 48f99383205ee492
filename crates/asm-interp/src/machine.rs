//! Execution engine: register store, comparison flag, call stack, and the
//! program-counter-driven dispatch loop.
//!
//! A [`Machine`] borrows an immutable [`Program`] and owns all mutable run
//! state, so independent machines over the same program never interfere.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::error::{InterpError, Span};
use crate::interpreter::{ExecutionLimits, Program};
use crate::ir::{ArithOp, Comparison, Instruction, Operand, Statement, Word};
use crate::message;

/// Named integer registers.
///
/// A register comes into existence on its first `mov`. Reading or updating
/// one that was never assigned fails with [`InterpError::UndefinedRegister`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    regs: BTreeMap<String, Word>,
}

impl Registers {
    /// Create an empty register store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `name`, if assigned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Word> {
        self.regs.get(name).copied()
    }

    /// Assign `value` to `name`, creating the register if needed.
    pub fn set(&mut self, name: &str, value: Word) {
        match self.regs.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.regs.insert(String::from(name), value);
            }
        }
    }

    /// Read `name`, reporting `span` if it was never assigned.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::UndefinedRegister`].
    pub fn read(&self, name: &str, span: Span) -> Result<Word, InterpError> {
        self.get(name).ok_or_else(|| InterpError::UndefinedRegister {
            register: String::from(name),
            span,
        })
    }

    /// Resolve an operand to its integer value. Has no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::UndefinedRegister`] for an unassigned register.
    pub fn resolve(&self, op: &Operand, span: Span) -> Result<Word, InterpError> {
        match op {
            Operand::Immediate(v) => Ok(*v),
            Operand::Register(name) => self.read(name, span),
        }
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Word)> + '_ {
        self.regs.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of assigned registers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Whether no register has been assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }
}

/// What a single [`Machine::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A statement executed; more may follow.
    Continue,
    /// `end` executed. The result is available from [`Machine::result`].
    Halted,
    /// The program counter left the program without reaching `end`.
    FellOff,
}

/// Where control goes after an instruction.
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// Interpreter state for one run of a [`Program`].
#[derive(Debug, Clone)]
pub struct Machine<'p> {
    program: &'p Program,
    limits: ExecutionLimits,
    registers: Registers,
    flag: Comparison,
    call_stack: Vec<usize>,
    pc: usize,
    result: Option<String>,
    steps: u64,
    halted: bool,
}

impl<'p> Machine<'p> {
    /// Create a machine positioned at the first statement, with no limits.
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self::with_limits(program, ExecutionLimits::default())
    }

    /// Create a machine that enforces `limits`.
    #[must_use]
    pub fn with_limits(program: &'p Program, limits: ExecutionLimits) -> Self {
        Self {
            program,
            limits,
            registers: Registers::new(),
            flag: Comparison::default(),
            call_stack: Vec::new(),
            pc: 0,
            result: None,
            steps: 0,
            halted: false,
        }
    }

    /// Index of the next statement to execute.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// The register store.
    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Current value of one register.
    #[must_use]
    pub fn register(&self, name: &str) -> Option<Word> {
        self.registers.get(name)
    }

    /// The comparison flag set by the last `cmp`.
    #[must_use]
    pub fn comparison(&self) -> Comparison {
        self.flag
    }

    /// Number of pending return addresses.
    #[must_use]
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    /// The text of the last executed `msg`, if any.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Statements executed so far, label declarations included.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether `end` has executed.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Run until `end` or until the program counter leaves the program.
    ///
    /// Returns `Some(result)` when `end` executed (the empty string if no
    /// `msg` ran before it) and `None` when execution fell off the program.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error, or
    /// [`InterpError::ResourceLimitExceeded`] when a configured limit trips.
    pub fn run(&mut self) -> Result<Option<String>, InterpError> {
        loop {
            match self.step()? {
                Step::Continue => {}
                Step::Halted => {
                    debug!("halted after {} steps", self.steps);
                    return Ok(Some(self.result.clone().unwrap_or_default()));
                }
                Step::FellOff => {
                    debug!(
                        "fell off the program at pc {} after {} steps",
                        self.pc, self.steps
                    );
                    return Ok(None);
                }
            }
        }
    }

    /// Execute one statement.
    ///
    /// # Errors
    ///
    /// See [`Machine::run`].
    pub fn step(&mut self) -> Result<Step, InterpError> {
        if self.halted {
            return Ok(Step::Halted);
        }
        let program = self.program;
        let Some(stmt) = program.statements().get(self.pc) else {
            return Ok(Step::FellOff);
        };

        if let Some(max) = self.limits.max_steps {
            if self.steps >= max {
                return Err(InterpError::ResourceLimitExceeded {
                    resource: String::from("steps"),
                    limit: max,
                });
            }
        }
        self.steps += 1;

        let (instruction, span) = match stmt {
            Statement::Label { .. } => {
                self.pc += 1;
                return Ok(Step::Continue);
            }
            Statement::Instruction { instruction, span } => (instruction, *span),
        };

        trace!("{:>4} [{}] {}", self.pc, span, instruction);

        match self.exec(instruction, span)? {
            Flow::Next => self.pc += 1,
            Flow::Jump(target) => self.pc = target,
            Flow::Halt => {
                self.halted = true;
                return Ok(Step::Halted);
            }
        }
        Ok(Step::Continue)
    }

    fn exec(&mut self, instruction: &Instruction, span: Span) -> Result<Flow, InterpError> {
        match instruction {
            Instruction::Mov { dst, src } => {
                let v = self.registers.resolve(src, span)?;
                self.registers.set(dst, v);
            }
            Instruction::Inc(reg) => {
                let v = self.registers.read(reg, span)?;
                self.registers.set(reg, v.wrapping_add(1));
            }
            Instruction::Dec(reg) => {
                let v = self.registers.read(reg, span)?;
                self.registers.set(reg, v.wrapping_sub(1));
            }
            Instruction::Arith { op, dst, src } => {
                let lhs = self.registers.read(dst, span)?;
                let rhs = self.registers.resolve(src, span)?;
                let v = match op {
                    ArithOp::Add => lhs.wrapping_add(rhs),
                    ArithOp::Sub => lhs.wrapping_sub(rhs),
                    ArithOp::Mul => lhs.wrapping_mul(rhs),
                    ArithOp::Div => {
                        if rhs == 0 {
                            return Err(InterpError::DivisionByZero { span });
                        }
                        lhs.wrapping_div(rhs)
                    }
                };
                self.registers.set(dst, v);
            }
            Instruction::Cmp { lhs, rhs } => {
                let a = self.registers.resolve(lhs, span)?;
                let b = self.registers.resolve(rhs, span)?;
                self.flag = Comparison::from(a.cmp(&b));
            }
            Instruction::Jump { cond, label } => {
                if cond.holds(self.flag) {
                    return Ok(Flow::Jump(self.program.labels().resolve(label, span)?));
                }
            }
            Instruction::Call(label) => {
                let target = self.program.labels().resolve(label, span)?;
                if let Some(max) = self.limits.max_call_depth {
                    if self.call_stack.len() >= max {
                        return Err(InterpError::ResourceLimitExceeded {
                            resource: String::from("call depth"),
                            limit: max as u64,
                        });
                    }
                }
                self.call_stack.push(self.pc + 1);
                return Ok(Flow::Jump(target));
            }
            Instruction::Ret => {
                let ret = self
                    .call_stack
                    .pop()
                    .ok_or(InterpError::EmptyCallStack { span })?;
                return Ok(Flow::Jump(ret));
            }
            Instruction::Msg(parts) => {
                let registers = &self.registers;
                let text = message::render(parts, |op| registers.resolve(op, span))?;
                self.result = Some(text);
            }
            Instruction::End => return Ok(Flow::Halt),
        }
        Ok(Flow::Next)
    }
}

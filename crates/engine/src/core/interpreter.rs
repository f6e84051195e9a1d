//! Single-Cycle Interpreter.
//!
//! This module runs one scan of a loaded program. It performs:
//! 1. **Fetch/Decode/Execute:** A PC-driven loop over [`Op`]s starting at PC 0.
//! 2. **Control Flow:** Conditional skips with "unless" semantics and jumps by
//!    absolute index; no call stack.
//! 3. **Anomaly Handling:** Division by zero, unsupported opcodes and bad
//!    operands are counted, logged and skipped; a cycle never panics.
//!
//! The interpreter never loops cycles itself and has no notion of wall-clock
//! time; pacing is the host's job.

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::core::memory::Memory;
use crate::core::program::Program;
use crate::isa::decode::{Op, decode};
use crate::isa::disasm::disassemble;
use crate::stats::CycleStats;

/// How a cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The end-of-program marker was executed.
    Completed,
    /// The PC moved past the last instruction slot.
    RanOffEnd,
    /// The configured step limit was reached.
    WatchdogTripped {
        /// Instructions executed before the cycle was cut short.
        steps: u64,
    },
    /// A jump named an instruction that does not exist.
    InvalidJump {
        /// Location of the jump.
        pc: usize,
        /// Raw target operand.
        target: i16,
    },
}

/// Control-flow effect of one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Next,
    Jump(i16),
    End,
}

/// Interpreter state: program, memory and statistics.
///
/// Each instance is fully independent, so several programs (or several
/// copies of one program) can run side by side.
#[derive(Clone, Debug)]
pub struct Interpreter {
    program: Program,
    memory: Memory,
    stats: CycleStats,
    trace: bool,
    max_steps: Option<u64>,
    /// Per-PC flag so each faulting location warns once, not every cycle.
    reported: Box<[bool]>,
}

impl Interpreter {
    /// Creates an interpreter with zero-initialised memory sized from `config`.
    pub fn new(program: Program, config: &Config) -> Self {
        Self::with_memory(program, Memory::from_config(&config.memory), config)
    }

    /// Creates an interpreter over existing memory.
    ///
    /// # Arguments
    ///
    /// * `program` - Validated program.
    /// * `memory` - Memory banks; contents are kept.
    /// * `config` - Supplies tracing and watchdog settings.
    pub fn with_memory(program: Program, memory: Memory, config: &Config) -> Self {
        let reported = vec![false; program.len()].into_boxed_slice();
        Self {
            program,
            memory,
            stats: CycleStats::default(),
            trace: config.general.trace_instructions,
            max_steps: config.engine.max_steps_per_cycle,
            reported,
        }
    }

    /// Loaded program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Memory banks.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable memory banks, for host I/O between cycles.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Swaps in a new program, keeping memory and statistics.
    ///
    /// # Returns
    ///
    /// The program that was replaced.
    pub fn replace_program(&mut self, program: Program) -> Program {
        self.reported = vec![false; program.len()].into_boxed_slice();
        std::mem::replace(&mut self.program, program)
    }

    /// Executes exactly one scan of the program.
    ///
    /// The PC starts at 0 and advances by one after every instruction unless
    /// the instruction assigns it. The cycle ends at the end-of-program
    /// marker or when the PC passes the last slot.
    pub fn interpret_one_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;
        let len = self.program.len();
        let mut pc = 0usize;
        let mut steps = 0u64;

        loop {
            let Some(&inst) = self.program.get(pc) else {
                self.stats.ran_off_end += 1;
                debug!(pc, "cycle ran past the last instruction slot");
                return CycleOutcome::RanOffEnd;
            };
            if let Some(limit) = self.max_steps {
                if steps >= limit {
                    self.stats.watchdog_trips += 1;
                    warn!(limit, pc, "step watchdog tripped; cycle cut short");
                    return CycleOutcome::WatchdogTripped { steps };
                }
            }
            steps += 1;
            self.stats.instructions += 1;

            if self.trace {
                trace!(pc, "{pc:03x}: {}", disassemble(&inst));
            }

            match self.execute(pc, decode(&inst)) {
                Flow::Next => pc += 1,
                Flow::End => return CycleOutcome::Completed,
                Flow::Jump(target) => match usize::try_from(target) {
                    Ok(next) if next < len => {
                        self.stats.jumps_taken += 1;
                        pc = next;
                    }
                    _ => {
                        self.stats.address_faults += 1;
                        warn!(pc, target, "jump target outside program; cycle aborted");
                        return CycleOutcome::InvalidJump { pc, target };
                    }
                },
            }
        }
    }

    /// Executes one decoded instruction against memory.
    fn execute(&mut self, pc: usize, op: Op) -> Flow {
        let mem = &mut self.memory;
        let ok = match op {
            Op::WriteBit { dst, value } => mem.store_bit(dst, value),
            Op::CopyBit { dst, src } => match mem.load_bit(src) {
                Some(v) => mem.store_bit(dst, v),
                None => false,
            },
            Op::SetLiteral { dst, value } => mem.store_int(dst, value),
            Op::SetVariable { dst, src } => match mem.load_int(src) {
                Some(v) => mem.store_int(dst, v),
                None => false,
            },
            Op::Step { dst, delta } => match mem.load_int(dst) {
                Some(v) => mem.store_int(dst, v.wrapping_add(delta)),
                None => false,
            },
            Op::Arith {
                kind,
                dst,
                lhs,
                rhs,
            } => match (mem.load_int(lhs), mem.load_int(rhs)) {
                (Some(a), Some(b)) => match kind.apply(a, b) {
                    Some(v) => mem.store_int(dst, v),
                    None => {
                        self.stats.div_by_zero += 1;
                        debug!(pc, divisor = rhs, "division by zero skipped");
                        true
                    }
                },
                _ => false,
            },
            Op::UnlessBit {
                bit,
                expect,
                target,
            } => {
                return match mem.load_bit(bit) {
                    Some(v) if v == expect => Flow::Next,
                    Some(_) => Flow::Jump(target),
                    None => self.operand_fault(pc),
                };
            }
            Op::UnlessLiteral {
                cmp,
                var,
                literal,
                target,
            } => {
                return match mem.load_int(var) {
                    Some(v) if cmp.holds(v, literal) => Flow::Next,
                    Some(_) => Flow::Jump(target),
                    None => self.operand_fault(pc),
                };
            }
            Op::UnlessCompare {
                cmp,
                lhs,
                rhs,
                target,
            } => {
                return match (mem.load_int(lhs), mem.load_int(rhs)) {
                    (Some(a), Some(b)) if cmp.holds(a, b) => Flow::Next,
                    (Some(_), Some(_)) => Flow::Jump(target),
                    _ => self.operand_fault(pc),
                };
            }
            Op::Jump { target } => return Flow::Jump(target),
            Op::End => return Flow::End,
            Op::Marker { .. } => true,
            Op::Unsupported { op } => {
                self.stats.unsupported_ops += 1;
                if self.first_report(pc) {
                    warn!(
                        pc,
                        op, "unsupported op (peripheral) for interpretable target; skipped"
                    );
                }
                true
            }
        };
        if ok { Flow::Next } else { self.operand_fault(pc) }
    }

    /// Records an operand outside memory; the instruction has no effect.
    fn operand_fault(&mut self, pc: usize) -> Flow {
        self.stats.address_faults += 1;
        if self.first_report(pc) {
            warn!(pc, "operand outside memory; instruction skipped");
        }
        Flow::Next
    }

    /// Returns true the first time `pc` reports an anomaly.
    fn first_report(&mut self, pc: usize) -> bool {
        match self.reported.get_mut(pc) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }
}

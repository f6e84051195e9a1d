//! Validated instruction arrays.
//!
//! A [`Program`] is immutable once built. Construction checks everything the
//! interpreter would otherwise have to trust:
//! 1. **Capacity:** The instruction count fits the configured slot count.
//! 2. **Termination:** Exactly one end-of-program marker is present.
//! 3. **Control Flow:** Every jump target indexes an instruction.
//! 4. **Operands:** Every memory operand of an implemented opcode fits its bank.
//!
//! Unsupported opcodes are accepted; their operands are never interpreted.

use std::ops::Index;

use crate::common::{Bank, ProgramError};
use crate::config::MemoryConfig;
use crate::isa::decode::{Op, decode};
use crate::isa::disasm::{self, Listing};
use crate::isa::instruction::Instruction;

/// Loaded, validated instruction array indexed by program counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    insts: Box<[Instruction]>,
}

impl Program {
    /// Validates an instruction array against the memory geometry.
    ///
    /// # Arguments
    ///
    /// * `insts` - Instructions in PC order.
    /// * `memory` - Bank and slot capacities the program must fit.
    ///
    /// # Returns
    ///
    /// The program, or the first [`ProgramError`] found in PC order.
    pub fn new(insts: Vec<Instruction>, memory: &MemoryConfig) -> Result<Self, ProgramError> {
        let len = insts.len();
        if len > memory.program_capacity {
            return Err(ProgramError::TooLarge {
                len,
                capacity: memory.program_capacity,
            });
        }

        let ends = insts.iter().filter(|i| decode(i) == Op::End).count();
        if ends != 1 {
            return Err(ProgramError::EndMarkerCount(ends));
        }

        for (pc, inst) in insts.iter().enumerate() {
            let op = decode(inst);
            if let Some(target) = op.jump_target() {
                if !usize::try_from(target).is_ok_and(|t| t < len) {
                    return Err(ProgramError::JumpOutOfRange { pc, target, len });
                }
            }
            for (bank, addr) in op.operands() {
                let capacity = match bank {
                    Bank::Bit => memory.bits,
                    Bank::Int => memory.integers,
                };
                if !usize::try_from(addr).is_ok_and(|a| a < capacity) {
                    return Err(ProgramError::AddressOutOfRange {
                        pc,
                        bank,
                        addr,
                        capacity,
                    });
                }
            }
        }

        Ok(Self {
            insts: insts.into_boxed_slice(),
        })
    }

    /// Instructions in PC order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.insts
    }

    /// Number of instruction slots in use.
    pub const fn len(&self) -> usize {
        self.insts.len()
    }

    /// True when the program holds no instructions.
    pub const fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    /// Fetches the instruction at `pc`.
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.insts.get(pc)
    }

    /// Debug listing of the program.
    pub fn disassemble(&self) -> Listing {
        disasm::disassemble_program(&self.insts)
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, pc: usize) -> &Instruction {
        &self.insts[pc]
    }
}

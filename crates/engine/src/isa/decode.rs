//! Instruction decoder.
//!
//! Turns a raw [`Instruction`] record into an [`Op`], a sum type grouped by
//! operand shape rather than by opcode number. The interpreter, the
//! disassembler and program validation all work from `Op`, so the meaning of
//! each record field is fixed in exactly one place.

use crate::common::Bank;
use crate::isa::instruction::Instruction;
use crate::isa::opcodes;

/// Three-address arithmetic operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithKind {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication.
    Mul,
    /// Truncating division; skipped on a zero divisor.
    Div,
    /// Remainder; skipped on a zero divisor.
    Mod,
}

impl ArithKind {
    /// Operator symbol used by the disassembler.
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Mod => '%',
        }
    }

    /// Applies the operation.
    ///
    /// # Returns
    ///
    /// `None` when the divisor of `Div` or `Mod` is zero; the destination
    /// must then be left unchanged. `i32::MIN / -1` wraps instead of faulting.
    pub const fn apply(self, lhs: i32, rhs: i32) -> Option<i32> {
        match self {
            Self::Add => Some(lhs.wrapping_add(rhs)),
            Self::Sub => Some(lhs.wrapping_sub(rhs)),
            Self::Mul => Some(lhs.wrapping_mul(rhs)),
            Self::Div => {
                if rhs == 0 {
                    None
                } else {
                    Some(lhs.wrapping_div(rhs))
                }
            }
            Self::Mod => {
                if rhs == 0 {
                    None
                } else {
                    Some(lhs.wrapping_rem(rhs))
                }
            }
        }
    }
}

/// Integer comparison used by conditional opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compare {
    /// `<`
    Lt,
    /// `==`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `!=`
    Ne,
}

impl Compare {
    /// Evaluates `lhs <cmp> rhs`.
    pub const fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Eq => lhs == rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Le => lhs <= rhs,
            Self::Ne => lhs != rhs,
        }
    }

    /// Operator text used by the disassembler.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Ne => "!=",
        }
    }
}

/// Compiler address-fixup marker kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Forward address allocated.
    AllocFwdAddr,
    /// Known address allocated.
    AllocKnownAddr,
    /// Forward address resolved at this point.
    FwdAddrIsNow,
}

impl MarkerKind {
    /// Mnemonic used by the disassembler.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::AllocFwdAddr => "INT_AllocFwdAddr",
            Self::AllocKnownAddr => "INT_AllocKnownAddr",
            Self::FwdAddrIsNow => "INT_FwdAddrIsNow",
        }
    }
}

/// Decoded instruction.
///
/// Addresses keep the raw signed 16-bit operand; memory access resolves them
/// with bounds checks. Conditionals carry "unless" semantics: when the
/// condition does **not** hold the program counter becomes `target`,
/// otherwise execution falls through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// `bits[dst] := value`
    WriteBit {
        /// Destination bit.
        dst: i16,
        /// Constant written.
        value: bool,
    },
    /// `bits[dst] := bits[src]`
    CopyBit {
        /// Destination bit.
        dst: i16,
        /// Source bit.
        src: i16,
    },
    /// `int16s[dst] := value`
    SetLiteral {
        /// Destination variable.
        dst: i16,
        /// Immediate.
        value: i32,
    },
    /// `int16s[dst] := int16s[src]`
    SetVariable {
        /// Destination variable.
        dst: i16,
        /// Source variable.
        src: i16,
    },
    /// `int16s[dst] += delta` with `delta` of +1 or -1.
    Step {
        /// Variable adjusted in place.
        dst: i16,
        /// Signed step.
        delta: i32,
    },
    /// `int16s[dst] := int16s[lhs] <kind> int16s[rhs]`
    Arith {
        /// Operation.
        kind: ArithKind,
        /// Destination variable.
        dst: i16,
        /// Left operand variable.
        lhs: i16,
        /// Right operand variable (divisor for `Div`/`Mod`).
        rhs: i16,
    },
    /// Unless `bits[bit] == expect`, jump to `target`.
    UnlessBit {
        /// Tested bit.
        bit: i16,
        /// Required state for fall-through.
        expect: bool,
        /// Jump target.
        target: i16,
    },
    /// Unless `int16s[var] <cmp> literal`, jump to `target`.
    UnlessLiteral {
        /// Comparison.
        cmp: Compare,
        /// Tested variable.
        var: i16,
        /// Immediate right-hand side.
        literal: i32,
        /// Jump target.
        target: i16,
    },
    /// Unless `int16s[lhs] <cmp> int16s[rhs]`, jump to `target`.
    UnlessCompare {
        /// Comparison.
        cmp: Compare,
        /// Left variable.
        lhs: i16,
        /// Right variable.
        rhs: i16,
        /// Jump target.
        target: i16,
    },
    /// Unconditional jump.
    Jump {
        /// Jump target.
        target: i16,
    },
    /// End of the cycle.
    End,
    /// Compiler fixup marker; no run-time effect.
    Marker {
        /// Marker kind.
        kind: MarkerKind,
        /// Label operand (`name1`).
        label: i16,
    },
    /// Opcode with no interpretable meaning (peripherals and unknown values).
    Unsupported {
        /// Raw opcode.
        op: i16,
    },
}

/// Decodes a raw instruction record.
///
/// Decoding never fails: opcodes this interpreter does not implement become
/// [`Op::Unsupported`] and are skipped at run time.
pub const fn decode(inst: &Instruction) -> Op {
    let Instruction {
        op,
        name1,
        name2,
        name3,
        literal1,
    } = *inst;
    match op {
        opcodes::SET_BIT => Op::WriteBit {
            dst: name1,
            value: true,
        },
        opcodes::CLEAR_BIT => Op::WriteBit {
            dst: name1,
            value: false,
        },
        opcodes::COPY_BIT_TO_BIT => Op::CopyBit {
            dst: name1,
            src: name2,
        },
        opcodes::SET_VARIABLE_TO_LITERAL => Op::SetLiteral {
            dst: name1,
            value: literal1,
        },
        opcodes::SET_VARIABLE_TO_VARIABLE => Op::SetVariable {
            dst: name1,
            src: name2,
        },
        opcodes::INCREMENT_VARIABLE => Op::Step {
            dst: name1,
            delta: 1,
        },
        opcodes::DECREMENT_VARIABLE => Op::Step {
            dst: name1,
            delta: -1,
        },
        opcodes::SET_VARIABLE_ADD => arith(ArithKind::Add, inst),
        opcodes::SET_VARIABLE_SUBTRACT => arith(ArithKind::Sub, inst),
        opcodes::SET_VARIABLE_MULTIPLY => arith(ArithKind::Mul, inst),
        opcodes::SET_VARIABLE_DIVIDE => arith(ArithKind::Div, inst),
        opcodes::SET_VARIABLE_MOD => arith(ArithKind::Mod, inst),
        opcodes::IF_BIT_SET => Op::UnlessBit {
            bit: name1,
            expect: true,
            target: name3,
        },
        opcodes::IF_BIT_CLEAR => Op::UnlessBit {
            bit: name1,
            expect: false,
            target: name3,
        },
        opcodes::IF_VARIABLE_LES_LITERAL => Op::UnlessLiteral {
            cmp: Compare::Lt,
            var: name1,
            literal: literal1,
            target: name3,
        },
        opcodes::IF_VARIABLE_EQUALS_VARIABLE => compare(Compare::Eq, inst),
        opcodes::IF_VARIABLE_GRT_VARIABLE => compare(Compare::Gt, inst),
        opcodes::IF_GEQ => compare(Compare::Ge, inst),
        opcodes::IF_LEQ => compare(Compare::Le, inst),
        opcodes::IF_NEQ => compare(Compare::Ne, inst),
        opcodes::ELSE => Op::Jump { target: name3 },
        opcodes::END_OF_PROGRAM => Op::End,
        opcodes::ALLOC_FWD_ADDR => marker(MarkerKind::AllocFwdAddr, inst),
        opcodes::ALLOC_KNOWN_ADDR => marker(MarkerKind::AllocKnownAddr, inst),
        opcodes::FWD_ADDR_IS_NOW => marker(MarkerKind::FwdAddrIsNow, inst),
        _ => Op::Unsupported { op },
    }
}

const fn arith(kind: ArithKind, inst: &Instruction) -> Op {
    Op::Arith {
        kind,
        dst: inst.name1,
        lhs: inst.name2,
        rhs: inst.name3,
    }
}

const fn compare(cmp: Compare, inst: &Instruction) -> Op {
    Op::UnlessCompare {
        cmp,
        lhs: inst.name1,
        rhs: inst.name2,
        target: inst.name3,
    }
}

const fn marker(kind: MarkerKind, inst: &Instruction) -> Op {
    Op::Marker {
        kind,
        label: inst.name1,
    }
}

impl Op {
    /// Jump target carried by conditionals and jumps.
    pub const fn jump_target(&self) -> Option<i16> {
        match *self {
            Self::UnlessBit { target, .. }
            | Self::UnlessLiteral { target, .. }
            | Self::UnlessCompare { target, .. }
            | Self::Jump { target } => Some(target),
            _ => None,
        }
    }

    /// Memory operands touched by this operation, qualified by bank.
    ///
    /// Used by program validation; at most three operands exist.
    pub fn operands(&self) -> impl Iterator<Item = (Bank, i16)> {
        let ops: [Option<(Bank, i16)>; 3] = match *self {
            Self::WriteBit { dst, .. } => [Some((Bank::Bit, dst)), None, None],
            Self::CopyBit { dst, src } => [Some((Bank::Bit, dst)), Some((Bank::Bit, src)), None],
            Self::SetLiteral { dst, .. } | Self::Step { dst, .. } => {
                [Some((Bank::Int, dst)), None, None]
            }
            Self::SetVariable { dst, src } => {
                [Some((Bank::Int, dst)), Some((Bank::Int, src)), None]
            }
            Self::Arith { dst, lhs, rhs, .. } => [
                Some((Bank::Int, dst)),
                Some((Bank::Int, lhs)),
                Some((Bank::Int, rhs)),
            ],
            Self::UnlessBit { bit, .. } => [Some((Bank::Bit, bit)), None, None],
            Self::UnlessLiteral { var, .. } => [Some((Bank::Int, var)), None, None],
            Self::UnlessCompare { lhs, rhs, .. } => {
                [Some((Bank::Int, lhs)), Some((Bank::Int, rhs)), None]
            }
            Self::Jump { .. } | Self::End | Self::Marker { .. } | Self::Unsupported { .. } => {
                [None, None, None]
            }
        };
        ops.into_iter().flatten()
    }
}

//! Instruction record encoding.
//!
//! An instruction is a fixed 12-byte record: four little-endian `i16` fields
//! (`op`, `name1`, `name2`, `name3`) followed by a little-endian `i32`
//! (`literal1`). In the container each record is one line of 24 hex digits,
//! two per byte, high nibble first.

use std::fmt::Write as _;

use crate::common::constants::{RECORD_BYTES, RECORD_HEX_DIGITS};
use crate::isa::opcodes;

/// One virtual-machine instruction.
///
/// The meaning of each operand depends on `op`: a bit-memory address, an
/// integer-memory address, or (for `name3` of conditionals and jumps) an
/// absolute instruction index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Opcode, see [`opcodes`](crate::isa::opcodes).
    pub op: i16,
    /// First operand, usually the destination.
    pub name1: i16,
    /// Second operand, usually the first source.
    pub name2: i16,
    /// Third operand: second source or jump target.
    pub name3: i16,
    /// Immediate constant.
    pub literal1: i32,
}

/// Failure decoding a single hex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HexError {
    /// The text is not exactly [`RECORD_HEX_DIGITS`] bytes long; carries the byte count.
    Length(usize),
    /// A character is not a hex digit.
    Digit(char),
}

impl Instruction {
    /// Builds an instruction from raw fields.
    pub const fn new(op: i16, name1: i16, name2: i16, name3: i16, literal1: i32) -> Self {
        Self {
            op,
            name1,
            name2,
            name3,
            literal1,
        }
    }

    /// `bits[addr] := 1`
    pub const fn set_bit(addr: i16) -> Self {
        Self::new(opcodes::SET_BIT, addr, 0, 0, 0)
    }

    /// `bits[addr] := 0`
    pub const fn clear_bit(addr: i16) -> Self {
        Self::new(opcodes::CLEAR_BIT, addr, 0, 0, 0)
    }

    /// `bits[dst] := bits[src]`
    pub const fn copy_bit(dst: i16, src: i16) -> Self {
        Self::new(opcodes::COPY_BIT_TO_BIT, dst, src, 0, 0)
    }

    /// `int16s[dst] := value`
    pub const fn set_literal(dst: i16, value: i32) -> Self {
        Self::new(opcodes::SET_VARIABLE_TO_LITERAL, dst, 0, 0, value)
    }

    /// `int16s[dst] := int16s[src]`
    pub const fn set_variable(dst: i16, src: i16) -> Self {
        Self::new(opcodes::SET_VARIABLE_TO_VARIABLE, dst, src, 0, 0)
    }

    /// `int16s[dst] += 1`
    pub const fn increment(dst: i16) -> Self {
        Self::new(opcodes::INCREMENT_VARIABLE, dst, 0, 0, 0)
    }

    /// `int16s[dst] -= 1`
    pub const fn decrement(dst: i16) -> Self {
        Self::new(opcodes::DECREMENT_VARIABLE, dst, 0, 0, 0)
    }

    /// Three-address arithmetic: `int16s[dst] := int16s[lhs] <op> int16s[rhs]`.
    pub const fn arith(op: i16, dst: i16, lhs: i16, rhs: i16) -> Self {
        Self::new(op, dst, lhs, rhs, 0)
    }

    /// Unless `bits[addr]` is set, jump to `target`.
    pub const fn if_bit_set(addr: i16, target: i16) -> Self {
        Self::new(opcodes::IF_BIT_SET, addr, 0, target, 0)
    }

    /// Unless `bits[addr]` is clear, jump to `target`.
    pub const fn if_bit_clear(addr: i16, target: i16) -> Self {
        Self::new(opcodes::IF_BIT_CLEAR, addr, 0, target, 0)
    }

    /// Unless `int16s[var] < literal`, jump to `target`.
    pub const fn if_less_literal(var: i16, literal: i32, target: i16) -> Self {
        Self::new(opcodes::IF_VARIABLE_LES_LITERAL, var, 0, target, literal)
    }

    /// Variable-to-variable conditional: unless `int16s[lhs] <cmp> int16s[rhs]`, jump to `target`.
    pub const fn if_compare(op: i16, lhs: i16, rhs: i16, target: i16) -> Self {
        Self::new(op, lhs, rhs, target, 0)
    }

    /// Unconditional jump to `target`.
    pub const fn jump(target: i16) -> Self {
        Self::new(opcodes::ELSE, 0, 0, target, 0)
    }

    /// End-of-program marker.
    pub const fn end() -> Self {
        Self::new(opcodes::END_OF_PROGRAM, 0, 0, 0, 0)
    }

    /// Serializes the record to its raw little-endian byte layout.
    pub fn to_bytes(&self) -> [u8; RECORD_BYTES] {
        let mut out = [0u8; RECORD_BYTES];
        out[0..2].copy_from_slice(&self.op.to_le_bytes());
        out[2..4].copy_from_slice(&self.name1.to_le_bytes());
        out[4..6].copy_from_slice(&self.name2.to_le_bytes());
        out[6..8].copy_from_slice(&self.name3.to_le_bytes());
        out[8..12].copy_from_slice(&self.literal1.to_le_bytes());
        out
    }

    /// Reconstructs a record from its raw byte layout.
    pub const fn from_bytes(b: [u8; RECORD_BYTES]) -> Self {
        Self {
            op: i16::from_le_bytes([b[0], b[1]]),
            name1: i16::from_le_bytes([b[2], b[3]]),
            name2: i16::from_le_bytes([b[4], b[5]]),
            name3: i16::from_le_bytes([b[6], b[7]]),
            literal1: i32::from_le_bytes([b[8], b[9], b[10], b[11]]),
        }
    }

    /// Encodes the record as one container line (without terminator).
    ///
    /// Digits are lowercase; the loader accepts either case.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(RECORD_HEX_DIGITS);
        for byte in self.to_bytes() {
            let _ = write!(s, "{byte:02x}");
        }
        s
    }

    /// Decodes one container line (without terminator).
    ///
    /// # Arguments
    ///
    /// * `text` - Exactly [`RECORD_HEX_DIGITS`] hex digits.
    ///
    /// # Returns
    ///
    /// The decoded instruction, or the first [`HexError`] found.
    pub fn from_hex(text: &str) -> Result<Self, HexError> {
        let digits = text.as_bytes();
        if digits.len() != RECORD_HEX_DIGITS {
            return Err(HexError::Length(digits.len()));
        }
        let mut bytes = [0u8; RECORD_BYTES];
        for (byte, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            *byte = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
        }
        Ok(Self::from_bytes(bytes))
    }
}

fn hex_digit(c: u8) -> Result<u8, HexError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(HexError::Digit(char::from(c))),
    }
}

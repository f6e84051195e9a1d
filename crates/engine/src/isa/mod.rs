//! Instruction Set Definitions.
//!
//! Contains the instruction record, opcode numbering, decoding logic and the
//! debug disassembler.

/// Instruction decoding into operand-shaped operations.
pub mod decode;

/// Instruction disassembler for debug listings and diagnostics.
pub mod disasm;

/// Instruction record structure and hex encoding.
pub mod instruction;

/// Opcode numbering.
pub mod opcodes;

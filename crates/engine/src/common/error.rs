//! Error definitions.
//!
//! This module defines every fallible outcome surfaced to a host. It provides:
//! 1. **Load Errors:** Container parsing faults; fatal for the load that raised them.
//! 2. **Program Errors:** Structural faults found when validating an instruction array.
//! 3. **Memory Errors:** Host accesses outside a bank.
//! 4. **Host Errors:** Configuration, disassembly and simulator-level failures.
//!
//! Run-time anomalies inside a cycle (division by zero, unknown opcodes) are not
//! errors; they are counted in [`CycleStats`](crate::stats::CycleStats).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Memory bank selector.
///
/// Bit and integer memories are disjoint address spaces, so every address in
/// an error is qualified by its bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Boolean bank (relays, coils, contacts).
    Bit,
    /// 32-bit signed integer bank (timers, counters, registers).
    Int,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit => write!(f, "bits"),
            Self::Int => write!(f, "int16s"),
        }
    }
}

/// Fatal container loading error.
///
/// A failed load never leaves partially-populated state behind: the caller
/// either receives a complete [`Image`](crate::sim::image::Image) or one of these.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The container file could not be opened or read.
    #[error("couldn't open '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Input bytes are not 7-bit text.
    #[error("container is not ASCII text (byte {offset})")]
    NotText {
        /// Offset of the first offending byte.
        offset: usize,
    },

    /// The first line is not `$$LDcode`.
    #[error("bad program format: missing `$$LDcode` signature")]
    BadSignature,

    /// An instruction line has the wrong number of characters.
    #[error("line {line}: instruction record must be {expected} hex digits, got {actual}")]
    BadRecordLength {
        /// One-based line number.
        line: usize,
        /// Required digit count.
        expected: usize,
        /// Digits present.
        actual: usize,
    },

    /// An instruction line contains a character that is not a hex digit.
    #[error("line {line}: invalid hex digit {digit:?}")]
    BadHexDigit {
        /// One-based line number.
        line: usize,
        /// Offending character.
        digit: char,
    },

    /// Input ended inside the instruction section.
    #[error("unexpected end of input before `$$bits`, `$$int16s` or `$$cycle`")]
    Truncated,

    /// More instructions than the configured program capacity.
    #[error("program needs more than {capacity} instruction slots")]
    ProgramTooLarge {
        /// Configured slot count.
        capacity: usize,
    },

    /// A metadata line is neither a sentinel nor `<name>,<addr>`.
    #[error("line {line}: malformed variable mapping {text:?}")]
    MalformedMapping {
        /// One-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },

    /// A named variable points outside its bank.
    #[error("line {line}: {name} maps to {bank}[{addr}], outside memory of {capacity} cells")]
    MappingOutOfRange {
        /// One-based line number.
        line: usize,
        /// Variable name.
        name: String,
        /// Target bank.
        bank: Bank,
        /// Requested address.
        addr: usize,
        /// Bank capacity.
        capacity: usize,
    },

    /// A `$$cycle` line carries something other than a non-negative integer.
    #[error("line {line}: invalid cycle time {text:?}")]
    InvalidCycleTime {
        /// One-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },

    /// The decoded program failed structural validation.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

/// Structural fault in an instruction array.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    /// A conditional or jump targets an instruction that does not exist.
    #[error("pc {pc:03x}: jump target {target} outside program of {len} instructions")]
    JumpOutOfRange {
        /// Location of the jump.
        pc: usize,
        /// Raw `name3` operand.
        target: i16,
        /// Program length.
        len: usize,
    },

    /// An operand addresses a cell outside its bank.
    #[error("pc {pc:03x}: {bank}[{addr}] outside memory of {capacity} cells")]
    AddressOutOfRange {
        /// Location of the instruction.
        pc: usize,
        /// Bank the operand refers to.
        bank: Bank,
        /// Raw operand.
        addr: i16,
        /// Bank capacity.
        capacity: usize,
    },

    /// The program does not contain exactly one end-of-program marker.
    #[error("program must contain exactly one end-of-program marker, found {0}")]
    EndMarkerCount(usize),

    /// More instructions than the configured program capacity.
    #[error("program has {len} instructions, capacity is {capacity}")]
    TooLarge {
        /// Instruction count.
        len: usize,
        /// Configured slot count.
        capacity: usize,
    },
}

/// Host access outside a memory bank.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{bank}[{addr}] outside memory of {capacity} cells")]
pub struct MemoryError {
    /// Bank accessed.
    pub bank: Bank,
    /// Requested address.
    pub addr: usize,
    /// Bank capacity.
    pub capacity: usize,
}

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("couldn't read config '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value the interpreter cannot honour.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Disassembly diagnostic reported after the end-of-program marker.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DisasmError {
    /// Opcodes the interpreter does not implement were found.
    #[error("{count} unsupported opcode(s) for an interpretable target")]
    BadCodes {
        /// Number of unrecognised records.
        count: usize,
    },
}

/// Host-side simulator failure.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No variable with that name exists in the requested bank.
    #[error("unknown {bank} variable '{name}'")]
    UnknownVariable {
        /// Bank searched.
        bank: Bank,
        /// Requested name.
        name: String,
    },

    /// A resolved address fell outside memory.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// Loading or reloading an image failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

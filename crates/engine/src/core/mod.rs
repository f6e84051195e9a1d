//! Core interpreter implementation.
//!
//! This module contains the data memories, the validated program container
//! and the single-cycle interpreter that ties them together.

/// Single-cycle fetch/decode/execute loop.
pub mod interpreter;

/// Bit and integer memory banks.
pub mod memory;

/// Validated, immutable instruction arrays.
pub mod program;

pub use self::interpreter::{CycleOutcome, Interpreter};
pub use self::memory::Memory;
pub use self::program::Program;

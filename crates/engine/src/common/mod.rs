//! Common types shared across the interpreter.
//!
//! This module provides:
//! 1. **Constants:** Container sentinels, record geometry and default capacities.
//! 2. **Error Handling:** Load, program, memory, configuration and simulation errors.

/// Container format constants and default capacities.
pub mod constants;

/// Error types for loading, validation and memory access.
pub mod error;

pub use error::{Bank, ConfigError, DisasmError, LoadError, MemoryError, ProgramError, SimError};

//! Ladder-logic bytecode virtual machine.
//!
//! This crate loads programs compiled from ladder diagrams and runs them one
//! scan at a time. It is organised as follows:
//! 1. **ISA:** The fixed-width instruction record, opcode numbering, decoding into
//!    an operand-shaped [`isa::decode::Op`] and a debug disassembler.
//! 2. **Core:** Bit and integer memory banks, the validated program and the
//!    single-cycle interpreter.
//! 3. **Simulation:** The container loader and writer, I/O pin maps, named
//!    variables and a host harness that drives the I/O hooks around each cycle.
//! 4. **Support:** Configuration, error types and run-time statistics.
//!
//! A typical host loads an image once, then calls
//! [`Simulator::tick`] once per cycle period:
//!
//! ```ignore
//! use ldvm_core::{Config, Simulator};
//!
//! let config = Config::default();
//! let mut sim = Simulator::from_file("program.int", &config)?;
//! loop {
//!     sim.tick();
//!     std::thread::sleep(sim.cycle_period());
//! }
//! ```

/// Shared constants and error types.
pub mod common;
/// Interpreter configuration (capacities, tracing, watchdog).
pub mod config;
/// Memory banks, validated programs and the cycle interpreter.
pub mod core;
/// Instruction record, opcodes, decoding and disassembly.
pub mod isa;
/// Container loading and writing, I/O maps and the host harness.
pub mod sim;
/// Run-time statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Single-cycle interpreter owning the program and memory.
pub use crate::core::Interpreter;
/// Raw instruction record as stored in the container.
pub use crate::isa::instruction::Instruction;
/// Host harness combining the interpreter with I/O hooks and symbols.
pub use crate::sim::simulator::Simulator;

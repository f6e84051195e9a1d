//! Host I/O hooks.
//!
//! This module defines the `IoDriver` trait the host harness calls around every
//! cycle. It provides:
//! 1. **Input:** `read_inputs` runs immediately before a cycle and copies
//!    physical inputs into memory through the pin tables.
//! 2. **Output:** `write_outputs` runs immediately after a cycle and drives
//!    physical outputs from memory.
//!
//! Hooks never run concurrently with a cycle, so memory needs no locking.
//! Real targets implement this trait for their own hardware; [`NullIo`] is
//! the stub used when there is none.

use crate::core::memory::Memory;
use crate::sim::io_map::IoMap;

/// Physical I/O glue invoked by the host before and after each cycle.
pub trait IoDriver {
    /// Reads physical inputs into memory.
    fn read_inputs(&mut self, io: &IoMap, memory: &mut Memory);

    /// Writes memory out to physical outputs.
    fn write_outputs(&mut self, io: &IoMap, memory: &Memory);
}

/// I/O driver with no hardware behind it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullIo;

impl IoDriver for NullIo {
    fn read_inputs(&mut self, _io: &IoMap, _memory: &mut Memory) {}

    fn write_outputs(&mut self, _io: &IoMap, _memory: &Memory) {}
}

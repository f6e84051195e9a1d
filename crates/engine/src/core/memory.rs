//! Interpreter Memory Banks.
//!
//! This module implements the two data memories of the virtual machine.
//! It performs the following:
//! 1. **Storage:** Fixed-capacity bit and integer banks, zero-initialised once.
//! 2. **Checked Access:** Every access is bounds-checked; nothing here panics.
//! 3. **Debugging:** Provides utilities for dumping the non-zero memory state.
//!
//! The banks are allocated once at construction and never resized, so a
//! running cycle never allocates.

use std::fmt::Write;

use crate::common::{Bank, MemoryError};
use crate::config::MemoryConfig;

/// Bit and integer memory of one interpreter instance.
///
/// Contents persist across cycles; this is what gives counters, timers and
/// latching relays their memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    bits: Box<[bool]>,
    ints: Box<[i32]>,
}

impl Memory {
    /// Creates zero-initialised banks.
    ///
    /// # Arguments
    ///
    /// * `bits` - Number of bit cells.
    /// * `ints` - Number of integer cells.
    pub fn new(bits: usize, ints: usize) -> Self {
        Self {
            bits: vec![false; bits].into_boxed_slice(),
            ints: vec![0; ints].into_boxed_slice(),
        }
    }

    /// Creates banks sized from configuration.
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.bits, config.integers)
    }

    /// Number of bit cells.
    pub const fn bit_capacity(&self) -> usize {
        self.bits.len()
    }

    /// Number of integer cells.
    pub const fn int_capacity(&self) -> usize {
        self.ints.len()
    }

    /// Capacity of the given bank.
    pub const fn capacity(&self, bank: Bank) -> usize {
        match bank {
            Bank::Bit => self.bit_capacity(),
            Bank::Int => self.int_capacity(),
        }
    }

    /// Reads a bit cell.
    ///
    /// # Returns
    ///
    /// The cell state, or `None` if `addr` is outside the bank.
    pub fn bit(&self, addr: usize) -> Option<bool> {
        self.bits.get(addr).copied()
    }

    /// Writes a bit cell.
    pub fn set_bit(&mut self, addr: usize, value: bool) -> Result<(), MemoryError> {
        let capacity = self.bits.len();
        let cell = self.bits.get_mut(addr).ok_or(MemoryError {
            bank: Bank::Bit,
            addr,
            capacity,
        })?;
        *cell = value;
        Ok(())
    }

    /// Reads an integer cell.
    ///
    /// # Returns
    ///
    /// The cell value, or `None` if `addr` is outside the bank.
    pub fn int(&self, addr: usize) -> Option<i32> {
        self.ints.get(addr).copied()
    }

    /// Writes an integer cell.
    pub fn set_int(&mut self, addr: usize, value: i32) -> Result<(), MemoryError> {
        let capacity = self.ints.len();
        let cell = self.ints.get_mut(addr).ok_or(MemoryError {
            bank: Bank::Int,
            addr,
            capacity,
        })?;
        *cell = value;
        Ok(())
    }

    /// Read-only view of the bit bank.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Read-only view of the integer bank.
    pub fn ints(&self) -> &[i32] {
        &self.ints
    }

    /// Resets every cell to zero / false.
    pub fn clear(&mut self) {
        self.bits.fill(false);
        self.ints.fill(0);
    }

    /// Reads a bit through a raw signed operand.
    pub(crate) fn load_bit(&self, addr: i16) -> Option<bool> {
        self.bits.get(usize::try_from(addr).ok()?).copied()
    }

    /// Writes a bit through a raw signed operand; returns false when out of range.
    pub(crate) fn store_bit(&mut self, addr: i16, value: bool) -> bool {
        match usize::try_from(addr).ok().and_then(|a| self.bits.get_mut(a)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Reads an integer through a raw signed operand.
    pub(crate) fn load_int(&self, addr: i16) -> Option<i32> {
        self.ints.get(usize::try_from(addr).ok()?).copied()
    }

    /// Writes an integer through a raw signed operand; returns false when out of range.
    pub(crate) fn store_int(&mut self, addr: i16, value: i32) -> bool {
        match usize::try_from(addr).ok().and_then(|a| self.ints.get_mut(a)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Lists every non-zero cell, one per line, bits first.
    ///
    /// Clear bits and zero integers are omitted, so fresh memory dumps to an
    /// empty string.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (addr, _) in self.bits.iter().enumerate().filter(|(_, b)| **b) {
            let _ = writeln!(out, "bits[{addr:03x}]   = 1");
        }
        for (addr, value) in self.ints.iter().enumerate().filter(|(_, v)| **v != 0) {
            let _ = writeln!(out, "int16s[{addr:03x}] = {value}");
        }
        out
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default())
    }
}

//! Simulator: owns the interpreter and the host-side image metadata.
//!
//! Bundles what a host needs between cycles: the pin tables and named
//! variables from the container, the requested cycle period, and the I/O
//! driver whose hooks bracket every cycle.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::common::{Bank, MemoryError, SimError};
use crate::config::Config;
use crate::core::interpreter::{CycleOutcome, Interpreter};
use crate::core::memory::Memory;
use crate::sim::image::{Image, Symbols};
use crate::sim::io_map::IoMap;
use crate::sim::loader;
use crate::sim::traits::{IoDriver, NullIo};
use crate::stats::CycleStats;

/// Top-level host harness: interpreter + image metadata + I/O driver.
pub struct Simulator {
    interp: Interpreter,
    io_map: IoMap,
    symbols: Symbols,
    cycle_time_us: u64,
    io: Box<dyn IoDriver>,
    config: Config,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("interp", &self.interp)
            .field("io_map", &self.io_map)
            .field("symbols", &self.symbols)
            .field("cycle_time_us", &self.cycle_time_us)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator over a loaded image with the [`NullIo`] stub.
    pub fn new(image: Image, config: &Config) -> Self {
        Self::with_io(image, config, Box::new(NullIo))
    }

    /// Creates a simulator with a host I/O driver.
    ///
    /// # Arguments
    ///
    /// * `image` - Loaded container.
    /// * `config` - Memory geometry, tracing and watchdog settings.
    /// * `io` - Hooks run before and after every cycle.
    pub fn with_io(image: Image, config: &Config, io: Box<dyn IoDriver>) -> Self {
        let Image {
            program,
            io_map,
            symbols,
            cycle_time_us,
        } = image;
        Self {
            interp: Interpreter::new(program, config),
            io_map,
            symbols,
            cycle_time_us,
            io,
            config: config.clone(),
        }
    }

    /// Loads a container file and builds a simulator around it.
    pub fn from_file(path: impl AsRef<Path>, config: &Config) -> Result<Self, SimError> {
        Ok(Self::new(loader::load_file(path, config)?, config))
    }

    /// Parses container text and builds a simulator around it.
    pub fn from_container_str(text: &str, config: &Config) -> Result<Self, SimError> {
        Ok(Self::new(loader::load_str(text, config)?, config))
    }

    /// Replaces the I/O driver.
    pub fn set_io(&mut self, io: Box<dyn IoDriver>) {
        self.io = io;
    }

    /// Runs one full scan: read inputs, interpret one cycle, write outputs.
    pub fn tick(&mut self) -> CycleOutcome {
        self.io.read_inputs(&self.io_map, self.interp.memory_mut());
        let outcome = self.interp.interpret_one_cycle();
        self.io.write_outputs(&self.io_map, self.interp.memory());
        outcome
    }

    /// Runs `cycles` scans back to back, without pacing.
    ///
    /// # Returns
    ///
    /// The outcome of the last scan, or `None` when `cycles` is zero.
    pub fn run(&mut self, cycles: u64) -> Option<CycleOutcome> {
        let mut last = None;
        for _ in 0..cycles {
            last = Some(self.tick());
        }
        last
    }

    /// Swaps in a new image, keeping memory contents and statistics.
    pub fn reload(&mut self, image: Image) {
        let Image {
            program,
            io_map,
            symbols,
            cycle_time_us,
        } = image;
        let _ = self.interp.replace_program(program);
        self.io_map = io_map;
        self.symbols = symbols;
        self.cycle_time_us = cycle_time_us;
        info!(
            instructions = self.interp.program().len(),
            cycle_time_us, "program reloaded"
        );
    }

    /// Hot-reloads from a container file.
    ///
    /// The running image is replaced only when the new one loads cleanly.
    pub fn reload_file(&mut self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let image = loader::load_file(path, &self.config)?;
        self.reload(image);
        Ok(())
    }

    /// Hot-reloads from container text.
    pub fn reload_str(&mut self, text: &str) -> Result<(), SimError> {
        let image = loader::load_str(text, &self.config)?;
        self.reload(image);
        Ok(())
    }

    /// Requested cycle period in microseconds.
    pub const fn cycle_time_us(&self) -> u64 {
        self.cycle_time_us
    }

    /// Requested cycle period.
    pub const fn cycle_period(&self) -> Duration {
        Duration::from_micros(self.cycle_time_us)
    }

    /// Interpreter.
    pub const fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    /// Memory banks.
    pub const fn memory(&self) -> &Memory {
        self.interp.memory()
    }

    /// Mutable memory banks.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        self.interp.memory_mut()
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &CycleStats {
        self.interp.stats()
    }

    /// Pin tables.
    pub const fn io_map(&self) -> &IoMap {
        &self.io_map
    }

    /// Named variables.
    pub const fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// Resolves a variable name to its address.
    pub fn resolve(&self, bank: Bank, name: &str) -> Result<usize, SimError> {
        self.symbols
            .get(bank, name)
            .ok_or_else(|| SimError::UnknownVariable {
                bank,
                name: name.to_string(),
            })
    }

    /// Reads a named bit variable.
    pub fn bit_named(&self, name: &str) -> Result<bool, SimError> {
        let addr = self.resolve(Bank::Bit, name)?;
        self.memory().bit(addr).ok_or_else(|| {
            SimError::Memory(MemoryError {
                bank: Bank::Bit,
                addr,
                capacity: self.memory().bit_capacity(),
            })
        })
    }

    /// Writes a named bit variable.
    pub fn set_bit_named(&mut self, name: &str, value: bool) -> Result<(), SimError> {
        let addr = self.resolve(Bank::Bit, name)?;
        Ok(self.memory_mut().set_bit(addr, value)?)
    }

    /// Reads a named integer variable.
    pub fn int_named(&self, name: &str) -> Result<i32, SimError> {
        let addr = self.resolve(Bank::Int, name)?;
        self.memory().int(addr).ok_or_else(|| {
            SimError::Memory(MemoryError {
                bank: Bank::Int,
                addr,
                capacity: self.memory().int_capacity(),
            })
        })
    }

    /// Writes a named integer variable.
    pub fn set_int_named(&mut self, name: &str, value: i32) -> Result<(), SimError> {
        let addr = self.resolve(Bank::Int, name)?;
        Ok(self.memory_mut().set_int(addr, value)?)
    }
}

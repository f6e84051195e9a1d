//! Configuration system for the interpreter.
//!
//! This module defines all configuration structures used to parameterize
//! the interpreter. It provides:
//! 1. **Defaults:** Baseline machine geometry (memory banks, program slots, I/O pins).
//! 2. **Structures:** Hierarchical config for general, memory, I/O and engine settings.
//! 3. **Loading:** JSON deserialization with per-field defaults, plus validation.
//!
//! Capacities are fixed by configuration, never derived from a container file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::common::ConfigError;
use crate::common::constants;

/// Root configuration structure.
///
/// Every field is optional in JSON; missing fields fall back to the defaults
/// documented on each sub-structure.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General settings (tracing, default cycle period)
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory bank and program capacities
    #[serde(default)]
    pub memory: MemoryConfig,
    /// I/O pin table capacities
    #[serde(default)]
    pub io: IoConfig,
    /// Execution limits
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Parses a configuration from a JSON string and validates it.
    ///
    /// # Arguments
    ///
    /// * `text` - JSON document; unknown fields are rejected.
    ///
    /// # Returns
    ///
    /// The validated configuration, or a [`ConfigError`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every capacity is usable.
    ///
    /// Capacities must be nonzero and addressable by a 16-bit signed operand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacities = [
            ("memory.bits", self.memory.bits),
            ("memory.integers", self.memory.integers),
            ("memory.program_capacity", self.memory.program_capacity),
            ("io.inputs", self.io.inputs),
            ("io.outputs", self.io.outputs),
            ("io.analogs", self.io.analogs),
        ];
        for (field, value) in capacities {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be nonzero".to_string(),
                });
            }
            if value > constants::MAX_OPERAND_CAPACITY {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!(
                        "{value} exceeds the 16-bit operand range ({})",
                        constants::MAX_OPERAND_CAPACITY
                    ),
                });
            }
        }
        if self.engine.max_steps_per_cycle == Some(0) {
            return Err(ConfigError::Invalid {
                field: "engine.max_steps_per_cycle",
                reason: "must be nonzero when set".to_string(),
            });
        }
        Ok(())
    }
}

/// General interpreter settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Emit a `trace`-level event for every executed instruction
    #[serde(default)]
    pub trace_instructions: bool,

    /// Cycle period in microseconds used when the container has no `$$cycle` line
    #[serde(default = "GeneralConfig::default_cycle_time_us")]
    pub cycle_time_us: u64,
}

impl GeneralConfig {
    /// Returns the default cycle period in microseconds.
    const fn default_cycle_time_us() -> u64 {
        constants::DEFAULT_CYCLE_TIME_US
    }

    /// Default cycle period as a [`Duration`].
    pub const fn cycle_period(&self) -> Duration {
        Duration::from_micros(self.cycle_time_us)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            cycle_time_us: constants::DEFAULT_CYCLE_TIME_US,
        }
    }
}

/// Memory bank and program slot capacities.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Number of bit-memory cells
    #[serde(default = "MemoryConfig::default_bits")]
    pub bits: usize,

    /// Number of integer-memory cells
    #[serde(default = "MemoryConfig::default_integers")]
    pub integers: usize,

    /// Maximum number of instructions in a program
    #[serde(default = "MemoryConfig::default_program_capacity")]
    pub program_capacity: usize,
}

impl MemoryConfig {
    const fn default_bits() -> usize {
        constants::DEFAULT_BITS
    }

    const fn default_integers() -> usize {
        constants::DEFAULT_INTEGERS
    }

    const fn default_program_capacity() -> usize {
        constants::DEFAULT_PROGRAM_CAPACITY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            bits: constants::DEFAULT_BITS,
            integers: constants::DEFAULT_INTEGERS,
            program_capacity: constants::DEFAULT_PROGRAM_CAPACITY,
        }
    }
}

/// I/O pin table capacities.
///
/// Pin indices at or beyond these capacities are ignored by the loader.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// Number of input pins (`X<n>`)
    #[serde(default = "IoConfig::default_inputs")]
    pub inputs: usize,

    /// Number of output pins (`Y<n>`)
    #[serde(default = "IoConfig::default_outputs")]
    pub outputs: usize,

    /// Number of analog channels (`A<n>`)
    #[serde(default = "IoConfig::default_analogs")]
    pub analogs: usize,
}

impl IoConfig {
    const fn default_inputs() -> usize {
        constants::DEFAULT_INPUTS
    }

    const fn default_outputs() -> usize {
        constants::DEFAULT_OUTPUTS
    }

    const fn default_analogs() -> usize {
        constants::DEFAULT_ANALOGS
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            inputs: constants::DEFAULT_INPUTS,
            outputs: constants::DEFAULT_OUTPUTS,
            analogs: constants::DEFAULT_ANALOGS,
        }
    }
}

/// Execution limits.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Abort a cycle after this many executed instructions (disabled when unset)
    #[serde(default)]
    pub max_steps_per_cycle: Option<u64>,
}

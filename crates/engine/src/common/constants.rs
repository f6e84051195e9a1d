//! Container and machine constants.
//!
//! Values that define the on-disk container format and the default machine
//! geometry. Capacities here are defaults only; the live values come from
//! [`Config`](crate::config::Config).

/// Signature line that opens every container.
pub const HEADER: &str = "$$LDcode";

/// Prefix shared by every sentinel line.
pub const SENTINEL_PREFIX: &str = "$$";

/// Sentinel opening the named bit-variable section.
pub const BITS_SENTINEL: &str = "$$bits";

/// Sentinel opening the named integer-variable section.
pub const INTS_SENTINEL: &str = "$$int16s";

/// Sentinel carrying the cycle period, optionally followed by an integer.
pub const CYCLE_SENTINEL: &str = "$$cycle";

/// Size in bytes of one encoded instruction record.
///
/// Layout: `op`, `name1`, `name2`, `name3` as little-endian `i16`, then
/// `literal1` as little-endian `i32`.
pub const RECORD_BYTES: usize = 12;

/// Number of hex digits in one instruction line.
pub const RECORD_HEX_DIGITS: usize = RECORD_BYTES * 2;

/// Default bit-memory capacity (internal relays, coils, contacts).
pub const DEFAULT_BITS: usize = 128;

/// Default integer-memory capacity (timers, counters, registers).
pub const DEFAULT_INTEGERS: usize = 128;

/// Default number of instruction slots.
pub const DEFAULT_PROGRAM_CAPACITY: usize = 256;

/// Default number of input pins (`X0`..`X15`).
pub const DEFAULT_INPUTS: usize = 16;

/// Default number of output pins (`Y0`, `Y1`).
pub const DEFAULT_OUTPUTS: usize = 2;

/// Default number of analog channels (`A0`).
pub const DEFAULT_ANALOGS: usize = 1;

/// Default cycle period in microseconds (10 ms).
pub const DEFAULT_CYCLE_TIME_US: u64 = 10_000;

/// Largest capacity addressable by a 16-bit signed operand.
pub const MAX_OPERAND_CAPACITY: usize = i16::MAX as usize + 1;

//! Container writer.
//!
//! Emits the textual container format read by [`loader`](crate::sim::loader),
//! so an image built or modified in memory can be stored and reloaded
//! unchanged. Bit names are written under `$$bits`, integer names under
//! `$$int16s`, and the cycle period last.

use std::fmt::Write as _;

use crate::common::Bank;
use crate::common::constants::{BITS_SENTINEL, CYCLE_SENTINEL, HEADER, INTS_SENTINEL};
use crate::isa::instruction::Instruction;
use crate::sim::image::{Image, Symbols};

/// Encodes a loaded image.
pub fn encode(image: &Image) -> String {
    encode_parts(
        image.program.instructions(),
        &image.symbols,
        image.cycle_time_us,
    )
}

/// Encodes raw parts into container text.
///
/// # Arguments
///
/// * `program` - Instructions in PC order.
/// * `symbols` - Named variables; pin names (`X<n>`, `Y<n>`, `A<n>`) are
///   written like any other name and rebuild the pin tables on load.
/// * `cycle_time_us` - Cycle period in microseconds.
pub fn encode_parts(program: &[Instruction], symbols: &Symbols, cycle_time_us: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    for inst in program {
        let _ = writeln!(out, "{}", inst.to_hex());
    }
    let _ = writeln!(out, "{BITS_SENTINEL}");
    for (name, addr) in symbols.iter(Bank::Bit) {
        let _ = writeln!(out, "{name},{addr}");
    }
    let _ = writeln!(out, "{INTS_SENTINEL}");
    for (name, addr) in symbols.iter(Bank::Int) {
        let _ = writeln!(out, "{name},{addr}");
    }
    let _ = writeln!(out, "{CYCLE_SENTINEL}{cycle_time_us}");
    out
}

//! Container Loader.
//!
//! This module parses the textual container produced by the ladder compiler. It performs:
//! 1. **Signature check:** The first line must be `$$LDcode`.
//! 2. **Instruction scan:** One 24-digit hex record per line until a `$$bits`,
//!    `$$int16s` or `$$cycle` sentinel.
//! 3. **Metadata scan:** Each remaining line is classified as a sentinel, a
//!    blank, or a `<name>,<addr>` mapping; `X<n>`/`Y<n>`/`A<n>` names also
//!    fill the pin tables.
//! 4. **Validation:** The decoded program is checked before anything is returned.
//!
//! Every fault is returned as a [`LoadError`]; a failed load produces no
//! partial state, so an embedding host can keep running its previous image.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::common::constants::{
    BITS_SENTINEL, CYCLE_SENTINEL, HEADER, INTS_SENTINEL, RECORD_HEX_DIGITS, SENTINEL_PREFIX,
};
use crate::common::{Bank, LoadError};
use crate::config::Config;
use crate::core::program::Program;
use crate::isa::instruction::{HexError, Instruction};
use crate::sim::image::{Image, Symbols};
use crate::sim::io_map::{IoMap, PinKind};

/// Classification of one container line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line<'a> {
    /// Empty or whitespace only.
    Blank,
    /// `$$bits` or `$$int16s`.
    Section(Bank),
    /// `$$cycle`, with the trimmed text that follows it.
    Cycle(&'a str),
    /// Any other `$$` sentinel.
    UnknownSentinel(&'a str),
    /// Anything else: an instruction record or a variable mapping.
    Data(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        Line::Blank
    } else if line == BITS_SENTINEL {
        Line::Section(Bank::Bit)
    } else if line == INTS_SENTINEL {
        Line::Section(Bank::Int)
    } else if let Some(rest) = line.strip_prefix(CYCLE_SENTINEL) {
        Line::Cycle(rest.trim())
    } else if line.starts_with(SENTINEL_PREFIX) {
        Line::UnknownSentinel(line)
    } else {
        Line::Data(line)
    }
}

/// Reads and parses a container file.
///
/// # Arguments
///
/// * `path` - Container file path.
/// * `config` - Capacities the program and pin tables must fit.
pub fn load_file(path: impl AsRef<Path>, config: &Config) -> Result<Image, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "loading container");
    load_bytes(&bytes, config)
}

/// Parses a container held in memory, e.g. embedded in firmware.
///
/// The container is 7-bit text; any byte above `0x7f` is rejected.
pub fn load_bytes(bytes: &[u8], config: &Config) -> Result<Image, LoadError> {
    if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(LoadError::NotText { offset });
    }
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::NotText {
        offset: e.valid_up_to(),
    })?;
    load_str(text, config)
}

/// Parses container text.
///
/// # Arguments
///
/// * `text` - Whole container; `\n` and `\r\n` terminators are accepted.
/// * `config` - Capacities the program and pin tables must fit.
///
/// # Returns
///
/// A fully validated [`Image`], or the first [`LoadError`] encountered.
pub fn load_str(text: &str, config: &Config) -> Result<Image, LoadError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    match lines.next() {
        Some((_, HEADER)) => {}
        _ => return Err(LoadError::BadSignature),
    }

    let capacity = config.memory.program_capacity;
    let mut insts = Vec::with_capacity(capacity);
    let mut cycle_time_us = config.general.cycle_time_us;
    let mut section = Bank::Bit;

    loop {
        let Some((lineno, line)) = lines.next() else {
            return Err(LoadError::Truncated);
        };
        match classify(line) {
            Line::Section(bank) => {
                section = bank;
                break;
            }
            Line::Cycle(value) => {
                cycle_time_us = parse_cycle(lineno, line, value)?.unwrap_or(cycle_time_us);
                break;
            }
            Line::Blank | Line::UnknownSentinel(_) | Line::Data(_) => {
                if insts.len() == capacity {
                    return Err(LoadError::ProgramTooLarge { capacity });
                }
                insts.push(decode_record(lineno, line)?);
            }
        }
    }

    let mut io_map = IoMap::new(&config.io);
    let mut symbols = Symbols::default();

    for (lineno, line) in lines {
        match classify(line) {
            Line::Blank => {}
            Line::Section(bank) => section = bank,
            Line::Cycle(value) => {
                cycle_time_us = parse_cycle(lineno, line, value)?.unwrap_or(cycle_time_us);
            }
            Line::UnknownSentinel(s) => debug!(line = lineno, sentinel = s, "ignoring sentinel"),
            Line::Data(data) => {
                map_variable(lineno, data, section, config, &mut io_map, &mut symbols)?;
            }
        }
    }

    let count = insts.len();
    let program = Program::new(insts, &config.memory)?;
    debug!(
        instructions = count,
        bit_names = symbols.len(Bank::Bit),
        int_names = symbols.len(Bank::Int),
        cycle_time_us,
        "container loaded"
    );

    Ok(Image {
        program,
        io_map,
        symbols,
        cycle_time_us,
    })
}

/// Decodes one instruction line, attaching the line number to any error.
fn decode_record(lineno: usize, line: &str) -> Result<Instruction, LoadError> {
    Instruction::from_hex(line).map_err(|e| match e {
        HexError::Length(actual) => LoadError::BadRecordLength {
            line: lineno,
            expected: RECORD_HEX_DIGITS,
            actual,
        },
        HexError::Digit(digit) => LoadError::BadHexDigit {
            line: lineno,
            digit,
        },
    })
}

/// Parses the text after `$$cycle`; an empty suffix keeps the current period.
fn parse_cycle(lineno: usize, line: &str, value: &str) -> Result<Option<u64>, LoadError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidCycleTime {
            line: lineno,
            text: line.to_string(),
        })
}

/// Applies one `<name>,<addr>` line to the symbol and pin tables.
fn map_variable(
    lineno: usize,
    line: &str,
    section: Bank,
    config: &Config,
    io_map: &mut IoMap,
    symbols: &mut Symbols,
) -> Result<(), LoadError> {
    let malformed = || LoadError::MalformedMapping {
        line: lineno,
        text: line.to_string(),
    };
    let (name, addr) = line.split_once(',').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    let addr: usize = addr.trim().parse().map_err(|_| malformed())?;

    let pin = PinKind::parse(name);
    let bank = pin.map_or(section, |(kind, _)| kind.bank());
    let capacity = match bank {
        Bank::Bit => config.memory.bits,
        Bank::Int => config.memory.integers,
    };
    if addr >= capacity {
        return Err(LoadError::MappingOutOfRange {
            line: lineno,
            name: name.to_string(),
            bank,
            addr,
            capacity,
        });
    }

    if let Some(previous) = symbols.insert(bank, name, addr) {
        debug!(line = lineno, name, previous, addr, "variable remapped");
    }
    if let Some((kind, index)) = pin {
        if !io_map.map(kind, index, addr) {
            trace!(line = lineno, name, "pin beyond table capacity ignored");
        }
    }
    Ok(())
}

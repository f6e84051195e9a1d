//! Physical pin to memory mapping.
//!
//! Three fixed-capacity tables filled by the loader from `X<n>`, `Y<n>` and
//! `A<n>` metadata lines. Inputs and outputs map to bit memory; analog
//! channels map to integer memory. Host I/O drivers walk these tables to move
//! values between hardware and memory around each cycle.

use crate::common::Bank;
use crate::config::IoConfig;

/// Pin table selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinKind {
    /// Digital input (`X<n>`).
    Input,
    /// Digital output (`Y<n>`).
    Output,
    /// Analog channel (`A<n>`).
    Analog,
}

impl PinKind {
    /// Classifies a variable name such as `X3`.
    ///
    /// # Returns
    ///
    /// The table and pin index when `name` is a prefix letter followed only
    /// by decimal digits. Indices too large for `usize` are returned as
    /// `usize::MAX` so they fall outside every table.
    pub fn parse(name: &str) -> Option<(Self, usize)> {
        let mut chars = name.chars();
        let kind = match chars.next()? {
            'X' => Self::Input,
            'Y' => Self::Output,
            'A' => Self::Analog,
            _ => return None,
        };
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((kind, digits.parse().unwrap_or(usize::MAX)))
    }

    /// Memory bank the pin's address refers to.
    pub const fn bank(self) -> Bank {
        match self {
            Self::Input | Self::Output => Bank::Bit,
            Self::Analog => Bank::Int,
        }
    }

    /// Name prefix letter.
    pub const fn prefix(self) -> char {
        match self {
            Self::Input => 'X',
            Self::Output => 'Y',
            Self::Analog => 'A',
        }
    }
}

/// Input, output and analog pin tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IoMap {
    inputs: Box<[Option<usize>]>,
    outputs: Box<[Option<usize>]>,
    analogs: Box<[Option<usize>]>,
}

impl IoMap {
    /// Creates empty tables sized from configuration.
    pub fn new(config: &IoConfig) -> Self {
        Self {
            inputs: vec![None; config.inputs].into_boxed_slice(),
            outputs: vec![None; config.outputs].into_boxed_slice(),
            analogs: vec![None; config.analogs].into_boxed_slice(),
        }
    }

    fn table(&self, kind: PinKind) -> &[Option<usize>] {
        match kind {
            PinKind::Input => &self.inputs,
            PinKind::Output => &self.outputs,
            PinKind::Analog => &self.analogs,
        }
    }

    /// Records a pin mapping.
    ///
    /// # Returns
    ///
    /// `false` when `pin` is beyond the table capacity; the mapping is then
    /// dropped, which is not an error.
    pub fn map(&mut self, kind: PinKind, pin: usize, addr: usize) -> bool {
        let table = match kind {
            PinKind::Input => &mut self.inputs,
            PinKind::Output => &mut self.outputs,
            PinKind::Analog => &mut self.analogs,
        };
        match table.get_mut(pin) {
            Some(slot) => {
                *slot = Some(addr);
                true
            }
            None => false,
        }
    }

    /// Memory address backing a pin, if mapped.
    pub fn get(&self, kind: PinKind, pin: usize) -> Option<usize> {
        self.table(kind).get(pin).copied().flatten()
    }

    /// Bit address of input pin `X<pin>`.
    pub fn input(&self, pin: usize) -> Option<usize> {
        self.get(PinKind::Input, pin)
    }

    /// Bit address of output pin `Y<pin>`.
    pub fn output(&self, pin: usize) -> Option<usize> {
        self.get(PinKind::Output, pin)
    }

    /// Integer address of analog channel `A<pin>`.
    pub fn analog(&self, pin: usize) -> Option<usize> {
        self.get(PinKind::Analog, pin)
    }

    /// Table capacity.
    pub fn capacity(&self, kind: PinKind) -> usize {
        self.table(kind).len()
    }

    /// Mapped `(pin, address)` pairs of one table, in pin order.
    pub fn mapped(&self, kind: PinKind) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.table(kind)
            .iter()
            .enumerate()
            .filter_map(|(pin, addr)| addr.map(|a| (pin, a)))
    }
}

impl Default for IoMap {
    fn default() -> Self {
        Self::new(&IoConfig::default())
    }
}

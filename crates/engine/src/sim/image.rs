//! Loaded program images and named variables.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::common::Bank;
use crate::core::program::Program;
use crate::sim::io_map::IoMap;

/// Name to address tables for both memory banks.
///
/// Hosts use these to reach specially-named program variables, e.g. to
/// inject a sensor value or read a counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Symbols {
    bits: BTreeMap<String, usize>,
    ints: BTreeMap<String, usize>,
}

impl Symbols {
    fn table(&self, bank: Bank) -> &BTreeMap<String, usize> {
        match bank {
            Bank::Bit => &self.bits,
            Bank::Int => &self.ints,
        }
    }

    /// Records `name` at `addr`, returning the address it replaced.
    pub fn insert(&mut self, bank: Bank, name: impl Into<String>, addr: usize) -> Option<usize> {
        let table = match bank {
            Bank::Bit => &mut self.bits,
            Bank::Int => &mut self.ints,
        };
        table.insert(name.into(), addr)
    }

    /// Address of a named variable.
    pub fn get(&self, bank: Bank, name: &str) -> Option<usize> {
        self.table(bank).get(name).copied()
    }

    /// Named variables of one bank in name order.
    pub fn iter(&self, bank: Bank) -> impl Iterator<Item = (&str, usize)> {
        self.table(bank).iter().map(|(n, a)| (n.as_str(), *a))
    }

    /// Number of names in one bank.
    pub fn len(&self, bank: Bank) -> usize {
        self.table(bank).len()
    }

    /// True when neither bank has names.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty() && self.ints.is_empty()
    }
}

/// Everything a container describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Validated instructions.
    pub program: Program,
    /// Pin tables.
    pub io_map: IoMap,
    /// Named variables.
    pub symbols: Symbols,
    /// Requested cycle period in microseconds.
    pub cycle_time_us: u64,
}

impl Image {
    /// Requested cycle period.
    pub const fn cycle_period(&self) -> Duration {
        Duration::from_micros(self.cycle_time_us)
    }
}

//! Interpreter statistics collection and reporting.
//!
//! This module tracks run-time counters for the interpreter. It provides:
//! 1. **Throughput:** Cycles run, instructions executed and jumps taken.
//! 2. **Anomalies:** Division-by-zero skips, unsupported opcodes and
//!    out-of-range operands, all of which are non-fatal.
//! 3. **Watchdog:** Cycles cut short by the step limit.

/// Interpreter statistics.
///
/// Counters accumulate over the lifetime of an interpreter and are never
/// reset by a hot reload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Number of completed or aborted cycles.
    pub cycles: u64,
    /// Instructions executed, including markers and skipped opcodes.
    pub instructions: u64,
    /// Conditional and unconditional jumps that changed the PC.
    pub jumps_taken: u64,
    /// Divide or modulo instructions skipped because the divisor was zero.
    pub div_by_zero: u64,
    /// Unsupported opcodes skipped.
    pub unsupported_ops: u64,
    /// Instructions skipped because an operand was outside memory.
    pub address_faults: u64,
    /// Cycles that ran past the last slot without meeting the end marker.
    pub ran_off_end: u64,
    /// Cycles cut short by the step watchdog.
    pub watchdog_trips: u64,
}

impl CycleStats {
    /// Average number of instructions executed per cycle.
    pub fn instructions_per_cycle(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions as f64 / self.cycles as f64
        }
    }

    /// Sum of every non-fatal anomaly counter.
    pub const fn anomalies(&self) -> u64 {
        self.div_by_zero + self.unsupported_ops + self.address_faults + self.watchdog_trips
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("LADDER VM STATISTICS");
        println!("==========================================================");
        println!("vm_cycles                {}", self.cycles);
        println!("vm_insts                 {}", self.instructions);
        println!("vm_insts_per_cycle       {:.2}", self.instructions_per_cycle());
        println!("vm_jumps_taken           {}", self.jumps_taken);
        println!("----------------------------------------------------------");
        println!("ANOMALIES");
        println!("  div_by_zero            {}", self.div_by_zero);
        println!("  unsupported_ops        {}", self.unsupported_ops);
        println!("  address_faults         {}", self.address_faults);
        println!("  ran_off_end            {}", self.ran_off_end);
        println!("  watchdog_trips         {}", self.watchdog_trips);
        println!("==========================================================");
    }
}

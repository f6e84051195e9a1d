//! # Statistics Tests

use ldvm_core::stats::CycleStats;
use pretty_assertions::assert_eq;

#[test]
fn test_instructions_per_cycle() {
    let stats = CycleStats {
        cycles: 4,
        instructions: 10,
        ..CycleStats::default()
    };
    assert!((stats.instructions_per_cycle() - 2.5).abs() < f64::EPSILON);
}

#[test]
fn test_instructions_per_cycle_before_first_cycle() {
    assert_eq!(CycleStats::default().instructions_per_cycle(), 0.0);
}

#[test]
fn test_anomalies_sum_non_fatal_counters() {
    let stats = CycleStats {
        cycles: 9,
        instructions: 100,
        jumps_taken: 7,
        div_by_zero: 1,
        unsupported_ops: 2,
        address_faults: 3,
        ran_off_end: 5,
        watchdog_trips: 4,
    };
    assert_eq!(stats.anomalies(), 10);
}

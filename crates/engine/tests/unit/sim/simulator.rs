//! # Simulator Tests
//!
//! I/O hook ordering around each cycle, named variable access and hot
//! reload.

use std::io::Write;
use std::time::Duration;

use ldvm_core::common::{Bank, LoadError, SimError};
use ldvm_core::config::Config;
use ldvm_core::core::CycleOutcome;
use ldvm_core::{Instruction, Simulator};
use mockall::Sequence;
use pretty_assertions::assert_eq;

use crate::common::builder::ContainerBuilder;
use crate::common::harness::init_tracing;
use crate::common::mocks::MockDriver;

fn counter() -> String {
    ContainerBuilder::new()
        .insts([Instruction::increment(3), Instruction::end()])
        .int("count", 3)
        .cycle(1000)
        .build()
}

/// `Y0 := X0`, with `X0` at bit 5 and `Y0` at bit 6.
fn follower() -> String {
    ContainerBuilder::new()
        .insts([Instruction::copy_bit(6, 5), Instruction::end()])
        .bit("X0", 5)
        .bit("Y0", 6)
        .build()
}

fn simulator(text: &str) -> Simulator {
    init_tracing();
    Simulator::from_container_str(text, &Config::default()).expect("valid container")
}

// ══════════════════════════════════════════════════════════
// 1. Cycles and I/O hooks
// ══════════════════════════════════════════════════════════

#[test]
fn test_counter_reaches_ten() {
    let mut sim = simulator(&counter());
    assert_eq!(sim.run(10), Some(CycleOutcome::Completed));
    assert_eq!(sim.int_named("count").expect("mapped"), 10);
    assert_eq!(sim.stats().cycles, 10);
}

#[test]
fn test_run_zero_cycles() {
    let mut sim = simulator(&counter());
    assert_eq!(sim.run(0), None);
    assert_eq!(sim.stats().cycles, 0);
}

#[test]
fn test_cycle_period_from_container() {
    let sim = simulator(&counter());
    assert_eq!(sim.cycle_time_us(), 1000);
    assert_eq!(sim.cycle_period(), Duration::from_millis(1));
}

#[test]
fn test_hooks_bracket_the_cycle() {
    let mut sim = simulator(&follower());
    let mut seq = Sequence::new();
    let mut io = MockDriver::new();

    let _ = io
        .expect_read_inputs()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|map, _| map.input(0) == Some(5))
        .returning(|map, memory| {
            let addr = map.input(0).expect("X0 mapped");
            memory.set_bit(addr, true).expect("in range");
        });
    let _ = io
        .expect_write_outputs()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|map, memory| map.output(0).and_then(|a| memory.bit(a)) == Some(true))
        .return_const(());

    sim.set_io(Box::new(io));
    assert_eq!(sim.tick(), CycleOutcome::Completed);
    assert!(sim.bit_named("Y0").expect("mapped"));
}

#[test]
fn test_hooks_run_every_cycle() {
    let mut io = MockDriver::new();
    let _ = io.expect_read_inputs().times(4).return_const(());
    let _ = io.expect_write_outputs().times(4).return_const(());

    let image = ldvm_core::sim::loader::load_str(&follower(), &Config::default()).expect("valid");
    let mut sim = Simulator::with_io(image, &Config::default(), Box::new(io));
    assert_eq!(sim.run(4), Some(CycleOutcome::Completed));
}

// ══════════════════════════════════════════════════════════
// 2. Named variables
// ══════════════════════════════════════════════════════════

#[test]
fn test_named_access() {
    let mut sim = simulator(&follower());
    sim.set_bit_named("X0", true).expect("mapped");
    let _ = sim.tick();
    assert!(sim.bit_named("Y0").expect("mapped"));
    assert_eq!(sim.memory().bit(6), Some(true));
    assert_eq!(sim.resolve(Bank::Bit, "Y0").expect("mapped"), 6);
}

#[test]
fn test_named_int_write() {
    let mut sim = simulator(&counter());
    sim.set_int_named("count", 100).expect("mapped");
    let _ = sim.tick();
    assert_eq!(sim.int_named("count").expect("mapped"), 101);
}

#[test]
fn test_unknown_name() {
    let sim = simulator(&counter());
    let err = sim.int_named("missing").unwrap_err();
    assert!(
        matches!(&err, SimError::UnknownVariable { bank: Bank::Int, name } if name == "missing"),
        "got {err:?}"
    );
    assert!(
        sim.bit_named("count").is_err(),
        "integer names do not resolve in the bit bank"
    );
}

// ══════════════════════════════════════════════════════════
// 3. Hot reload
// ══════════════════════════════════════════════════════════

#[test]
fn test_reload_keeps_memory() {
    let mut sim = simulator(&counter());
    let _ = sim.run(3);

    let countdown = ContainerBuilder::new()
        .insts([Instruction::decrement(3), Instruction::end()])
        .int("remaining", 3)
        .cycle(500)
        .build();
    sim.reload_str(&countdown).expect("valid container");

    assert_eq!(sim.int_named("remaining").expect("mapped"), 3);
    assert!(sim.resolve(Bank::Int, "count").is_err(), "old symbols replaced");
    assert_eq!(sim.cycle_time_us(), 500);

    let _ = sim.tick();
    assert_eq!(sim.int_named("remaining").expect("mapped"), 2);
    assert_eq!(sim.stats().cycles, 4);
}

#[test]
fn test_failed_reload_keeps_running_image() {
    let mut sim = simulator(&counter());
    let _ = sim.run(2);

    let err = sim.reload_str("$$LDcode\n0600\n$$bits\n").unwrap_err();
    assert!(
        matches!(err, SimError::Load(LoadError::BadRecordLength { .. })),
        "got {err:?}"
    );

    let _ = sim.tick();
    assert_eq!(sim.int_named("count").expect("still mapped"), 3);
    assert_eq!(sim.interpreter().program().len(), 2);
}

#[test]
fn test_reload_file() {
    let mut sim = simulator(&counter());
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(follower().as_bytes()).expect("write");

    sim.reload_file(file.path()).expect("valid container");
    assert_eq!(sim.io_map().output(0), Some(6));
    assert_eq!(sim.symbols().len(Bank::Bit), 2);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Simulator::from_file(dir.path().join("program.int"), &Config::default()).unwrap_err();
    assert!(matches!(err, SimError::Load(LoadError::Io { .. })), "got {err:?}");
}

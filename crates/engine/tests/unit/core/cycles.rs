//! # Cycle Behaviour Tests
//!
//! Memory persistence between cycles, cycle termination, the step watchdog
//! and hot program replacement.

use ldvm_core::config::Config;
use ldvm_core::core::{CycleOutcome, Interpreter, Memory, Program};
use ldvm_core::isa::opcodes;
use ldvm_core::Instruction;
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn test_counter_persists_across_cycles() {
    let mut ctx = TestContext::new(vec![Instruction::increment(0), Instruction::end()]);
    assert_eq!(ctx.run(10), CycleOutcome::Completed);
    assert_eq!(ctx.int(0), 10);
    assert_eq!(ctx.stats().cycles, 10);
    assert_eq!(ctx.stats().instructions, 20);
}

#[test]
fn test_conditional_counter_reaches_ten() {
    // 0: unless int[0] < 10 -> 2; 1: increment int[0]; 2: end
    let mut ctx = TestContext::new(vec![
        Instruction::if_less_literal(0, 10, 2),
        Instruction::increment(0),
        Instruction::end(),
    ]);
    for expected in 1..=10 {
        assert_eq!(ctx.cycle(), CycleOutcome::Completed);
        assert_eq!(ctx.int(0), expected);
    }
    assert_eq!(ctx.stats().cycles, 10);
    assert_eq!(ctx.stats().jumps_taken, 0);

    let _ = ctx.run(5);
    assert_eq!(ctx.int(0), 10, "saturates once the limit is reached");
    assert_eq!(ctx.stats().jumps_taken, 5);
}

#[test]
fn test_each_cycle_restarts_at_zero() {
    // 0: unless bit 0 set -> 3; 1: increment; 2: end; 3: set bit 0; 4: jump 2
    let mut ctx = TestContext::new(vec![
        Instruction::if_bit_set(0, 3),
        Instruction::increment(0),
        Instruction::end(),
        Instruction::set_bit(0),
        Instruction::jump(2),
    ]);
    let _ = ctx.cycle();
    assert!(ctx.bit(0));
    assert_eq!(ctx.int(0), 0, "first cycle takes the jump arm");
    let _ = ctx.run(3);
    assert_eq!(ctx.int(0), 3);
}

#[test]
fn test_host_writes_visible_next_cycle() {
    let mut ctx = TestContext::new(vec![Instruction::copy_bit(1, 0), Instruction::end()]);
    let _ = ctx.cycle();
    assert!(!ctx.bit(1));
    ctx.set_bit(0, true);
    let _ = ctx.cycle();
    assert!(ctx.bit(1));
}

#[test]
fn test_divide_by_zero_end_to_end() {
    let mut ctx = TestContext::new(vec![
        Instruction::set_literal(0, 100),
        Instruction::arith(opcodes::SET_VARIABLE_DIVIDE, 2, 0, 1),
        Instruction::increment(3),
        Instruction::end(),
    ]);
    ctx.set_int(2, 7);
    assert_eq!(ctx.run(5), CycleOutcome::Completed);
    assert_eq!(ctx.int(2), 7);
    assert_eq!(ctx.int(3), 5);
    assert_eq!(ctx.stats().div_by_zero, 5);

    ctx.set_int(1, 4);
    let _ = ctx.cycle();
    assert_eq!(ctx.int(2), 25);
}

#[test]
fn test_running_off_the_end() {
    let mut ctx = TestContext::new(vec![
        Instruction::jump(2),
        Instruction::end(),
        Instruction::set_bit(0),
    ]);
    assert_eq!(ctx.cycle(), CycleOutcome::RanOffEnd);
    assert!(ctx.bit(0));
    assert_eq!(ctx.stats().ran_off_end, 1);
    assert_eq!(ctx.stats().cycles, 1);
}

#[test]
fn test_watchdog_cuts_infinite_loop() {
    let mut config = Config::default();
    config.engine.max_steps_per_cycle = Some(5);
    let mut ctx = TestContext::with_config(vec![Instruction::jump(0), Instruction::end()], &config);
    assert_eq!(ctx.cycle(), CycleOutcome::WatchdogTripped { steps: 5 });
    assert_eq!(ctx.stats().watchdog_trips, 1);
    assert_eq!(ctx.stats().instructions, 5);
    assert_eq!(ctx.stats().jumps_taken, 5);
}

#[test]
fn test_watchdog_does_not_trip_short_cycles() {
    let mut config = Config::default();
    config.engine.max_steps_per_cycle = Some(2);
    let mut ctx = TestContext::with_config(vec![Instruction::set_bit(0), Instruction::end()], &config);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert_eq!(ctx.stats().watchdog_trips, 0);
}

#[test]
fn test_tracing_does_not_change_results() {
    let mut config = Config::default();
    config.general.trace_instructions = true;
    let mut ctx = TestContext::with_config(
        vec![
            Instruction::set_literal(0, 3),
            Instruction::new(30, 0, 0, 0, 0),
            Instruction::end(),
        ],
        &config,
    );
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert_eq!(ctx.int(0), 3);
}

#[test]
fn test_interpreters_are_independent() {
    let config = Config::default();
    let program = Program::new(vec![Instruction::increment(0), Instruction::end()], &config.memory)
        .expect("valid");
    let mut a = Interpreter::new(program.clone(), &config);
    let mut b = Interpreter::new(program, &config);
    let _ = a.interpret_one_cycle();
    let _ = a.interpret_one_cycle();
    let _ = b.interpret_one_cycle();
    assert_eq!(a.memory().int(0), Some(2));
    assert_eq!(b.memory().int(0), Some(1));
}

#[test]
fn test_replace_program_keeps_memory() {
    let config = Config::default();
    let inc = Program::new(vec![Instruction::increment(0), Instruction::end()], &config.memory)
        .expect("valid");
    let dec = Program::new(vec![Instruction::decrement(0), Instruction::end()], &config.memory)
        .expect("valid");

    let mut memory = Memory::new(8, 8);
    memory.set_int(0, 10).expect("in range");
    let mut interp = Interpreter::with_memory(inc.clone(), memory, &config);
    let _ = interp.interpret_one_cycle();
    assert_eq!(interp.memory().int(0), Some(11));

    let old = interp.replace_program(dec);
    assert_eq!(old, inc);
    let _ = interp.interpret_one_cycle();
    let _ = interp.interpret_one_cycle();
    assert_eq!(interp.memory().int(0), Some(9));
    assert_eq!(interp.stats().cycles, 3);
}

// ══════════════════════════════════════════════════════════
// End-to-end scenarios
// ══════════════════════════════════════════════════════════

#[test]
fn test_set_bit_touches_nothing_else() {
    let mut ctx = TestContext::new(vec![Instruction::set_bit(0), Instruction::end()]);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);

    let mut expected = Memory::default();
    expected.set_bit(0, true).expect("in range");
    assert_eq!(ctx.interp.memory(), &expected);
}

#[test]
fn test_literal_divide_by_zero_program() {
    let mut ctx = TestContext::new(vec![
        Instruction::set_literal(0, 5),
        Instruction::set_literal(1, 0),
        Instruction::arith(opcodes::SET_VARIABLE_DIVIDE, 2, 0, 1),
        Instruction::end(),
    ]);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert_eq!(ctx.int(2), 0);
    assert_eq!(ctx.int(0), 5);
}

#[test]
fn test_unrecognised_opcode_leaves_memory() {
    let mut ctx = TestContext::new(vec![Instruction::new(99, 1, 2, 3, 4), Instruction::end()]);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert_eq!(ctx.interp.memory(), &Memory::default());
    assert_eq!(ctx.stats().unsupported_ops, 1);
}

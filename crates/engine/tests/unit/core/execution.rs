//! # Instruction Execution Tests
//!
//! Verifies each opcode's effect on memory for one cycle, including the
//! inverted ("unless") sense of every conditional.

use ldvm_core::config::MemoryConfig;
use ldvm_core::core::{CycleOutcome, Memory};
use ldvm_core::isa::opcodes;
use ldvm_core::Instruction;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Bit operations
// ══════════════════════════════════════════════════════════

#[test]
fn test_set_and_clear_bit() {
    let mut ctx = TestContext::new(vec![
        Instruction::set_bit(3),
        Instruction::clear_bit(4),
        Instruction::end(),
    ]);
    ctx.set_bit(4, true);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert!(ctx.bit(3));
    assert!(!ctx.bit(4));
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_copy_bit(#[case] value: bool) {
    let mut ctx = TestContext::new(vec![Instruction::copy_bit(1, 0), Instruction::end()]);
    ctx.set_bit(0, value);
    ctx.set_bit(1, !value);
    let _ = ctx.cycle();
    assert_eq!(ctx.bit(1), value);
}

// ══════════════════════════════════════════════════════════
// 2. Integer operations
// ══════════════════════════════════════════════════════════

#[test]
fn test_set_literal_and_copy_variable() {
    let mut ctx = TestContext::new(vec![
        Instruction::set_literal(0, -1234),
        Instruction::set_variable(1, 0),
        Instruction::end(),
    ]);
    let _ = ctx.cycle();
    assert_eq!(ctx.int(0), -1234);
    assert_eq!(ctx.int(1), -1234);
}

#[test]
fn test_increment_and_decrement() {
    let mut ctx = TestContext::new(vec![
        Instruction::increment(0),
        Instruction::decrement(1),
        Instruction::end(),
    ]);
    ctx.set_int(0, 41);
    let _ = ctx.cycle();
    assert_eq!(ctx.int(0), 42);
    assert_eq!(ctx.int(1), -1);
}

#[test]
fn test_increment_wraps() {
    let mut ctx = TestContext::new(vec![Instruction::increment(0), Instruction::end()]);
    ctx.set_int(0, i32::MAX);
    let _ = ctx.cycle();
    assert_eq!(ctx.int(0), i32::MIN);
}

#[rstest]
#[case::add(opcodes::SET_VARIABLE_ADD, 7, 3, 10)]
#[case::sub(opcodes::SET_VARIABLE_SUBTRACT, 7, 3, 4)]
#[case::mul(opcodes::SET_VARIABLE_MULTIPLY, 7, 3, 21)]
#[case::div(opcodes::SET_VARIABLE_DIVIDE, 7, 3, 2)]
#[case::modulo(opcodes::SET_VARIABLE_MOD, 7, 3, 1)]
#[case::div_negative(opcodes::SET_VARIABLE_DIVIDE, -7, 2, -3)]
#[case::mod_negative(opcodes::SET_VARIABLE_MOD, -7, 2, -1)]
#[case::add_wraps(opcodes::SET_VARIABLE_ADD, i32::MAX, 1, i32::MIN)]
#[case::div_overflow_wraps(opcodes::SET_VARIABLE_DIVIDE, i32::MIN, -1, i32::MIN)]
fn test_arith_writes_destination(
    #[case] op: i16,
    #[case] lhs: i32,
    #[case] rhs: i32,
    #[case] expected: i32,
) {
    let mut ctx = TestContext::new(vec![Instruction::arith(op, 2, 0, 1), Instruction::end()]);
    ctx.set_int(0, lhs);
    ctx.set_int(1, rhs);
    let _ = ctx.cycle();
    assert_eq!(ctx.int(2), expected);
    assert_eq!((ctx.int(0), ctx.int(1)), (lhs, rhs), "sources unchanged");
}

#[test]
fn test_destination_may_alias_source() {
    let mut ctx = TestContext::new(vec![
        Instruction::arith(opcodes::SET_VARIABLE_MULTIPLY, 0, 0, 0),
        Instruction::end(),
    ]);
    ctx.set_int(0, 9);
    let _ = ctx.cycle();
    assert_eq!(ctx.int(0), 81);
}

#[rstest]
#[case::divide(opcodes::SET_VARIABLE_DIVIDE)]
#[case::modulo(opcodes::SET_VARIABLE_MOD)]
fn test_zero_divisor_leaves_destination(#[case] op: i16) {
    let mut ctx = TestContext::new(vec![
        Instruction::arith(op, 2, 0, 1),
        Instruction::set_bit(0),
        Instruction::end(),
    ]);
    ctx.set_int(0, 10);
    ctx.set_int(2, 42);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert_eq!(ctx.int(2), 42);
    assert!(ctx.bit(0), "execution continues with the next instruction");
    assert_eq!(ctx.stats().div_by_zero, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Conditionals: jump when the condition does NOT hold
// ══════════════════════════════════════════════════════════

/// Runs `cond` (targeting PC 3) in a two-armed program and reports which arm ran.
///
/// Layout: `0: cond -> 3`, `1: set bit 0`, `2: end`, `3: set bit 1`, `4: jump 2`.
fn branch_taken(cond: Instruction, bit5: bool, a: i32, b: i32) -> (bool, bool) {
    let mut ctx = TestContext::new(vec![
        cond,
        Instruction::set_bit(0),
        Instruction::end(),
        Instruction::set_bit(1),
        Instruction::jump(2),
    ]);
    ctx.set_bit(5, bit5);
    ctx.set_int(0, a);
    ctx.set_int(1, b);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    (ctx.bit(0), ctx.bit(1))
}

#[rstest]
#[case::bit_set_holds(Instruction::if_bit_set(5, 3), true, 0, 0, true)]
#[case::bit_set_fails(Instruction::if_bit_set(5, 3), false, 0, 0, false)]
#[case::bit_clear_holds(Instruction::if_bit_clear(5, 3), false, 0, 0, true)]
#[case::bit_clear_fails(Instruction::if_bit_clear(5, 3), true, 0, 0, false)]
#[case::less_literal_holds(Instruction::if_less_literal(0, 10, 3), false, 9, 0, true)]
#[case::less_literal_equal(Instruction::if_less_literal(0, 10, 3), false, 10, 0, false)]
#[case::less_literal_negative(Instruction::if_less_literal(0, -5, 3), false, -6, 0, true)]
#[case::eq_holds(Instruction::if_compare(opcodes::IF_VARIABLE_EQUALS_VARIABLE, 0, 1, 3), false, 4, 4, true)]
#[case::eq_fails(Instruction::if_compare(opcodes::IF_VARIABLE_EQUALS_VARIABLE, 0, 1, 3), false, 4, 5, false)]
#[case::gt_holds(Instruction::if_compare(opcodes::IF_VARIABLE_GRT_VARIABLE, 0, 1, 3), false, 5, 4, true)]
#[case::gt_equal(Instruction::if_compare(opcodes::IF_VARIABLE_GRT_VARIABLE, 0, 1, 3), false, 4, 4, false)]
#[case::geq_equal(Instruction::if_compare(opcodes::IF_GEQ, 0, 1, 3), false, 4, 4, true)]
#[case::geq_fails(Instruction::if_compare(opcodes::IF_GEQ, 0, 1, 3), false, 3, 4, false)]
#[case::leq_equal(Instruction::if_compare(opcodes::IF_LEQ, 0, 1, 3), false, 4, 4, true)]
#[case::leq_fails(Instruction::if_compare(opcodes::IF_LEQ, 0, 1, 3), false, 5, 4, false)]
#[case::neq_holds(Instruction::if_compare(opcodes::IF_NEQ, 0, 1, 3), false, 1, 2, true)]
#[case::neq_fails(Instruction::if_compare(opcodes::IF_NEQ, 0, 1, 3), false, 2, 2, false)]
fn test_unless_semantics(
    #[case] cond: Instruction,
    #[case] bit5: bool,
    #[case] a: i32,
    #[case] b: i32,
    #[case] holds: bool,
) {
    let (fell_through, jumped) = branch_taken(cond, bit5, a, b);
    assert_eq!(fell_through, holds, "fall-through arm");
    assert_eq!(jumped, !holds, "jump arm");
}

#[test]
fn test_neq_is_not_eq() {
    let eq = Instruction::if_compare(opcodes::IF_VARIABLE_EQUALS_VARIABLE, 0, 1, 3);
    let neq = Instruction::if_compare(opcodes::IF_NEQ, 0, 1, 3);
    for (a, b) in [(1, 1), (1, 2)] {
        assert_ne!(branch_taken(eq, false, a, b), branch_taken(neq, false, a, b));
    }
}

#[test]
fn test_geq_leq_ignore_literal() {
    // The literal would fail both comparisons if it were the right-hand side.
    let geq = Instruction::new(opcodes::IF_GEQ, 0, 1, 3, 1000);
    let leq = Instruction::new(opcodes::IF_LEQ, 0, 1, 3, -1000);
    assert_eq!(branch_taken(geq, false, 4, 4), (true, false));
    assert_eq!(branch_taken(leq, false, 4, 4), (true, false));
    assert_eq!(branch_taken(geq, false, 3, 4), (false, true));
}

#[test]
fn test_jump_is_absolute() {
    let mut ctx = TestContext::new(vec![
        Instruction::jump(2),
        Instruction::set_bit(0),
        Instruction::set_bit(1),
        Instruction::end(),
    ]);
    let _ = ctx.cycle();
    assert!(!ctx.bit(0), "skipped instruction must not run");
    assert!(ctx.bit(1), "target instruction itself must run");
    assert_eq!(ctx.stats().jumps_taken, 1);
}

// ══════════════════════════════════════════════════════════
// 4. Non-executing opcodes
// ══════════════════════════════════════════════════════════

#[test]
fn test_markers_are_no_ops() {
    let mut ctx = TestContext::new(vec![
        Instruction::new(opcodes::ALLOC_FWD_ADDR, 1, 0, 0, 0),
        Instruction::new(opcodes::ALLOC_KNOWN_ADDR, 2, 0, 0, 0),
        Instruction::new(opcodes::FWD_ADDR_IS_NOW, 1, 0, 0, 0),
        Instruction::end(),
    ]);
    assert_eq!(ctx.cycle(), CycleOutcome::Completed);
    assert_eq!(ctx.interp.memory(), &Memory::from_config(&MemoryConfig::default()));
    assert_eq!(ctx.stats().instructions, 4);
    assert_eq!(ctx.stats().anomalies(), 0);
}

proptest! {
    #[test]
    fn prop_markers_ignore_operands(
        kind in prop::sample::select(vec![
            opcodes::ALLOC_FWD_ADDR,
            opcodes::ALLOC_KNOWN_ADDR,
            opcodes::FWD_ADDR_IS_NOW,
        ]),
        n1: i16,
        n2: i16,
        n3: i16,
        lit: i32,
    ) {
        let mut ctx = TestContext::new(vec![Instruction::new(kind, n1, n2, n3, lit), Instruction::end()]);
        prop_assert_eq!(ctx.cycle(), CycleOutcome::Completed);
        prop_assert_eq!(ctx.interp.memory(), &Memory::default());
        prop_assert_eq!(ctx.stats().address_faults, 0);
        prop_assert_eq!(ctx.stats().jumps_taken, 0);
    }
}

#[test]
fn test_unsupported_opcode_skipped() {
    let mut ctx = TestContext::new(vec![
        Instruction::new(30, 0, 0, 0, 0),
        Instruction::set_bit(0),
        Instruction::end(),
    ]);
    assert_eq!(ctx.run(3), CycleOutcome::Completed);
    assert!(ctx.bit(0));
    assert_eq!(ctx.stats().unsupported_ops, 3, "counted every cycle");
}

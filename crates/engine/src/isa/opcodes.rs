//! Interpretable opcode numbering.
//!
//! Values stored in the `op` field of an instruction record. Bit and integer
//! assignment keep their historical low numbers; conditionals occupy the
//! `50..60` block so a compiler can recognise them as a group.

/// `bits[name1] := 1`
pub const SET_BIT: i16 = 1;

/// `bits[name1] := 0`
pub const CLEAR_BIT: i16 = 2;

/// `bits[name1] := bits[name2]`
pub const COPY_BIT_TO_BIT: i16 = 3;

/// `int16s[name1] := literal1`
pub const SET_VARIABLE_TO_LITERAL: i16 = 4;

/// `int16s[name1] := int16s[name2]`
pub const SET_VARIABLE_TO_VARIABLE: i16 = 5;

/// `int16s[name1] += 1`
pub const INCREMENT_VARIABLE: i16 = 6;

/// `int16s[name1] := int16s[name2] + int16s[name3]`
pub const SET_VARIABLE_ADD: i16 = 7;

/// `int16s[name1] := int16s[name2] - int16s[name3]`
pub const SET_VARIABLE_SUBTRACT: i16 = 8;

/// `int16s[name1] := int16s[name2] * int16s[name3]`
pub const SET_VARIABLE_MULTIPLY: i16 = 9;

/// `int16s[name1] := int16s[name2] / int16s[name3]`, skipped on a zero divisor.
pub const SET_VARIABLE_DIVIDE: i16 = 10;

/// `int16s[name1] -= 1`
pub const DECREMENT_VARIABLE: i16 = 18;

/// `int16s[name1] := int16s[name2] % int16s[name3]`, skipped on a zero divisor.
pub const SET_VARIABLE_MOD: i16 = 19;

/// Unless `bits[name1]` is set, jump to `name3`.
pub const IF_BIT_SET: i16 = 50;

/// Unless `bits[name1]` is clear, jump to `name3`.
pub const IF_BIT_CLEAR: i16 = 51;

/// Unless `int16s[name1] < literal1`, jump to `name3`.
pub const IF_VARIABLE_LES_LITERAL: i16 = 52;

/// Unless `int16s[name1] == int16s[name2]`, jump to `name3`.
pub const IF_VARIABLE_EQUALS_VARIABLE: i16 = 53;

/// Unless `int16s[name1] > int16s[name2]`, jump to `name3`.
pub const IF_VARIABLE_GRT_VARIABLE: i16 = 54;

/// Unless `int16s[name1] >= int16s[name2]`, jump to `name3`.
///
/// Both sides are variables. Older LDmicro interpreters compared
/// `int16s[name1]` against `literal1` here even though their listings showed
/// `int16s[name2]`; records from those tools will behave differently.
pub const IF_GEQ: i16 = 55;

/// Unless `int16s[name1] <= int16s[name2]`, jump to `name3`.
///
/// Variable against variable, like [`IF_GEQ`]; older interpreters used
/// `literal1` as the right-hand side.
pub const IF_LEQ: i16 = 56;

/// Unless `int16s[name1] != int16s[name2]`, jump to `name3`.
pub const IF_NEQ: i16 = 57;

/// Unconditional jump to `name3` (named after the `else` it lowers from).
pub const ELSE: i16 = 60;

/// Compiler fixup marker: forward address allocated.
pub const ALLOC_FWD_ADDR: i16 = 70;

/// Compiler fixup marker: known address allocated.
pub const ALLOC_KNOWN_ADDR: i16 = 71;

/// Compiler fixup marker: forward address resolved here.
pub const FWD_ADDR_IS_NOW: i16 = 72;

/// Ends the cycle.
pub const END_OF_PROGRAM: i16 = 255;

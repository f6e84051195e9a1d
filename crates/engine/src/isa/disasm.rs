//! Instruction Disassembler.
//!
//! Converts instruction records into human-readable text for debug
//! listings, tracing and test diagnostics. Bit variables and integer
//! variables live in separate address spaces and are printed as
//! `bits[addr]` and `int16s[addr]` respectively.
//!
//! Conditionals print with "unless" phrasing because the jump is taken when
//! the named condition is false:
//!
//! ```ignore
//! use ldvm_core::isa::disasm::disassemble;
//! use ldvm_core::Instruction;
//!
//! let text = disassemble(&Instruction::if_bit_set(3, 0x10));
//! assert_eq!(text, "unless (bits[003] set) jump 010");
//! ```

use std::fmt;

use tracing::warn;

use crate::common::DisasmError;
use crate::isa::decode::{Op, decode};
use crate::isa::instruction::Instruction;

/// Disassembles one instruction record.
///
/// Returns a mnemonic like `"int16s[002] := int16s[000] / int16s[001]"`.
/// Unsupported opcodes produce a diagnostic line rather than an error.
pub fn disassemble(inst: &Instruction) -> String {
    match decode(inst) {
        Op::WriteBit { dst, value } => format!("bits[{dst:03x}] := {}", u8::from(value)),
        Op::CopyBit { dst, src } => format!("bits[{dst:03x}] := bits[{src:03x}]"),
        Op::SetLiteral { dst, value } => format!("int16s[{dst:03x}] := {value} (0x{value:04x})"),
        Op::SetVariable { dst, src } => format!("int16s[{dst:03x}] := int16s[{src:03x}]"),
        Op::Step { dst, delta } => {
            let sign = if delta > 0 { "++" } else { "--" };
            format!("(int16s[{dst:03x}]){sign}")
        }
        Op::Arith {
            kind,
            dst,
            lhs,
            rhs,
        } => format!(
            "int16s[{dst:03x}] := int16s[{lhs:03x}] {} int16s[{rhs:03x}]",
            kind.symbol()
        ),
        Op::UnlessBit {
            bit,
            expect,
            target,
        } => {
            let state = if expect { "set" } else { "clear" };
            format!("unless (bits[{bit:03x}] {state}) jump {target:03x}")
        }
        Op::UnlessLiteral {
            cmp,
            var,
            literal,
            target,
        } => format!(
            "unless (int16s[{var:03x}] {} {literal}) jump {target:03x}",
            cmp.symbol()
        ),
        Op::UnlessCompare {
            cmp,
            lhs,
            rhs,
            target,
        } => format!(
            "unless (int16s[{lhs:03x}] {} int16s[{rhs:03x}]) jump {target:03x}",
            cmp.symbol()
        ),
        Op::Jump { target } => format!("jump {target:03x}"),
        Op::End => "<end of program>".to_string(),
        Op::Marker { kind, label } => format!("{} {label:03}", kind.mnemonic()),
        Op::Unsupported { op } => {
            format!("Unsupported op (Peripheral) for interpretable target. INT_{op}")
        }
    }
}

/// Disassembly of a whole program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// One `PPP: text` line per instruction, up to and including the end marker.
    pub lines: Vec<String>,
    /// Number of unsupported opcodes encountered.
    pub bad_codes: usize,
}

impl Listing {
    /// Converts a nonzero bad-code count into an error.
    pub const fn check(&self) -> Result<(), DisasmError> {
        if self.bad_codes > 0 {
            Err(DisasmError::BadCodes {
                count: self.bad_codes,
            })
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Disassembles a program from PC 0 to its end-of-program marker.
///
/// Unsupported opcodes never stop the listing; they are counted and, if any
/// were seen, reported once after the walk finishes.
pub fn disassemble_program(program: &[Instruction]) -> Listing {
    let mut listing = Listing::default();
    for (pc, inst) in program.iter().enumerate() {
        let op = decode(inst);
        if matches!(op, Op::Unsupported { .. }) {
            listing.bad_codes += 1;
        }
        listing
            .lines
            .push(format!("{pc:03x}: {}", disassemble(inst)));
        if op == Op::End {
            break;
        }
    }
    if listing.bad_codes > 0 {
        warn!(
            bad_codes = listing.bad_codes,
            "program contains opcodes unsupported by the interpreter"
        );
    }
    listing
}

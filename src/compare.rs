//! Comparison primitives over widened 64-bit operands.
//!
//! Assertion macros widen both operands at the call site, either to `u64` or
//! to `i64`, and hand them here. Widening picks the comparison's meaning:
//! a negative value pushed through the unsigned path becomes a large positive
//! magnitude, which is well defined but almost never what the test meant.
//! Choosing the correctly-signed variant is the caller's responsibility; the
//! protocol never tries to infer signedness from the operands.
//!
//! [`ValuePair`] carries both operands of a failed comparison so the report
//! can show them next to the expression text, rendered under the same
//! signedness the comparison used.

use std::fmt;

/// True iff both operands are bit-identical after widening to `u64`.
///
/// Used for generic equality regardless of source signedness. Two negative
/// values of the same signed type still compare equal here because widening
/// sign-extends both the same way.
pub fn eq_u64(lhs: u64, rhs: u64) -> bool {
    lhs == rhs
}

/// True iff `lhs <= rhs` under unsigned 64-bit ordering.
pub fn le_u64(lhs: u64, rhs: u64) -> bool {
    lhs <= rhs
}

/// True iff `lhs <= rhs` under signed 64-bit ordering.
pub fn le_i64(lhs: i64, rhs: i64) -> bool {
    lhs <= rhs
}

/// Both operands of a failed comparison, tagged with the signedness the
/// comparison ran under so the report renders them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePair {
    /// Operands of an equality or unsigned-ordering comparison.
    Unsigned { lhs: u64, rhs: u64 },
    /// Operands of a signed-ordering comparison.
    Signed { lhs: i64, rhs: i64 },
}

impl ValuePair {
    /// Report line for the left operand, hex pattern plus decimal value.
    pub fn lhs_line(&self) -> String {
        match *self {
            ValuePair::Unsigned { lhs, .. } => format_side("lhs", lhs, &lhs),
            ValuePair::Signed { lhs, .. } => format_side("lhs", lhs as u64, &lhs),
        }
    }

    /// Report line for the right operand, hex pattern plus decimal value.
    pub fn rhs_line(&self) -> String {
        match *self {
            ValuePair::Unsigned { rhs, .. } => format_side("rhs", rhs, &rhs),
            ValuePair::Signed { rhs, .. } => format_side("rhs", rhs as u64, &rhs),
        }
    }
}

// The hex field always shows the full 64-bit pattern, so a signed value is
// printed with its two's-complement representation next to its decimal form.
fn format_side(label: &str, bits: u64, decimal: &dyn fmt::Display) -> String {
    format!("{} = 0x{:016x} = {}", label, bits, decimal)
}

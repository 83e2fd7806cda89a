//! Curve Constants
//!
//! The Ed25519 basepoint and its precomputed multiplication tables.
//! Table construction is deterministic but not free, so both tables are
//! built once on first use and shared for the life of the process.

use lazy_static::lazy_static;

use crate::group::GroupElement;
use crate::table::{DoubleScalarMultiplicationTable, ScalarMultiplicationTable};

/// Canonical encoding of the basepoint B = (x, 4/5) with x positive
pub const BASEPOINT_BYTES: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66,
];

lazy_static! {
    static ref BASEPOINT: GroupElement = GroupElement::decode(&BASEPOINT_BYTES)
        .expect("the basepoint encoding is a valid curve point");
    static ref BASEPOINT_TABLE: ScalarMultiplicationTable =
        BASEPOINT.precompute_for_scalar_multiplication();
    static ref BASEPOINT_DOUBLE_TABLE: DoubleScalarMultiplicationTable =
        BASEPOINT.precompute_for_double_scalar_multiplication();
}

/// The group basepoint in extended coordinates
pub fn basepoint() -> GroupElement {
    *BASEPOINT
}

/// Shared constant-time fixed-base table for the basepoint
pub fn basepoint_table() -> &'static ScalarMultiplicationTable {
    &BASEPOINT_TABLE
}

/// Shared sliding-window table for the basepoint, used in verification
pub fn basepoint_double_table() -> &'static DoubleScalarMultiplicationTable {
    &BASEPOINT_DOUBLE_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basepoint_encoding_roundtrips() {
        assert_eq!(basepoint().encode(), BASEPOINT_BYTES);
    }

    #[test]
    fn test_basepoint_has_large_order() {
        assert!(!basepoint().is_small_order());
        assert!(basepoint().is_on_curve());
    }
}

//! Scalar Multiplication Engine
//!
//! Precomputed window tables over a fixed base point:
//!
//! - `ScalarMultiplicationTable`: 32 windows of 8 affine multiples,
//!   driven by signed radix-16 digits. Selection is constant time, so
//!   this path is safe for secret scalars (key derivation, signing,
//!   shared secrets).
//! - `DoubleScalarMultiplicationTable`: 8 cached odd multiples for the
//!   width-5 sliding-window combination a·P + b·Q. Variable time; only
//!   ever fed public data during signature verification.
//!
//! Table construction is a one-off cost paid per base point. The
//! basepoint tables are built once at first use (see `constants`).

use crate::field::FieldElement;
use crate::group::{Cached, Completed, Extended, GroupElement, Precomputed, Projective};
use crate::scalar::Scalar;

// MARK: - Constant-time helpers

/// 1 when b == c, 0 otherwise, without data-dependent branches
fn equal(b: u8, c: u8) -> u8 {
    let x = u32::from(b ^ c);
    (x.wrapping_sub(1) >> 31) as u8
}

/// 1 for a negative digit, 0 otherwise
fn is_negative_digit(d: i8) -> u8 {
    ((d >> 7) & 1) as u8
}

impl Precomputed {
    const IDENTITY: Self = Self {
        y_plus_x: FieldElement::ONE,
        y_minus_x: FieldElement::ONE,
        xy2d: FieldElement::ZERO,
    };

    fn cmov(&self, other: &Self, choice: u8) -> Self {
        Self {
            y_plus_x: self.y_plus_x.cmov(&other.y_plus_x, choice),
            y_minus_x: self.y_minus_x.cmov(&other.y_minus_x, choice),
            xy2d: self.xy2d.cmov(&other.xy2d, choice),
        }
    }

    /// -P in the affine table form: swap the sum/difference coordinates
    /// and flip the sign of the product term.
    fn negated(&self) -> Self {
        Self {
            y_plus_x: self.y_minus_x,
            y_minus_x: self.y_plus_x,
            xy2d: self.xy2d.negate(),
        }
    }
}

// MARK: - Fixed-base table

/// Window table for constant-time multiplication by a fixed base.
///
/// Window `i` holds the affine multiples (1..=8)·256^i·P, so a scalar
/// split into signed radix-16 digits walks the table with one mixed
/// addition per digit and four doublings between the odd and even
/// passes.
pub struct ScalarMultiplicationTable {
    windows: [[Precomputed; 8]; 32],
}

impl ScalarMultiplicationTable {
    pub(crate) fn new(base: &GroupElement) -> Self {
        let mut windows = [[Precomputed::IDENTITY; 8]; 32];
        let mut window_base = base.to_extended();
        for window in windows.iter_mut() {
            let mut multiple = window_base;
            for entry in window.iter_mut() {
                *entry = multiple.to_precomputed();
                multiple = multiple
                    .add(&window_base.to_cached())
                    .to_extended();
            }
            // Advance to 256·(current base) for the next window.
            for _ in 0..8 {
                window_base = window_base.to_projective().double().to_extended();
            }
        }
        Self { windows }
    }

    /// Constant-time lookup of digit·256^window·P for digit in -8..=8.
    fn select(&self, window: usize, digit: i8) -> Precomputed {
        let negative = is_negative_digit(digit);
        // |digit| without branching on the sign
        let mask = -(negative as i8);
        let babs = (digit - ((mask & digit) << 1)) as u8;

        let mut t = Precomputed::IDENTITY;
        for (j, entry) in self.windows[window].iter().enumerate() {
            t = t.cmov(entry, equal(babs, (j + 1) as u8));
        }
        t.cmov(&t.negated(), negative)
    }

    /// Compute scalar·P in constant time.
    ///
    /// Odd radix-16 digits are accumulated first, the partial result is
    /// multiplied by 16 with four doublings, then the even digits land.
    pub fn multiply(&self, scalar: &Scalar) -> GroupElement {
        let digits = scalar.to_radix16_digits();

        let mut h = Extended::IDENTITY;
        for i in (1..64).step_by(2) {
            h = h.add_precomputed(&self.select(i / 2, digits[i])).to_extended();
        }

        let mut p = h.to_projective();
        for _ in 0..3 {
            p = p.double().to_projective();
        }
        h = p.double().to_extended();

        for i in (0..64).step_by(2) {
            h = h.add_precomputed(&self.select(i / 2, digits[i])).to_extended();
        }
        GroupElement::Extended(h)
    }
}

// MARK: - Double-scalar table

/// Cached odd multiples P, 3P, 5P, ..., 15P for width-5 sliding-window
/// evaluation. Variable time: reserved for public inputs.
pub struct DoubleScalarMultiplicationTable {
    odd_multiples: [Cached; 8],
}

impl DoubleScalarMultiplicationTable {
    pub(crate) fn new(base: &GroupElement) -> Self {
        let p = base.to_extended();
        let p2 = p.to_projective().double().to_extended();

        let mut odd_multiples = [p.to_cached(); 8];
        for i in 1..8 {
            odd_multiples[i] = p2.add(&odd_multiples[i - 1]).to_extended().to_cached();
        }
        Self { odd_multiples }
    }

    fn entry(&self, digit: i8) -> &Cached {
        // Digits are odd, so d/2 maps 1,3,..,15 onto 0..8.
        &self.odd_multiples[(digit / 2) as usize]
    }
}

/// Evaluate a·P + b·Q in variable time from the two precomputed tables.
///
/// Both scalars are expanded to width-5 signed sliding windows and the
/// accumulator is doubled once per bit from the highest non-zero digit
/// down, adding or subtracting the matching odd multiple where a digit
/// is set.
pub fn double_scalar_multiply_vartime(
    a: &Scalar,
    table_p: &DoubleScalarMultiplicationTable,
    b: &Scalar,
    table_q: &DoubleScalarMultiplicationTable,
) -> GroupElement {
    let a_digits = a.to_sliding_window_digits();
    let b_digits = b.to_sliding_window_digits();

    let mut start = 255usize;
    loop {
        if a_digits[start] != 0 || b_digits[start] != 0 {
            break;
        }
        if start == 0 {
            return GroupElement::identity();
        }
        start -= 1;
    }

    let mut r = Projective {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
    };
    for i in (0..=start).rev() {
        let mut t: Completed = r.double();
        if a_digits[i] > 0 {
            t = t.to_extended().add(table_p.entry(a_digits[i]));
        } else if a_digits[i] < 0 {
            t = t.to_extended().sub(table_p.entry(-a_digits[i]));
        }
        if b_digits[i] > 0 {
            t = t.to_extended().add(table_q.entry(b_digits[i]));
        } else if b_digits[i] < 0 {
            t = t.to_extended().sub(table_q.entry(-b_digits[i]));
        }
        r = t.to_projective();
    }
    GroupElement::Projective(r)
}

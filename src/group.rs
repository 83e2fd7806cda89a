//! Group Element Representations
//!
//! Points on the Ed25519 twisted Edwards curve -x² + y² = 1 + d·x²·y²,
//! tagged by coordinate representation:
//!
//! - `Extended`: (X, Y, Z, T) with x = X/Z, y = Y/Z, T = XY/Z
//! - `Projective`: (X, Y, Z), cheaper doubling
//! - `Completed`: ((X:Z), (Y:T)) intermediate produced by add/double
//! - `Precomputed`: (y+x, y-x, 2dxy) affine form for fixed-base tables
//! - `Cached`: (Y+X, Y-X, Z, 2dT) for repeated addition
//!
//! Representations are an optimization detail, not different objects:
//! every conversion is exact and total. Nothing converts implicitly;
//! `add`/`double` return a `Completed` value and the caller chooses the
//! target representation, so the cost of each step stays visible.

use crate::error::{CryptoError, CryptoResult};
use crate::field::{FieldElement, FIELD_MODULUS};
use crate::table::{DoubleScalarMultiplicationTable, ScalarMultiplicationTable};

/// Extended coordinates (X, Y, Z, T)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extended {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

/// Projective coordinates (X, Y, Z)
#[derive(Debug, Clone, Copy)]
pub struct Projective {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

/// The ((X:Z), (Y:T)) intermediate of the unified addition formulas
#[derive(Debug, Clone, Copy)]
pub struct Completed {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

/// Affine (y+x, y-x, 2dxy), the fixed-base table entry form
#[derive(Debug, Clone, Copy)]
pub struct Precomputed {
    pub(crate) y_plus_x: FieldElement,
    pub(crate) y_minus_x: FieldElement,
    pub(crate) xy2d: FieldElement,
}

/// Projective (Y+X, Y-X, Z, 2dT), the general addition operand form
#[derive(Debug, Clone, Copy)]
pub struct Cached {
    pub(crate) y_plus_x: FieldElement,
    pub(crate) y_minus_x: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t2d: FieldElement,
}

impl Extended {
    pub(crate) const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    pub(crate) fn to_projective(self) -> Projective {
        Projective { x: self.x, y: self.y, z: self.z }
    }

    pub(crate) fn to_cached(self) -> Cached {
        Cached {
            y_plus_x: self.y.add(&self.x),
            y_minus_x: self.y.sub(&self.x),
            z: self.z,
            t2d: self.t.mul(&FieldElement::D2),
        }
    }

    /// Normalize to affine and build the table entry form. Costs one
    /// field inversion.
    pub(crate) fn to_precomputed(self) -> Precomputed {
        let zinv = self.z.invert();
        let x = self.x.mul(&zinv);
        let y = self.y.mul(&zinv);
        Precomputed {
            y_plus_x: y.add(&x),
            y_minus_x: y.sub(&x),
            xy2d: x.mul(&y).mul(&FieldElement::D2),
        }
    }

    pub(crate) fn add(&self, q: &Cached) -> Completed {
        let y_plus_x = self.y.add(&self.x);
        let y_minus_x = self.y.sub(&self.x);
        let pp = y_plus_x.mul(&q.y_plus_x);
        let mm = y_minus_x.mul(&q.y_minus_x);
        let tt2d = self.t.mul(&q.t2d);
        let zz = self.z.mul(&q.z);
        let zz2 = zz.add(&zz);
        Completed {
            x: pp.sub(&mm),
            y: pp.add(&mm),
            z: zz2.add(&tt2d),
            t: zz2.sub(&tt2d),
        }
    }

    pub(crate) fn sub(&self, q: &Cached) -> Completed {
        let y_plus_x = self.y.add(&self.x);
        let y_minus_x = self.y.sub(&self.x);
        let pp = y_plus_x.mul(&q.y_minus_x);
        let mm = y_minus_x.mul(&q.y_plus_x);
        let tt2d = self.t.mul(&q.t2d);
        let zz = self.z.mul(&q.z);
        let zz2 = zz.add(&zz);
        Completed {
            x: pp.sub(&mm),
            y: pp.add(&mm),
            z: zz2.sub(&tt2d),
            t: zz2.add(&tt2d),
        }
    }

    /// Mixed addition against an affine table entry (Z = 1).
    pub(crate) fn add_precomputed(&self, q: &Precomputed) -> Completed {
        let y_plus_x = self.y.add(&self.x);
        let y_minus_x = self.y.sub(&self.x);
        let pp = y_plus_x.mul(&q.y_plus_x);
        let mm = y_minus_x.mul(&q.y_minus_x);
        let tt2d = self.t.mul(&q.xy2d);
        let z2 = self.z.add(&self.z);
        Completed {
            x: pp.sub(&mm),
            y: pp.add(&mm),
            z: z2.add(&tt2d),
            t: z2.sub(&tt2d),
        }
    }

    pub(crate) fn sub_precomputed(&self, q: &Precomputed) -> Completed {
        let y_plus_x = self.y.add(&self.x);
        let y_minus_x = self.y.sub(&self.x);
        let pp = y_plus_x.mul(&q.y_minus_x);
        let mm = y_minus_x.mul(&q.y_plus_x);
        let tt2d = self.t.mul(&q.xy2d);
        let z2 = self.z.add(&self.z);
        Completed {
            x: pp.sub(&mm),
            y: pp.add(&mm),
            z: z2.sub(&tt2d),
            t: z2.add(&tt2d),
        }
    }

    pub(crate) fn negate(&self) -> Self {
        Self {
            x: self.x.negate(),
            y: self.y,
            z: self.z,
            t: self.t.negate(),
        }
    }

    pub(crate) fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y == self.z
    }

    pub(crate) fn encode(&self) -> [u8; 32] {
        let zinv = self.z.invert();
        let x = self.x.mul(&zinv);
        let y = self.y.mul(&zinv);
        let mut s = y.encode();
        if x.is_negative() {
            s[31] |= 0x80;
        }
        s
    }
}

impl Projective {
    pub(crate) fn double(&self) -> Completed {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz = self.z.square();
        let zz2 = zz.add(&zz);
        let xy2 = self.x.add(&self.y).square();
        let yy_plus_xx = yy.add(&xx);
        let yy_minus_xx = yy.sub(&xx);
        Completed {
            x: xy2.sub(&yy_plus_xx),
            y: yy_plus_xx,
            z: yy_minus_xx,
            t: zz2.sub(&yy_minus_xx),
        }
    }
}

impl Completed {
    pub(crate) fn to_extended(self) -> Extended {
        Extended {
            x: self.x.mul(&self.t),
            y: self.y.mul(&self.z),
            z: self.z.mul(&self.t),
            t: self.x.mul(&self.y),
        }
    }

    pub(crate) fn to_projective(self) -> Projective {
        Projective {
            x: self.x.mul(&self.t),
            y: self.y.mul(&self.z),
            z: self.z.mul(&self.t),
        }
    }
}

/// A point on the curve, tagged by its coordinate representation
#[derive(Debug, Clone, Copy)]
pub enum GroupElement {
    Extended(Extended),
    Projective(Projective),
    Completed(Completed),
    Precomputed(Precomputed),
    Cached(Cached),
}

impl GroupElement {
    /// The neutral element (0, 1) in extended coordinates
    pub fn identity() -> Self {
        Self::Extended(Extended::IDENTITY)
    }

    /// Convert to extended coordinates. Total for every representation;
    /// the Projective, Precomputed and Cached arms pay a field inversion
    /// to reconstruct the T coordinate.
    pub fn to_extended(&self) -> Extended {
        match self {
            Self::Extended(p) => *p,
            Self::Projective(p) => {
                let zinv = p.z.invert();
                Extended {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    t: p.x.mul(&p.y).mul(&zinv),
                }
            }
            Self::Completed(p) => p.to_extended(),
            Self::Precomputed(p) => {
                let two = FieldElement::ONE.add(&FieldElement::ONE);
                let half = two.invert();
                let y = p.y_plus_x.add(&p.y_minus_x).mul(&half);
                let x = p.y_plus_x.sub(&p.y_minus_x).mul(&half);
                Extended {
                    x,
                    y,
                    z: FieldElement::ONE,
                    t: x.mul(&y),
                }
            }
            Self::Cached(p) => {
                // Stored values are Y+X, Y-X relative to Z; doubling the
                // denominator keeps the point unchanged.
                let x2 = p.y_plus_x.sub(&p.y_minus_x);
                let y2 = p.y_plus_x.add(&p.y_minus_x);
                let z2 = p.z.add(&p.z);
                let zinv = z2.invert();
                Extended {
                    x: x2,
                    y: y2,
                    z: z2,
                    t: x2.mul(&y2).mul(&zinv),
                }
            }
        }
    }

    pub fn to_projective(&self) -> Self {
        match self {
            Self::Projective(p) => Self::Projective(*p),
            Self::Completed(p) => Self::Projective(p.to_projective()),
            _ => Self::Projective(self.to_extended().to_projective()),
        }
    }

    pub fn to_cached(&self) -> Self {
        Self::Cached(self.to_extended().to_cached())
    }

    pub fn to_precomputed(&self) -> Self {
        Self::Precomputed(self.to_extended().to_precomputed())
    }

    /// Unified Edwards addition: self (as Extended) + other (as Cached),
    /// yielding a Completed element.
    pub fn add(&self, other: &Self) -> Self {
        let p = self.to_extended();
        let q = match other {
            Self::Cached(c) => *c,
            _ => other.to_extended().to_cached(),
        };
        Self::Completed(p.add(&q))
    }

    pub fn subtract(&self, other: &Self) -> Self {
        let p = self.to_extended();
        let q = match other {
            Self::Cached(c) => *c,
            _ => other.to_extended().to_cached(),
        };
        Self::Completed(p.sub(&q))
    }

    /// Doubling via the projective formula, yielding a Completed element.
    pub fn double(&self) -> Self {
        let p = match self {
            Self::Projective(p) => *p,
            Self::Completed(p) => p.to_projective(),
            _ => self.to_extended().to_projective(),
        };
        Self::Completed(p.double())
    }

    pub fn negate(&self) -> Self {
        Self::Extended(self.to_extended().negate())
    }

    pub fn is_identity(&self) -> bool {
        self.to_extended().is_identity()
    }

    /// Check the curve equation -x² + y² = 1 + d·x²·y² in extended
    /// coordinates, along with the T = XY/Z invariant. Used on every
    /// decoded untrusted input.
    pub fn is_on_curve(&self) -> bool {
        let p = self.to_extended();
        let xx = p.x.square();
        let yy = p.y.square();
        let zz = p.z.square();
        let tt = p.t.square();
        let lhs = yy.sub(&xx);
        let rhs = zz.add(&FieldElement::D.mul(&tt));
        lhs == rhs && p.t.mul(&p.z) == p.x.mul(&p.y)
    }

    /// True when the point has order 1, 2, 4 or 8. Such points are
    /// rejected as public keys during verification.
    pub fn is_small_order(&self) -> bool {
        let mut p = self.to_projective();
        for _ in 0..3 {
            p = p.double();
        }
        p.to_extended().is_identity()
    }

    /// Canonical 32-byte encoding: little-endian y with the sign of x
    /// in the top bit.
    pub fn encode(&self) -> [u8; 32] {
        self.to_extended().encode()
    }

    /// Decode a canonical 32-byte encoding into an extended-coordinate
    /// element.
    ///
    /// Strict about canonical form: rejects y >= p, rejects encodings
    /// whose implied x² has no square root, and rejects a set sign bit
    /// when x = 0. The reconstructed point is checked against the curve
    /// equation before being returned.
    pub fn decode(bytes: &[u8; 32]) -> CryptoResult<Self> {
        let mut y_bytes = *bytes;
        let sign = (y_bytes[31] >> 7) & 1;
        y_bytes[31] &= 0x7f;

        if !is_canonical_field_encoding(&y_bytes) {
            return Err(CryptoError::InvalidEncoding(
                "Point y coordinate not below the field modulus".into(),
            ));
        }

        let y = FieldElement::decode(&y_bytes)?;
        let y2 = y.square();
        let u = y2.sub(&FieldElement::ONE);
        let v = FieldElement::D.mul(&y2).add(&FieldElement::ONE);

        // x = (u·v³)·(u·v⁷)^((p-5)/8), then fix up by sqrt(-1) if needed.
        let v3 = v.square().mul(&v);
        let v7 = v3.square().mul(&v);
        let mut x = u.mul(&v3).mul(&u.mul(&v7).pow_p58());

        let vx2 = v.mul(&x.square());
        if vx2 != u {
            if vx2 != u.negate() {
                return Err(CryptoError::InvalidEncoding(
                    "Point encoding has no square root".into(),
                ));
            }
            x = x.mul(&FieldElement::SQRT_MINUS_ONE);
        }

        if x.is_zero() && sign == 1 {
            return Err(CryptoError::InvalidEncoding(
                "Non-canonical sign bit on x = 0".into(),
            ));
        }
        if u8::from(x.is_negative()) != sign {
            x = x.negate();
        }

        let point = Self::Extended(Extended {
            x,
            y,
            z: FieldElement::ONE,
            t: x.mul(&y),
        });
        if !point.is_on_curve() {
            return Err(CryptoError::InvalidEncoding(
                "Decoded point is not on the curve".into(),
            ));
        }
        Ok(point)
    }

    /// Build the fixed-base window table for this point. One-off cost;
    /// the result serves every constant-time multiplication against
    /// this base.
    pub fn precompute_for_scalar_multiplication(&self) -> ScalarMultiplicationTable {
        ScalarMultiplicationTable::new(self)
    }

    /// Build the odd-multiples table used by the two-exponent
    /// verification identity.
    pub fn precompute_for_double_scalar_multiplication(&self) -> DoubleScalarMultiplicationTable {
        DoubleScalarMultiplicationTable::new(self)
    }
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for GroupElement {}

/// True when the 32 bytes (sign bit already cleared) are strictly below
/// the field modulus.
fn is_canonical_field_encoding(bytes: &[u8; 32]) -> bool {
    let mut borrow = 0i16;
    for i in 0..32 {
        let diff = i16::from(bytes[i]) - i16::from(FIELD_MODULUS[i]) - borrow;
        borrow = i16::from(diff < 0);
    }
    borrow == 1
}

//! Field Arithmetic over GF(2^255 - 19)
//!
//! Foundation for all curve point math. Elements are held in the ref10
//! radix-2^25.5 representation: ten signed limbs alternating 26 and 25
//! bits, so products fit i64 accumulators without overflow.
//!
//! Every externally observed value is fully reduced modulo 2^255 - 19
//! before encoding. Instances are immutable; arithmetic returns new
//! values. No operation branches on limb values, so nothing here leaks
//! secret data through timing beyond the cost of the multiplies
//! themselves.

use crate::error::{CryptoError, CryptoResult};

/// An element of the prime field 2^255 - 19
#[derive(Debug, Clone, Copy)]
pub struct FieldElement(pub(crate) [i32; 10]);

/// Little-endian canonical encoding of the field modulus p = 2^255 - 19
pub(crate) const FIELD_MODULUS: [u8; 32] = [
    0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
];

impl FieldElement {
    pub const ZERO: Self = Self([0; 10]);
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Curve constant d = -121665/121666 mod p
    pub const D: Self = Self([
        -10913610, 13857413, -15372611, 6949391, 114729,
        -8787816, -6275908, -3247719, -18696448, -12055116,
    ]);

    /// 2d, used by the cached-representation addition formulas
    pub const D2: Self = Self([
        -21827220, 27714826, -30745222, 13898782, 229458,
        -17575632, -12551816, -6495438, -37392896, -24110232,
    ]);

    /// sqrt(-1) mod p, the correction factor in modular square roots
    pub const SQRT_MINUS_ONE: Self = Self([
        -32595792, -7943725, 9377950, 3500415, 12389472,
        -272473, -25146209, -2005654, 326686, 11406482,
    ]);

    pub fn add(&self, b: &Self) -> Self {
        let mut r = [0i32; 10];
        for i in 0..10 {
            r[i] = self.0[i] + b.0[i];
        }
        Self(r)
    }

    pub fn sub(&self, b: &Self) -> Self {
        let mut r = [0i32; 10];
        for i in 0..10 {
            r[i] = self.0[i] - b.0[i];
        }
        Self(r)
    }

    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Schoolbook multiplication with the 19-fold wraparound for limbs
    /// past 2^255, followed by the ref10 carry schedule.
    pub fn mul(&self, b: &Self) -> Self {
        let a0 = i64::from(self.0[0]);
        let a1 = i64::from(self.0[1]);
        let a2 = i64::from(self.0[2]);
        let a3 = i64::from(self.0[3]);
        let a4 = i64::from(self.0[4]);
        let a5 = i64::from(self.0[5]);
        let a6 = i64::from(self.0[6]);
        let a7 = i64::from(self.0[7]);
        let a8 = i64::from(self.0[8]);
        let a9 = i64::from(self.0[9]);

        let b0 = i64::from(b.0[0]);
        let b1 = i64::from(b.0[1]);
        let b2 = i64::from(b.0[2]);
        let b3 = i64::from(b.0[3]);
        let b4 = i64::from(b.0[4]);
        let b5 = i64::from(b.0[5]);
        let b6 = i64::from(b.0[6]);
        let b7 = i64::from(b.0[7]);
        let b8 = i64::from(b.0[8]);
        let b9 = i64::from(b.0[9]);

        let b1_19 = b1 * 19;
        let b2_19 = b2 * 19;
        let b3_19 = b3 * 19;
        let b4_19 = b4 * 19;
        let b5_19 = b5 * 19;
        let b6_19 = b6 * 19;
        let b7_19 = b7 * 19;
        let b8_19 = b8 * 19;
        let b9_19 = b9 * 19;
        let a1_2 = a1 * 2;
        let a3_2 = a3 * 2;
        let a5_2 = a5 * 2;
        let a7_2 = a7 * 2;
        let a9_2 = a9 * 2;

        let mut c0 = a0 * b0 + a1_2 * b9_19 + a2 * b8_19 + a3_2 * b7_19 + a4 * b6_19
            + a5_2 * b5_19 + a6 * b4_19 + a7_2 * b3_19 + a8 * b2_19 + a9_2 * b1_19;
        let mut c1 = a0 * b1 + a1 * b0 + a2 * b9_19 + a3 * b8_19 + a4 * b7_19
            + a5 * b6_19 + a6 * b5_19 + a7 * b4_19 + a8 * b3_19 + a9 * b2_19;
        let mut c2 = a0 * b2 + a1_2 * b1 + a2 * b0 + a3_2 * b9_19 + a4 * b8_19
            + a5_2 * b7_19 + a6 * b6_19 + a7_2 * b5_19 + a8 * b4_19 + a9_2 * b3_19;
        let mut c3 = a0 * b3 + a1 * b2 + a2 * b1 + a3 * b0 + a4 * b9_19
            + a5 * b8_19 + a6 * b7_19 + a7 * b6_19 + a8 * b5_19 + a9 * b4_19;
        let mut c4 = a0 * b4 + a1_2 * b3 + a2 * b2 + a3_2 * b1 + a4 * b0
            + a5_2 * b9_19 + a6 * b8_19 + a7_2 * b7_19 + a8 * b6_19 + a9_2 * b5_19;
        let mut c5 = a0 * b5 + a1 * b4 + a2 * b3 + a3 * b2 + a4 * b1 + a5 * b0
            + a6 * b9_19 + a7 * b8_19 + a8 * b7_19 + a9 * b6_19;
        let mut c6 = a0 * b6 + a1_2 * b5 + a2 * b4 + a3_2 * b3 + a4 * b2
            + a5_2 * b1 + a6 * b0 + a7_2 * b9_19 + a8 * b8_19 + a9_2 * b7_19;
        let mut c7 = a0 * b7 + a1 * b6 + a2 * b5 + a3 * b4 + a4 * b3 + a5 * b2
            + a6 * b1 + a7 * b0 + a8 * b9_19 + a9 * b8_19;
        let mut c8 = a0 * b8 + a1_2 * b7 + a2 * b6 + a3_2 * b5 + a4 * b4
            + a5_2 * b3 + a6 * b2 + a7_2 * b1 + a8 * b0 + a9_2 * b9_19;
        let mut c9 = a0 * b9 + a1 * b8 + a2 * b7 + a3 * b6 + a4 * b5 + a5 * b4
            + a6 * b3 + a7 * b2 + a8 * b1 + a9 * b0;

        let mut carry: i64;
        carry = (c0 + (1 << 25)) >> 26; c1 += carry; c0 -= carry << 26;
        carry = (c4 + (1 << 25)) >> 26; c5 += carry; c4 -= carry << 26;
        carry = (c1 + (1 << 24)) >> 25; c2 += carry; c1 -= carry << 25;
        carry = (c5 + (1 << 24)) >> 25; c6 += carry; c5 -= carry << 25;
        carry = (c2 + (1 << 25)) >> 26; c3 += carry; c2 -= carry << 26;
        carry = (c6 + (1 << 25)) >> 26; c7 += carry; c6 -= carry << 26;
        carry = (c3 + (1 << 24)) >> 25; c4 += carry; c3 -= carry << 25;
        carry = (c7 + (1 << 24)) >> 25; c8 += carry; c7 -= carry << 25;
        carry = (c4 + (1 << 25)) >> 26; c5 += carry; c4 -= carry << 26;
        carry = (c8 + (1 << 25)) >> 26; c9 += carry; c8 -= carry << 26;
        // The carry out of the top limb wraps around with factor 19
        // because 2^255 = 19 mod p.
        carry = (c9 + (1 << 24)) >> 25; c0 += carry * 19; c9 -= carry << 25;
        carry = (c0 + (1 << 25)) >> 26; c1 += carry; c0 -= carry << 26;

        Self([
            c0 as i32, c1 as i32, c2 as i32, c3 as i32, c4 as i32,
            c5 as i32, c6 as i32, c7 as i32, c8 as i32, c9 as i32,
        ])
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Multiplicative inverse via Fermat's little theorem: z^(p-2).
    ///
    /// Fixed addition chain of squarings and multiplies; runs in the
    /// same time for every input, so it is safe for values reachable
    /// from private keys.
    pub fn invert(&self) -> Self {
        let z1 = *self;
        let z2 = z1.square();
        let z4 = z2.square();
        let z8 = z4.square();
        let z9 = z8.mul(&z1);
        let z11 = z9.mul(&z2);
        let z22 = z11.square();
        let z_5_0 = z22.mul(&z9); // z^(2^5 - 1)

        let mut t = z_5_0.square();
        for _ in 1..5 {
            t = t.square();
        }
        let z_10_5 = t.mul(&z_5_0); // z^(2^10 - 1)

        t = z_10_5.square();
        for _ in 1..10 {
            t = t.square();
        }
        let z_20_10 = t.mul(&z_10_5); // z^(2^20 - 1)

        t = z_20_10.square();
        for _ in 1..20 {
            t = t.square();
        }
        let z_40_20 = t.mul(&z_20_10); // z^(2^40 - 1)

        t = z_40_20.square();
        for _ in 1..10 {
            t = t.square();
        }
        let z_50_10 = t.mul(&z_10_5); // z^(2^50 - 1)

        t = z_50_10.square();
        for _ in 1..50 {
            t = t.square();
        }
        let z_100_50 = t.mul(&z_50_10); // z^(2^100 - 1)

        t = z_100_50.square();
        for _ in 1..100 {
            t = t.square();
        }
        let z_200_100 = t.mul(&z_100_50); // z^(2^200 - 1)

        t = z_200_100.square();
        for _ in 1..50 {
            t = t.square();
        }
        let z_250_50 = t.mul(&z_50_10); // z^(2^250 - 1)

        t = z_250_50.square();
        for _ in 1..5 {
            t = t.square();
        }
        t.mul(&z11) // z^(2^255 - 21) = z^(p - 2)
    }

    /// z^((p-5)/8) = z^(2^252 - 3), the exponent used when recovering
    /// square roots during point decoding.
    pub fn pow_p58(&self) -> Self {
        let z1 = *self;
        let z2 = z1.square();
        let z4 = z2.square();
        let z8 = z4.square();
        let z9 = z8.mul(&z1);
        let z11 = z9.mul(&z2);
        let z22 = z11.square();
        let z_5_0 = z22.mul(&z9);

        let mut t = z_5_0.square();
        for _ in 1..5 {
            t = t.square();
        }
        let z_10_5 = t.mul(&z_5_0);

        t = z_10_5.square();
        for _ in 1..10 {
            t = t.square();
        }
        let z_20_10 = t.mul(&z_10_5);

        t = z_20_10.square();
        for _ in 1..20 {
            t = t.square();
        }
        let z_40_20 = t.mul(&z_20_10);

        t = z_40_20.square();
        for _ in 1..10 {
            t = t.square();
        }
        let z_50_10 = t.mul(&z_10_5);

        t = z_50_10.square();
        for _ in 1..50 {
            t = t.square();
        }
        let z_100_50 = t.mul(&z_50_10);

        t = z_100_50.square();
        for _ in 1..100 {
            t = t.square();
        }
        let z_200_100 = t.mul(&z_100_50);

        t = z_200_100.square();
        for _ in 1..50 {
            t = t.square();
        }
        let z_250_50 = t.mul(&z_50_10);

        t = z_250_50.square();
        t = t.square();
        t.mul(&z1) // z^(2^252 - 3)
    }

    /// Encode to the canonical 32-byte little-endian form.
    ///
    /// Performs the full reduction modulo p, so two equal elements
    /// always produce identical bytes.
    pub fn encode(&self) -> [u8; 32] {
        let mut h = [0i64; 10];
        for i in 0..10 {
            h[i] = i64::from(self.0[i]);
        }

        let mut carry: i64;
        carry = (h[0] + (1 << 25)) >> 26; h[1] += carry; h[0] -= carry << 26;
        carry = (h[4] + (1 << 25)) >> 26; h[5] += carry; h[4] -= carry << 26;
        carry = (h[1] + (1 << 24)) >> 25; h[2] += carry; h[1] -= carry << 25;
        carry = (h[5] + (1 << 24)) >> 25; h[6] += carry; h[5] -= carry << 25;
        carry = (h[2] + (1 << 25)) >> 26; h[3] += carry; h[2] -= carry << 26;
        carry = (h[6] + (1 << 25)) >> 26; h[7] += carry; h[6] -= carry << 26;
        carry = (h[3] + (1 << 24)) >> 25; h[4] += carry; h[3] -= carry << 25;
        carry = (h[7] + (1 << 24)) >> 25; h[8] += carry; h[7] -= carry << 25;
        carry = (h[4] + (1 << 25)) >> 26; h[5] += carry; h[4] -= carry << 26;
        carry = (h[8] + (1 << 25)) >> 26; h[9] += carry; h[8] -= carry << 26;
        carry = (h[9] + (1 << 24)) >> 25; h[0] += carry * 19; h[9] -= carry << 25;
        carry = (h[0] + (1 << 25)) >> 26; h[1] += carry; h[0] -= carry << 26;

        // q = floor(h / p): 1 when the value still exceeds p, -1 when
        // it is negative. Seeding the cascade from 19·h9 keeps it exact
        // for values of either sign.
        carry = (19 * h[9] + (1 << 24)) >> 25;
        carry = (h[0] + carry) >> 26;
        carry = (h[1] + carry) >> 25;
        carry = (h[2] + carry) >> 26;
        carry = (h[3] + carry) >> 25;
        carry = (h[4] + carry) >> 26;
        carry = (h[5] + carry) >> 25;
        carry = (h[6] + carry) >> 26;
        carry = (h[7] + carry) >> 25;
        carry = (h[8] + carry) >> 26;
        carry = (h[9] + carry) >> 25;
        h[0] += carry * 19;

        carry = h[0] >> 26; h[1] += carry; h[0] -= carry << 26;
        carry = h[1] >> 25; h[2] += carry; h[1] -= carry << 25;
        carry = h[2] >> 26; h[3] += carry; h[2] -= carry << 26;
        carry = h[3] >> 25; h[4] += carry; h[3] -= carry << 25;
        carry = h[4] >> 26; h[5] += carry; h[4] -= carry << 26;
        carry = h[5] >> 25; h[6] += carry; h[5] -= carry << 25;
        carry = h[6] >> 26; h[7] += carry; h[6] -= carry << 26;
        carry = h[7] >> 25; h[8] += carry; h[7] -= carry << 25;
        carry = h[8] >> 26; h[9] += carry; h[8] -= carry << 26;
        h[9] &= (1 << 25) - 1;

        let mut s = [0u8; 32];
        s[0] = h[0] as u8;
        s[1] = (h[0] >> 8) as u8;
        s[2] = (h[0] >> 16) as u8;
        s[3] = ((h[0] >> 24) | (h[1] << 2)) as u8;
        s[4] = (h[1] >> 6) as u8;
        s[5] = (h[1] >> 14) as u8;
        s[6] = ((h[1] >> 22) | (h[2] << 3)) as u8;
        s[7] = (h[2] >> 5) as u8;
        s[8] = (h[2] >> 13) as u8;
        s[9] = ((h[2] >> 21) | (h[3] << 5)) as u8;
        s[10] = (h[3] >> 3) as u8;
        s[11] = (h[3] >> 11) as u8;
        s[12] = ((h[3] >> 19) | (h[4] << 6)) as u8;
        s[13] = (h[4] >> 2) as u8;
        s[14] = (h[4] >> 10) as u8;
        s[15] = (h[4] >> 18) as u8;
        s[16] = h[5] as u8;
        s[17] = (h[5] >> 8) as u8;
        s[18] = (h[5] >> 16) as u8;
        s[19] = ((h[5] >> 24) | (h[6] << 1)) as u8;
        s[20] = (h[6] >> 7) as u8;
        s[21] = (h[6] >> 15) as u8;
        s[22] = ((h[6] >> 23) | (h[7] << 3)) as u8;
        s[23] = (h[7] >> 5) as u8;
        s[24] = (h[7] >> 13) as u8;
        s[25] = ((h[7] >> 21) | (h[8] << 4)) as u8;
        s[26] = (h[8] >> 4) as u8;
        s[27] = (h[8] >> 12) as u8;
        s[28] = ((h[8] >> 20) | (h[9] << 6)) as u8;
        s[29] = (h[9] >> 2) as u8;
        s[30] = (h[9] >> 10) as u8;
        s[31] = (h[9] >> 18) as u8;
        s
    }

    /// Decode 32 little-endian bytes into a field element.
    ///
    /// Fails when bit 255 is set: field elements occupy 255 bits, and
    /// the group layer strips its sign bit before calling down here.
    pub fn decode(s: &[u8; 32]) -> CryptoResult<Self> {
        if s[31] & 0x80 != 0 {
            return Err(CryptoError::InvalidEncoding(
                "Field element with bit 255 set".into(),
            ));
        }
        Ok(Self::decode_raw(s))
    }

    /// Decode without the width check; the caller has already masked
    /// the sign bit.
    pub(crate) fn decode_raw(s: &[u8; 32]) -> Self {
        let mut h = [
            load4(&s[0..4]),
            load3(&s[4..7]) << 6,
            load3(&s[7..10]) << 5,
            load3(&s[10..13]) << 3,
            load3(&s[13..16]) << 2,
            load4(&s[16..20]),
            load3(&s[20..23]) << 7,
            load3(&s[23..26]) << 5,
            load3(&s[26..29]) << 4,
            (load3(&s[29..32]) & 0x7fffff) << 2,
        ];

        let mut carry: i64;
        carry = (h[9] + (1 << 24)) >> 25; h[0] += carry * 19; h[9] -= carry << 25;
        carry = (h[1] + (1 << 24)) >> 25; h[2] += carry; h[1] -= carry << 25;
        carry = (h[3] + (1 << 24)) >> 25; h[4] += carry; h[3] -= carry << 25;
        carry = (h[5] + (1 << 24)) >> 25; h[6] += carry; h[5] -= carry << 25;
        carry = (h[7] + (1 << 24)) >> 25; h[8] += carry; h[7] -= carry << 25;

        carry = (h[0] + (1 << 25)) >> 26; h[1] += carry; h[0] -= carry << 26;
        carry = (h[2] + (1 << 25)) >> 26; h[3] += carry; h[2] -= carry << 26;
        carry = (h[4] + (1 << 25)) >> 26; h[5] += carry; h[4] -= carry << 26;
        carry = (h[6] + (1 << 25)) >> 26; h[7] += carry; h[6] -= carry << 26;
        carry = (h[8] + (1 << 25)) >> 26; h[9] += carry; h[8] -= carry << 26;

        Self([
            h[0] as i32, h[1] as i32, h[2] as i32, h[3] as i32, h[4] as i32,
            h[5] as i32, h[6] as i32, h[7] as i32, h[8] as i32, h[9] as i32,
        ])
    }

    /// Parity of the canonical integer value. The encoded sign bit of a
    /// point's x coordinate is exactly this bit.
    pub fn is_negative(&self) -> bool {
        self.encode()[0] & 1 == 1
    }

    pub fn is_zero(&self) -> bool {
        self.encode() == [0u8; 32]
    }

    /// Constant-time select: returns `b` when `choice` is 1, `self`
    /// when it is 0. `choice` must be 0 or 1.
    pub fn cmov(&self, b: &Self, choice: u8) -> Self {
        let mask = -(i32::from(choice));
        let mut r = [0i32; 10];
        for i in 0..10 {
            r[i] = (self.0[i] & !mask) | (b.0[i] & mask);
        }
        Self(r)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        // Compare canonical encodings; limb representations are not unique.
        let a = self.encode();
        let b = other.encode();
        let mut diff = 0u8;
        for i in 0..32 {
            diff |= a[i] ^ b[i];
        }
        diff == 0
    }
}

impl Eq for FieldElement {}

#[inline]
fn load3(s: &[u8]) -> i64 {
    i64::from(s[0]) | (i64::from(s[1]) << 8) | (i64::from(s[2]) << 16)
}

#[inline]
fn load4(s: &[u8]) -> i64 {
    i64::from(s[0]) | (i64::from(s[1]) << 8) | (i64::from(s[2]) << 16) | (i64::from(s[3]) << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(n: u8) -> FieldElement {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        FieldElement::decode(&bytes).unwrap()
    }

    #[test]
    fn test_add_sub_roundtrip() {
        let a = fe(17);
        let b = fe(5);
        assert_eq!(a.add(&b).sub(&b), a);
        assert_eq!(a.add(&b), fe(22));
    }

    #[test]
    fn test_mul_matches_small_integers() {
        assert_eq!(fe(7).mul(&fe(6)), fe(42));
        assert_eq!(fe(12).square(), fe(144));
    }

    #[test]
    fn test_invert() {
        let a = fe(9);
        assert_eq!(a.mul(&a.invert()), FieldElement::ONE);
        let b = FieldElement::D;
        assert_eq!(b.mul(&b.invert()), FieldElement::ONE);
    }

    #[test]
    fn test_negate() {
        let a = fe(3);
        assert_eq!(a.add(&a.negate()), FieldElement::ZERO);
    }

    #[test]
    fn test_sqrt_minus_one_squares_to_minus_one() {
        let minus_one = FieldElement::ZERO.sub(&FieldElement::ONE);
        assert_eq!(FieldElement::SQRT_MINUS_ONE.square(), minus_one);
    }

    #[test]
    fn test_d2_is_twice_d() {
        assert_eq!(FieldElement::D.add(&FieldElement::D), FieldElement::D2);
    }

    #[test]
    fn test_encode_is_canonical() {
        // p encodes as zero: the reduction wraps the modulus itself.
        let p = FieldElement::decode_raw(&FIELD_MODULUS);
        assert_eq!(p.encode(), [0u8; 32]);
    }

    #[test]
    fn test_known_constant_encodings() {
        // Canonical encodings of d and sqrt(-1), as published for Ed25519.
        assert_eq!(
            hex::encode(FieldElement::D.encode()),
            "a3785913ca4deb75abd841414d0a700098e879777940c78c73fe6f2bee6c0352"
        );
        assert_eq!(
            hex::encode(FieldElement::SQRT_MINUS_ONE.encode()),
            "b0a00e4a271beec478e42fad0618432fa7d7fb3d99004d2b0bdfc14f8024832b"
        );
    }

    #[test]
    fn test_decode_rejects_top_bit() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x80;
        assert!(FieldElement::decode(&bytes).is_err());
    }

    #[test]
    fn test_parity() {
        assert!(!fe(4).is_negative());
        assert!(fe(5).is_negative());
    }

    #[test]
    fn test_cmov() {
        let a = fe(1);
        let b = fe(2);
        assert_eq!(a.cmov(&b, 0), a);
        assert_eq!(a.cmov(&b, 1), b);
    }
}

//! Scalar Arithmetic modulo the Group Order
//!
//! Scalars are integers modulo L = 2^252 + 27742317777372353535851937790883648493,
//! held as 32 little-endian bytes. The wide reduction uses the standard
//! 21-bit-limb schedule for this prime; products are schoolbook over
//! bytes and then reduced, which keeps every operation total and free
//! of data-dependent branches.

/// Little-endian bytes of the group order L
pub const GROUP_ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
    0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// An integer modulo the curve's group order, little-endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar(pub(crate) [u8; 32]);

impl Scalar {
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wrap 32 bytes without reduction. The caller asserts the value is
    /// already in range (clamped key scalars and decoded wire scalars).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Reduce a 64-byte little-endian value (typically a 512-bit hash)
    /// modulo L.
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Self {
        Self(reduce_wide(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// self * k + r mod L, the combination used by signing (k·a + r).
    pub fn multiply_and_add(&self, k: &Self, r: &Self) -> Self {
        let mut wide = [0u64; 64];
        for i in 0..32 {
            for j in 0..32 {
                wide[i + j] += u64::from(self.0[i]) * u64::from(k.0[j]);
            }
        }
        for i in 0..32 {
            wide[i] += u64::from(r.0[i]);
        }

        let mut bytes = [0u8; 64];
        let mut carry = 0u64;
        for i in 0..64 {
            let v = wide[i] + carry;
            bytes[i] = (v & 0xff) as u8;
            carry = v >> 8;
        }
        Self(reduce_wide(&bytes))
    }

    pub fn multiply(&self, k: &Self) -> Self {
        self.multiply_and_add(k, &Self::ZERO)
    }

    /// True when the byte value is strictly below L. Wire scalars that
    /// fail this are rejected before any point arithmetic.
    pub fn is_canonical(bytes: &[u8; 32]) -> bool {
        let mut borrow = 0i16;
        for i in 0..32 {
            let diff = i16::from(bytes[i]) - i16::from(GROUP_ORDER[i]) - borrow;
            borrow = i16::from(diff < 0);
        }
        borrow == 1
    }

    /// Additive inverse modulo L.
    pub fn negate(&self) -> Self {
        if self.0 == [0u8; 32] {
            return Self::ZERO;
        }
        let mut r = [0u8; 32];
        let mut borrow = 0i16;
        for i in 0..32 {
            let diff = i16::from(GROUP_ORDER[i]) - i16::from(self.0[i]) - borrow;
            if diff < 0 {
                r[i] = (diff + 256) as u8;
                borrow = 1;
            } else {
                r[i] = diff as u8;
                borrow = 0;
            }
        }
        Self(r)
    }

    /// Standard Ed25519 clamping: clear the low three bits, clear the
    /// top bit, set the second-highest bit.
    pub fn clamp(bytes: &mut [u8; 32]) {
        bytes[0] &= 248;
        bytes[31] &= 127;
        bytes[31] |= 64;
    }

    /// Signed radix-16 digit expansion, 64 digits in [-8, 8).
    ///
    /// Every 256-bit scalar produces exactly 64 digits regardless of
    /// value; the constant-time table engine consumes these.
    pub fn to_radix16_digits(&self) -> [i8; 64] {
        let mut e = [0i8; 64];
        for i in 0..32 {
            e[2 * i] = (self.0[i] & 15) as i8;
            e[2 * i + 1] = ((self.0[i] >> 4) & 15) as i8;
        }
        let mut carry = 0i8;
        for digit in e.iter_mut().take(63) {
            *digit += carry;
            carry = (*digit + 8) >> 4;
            *digit -= carry << 4;
        }
        e[63] += carry;
        e
    }

    /// Width-5 signed sliding-window expansion: 256 entries, each zero
    /// or an odd value in [-15, 15]. Variable-time; only used where the
    /// scalar is public (signature verification).
    pub fn to_sliding_window_digits(&self) -> [i8; 256] {
        let mut r = [0i8; 256];
        for i in 0..256 {
            r[i] = ((self.0[i >> 3] >> (i & 7)) & 1) as i8;
        }
        for i in 0..256 {
            if r[i] == 0 {
                continue;
            }
            for b in 1..=6 {
                if i + b >= 256 || r[i + b] == 0 {
                    continue;
                }
                if r[i] + (r[i + b] << b) <= 15 {
                    r[i] += r[i + b] << b;
                    r[i + b] = 0;
                } else if r[i] - (r[i + b] << b) >= -15 {
                    r[i] -= r[i + b] << b;
                    for k in (i + b)..256 {
                        if r[k] == 0 {
                            r[k] = 1;
                            break;
                        }
                        r[k] = 0;
                    }
                } else {
                    break;
                }
            }
        }
        r
    }
}

/// Reduce 64 little-endian bytes modulo L using 24 limbs of 21 bits.
fn reduce_wide(input: &[u8; 64]) -> [u8; 32] {
    const M: i64 = 2097151; // 2^21 - 1
    let s = input;
    let mut a = [0i64; 24];
    a[0] = M & load3(&s[0..]);
    a[1] = M & (load4(&s[2..]) >> 5);
    a[2] = M & (load3(&s[5..]) >> 2);
    a[3] = M & (load4(&s[7..]) >> 7);
    a[4] = M & (load4(&s[10..]) >> 4);
    a[5] = M & (load3(&s[13..]) >> 1);
    a[6] = M & (load4(&s[15..]) >> 6);
    a[7] = M & (load3(&s[18..]) >> 3);
    a[8] = M & load3(&s[21..]);
    a[9] = M & (load4(&s[23..]) >> 5);
    a[10] = M & (load3(&s[26..]) >> 2);
    a[11] = M & (load4(&s[28..]) >> 7);
    a[12] = M & (load4(&s[31..]) >> 4);
    a[13] = M & (load3(&s[34..]) >> 1);
    a[14] = M & (load4(&s[36..]) >> 6);
    a[15] = M & (load3(&s[39..]) >> 3);
    a[16] = M & load3(&s[42..]);
    a[17] = M & (load4(&s[44..]) >> 5);
    a[18] = M & (load3(&s[47..]) >> 2);
    a[19] = M & (load4(&s[49..]) >> 7);
    a[20] = M & (load4(&s[52..]) >> 4);
    a[21] = M & (load3(&s[55..]) >> 1);
    a[22] = M & (load4(&s[57..]) >> 6);
    a[23] = load4(&s[60..]) >> 3;

    // 2^252 = -27742317777372353535851937790883648493 mod L, expressed
    // in 21-bit limbs as [-666643, -470296, -654183, 997805, -136657, 683901].
    fold(&mut a, 23);
    fold(&mut a, 22);
    fold(&mut a, 21);
    fold(&mut a, 20);
    fold(&mut a, 19);
    fold(&mut a, 18);

    let mut carry: i64;
    carry = (a[6] + (1 << 20)) >> 21; a[7] += carry; a[6] -= carry << 21;
    carry = (a[8] + (1 << 20)) >> 21; a[9] += carry; a[8] -= carry << 21;
    carry = (a[10] + (1 << 20)) >> 21; a[11] += carry; a[10] -= carry << 21;
    carry = (a[12] + (1 << 20)) >> 21; a[13] += carry; a[12] -= carry << 21;
    carry = (a[14] + (1 << 20)) >> 21; a[15] += carry; a[14] -= carry << 21;
    carry = (a[16] + (1 << 20)) >> 21; a[17] += carry; a[16] -= carry << 21;
    carry = (a[7] + (1 << 20)) >> 21; a[8] += carry; a[7] -= carry << 21;
    carry = (a[9] + (1 << 20)) >> 21; a[10] += carry; a[9] -= carry << 21;
    carry = (a[11] + (1 << 20)) >> 21; a[12] += carry; a[11] -= carry << 21;
    carry = (a[13] + (1 << 20)) >> 21; a[14] += carry; a[13] -= carry << 21;
    carry = (a[15] + (1 << 20)) >> 21; a[16] += carry; a[15] -= carry << 21;

    fold(&mut a, 17);
    fold(&mut a, 16);
    fold(&mut a, 15);
    fold(&mut a, 14);
    fold(&mut a, 13);
    fold(&mut a, 12);

    carry = (a[0] + (1 << 20)) >> 21; a[1] += carry; a[0] -= carry << 21;
    carry = (a[2] + (1 << 20)) >> 21; a[3] += carry; a[2] -= carry << 21;
    carry = (a[4] + (1 << 20)) >> 21; a[5] += carry; a[4] -= carry << 21;
    carry = (a[6] + (1 << 20)) >> 21; a[7] += carry; a[6] -= carry << 21;
    carry = (a[8] + (1 << 20)) >> 21; a[9] += carry; a[8] -= carry << 21;
    carry = (a[10] + (1 << 20)) >> 21; a[11] += carry; a[10] -= carry << 21;
    carry = (a[1] + (1 << 20)) >> 21; a[2] += carry; a[1] -= carry << 21;
    carry = (a[3] + (1 << 20)) >> 21; a[4] += carry; a[3] -= carry << 21;
    carry = (a[5] + (1 << 20)) >> 21; a[6] += carry; a[5] -= carry << 21;
    carry = (a[7] + (1 << 20)) >> 21; a[8] += carry; a[7] -= carry << 21;
    carry = (a[9] + (1 << 20)) >> 21; a[10] += carry; a[9] -= carry << 21;
    carry = (a[11] + (1 << 20)) >> 21; a[12] = carry; a[11] -= carry << 21;

    fold(&mut a, 12);

    carry = a[0] >> 21; a[1] += carry; a[0] -= carry << 21;
    carry = a[1] >> 21; a[2] += carry; a[1] -= carry << 21;
    carry = a[2] >> 21; a[3] += carry; a[2] -= carry << 21;
    carry = a[3] >> 21; a[4] += carry; a[3] -= carry << 21;
    carry = a[4] >> 21; a[5] += carry; a[4] -= carry << 21;
    carry = a[5] >> 21; a[6] += carry; a[5] -= carry << 21;
    carry = a[6] >> 21; a[7] += carry; a[6] -= carry << 21;
    carry = a[7] >> 21; a[8] += carry; a[7] -= carry << 21;
    carry = a[8] >> 21; a[9] += carry; a[8] -= carry << 21;
    carry = a[9] >> 21; a[10] += carry; a[9] -= carry << 21;
    carry = a[10] >> 21; a[11] += carry; a[10] -= carry << 21;
    carry = a[11] >> 21; a[12] = carry; a[11] -= carry << 21;

    fold(&mut a, 12);

    carry = a[0] >> 21; a[1] += carry; a[0] -= carry << 21;
    carry = a[1] >> 21; a[2] += carry; a[1] -= carry << 21;
    carry = a[2] >> 21; a[3] += carry; a[2] -= carry << 21;
    carry = a[3] >> 21; a[4] += carry; a[3] -= carry << 21;
    carry = a[4] >> 21; a[5] += carry; a[4] -= carry << 21;
    carry = a[5] >> 21; a[6] += carry; a[5] -= carry << 21;
    carry = a[6] >> 21; a[7] += carry; a[6] -= carry << 21;
    carry = a[7] >> 21; a[8] += carry; a[7] -= carry << 21;
    carry = a[8] >> 21; a[9] += carry; a[8] -= carry << 21;
    carry = a[9] >> 21; a[10] += carry; a[9] -= carry << 21;
    carry = a[10] >> 21; a[11] += carry; a[10] -= carry << 21;

    let mut out = [0u8; 32];
    out[0] = a[0] as u8;
    out[1] = (a[0] >> 8) as u8;
    out[2] = ((a[0] >> 16) | (a[1] << 5)) as u8;
    out[3] = (a[1] >> 3) as u8;
    out[4] = (a[1] >> 11) as u8;
    out[5] = ((a[1] >> 19) | (a[2] << 2)) as u8;
    out[6] = (a[2] >> 6) as u8;
    out[7] = ((a[2] >> 14) | (a[3] << 7)) as u8;
    out[8] = (a[3] >> 1) as u8;
    out[9] = (a[3] >> 9) as u8;
    out[10] = ((a[3] >> 17) | (a[4] << 4)) as u8;
    out[11] = (a[4] >> 4) as u8;
    out[12] = (a[4] >> 12) as u8;
    out[13] = ((a[4] >> 20) | (a[5] << 1)) as u8;
    out[14] = (a[5] >> 7) as u8;
    out[15] = ((a[5] >> 15) | (a[6] << 6)) as u8;
    out[16] = (a[6] >> 2) as u8;
    out[17] = (a[6] >> 10) as u8;
    out[18] = ((a[6] >> 18) | (a[7] << 3)) as u8;
    out[19] = (a[7] >> 5) as u8;
    out[20] = (a[7] >> 13) as u8;
    out[21] = a[8] as u8;
    out[22] = (a[8] >> 8) as u8;
    out[23] = ((a[8] >> 16) | (a[9] << 5)) as u8;
    out[24] = (a[9] >> 3) as u8;
    out[25] = (a[9] >> 11) as u8;
    out[26] = ((a[9] >> 19) | (a[10] << 2)) as u8;
    out[27] = (a[10] >> 6) as u8;
    out[28] = ((a[10] >> 14) | (a[11] << 7)) as u8;
    out[29] = (a[11] >> 1) as u8;
    out[30] = (a[11] >> 9) as u8;
    out[31] = (a[11] >> 17) as u8;
    out
}

/// Fold limb `i` down by the identity 2^(21*12) = -l mod L, then clear it.
#[inline]
fn fold(a: &mut [i64; 24], i: usize) {
    let v = a[i];
    a[i - 12] += v * 666643;
    a[i - 11] += v * 470296;
    a[i - 10] += v * 654183;
    a[i - 9] -= v * 997805;
    a[i - 8] += v * 136657;
    a[i - 7] -= v * 683901;
    a[i] = 0;
}

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

    fn scalar(n: u8) -> Scalar {
        let mut b = [0u8; 32];
        b[0] = n;
        Scalar::from_bytes(b)
    }

    #[test]
    fn test_reduce_small_values_unchanged() {
        let mut wide = [0u8; 64];
        wide[0] = 42;
        assert_eq!(Scalar::from_bytes_wide(&wide), scalar(42));
    }

    #[test]
    fn test_reduce_group_order_to_zero() {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&GROUP_ORDER);
        assert_eq!(Scalar::from_bytes_wide(&wide), Scalar::ZERO);
    }

    #[test]
    fn test_reduce_order_plus_one() {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&GROUP_ORDER);
        wide[0] += 1;
        assert_eq!(Scalar::from_bytes_wide(&wide), scalar(1));
    }

    #[test]
    fn test_multiply_and_add_small() {
        // 3 * 4 + 5 = 17
        assert_eq!(scalar(3).multiply_and_add(&scalar(4), &scalar(5)), scalar(17));
    }

    #[test]
    fn test_multiply_matches_wide_reduction() {
        // (L - 1)^2 mod L = 1
        let mut minus_one = GROUP_ORDER;
        minus_one[0] -= 1;
        let m = Scalar::from_bytes(minus_one);
        assert_eq!(m.multiply(&m), scalar(1));
    }

    #[test]
    fn test_is_canonical() {
        assert!(Scalar::is_canonical(&[0u8; 32]));
        assert!(!Scalar::is_canonical(&GROUP_ORDER));
        let mut below = GROUP_ORDER;
        below[0] -= 1;
        assert!(Scalar::is_canonical(&below));
        assert!(!Scalar::is_canonical(&[0xff; 32]));
    }

    #[test]
    fn test_negate() {
        assert_eq!(Scalar::ZERO.negate(), Scalar::ZERO);
        let mut expected = GROUP_ORDER;
        expected[0] -= 7;
        assert_eq!(scalar(7).negate(), Scalar::from_bytes(expected));
        // x + (-x) = 0
        assert_eq!(scalar(7).negate().multiply_and_add(&scalar(1), &scalar(7)), Scalar::ZERO);
    }

    #[test]
    fn test_clamp() {
        let mut bytes = [0xffu8; 32];
        Scalar::clamp(&mut bytes);
        assert_eq!(bytes[0] & 7, 0);
        assert_eq!(bytes[31] & 128, 0);
        assert_eq!(bytes[31] & 64, 64);
    }

    #[test]
    fn test_radix16_digits_reconstruct() {
        let s = scalar(200);
        let e = s.to_radix16_digits();
        let mut value = 0i64;
        // Low digits are enough for a one-byte scalar.
        for i in (0..8).rev() {
            value = value * 16 + i64::from(e[i]);
        }
        assert_eq!(value, 200);
        for d in e.iter() {
            assert!(*d >= -8 && *d <= 8);
        }
    }

    #[test]
    fn test_sliding_window_reconstructs() {
        let mut b = [0u8; 32];
        b[0] = 0xb3;
        b[1] = 0x91;
        let s = Scalar::from_bytes(b);
        let w = s.to_sliding_window_digits();
        let mut value = 0i128;
        for i in (0..256).rev() {
            value = value * 2 + i128::from(w[i]);
        }
        assert_eq!(value, 0x91b3);
        for d in w.iter() {
            assert!(*d == 0 || (*d % 2 != 0 && *d >= -15 && *d <= 15));
        }
    }
}

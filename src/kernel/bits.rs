//! Bit-level primitives shared by both kernels.
//!
//! Every approximation in the crate normalizes its argument with a
//! leading-zero count, works in s2.30 (two integer bits, thirty fraction
//! bits) and rescales with a signed shift. Those three steps live here.

/// One in s2.30.
pub const S2_30_ONE: i32 = 1 << 30;

/// Number of leading zero bits in a 32-bit word. Returns 32 for zero.
///
/// Branchless binary search: each step tests whether the top half of the
/// remaining window is empty and, if so, moves the window up.
#[inline]
pub const fn nlz32(v: u32) -> i32 {
    if v == 0 {
        return 32;
    }
    let mut v = v;
    let mut n = 0;
    if v <= 0x0000_FFFF {
        n += 16;
        v <<= 16;
    }
    if v <= 0x00FF_FFFF {
        n += 8;
        v <<= 8;
    }
    if v <= 0x0FFF_FFFF {
        n += 4;
        v <<= 4;
    }
    if v <= 0x3FFF_FFFF {
        n += 2;
        v <<= 2;
    }
    if v <= 0x7FFF_FFFF {
        n += 1;
    }
    n
}

/// Number of leading zero bits in a 64-bit word. Returns 64 for zero.
#[inline]
pub const fn nlz64(v: u64) -> i32 {
    if v == 0 {
        return 64;
    }
    let mut v = v;
    let mut n = 0;
    if v <= 0x0000_0000_FFFF_FFFF {
        n += 32;
        v <<= 32;
    }
    if v <= 0x0000_FFFF_FFFF_FFFF {
        n += 16;
        v <<= 16;
    }
    if v <= 0x00FF_FFFF_FFFF_FFFF {
        n += 8;
        v <<= 8;
    }
    if v <= 0x0FFF_FFFF_FFFF_FFFF {
        n += 4;
        v <<= 4;
    }
    if v <= 0x3FFF_FFFF_FFFF_FFFF {
        n += 2;
        v <<= 2;
    }
    if v <= 0x7FFF_FFFF_FFFF_FFFF {
        n += 1;
    }
    n
}

/// Arithmetic shift right by `n`, or left by `-n` when `n` is negative.
///
/// Shift distances of 32 or more in either direction produce 0. Left
/// shifts discard the bits pushed out of the word.
#[inline]
pub const fn shift_right32(v: i32, n: i32) -> i32 {
    if n >= 0 {
        if n >= 32 {
            0
        } else {
            v >> n
        }
    } else if n <= -32 {
        0
    } else {
        v.wrapping_shl((-n) as u32)
    }
}

/// 64-bit counterpart of [`shift_right32`].
#[inline]
pub const fn shift_right64(v: i64, n: i32) -> i64 {
    if n >= 0 {
        if n >= 64 {
            0
        } else {
            v >> n
        }
    } else if n <= -64 {
        0
    } else {
        v.wrapping_shl((-n) as u32)
    }
}

/// Shift right treating `v` as unsigned. Distances of 64 or more produce 0.
#[inline]
pub const fn logical_shift_right64(v: i64, n: u32) -> i64 {
    if n >= 64 {
        0
    } else {
        ((v as u64) >> n) as i64
    }
}

/// Product of two s2.30 values, in s2.30.
#[inline]
pub const fn qmul30(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) >> 30) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nlz_matches_leading_zeros() {
        let mut rng = fastrand::Rng::with_seed(42);
        for shift in 0..32 {
            let v = 1u32 << shift;
            assert_eq!(nlz32(v), v.leading_zeros() as i32, "nlz32 of 1 << {}", shift);
            assert_eq!(nlz32(v | (v - 1)), v.leading_zeros() as i32);
        }
        for shift in 0..64 {
            let v = 1u64 << shift;
            assert_eq!(nlz64(v), v.leading_zeros() as i32, "nlz64 of 1 << {}", shift);
        }
        for _ in 0..10_000 {
            let a = rng.u32(..);
            let b = rng.u64(..) >> rng.u32(0..64);
            assert_eq!(nlz32(a), a.leading_zeros() as i32);
            assert_eq!(nlz64(b), b.leading_zeros() as i32);
        }
    }

    #[test]
    fn test_nlz_of_zero_is_width() {
        assert_eq!(nlz32(0), 32);
        assert_eq!(nlz64(0), 64);
        assert_eq!(nlz32(u32::MAX), 0);
        assert_eq!(nlz64(u64::MAX), 0);
    }

    #[test]
    fn test_shift_right_direction_and_bounds() {
        assert_eq!(shift_right32(256, 4), 16);
        assert_eq!(shift_right32(16, -4), 256);
        assert_eq!(shift_right32(-256, 4), -16);
        assert_eq!(shift_right32(-1, 31), -1);
        assert_eq!(shift_right32(12345, 32), 0);
        assert_eq!(shift_right32(-12345, 40), 0);
        assert_eq!(shift_right32(12345, -32), 0);
        assert_eq!(shift_right32(1, -31), i32::MIN);

        assert_eq!(shift_right64(1 << 40, 8), 1 << 32);
        assert_eq!(shift_right64(1, -62), 1 << 62);
        assert_eq!(shift_right64(i64::MAX, 64), 0);
        assert_eq!(shift_right64(i64::MAX, -64), 0);
        assert_eq!(shift_right64(-8, 63), -1);
    }

    #[test]
    fn test_logical_shift_ignores_sign() {
        assert_eq!(logical_shift_right64(-1, 32), 0xFFFF_FFFF);
        assert_eq!(logical_shift_right64(-1, 63), 1);
        assert_eq!(logical_shift_right64(-1, 64), 0);
        assert_eq!(logical_shift_right64(1 << 40, 8), 1 << 32);
    }

    #[test]
    fn test_qmul30() {
        let half = S2_30_ONE >> 1;
        assert_eq!(qmul30(S2_30_ONE, S2_30_ONE), S2_30_ONE);
        assert_eq!(qmul30(half, half), S2_30_ONE >> 2);
        assert_eq!(qmul30(-S2_30_ONE, half), -half);
        assert_eq!(qmul30(0, i32::MAX), 0);
    }
}

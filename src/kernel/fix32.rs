//! Kernel-32: signed 16.16 fixed point stored in an `i32`.
//!
//! All functions take and return raw bit patterns. Overflow in the basic
//! arithmetic wraps. Functions with a restricted domain return 0 outside of
//! it rather than failing.

use super::bits::{nlz32, qmul30, shift_right32, S2_30_ONE};
use super::fix64;
use super::poly;

pub const SHIFT: i32 = 16;
pub const FRACTION_MASK: i32 = (1 << SHIFT) - 1;
pub const INTEGER_MASK: i32 = !FRACTION_MASK;

pub const ZERO: i32 = 0;
pub const NEG_ONE: i32 = -1 << SHIFT;
pub const ONE: i32 = 1 << SHIFT;
pub const TWO: i32 = 2 << SHIFT;
pub const THREE: i32 = 3 << SHIFT;
pub const FOUR: i32 = 4 << SHIFT;
pub const HALF: i32 = ONE >> 1;
pub const PI: i32 = (fix64::PI >> 16) as i32;
pub const TWO_PI: i32 = (fix64::TWO_PI >> 16) as i32;
pub const HALF_PI: i32 = (fix64::HALF_PI >> 16) as i32;
pub const E: i32 = (fix64::E >> 16) as i32;

pub const MIN: i32 = i32::MIN;
pub const MAX: i32 = i32::MAX;

const RCP_LN2: i32 = (fix64::RCP_LN2 >> 16) as i32;
const LN2: i32 = (fix64::LN2 >> 16) as i32;
/// `4 / (2 * pi)` in s2.30: maps radians to quarter turns.
const RCP_HALF_PI: i32 = 683_565_276;
const RAD_TO_DEG: i32 = 3_754_943;
const DEG_TO_RAD: i32 = 1_143;

const SQRT2: i32 = 1_518_500_249;
const HALF_SQRT2: i32 = 759_250_125;

// Conversion

#[inline]
pub const fn from_int(v: i32) -> i32 {
    v.wrapping_shl(SHIFT as u32)
}

/// Truncates toward zero. Out-of-range values saturate.
#[inline]
pub fn from_f32(v: f32) -> i32 {
    (v * 65536.0) as i32
}

#[inline]
pub fn from_f64(v: f64) -> i32 {
    (v * 65536.0) as i32
}

/// `a / b` built directly in raw form. Returns 0 when `b` is 0.
#[inline]
pub const fn ratio(a: i32, b: i32) -> i32 {
    if b == 0 {
        return 0;
    }
    (((a as i64) << SHIFT) / b as i64) as i32
}

#[inline]
pub const fn ceil_to_int(v: i32) -> i32 {
    v.wrapping_add(ONE - 1) >> SHIFT
}

#[inline]
pub const fn floor_to_int(v: i32) -> i32 {
    v >> SHIFT
}

#[inline]
pub const fn round_to_int(v: i32) -> i32 {
    v.wrapping_add(HALF) >> SHIFT
}

#[inline]
pub fn to_f32(v: i32) -> f32 {
    v as f32 * (1.0 / 65536.0)
}

#[inline]
pub fn to_f64(v: i32) -> f64 {
    v as f64 * (1.0 / 65536.0)
}

// Bit manipulation

/// Absolute value. `MIN` maps to itself.
#[inline]
pub const fn abs(v: i32) -> i32 {
    let mask = v >> 31;
    v.wrapping_add(mask) ^ mask
}

#[inline]
pub const fn nabs(v: i32) -> i32 {
    abs(v).wrapping_neg()
}

#[inline]
pub const fn ceil(v: i32) -> i32 {
    v.wrapping_add(FRACTION_MASK) & INTEGER_MASK
}

#[inline]
pub const fn floor(v: i32) -> i32 {
    v & INTEGER_MASK
}

#[inline]
pub const fn round(v: i32) -> i32 {
    v.wrapping_add(HALF) & INTEGER_MASK
}

/// `v - floor(v)`.
#[inline]
pub const fn fract(v: i32) -> i32 {
    v & FRACTION_MASK
}

#[inline]
pub const fn min(a: i32, b: i32) -> i32 {
    if a < b {
        a
    } else {
        b
    }
}

#[inline]
pub const fn max(a: i32, b: i32) -> i32 {
    if a > b {
        a
    } else {
        b
    }
}

#[inline]
pub const fn clamp(a: i32, lo: i32, hi: i32) -> i32 {
    if a > hi {
        hi
    } else if a < lo {
        lo
    } else {
        a
    }
}

/// -1, 0 or 1 as a plain integer.
#[inline]
pub const fn sign(v: i32) -> i32 {
    (v >> 31) | ((v.wrapping_neg() as u32) >> 31) as i32
}

// Arithmetic

#[inline]
pub const fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

#[inline]
pub const fn sub(a: i32, b: i32) -> i32 {
    a.wrapping_sub(b)
}

/// Wraps: `neg(MIN) == MIN`.
#[inline]
pub const fn neg(v: i32) -> i32 {
    v.wrapping_neg()
}

#[inline]
pub const fn mul(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) >> SHIFT) as i32
}

/// `a * (1 - t) + b * t` with a 64-bit intermediate.
#[inline]
pub const fn lerp(a: i32, b: i32, t: i32) -> i32 {
    let ta = (a as i64).wrapping_mul(ONE as i64 - t as i64);
    let tb = (b as i64).wrapping_mul(t as i64);
    (ta.wrapping_add(tb) >> SHIFT) as i32
}

#[inline]
pub const fn rad_to_deg(v: i32) -> i32 {
    mul(v, RAD_TO_DEG)
}

#[inline]
pub const fn deg_to_rad(v: i32) -> i32 {
    mul(v, DEG_TO_RAD)
}

/// Remainder with the sign of `a`. Returns 0 when `b` is 0.
#[inline]
pub const fn modulo(a: i32, b: i32) -> i32 {
    if b == 0 {
        return 0;
    }
    a.wrapping_rem(b)
}

// Normalization skeleton shared by the approximations.
//
// `normalize` returns `(e, n)` where `n = x * 2^-e` is the s2.30 mantissa in
// [1, 2) of a positive `x`. Each family offsets `e` by a constant to account
// for its own output scale.

#[inline]
fn normalize(x: i32) -> (i32, i32) {
    let e = 1 - nlz32(x as u32);
    (e, shift_right32(x, e))
}

/// Division inputs mapped to 0 by every tier: a zero or `MIN` divisor, and
/// `MIN / -1`, whose quotient is not representable.
#[inline]
const fn div_undefined(a: i32, b: i32) -> bool {
    b == 0 || b == MIN || (a == MIN && b == NEG_ONE)
}

#[inline]
fn div_with(a: i32, b: i32, rcp_poly: impl Fn(i32) -> i32) -> i32 {
    if div_undefined(a, b) {
        return 0;
    }
    let sign = if b < 0 { -1 } else { 1 };
    let (e, n) = normalize(b * sign);
    let offset = e + 28;
    let res = rcp_poly(n - S2_30_ONE);
    let y = qmul30(res, a);
    shift_right32(sign.wrapping_mul(y), offset - 14)
}

#[inline]
fn rcp_with(x: i32, rcp_poly: impl Fn(i32) -> i32) -> i32 {
    if x == MIN || x == 0 {
        return 0;
    }
    let sign = if x < 0 { -1 } else { 1 };
    let (e, n) = normalize(x * sign);
    let offset = e + 28;
    let res = rcp_poly(n - S2_30_ONE);
    shift_right32(sign * res, offset)
}

#[inline]
fn sqrt_with(x: i32, sqrt_poly: impl Fn(i32) -> i32) -> i32 {
    if x <= 0 {
        return 0;
    }
    let (e, n) = normalize(x);
    let offset = e + 14;
    let y = sqrt_poly(n - S2_30_ONE);
    let adjust = if offset & 1 != 0 { SQRT2 } else { S2_30_ONE };
    let yr = qmul30(adjust, y);
    shift_right32(yr, 14 - (offset >> 1))
}

#[inline]
fn rsqrt_with(x: i32, rsqrt_poly: impl Fn(i32) -> i32) -> i32 {
    if x <= 0 {
        return 0;
    }
    let (offset, n) = normalize(x);
    let y = rsqrt_poly(n - S2_30_ONE);
    let adjust = if offset & 1 != 0 { HALF_SQRT2 } else { S2_30_ONE };
    let yr = qmul30(adjust, y);
    shift_right32(yr, (offset >> 1) + 21)
}

#[inline]
fn exp2_with(x: i32, exp2_poly: impl Fn(i32) -> i32) -> i32 {
    if x >= 15 * ONE {
        return MAX;
    }
    if x <= -16 * ONE {
        return 0;
    }
    let k = (x & FRACTION_MASK) << 14;
    let y = exp2_poly(k);
    shift_right32(y, 14 - (x >> SHIFT))
}

#[inline]
fn log_with(x: i32, log_poly: impl Fn(i32) -> i32) -> i32 {
    if x <= 0 {
        return 0;
    }
    let (e, n) = normalize(x);
    let offset = e + 14;
    let y = log_poly(n - S2_30_ONE);
    (offset * LN2).wrapping_add(y >> 14)
}

#[inline]
fn log2_with(x: i32, log2_poly: impl Fn(i32) -> i32) -> i32 {
    if x <= 0 {
        return 0;
    }
    let (e, n) = normalize(x);
    let offset = e + 14;
    let y = log2_poly(n - S2_30_ONE);
    (offset << SHIFT).wrapping_add(y >> 14)
}

/// Angle in radians to quarter turns in s2.30, wrapped into one period.
#[inline]
const fn to_turns(x: i32) -> i32 {
    mul(RCP_HALF_PI, x)
}

// Division

/// Exact `a / b`: the dividend is widened and shifted before dividing.
/// Returns 0 when `b` is 0 or `MIN`, and for `MIN / -1`.
#[inline]
pub const fn div_precise(a: i32, b: i32) -> i32 {
    if div_undefined(a, b) {
        return 0;
    }
    (((a as i64) << SHIFT) / b as i64) as i32
}

/// Same as [`div_precise`]: a 64-bit intermediate makes exact division the
/// cheapest accurate option at this width.
#[inline]
pub const fn div(a: i32, b: i32) -> i32 {
    div_precise(a, b)
}

#[inline]
pub fn div_fast(a: i32, b: i32) -> i32 {
    div_with(a, b, poly::rcp_poly6)
}

#[inline]
pub fn div_fastest(a: i32, b: i32) -> i32 {
    div_with(a, b, poly::rcp_poly4)
}

// Square root

/// Digit-by-digit square root, exact to the floor of the true root.
/// Returns 0 for non-positive input.
pub const fn sqrt_precise(a: i32) -> i32 {
    if a <= 0 {
        return 0;
    }
    let mut r = a as u32;
    let mut b: u32 = 0x4000_0000;
    let mut q: u32 = 0;
    while b > 0x40 {
        let t = q + b;
        if r >= t {
            r -= t;
            q = t + b;
        }
        if r & 0x8000_0000 != 0 {
            // The remainder would overflow on the next doubling: finish
            // with everything shifted down one bit.
            q >>= 1;
            b >>= 1;
            r >>= 1;
            while b > 0x20 {
                let t = q + b;
                if r >= t {
                    r -= t;
                    q = t + b;
                }
                r <<= 1;
                b >>= 1;
            }
            return (q >> 7) as i32;
        }
        r <<= 1;
        b >>= 1;
    }
    (q >> 8) as i32
}

#[inline]
pub fn sqrt(x: i32) -> i32 {
    sqrt_with(x, poly::sqrt_poly3_lut8)
}

#[inline]
pub fn sqrt_fast(x: i32) -> i32 {
    sqrt_with(x, poly::sqrt_poly4)
}

#[inline]
pub fn sqrt_fastest(x: i32) -> i32 {
    sqrt_with(x, poly::sqrt_poly3)
}

#[inline]
pub fn rsqrt(x: i32) -> i32 {
    rsqrt_with(x, poly::rsqrt_poly3_lut16)
}

#[inline]
pub fn rsqrt_fast(x: i32) -> i32 {
    rsqrt_with(x, poly::rsqrt_poly5)
}

#[inline]
pub fn rsqrt_fastest(x: i32) -> i32 {
    rsqrt_with(x, poly::rsqrt_poly3)
}

// Reciprocal

#[inline]
pub fn rcp(x: i32) -> i32 {
    rcp_with(x, poly::rcp_poly4_lut8)
}

#[inline]
pub fn rcp_fast(x: i32) -> i32 {
    rcp_with(x, poly::rcp_poly6)
}

#[inline]
pub fn rcp_fastest(x: i32) -> i32 {
    rcp_with(x, poly::rcp_poly4)
}

// Exponential

/// `2^x`. Saturates to `MAX` at `x >= 15` and to 0 at `x <= -16`.
#[inline]
pub fn exp2(x: i32) -> i32 {
    exp2_with(x, poly::exp2_poly5)
}

#[inline]
pub fn exp2_fast(x: i32) -> i32 {
    exp2_with(x, poly::exp2_poly4)
}

#[inline]
pub fn exp2_fastest(x: i32) -> i32 {
    exp2_with(x, poly::exp2_poly3)
}

#[inline]
pub fn exp(x: i32) -> i32 {
    exp2(mul(x, RCP_LN2))
}

#[inline]
pub fn exp_fast(x: i32) -> i32 {
    exp2_fast(mul(x, RCP_LN2))
}

#[inline]
pub fn exp_fastest(x: i32) -> i32 {
    exp2_fastest(mul(x, RCP_LN2))
}

// Logarithm

/// Natural logarithm. Returns 0 for non-positive input.
#[inline]
pub fn log(x: i32) -> i32 {
    log_with(x, poly::log_poly5_lut8)
}

#[inline]
pub fn log_fast(x: i32) -> i32 {
    log_with(x, poly::log_poly3_lut8)
}

#[inline]
pub fn log_fastest(x: i32) -> i32 {
    log_with(x, poly::log_poly5)
}

#[inline]
pub fn log2(x: i32) -> i32 {
    log2_with(x, poly::log2_poly4_lut16)
}

#[inline]
pub fn log2_fast(x: i32) -> i32 {
    log2_with(x, poly::log2_poly3_lut16)
}

#[inline]
pub fn log2_fastest(x: i32) -> i32 {
    log2_with(x, poly::log2_poly5)
}

// Power

/// `x^e` as `exp(e * log(x))`. `pow(x, 0)` is one for every `x`, otherwise
/// non-positive `x` gives 0.
#[inline]
pub fn pow(x: i32, e: i32) -> i32 {
    if e == 0 {
        return ONE;
    }
    if x <= 0 {
        return 0;
    }
    exp(mul(e, log(x)))
}

#[inline]
pub fn pow_fast(x: i32, e: i32) -> i32 {
    if e == 0 {
        return ONE;
    }
    if x <= 0 {
        return 0;
    }
    exp_fast(mul(e, log_fast(x)))
}

#[inline]
pub fn pow_fastest(x: i32, e: i32) -> i32 {
    if e == 0 {
        return ONE;
    }
    if x <= 0 {
        return 0;
    }
    exp_fastest(mul(e, log_fastest(x)))
}

// Trigonometry

#[inline]
pub fn sin(x: i32) -> i32 {
    poly::unit_sin_poly4(to_turns(x)) >> 14
}

#[inline]
pub fn sin_fast(x: i32) -> i32 {
    poly::unit_sin_poly3(to_turns(x)) >> 14
}

#[inline]
pub fn sin_fastest(x: i32) -> i32 {
    poly::unit_sin_poly2(to_turns(x)) >> 14
}

#[inline]
pub fn cos(x: i32) -> i32 {
    sin(x.wrapping_add(HALF_PI))
}

#[inline]
pub fn cos_fast(x: i32) -> i32 {
    sin_fast(x.wrapping_add(HALF_PI))
}

#[inline]
pub fn cos_fastest(x: i32) -> i32 {
    sin_fastest(x.wrapping_add(HALF_PI))
}

/// Sine over cosine of the same reduced angle, divided with [`div`].
#[inline]
pub fn tan(x: i32) -> i32 {
    let z = to_turns(x);
    div(poly::unit_sin_poly4(z), poly::unit_sin_poly4(z.wrapping_add(S2_30_ONE)))
}

#[inline]
pub fn tan_fast(x: i32) -> i32 {
    let z = to_turns(x);
    div_fast(poly::unit_sin_poly3(z), poly::unit_sin_poly3(z.wrapping_add(S2_30_ONE)))
}

#[inline]
pub fn tan_fastest(x: i32) -> i32 {
    let z = to_turns(x);
    div_fastest(poly::unit_sin_poly2(z), poly::unit_sin_poly2(z.wrapping_add(S2_30_ONE)))
}

// Inverse trigonometry

/// `y / x` in s2.30 for `0 <= y <= x`.
#[inline]
fn atan2_div_with(y: i32, x: i32, rcp_poly: impl Fn(i32) -> i32) -> i32 {
    let offset = 1 - nlz32(x as u32);
    let n = shift_right32(x, offset);
    let oox = rcp_poly(n.wrapping_sub(S2_30_ONE));
    let yr = shift_right32(y, offset);
    qmul30(yr, oox)
}

/// Octant reduction around an `atan` polynomial on `[0, 1]`. With `EXACT`
/// the octant sign is applied as a true negation, otherwise as a
/// one's-complement flip that is one raw unit off for negative angles.
#[inline]
fn atan2_with<const EXACT: bool>(
    y: i32,
    x: i32,
    rcp_poly: impl Fn(i32) -> i32,
    atan_poly: impl Fn(i32) -> i32,
) -> i32 {
    if x == 0 {
        if y > 0 {
            return HALF_PI;
        }
        if y < 0 {
            return -HALF_PI;
        }
        return 0;
    }

    let nx = abs(x);
    let ny = abs(y);
    let neg_mask = (x ^ y) >> 31;

    if nx >= ny {
        let k = atan2_div_with(ny, nx, &rcp_poly);
        let z = atan_poly(k);
        let mut angle = neg_mask ^ (z >> 14);
        if EXACT {
            angle = angle.wrapping_sub(neg_mask);
        }
        if x > 0 {
            angle
        } else if y >= 0 {
            angle.wrapping_add(PI)
        } else {
            angle.wrapping_sub(PI)
        }
    } else {
        let k = atan2_div_with(nx, ny, &rcp_poly);
        let z = atan_poly(k);
        let angle = neg_mask ^ (z >> 14);
        if y > 0 {
            HALF_PI.wrapping_sub(angle)
        } else {
            (-HALF_PI).wrapping_sub(angle)
        }
    }
}

#[inline]
pub fn atan2(y: i32, x: i32) -> i32 {
    atan2_with::<true>(y, x, poly::rcp_poly4_lut8, poly::atan_poly5_lut8)
}

#[inline]
pub fn atan2_fast(y: i32, x: i32) -> i32 {
    atan2_with::<false>(y, x, poly::rcp_poly6, poly::atan_poly3_lut8)
}

#[inline]
pub fn atan2_fastest(y: i32, x: i32) -> i32 {
    atan2_with::<false>(y, x, poly::rcp_poly4, poly::atan_poly4)
}

#[inline]
pub fn atan(x: i32) -> i32 {
    atan2(x, ONE)
}

#[inline]
pub fn atan_fast(x: i32) -> i32 {
    atan2_fast(x, ONE)
}

#[inline]
pub fn atan_fastest(x: i32) -> i32 {
    atan2_fastest(x, ONE)
}

// asin and acos run through the 32.32 kernel: `(1 + x)(1 - x)` is exact
// there and the square root keeps its low bits.

/// `(1 + x)(1 - x)` as a 32.32 raw value.
#[inline]
const fn one_minus_square_wide(x: i32) -> i64 {
    (ONE + x) as i64 * (ONE - x) as i64
}

/// Arc sine. Returns 0 outside `[-1, 1]`.
#[inline]
pub fn asin(x: i32) -> i32 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    let y = fix64::sqrt(one_minus_square_wide(x));
    (fix64::atan2((x as i64) << 16, y) >> 16) as i32
}

#[inline]
pub fn asin_fast(x: i32) -> i32 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    let y = fix64::sqrt_fast(one_minus_square_wide(x));
    (fix64::atan2_fast((x as i64) << 16, y) >> 16) as i32
}

#[inline]
pub fn asin_fastest(x: i32) -> i32 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    let y = fix64::sqrt_fastest(one_minus_square_wide(x));
    (fix64::atan2_fastest((x as i64) << 16, y) >> 16) as i32
}

/// Arc cosine. Returns 0 outside `[-1, 1]`.
#[inline]
pub fn acos(x: i32) -> i32 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    let y = fix64::sqrt(one_minus_square_wide(x));
    (fix64::atan2(y, (x as i64) << 16) >> 16) as i32
}

#[inline]
pub fn acos_fast(x: i32) -> i32 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    let y = fix64::sqrt_fast(one_minus_square_wide(x));
    (fix64::atan2_fast(y, (x as i64) << 16) >> 16) as i32
}

#[inline]
pub fn acos_fastest(x: i32) -> i32 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    let y = fix64::sqrt_fastest(one_minus_square_wide(x));
    (fix64::atan2_fastest(y, (x as i64) << 16) >> 16) as i32
}

#[cfg(test)]
#[path = "fix32_tests.rs"]
mod tests;

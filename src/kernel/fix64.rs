//! Kernel-64: signed 32.32 fixed point stored in an `i64`.
//!
//! Structurally the same as the 16.16 kernel, but with no wider native type
//! to fall back on: products are split into integer and fraction digits and
//! precise division is a two-digit long division in base 2^32.

use super::bits::{logical_shift_right64, nlz64, qmul30, shift_right64, S2_30_ONE};
use super::poly;

pub const SHIFT: i32 = 32;
pub const FRACTION_MASK: i64 = (1 << SHIFT) - 1;
pub const INTEGER_MASK: i64 = !FRACTION_MASK;

pub const ZERO: i64 = 0;
pub const NEG_ONE: i64 = -1 << SHIFT;
pub const ONE: i64 = 1 << SHIFT;
pub const TWO: i64 = 2 << SHIFT;
pub const THREE: i64 = 3 << SHIFT;
pub const FOUR: i64 = 4 << SHIFT;
pub const HALF: i64 = ONE >> 1;
pub const PI: i64 = 13_493_037_705;
pub const TWO_PI: i64 = 26_986_075_409;
pub const HALF_PI: i64 = 6_746_518_852;
pub const E: i64 = 11_674_931_555;

pub const MIN: i64 = i64::MIN;
pub const MAX: i64 = i64::MAX;

/// `1 / ln(2)`.
pub(crate) const RCP_LN2: i64 = 0x1_7154_7652;
/// `ln(2)`.
pub(crate) const LN2: i64 = 2_977_044_471;
/// `4 / (2 * pi)` in s2.30: maps radians to quarter turns.
const RCP_HALF_PI: i32 = 683_565_276;
const RAD_TO_DEG: i64 = 246_083_499_198;
const DEG_TO_RAD: i64 = 74_961_320;

const SQRT2: i32 = 1_518_500_249;
const HALF_SQRT2: i32 = 759_250_125;

// Conversion

#[inline]
pub const fn from_int(v: i32) -> i64 {
    (v as i64) << SHIFT
}

#[inline]
pub const fn from_int64(v: i64) -> i64 {
    v.wrapping_shl(SHIFT as u32)
}

/// Truncates toward zero. Out-of-range values saturate.
#[inline]
pub fn from_f32(v: f32) -> i64 {
    (v * 4_294_967_296.0) as i64
}

#[inline]
pub fn from_f64(v: f64) -> i64 {
    (v * 4_294_967_296.0) as i64
}

/// `a / b` built directly in raw form. Returns 0 when `b` is 0.
#[inline]
pub const fn ratio(a: i32, b: i32) -> i64 {
    if b == 0 {
        return 0;
    }
    ((a as i64) << SHIFT) / b as i64
}

#[inline]
pub const fn ceil_to_int(v: i64) -> i32 {
    (v.wrapping_add(ONE - 1) >> SHIFT) as i32
}

#[inline]
pub const fn floor_to_int(v: i64) -> i32 {
    (v >> SHIFT) as i32
}

#[inline]
pub const fn round_to_int(v: i64) -> i32 {
    (v.wrapping_add(HALF) >> SHIFT) as i32
}

#[inline]
pub fn to_f32(v: i64) -> f32 {
    v as f32 * (1.0 / 4_294_967_296.0)
}

#[inline]
pub fn to_f64(v: i64) -> f64 {
    v as f64 * (1.0 / 4_294_967_296.0)
}

// Bit manipulation

/// Absolute value. `MIN` maps to itself.
#[inline]
pub const fn abs(v: i64) -> i64 {
    let mask = v >> 63;
    v.wrapping_add(mask) ^ mask
}

#[inline]
pub const fn nabs(v: i64) -> i64 {
    abs(v).wrapping_neg()
}

#[inline]
pub const fn ceil(v: i64) -> i64 {
    v.wrapping_add(FRACTION_MASK) & INTEGER_MASK
}

#[inline]
pub const fn floor(v: i64) -> i64 {
    v & INTEGER_MASK
}

#[inline]
pub const fn round(v: i64) -> i64 {
    v.wrapping_add(HALF) & INTEGER_MASK
}

#[inline]
pub const fn fract(v: i64) -> i64 {
    v & FRACTION_MASK
}

#[inline]
pub const fn min(a: i64, b: i64) -> i64 {
    if a < b {
        a
    } else {
        b
    }
}

#[inline]
pub const fn max(a: i64, b: i64) -> i64 {
    if a > b {
        a
    } else {
        b
    }
}

#[inline]
pub const fn clamp(a: i64, lo: i64, hi: i64) -> i64 {
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
pub const fn sign(v: i64) -> i32 {
    ((v >> 63) | ((v.wrapping_neg() as u64) >> 63) as i64) as i32
}

// Arithmetic

#[inline]
pub const fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

#[inline]
pub const fn sub(a: i64, b: i64) -> i64 {
    a.wrapping_sub(b)
}

/// Wraps: `neg(MIN) == MIN`.
#[inline]
pub const fn neg(v: i64) -> i64 {
    v.wrapping_neg()
}

/// Product split into 32-bit digits: `af*bf` contributes only its high
/// half, the cross terms and the integer product land directly.
#[inline]
pub const fn mul(a: i64, b: i64) -> i64 {
    let ai = a >> SHIFT;
    let af = a & FRACTION_MASK;
    let bi = b >> SHIFT;
    let bf = b & FRACTION_MASK;
    logical_shift_right64(af.wrapping_mul(bf), SHIFT as u32)
        .wrapping_add(ai.wrapping_mul(b))
        .wrapping_add(af.wrapping_mul(bi))
}

/// Integer `a` times fixed `b`, narrowed to `i32`.
#[inline]
pub const fn mul_int_long_low(a: i32, b: i64) -> i32 {
    mul_int_long_long(a, b) as i32
}

/// Integer `a` times fixed `b`. Used to apply s2.30 factors to 32.32
/// values, where the result is scaled by 2^-2.
#[inline]
pub const fn mul_int_long_long(a: i32, b: i64) -> i64 {
    let a = a as i64;
    let bi = b >> SHIFT;
    let bf = b & FRACTION_MASK;
    logical_shift_right64(a.wrapping_mul(bf), SHIFT as u32).wrapping_add(a.wrapping_mul(bi))
}

/// `a * (1 - t) + b * t`.
#[inline]
pub const fn lerp(a: i64, b: i64, t: i64) -> i64 {
    mul(a, ONE.wrapping_sub(t)).wrapping_add(mul(b, t))
}

#[inline]
pub const fn rad_to_deg(v: i64) -> i64 {
    mul(v, RAD_TO_DEG)
}

#[inline]
pub const fn deg_to_rad(v: i64) -> i64 {
    mul(v, DEG_TO_RAD)
}

/// Remainder with the sign of `a`. Returns 0 when `b` is 0.
#[inline]
pub const fn modulo(a: i64, b: i64) -> i64 {
    if b == 0 {
        return 0;
    }
    a.wrapping_rem(b)
}

// Normalization skeleton.
//
// `normalize` returns `(offset, n)` with `n = x * 2^-(offset + 2)` the
// s2.30 mantissa in [1, 2) of a positive `x`. The shift happens on the
// 64-bit value so the leading bit survives the narrowing.

#[inline]
fn normalize(x: i64) -> (i32, i32) {
    let offset = 31 - nlz64(x as u64);
    (offset, shift_right64(x, offset + 2) as i32)
}

/// Division inputs mapped to 0 by every tier: a zero or `MIN` divisor, and
/// `MIN / -1`, whose quotient is not representable.
#[inline]
const fn div_undefined(a: i64, b: i64) -> bool {
    b == 0 || b == MIN || (a == MIN && b == NEG_ONE)
}

#[inline]
fn div_with(a: i64, b: i64, rcp_poly: impl Fn(i32) -> i32) -> i64 {
    if div_undefined(a, b) {
        return 0;
    }
    let sign: i64 = if b < 0 { -1 } else { 1 };
    let (offset, n) = normalize(b * sign);
    let res = rcp_poly(n - S2_30_ONE);
    let y = mul_int_long_long(res, a) << 2;
    shift_right64(sign.wrapping_mul(y), offset)
}

#[inline]
fn rcp_with(x: i64, rcp_poly: impl Fn(i32) -> i32) -> i64 {
    if x == MIN || x == 0 {
        return 0;
    }
    let sign: i32 = if x < 0 { -1 } else { 1 };
    let (offset, n) = normalize(x * sign as i64);
    let res = rcp_poly(n - S2_30_ONE);
    let y = ((sign * res) as i64) << 2;
    shift_right64(y, offset)
}

#[inline]
fn sqrt_with(x: i64, sqrt_poly: impl Fn(i32) -> i32) -> i64 {
    if x <= 0 {
        return 0;
    }
    let (offset, n) = normalize(x);
    let y = sqrt_poly(n - S2_30_ONE);
    let adjust = if offset & 1 != 0 { SQRT2 } else { S2_30_ONE };
    let yr = (qmul30(adjust, y) as i64) << 2;
    shift_right64(yr, -(offset >> 1))
}

#[inline]
fn rsqrt_with(x: i64, rsqrt_poly: impl Fn(i32) -> i32) -> i64 {
    if x <= 0 {
        return 0;
    }
    let (offset, n) = normalize(x);
    let y = rsqrt_poly(n - S2_30_ONE);
    let adjust = if offset & 1 != 0 { HALF_SQRT2 } else { S2_30_ONE };
    let yr = (qmul30(adjust, y) as i64) << 2;
    shift_right64(yr, offset >> 1)
}

#[inline]
fn exp2_with(x: i64, exp2_poly: impl Fn(i32) -> i32) -> i64 {
    // 2^31 is already outside the range, so saturate from 31 rather than 32.
    if x >= 31 * ONE {
        return MAX;
    }
    if x <= -32 * ONE {
        return 0;
    }
    let k = ((x & FRACTION_MASK) >> 2) as i32;
    let y = (exp2_poly(k) as i64) << 2;
    let int_part = (x >> SHIFT) as i32;
    shift_right64(y, -int_part)
}

#[inline]
fn log_with(x: i64, log_poly: impl Fn(i32) -> i32) -> i64 {
    if x <= 0 {
        return 0;
    }
    let (offset, n) = normalize(x);
    let y = (log_poly(n - S2_30_ONE) as i64) << 2;
    (offset as i64 * LN2).wrapping_add(y)
}

#[inline]
fn log2_with(x: i64, log2_poly: impl Fn(i32) -> i32) -> i64 {
    if x <= 0 {
        return 0;
    }
    let (offset, n) = normalize(x);
    let y = (log2_poly(n - S2_30_ONE) as i64) << 2;
    ((offset as i64) << SHIFT).wrapping_add(y)
}

#[inline]
const fn to_turns(x: i64) -> i32 {
    mul_int_long_low(RCP_HALF_PI, x)
}

// Division

/// Exact `a / b` by long division in base 2^32 on the magnitudes.
///
/// The dividend `|a| * 2^32` has three significant digits at most and the
/// quotient two, so the classic normalize / estimate / correct loop runs
/// twice. Returns 0 when `b` is 0 or `MIN` and for `MIN / -1`, and `MAX` when
/// the quotient does not fit otherwise.
pub const fn div_precise(a: i64, b: i64) -> i64 {
    if div_undefined(a, b) {
        return 0;
    }
    const BASE: u64 = 1 << 32;

    let sign_dif = a ^ b;
    let abs_a = a.unsigned_abs();
    let u1 = abs_a >> 32;
    let u0 = abs_a << 32;
    let mut v = b.unsigned_abs();

    if u1 >= v {
        return MAX;
    }

    // Normalize so the divisor's top bit is set.
    let s = nlz64(v) as u32;
    v <<= s;
    let vn1 = v >> 32;
    let vn0 = v & 0xFFFF_FFFF;

    let un32 = if s > 0 { (u1 << s) | (u0 >> (64 - s)) } else { u1 };
    let un10 = u0 << s;
    let un1 = un10 >> 32;
    let un0 = un10 & 0xFFFF_FFFF;

    let mut q1 = un32 / vn1;
    let mut rhat = un32 - q1 * vn1;
    while rhat < BASE {
        if q1 >= BASE || q1 * vn0 > BASE * rhat + un1 {
            q1 -= 1;
            rhat += vn1;
        } else {
            break;
        }
    }

    let un21 = un32
        .wrapping_mul(BASE)
        .wrapping_add(un1)
        .wrapping_sub(q1.wrapping_mul(v));

    let mut q0 = un21 / vn1;
    rhat = un21 - q0 * vn1;
    while rhat < BASE {
        if q0 >= BASE || q0 * vn0 > BASE * rhat + un0 {
            q0 -= 1;
            rhat += vn1;
        } else {
            break;
        }
    }

    let q = q1.wrapping_mul(BASE).wrapping_add(q0);
    if sign_dif < 0 {
        if q > 1 << 63 {
            return MAX;
        }
        (q as i64).wrapping_neg()
    } else {
        if q > i64::MAX as u64 {
            return MAX;
        }
        q as i64
    }
}

/// `a / b` through an 8-segment reciprocal table.
#[inline]
pub fn div(a: i64, b: i64) -> i64 {
    div_with(a, b, poly::rcp_poly4_lut8)
}

#[inline]
pub fn div_fast(a: i64, b: i64) -> i64 {
    div_with(a, b, poly::rcp_poly6)
}

#[inline]
pub fn div_fastest(a: i64, b: i64) -> i64 {
    div_with(a, b, poly::rcp_poly4)
}

// Square root

/// Digit-by-digit square root, exact to the floor of the true root.
pub const fn sqrt_precise(a: i64) -> i64 {
    if a <= 0 {
        return 0;
    }
    let mut r = a as u64;
    let mut b: u64 = 0x4000_0000_0000_0000;
    let mut q: u64 = 0;
    while b > 0x40 {
        let t = q + b;
        if r >= t {
            r -= t;
            q = t + b;
        }
        if r & 0x8000_0000_0000_0000 != 0 {
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
            return (q >> 15) as i64;
        }
        r <<= 1;
        b >>= 1;
    }
    (q >> 16) as i64
}

#[inline]
pub fn sqrt(x: i64) -> i64 {
    sqrt_with(x, poly::sqrt_poly3_lut8)
}

#[inline]
pub fn sqrt_fast(x: i64) -> i64 {
    sqrt_with(x, poly::sqrt_poly4)
}

#[inline]
pub fn sqrt_fastest(x: i64) -> i64 {
    sqrt_with(x, poly::sqrt_poly3)
}

#[inline]
pub fn rsqrt(x: i64) -> i64 {
    rsqrt_with(x, poly::rsqrt_poly3_lut16)
}

#[inline]
pub fn rsqrt_fast(x: i64) -> i64 {
    rsqrt_with(x, poly::rsqrt_poly5)
}

#[inline]
pub fn rsqrt_fastest(x: i64) -> i64 {
    rsqrt_with(x, poly::rsqrt_poly3)
}

// Reciprocal

#[inline]
pub fn rcp(x: i64) -> i64 {
    rcp_with(x, poly::rcp_poly4_lut8)
}

#[inline]
pub fn rcp_fast(x: i64) -> i64 {
    rcp_with(x, poly::rcp_poly6)
}

#[inline]
pub fn rcp_fastest(x: i64) -> i64 {
    rcp_with(x, poly::rcp_poly4)
}

// Exponential

/// `2^x`. Saturates to `MAX` at `x >= 31` and to 0 at `x <= -32`.
#[inline]
pub fn exp2(x: i64) -> i64 {
    exp2_with(x, poly::exp2_poly5)
}

#[inline]
pub fn exp2_fast(x: i64) -> i64 {
    exp2_with(x, poly::exp2_poly4)
}

#[inline]
pub fn exp2_fastest(x: i64) -> i64 {
    exp2_with(x, poly::exp2_poly3)
}

#[inline]
pub fn exp(x: i64) -> i64 {
    exp2(mul(x, RCP_LN2))
}

#[inline]
pub fn exp_fast(x: i64) -> i64 {
    exp2_fast(mul(x, RCP_LN2))
}

#[inline]
pub fn exp_fastest(x: i64) -> i64 {
    exp2_fastest(mul(x, RCP_LN2))
}

// Logarithm

#[inline]
pub fn log(x: i64) -> i64 {
    log_with(x, poly::log_poly5_lut8)
}

#[inline]
pub fn log_fast(x: i64) -> i64 {
    log_with(x, poly::log_poly3_lut8)
}

#[inline]
pub fn log_fastest(x: i64) -> i64 {
    log_with(x, poly::log_poly5)
}

#[inline]
pub fn log2(x: i64) -> i64 {
    log2_with(x, poly::log2_poly4_lut16)
}

#[inline]
pub fn log2_fast(x: i64) -> i64 {
    log2_with(x, poly::log2_poly3_lut16)
}

#[inline]
pub fn log2_fastest(x: i64) -> i64 {
    log2_with(x, poly::log2_poly5)
}

// Power

#[inline]
pub fn pow(x: i64, e: i64) -> i64 {
    if e == 0 {
        return ONE;
    }
    if x <= 0 {
        return 0;
    }
    exp(mul(e, log(x)))
}

#[inline]
pub fn pow_fast(x: i64, e: i64) -> i64 {
    if e == 0 {
        return ONE;
    }
    if x <= 0 {
        return 0;
    }
    exp_fast(mul(e, log_fast(x)))
}

#[inline]
pub fn pow_fastest(x: i64, e: i64) -> i64 {
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
pub fn sin(x: i64) -> i64 {
    (poly::unit_sin_poly4(to_turns(x)) as i64) << 2
}

#[inline]
pub fn sin_fast(x: i64) -> i64 {
    (poly::unit_sin_poly3(to_turns(x)) as i64) << 2
}

#[inline]
pub fn sin_fastest(x: i64) -> i64 {
    (poly::unit_sin_poly2(to_turns(x)) as i64) << 2
}

#[inline]
pub fn cos(x: i64) -> i64 {
    sin(x.wrapping_add(HALF_PI))
}

#[inline]
pub fn cos_fast(x: i64) -> i64 {
    sin_fast(x.wrapping_add(HALF_PI))
}

#[inline]
pub fn cos_fastest(x: i64) -> i64 {
    sin_fastest(x.wrapping_add(HALF_PI))
}

#[inline]
pub fn tan(x: i64) -> i64 {
    let z = to_turns(x);
    let sin_x = (poly::unit_sin_poly4(z) as i64) << 32;
    let cos_x = (poly::unit_sin_poly4(z.wrapping_add(S2_30_ONE)) as i64) << 32;
    div(sin_x, cos_x)
}

#[inline]
pub fn tan_fast(x: i64) -> i64 {
    let z = to_turns(x);
    let sin_x = (poly::unit_sin_poly3(z) as i64) << 32;
    let cos_x = (poly::unit_sin_poly3(z.wrapping_add(S2_30_ONE)) as i64) << 32;
    div_fast(sin_x, cos_x)
}

#[inline]
pub fn tan_fastest(x: i64) -> i64 {
    let z = to_turns(x);
    let sin_x = (poly::unit_sin_poly2(z) as i64) << 32;
    let cos_x = (poly::unit_sin_poly2(z.wrapping_add(S2_30_ONE)) as i64) << 32;
    div_fastest(sin_x, cos_x)
}

// Inverse trigonometry

#[inline]
fn atan2_div_with(y: i64, x: i64, rcp_poly: impl Fn(i32) -> i32) -> i32 {
    let (offset, n) = normalize(x);
    let oox = rcp_poly(n.wrapping_sub(S2_30_ONE));
    let yr = shift_right64(y, offset + 2) as i32;
    qmul30(yr, oox)
}

/// Magnitudes are taken with `x ^ (x >> 63)`, which is one raw unit short
/// for negative inputs; at 32 fraction bits that is far below the
/// polynomial error.
#[inline]
fn atan2_with(
    y: i64,
    x: i64,
    rcp_poly: impl Fn(i32) -> i32,
    atan_poly: impl Fn(i32) -> i32,
) -> i64 {
    if x == 0 {
        if y > 0 {
            return HALF_PI;
        }
        if y < 0 {
            return -HALF_PI;
        }
        return 0;
    }

    let nx = x ^ (x >> 63);
    let ny = y ^ (y >> 63);
    let neg_mask = (x ^ y) >> 63;

    if nx >= ny {
        let k = atan2_div_with(ny, nx, &rcp_poly);
        let z = atan_poly(k);
        let angle = neg_mask ^ ((z as i64) << 2);
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
        let angle = neg_mask ^ ((z as i64) << 2);
        if y > 0 {
            HALF_PI.wrapping_sub(angle)
        } else {
            (-HALF_PI).wrapping_sub(angle)
        }
    }
}

#[inline]
pub fn atan2(y: i64, x: i64) -> i64 {
    atan2_with(y, x, poly::rcp_poly4_lut8, poly::atan_poly5_lut8)
}

#[inline]
pub fn atan2_fast(y: i64, x: i64) -> i64 {
    atan2_with(y, x, poly::rcp_poly6, poly::atan_poly3_lut8)
}

#[inline]
pub fn atan2_fastest(y: i64, x: i64) -> i64 {
    atan2_with(y, x, poly::rcp_poly4, poly::atan_poly4)
}

#[inline]
pub fn atan(x: i64) -> i64 {
    atan2(x, ONE)
}

#[inline]
pub fn atan_fast(x: i64) -> i64 {
    atan2_fast(x, ONE)
}

#[inline]
pub fn atan_fastest(x: i64) -> i64 {
    atan2_fastest(x, ONE)
}

#[inline]
const fn one_minus_square(x: i64) -> i64 {
    mul(ONE + x, ONE - x)
}

/// Arc sine. Returns 0 outside `[-1, 1]`.
#[inline]
pub fn asin(x: i64) -> i64 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    atan2(x, sqrt(one_minus_square(x)))
}

#[inline]
pub fn asin_fast(x: i64) -> i64 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    atan2_fast(x, sqrt_fast(one_minus_square(x)))
}

#[inline]
pub fn asin_fastest(x: i64) -> i64 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    atan2_fastest(x, sqrt_fastest(one_minus_square(x)))
}

/// Arc cosine. Returns 0 outside `[-1, 1]`.
#[inline]
pub fn acos(x: i64) -> i64 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    atan2(sqrt(one_minus_square(x)), x)
}

#[inline]
pub fn acos_fast(x: i64) -> i64 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    atan2_fast(sqrt_fast(one_minus_square(x)), x)
}

#[inline]
pub fn acos_fastest(x: i64) -> i64 {
    if !(-ONE..=ONE).contains(&x) {
        return 0;
    }
    atan2_fastest(sqrt_fastest(one_minus_square(x)), x)
}

#[cfg(test)]
#[path = "fix64_tests.rs"]
mod tests;

//! Value types over the raw kernels.
//!
//! [`F32`] wraps a 16.16 `i32` and [`F64`] a 32.32 `i64`. Both are plain
//! `Copy` newtypes: ordering, hashing and equality are those of the raw
//! integer, and serde sees only the raw integer so snapshots are exact.
//!
//! The std operators use wrapping arithmetic and precise division. The
//! approximations are inherent methods named after the kernel functions,
//! so the tier is always spelled out at the call site:
//!
//! ```
//! use fixmath::F32;
//!
//! let x = F32::from_int(2);
//! let exact = x.sqrt_precise();
//! let quick = x.sqrt_fastest();
//! assert!((exact - quick).abs() < F32::ratio(1, 1000));
//! ```

use std::cmp::Ordering;
use std::fmt;

use fixed::types::{I16F16, I32F32};
use serde::{Deserialize, Serialize};

use crate::error::FixedError;
use crate::kernel::{fix32, fix64};

macro_rules! forward_unary {
    ($kernel:ident; $($name:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(self) -> Self {
                Self($kernel::$name(self.0))
            }
        )*
    };
}

macro_rules! forward_binary {
    ($kernel:ident; $($name:ident => $kfn:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(self, rhs: Self) -> Self {
                Self($kernel::$kfn(self.0, rhs.0))
            }
        )*
    };
}

macro_rules! fixed_scalar {
    ($name:ident, $raw:ty, $kernel:ident, $to_float:ident, $precision:expr) => {
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($raw);

        impl $name {
            pub const ZERO: Self = Self($kernel::ZERO);
            pub const ONE: Self = Self($kernel::ONE);
            pub const TWO: Self = Self($kernel::TWO);
            pub const THREE: Self = Self($kernel::THREE);
            pub const FOUR: Self = Self($kernel::FOUR);
            pub const HALF: Self = Self($kernel::HALF);
            pub const NEG_ONE: Self = Self($kernel::NEG_ONE);
            pub const PI: Self = Self($kernel::PI);
            pub const TWO_PI: Self = Self($kernel::TWO_PI);
            pub const HALF_PI: Self = Self($kernel::HALF_PI);
            pub const E: Self = Self($kernel::E);
            pub const MIN: Self = Self($kernel::MIN);
            pub const MAX: Self = Self($kernel::MAX);

            #[inline]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> $raw {
                self.0
            }

            #[inline]
            pub const fn from_int(v: i32) -> Self {
                Self($kernel::from_int(v))
            }

            /// Truncates toward zero.
            #[inline]
            pub fn from_float32(v: f32) -> Self {
                Self($kernel::from_f32(v))
            }

            /// Truncates toward zero.
            #[inline]
            pub fn from_float64(v: f64) -> Self {
                Self($kernel::from_f64(v))
            }

            /// `a / b` without going through a division. Zero when `b` is 0.
            #[inline]
            pub const fn ratio(a: i32, b: i32) -> Self {
                Self($kernel::ratio(a, b))
            }

            #[inline]
            pub const fn ratio10(a: i32) -> Self {
                Self::ratio(a, 10)
            }

            #[inline]
            pub const fn ratio100(a: i32) -> Self {
                Self::ratio(a, 100)
            }

            #[inline]
            pub const fn ratio1000(a: i32) -> Self {
                Self::ratio(a, 1000)
            }

            #[inline]
            pub fn to_float32(self) -> f32 {
                $kernel::to_f32(self.0)
            }

            #[inline]
            pub fn to_float64(self) -> f64 {
                $kernel::to_f64(self.0)
            }

            #[inline]
            pub const fn floor_to_int(self) -> i32 {
                $kernel::floor_to_int(self.0)
            }

            #[inline]
            pub const fn ceil_to_int(self) -> i32 {
                $kernel::ceil_to_int(self.0)
            }

            #[inline]
            pub const fn round_to_int(self) -> i32 {
                $kernel::round_to_int(self.0)
            }

            /// Smallest element, or zero for an empty slice.
            pub fn min_of(values: &[Self]) -> Self {
                values.iter().copied().min().unwrap_or(Self::ZERO)
            }

            /// Largest element, or zero for an empty slice.
            pub fn max_of(values: &[Self]) -> Self {
                values.iter().copied().max().unwrap_or(Self::ZERO)
            }

            pub fn sum_of(values: &[Self]) -> Self {
                values.iter().copied().sum()
            }

            /// Mean with precise division. Zero for an empty slice.
            pub fn avg_of(values: &[Self]) -> Self {
                if values.is_empty() {
                    return Self::ZERO;
                }
                Self::sum_of(values).div_precise(Self::from_int(values.len() as i32))
            }

            // Bit manipulation and rounding

            #[inline]
            pub const fn abs(self) -> Self {
                Self($kernel::abs(self.0))
            }

            /// Negated absolute value; defined for every input including `MIN`.
            #[inline]
            pub const fn nabs(self) -> Self {
                Self($kernel::nabs(self.0))
            }

            /// -1, 0 or 1.
            #[inline]
            pub const fn sign(self) -> i32 {
                $kernel::sign(self.0)
            }

            #[inline]
            pub const fn ceil(self) -> Self {
                Self($kernel::ceil(self.0))
            }

            #[inline]
            pub const fn floor(self) -> Self {
                Self($kernel::floor(self.0))
            }

            #[inline]
            pub const fn round(self) -> Self {
                Self($kernel::round(self.0))
            }

            #[inline]
            pub const fn fract(self) -> Self {
                Self($kernel::fract(self.0))
            }

            #[inline]
            pub const fn min(self, other: Self) -> Self {
                Self($kernel::min(self.0, other.0))
            }

            #[inline]
            pub const fn max(self, other: Self) -> Self {
                Self($kernel::max(self.0, other.0))
            }

            #[inline]
            pub const fn clamp(self, lo: Self, hi: Self) -> Self {
                Self($kernel::clamp(self.0, lo.0, hi.0))
            }

            #[inline]
            pub const fn clamp01(self) -> Self {
                self.clamp(Self::ZERO, Self::ONE)
            }

            /// `self * (1 - t) + other * t`.
            #[inline]
            pub const fn lerp(self, other: Self, t: Self) -> Self {
                Self($kernel::lerp(self.0, other.0, t.0))
            }

            /// Halves by an arithmetic shift (rounds toward negative infinity).
            #[inline]
            pub const fn half(self) -> Self {
                Self(self.0 >> 1)
            }

            #[inline]
            pub const fn increment(self) -> Self {
                Self(self.0.wrapping_add($kernel::ONE))
            }

            #[inline]
            pub const fn decrement(self) -> Self {
                Self(self.0.wrapping_sub($kernel::ONE))
            }

            #[inline]
            pub const fn rad_to_deg(self) -> Self {
                Self($kernel::rad_to_deg(self.0))
            }

            #[inline]
            pub const fn deg_to_rad(self) -> Self {
                Self($kernel::deg_to_rad(self.0))
            }

            // Division tiers. `/` is `div_precise`.

            forward_binary!($kernel;
                div_precise => div_precise,
                div_approx => div,
                div_fast => div_fast,
                div_fastest => div_fastest,
            );

            forward_unary!($kernel;
                sqrt_precise, sqrt, sqrt_fast, sqrt_fastest,
                rsqrt, rsqrt_fast, rsqrt_fastest,
                rcp, rcp_fast, rcp_fastest,
                exp, exp_fast, exp_fastest,
                exp2, exp2_fast, exp2_fastest,
                log, log_fast, log_fastest,
                log2, log2_fast, log2_fastest,
                sin, sin_fast, sin_fastest,
                cos, cos_fast, cos_fastest,
                tan, tan_fast, tan_fastest,
                atan, atan_fast, atan_fastest,
                asin, asin_fast, asin_fastest,
                acos, acos_fast, acos_fastest,
            );

            // `self` is y for atan2 and the base for pow.
            forward_binary!($kernel;
                atan2 => atan2,
                atan2_fast => atan2_fast,
                atan2_fastest => atan2_fastest,
                pow => pow,
                pow_fast => pow_fast,
                pow_fastest => pow_fastest,
            );
        }

        impl std::ops::Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self($kernel::add(self.0, rhs.0))
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self($kernel::sub(self.0, rhs.0))
            }
        }

        impl std::ops::Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self::Output {
                Self($kernel::mul(self.0, rhs.0))
            }
        }

        impl std::ops::Div for $name {
            type Output = Self;
            fn div(self, rhs: Self) -> Self::Output {
                Self($kernel::div_precise(self.0, rhs.0))
            }
        }

        impl std::ops::Rem for $name {
            type Output = Self;
            fn rem(self, rhs: Self) -> Self::Output {
                Self($kernel::modulo(self.0, rhs.0))
            }
        }

        impl std::ops::Neg for $name {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self($kernel::neg(self.0))
            }
        }

        impl std::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl std::ops::SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl std::ops::MulAssign for $name {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl std::ops::DivAssign for $name {
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl std::ops::RemAssign for $name {
            fn rem_assign(&mut self, rhs: Self) {
                *self = *self % rhs;
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, v| acc + v)
            }
        }

        impl<'a> std::iter::Sum<&'a $name> for $name {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, v| acc + *v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.*}", $precision, self.$to_float())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({} raw {})", stringify!($name), self.to_float64(), self.0)
            }
        }
    };
}

fixed_scalar!(F32, i32, fix32, to_float32, 16);
fixed_scalar!(F64, i64, fix64, to_float64, 32);

impl F64 {
    #[inline]
    pub const fn from_int64(v: i64) -> Self {
        Self(fix64::from_int64(v))
    }

    /// Narrows to 16.16, clamping to `F32::MIN`/`F32::MAX` instead of
    /// failing like the `TryFrom` conversion.
    pub fn to_f32_saturating(self) -> F32 {
        let shifted = self.0 >> 16;
        F32::from_raw(shifted.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// Orders like `Ord::cmp` but reports as an integer, -1, 0 or 1.
    pub fn compare_to(self, other: Self) -> i32 {
        ordering_to_int(self.cmp(&other))
    }
}

impl F32 {
    pub fn compare_to(self, other: Self) -> i32 {
        ordering_to_int(self.cmp(&other))
    }
}

fn ordering_to_int(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Exact: the 16 extra fraction bits are zero.
impl From<F32> for F64 {
    fn from(v: F32) -> Self {
        F64::from_raw((v.raw() as i64) << 16)
    }
}

/// Drops the low 16 fraction bits (rounding toward negative infinity) and
/// fails when the integer part does not fit.
impl TryFrom<F64> for F32 {
    type Error = FixedError;

    fn try_from(v: F64) -> Result<Self, Self::Error> {
        i32::try_from(v.raw() >> 16)
            .map(F32::from_raw)
            .map_err(|_| FixedError::NarrowingOverflow { raw: v.raw() })
    }
}

impl From<I16F16> for F32 {
    fn from(v: I16F16) -> Self {
        F32::from_raw(v.to_bits())
    }
}

impl From<F32> for I16F16 {
    fn from(v: F32) -> Self {
        I16F16::from_bits(v.raw())
    }
}

impl From<I32F32> for F64 {
    fn from(v: I32F32) -> Self {
        F64::from_raw(v.to_bits())
    }
}

impl From<F64> for I32F32 {
    fn from(v: F64) -> Self {
        I32F32::from_bits(v.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_kernels() {
        assert_eq!(F32::ONE.raw(), 1 << 16);
        assert_eq!(F64::ONE.raw(), 1 << 32);
        assert_eq!(F32::PI.raw(), fix32::PI);
        assert_eq!(F64::E.raw(), fix64::E);
        assert_eq!(F32::default(), F32::ZERO);
        assert_eq!(F64::NEG_ONE, -F64::ONE);
    }

    #[test]
    fn test_operators() {
        let a = F32::from_float64(2.5);
        let b = F32::from_int(2);
        assert_eq!(a + b, F32::from_float64(4.5));
        assert_eq!(a - b, F32::HALF);
        assert_eq!(a * b, F32::from_int(5));
        assert_eq!(a / b, F32::from_float64(1.25));
        assert_eq!(a % b, F32::HALF);
        assert_eq!(-a, F32::from_float64(-2.5));
        assert_eq!(F32::ONE / F32::ZERO, F32::ZERO);

        let mut c = F64::from_int(10);
        c += F64::ONE;
        c -= F64::TWO;
        c *= F64::THREE;
        c /= F64::from_int(9);
        assert_eq!(c, F64::THREE);
        c %= F64::TWO;
        assert_eq!(c, F64::ONE);
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(F32::MAX + F32::from_raw(1), F32::MIN);
        assert_eq!(-F64::MIN, F64::MIN);
    }

    #[test]
    fn test_ratios() {
        assert_eq!(F32::ratio(3, 4), F32::from_float64(0.75));
        assert_eq!(F32::ratio(3, 0), F32::ZERO);
        assert_eq!(F64::ratio10(25), F64::from_float64(2.5));
        assert_eq!(F32::ratio100(-50), -F32::HALF);
        assert_eq!(F64::ratio1000(1500), F64::from_float64(1.5));
    }

    #[test]
    fn test_slice_helpers() {
        let values = [F32::from_int(3), F32::from_int(-2), F32::from_int(8), F32::ONE];
        assert_eq!(F32::min_of(&values), F32::from_int(-2));
        assert_eq!(F32::max_of(&values), F32::from_int(8));
        assert_eq!(F32::sum_of(&values), F32::from_int(10));
        assert_eq!(F32::avg_of(&values), F32::from_float64(2.5));

        assert_eq!(F64::min_of(&[]), F64::ZERO);
        assert_eq!(F64::max_of(&[]), F64::ZERO);
        assert_eq!(F64::sum_of(&[]), F64::ZERO);
        assert_eq!(F64::avg_of(&[]), F64::ZERO);

        let total: F64 = [F64::ONE, F64::HALF].iter().sum();
        assert_eq!(total, F64::from_float64(1.5));
    }

    #[test]
    fn test_helpers() {
        let v = F32::from_float64(-1.75);
        assert_eq!(v.abs(), F32::from_float64(1.75));
        assert_eq!(v.nabs(), v);
        assert_eq!(v.sign(), -1);
        assert_eq!(F64::ZERO.sign(), 0);
        assert_eq!(v.floor(), F32::from_int(-2));
        assert_eq!(v.ceil(), F32::NEG_ONE);
        assert_eq!(v.round(), F32::from_int(-2));
        assert_eq!(v.fract(), F32::from_float64(0.25));
        assert_eq!(v.half(), F32::from_float64(-0.875));
        assert_eq!(v.increment(), F32::from_float64(-0.75));
        assert_eq!(v.decrement(), F32::from_float64(-2.75));
        assert_eq!(v.clamp01(), F32::ZERO);
        assert_eq!(F32::from_int(4).clamp01(), F32::ONE);
        assert_eq!(F64::ZERO.lerp(F64::from_int(10), F64::ratio(1, 4)), F64::from_float64(2.5));
        assert_eq!(F32::ONE.min(F32::TWO), F32::ONE);
        assert_eq!(F32::ONE.max(F32::TWO), F32::TWO);
        assert_eq!(F32::ONE.compare_to(F32::TWO), -1);
        assert_eq!(F64::TWO.compare_to(F64::TWO), 0);
        assert!(F64::from_int(-3) < F64::from_float64(-2.5));
    }

    #[test]
    fn test_tier_methods_forward_to_kernel() {
        let x = F64::from_float64(1.7);
        assert_eq!(x.sqrt_fast().raw(), fix64::sqrt_fast(x.raw()));
        assert_eq!(x.sin_fastest().raw(), fix64::sin_fastest(x.raw()));
        assert_eq!(x.div_approx(F64::THREE).raw(), fix64::div(x.raw(), F64::THREE.raw()));
        assert_eq!(x.atan2(F64::ONE).raw(), fix64::atan2(x.raw(), F64::ONE.raw()));
        assert_eq!(x.pow_fast(F64::TWO).raw(), fix64::pow_fast(x.raw(), F64::TWO.raw()));

        let y = F32::from_float64(0.3);
        assert_eq!(y.asin().raw(), fix32::asin(y.raw()));
        assert_eq!(y.div_fastest(F32::THREE).raw(), fix32::div_fastest(y.raw(), F32::THREE.raw()));
    }

    #[test]
    fn test_display() {
        assert_eq!(F32::from_float64(1.5).to_string(), "1.5000000000000000");
        assert_eq!(F32::from_int(-3).to_string(), "-3.0000000000000000");
        assert_eq!(F64::ratio(1, 4).to_string(), "0.25000000000000000000000000000000");
        assert_eq!(format!("{:?}", F32::HALF), "F32(0.5 raw 32768)");
    }

    #[test]
    fn test_widening_is_exact() {
        let v = F32::from_float64(-1234.5678);
        let wide = F64::from(v);
        assert_eq!(wide.to_float64(), v.to_float64());
        assert_eq!(F32::try_from(wide), Ok(v));
    }

    #[test]
    fn test_narrowing_floors_and_rejects_overflow() {
        let v = F64::from_float64(-2.00001);
        let narrow = F32::try_from(v).unwrap();
        assert_eq!(narrow.raw() as i64, v.raw() >> 16);
        assert!(narrow <= F32::from_float64(-2.00001));

        let big = F64::from_int(40_000);
        assert_eq!(F32::try_from(big), Err(FixedError::NarrowingOverflow { raw: big.raw() }));
        assert_eq!(big.to_f32_saturating(), F32::MAX);
        assert_eq!((-big).to_f32_saturating(), F32::MIN);
        assert_eq!(F32::try_from(F64::from_int(-32_768)), Ok(F32::from_int(-32_768)));
    }

    #[test]
    fn test_fixed_crate_interop() {
        let a = I16F16::from_num(3.25);
        let f: F32 = a.into();
        assert_eq!(f, F32::from_float64(3.25));
        assert_eq!(I16F16::from(f), a);

        let b = I32F32::from_num(-7.125);
        let g = F64::from(b);
        assert_eq!(g.to_float64(), -7.125);
        assert_eq!(I32F32::from(g), b);
    }

    #[test]
    fn test_serde_is_raw_integer() {
        let v = F32::from_float64(1.5);
        assert_eq!(serde_json::to_string(&v).unwrap(), "98304");
        let back: F64 = serde_json::from_str("-4294967296").unwrap();
        assert_eq!(back, F64::NEG_ONE);

        let bytes = bincode::serialize(&F64::PI).unwrap();
        assert_eq!(bytes, fix64::PI.to_le_bytes().to_vec());
    }
}

//! Two-, three- and four-component vectors over [`F32`] and [`F64`].
//!
//! Every operation is component-wise on top of the scalar type, so a vector
//! function carries the same tier name and the same domain policy as the
//! scalar one it maps. Geometry helpers (`length`, `normalize`, `distance`)
//! are tiered the same way.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scalar::{F32, F64};

macro_rules! map_unary {
    ($comps:tt; $($f:ident),* $(,)?) => {
        $( map_unary!(@one $comps $f); )*
    };
    (@one [$($c:ident),+] $f:ident) => {
        #[inline]
        pub fn $f(self) -> Self {
            Self { $($c: self.$c.$f()),+ }
        }
    };
}

macro_rules! map_binary {
    ($comps:tt; $($f:ident => $sf:ident),* $(,)?) => {
        $( map_binary!(@one $comps $f $sf); )*
    };
    (@one [$($c:ident),+] $f:ident $sf:ident) => {
        #[inline]
        pub fn $f(self, rhs: Self) -> Self {
            Self { $($c: self.$c.$sf(rhs.$c)),+ }
        }
    };
}

macro_rules! map_scalar {
    ($comps:tt, $scalar:ident; $($f:ident => $sf:ident),* $(,)?) => {
        $( map_scalar!(@one $comps $scalar $f $sf); )*
    };
    (@one [$($c:ident),+] $scalar:ident $f:ident $sf:ident) => {
        #[inline]
        pub fn $f(self, rhs: $scalar) -> Self {
            Self { $($c: self.$c.$sf(rhs)),+ }
        }
    };
}

macro_rules! vector_op {
    ($name:ident, $scalar:ident, [$($c:ident),+], $trait:ident, $method:ident, $op:tt) => {
        impl std::ops::$trait for $name {
            type Output = Self;
            fn $method(self, rhs: Self) -> Self::Output {
                Self { $($c: self.$c $op rhs.$c),+ }
            }
        }

        impl std::ops::$trait<$scalar> for $name {
            type Output = Self;
            fn $method(self, rhs: $scalar) -> Self::Output {
                Self { $($c: self.$c $op rhs),+ }
            }
        }

        impl std::ops::$trait<$name> for $scalar {
            type Output = $name;
            fn $method(self, rhs: $name) -> Self::Output {
                $name { $($c: self $op rhs.$c),+ }
            }
        }
    };
}

macro_rules! fixed_vector {
    ($name:ident, $scalar:ident, $raw:ty, [$($c:ident),+]) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            $(pub $c: $scalar,)+
        }

        impl $name {
            pub const ZERO: Self = Self { $($c: $scalar::ZERO),+ };
            pub const ONE: Self = Self { $($c: $scalar::ONE),+ };

            #[inline]
            pub const fn new($($c: $scalar),+) -> Self {
                Self { $($c),+ }
            }

            #[inline]
            pub const fn from_raw($($c: $raw),+) -> Self {
                Self { $($c: $scalar::from_raw($c)),+ }
            }

            #[inline]
            pub const fn from_int($($c: i32),+) -> Self {
                Self { $($c: $scalar::from_int($c)),+ }
            }

            pub fn from_float32($($c: f32),+) -> Self {
                Self { $($c: $scalar::from_float32($c)),+ }
            }

            pub fn from_float64($($c: f64),+) -> Self {
                Self { $($c: $scalar::from_float64($c)),+ }
            }

            #[inline]
            pub const fn splat(v: $scalar) -> Self {
                Self { $($c: v),+ }
            }

            map_binary!([$($c),+];
                div_precise => div_precise,
                div_approx => div_approx,
                div_fast => div_fast,
                div_fastest => div_fastest,
                pow => pow,
                pow_fast => pow_fast,
                pow_fastest => pow_fastest,
                min => min,
                max => max,
            );

            map_scalar!([$($c),+], $scalar;
                div_precise_scalar => div_precise,
                div_approx_scalar => div_approx,
                div_fast_scalar => div_fast,
                div_fastest_scalar => div_fastest,
            );

            map_unary!([$($c),+];
                abs,
                sqrt_precise, sqrt, sqrt_fast, sqrt_fastest,
                rsqrt, rsqrt_fast, rsqrt_fastest,
                rcp, rcp_fast, rcp_fastest,
                exp, exp_fast, exp_fastest,
                exp2, exp2_fast, exp2_fastest,
                log, log_fast, log_fastest,
                log2, log2_fast, log2_fastest,
                sin, sin_fast, sin_fastest,
                cos, cos_fast, cos_fastest,
            );

            #[inline]
            pub fn dot(self, rhs: Self) -> $scalar {
                $scalar::ZERO $(+ self.$c * rhs.$c)+
            }

            #[inline]
            pub fn length_sqr(self) -> $scalar {
                self.dot(self)
            }

            pub fn length(self) -> $scalar {
                self.length_sqr().sqrt()
            }

            pub fn length_fast(self) -> $scalar {
                self.length_sqr().sqrt_fast()
            }

            pub fn length_fastest(self) -> $scalar {
                self.length_sqr().sqrt_fastest()
            }

            /// Scales by the reciprocal square root of the squared length.
            /// The zero vector stays zero.
            pub fn normalize(self) -> Self {
                self * self.length_sqr().rsqrt()
            }

            pub fn normalize_fast(self) -> Self {
                self * self.length_sqr().rsqrt_fast()
            }

            pub fn normalize_fastest(self) -> Self {
                self * self.length_sqr().rsqrt_fastest()
            }

            pub fn distance(self, other: Self) -> $scalar {
                (self - other).length()
            }

            pub fn distance_fast(self, other: Self) -> $scalar {
                (self - other).length_fast()
            }

            pub fn distance_fastest(self, other: Self) -> $scalar {
                (self - other).length_fastest()
            }

            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                Self { $($c: self.$c.clamp(lo.$c, hi.$c)),+ }
            }

            /// `self * (1 - t) + other * t`, two multiplies per component.
            pub fn lerp(self, other: Self, t: $scalar) -> Self {
                let ta = $scalar::ONE - t;
                Self { $($c: self.$c * ta + other.$c * t),+ }
            }
        }

        vector_op!($name, $scalar, [$($c),+], Add, add, +);
        vector_op!($name, $scalar, [$($c),+], Sub, sub, -);
        vector_op!($name, $scalar, [$($c),+], Mul, mul, *);
        vector_op!($name, $scalar, [$($c),+], Div, div, /);
        vector_op!($name, $scalar, [$($c),+], Rem, rem, %);

        impl std::ops::Neg for $name {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self { $($c: -self.$c),+ }
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

        impl std::ops::MulAssign<$scalar> for $name {
            fn mul_assign(&mut self, rhs: $scalar) {
                *self = *self * rhs;
            }
        }

        impl std::ops::DivAssign<$scalar> for $name {
            fn div_assign(&mut self, rhs: $scalar) {
                *self = *self / rhs;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(self.$c.to_string()),+];
                write!(f, "({})", parts.join(", "))
            }
        }
    };
}

fixed_vector!(F32Vec2, F32, i32, [x, y]);
fixed_vector!(F32Vec3, F32, i32, [x, y, z]);
fixed_vector!(F32Vec4, F32, i32, [x, y, z, w]);
fixed_vector!(F64Vec2, F64, i64, [x, y]);
fixed_vector!(F64Vec3, F64, i64, [x, y, z]);
fixed_vector!(F64Vec4, F64, i64, [x, y, z, w]);

macro_rules! vec2_extras {
    ($name:ident, $scalar:ident) => {
        impl $name {
            pub const UP: Self = Self::new($scalar::ZERO, $scalar::ONE);
            pub const DOWN: Self = Self::new($scalar::ZERO, $scalar::NEG_ONE);
            pub const LEFT: Self = Self::new($scalar::NEG_ONE, $scalar::ZERO);
            pub const RIGHT: Self = Self::new($scalar::ONE, $scalar::ZERO);
            pub const AXIS_X: Self = Self::new($scalar::ONE, $scalar::ZERO);
            pub const AXIS_Y: Self = Self::new($scalar::ZERO, $scalar::ONE);

            /// The z component of the 3D cross product of the two vectors
            /// lifted onto the xy plane.
            pub fn cross(self, rhs: Self) -> $scalar {
                self.x * rhs.y - self.y * rhs.x
            }
        }
    };
}

macro_rules! vec3_extras {
    ($name:ident, $scalar:ident) => {
        impl $name {
            pub const UP: Self = Self::new($scalar::ZERO, $scalar::ONE, $scalar::ZERO);
            pub const DOWN: Self = Self::new($scalar::ZERO, $scalar::NEG_ONE, $scalar::ZERO);
            pub const LEFT: Self = Self::new($scalar::NEG_ONE, $scalar::ZERO, $scalar::ZERO);
            pub const RIGHT: Self = Self::new($scalar::ONE, $scalar::ZERO, $scalar::ZERO);
            pub const FORWARD: Self = Self::new($scalar::ZERO, $scalar::ZERO, $scalar::ONE);
            pub const BACK: Self = Self::new($scalar::ZERO, $scalar::ZERO, $scalar::NEG_ONE);
            pub const AXIS_X: Self = Self::new($scalar::ONE, $scalar::ZERO, $scalar::ZERO);
            pub const AXIS_Y: Self = Self::new($scalar::ZERO, $scalar::ONE, $scalar::ZERO);
            pub const AXIS_Z: Self = Self::new($scalar::ZERO, $scalar::ZERO, $scalar::ONE);

            pub fn cross(self, rhs: Self) -> Self {
                Self::new(
                    self.y * rhs.z - self.z * rhs.y,
                    self.z * rhs.x - self.x * rhs.z,
                    self.x * rhs.y - self.y * rhs.x,
                )
            }
        }
    };
}

macro_rules! vec4_extras {
    ($name:ident, $scalar:ident) => {
        impl $name {
            pub const AXIS_X: Self = Self::new($scalar::ONE, $scalar::ZERO, $scalar::ZERO, $scalar::ZERO);
            pub const AXIS_Y: Self = Self::new($scalar::ZERO, $scalar::ONE, $scalar::ZERO, $scalar::ZERO);
            pub const AXIS_Z: Self = Self::new($scalar::ZERO, $scalar::ZERO, $scalar::ONE, $scalar::ZERO);
            pub const AXIS_W: Self = Self::new($scalar::ZERO, $scalar::ZERO, $scalar::ZERO, $scalar::ONE);
        }
    };
}

vec2_extras!(F32Vec2, F32);
vec2_extras!(F64Vec2, F64);
vec3_extras!(F32Vec3, F32);
vec3_extras!(F64Vec3, F64);
vec4_extras!(F32Vec4, F32);
vec4_extras!(F64Vec4, F64);

macro_rules! widen_and_int64 {
    ($narrow:ident, $wide:ident, [$($c:ident),+]) => {
        impl $wide {
            #[inline]
            pub const fn from_int64($($c: i64),+) -> Self {
                Self { $($c: F64::from_int64($c)),+ }
            }
        }

        impl From<$narrow> for $wide {
            fn from(v: $narrow) -> Self {
                Self { $($c: F64::from(v.$c)),+ }
            }
        }
    };
}

widen_and_int64!(F32Vec2, F64Vec2, [x, y]);
widen_and_int64!(F32Vec3, F64Vec3, [x, y, z]);
widen_and_int64!(F32Vec4, F64Vec4, [x, y, z, w]);

//! Rotation quaternions over [`F32`] and [`F64`].
//!
//! `(x, y, z)` is the vector part and `w` the scalar part. Constructors
//! that take angles use the fastest trigonometry tier; normalization is
//! available in all three tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scalar::{F32, F64};
use crate::vector::{F32Vec3, F64Vec3};

macro_rules! fixed_quat {
    ($name:ident, $scalar:ident, $vec3:ident, $raw:ty) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub x: $scalar,
            pub y: $scalar,
            pub z: $scalar,
            pub w: $scalar,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl $name {
            pub const IDENTITY: Self = Self::new($scalar::ZERO, $scalar::ZERO, $scalar::ZERO, $scalar::ONE);

            #[inline]
            pub const fn new(x: $scalar, y: $scalar, z: $scalar, w: $scalar) -> Self {
                Self { x, y, z, w }
            }

            #[inline]
            pub const fn from_raw(x: $raw, y: $raw, z: $raw, w: $raw) -> Self {
                Self::new($scalar::from_raw(x), $scalar::from_raw(y), $scalar::from_raw(z), $scalar::from_raw(w))
            }

            #[inline]
            pub const fn from_vector(v: $vec3, w: $scalar) -> Self {
                Self::new(v.x, v.y, v.z, w)
            }

            /// `1e-6`, or one raw unit where that rounds to zero (16.16).
            #[inline]
            fn epsilon() -> $scalar {
                $scalar::ratio(1, 1_000_000).max($scalar::from_raw(1))
            }

            /// The vector part.
            #[inline]
            pub const fn xyz(self) -> $vec3 {
                $vec3::new(self.x, self.y, self.z)
            }

            /// Rotation of `angle` radians about `axis`, which should be unit length.
            pub fn from_axis_angle(axis: $vec3, angle: $scalar) -> Self {
                let half = angle.half();
                Self::from_vector(axis * half.sin_fastest(), half.cos_fastest())
            }

            /// Roll about z first, then pitch about x, then yaw about y.
            pub fn from_yaw_pitch_roll(yaw: $scalar, pitch: $scalar, roll: $scalar) -> Self {
                let half_roll = roll.half();
                let sr = half_roll.sin_fastest();
                let cr = half_roll.cos_fastest();

                let half_pitch = pitch.half();
                let sp = half_pitch.sin_fastest();
                let cp = half_pitch.cos_fastest();

                let half_yaw = yaw.half();
                let sy = half_yaw.sin_fastest();
                let cy = half_yaw.cos_fastest();

                Self::new(
                    cy * sp * cr + sy * cp * sr,
                    sy * cp * cr - cy * sp * sr,
                    cy * cp * sr - sy * sp * cr,
                    cy * cp * cr + sy * sp * sr,
                )
            }

            /// Shortest rotation taking the direction of `a` onto that of `b`.
            ///
            /// Opposite vectors rotate half a turn about an axis orthogonal
            /// to `a`.
            pub fn from_two_vectors(a: $vec3, b: $vec3) -> Self {
                let epsilon = Self::epsilon();
                let norm_a_norm_b = (a.length_sqr() * b.length_sqr()).sqrt_fastest();
                let mut real_part = norm_a_norm_b + a.dot(b);

                let v = if real_part < epsilon * norm_a_norm_b {
                    real_part = $scalar::ZERO;
                    if a.x.abs() > a.z.abs() {
                        $vec3::new(-a.y, a.x, $scalar::ZERO)
                    } else {
                        $vec3::new($scalar::ZERO, -a.z, a.y)
                    }
                } else {
                    a.cross(b)
                };

                Self::from_vector(v, real_part).normalize_fastest()
            }

            /// Rotation that looks along `dir` with `up` as the vertical hint.
            /// A zero `dir` gives the identity.
            pub fn look_rotation(dir: $vec3, up: $vec3) -> Self {
                if dir == $vec3::ZERO {
                    return Self::IDENTITY;
                }
                if up == dir {
                    return Self::from_two_vectors($vec3::AXIS_Z, dir);
                }
                let up = up.normalize_fastest();
                // `dir` with its component along `up` removed.
                let v = dir + up * -up.dot(dir);
                let q = Self::from_two_vectors($vec3::AXIS_Z, v);
                Self::from_two_vectors(v, dir) * q
            }

            pub fn look_at_rotation(from: $vec3, to: $vec3, up: $vec3) -> Self {
                Self::look_rotation((to - from).normalize_fastest(), up)
            }

            /// Hamilton product.
            pub fn multiply(self, b: Self) -> Self {
                let cx = self.y * b.z - self.z * b.y;
                let cy = self.z * b.x - self.x * b.z;
                let cz = self.x * b.y - self.y * b.x;
                let dot = self.x * b.x + self.y * b.y + self.z * b.z;

                Self::new(
                    self.x * b.w + b.x * self.w + cx,
                    self.y * b.w + b.y * self.w + cy,
                    self.z * b.w + b.z * self.w + cz,
                    self.w * b.w - dot,
                )
            }

            /// `self` followed by `other`; the same product as `*`.
            pub fn concatenate(self, other: Self) -> Self {
                self.multiply(other)
            }

            pub fn negate(self) -> Self {
                Self::new(-self.x, -self.y, -self.z, -self.w)
            }

            pub fn conjugate(self) -> Self {
                Self::new(-self.x, -self.y, -self.z, self.w)
            }

            /// Conjugate over squared length. Only the conjugate is needed for
            /// unit quaternions, see [`Self::inverse_unit`].
            pub fn inverse(self) -> Self {
                let inv_norm = self.length_sqr().rcp();
                Self::new(-(self.x * inv_norm), -(self.y * inv_norm), -(self.z * inv_norm), self.w * inv_norm)
            }

            pub fn inverse_unit(self) -> Self {
                self.conjugate()
            }

            pub fn dot(self, b: Self) -> $scalar {
                self.x * b.x + self.y * b.y + self.z * b.z + self.w * b.w
            }

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

            fn scale(self, s: $scalar) -> Self {
                Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
            }

            pub fn normalize(self) -> Self {
                self.scale(self.length().rcp())
            }

            pub fn normalize_fast(self) -> Self {
                self.scale(self.length_fast().rcp_fast())
            }

            pub fn normalize_fastest(self) -> Self {
                self.scale(self.length_fastest().rcp_fastest())
            }

            /// Spherical interpolation along the shorter arc. Falls back to a
            /// linear blend when the two rotations are nearly equal.
            pub fn slerp(self, other: Self, t: $scalar) -> Self {
                let epsilon = Self::epsilon();
                let mut cos_omega = self.dot(other);
                let flip = cos_omega < $scalar::ZERO;
                if flip {
                    cos_omega = -cos_omega;
                }

                let (s1, s2) = if cos_omega > $scalar::ONE - epsilon {
                    ($scalar::ONE - t, if flip { -t } else { t })
                } else {
                    let omega = cos_omega.acos_fastest();
                    let inv_sin_omega = omega.sin_fastest().rcp_fastest();
                    let s1 = (($scalar::ONE - t) * omega).sin_fastest() * inv_sin_omega;
                    let s2 = (t * omega).sin_fastest() * inv_sin_omega;
                    (s1, if flip { -s2 } else { s2 })
                };

                Self::new(
                    s1 * self.x + s2 * other.x,
                    s1 * self.y + s2 * other.y,
                    s1 * self.z + s2 * other.z,
                    s1 * self.w + s2 * other.w,
                )
            }

            /// Linear blend toward `other` or its negation, whichever is
            /// closer, normalized with the fastest tier.
            pub fn lerp(self, other: Self, t: $scalar) -> Self {
                let t1 = $scalar::ONE - t;
                let other = if self.dot(other) >= $scalar::ZERO { other } else { other.negate() };
                Self::new(
                    t1 * self.x + t * other.x,
                    t1 * self.y + t * other.y,
                    t1 * self.z + t * other.z,
                    t1 * self.w + t * other.w,
                )
                .normalize_fastest()
            }

            /// Rotates `v` by this unit quaternion.
            pub fn rotate_vector(self, v: $vec3) -> $vec3 {
                let u = self.xyz();
                let s = self.w;
                u * ($scalar::TWO * u.dot(v)) + v * (s * s - u.dot(u)) + ($scalar::TWO * s) * u.cross(v)
            }
        }

        impl std::ops::Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self::Output {
                self.multiply(rhs)
            }
        }

        impl std::ops::Neg for $name {
            type Output = Self;
            fn neg(self) -> Self::Output {
                self.negate()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
            }
        }
    };
}

fixed_quat!(F32Quat, F32, F32Vec3, i32);
fixed_quat!(F64Quat, F64, F64Vec3, i64);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: F64Vec3, b: F64Vec3, tolerance: f64) {
        let err = (a - b).length().to_float64();
        assert!(err <= tolerance, "{} vs {}: distance {}", a, b, err);
    }

    #[test]
    fn test_identity() {
        let v = F64Vec3::from_int(3, -4, 5);
        assert_eq!(F64Quat::IDENTITY.rotate_vector(v), v);
        assert_eq!(F64Quat::IDENTITY * F64Quat::IDENTITY, F64Quat::IDENTITY);
        assert_eq!(F32Quat::default(), F32Quat::IDENTITY);
        assert_eq!(F64Quat::IDENTITY.length_sqr(), F64::ONE);
    }

    #[test]
    fn test_axis_angle_rotates_quarter_turn() {
        let q = F64Quat::from_axis_angle(F64Vec3::AXIS_Z, F64::HALF_PI);
        let rotated = q.rotate_vector(F64Vec3::AXIS_X);
        assert_vec_close(rotated, F64Vec3::AXIS_Y, 1e-3);

        let q32 = F32Quat::from_axis_angle(F32Vec3::AXIS_Y, F32::PI);
        let r = q32.rotate_vector(F32Vec3::AXIS_X);
        assert!((r.x + F32::ONE).abs() < F32::ratio(1, 100), "{}", r);
    }

    #[test]
    fn test_product_composes_rotations() {
        let quarter = F64Quat::from_axis_angle(F64Vec3::AXIS_Z, F64::HALF_PI);
        let half = quarter * quarter;
        assert_vec_close(half.rotate_vector(F64Vec3::AXIS_X), -F64Vec3::AXIS_X, 2e-3);
        assert_eq!(quarter.concatenate(quarter), half);
    }

    #[test]
    fn test_conjugate_and_inverse() {
        let q = F64Quat::from_yaw_pitch_roll(F64::ratio(3, 10), F64::ratio(-1, 5), F64::ratio(7, 10));
        let p = q * q.inverse_unit();
        assert!((p.w - F64::ONE).abs() < F64::ratio(1, 1000), "{}", p);

        let scaled = F64Quat::new(F64::ZERO, F64::ZERO, F64::TWO, F64::ZERO);
        let inv = scaled.inverse();
        assert!((inv.z + F64::HALF).abs() < F64::ratio(1, 100_000), "{}", inv);
        assert_eq!(q.conjugate(), F64Quat::new(-q.x, -q.y, -q.z, q.w));
        assert_eq!(-q, q.negate());
    }

    #[test]
    fn test_normalize_tiers() {
        let q = F64Quat::from_int_parts(1, 2, 3, 4);
        for n in [q.normalize(), q.normalize_fast(), q.normalize_fastest()] {
            assert!((n.length() - F64::ONE).abs() < F64::ratio(1, 500), "{}", n);
        }
    }

    #[test]
    fn test_from_two_vectors() {
        let q = F64Quat::from_two_vectors(F64Vec3::AXIS_X, F64Vec3::AXIS_Y);
        assert_vec_close(q.rotate_vector(F64Vec3::AXIS_X), F64Vec3::AXIS_Y, 2e-3);

        // Opposite vectors take the fallback axis.
        let flip = F64Quat::from_two_vectors(F64Vec3::AXIS_Z, -F64Vec3::AXIS_Z);
        assert_eq!(flip.w, F64::ZERO);
        assert_vec_close(flip.rotate_vector(F64Vec3::AXIS_Z), -F64Vec3::AXIS_Z, 2e-3);
    }

    #[test]
    fn test_look_rotation() {
        assert_eq!(F64Quat::look_rotation(F64Vec3::ZERO, F64Vec3::UP), F64Quat::IDENTITY);

        let q = F64Quat::look_rotation(F64Vec3::RIGHT, F64Vec3::UP);
        assert_vec_close(q.rotate_vector(F64Vec3::FORWARD), F64Vec3::RIGHT, 5e-3);

        let at = F64Quat::look_at_rotation(F64Vec3::ZERO, F64Vec3::from_int(0, 0, 10), F64Vec3::UP);
        assert_vec_close(at.rotate_vector(F64Vec3::FORWARD), F64Vec3::FORWARD, 5e-3);
    }

    #[test]
    fn test_slerp_and_lerp_endpoints() {
        let a = F64Quat::IDENTITY;
        let b = F64Quat::from_axis_angle(F64Vec3::AXIS_Z, F64::HALF_PI);
        let start = a.slerp(b, F64::ZERO);
        let end = a.slerp(b, F64::ONE);
        assert!((start.w - F64::ONE).abs() < F64::ratio(1, 1000), "{}", start);
        assert!((end.z - b.z).abs() < F64::ratio(1, 1000), "{}", end);

        let mid = a.slerp(b, F64::HALF);
        let expected = F64Quat::from_axis_angle(F64Vec3::AXIS_Z, F64::HALF_PI.half());
        assert!((mid.z - expected.z).abs() < F64::ratio(1, 500), "{} vs {}", mid, expected);

        // Nearly equal rotations blend linearly.
        assert_eq!(a.slerp(a, F64::HALF), a);
        assert_eq!(F32Quat::IDENTITY.slerp(F32Quat::IDENTITY, F32::HALF), F32Quat::IDENTITY);

        let l = a.lerp(b, F64::HALF);
        assert!((l.length() - F64::ONE).abs() < F64::ratio(1, 500));
        // The sign of `other` does not change the blended rotation.
        let l_neg = a.lerp(-b, F64::HALF);
        assert_eq!(l, l_neg);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            F32Quat::IDENTITY.to_string(),
            "(0.0000000000000000, 0.0000000000000000, 0.0000000000000000, 1.0000000000000000)"
        );
    }

    impl F64Quat {
        fn from_int_parts(x: i32, y: i32, z: i32, w: i32) -> Self {
            Self::new(F64::from_int(x), F64::from_int(y), F64::from_int(z), F64::from_int(w))
        }
    }
}

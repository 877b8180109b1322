//! Deterministic fixed-point arithmetic.
//!
//! Two kernels with the same contract: Kernel-32 stores 16.16 values in an
//! `i32`, Kernel-64 stores 32.32 values in an `i64`. All arithmetic is
//! integer-only, so every operation returns bit-identical results on every
//! platform. The transcendental functions come in three speed tiers
//! (`sqrt`, `sqrt_fast`, `sqrt_fastest`, ...), and division and square root
//! also have a bit-exact `_precise` form.
//!
//! Nothing here panics or returns an error on bad input: operations outside
//! their domain return zero and overflow wraps.
//!
//! - [`kernel`] holds the raw integer functions.
//! - [`F32`] and [`F64`] wrap them with operators, formatting and serde.
//! - [`vector`] and [`quat`] build 2/3/4-vectors and quaternions on top.
//! - [`accuracy`] and [`config`] drive the `fixmath` sweep binary.

pub mod accuracy;
pub mod config;
pub mod error;
pub mod kernel;
pub mod quat;
pub mod scalar;
pub mod vector;

pub use error::FixedError;
pub use quat::{F32Quat, F64Quat};
pub use scalar::{F32, F64};
pub use vector::{F32Vec2, F32Vec3, F32Vec4, F64Vec2, F64Vec3, F64Vec4};

/// Log every 1000th iteration when the `perf_stats` feature is enabled.
///
/// Without the feature the message arguments are not evaluated.
///
/// # Example
/// ```ignore
/// profile_log!(i, "{} samples measured", i);
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($iteration:expr, $($arg:tt)*) => {
        if $iteration % 1000 == 0 {
            ::tracing::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($iteration:expr, $($arg:tt)*) => {
        let _ = &$iteration;
    };
}

//! Accuracy sweeps and determinism fingerprints.
//!
//! Every (kernel, function, tier) triple is evaluated on seeded random
//! inputs drawn from the function's valid domain and compared with the
//! `f64` result from std. Inputs are quantized to the kernel first and
//! the reference is computed from the quantized value, so the reported
//! error is the kernel's own and not the input rounding.
//!
//! Error metric: absolute for bounded results, and `|got - want| /
//! max(|want|, 1)` for families whose results span many magnitudes (see
//! [`Function::is_scaled`]).

use std::fs::File;
use std::hash::Hasher;
use std::io::{BufReader, BufWriter};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SweepConfig;
use crate::kernel::{fix32, fix64};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelKind {
    /// 16.16 in `i32`.
    Fix32,
    /// 32.32 in `i64`.
    Fix64,
}

impl KernelKind {
    pub const ALL: [KernelKind; 2] = [KernelKind::Fix32, KernelKind::Fix64];

    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Fix32 => "fix32",
            KernelKind::Fix64 => "fix64",
        }
    }

    /// Value of one raw unit.
    pub fn ulp(self) -> f64 {
        match self {
            KernelKind::Fix32 => 1.0 / 65_536.0,
            KernelKind::Fix64 => 1.0 / 4_294_967_296.0,
        }
    }

    pub fn from_f64(self, v: f64) -> i64 {
        match self {
            KernelKind::Fix32 => fix32::from_f64(v) as i64,
            KernelKind::Fix64 => fix64::from_f64(v),
        }
    }

    pub fn to_f64(self, raw: i64) -> f64 {
        match self {
            KernelKind::Fix32 => fix32::to_f64(raw as i32),
            KernelKind::Fix64 => fix64::to_f64(raw),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Bit-exact integer algorithm (`div_precise`, `sqrt_precise`).
    Exact,
    Precise,
    Fast,
    Fastest,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::Exact => "exact",
            Tier::Precise => "precise",
            Tier::Fast => "fast",
            Tier::Fastest => "fastest",
        }
    }
}

const APPROX_TIERS: &[Tier] = &[Tier::Precise, Tier::Fast, Tier::Fastest];
const EXACT_AND_APPROX_TIERS: &[Tier] = &[Tier::Exact, Tier::Precise, Tier::Fast, Tier::Fastest];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    Div,
    Sqrt,
    RSqrt,
    Rcp,
    Exp,
    Exp2,
    Log,
    Log2,
    Sin,
    Cos,
    Tan,
    Atan,
    Atan2,
    Asin,
    Acos,
    Pow,
}

/// How one argument is drawn.
#[derive(Clone, Copy, Debug)]
enum Draw {
    Uniform(f64, f64),
    /// Log-uniform magnitude in the range.
    LogUniform(f64, f64),
    /// Log-uniform magnitude with a random sign.
    SignedLogUniform(f64, f64),
}

impl Draw {
    fn sample(self, rng: &mut StdRng) -> f64 {
        match self {
            Draw::Uniform(lo, hi) => rng.random_range(lo..hi),
            Draw::LogUniform(lo, hi) => rng.random_range(lo.ln()..hi.ln()).exp(),
            Draw::SignedLogUniform(lo, hi) => {
                let v = rng.random_range(lo.ln()..hi.ln()).exp();
                if rng.random_bool(0.5) {
                    -v
                } else {
                    v
                }
            }
        }
    }
}

impl Function {
    pub const ALL: [Function; 16] = [
        Function::Div,
        Function::Sqrt,
        Function::RSqrt,
        Function::Rcp,
        Function::Exp,
        Function::Exp2,
        Function::Log,
        Function::Log2,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Atan,
        Function::Atan2,
        Function::Asin,
        Function::Acos,
        Function::Pow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Div => "div",
            Function::Sqrt => "sqrt",
            Function::RSqrt => "rsqrt",
            Function::Rcp => "rcp",
            Function::Exp => "exp",
            Function::Exp2 => "exp2",
            Function::Log => "log",
            Function::Log2 => "log2",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Pow => "pow",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Function::Div | Function::Atan2 | Function::Pow => 2,
            _ => 1,
        }
    }

    pub fn tiers(self) -> &'static [Tier] {
        match self {
            Function::Div | Function::Sqrt => EXACT_AND_APPROX_TIERS,
            _ => APPROX_TIERS,
        }
    }

    /// Whether the error is scaled by `max(|want|, 1)`.
    pub fn is_scaled(self) -> bool {
        matches!(
            self,
            Function::Div
                | Function::Rcp
                | Function::Sqrt
                | Function::RSqrt
                | Function::Exp
                | Function::Exp2
                | Function::Pow
        )
    }

    // Ranges stay inside what Kernel-32 can represent so both kernels sweep
    // the same inputs.
    fn domain(self) -> &'static [Draw] {
        match self {
            Function::Div => &[Draw::Uniform(-100.0, 100.0), Draw::SignedLogUniform(0.01, 1000.0)],
            Function::Rcp => &[Draw::SignedLogUniform(0.01, 1000.0)],
            Function::Sqrt | Function::RSqrt => &[Draw::LogUniform(0.01, 10_000.0)],
            Function::Exp => &[Draw::Uniform(-10.0, 10.0)],
            Function::Exp2 => &[Draw::Uniform(-15.0, 14.9)],
            Function::Log | Function::Log2 => &[Draw::LogUniform(0.001, 30_000.0)],
            Function::Sin | Function::Cos => &[Draw::Uniform(-25.0, 25.0)],
            Function::Tan => &[Draw::Uniform(-1.4, 1.4)],
            Function::Atan => &[Draw::Uniform(-100.0, 100.0)],
            Function::Atan2 => &[Draw::Uniform(-100.0, 100.0), Draw::Uniform(-100.0, 100.0)],
            Function::Asin | Function::Acos => &[Draw::Uniform(-1.0, 1.0)],
            Function::Pow => &[Draw::Uniform(0.1, 10.0), Draw::Uniform(-3.0, 3.0)],
        }
    }

    fn reference(self, a: f64, b: f64) -> f64 {
        match self {
            Function::Div => a / b,
            Function::Sqrt => a.sqrt(),
            Function::RSqrt => 1.0 / a.sqrt(),
            Function::Rcp => 1.0 / a,
            Function::Exp => a.exp(),
            Function::Exp2 => a.exp2(),
            Function::Log => a.ln(),
            Function::Log2 => a.log2(),
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Atan => a.atan(),
            Function::Atan2 => a.atan2(b),
            Function::Asin => a.asin(),
            Function::Acos => a.acos(),
            Function::Pow => a.powf(b),
        }
    }

    /// Largest error a sweep over the default domains may report.
    pub fn error_budget(self, kernel: KernelKind, tier: Tier) -> f64 {
        let row = match kernel {
            KernelKind::Fix32 => FIX32_BUDGETS[self as usize],
            KernelKind::Fix64 => FIX64_BUDGETS[self as usize],
        };
        row[tier as usize]
    }
}

// Indexed by `Function` then `Tier`. The exact column is unused outside
// division and square root.
#[rustfmt::skip]
const FIX32_BUDGETS: [[f64; 4]; 16] = [
    /* div   */ [5e-5, 5e-5, 2.5e-3, 3e-3],
    /* sqrt  */ [5e-5, 5e-5, 1e-4, 1e-3],
    /* rsqrt */ [0.0,  5e-5, 1e-4, 2e-3],
    /* rcp   */ [0.0,  5e-5, 1e-4, 1.5e-3],
    /* exp   */ [0.0,  2e-4, 2e-4, 5e-4],
    /* exp2  */ [0.0,  5e-5, 1e-4, 4e-4],
    /* log   */ [0.0,  1e-4, 1e-4, 3e-4],
    /* log2  */ [0.0,  5e-5, 5e-5, 3e-4],
    /* sin   */ [0.0,  5e-5, 5e-5, 5e-4],
    /* cos   */ [0.0,  1e-4, 1e-4, 5e-4],
    /* tan   */ [0.0,  5e-5, 3e-4, 7e-3],
    /* atan  */ [0.0,  1e-4, 1e-4, 1e-3],
    /* atan2 */ [0.0,  1e-4, 1e-4, 1.2e-3],
    /* asin  */ [0.0,  5e-5, 1e-4, 1.5e-3],
    /* acos  */ [0.0,  5e-5, 1e-4, 1.5e-3],
    /* pow   */ [0.0,  4e-4, 4e-4, 1e-3],
];

#[rustfmt::skip]
const FIX64_BUDGETS: [[f64; 4]; 16] = [
    /* div   */ [1e-9, 2e-7, 5e-5, 1.5e-3],
    /* sqrt  */ [1e-9, 1e-6, 5e-5, 1e-3],
    /* rsqrt */ [0.0,  2e-7, 5e-5, 2e-3],
    /* rcp   */ [0.0,  2e-7, 5e-5, 1.5e-3],
    /* exp   */ [0.0,  5e-7, 2e-5, 4e-4],
    /* exp2  */ [0.0,  5e-7, 2e-5, 4e-4],
    /* log   */ [0.0,  5e-8, 5e-6, 2e-4],
    /* log2  */ [0.0,  2e-8, 1e-6, 3e-4],
    /* sin   */ [0.0,  1e-7, 5e-6, 5e-4],
    /* cos   */ [0.0,  1e-7, 5e-6, 5e-4],
    /* tan   */ [0.0,  1e-6, 2e-4, 7e-3],
    /* atan  */ [0.0,  1e-7, 2e-5, 1e-3],
    /* atan2 */ [0.0,  1e-7, 3e-5, 1.2e-3],
    /* asin  */ [0.0,  5e-7, 4e-5, 1.5e-3],
    /* acos  */ [0.0,  5e-7, 4e-5, 1.5e-3],
    /* pow   */ [0.0,  5e-7, 3e-5, 1e-3],
];

macro_rules! tiered {
    ($tier:expr, $precise:expr, $fast:expr, $fastest:expr) => {
        match $tier {
            Tier::Precise => $precise,
            Tier::Fast => $fast,
            Tier::Fastest => $fastest,
            Tier::Exact => return None,
        }
    };
}

macro_rules! evaluate_kernel {
    ($k:ident, $raw:ty, $function:expr, $tier:expr, $a:expr, $b:expr) => {{
        let a = $a as $raw;
        let b = $b as $raw;
        let out = match $function {
            Function::Div => match $tier {
                Tier::Exact => $k::div_precise(a, b),
                Tier::Precise => $k::div(a, b),
                Tier::Fast => $k::div_fast(a, b),
                Tier::Fastest => $k::div_fastest(a, b),
            },
            Function::Sqrt => match $tier {
                Tier::Exact => $k::sqrt_precise(a),
                Tier::Precise => $k::sqrt(a),
                Tier::Fast => $k::sqrt_fast(a),
                Tier::Fastest => $k::sqrt_fastest(a),
            },
            Function::RSqrt => tiered!($tier, $k::rsqrt(a), $k::rsqrt_fast(a), $k::rsqrt_fastest(a)),
            Function::Rcp => tiered!($tier, $k::rcp(a), $k::rcp_fast(a), $k::rcp_fastest(a)),
            Function::Exp => tiered!($tier, $k::exp(a), $k::exp_fast(a), $k::exp_fastest(a)),
            Function::Exp2 => tiered!($tier, $k::exp2(a), $k::exp2_fast(a), $k::exp2_fastest(a)),
            Function::Log => tiered!($tier, $k::log(a), $k::log_fast(a), $k::log_fastest(a)),
            Function::Log2 => tiered!($tier, $k::log2(a), $k::log2_fast(a), $k::log2_fastest(a)),
            Function::Sin => tiered!($tier, $k::sin(a), $k::sin_fast(a), $k::sin_fastest(a)),
            Function::Cos => tiered!($tier, $k::cos(a), $k::cos_fast(a), $k::cos_fastest(a)),
            Function::Tan => tiered!($tier, $k::tan(a), $k::tan_fast(a), $k::tan_fastest(a)),
            Function::Atan => tiered!($tier, $k::atan(a), $k::atan_fast(a), $k::atan_fastest(a)),
            Function::Atan2 => tiered!($tier, $k::atan2(a, b), $k::atan2_fast(a, b), $k::atan2_fastest(a, b)),
            Function::Asin => tiered!($tier, $k::asin(a), $k::asin_fast(a), $k::asin_fastest(a)),
            Function::Acos => tiered!($tier, $k::acos(a), $k::acos_fast(a), $k::acos_fastest(a)),
            Function::Pow => tiered!($tier, $k::pow(a, b), $k::pow_fast(a, b), $k::pow_fastest(a, b)),
        };
        Some(out as i64)
    }};
}

/// Evaluates one tier of `function` on raw kernel inputs. `b` is ignored by
/// unary functions. `None` when the function has no such tier.
pub fn evaluate(kernel: KernelKind, function: Function, tier: Tier, a: i64, b: i64) -> Option<i64> {
    match kernel {
        KernelKind::Fix32 => evaluate_kernel!(fix32, i32, function, tier, a, b),
        KernelKind::Fix64 => evaluate_kernel!(fix64, i64, function, tier, a, b),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    pub samples: usize,
    pub max_abs: f64,
    pub mean_abs: f64,
    /// Inputs (as `f64`) at which `max_abs` occurred.
    pub worst_input: (f64, f64),
}

impl ErrorStats {
    pub fn within(&self, budget: f64) -> bool {
        self.max_abs <= budget
    }
}

fn draw_inputs(kernel: KernelKind, function: Function, rng: &mut StdRng) -> (i64, i64) {
    let domain = function.domain();
    let a = kernel.from_f64(domain[0].sample(rng));
    let b = match domain.get(1) {
        Some(draw) => kernel.from_f64(draw.sample(rng)),
        None => 0,
    };
    (a, b)
}

/// Measures one tier of one function over `samples` seeded inputs.
#[fixmath_macros::profile]
pub fn measure(kernel: KernelKind, function: Function, tier: Tier, seed: u64, samples: usize) -> Option<ErrorStats> {
    if !function.tiers().contains(&tier) {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = ErrorStats { samples, ..Default::default() };
    let mut total = 0.0;

    for i in 0..samples {
        crate::profile_log!(i, "{} {} {}: {}/{} samples", kernel.name(), function.name(), tier.name(), i, samples);
        let (a, b) = draw_inputs(kernel, function, &mut rng);
        let (fa, fb) = (kernel.to_f64(a), kernel.to_f64(b));
        let want = function.reference(fa, fb);
        let got = kernel.to_f64(evaluate(kernel, function, tier, a, b)?);

        let mut err = (got - want).abs();
        if function.is_scaled() {
            err /= want.abs().max(1.0);
        }
        total += err;
        if err > stats.max_abs {
            stats.max_abs = err;
            stats.worst_input = (fa, fb);
        }
    }

    if samples > 0 {
        stats.mean_abs = total / samples as f64;
    }
    Some(stats)
}

/// Hash of the raw output bits of every tier of every function on a seeded
/// input stream. Two builds that agree here computed bit-identical results.
pub fn fingerprint(kernel: KernelKind, seed: u64, samples: usize) -> u64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut hasher = FxHasher::default();

    for _ in 0..samples {
        for function in Function::ALL {
            let (a, b) = draw_inputs(kernel, function, &mut rng);
            for &tier in function.tiers() {
                if let Some(out) = evaluate(kernel, function, tier, a, b) {
                    hasher.write_i64(out);
                }
            }
        }
    }
    hasher.finish()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub kernel: KernelKind,
    pub function: Function,
    pub tier: Tier,
    pub stats: ErrorStats,
    pub budget: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub version: u32,
    pub seed: u64,
    pub rows: Vec<SweepRow>,
    pub fingerprints: Vec<(KernelKind, u64)>,
}

impl SweepReport {
    pub fn failures(&self) -> impl Iterator<Item = &SweepRow> {
        self.rows.iter().filter(|row| !row.stats.within(row.budget))
    }
}

pub fn run_sweep(config: &SweepConfig) -> SweepReport {
    let mut rows = Vec::new();
    let mut fingerprints = Vec::new();

    for &kernel in &config.kernels {
        for &function in &config.functions {
            for &tier in function.tiers() {
                let Some(stats) = measure(kernel, function, tier, config.seed, config.samples) else {
                    continue;
                };
                let budget = function.error_budget(kernel, tier);
                if !stats.within(budget) {
                    warn!(
                        "{} {} {}: max error {:.3e} over budget {:.1e} at {:?}",
                        kernel.name(),
                        function.name(),
                        tier.name(),
                        stats.max_abs,
                        budget,
                        stats.worst_input
                    );
                }
                rows.push(SweepRow { kernel, function, tier, stats, budget });
            }
        }
        let hash = fingerprint(kernel, config.seed, config.samples);
        info!("{} fingerprint {:016x}", kernel.name(), hash);
        fingerprints.push((kernel, hash));
    }

    SweepReport { version: SNAPSHOT_VERSION, seed: config.seed, rows, fingerprints }
}

pub fn save_snapshot(path: &str, report: &SweepReport) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = ZlibEncoder::new(writer, Compression::default());
    bincode::serialize_into(&mut encoder, report)?;
    encoder.finish()?;
    Ok(())
}

pub fn load_snapshot(path: &str) -> Result<SweepReport, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut decoder = ZlibDecoder::new(reader);
    let report: SweepReport = bincode::deserialize_from(&mut decoder)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_per_function() {
        assert_eq!(Function::Div.tiers().len(), 4);
        assert_eq!(Function::Sqrt.tiers()[0], Tier::Exact);
        assert_eq!(Function::Sin.tiers(), &[Tier::Precise, Tier::Fast, Tier::Fastest]);
        assert_eq!(Function::Pow.arity(), 2);
        assert_eq!(Function::ALL.len(), 16);
    }

    #[test]
    fn test_evaluate_dispatch() {
        let one = fix32::ONE as i64;
        assert_eq!(evaluate(KernelKind::Fix32, Function::Div, Tier::Exact, one * 3, one * 2), Some(fix32::ratio(3, 2) as i64));
        assert_eq!(evaluate(KernelKind::Fix32, Function::Sin, Tier::Exact, one, 0), None);
        assert_eq!(evaluate(KernelKind::Fix64, Function::Sqrt, Tier::Exact, fix64::FOUR, 0), Some(fix64::TWO));
        assert_eq!(
            evaluate(KernelKind::Fix64, Function::Atan2, Tier::Fast, fix64::ONE, fix64::TWO),
            Some(fix64::atan2_fast(fix64::ONE, fix64::TWO))
        );
    }

    #[test]
    fn test_measure_rejects_missing_tier() {
        assert!(measure(KernelKind::Fix32, Function::Cos, Tier::Exact, 1, 10).is_none());
    }

    #[test]
    fn test_measure_is_seeded() {
        let a = measure(KernelKind::Fix64, Function::Log, Tier::Fast, 9, 200).unwrap();
        let b = measure(KernelKind::Fix64, Function::Log, Tier::Fast, 9, 200).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.samples, 200);
        assert!(a.mean_abs <= a.max_abs);
    }

    #[test]
    fn test_budget_table_is_monotonic() {
        for kernel in KernelKind::ALL {
            for function in Function::ALL {
                let tiers = function.tiers();
                for pair in tiers.windows(2) {
                    let lower = function.error_budget(kernel, pair[0]);
                    let higher = function.error_budget(kernel, pair[1]);
                    assert!(lower <= higher, "{:?} {:?}: {:?} budget above {:?}", kernel, function, pair[0], pair[1]);
                }
            }
        }
    }

    #[test]
    fn test_fix32_div_small_divisor_within_budget() {
        // A divisor near 0.01 shifts the truncated product left by 7 bits,
        // so one lost unit costs about 2e-3.
        for (tier, a, b) in [(Tier::Fast, 903, 990), (Tier::Fastest, 959, 968)] {
            let got = evaluate(KernelKind::Fix32, Function::Div, tier, a, b).unwrap();
            let expected = a as f64 / b as f64;
            let err = (KernelKind::Fix32.to_f64(got) - expected).abs() / expected.abs().max(1.0);
            let budget = Function::Div.error_budget(KernelKind::Fix32, tier);
            assert!(err > 1e-3 && err <= budget, "{:?} {} / {}: error {:e} budget {:e}", tier, a, b, err, budget);
        }
    }

    #[test]
    fn test_fingerprint_depends_on_seed() {
        let a = fingerprint(KernelKind::Fix32, 5, 20);
        assert_eq!(a, fingerprint(KernelKind::Fix32, 5, 20));
        assert_ne!(a, fingerprint(KernelKind::Fix32, 6, 20));
        assert_ne!(a, fingerprint(KernelKind::Fix64, 5, 20));
    }
}

use fixmath::{FixedError, F32, F64};

fn armor_damage<T>(attack: T, defense: T, armor: T, resist: T, one: T) -> T
where
    T: std::ops::Add<Output = T> + std::ops::Sub<Output = T> + std::ops::Mul<Output = T> + std::ops::Div<Output = T> + Copy,
{
    (attack * attack) / (attack + defense * (armor * (one - resist)))
}

#[test]
fn test_fix64_add_cancels_and_rounds() {
    let sum = F64::from_int(2147483647) + F64::from_int(-2147483647);
    assert_eq!(sum.round_to_int(), 0);
    assert_eq!(sum, F64::ZERO);

    let total = F64::from_int(-2147483647) + F64::from_int64(2147483647) + F64::from_float32(134.8765346);
    assert_eq!(total.to_float32(), 134.87654);
}

#[test]
fn test_fix32_add_wraps() {
    // 32767 - 32768 + 32767 stays in range even though the operands sit at the edge.
    let total = F32::from_int(32767) + F32::from_int(-32768) + F32::from_int(32767);
    assert_eq!(total.round_to_int(), 32766);

    // One more step past the top wraps to the bottom.
    assert_eq!(F32::MAX + F32::from_raw(1), F32::MIN);
}

#[test]
fn test_mul_then_round_both_kernels() {
    let p32 = F32::from_int(32767) * F32::from_float32(0.30);
    assert_eq!((p32.ceil_to_int(), p32.floor_to_int(), p32.round_to_int()), (9830, 9829, 9830));

    let p64 = F64::from_int(2147483647) * F64::from_float32(0.30);
    assert_eq!((p64.ceil_to_int(), p64.floor_to_int(), p64.round_to_int()), (644245120, 644245119, 644245120));
}

#[test]
fn test_damage_formula() {
    // 300 * 300 does not fit in 16.16, so Kernel-32 wraps the numerator.
    let d32 = armor_damage(F32::from_int(300), F32::from_int(10), F32::from_int(5), F32::ZERO, F32::ONE);
    assert_eq!(d32.to_float32(), 69.89714);

    let d64 = armor_damage(F64::from_int(300), F64::from_int(10), F64::from_int(5), F64::ZERO, F64::ONE);
    assert_eq!(d64.to_float64(), 257.1428571427241);
}

#[test]
fn test_compound_growth() {
    let rate32 = F32::ONE + F32::from_float32(0.08);
    assert_eq!(rate32.pow(F32::THREE).to_float32(), 1.2595978);

    let rate64 = F64::ONE + F64::from_float32(0.08);
    assert_eq!(rate64.pow(F64::THREE).to_float32(), 1.259712);
    assert!((rate64.pow_fast(F64::THREE).to_float64() - 1.259712).abs() < 2e-5);
}

#[test]
fn test_operators_never_panic_on_bad_domains() {
    assert_eq!(F32::ONE / F32::ZERO, F32::ZERO);
    assert_eq!(F64::from_int(7) / F64::ZERO, F64::ZERO);
    assert_eq!(F32::MIN / F32::NEG_ONE, F32::ZERO);
    assert_eq!(F64::MIN / F64::NEG_ONE, F64::ZERO);
    assert_eq!(F32::from_int(5) % F32::ZERO, F32::ZERO);
    assert_eq!(-F32::MIN, F32::MIN);
    assert_eq!(F64::from_int(-4).sqrt(), F64::ZERO);
    assert_eq!(F64::ZERO.log(), F64::ZERO);
}

#[test]
fn test_display_renders_full_fraction() {
    assert_eq!(F32::from_float32(-0.25).to_string(), "-0.2500000000000000");
    assert_eq!(F64::from_float64(1.5).to_string(), "1.50000000000000000000000000000000");
    assert_eq!(format!("{:?}", F32::HALF), "F32(0.5 raw 32768)");
}

#[test]
fn test_cross_kernel_conversion() {
    let x = F32::from_float32(-12.375);
    let wide = F64::from(x);
    assert_eq!(wide.to_float64(), -12.375);
    assert_eq!(F32::try_from(wide), Ok(x));

    // Bits below 2^-16 are floored away.
    assert_eq!(F32::try_from(F64::from_raw(1)), Ok(F32::ZERO));
    assert_eq!(F32::try_from(F64::from_raw(-1)), Ok(F32::from_raw(-1)));

    let big = F64::from_int(40_000);
    assert_eq!(F32::try_from(big), Err(FixedError::NarrowingOverflow { raw: big.raw() }));
    assert_eq!(big.to_f32_saturating(), F32::MAX);
}

#[test]
fn test_ordering_and_aggregates() {
    let values = [F64::from_int(3), F64::ratio(-1, 2), F64::from_int(10)];
    assert_eq!(F64::min_of(&values), F64::ratio(-1, 2));
    assert_eq!(F64::max_of(&values), F64::from_int(10));
    assert_eq!(F64::sum_of(&values), F64::ratio(25, 2));
    assert_eq!(F64::avg_of(&values), F64::ratio(25, 6));
    assert_eq!(F64::avg_of(&[]), F64::ZERO);
    assert_eq!(F64::HALF.compare_to(F64::ONE), -1);

    let mut sorted = vec![F32::ONE, F32::NEG_ONE, F32::ZERO];
    sorted.sort();
    assert_eq!(sorted, vec![F32::NEG_ONE, F32::ZERO, F32::ONE]);
}

#[test]
fn test_float_conversion_stays_within_one_unit() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..10_000 {
        let x = (rng.f64() - 0.5) * 60_000.0;
        let back32 = F32::from_float64(x).to_float64();
        assert!((back32 - x).abs() < 1.0 / 65_536.0, "fix32 {} -> {}", x, back32);

        let y = x * 30_000.0;
        let back64 = F64::from_float64(y).to_float64();
        assert!((back64 - y).abs() < 1.0 / 4_294_967_296.0 + y.abs() * f64::EPSILON, "fix64 {} -> {}", y, back64);
    }
}

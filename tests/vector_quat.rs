use fixmath::{F32Quat, F32Vec2, F32Vec3, F64Quat, F64Vec3, F64Vec4, F32, F64};

fn close64(a: F64Vec3, b: F64Vec3, tolerance: f64) -> bool {
    (a - b).length().to_float64() <= tolerance
}

#[test]
fn test_scalar_vector_operators() {
    let v = F32Vec3::from_int(1, 2, 3);
    assert_eq!(F32::TWO * v, F32Vec3::from_int(2, 4, 6));
    assert_eq!(F32::from_int(10) + v, F32Vec3::from_int(11, 12, 13));
    assert_eq!(F32::from_int(12) / F32Vec3::from_int(4, 3, 0), F32Vec3::from_int(3, 4, 0));
    assert_eq!(F32::from_int(7) % F32Vec3::from_int(2, 4, 7), F32Vec3::from_int(1, 3, 0));
    assert_eq!(F32::ONE - v, F32Vec3::from_int(0, -1, -2));
}

#[test]
fn test_geometry_tiers_agree() {
    let v = F64Vec3::from_int(2, -3, 6);
    let precise = v.length();
    assert!((precise.to_float64() - 7.0).abs() < 1e-5);
    assert!((v.length_fast().to_float64() - 7.0).abs() < 1e-3);
    assert!((v.length_fastest().to_float64() - 7.0).abs() < 1e-2);

    for n in [v.normalize(), v.normalize_fast(), v.normalize_fastest()] {
        assert!((n.length().to_float64() - 1.0).abs() < 2e-3, "{}", n);
    }
    assert_eq!(v.distance(F64Vec3::ZERO), precise);
}

#[test]
fn test_cross_products() {
    assert_eq!(F64Vec3::AXIS_X.cross(F64Vec3::AXIS_Y), F64Vec3::AXIS_Z);
    assert_eq!(F64Vec3::AXIS_Y.cross(F64Vec3::AXIS_X), -F64Vec3::AXIS_Z);
    assert_eq!(F32Vec2::AXIS_X.cross(F32Vec2::AXIS_Y), F32::ONE);
    assert_eq!(F64Vec4::AXIS_W.dot(F64Vec4::ONE), F64::ONE);
}

#[test]
fn test_rotation_round_trip() {
    let q = F64Quat::from_yaw_pitch_roll(F64::ratio(1, 3), F64::ratio(2, 5), F64::ratio(-3, 4)).normalize();
    let v = F64Vec3::from_int(4, -1, 2);
    let rotated = q.rotate_vector(v);
    let back = q.inverse_unit().rotate_vector(rotated);
    assert!(close64(back, v, 5e-3), "{} vs {}", back, v);
    assert!((rotated.length() - v.length()).abs() < F64::ratio(1, 100));
}

#[test]
fn test_inverse_undoes_scaled_quaternion() {
    let q = F64Quat::new(F64::ONE, F64::TWO, F64::ZERO, F64::TWO);
    let p = q * q.inverse();
    assert!((p.w - F64::ONE).abs() < F64::ratio(1, 10_000), "{}", p);
    assert!(p.x.abs() < F64::ratio(1, 10_000) && p.y.abs() < F64::ratio(1, 10_000), "{}", p);
}

#[test]
fn test_look_rotation_faces_target() {
    let from = F64Vec3::from_int(1, 0, 1);
    let to = F64Vec3::from_int(1, 0, -4);
    let q = F64Quat::look_at_rotation(from, to, F64Vec3::UP);
    let facing = q.rotate_vector(F64Vec3::FORWARD);
    assert!(close64(facing, F64Vec3::BACK, 1e-2), "{}", facing);
}

#[test]
fn test_slerp_follows_arc() {
    let a = F32Quat::IDENTITY;
    let b = F32Quat::from_axis_angle(F32Vec3::AXIS_Y, F32::HALF_PI);
    let quarter = a.slerp(b, F32::ratio(1, 4));
    let expected = F32Quat::from_axis_angle(F32Vec3::AXIS_Y, F32::HALF_PI.half().half());
    assert!((quarter.y - expected.y).abs() < F32::ratio(1, 200), "{} vs {}", quarter, expected);
    assert!((quarter.length() - F32::ONE).abs() < F32::ratio(1, 200));
}

use glam::{Mat4, Quat, Vec3};
use super::*;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ============================================================================
// Validity
// ============================================================================

#[test]
fn test_default_is_invalid() {
    let s = BoundingSphere::default();
    assert!(!s.valid());
}

#[test]
fn test_zero_radius_is_valid() {
    let s = BoundingSphere::new(Vec3::ZERO, 0.0);
    assert!(s.valid());
}

// ============================================================================
// intersects
// ============================================================================

#[test]
fn test_intersects_overlapping() {
    let a = BoundingSphere::new(Vec3::ZERO, 2.0);
    let b = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 2.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn test_intersects_boundary_is_inclusive() {
    // d = 3, r1 + r2 = 3
    let a = BoundingSphere::new(Vec3::ZERO, 1.0);
    let b = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 2.0);
    assert!(a.intersects(&b));

    // d = 5 (3-4-5), r1 + r2 = 5
    let c = BoundingSphere::new(Vec3::ZERO, 2.0);
    let d = BoundingSphere::new(Vec3::new(3.0, 4.0, 0.0), 3.0);
    assert!(c.intersects(&d));
}

#[test]
fn test_intersects_separated() {
    let a = BoundingSphere::new(Vec3::ZERO, 1.0);
    let b = BoundingSphere::new(Vec3::new(3.5, 0.0, 0.0), 2.0);
    assert!(!a.intersects(&b));
}

#[test]
fn test_invalid_never_intersects() {
    let a = BoundingSphere::new(Vec3::ZERO, 100.0);
    assert!(!a.intersects(&BoundingSphere::INVALID));
    assert!(!BoundingSphere::INVALID.intersects(&a));
}

// ============================================================================
// transformed
// ============================================================================

#[test]
fn test_transformed_translation() {
    let s = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
    let t = s.transformed(&Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
    assert_eq!(t.center, Vec3::new(1.0, 5.0, 0.0));
    assert_eq!(t.radius, 2.0);
}

#[test]
fn test_transformed_rotation_keeps_radius() {
    let s = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
    let m = Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
    let t = s.transformed(&m);
    assert!(approx_eq(t.center.x, 0.0));
    assert!(approx_eq(t.center.y, 1.0));
    assert!(approx_eq(t.radius, 2.0));
}

#[test]
fn test_transformed_non_uniform_scale_uses_largest_axis() {
    let s = BoundingSphere::new(Vec3::ZERO, 1.0);
    let t = s.transformed(&Mat4::from_scale(Vec3::new(1.0, 3.0, 2.0)));
    assert!(approx_eq(t.radius, 3.0));
}

#[test]
fn test_transformed_invalid_stays_invalid() {
    let t = BoundingSphere::INVALID.transformed(&Mat4::from_scale(Vec3::splat(4.0)));
    assert!(!t.valid());
}

#[test]
fn test_transform_composition_matches_sequential() {
    let s = BoundingSphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
    let world = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y);

    let combined = s.transformed(&(view * world));
    let sequential = s.transformed(&world).transformed(&view);

    assert!(combined.center.distance(sequential.center) < 1e-4);
    assert!(approx_eq(combined.radius, sequential.radius));
}

// ============================================================================
// expand_by
// ============================================================================

#[test]
fn test_expand_invalid_takes_other() {
    let mut s = BoundingSphere::INVALID;
    let o = BoundingSphere::new(Vec3::new(1.0, 1.0, 1.0), 2.0);
    s.expand_by(&o);
    assert_eq!(s, o);
}

#[test]
fn test_expand_by_invalid_is_noop() {
    let mut s = BoundingSphere::new(Vec3::ZERO, 1.0);
    s.expand_by(&BoundingSphere::INVALID);
    assert_eq!(s, BoundingSphere::new(Vec3::ZERO, 1.0));
}

#[test]
fn test_expand_contained_is_noop() {
    let mut s = BoundingSphere::new(Vec3::ZERO, 5.0);
    s.expand_by(&BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0));
    assert_eq!(s, BoundingSphere::new(Vec3::ZERO, 5.0));
}

#[test]
fn test_expand_swallowed_takes_other() {
    let mut s = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
    let big = BoundingSphere::new(Vec3::ZERO, 5.0);
    s.expand_by(&big);
    assert_eq!(s, big);
}

#[test]
fn test_expand_disjoint_encloses_both() {
    let mut s = BoundingSphere::new(Vec3::new(-4.0, 0.0, 0.0), 1.0);
    s.expand_by(&BoundingSphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0));
    assert!(approx_eq(s.center.x, 0.0));
    assert!(approx_eq(s.radius, 5.0));
}

use std::f64::consts::{FRAC_PI_2, PI};

use jdrkit_core::{Angle, ParameterError, Point, Transform2D};
use jdrkit_designer::{Path, Pattern, PatternKind, PatternMode, Shape, ShapeError, ShapeGeometry};
use proptest::prelude::*;

fn blade() -> Shape {
    Path::builder(Point::new(1.0, 0.0))
        .line_to(Point::new(3.0, 0.5))
        .line_to(Point::new(3.0, -0.5))
        .close_sub_path()
        .build()
        .unwrap()
        .into()
}

fn assert_matrix_eq(got: &Transform2D<f64>, want: &Transform2D<f64>) {
    for (a, b) in got.to_array().iter().zip(want.to_array().iter()) {
        assert!((a - b).abs() < 1e-12, "{:?} != {:?}", got, want);
    }
}

#[test]
fn test_rotational_quarter_turns() {
    let pattern = Pattern::rotational(blade(), Point::ORIGIN, Angle::radians(FRAC_PI_2), 4).unwrap();
    for i in 1..=4 {
        let theta = i as f64 * FRAC_PI_2;
        let want = Transform2D::new(theta.cos(), theta.sin(), -theta.sin(), theta.cos(), 0.0, 0.0);
        assert_matrix_eq(&pattern.replica_transform(i).unwrap(), &want);
    }
    assert_matrix_eq(&pattern.replica_transform(4).unwrap(), &Transform2D::identity());
}

#[test]
fn test_scaled_doubles_about_origin() {
    let pattern = Pattern::scaled(blade(), Point::ORIGIN, 2.0, 2.0, None, 3).unwrap();
    let t = pattern.replica_transform(1).unwrap();
    assert_eq!(Point::new(3.0, -5.0).transformed(&t), Point::new(6.0, -10.0));
    assert_eq!(Point::new(0.25, 7.0).transformed(&t), Point::new(0.5, 14.0));
}

#[test]
fn test_spiral_radius_grows_per_turn() {
    let anchor = Point::new(2.0, 2.0);
    let adjust = Point::new(3.0, 2.0);
    let pattern = Pattern::spiral(blade(), anchor, adjust, Angle::degrees(360.0), 4.0, 3).unwrap();
    for i in 1..=3 {
        let placed = adjust.transformed(&pattern.replica_transform(i).unwrap());
        let expected = Point::new(anchor.x + 1.0 + 4.0 * i as f64, anchor.y);
        assert!(placed.approx_eq(&expected, 1e-9), "replica {} at {}", i, placed);
    }
}

#[test]
fn test_spiral_without_adjust_rejected() {
    let err = Pattern::new(
        blade(),
        PatternKind::Spiral {
            angle: Angle::degrees(30.0),
            distance: 1.0,
        },
        Point::ORIGIN,
        None,
        3,
    )
    .unwrap_err();
    assert_eq!(err, ShapeError::MissingPoint { role: "pattern adjust" });
}

#[test]
fn test_zero_scale_rejected_at_construction() {
    let err = Pattern::scaled(blade(), Point::ORIGIN, 1.0, 0.0, None, 2).unwrap_err();
    assert_eq!(err, ShapeError::Parameter(ParameterError::ZeroScaleFactor { axis: "y" }));
}

#[test]
fn test_hidden_original_skips_identity_copy() {
    let mut pattern = Pattern::rotational(blade(), Point::ORIGIN, Angle::radians(PI), 1).unwrap();
    pattern.set_show_original(false);
    assert_eq!(pattern.copies(), 1);
    let first = pattern.outline().next().unwrap().unwrap();
    assert!(first.geometry.start().approx_eq(&Point::new(-1.0, 0.0), 1e-12));
}

#[test]
fn test_nested_pattern_composes_inner_first() {
    let inner = Pattern::scaled(blade(), Point::ORIGIN, 2.0, 2.0, None, 1).unwrap();
    let mut outer = Pattern::rotational(inner.into(), Point::ORIGIN, Angle::radians(FRAC_PI_2), 1).unwrap();
    outer.set_mode(PatternMode::Multi);
    assert_eq!(outer.copies(), 4);
    // copy 3: outer replica 1 of inner replica 1, scale then turn
    let p = Point::new(1.0, 0.0).transformed(&outer.copy_transform(3).unwrap());
    assert!(p.approx_eq(&Point::new(0.0, 2.0), 1e-12));
    assert_eq!(outer.pattern_mode(), PatternMode::Multi);
}

#[test]
fn test_geometry_follows_underlying_edits() {
    let mut pattern = Pattern::rotational(blade(), Point::ORIGIN, Angle::radians(PI), 1).unwrap();
    let before = pattern.storage_bbox().unwrap().unwrap();
    let first = pattern.first_control().unwrap().id();
    pattern.point_mut(first).unwrap().pos = Point::new(-10.0, 0.0);
    let after = pattern.storage_bbox().unwrap().unwrap();
    assert!(after.width() > before.width());
    assert_eq!(after.max.x, 10.0);
}

fn anchor() -> impl Strategy<Value = Point> {
    (-50.0..50.0f64, -50.0..50.0f64).prop_map(|(x, y)| Point::new(x, y))
}

fn non_zero_factor() -> impl Strategy<Value = f64> {
    prop_oneof![0.1..4.0f64, -4.0..-0.1f64]
}

proptest! {
    #[test]
    fn prop_rotational_anchor_is_fixed(a in anchor(), degrees in -720.0..720.0f64, replicas in 1..12usize) {
        let pattern = Pattern::rotational(blade(), a, Angle::degrees(degrees), replicas).unwrap();
        for i in 0..=replicas {
            let moved = a.transformed(&pattern.replica_transform(i).unwrap());
            prop_assert!(moved.approx_eq(&a, 1e-9 * (1.0 + a.x.abs() + a.y.abs())));
        }
    }

    #[test]
    fn prop_scaled_anchor_is_fixed(a in anchor(), sx in non_zero_factor(), sy in non_zero_factor(), replicas in 1..8usize) {
        let pattern = Pattern::scaled(blade(), a, sx, sy, None, replicas).unwrap();
        for i in 0..=replicas {
            let moved = a.transformed(&pattern.replica_transform(i).unwrap());
            prop_assert!(moved.approx_eq(&a, 1e-9 * (1.0 + a.x.abs() + a.y.abs()) * (1.0 + replicas as f64 * 4.0)));
        }
    }
}

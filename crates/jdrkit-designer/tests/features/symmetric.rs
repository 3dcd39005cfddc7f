use jdrkit_core::{Line, Point};
use jdrkit_designer::{Geometry, JoinKind, Path, ShapeGeometry, SymmetricPath};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn outline(sym: &SymmetricPath) -> Vec<Geometry> {
    (0..sym.segment_count())
        .map(|i| sym.segment_geometry(i).unwrap())
        .collect()
}

fn assert_continuous(segments: &[Geometry]) {
    for pair in segments.windows(2) {
        assert!(
            pair[0].end().approx_eq(&pair[1].start(), TOLERANCE),
            "{:?} does not meet {:?}",
            pair[0],
            pair[1]
        );
    }
}

fn half_heart() -> Path {
    Path::builder(Point::new(0.0, 0.0))
        .curve_to(Point::new(-2.0, 2.0), Point::new(-4.0, 6.0), Point::new(-2.0, 8.0))
        .line_to(Point::new(-1.0, 7.0))
        .build()
        .unwrap()
}

#[test]
fn test_segment_count() {
    let vertical = Line::new(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
    let mut sym = SymmetricPath::new(half_heart(), vertical).unwrap();
    assert_eq!(sym.segment_count(), 2 * 2 + 1);
    sym.set_closed(Some(JoinKind::Line)).unwrap();
    assert_eq!(sym.segment_count(), 2 * 2 + 2);
    sym.set_anchored(true).unwrap();
    assert_eq!(sym.segment_count(), 2 * 2 + 1);
}

#[test]
fn test_reflection_walks_backwards() {
    let vertical = Line::new(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
    let sym = SymmetricPath::new(half_heart(), vertical).unwrap();
    let segments = outline(&sym);
    // join from (-1,7) to (1,7), then the mirrored line back to (2,8)
    assert_eq!(segments[2], Geometry::Line { from: Point::new(-1.0, 7.0), to: Point::new(1.0, 7.0) });
    assert_eq!(segments[3], Geometry::Line { from: Point::new(1.0, 7.0), to: Point::new(2.0, 8.0) });
    match segments[4] {
        Geometry::Cubic { from, ctrl1, ctrl2, to } => {
            assert_eq!(from, Point::new(2.0, 8.0));
            assert_eq!(ctrl1, Point::new(4.0, 6.0));
            assert_eq!(ctrl2, Point::new(2.0, 2.0));
            assert_eq!(to, Point::new(0.0, 0.0));
        }
        other => panic!("expected mirrored curve, got {:?}", other),
    }
}

#[test]
fn test_closing_returns_to_start() {
    let slanted = Line::new(Point::new(3.0, 0.0), Point::new(4.0, 10.0));
    let mut sym = SymmetricPath::new(half_heart(), slanted).unwrap();
    sym.set_closed(Some(JoinKind::Bezier)).unwrap();
    let segments = outline(&sym);
    assert_continuous(&segments);
    assert!(segments.last().unwrap().end().approx_eq(&Point::new(0.0, 0.0), TOLERANCE));
}

#[test]
fn test_materialised_path_matches_outline() {
    let line = Line::new(Point::new(1.0, -1.0), Point::new(1.0, 1.0));
    let mut sym = SymmetricPath::new(half_heart(), line).unwrap();
    sym.set_join(JoinKind::Bezier).unwrap();
    sym.set_closed(Some(JoinKind::Line)).unwrap();
    let full = sym.to_full_path().unwrap();
    assert!(full.is_closed());
    let geometries = full.geometries().unwrap();
    let expected = outline(&sym);
    assert_eq!(geometries.len(), expected.len());
    for (got, want) in geometries.iter().zip(&expected) {
        for (a, b) in got.points().iter().zip(want.points().iter()) {
            assert!(a.approx_eq(b, TOLERANCE));
        }
    }
    for pair in full.segments().windows(2) {
        assert_eq!(pair[0].end(), pair[1].start());
    }
}

#[derive(Debug, Clone)]
enum Step {
    Line(f64, f64),
    Curve(f64, f64, f64, f64, f64, f64),
}

fn coord() -> impl Strategy<Value = f64> {
    -100.0..100.0f64
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| Step::Line(x, y)),
        (coord(), coord(), coord(), coord(), coord(), coord())
            .prop_map(|(a, b, c, d, e, f)| Step::Curve(a, b, c, d, e, f)),
    ]
}

fn join_kind() -> impl Strategy<Value = JoinKind> {
    prop_oneof![Just(JoinKind::Line), Just(JoinKind::Bezier)]
}

proptest! {
    #[test]
    fn prop_outline_is_a_continuous_loop(
        start in (coord(), coord()),
        steps in prop::collection::vec(step(), 1..8),
        line in ((coord(), coord()), (coord(), coord())),
        anchored in any::<bool>(),
        join in join_kind(),
        closing in join_kind(),
    ) {
        let ((x1, y1), (x2, y2)) = line;
        prop_assume!((x1 - x2).abs() + (y1 - y2).abs() > 1.0);

        let mut builder = Path::builder(Point::new(start.0, start.1));
        for step in &steps {
            builder = match *step {
                Step::Line(x, y) => builder.line_to(Point::new(x, y)),
                Step::Curve(a, b, c, d, e, f) => {
                    builder.curve_to(Point::new(a, b), Point::new(c, d), Point::new(e, f))
                }
            };
        }
        let mut sym = SymmetricPath::new(builder.build().unwrap(), Line::new(Point::new(x1, y1), Point::new(x2, y2))).unwrap();
        if anchored {
            sym.set_anchored(true).unwrap();
        } else {
            sym.set_join(join).unwrap();
        }
        sym.set_closed(Some(closing)).unwrap();

        let segments = outline(&sym);
        prop_assert_eq!(segments.len(), 2 * steps.len() + usize::from(!anchored) + 1);
        let scale = 1.0 + segments.iter().flat_map(|g| g.points()).map(|p| p.x.abs().max(p.y.abs())).fold(0.0, f64::max);
        for pair in segments.windows(2) {
            prop_assert!(pair[0].end().approx_eq(&pair[1].start(), TOLERANCE * scale));
        }
        let first = segments[0].start();
        let last = segments[segments.len() - 1].end();
        prop_assert!(last.approx_eq(&first, TOLERANCE * scale));
    }
}

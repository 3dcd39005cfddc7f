use jdrkit_core::{Angle, Line, Point};
use jdrkit_designer::{
    JoinKind, Marker, MarkerKind, Path, Pattern, PointKind, Shape, ShapeGeometry, SymmetricPath,
};

fn hook() -> Path {
    Path::builder(Point::new(0.0, 0.0))
        .line_to(Point::new(0.0, 5.0))
        .curve_to(Point::new(1.0, 7.0), Point::new(3.0, 7.0), Point::new(4.0, 5.0))
        .build()
        .unwrap()
}

#[test]
fn test_every_point_visited_once() {
    let path = hook();
    let ids: Vec<_> = path.point_iter().map(|p| p.point.id()).collect();
    assert_eq!(ids.len(), path.points().len());
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(path.point_iter().next().unwrap().point.id(), path.first_control().unwrap());
}

#[test]
fn test_exhausted_iterator_keeps_returning_none() {
    let path = hook();
    let mut iter = path.point_iter();
    assert_eq!(iter.by_ref().count(), 5);
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn test_symmetric_extras_follow_path_points() {
    let mut sym = SymmetricPath::new(hook(), Line::new(Point::new(6.0, 0.0), Point::new(6.0, 10.0))).unwrap();
    sym.set_join(JoinKind::Bezier).unwrap();
    let points: Vec<_> = sym.point_iter().collect();
    assert_eq!(points.len(), 5 + 3);
    let kinds: Vec<_> = points[5..].iter().map(|p| p.point.kind).collect();
    assert_eq!(
        kinds,
        vec![PointKind::Regular, PointKind::SymmetryLine, PointKind::SymmetryLine]
    );
    assert!(points[5..].iter().all(|p| p.segment_index.is_none()));
    assert_eq!(points[7].point_index, 7);
}

#[test]
fn test_set_on_later_segment_start() {
    let path = hook();
    let joint = path.segment(1).unwrap().start();
    let mut iter = path.point_iter();
    iter.set(1, Some(1), joint).unwrap();
    let next = iter.next().unwrap();
    assert_eq!(next.point.pos, Point::new(1.0, 7.0));
    assert_eq!(next.point_index, 2);
    assert_eq!(next.segment_index, Some(1));

    let origin = path.first_control().unwrap();
    assert!(path.point_iter().set(0, Some(1), origin).is_err());
}

#[test]
fn test_set_on_pattern_adjust() {
    let pattern = Pattern::scaled(
        Shape::Path(hook()),
        Point::ORIGIN,
        1.5,
        1.5,
        Some(Point::new(10.0, 0.0)),
        2,
    )
    .unwrap();
    let adjust = pattern.adjust().unwrap().id();
    let mut iter = pattern.point_iter();
    iter.set(5, None, adjust).unwrap();
    let anchor = iter.next().unwrap();
    assert_eq!(anchor.point.kind, PointKind::PatternAnchor);
    assert_eq!(anchor.point_index, 6);
    assert!(iter.next().is_none());
}

#[test]
fn test_outline_covers_every_copy() {
    let mut path = hook();
    path.style.stroke.end_marker = Some(Marker::new(MarkerKind::Bar, 3.0).unwrap());
    let pattern = Pattern::rotational(path.into(), Point::ORIGIN, Angle::degrees(90.0), 3).unwrap();
    let outline: Vec<_> = pattern.outline().collect::<Result<_, _>>().unwrap();
    assert_eq!(outline.len(), 4 * 2);
    let ends: Vec<_> = outline.iter().filter(|s| s.end_marker.is_some()).collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].copy, 3);
    let last = outline.last().unwrap().geometry.end();
    // (4, 5) turned by 270 degrees
    assert!(last.approx_eq(&Point::new(5.0, -4.0), 1e-9));
}

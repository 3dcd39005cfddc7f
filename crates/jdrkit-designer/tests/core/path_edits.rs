use std::sync::{Arc, Mutex};

use jdrkit_core::{BoundingBox, Point};
use jdrkit_designer::{Geometry, Path, PathError, PathEventKind, PathSegment, ShapeGeometry};

fn wave() -> Path {
    Path::builder(Point::new(0.0, 0.0))
        .curve_to(Point::new(0.0, 4.0), Point::new(4.0, 4.0), Point::new(4.0, 0.0))
        .line_to(Point::new(8.0, 0.0))
        .build()
        .unwrap()
}

#[test]
fn test_split_inserts_tail_after_original() {
    let mut path = wave();
    let line = path.segment(1).unwrap().id();
    path.split_segment(0).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path.position_of(line), Some(2));
    assert_eq!(path.segment(0).unwrap().end(), path.segment(1).unwrap().start());
    let mid = path.position(path.segment(0).unwrap().end()).unwrap();
    assert!(mid.approx_eq(&Point::new(2.0, 3.0), 1e-12));
    match path.geometry(1).unwrap() {
        Geometry::Cubic { to, .. } => assert_eq!(to, Point::new(4.0, 0.0)),
        other => panic!("expected a cubic, got {:?}", other),
    }
}

#[test]
fn test_split_line_and_out_of_range() {
    let mut path = wave();
    path.split_segment(1).unwrap();
    assert_eq!(path.position(path.segment(1).unwrap().end()).unwrap(), Point::new(6.0, 0.0));
    assert_eq!(
        path.split_segment(9),
        Err(PathError::IndexOutOfBounds { index: 9, len: 3 })
    );
}

#[test]
fn test_subscribers_get_every_structural_event() {
    let mut path = wave();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = path.subscribe(move |event| sink.lock().unwrap().push((event.kind, event.index)));
    assert_eq!(path.listener_count(), 1);

    let a = path.add_point(Point::new(9.0, 9.0));
    let end = path.last_control().unwrap();
    path.add(PathSegment::line(end, a)).unwrap();
    path.remove(0).unwrap();
    path.close().unwrap();
    assert!(path.unsubscribe(id));
    assert!(!path.unsubscribe(id));
    assert_eq!(path.listener_count(), 0);
    path.open().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (PathEventKind::SegmentAdded, Some(2)),
            (PathEventKind::SegmentRemoved, Some(0)),
            (PathEventKind::PathClosed, None),
        ]
    );
}

#[test]
fn test_affine_operations_move_shared_points_once() {
    let mut path = wave();
    path.translate(1.0, 1.0);
    assert_eq!(path.storage_bbox().unwrap().unwrap(), BoundingBox::new(1.0, 1.0, 9.0, 5.0));

    path.scale(0.5, 0.5, Point::new(1.0, 1.0)).unwrap();
    assert_eq!(path.storage_bbox().unwrap().unwrap(), BoundingBox::new(1.0, 1.0, 5.0, 3.0));
    assert!(path.scale(1.0, 0.0, Point::ORIGIN).is_err());
}

#[test]
fn test_bp_and_component_boxes() {
    use jdrkit_core::Unit;
    use jdrkit_designer::DrawContext;

    let path = wave();
    let ctx = DrawContext {
        storage_unit: Unit::Pc,
        pixels_per_bp: 2.0,
        magnification: 1.5,
    };
    let bp = path.bp_bbox(&ctx).unwrap().unwrap();
    let factor = Unit::Pc.to_bp(1.0);
    assert!((bp.max.x - 8.0 * factor).abs() < 1e-9);
    let component = path.component_bbox(&ctx).unwrap().unwrap();
    assert!((component.max.y - 4.0 * factor * 3.0).abs() < 1e-9);
}

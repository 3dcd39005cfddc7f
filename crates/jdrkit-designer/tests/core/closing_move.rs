use jdrkit_core::Point;
use jdrkit_designer::{ClosingMoveError, Path, PathError, PathSegment};
use proptest::prelude::*;

/// Line(0,0 -> 10,0), Line(10,0 -> 10,10), ClosingMove back to (0,0)
fn open_triangle() -> Path {
    let mut path = Path::new();
    let a = path.add_point(Point::new(0.0, 0.0));
    let b = path.add_point(Point::new(10.0, 0.0));
    let c = path.add_point(Point::new(10.0, 10.0));
    path.add(PathSegment::line(a, b)).unwrap();
    path.add(PathSegment::line(b, c)).unwrap();
    path.add(PathSegment::closing_move(c, a)).unwrap();
    path
}

fn sub_path_start_of(path: &Path, index: usize) -> Option<Point> {
    let closing = path.segment(index).unwrap().closing().unwrap();
    closing.sub_path_start().map(|id| path.position(id).unwrap())
}

#[test]
fn test_sub_path_start_is_first_vertex() {
    let path = open_triangle();
    assert_eq!(sub_path_start_of(&path, 2), Some(Point::new(0.0, 0.0)));
}

#[test]
fn test_removing_first_line_falls_back_to_new_first_segment() {
    let mut path = open_triangle();
    path.remove(0).unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(sub_path_start_of(&path, 1), Some(Point::new(10.0, 0.0)));
    let closing = path.segment(1).unwrap().closing().unwrap();
    assert_eq!(closing.index(), Some(1));
}

#[test]
fn test_closing_move_at_index_zero_fails() {
    let mut path = open_triangle();
    path.remove(0).unwrap();
    let err = path.remove(0).unwrap_err();
    assert_eq!(
        err,
        PathError::ClosingMove(ClosingMoveError::NoPrecedingSegment { index: 0 })
    );
    // the removal stands, the closing move is left unresolved
    assert_eq!(path.len(), 1);
    assert_eq!(sub_path_start_of(&path, 0), None);
}

#[test]
fn test_gap_directly_before_closing_move_fails() {
    let mut path = open_triangle();
    let p = path.add_point(Point::new(3.0, 3.0));
    let q = path.add_point(Point::new(4.0, 4.0));
    let err = path.insert(2, PathSegment::move_to(p, q)).unwrap_err();
    assert_eq!(
        err,
        PathError::ClosingMove(ClosingMoveError::EmptySubPath { index: 3 })
    );

    // replacing the gap with a line repairs the closing move
    path.replace(2, PathSegment::line(p, q)).unwrap();
    assert_eq!(sub_path_start_of(&path, 3), Some(Point::new(0.0, 0.0)));
}

#[test]
fn test_gap_starts_new_sub_path() {
    let mut path = open_triangle();
    let p = path.add_point(Point::new(20.0, 0.0));
    path.insert(1, PathSegment::move_to(path.segment(0).unwrap().end(), p)).unwrap();
    let q = path.add_point(Point::new(25.0, 5.0));
    path.insert(2, PathSegment::line(p, q)).unwrap();
    // segments: line, move, line, line, closing
    assert_eq!(sub_path_start_of(&path, 4), Some(Point::new(20.0, 0.0)));
}

#[test]
fn test_reversed_closing_move_reattaches_when_placed() {
    let mut path = open_triangle();
    let reversed = path.segment(2).unwrap().reverse();
    assert!(!reversed.closing().unwrap().is_attached());
    path.replace(2, reversed).unwrap();
    let closing = path.segment(2).unwrap().closing().unwrap();
    assert!(closing.is_resolved());
    assert_eq!(closing.index(), Some(2));
    assert_eq!(sub_path_start_of(&path, 2), Some(Point::new(0.0, 0.0)));
}

#[test]
fn test_reversed_closing_move_resolves_after_remove_then_add() {
    let mut path = open_triangle();
    let reversed = path.remove(2).unwrap().reverse();
    path.add(reversed).unwrap();
    assert!(path.segment(2).unwrap().closing().unwrap().is_resolved());
    assert_eq!(sub_path_start_of(&path, 2), Some(Point::new(0.0, 0.0)));
}

#[test]
fn test_second_closing_move_tracks_its_own_sub_path() {
    let path = Path::builder(Point::new(0.0, 0.0))
        .line_to(Point::new(1.0, 0.0))
        .close_sub_path_to(Point::new(5.0, 5.0))
        .line_to(Point::new(6.0, 5.0))
        .close_sub_path()
        .build()
        .unwrap();
    assert_eq!(sub_path_start_of(&path, 1), Some(Point::new(0.0, 0.0)));
    // the first closing move is a break, so the second sub-path starts after it
    assert_eq!(sub_path_start_of(&path, 3), Some(Point::new(5.0, 5.0)));
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Move,
    Line,
    Close,
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Insert(usize, Kind),
    Remove(usize),
    Replace(usize, Kind),
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Move), Just(Kind::Line), Just(Kind::Close)]
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..16usize, kind()).prop_map(|(i, k)| Edit::Insert(i, k)),
        (0..16usize).prop_map(Edit::Remove),
        (0..16usize, kind()).prop_map(|(i, k)| Edit::Replace(i, k)),
    ]
}

fn make_segment(path: &mut Path, kind: Kind, seed: usize) -> PathSegment {
    let s = seed as f64;
    let a = path.add_point(Point::new(s, -s));
    let b = path.add_point(Point::new(s + 1.0, s));
    match kind {
        Kind::Move => PathSegment::move_to(a, b),
        Kind::Line => PathSegment::line(a, b),
        Kind::Close => PathSegment::closing_move(a, b),
    }
}

fn assert_closing_moves_consistent(path: &Path) {
    for (i, segment) in path.segments().iter().enumerate() {
        if let Some(closing) = segment.closing() {
            assert_eq!(closing.index(), Some(i));
            assert_eq!(closing.sub_path_start(), path.resolve_sub_path_start(i).ok());
        }
    }
}

proptest! {
    #[test]
    fn prop_closing_moves_follow_every_edit(edits in prop::collection::vec(edit(), 1..40)) {
        let mut path = open_triangle();
        for (step, edit) in edits.into_iter().enumerate() {
            let len = path.len();
            let result = match edit {
                Edit::Insert(i, k) => {
                    let segment = make_segment(&mut path, k, step);
                    path.insert(i % (len + 1), segment)
                }
                Edit::Remove(i) if len > 0 => path.remove(i % len).map(|_| ()),
                Edit::Replace(i, k) if len > 0 => {
                    let segment = make_segment(&mut path, k, step);
                    path.replace(i % len, segment).map(|_| ())
                }
                _ => Ok(()),
            };
            if let Err(err) = result {
                prop_assert!(matches!(err, PathError::ClosingMove(_)), "unexpected error {:?}", err);
            }
            assert_closing_moves_consistent(&path);
        }
    }
}

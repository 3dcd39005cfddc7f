use jdrkit_core::{Angle, Line, Point, Unit};
use jdrkit_designer::{
    emit_eps, emit_pgf, emit_svg, DrawContext, JoinKind, Marker, MarkerKind, OutlineSink, Path, PathStyle, Pattern,
    PatternMode, Shape, SymmetricPath,
};

#[derive(Default)]
struct Counter {
    paths: usize,
    moves: usize,
    lines: usize,
    curves: usize,
    closes: usize,
}

impl OutlineSink for Counter {
    fn begin(&mut self, _style: &PathStyle) {
        self.paths += 1;
    }
    fn move_to(&mut self, _p: Point) {
        self.moves += 1;
    }
    fn line_to(&mut self, _p: Point) {
        self.lines += 1;
    }
    fn curve_to(&mut self, _c1: Point, _c2: Point, _to: Point) {
        self.curves += 1;
    }
    fn close_path(&mut self) {
        self.closes += 1;
    }
    fn end(&mut self) {}
}

fn leaf() -> SymmetricPath {
    let half = Path::builder(Point::new(0.0, 0.0))
        .curve_to(Point::new(-3.0, 2.0), Point::new(-3.0, 6.0), Point::new(0.0, 10.0))
        .build()
        .unwrap();
    let mut sym = SymmetricPath::new(half, Line::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0))).unwrap();
    sym.set_anchored(true).unwrap();
    sym.set_closed(Some(JoinKind::Line)).unwrap();
    sym
}

#[test]
fn test_symmetric_emits_one_closed_path() {
    let shape = Shape::Symmetric(leaf());
    let mut counter = Counter::default();
    shape.emit(&DrawContext::default(), &mut counter).unwrap();
    assert_eq!(counter.paths, 1);
    assert_eq!(counter.moves, 1);
    assert_eq!(counter.curves, 2);
    assert_eq!(counter.lines, 1);
    assert_eq!(counter.closes, 1);
}

#[test]
fn test_markers_are_filled_after_the_outline() {
    let mut path = Path::builder(Point::new(0.0, 0.0)).line_to(Point::new(10.0, 0.0)).build().unwrap();
    path.style.stroke.start_marker = Some(Marker::new(MarkerKind::Dot, 4.0).unwrap());
    path.style.stroke.end_marker = Some(Marker::new(MarkerKind::Arrow, 4.0).unwrap());
    let shapes = vec![Shape::Path(path)];
    let svg = emit_svg(&shapes, &DrawContext::default(), 3, false).unwrap();
    assert_eq!(svg.matches("<path ").count(), 3);
    // the marker fill uses the line paint and no outline
    assert_eq!(svg.matches("fill=\"#000000\" stroke=\"none\"").count(), 2);
}

#[test]
fn test_multi_pattern_in_every_format() {
    let mut pattern = Pattern::rotational(Shape::Symmetric(leaf()), Point::ORIGIN, Angle::degrees(72.0), 4).unwrap();
    pattern.set_mode(PatternMode::Multi);
    let shapes = vec![Shape::Pattern(pattern)];
    let ctx = DrawContext::new(Unit::Mm);

    let svg = emit_svg(&shapes, &ctx, 4, true).unwrap();
    assert_eq!(svg.matches("<path ").count(), 5);

    let eps = emit_eps(&shapes, &ctx, 4).unwrap();
    assert_eq!(eps.matches(" stroke\n").count(), 5);
    assert_eq!(eps.matches("closepath").count(), 5);

    let pgf = emit_pgf(&shapes, &ctx, 4).unwrap();
    assert_eq!(pgf.matches("\\begin{pgfscope}").count(), 5);
    assert_eq!(pgf.matches("\\pgfpathclose").count(), 5);
}

#[test]
fn test_single_pattern_is_one_compound_path() {
    let pattern = Pattern::rotational(Shape::Symmetric(leaf()), Point::ORIGIN, Angle::degrees(120.0), 2).unwrap();
    let shape = Shape::Pattern(pattern);
    let mut counter = Counter::default();
    shape.emit(&DrawContext::default(), &mut counter).unwrap();
    assert_eq!(counter.paths, 1);
    assert_eq!(counter.moves, 3);
    assert_eq!(counter.closes, 3);
}

#[test]
fn test_storage_unit_scales_output() {
    let path = Path::builder(Point::new(0.0, 0.0)).line_to(Point::new(1.0, 0.0)).build().unwrap();
    let shapes = vec![Shape::Path(path)];
    let svg = emit_svg(&shapes, &DrawContext::new(Unit::In), 2, false).unwrap();
    assert!(svg.contains("d=\"M 0 0 L 72 0\""));
}

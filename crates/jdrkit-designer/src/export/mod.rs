//! # Export Module
//!
//! Serialises shape outlines into vector formats.
//!
//! Supports:
//! - SVG path elements
//! - Encapsulated PostScript
//! - PGF picture code for LaTeX
//!
//! Every format implements [`OutlineSink`]; [`emit_shape`] walks a shape's
//! outline in bp and feeds the sink, one path per copy in multi mode and a
//! single compound path otherwise, followed by the filled markers.

pub mod eps;
pub mod pgf;
pub mod svg;

pub use eps::{emit_eps, EpsWriter};
pub use pgf::{emit_pgf, PgfWriter};
pub use svg::{emit_svg, SvgWriter};

use std::f64::consts::PI;

use tracing::{debug, warn};

use jdrkit_core::{BoundingBox, Point, EPSILON};

use crate::context::DrawContext;
use crate::error::ShapeError;
use crate::iter::OutlineIter;
use crate::pattern::PatternMode;
use crate::segment::Geometry;
use crate::shape::{Shape, ShapeGeometry};
use crate::stroke::PathStyle;

/// Receiver of path construction commands, coordinates in bp
pub trait OutlineSink {
    /// Start a path painted with `style`
    fn begin(&mut self, style: &PathStyle);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point);
    fn close_path(&mut self);
    /// Paint the path started by the last `begin`
    fn end(&mut self);
}

/// Fixed-point rendering with trailing zeros removed
pub fn format_number(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub fn emit_shape(shape: &dyn ShapeGeometry, ctx: &DrawContext, sink: &mut dyn OutlineSink) -> Result<(), ShapeError> {
    let style = shape.style();
    let closed = shape.is_closed();
    let multi = shape.pattern_mode() == PatternMode::Multi;
    let mut open = false;
    let mut current_copy = None;
    let mut markers: Vec<Vec<Point>> = Vec::new();

    for item in OutlineIter::new(shape) {
        let seg = item?;
        let g = seg.geometry.map(|p| ctx.point_to_bp(p));

        if current_copy != Some(seg.copy) {
            if current_copy.is_some() {
                if closed {
                    sink.close_path();
                }
                if multi {
                    sink.end();
                    open = false;
                }
            }
            if !open {
                sink.begin(style);
                open = true;
            }
            sink.move_to(g.start());
            current_copy = Some(seg.copy);
        }

        match g {
            Geometry::Move { to, .. } => sink.move_to(to),
            Geometry::Line { to, .. } => sink.line_to(to),
            Geometry::Cubic { ctrl1, ctrl2, to, .. } => sink.curve_to(ctrl1, ctrl2, to),
            Geometry::Close {
                sub_path_start, to, ..
            } => match sub_path_start {
                Some(start) => {
                    sink.close_path();
                    if !to.approx_eq(&start, EPSILON) {
                        sink.move_to(to);
                    }
                }
                None => {
                    warn!("Unresolved closing move at segment {}; emitted as a move", seg.index);
                    sink.move_to(to);
                }
            },
        }

        if let Some(marker) = seg.start_marker {
            markers.push(marker.outline(g.start(), g.start_angle() + PI));
        }
        if let Some(marker) = seg.end_marker {
            markers.push(marker.outline(g.end(), g.end_angle()));
        }
    }

    if open {
        if closed {
            sink.close_path();
        }
        sink.end();
    }

    if !markers.is_empty() {
        debug!("Emitting {} markers", markers.len());
        let marker_style = style.marker_style();
        for outline in markers {
            let Some((first, rest)) = outline.split_first() else {
                continue;
            };
            sink.begin(&marker_style);
            sink.move_to(*first);
            for p in rest {
                sink.line_to(*p);
            }
            sink.close_path();
            sink.end();
        }
    }
    Ok(())
}

impl Shape {
    /// Feed this shape's outline and markers to `sink`
    pub fn emit(&self, ctx: &DrawContext, sink: &mut dyn OutlineSink) -> Result<(), ShapeError> {
        emit_shape(self, ctx, sink)
    }
}

/// Union of the shapes' bounds in bp, grown by half the widest stroke
pub(crate) fn drawing_bbox<'a>(
    shapes: impl IntoIterator<Item = &'a Shape>,
    ctx: &DrawContext,
) -> Result<Option<BoundingBox>, ShapeError> {
    let mut bbox: Option<BoundingBox> = None;
    for shape in shapes {
        let Some(b) = shape.bp_bbox(ctx)? else {
            continue;
        };
        let half = shape.style().stroke.width.to_bp() / 2.0;
        let grown = BoundingBox::new(b.min.x - half, b.min.y - half, b.max.x + half, b.max.y + half);
        match bbox.as_mut() {
            Some(total) => total.merge(&grown),
            None => bbox = Some(grown),
        }
    }
    Ok(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use crate::pattern::Pattern;
    use jdrkit_core::{Angle, Unit};

    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl OutlineSink for Recorder {
        fn begin(&mut self, _style: &PathStyle) {
            self.ops.push("begin".into());
        }
        fn move_to(&mut self, p: Point) {
            self.ops.push(format!("M {} {}", p.x, p.y));
        }
        fn line_to(&mut self, p: Point) {
            self.ops.push(format!("L {} {}", p.x, p.y));
        }
        fn curve_to(&mut self, _c1: Point, _c2: Point, to: Point) {
            self.ops.push(format!("C {} {}", to.x, to.y));
        }
        fn close_path(&mut self) {
            self.ops.push("Z".into());
        }
        fn end(&mut self) {
            self.ops.push("end".into());
        }
    }

    fn corner() -> Path {
        Path::builder(Point::new(0.0, 0.0))
            .line_to(Point::new(1.0, 0.0))
            .line_to(Point::new(1.0, 1.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.5, 4), "1.5");
        assert_eq!(format_number(2.0, 4), "2");
        assert_eq!(format_number(-0.00001, 4), "0");
        assert_eq!(format_number(1.23456, 2), "1.23");
        assert_eq!(format_number(10.0, 0), "10");
    }

    #[test]
    fn test_emit_converts_to_bp() {
        let shape = Shape::Path(corner());
        let ctx = DrawContext::new(Unit::In);
        let mut rec = Recorder::default();
        shape.emit(&ctx, &mut rec).unwrap();
        assert_eq!(rec.ops, vec!["begin", "M 0 0", "L 72 0", "L 72 72", "end"]);
    }

    #[test]
    fn test_pattern_modes() {
        let mut pattern =
            Pattern::rotational(Shape::Path(corner()), Point::ORIGIN, Angle::degrees(180.0), 1).unwrap();
        let ctx = DrawContext::default();

        let mut single = Recorder::default();
        emit_shape(&pattern, &ctx, &mut single).unwrap();
        assert_eq!(single.ops.iter().filter(|op| *op == "begin").count(), 1);
        assert_eq!(single.ops.iter().filter(|op| op.starts_with('M')).count(), 2);

        pattern.set_mode(PatternMode::Multi);
        let mut multi = Recorder::default();
        emit_shape(&pattern, &ctx, &mut multi).unwrap();
        assert_eq!(multi.ops.iter().filter(|op| *op == "begin").count(), 2);
        assert_eq!(multi.ops.iter().filter(|op| *op == "end").count(), 2);
    }

    #[test]
    fn test_drawing_bbox_includes_stroke() {
        let shapes = vec![Shape::Path(corner())];
        let bbox = drawing_bbox(&shapes, &DrawContext::default()).unwrap().unwrap();
        assert_eq!(bbox, BoundingBox::new(-0.5, -0.5, 1.5, 1.5));
    }
}

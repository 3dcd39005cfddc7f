use lyon::geom::euclid::Angle as EAngle;
use lyon::geom::vector;

use jdrkit_core::{BoundingBox, ParameterError, Point, Transform2D};

use crate::context::DrawContext;
use crate::error::ShapeError;
use crate::iter::{OutlineIter, PointIter};
use crate::path::Path;
use crate::pattern::{Pattern, PatternMode};
use crate::point::{ControlPoint, PointId};
use crate::segment::Geometry;
use crate::stroke::PathStyle;
use crate::symmetric::SymmetricPath;

/// Behaviour shared by plain paths and compound shapes.
///
/// A compound shape exposes its innermost path through [`base_path`], the
/// points it adds on top of that path through [`extra_points`], and its
/// outline as `copies() * segment_count()` segments, copy `c` being
/// `segment_geometry(i)` under `copy_transform(c)`.
///
/// [`base_path`]: ShapeGeometry::base_path
/// [`extra_points`]: ShapeGeometry::extra_points
pub trait ShapeGeometry {
    fn base_path(&self) -> &Path;
    fn base_path_mut(&mut self) -> &mut Path;

    /// Points owned outside the base path, in iteration order
    fn extra_points(&self) -> Vec<&ControlPoint>;
    fn extra_points_mut(&mut self) -> Vec<&mut ControlPoint>;

    /// Outline segments in one copy
    fn segment_count(&self) -> usize;
    fn segment_geometry(&self, index: usize) -> Result<Geometry, ShapeError>;

    fn copies(&self) -> usize {
        1
    }

    fn copy_transform(&self, _copy: usize) -> Result<Transform2D<f64>, ShapeError> {
        Ok(Transform2D::identity())
    }

    fn pattern_mode(&self) -> PatternMode {
        PatternMode::Single
    }

    /// Whether the outline of each copy ends with a close
    fn is_closed(&self) -> bool;

    /// Apply `t` to every owned point exactly once
    fn transform(&mut self, t: &Transform2D<f64>);

    fn style(&self) -> &PathStyle {
        &self.base_path().style
    }

    fn first_control(&self) -> Option<&ControlPoint> {
        let path = self.base_path();
        path.first_control()
            .and_then(|id| path.find_point(id))
            .or_else(|| self.extra_points().first().copied())
    }

    fn last_control(&self) -> Option<&ControlPoint> {
        let path = self.base_path();
        self.extra_points()
            .last()
            .copied()
            .or_else(|| path.last_control().and_then(|id| path.find_point(id)))
    }

    fn find_point(&self, id: PointId) -> Option<&ControlPoint> {
        self.base_path()
            .find_point(id)
            .or_else(|| self.extra_points().into_iter().find(|p| p.id() == id))
    }

    fn point_mut(&mut self, id: PointId) -> Option<&mut ControlPoint> {
        if self.base_path().find_point(id).is_some() {
            return self.base_path_mut().point_mut(id).ok();
        }
        self.extra_points_mut().into_iter().find(|p| p.id() == id)
    }

    /// Bounds of every copy's control polygons, in storage units
    fn storage_bbox(&self) -> Result<Option<BoundingBox>, ShapeError> {
        let mut bbox: Option<BoundingBox> = None;
        for copy in 0..self.copies() {
            let t = self.copy_transform(copy)?;
            for index in 0..self.segment_count() {
                let seg_box = self.segment_geometry(index)?.transformed(&t).bbox();
                match bbox.as_mut() {
                    Some(b) => b.merge(&seg_box),
                    None => bbox = Some(seg_box),
                }
            }
        }
        Ok(bbox)
    }

    fn bp_bbox(&self, ctx: &DrawContext) -> Result<Option<BoundingBox>, ShapeError> {
        Ok(self.storage_bbox()?.map(|b| ctx.bbox_to_bp(&b)))
    }

    fn component_bbox(&self, ctx: &DrawContext) -> Result<Option<BoundingBox>, ShapeError> {
        Ok(self.storage_bbox()?.map(|b| ctx.bbox_to_component(&b)))
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(&Transform2D::translation(dx, dy));
    }

    /// Rotate by `angle` radians about `centre`
    fn rotate(&mut self, angle: f64, centre: Point) {
        let t = Transform2D::translation(-centre.x, -centre.y)
            .then_rotate(EAngle::radians(angle))
            .then_translate(vector(centre.x, centre.y));
        self.transform(&t);
    }

    fn scale(&mut self, sx: f64, sy: f64, centre: Point) -> Result<(), ParameterError> {
        if sx == 0.0 {
            return Err(ParameterError::ZeroScaleFactor { axis: "x" });
        }
        if sy == 0.0 {
            return Err(ParameterError::ZeroScaleFactor { axis: "y" });
        }
        let t = Transform2D::translation(-centre.x, -centre.y)
            .then_scale(sx, sy)
            .then_translate(vector(centre.x, centre.y));
        self.transform(&t);
        Ok(())
    }

    fn shear(&mut self, shx: f64, shy: f64, centre: Point) {
        let shear = Transform2D::new(1.0, shy, shx, 1.0, 0.0, 0.0);
        let t = Transform2D::translation(-centre.x, -centre.y)
            .then(&shear)
            .then_translate(vector(centre.x, centre.y));
        self.transform(&t);
    }

    fn point_iter(&self) -> PointIter<'_>
    where
        Self: Sized,
    {
        PointIter::new(self)
    }

    fn outline(&self) -> OutlineIter<'_>
    where
        Self: Sized,
    {
        OutlineIter::new(self)
    }
}

impl ShapeGeometry for Path {
    fn base_path(&self) -> &Path {
        self
    }

    fn base_path_mut(&mut self) -> &mut Path {
        self
    }

    fn extra_points(&self) -> Vec<&ControlPoint> {
        Vec::new()
    }

    fn extra_points_mut(&mut self) -> Vec<&mut ControlPoint> {
        Vec::new()
    }

    fn segment_count(&self) -> usize {
        self.len()
    }

    fn segment_geometry(&self, index: usize) -> Result<Geometry, ShapeError> {
        Ok(self.geometry(index)?)
    }

    fn is_closed(&self) -> bool {
        Path::is_closed(self)
    }

    fn transform(&mut self, t: &Transform2D<f64>) {
        Path::transform(self, t);
    }
}

/// Any drawable shape
#[derive(Debug)]
pub enum Shape {
    Path(Path),
    Symmetric(SymmetricPath),
    Pattern(Pattern),
}

impl Shape {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Shape::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut Path> {
        match self {
            Shape::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_symmetric(&self) -> Option<&SymmetricPath> {
        match self {
            Shape::Symmetric(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Shape::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Path(_) => "path",
            Shape::Symmetric(_) => "symmetric",
            Shape::Pattern(p) => p.kind().name(),
        }
    }
}

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Shape::Path(path)
    }
}

impl From<SymmetricPath> for Shape {
    fn from(shape: SymmetricPath) -> Self {
        Shape::Symmetric(shape)
    }
}

impl From<Pattern> for Shape {
    fn from(shape: Pattern) -> Self {
        Shape::Pattern(shape)
    }
}

impl ShapeGeometry for Shape {
    fn base_path(&self) -> &Path {
        match self {
            Shape::Path(s) => s.base_path(),
            Shape::Symmetric(s) => s.base_path(),
            Shape::Pattern(s) => s.base_path(),
        }
    }

    fn base_path_mut(&mut self) -> &mut Path {
        match self {
            Shape::Path(s) => s.base_path_mut(),
            Shape::Symmetric(s) => s.base_path_mut(),
            Shape::Pattern(s) => s.base_path_mut(),
        }
    }

    fn extra_points(&self) -> Vec<&ControlPoint> {
        match self {
            Shape::Path(s) => s.extra_points(),
            Shape::Symmetric(s) => s.extra_points(),
            Shape::Pattern(s) => s.extra_points(),
        }
    }

    fn extra_points_mut(&mut self) -> Vec<&mut ControlPoint> {
        match self {
            Shape::Path(s) => s.extra_points_mut(),
            Shape::Symmetric(s) => s.extra_points_mut(),
            Shape::Pattern(s) => s.extra_points_mut(),
        }
    }

    fn segment_count(&self) -> usize {
        match self {
            Shape::Path(s) => s.segment_count(),
            Shape::Symmetric(s) => s.segment_count(),
            Shape::Pattern(s) => s.segment_count(),
        }
    }

    fn segment_geometry(&self, index: usize) -> Result<Geometry, ShapeError> {
        match self {
            Shape::Path(s) => s.segment_geometry(index),
            Shape::Symmetric(s) => s.segment_geometry(index),
            Shape::Pattern(s) => s.segment_geometry(index),
        }
    }

    fn copies(&self) -> usize {
        match self {
            Shape::Path(s) => s.copies(),
            Shape::Symmetric(s) => s.copies(),
            Shape::Pattern(s) => s.copies(),
        }
    }

    fn copy_transform(&self, copy: usize) -> Result<Transform2D<f64>, ShapeError> {
        match self {
            Shape::Path(s) => s.copy_transform(copy),
            Shape::Symmetric(s) => s.copy_transform(copy),
            Shape::Pattern(s) => s.copy_transform(copy),
        }
    }

    fn pattern_mode(&self) -> PatternMode {
        match self {
            Shape::Path(s) => s.pattern_mode(),
            Shape::Symmetric(s) => s.pattern_mode(),
            Shape::Pattern(s) => s.pattern_mode(),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Shape::Path(s) => ShapeGeometry::is_closed(s),
            Shape::Symmetric(s) => s.is_closed(),
            Shape::Pattern(s) => s.is_closed(),
        }
    }

    fn transform(&mut self, t: &Transform2D<f64>) {
        match self {
            Shape::Path(s) => ShapeGeometry::transform(s, t),
            Shape::Symmetric(s) => s.transform(t),
            Shape::Pattern(s) => s.transform(t),
        }
    }
}

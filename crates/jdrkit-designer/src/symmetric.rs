//! Paths mirrored about a line
//!
//! The outline of a symmetric path is never stored. It is derived on each
//! query from the underlying path `P` and the symmetry line `L`:
//!
//! ```text
//! P[0] .. P[n-1]                 the underlying segments
//! join                           P.end -> L(P.end), absent when anchored
//! L(P[n-1]).rev .. L(P[0]).rev   mirrored segments, walked backwards
//! closing                        L(P.start) -> P.start, only when closed
//! ```
//!
//! The join and closing segments are partial segments: only the half on
//! the underlying side is stored, the other half is its reflection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use jdrkit_core::{Line, Point, Transform2D};

use crate::error::{PathError, ShapeError};
use crate::path::Path;
use crate::point::{ControlPoint, PointId, PointKind};
use crate::segment::{Geometry, PathSegment, SegmentKind};
use crate::shape::ShapeGeometry;

/// Join or closing style requested by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Line,
    Bezier,
}

/// Segment defined by one stored half and the symmetry line
#[derive(Debug, Clone, PartialEq)]
pub enum PartialSegment {
    Line,
    /// Curve whose second control is the mirror image of `control`
    Bezier { control: ControlPoint },
}

impl PartialSegment {
    fn new(kind: JoinKind, anchor: Point, line: &Line) -> Self {
        match kind {
            JoinKind::Line => PartialSegment::Line,
            JoinKind::Bezier => {
                let control = anchor.midpoint(&line.project(&anchor));
                PartialSegment::Bezier {
                    control: ControlPoint::new(control),
                }
            }
        }
    }

    pub fn kind(&self) -> JoinKind {
        match self {
            PartialSegment::Line => JoinKind::Line,
            PartialSegment::Bezier { .. } => JoinKind::Bezier,
        }
    }

    pub fn control(&self) -> Option<&ControlPoint> {
        match self {
            PartialSegment::Line => None,
            PartialSegment::Bezier { control } => Some(control),
        }
    }

    pub fn control_mut(&mut self) -> Option<&mut ControlPoint> {
        match self {
            PartialSegment::Line => None,
            PartialSegment::Bezier { control } => Some(control),
        }
    }

    /// Segment from `start` to its reflection
    pub fn geometry(&self, start: Point, line: &Line) -> Geometry {
        let to = line.reflect(&start);
        match self {
            PartialSegment::Line => Geometry::Line { from: start, to },
            PartialSegment::Bezier { control } => Geometry::Cubic {
                from: start,
                ctrl1: control.pos,
                ctrl2: line.reflect(&control.pos),
                to,
            },
        }
    }
}

#[derive(Debug)]
pub struct SymmetricPath {
    path: Path,
    line_start: ControlPoint,
    line_end: ControlPoint,
    join: Option<PartialSegment>,
    closing: Option<PartialSegment>,
}

impl SymmetricPath {
    /// Mirror `path` about `line`, joined by a straight segment and open
    pub fn new(path: Path, line: Line) -> Result<Self, ShapeError> {
        if path.is_empty() {
            return Err(PathError::Empty.into());
        }
        Ok(Self {
            path,
            line_start: ControlPoint::with_kind(line.p1, PointKind::SymmetryLine),
            line_end: ControlPoint::with_kind(line.p2, PointKind::SymmetryLine),
            join: Some(PartialSegment::Line),
            closing: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    pub fn line(&self) -> Line {
        Line::new(self.line_start.pos, self.line_end.pos)
    }

    pub fn line_points(&self) -> (&ControlPoint, &ControlPoint) {
        (&self.line_start, &self.line_end)
    }

    pub fn join(&self) -> Option<&PartialSegment> {
        self.join.as_ref()
    }

    pub fn closing(&self) -> Option<&PartialSegment> {
        self.closing.as_ref()
    }

    pub fn join_mut(&mut self) -> Option<&mut PartialSegment> {
        self.join.as_mut()
    }

    pub fn closing_mut(&mut self) -> Option<&mut PartialSegment> {
        self.closing.as_mut()
    }

    /// The underlying path ends on the symmetry line, so there is no join
    pub fn is_anchored(&self) -> bool {
        self.join.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.closing.is_some()
    }

    fn end_id(&self) -> Result<PointId, ShapeError> {
        self.path.last_control().ok_or_else(|| PathError::Empty.into())
    }

    fn start_position(&self) -> Result<Point, ShapeError> {
        let id = self.path.first_control().ok_or(PathError::Empty)?;
        Ok(self.path.position(id)?)
    }

    fn end_position(&self) -> Result<Point, ShapeError> {
        Ok(self.path.position(self.end_id()?)?)
    }

    /// Pin the last point of the path to the symmetry line, or release it
    pub fn set_anchored(&mut self, anchored: bool) -> Result<(), ShapeError> {
        let end = self.end_id()?;
        let line = self.line();
        let point = self.path.point_mut(end)?;
        point.anchored = anchored;
        if anchored {
            point.pos = line.project(&point.pos);
            self.join = None;
        } else if self.join.is_none() {
            self.join = Some(PartialSegment::Line);
        }
        debug!("Symmetric path anchored: {}", anchored);
        Ok(())
    }

    /// Change the join segment; ignored while anchored
    pub fn set_join(&mut self, kind: JoinKind) -> Result<(), ShapeError> {
        if self.is_anchored() {
            return Ok(());
        }
        let end = self.end_position()?;
        self.join = Some(PartialSegment::new(kind, end, &self.line()));
        Ok(())
    }

    /// Close with a segment of `kind`, or open with `None`
    pub fn set_closed(&mut self, kind: Option<JoinKind>) -> Result<(), ShapeError> {
        self.closing = match kind {
            Some(kind) => {
                let start = self.start_position()?;
                Some(PartialSegment::new(kind, start, &self.line()))
            }
            None => None,
        };
        Ok(())
    }

    /// Move the symmetry line; an anchored end point follows it
    pub fn set_line(&mut self, line: Line) -> Result<(), ShapeError> {
        self.line_start.pos = line.p1;
        self.line_end.pos = line.p2;
        if self.is_anchored() {
            let end = self.end_id()?;
            let point = self.path.point_mut(end)?;
            point.pos = line.project(&point.pos);
        }
        Ok(())
    }

    fn join_count(&self) -> usize {
        usize::from(self.join.is_some())
    }

    /// Materialise the outline as an ordinary path with its own points
    pub fn to_full_path(&self) -> Result<Path, ShapeError> {
        let line = self.line();
        let mut full = Path::with_style(self.path.style.clone());

        let mut ids: HashMap<PointId, PointId> = HashMap::new();
        for point in self.path.points().iter() {
            ids.insert(point.id(), full.add_control_point(point.duplicate()));
        }
        let map = |id: PointId| ids.get(&id).copied().ok_or(PathError::UnknownPoint { id });
        for segment in self.path.segments() {
            let copy = match segment.kind() {
                SegmentKind::Move => PathSegment::move_to(map(segment.start())?, map(segment.end())?),
                SegmentKind::Line => PathSegment::line(map(segment.start())?, map(segment.end())?),
                SegmentKind::Bezier { control1, control2 } => PathSegment::bezier(
                    map(segment.start())?,
                    map(*control1)?,
                    map(*control2)?,
                    map(segment.end())?,
                ),
                SegmentKind::ClosingMove(_) => {
                    PathSegment::closing_move(map(segment.start())?, map(segment.end())?)
                }
            };
            full.add(copy)?;
        }

        let mut current = full.last_control().ok_or(PathError::Empty)?;
        if let Some(join) = &self.join {
            let to = full.add_point(line.reflect(&full.position(current)?));
            let segment = match join {
                PartialSegment::Line => PathSegment::line(current, to),
                PartialSegment::Bezier { control } => {
                    let c1 = full.add_point(control.pos);
                    let c2 = full.add_point(line.reflect(&control.pos));
                    PathSegment::bezier(current, c1, c2, to)
                }
            };
            full.add(segment)?;
            current = to;
        }

        for segment in self.path.segments().iter().rev() {
            let mut mirrored = segment.reflection(&line, self.path.points(), full.points_mut())?.reverse();
            let duplicate = mirrored.start();
            mirrored.set_start(current);
            full.points_mut().remove(duplicate);
            current = mirrored.end();
            full.add(mirrored)?;
        }

        if let Some(closing) = &self.closing {
            let first = full.first_control().ok_or(PathError::Empty)?;
            let segment = match closing {
                PartialSegment::Line => PathSegment::line(current, first),
                PartialSegment::Bezier { control } => {
                    let c1 = full.add_point(line.reflect(&control.pos));
                    let c2 = full.add_point(control.pos);
                    PathSegment::bezier(current, c1, c2, first)
                }
            };
            full.add(segment)?;
            full.close()?;
        }
        debug!("Materialised symmetric path with {} segments", full.len());
        Ok(full)
    }
}

impl ShapeGeometry for SymmetricPath {
    fn base_path(&self) -> &Path {
        &self.path
    }

    fn base_path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    fn extra_points(&self) -> Vec<&ControlPoint> {
        let mut points = Vec::with_capacity(4);
        points.extend(self.join.as_ref().and_then(PartialSegment::control));
        points.extend(self.closing.as_ref().and_then(PartialSegment::control));
        points.push(&self.line_start);
        points.push(&self.line_end);
        points
    }

    fn extra_points_mut(&mut self) -> Vec<&mut ControlPoint> {
        let mut points = Vec::with_capacity(4);
        points.extend(self.join.as_mut().and_then(PartialSegment::control_mut));
        points.extend(self.closing.as_mut().and_then(PartialSegment::control_mut));
        points.push(&mut self.line_start);
        points.push(&mut self.line_end);
        points
    }

    /// `2n + join + closing`
    fn segment_count(&self) -> usize {
        2 * self.path.len() + self.join_count() + usize::from(self.closing.is_some())
    }

    fn segment_geometry(&self, index: usize) -> Result<Geometry, ShapeError> {
        let n = self.path.len();
        if index < n {
            return Ok(self.path.geometry(index)?);
        }
        let line = self.line();
        let mut offset = index - n;
        if let Some(join) = &self.join {
            if offset == 0 {
                return Ok(join.geometry(self.end_position()?, &line));
            }
            offset -= 1;
        }
        if offset < n {
            let source = self.path.geometry(n - 1 - offset)?;
            return Ok(source.reflect(&line).reversed());
        }
        match &self.closing {
            Some(closing) if offset == n => {
                Ok(closing.geometry(self.start_position()?, &line).reversed())
            }
            _ => Err(PathError::IndexOutOfBounds {
                index,
                len: self.segment_count(),
            }
            .into()),
        }
    }

    fn is_closed(&self) -> bool {
        self.closing.is_some()
    }

    fn transform(&mut self, t: &Transform2D<f64>) {
        self.path.transform(t);
        for point in self.extra_points_mut() {
            point.transform(t);
        }
    }
}

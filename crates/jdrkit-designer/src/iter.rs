//! Shape traversal
//!
//! [`PointIter`] walks every control point of a shape in canonical order:
//! the first segment's start, then each segment's intermediate controls and
//! end, then the points the shape owns outside its base path (symmetry line,
//! join and closing controls, pattern adjust and anchor).
//!
//! [`OutlineIter`] walks the outline segment by segment over every copy,
//! assigning markers from the segment's position in the stroked run.

use smallvec::SmallVec;
use tracing::trace;

use jdrkit_core::Transform2D;

use crate::error::{PathError, ShapeError};
use crate::pattern::PatternMode;
use crate::point::{ControlPoint, PointId};
use crate::segment::{Geometry, PathSegment};
use crate::shape::ShapeGeometry;
use crate::stroke::Marker;

/// A control point yielded by [`PointIter`]
#[derive(Debug, Clone, Copy)]
pub struct PointRef<'a> {
    pub point: &'a ControlPoint,
    /// Ordinal of the point within the whole traversal
    pub point_index: usize,
    /// Base path segment the point belongs to, `None` for shape-owned points
    pub segment_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Segment { segment: usize, index: usize },
    Extra(usize),
    Done,
}

/// Points a segment contributes: its start only when it opens the path
fn local_points(segment_index: usize, segment: &PathSegment) -> SmallVec<[PointId; 4]> {
    let mut ids = SmallVec::new();
    if segment_index == 0 {
        ids.push(segment.start());
    }
    ids.extend(segment.controls());
    ids.push(segment.end());
    ids
}

pub struct PointIter<'a> {
    shape: &'a dyn ShapeGeometry,
    cursor: Cursor,
    point_index: usize,
}

impl<'a> PointIter<'a> {
    pub fn new(shape: &'a dyn ShapeGeometry) -> Self {
        Self {
            shape,
            cursor: Cursor::Segment { segment: 0, index: 0 },
            point_index: 0,
        }
    }

    /// Ordinal the next yielded point will carry
    pub fn point_index(&self) -> usize {
        self.point_index
    }

    /// Resume the traversal just after `id`.
    ///
    /// `segment_index` names the base path segment holding `id`, or `None`
    /// for a point owned by the shape itself. The next call to `next()`
    /// yields the point following `id`, numbered `point_index + 1`.
    ///
    /// A segment's start is accepted for every segment, not just the first:
    /// past the first it is the previous segment's end, so the traversal
    /// resumes at the segment's first control or end.
    pub fn set(&mut self, point_index: usize, segment_index: Option<usize>, id: PointId) -> Result<(), PathError> {
        let cursor = match segment_index {
            Some(segment) => {
                let path = self.shape.base_path();
                let seg = path.segment(segment)?;
                let index = match local_points(segment, seg).iter().position(|p| *p == id) {
                    Some(index) => index + 1,
                    None if seg.start() == id => 0,
                    None => return Err(PathError::UnknownPoint { id }),
                };
                Cursor::Segment { segment, index }
            }
            None => {
                let k = self
                    .shape
                    .extra_points()
                    .iter()
                    .position(|p| p.id() == id)
                    .ok_or(PathError::UnknownPoint { id })?;
                Cursor::Extra(k + 1)
            }
        };
        trace!("Point iterator set to {:?} after {}", cursor, id);
        self.cursor = cursor;
        self.point_index = point_index + 1;
        Ok(())
    }

    fn yielded(&mut self, point: &'a ControlPoint, segment_index: Option<usize>) -> PointRef<'a> {
        let item = PointRef {
            point,
            point_index: self.point_index,
            segment_index,
        };
        self.point_index += 1;
        item
    }
}

impl<'a> Iterator for PointIter<'a> {
    type Item = PointRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let shape = self.shape;
        loop {
            match self.cursor {
                Cursor::Segment { segment, index } => {
                    let path = shape.base_path();
                    let Some(seg) = path.get(segment) else {
                        self.cursor = Cursor::Extra(0);
                        continue;
                    };
                    let ids = local_points(segment, seg);
                    match ids.get(index) {
                        Some(id) => {
                            self.cursor = Cursor::Segment {
                                segment,
                                index: index + 1,
                            };
                            if let Some(point) = path.find_point(*id) {
                                return Some(self.yielded(point, Some(segment)));
                            }
                        }
                        None => {
                            self.cursor = Cursor::Segment {
                                segment: segment + 1,
                                index: 0,
                            }
                        }
                    }
                }
                Cursor::Extra(k) => match shape.extra_points().get(k).copied() {
                    Some(point) => {
                        self.cursor = Cursor::Extra(k + 1);
                        return Some(self.yielded(point, None));
                    }
                    None => self.cursor = Cursor::Done,
                },
                Cursor::Done => return None,
            }
        }
    }
}

/// One outline segment of one copy, in storage coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSegment {
    pub copy: usize,
    /// Position within the copy
    pub index: usize,
    pub geometry: Geometry,
    /// Marker drawn at the segment's start
    pub start_marker: Option<Marker>,
    /// Marker drawn at the segment's end
    pub end_marker: Option<Marker>,
}

pub struct OutlineIter<'a> {
    shape: &'a dyn ShapeGeometry,
    copy: usize,
    index: usize,
    transform: Option<Transform2D<f64>>,
    failed: bool,
}

impl<'a> OutlineIter<'a> {
    pub fn new(shape: &'a dyn ShapeGeometry) -> Self {
        Self {
            shape,
            copy: 0,
            index: 0,
            transform: None,
            failed: false,
        }
    }

    /// Copies in multi mode are stroked separately; otherwise every copy
    /// belongs to one compound run
    fn markers(&self, copy: usize, index: usize, geometry: &Geometry) -> (Option<Marker>, Option<Marker>) {
        if geometry.is_gap() {
            return (None, None);
        }
        let stroke = &self.shape.style().stroke;
        let per_copy = self.shape.segment_count();
        let (position, run) = match self.shape.pattern_mode() {
            PatternMode::Multi => (index, per_copy),
            PatternMode::Single => (copy * per_copy + index, self.shape.copies() * per_copy),
        };
        let start = if position == 0 { stroke.start_marker } else { None };
        let end = if position + 1 == run {
            stroke.end_marker
        } else {
            stroke.mid_marker
        };
        (start, end)
    }
}

impl<'a> Iterator for OutlineIter<'a> {
    type Item = Result<OutlineSegment, ShapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let count = self.shape.segment_count();
        if count == 0 {
            return None;
        }
        if self.index == count {
            self.index = 0;
            self.copy += 1;
            self.transform = None;
        }
        if self.copy >= self.shape.copies() {
            return None;
        }

        let t = match self.transform {
            Some(t) => t,
            None => match self.shape.copy_transform(self.copy) {
                Ok(t) => {
                    self.transform = Some(t);
                    t
                }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            },
        };
        let geometry = match self.shape.segment_geometry(self.index) {
            Ok(g) => g.transformed(&t),
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };

        let (start_marker, end_marker) = self.markers(self.copy, self.index, &geometry);
        let item = OutlineSegment {
            copy: self.copy,
            index: self.index,
            geometry,
            start_marker,
            end_marker,
        };
        self.index += 1;
        Some(Ok(item))
    }
}

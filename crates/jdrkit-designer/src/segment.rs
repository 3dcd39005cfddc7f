//! Path segments
//!
//! A segment names its points by id; the owning path's [`PointStore`] holds
//! the coordinates. Consecutive segments normally share the id of their
//! common vertex, so moving that vertex moves both segments.
//!
//! [`Geometry`] is the resolved, coordinate-only form of a segment. It is
//! what reflection, replica transforms and the exporters work with.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use lyon::geom::CubicBezierSegment;
use smallvec::{smallvec, SmallVec};

use jdrkit_core::{BoundingBox, Line, Point, Transform2D};

use crate::error::{ClosingMoveError, PathError};
use crate::events::{PathEvent, PathEventKind};
use crate::point::{ControlPoint, PointId, PointStore};

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    pub fn next() -> Self {
        Self(NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Resolved segment geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Move {
        from: Point,
        to: Point,
    },
    Line {
        from: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    /// Line back to the sub-path start, then a move to `to`.
    /// `sub_path_start` is `None` while the closing move is unresolved.
    Close {
        from: Point,
        sub_path_start: Option<Point>,
        to: Point,
    },
}

impl Geometry {
    pub fn start(&self) -> Point {
        match *self {
            Geometry::Move { from, .. }
            | Geometry::Line { from, .. }
            | Geometry::Cubic { from, .. }
            | Geometry::Close { from, .. } => from,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Geometry::Move { to, .. }
            | Geometry::Line { to, .. }
            | Geometry::Cubic { to, .. }
            | Geometry::Close { to, .. } => to,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Geometry::Move { .. })
    }

    /// Control polygon, including the sub-path start of a closing move
    pub fn points(&self) -> SmallVec<[Point; 4]> {
        match *self {
            Geometry::Move { from, to } | Geometry::Line { from, to } => smallvec![from, to],
            Geometry::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => smallvec![from, ctrl1, ctrl2, to],
            Geometry::Close {
                from,
                sub_path_start,
                to,
            } => {
                let mut points: SmallVec<[Point; 4]> = smallvec![from];
                points.extend(sub_path_start);
                points.push(to);
                points
            }
        }
    }

    /// Bounds of the control polygon
    pub fn bbox(&self) -> BoundingBox {
        let points = self.points();
        let mut bbox = BoundingBox::from_point(points[0]);
        for p in &points[1..] {
            bbox.encompass(*p);
        }
        bbox
    }

    pub fn map(&self, f: impl Fn(Point) -> Point) -> Geometry {
        match *self {
            Geometry::Move { from, to } => Geometry::Move {
                from: f(from),
                to: f(to),
            },
            Geometry::Line { from, to } => Geometry::Line {
                from: f(from),
                to: f(to),
            },
            Geometry::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => Geometry::Cubic {
                from: f(from),
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
                to: f(to),
            },
            Geometry::Close {
                from,
                sub_path_start,
                to,
            } => Geometry::Close {
                from: f(from),
                sub_path_start: sub_path_start.map(&f),
                to: f(to),
            },
        }
    }

    pub fn transformed(&self, t: &Transform2D<f64>) -> Geometry {
        self.map(|p| p.transformed(t))
    }

    pub fn reflect(&self, line: &Line) -> Geometry {
        self.map(|p| line.reflect(&p))
    }

    /// Same curve traversed in the opposite direction
    pub fn reversed(&self) -> Geometry {
        match *self {
            Geometry::Move { from, to } => Geometry::Move { from: to, to: from },
            Geometry::Line { from, to } => Geometry::Line { from: to, to: from },
            Geometry::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => Geometry::Cubic {
                from: to,
                ctrl1: ctrl2,
                ctrl2: ctrl1,
                to: from,
            },
            Geometry::Close {
                from,
                sub_path_start,
                to,
            } => Geometry::Close {
                from: to,
                sub_path_start,
                to: from,
            },
        }
    }

    /// Direction of travel leaving the start point, in radians
    pub fn start_angle(&self) -> f64 {
        match *self {
            Geometry::Cubic { from, ctrl1, .. } if !from.approx_eq(&ctrl1, 1e-12) => {
                from.bearing_to(&ctrl1)
            }
            Geometry::Cubic {
                from, ctrl2, to, ..
            } => {
                if from.approx_eq(&ctrl2, 1e-12) {
                    from.bearing_to(&to)
                } else {
                    from.bearing_to(&ctrl2)
                }
            }
            _ => self.start().bearing_to(&self.end()),
        }
    }

    /// Direction of travel arriving at the end point, in radians
    pub fn end_angle(&self) -> f64 {
        match *self {
            Geometry::Cubic { ctrl2, to, .. } if !ctrl2.approx_eq(&to, 1e-12) => {
                ctrl2.bearing_to(&to)
            }
            Geometry::Cubic {
                from, ctrl1, to, ..
            } => {
                if ctrl1.approx_eq(&to, 1e-12) {
                    from.bearing_to(&to)
                } else {
                    ctrl1.bearing_to(&to)
                }
            }
            _ => self.start().bearing_to(&self.end()),
        }
    }
}

/// Cached context of a closing move: its own index in the path and the
/// first point of the sub-path it closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosingMove {
    index: Option<usize>,
    sub_path_start: Option<PointId>,
}

/// How a closing move responds to one path event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reaction {
    Ignore,
    Detach,
    Adopt(usize),
    Recompute,
    Shift(isize),
    Relocate,
}

impl ClosingMove {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn sub_path_start(&self) -> Option<PointId> {
        self.sub_path_start
    }

    /// True once the closing move has been placed in a path
    pub fn is_attached(&self) -> bool {
        self.index.is_some()
    }

    /// Attached and holding a valid sub-path start
    pub fn is_resolved(&self) -> bool {
        self.index.is_some() && self.sub_path_start.is_some()
    }

    pub(crate) fn detach(&mut self) {
        self.index = None;
        self.sub_path_start = None;
    }

    pub(crate) fn set(&mut self, index: usize, sub_path_start: Option<PointId>) {
        self.index = Some(index);
        self.sub_path_start = sub_path_start;
    }

    pub(crate) fn reaction(&self, own: SegmentId, event: &PathEvent) -> Reaction {
        let is_new = event.new_segment == Some(own);
        let is_old = event.old_segment == Some(own);
        let before_me = |strict: bool| match (event.index, self.index) {
            (Some(at), Some(mine)) => {
                if strict {
                    at < mine
                } else {
                    at <= mine
                }
            }
            _ => false,
        };

        match event.kind {
            PathEventKind::SegmentAdded | PathEventKind::SegmentInserted if is_new => {
                event.index.map_or(Reaction::Ignore, Reaction::Adopt)
            }
            PathEventKind::SegmentAdded if before_me(true) => Reaction::Recompute,
            PathEventKind::SegmentInserted if before_me(false) => Reaction::Shift(1),
            PathEventKind::SegmentRemoved if is_old => Reaction::Detach,
            PathEventKind::SegmentRemoved if before_me(true) => Reaction::Shift(-1),
            PathEventKind::SegmentChanged if is_old => Reaction::Detach,
            PathEventKind::SegmentChanged if is_new => {
                event.index.map_or(Reaction::Ignore, Reaction::Adopt)
            }
            PathEventKind::SegmentChanged if before_me(true) => Reaction::Recompute,
            PathEventKind::PathChanged => Reaction::Relocate,
            _ => Reaction::Ignore,
        }
    }
}

/// Segment variant
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    Move,
    Line,
    Bezier {
        control1: PointId,
        control2: PointId,
    },
    ClosingMove(ClosingMove),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    id: SegmentId,
    start: PointId,
    end: PointId,
    kind: SegmentKind,
}

impl PathSegment {
    fn with_kind(start: PointId, end: PointId, kind: SegmentKind) -> Self {
        Self {
            id: SegmentId::next(),
            start,
            end,
            kind,
        }
    }

    pub fn move_to(start: PointId, end: PointId) -> Self {
        Self::with_kind(start, end, SegmentKind::Move)
    }

    pub fn line(start: PointId, end: PointId) -> Self {
        Self::with_kind(start, end, SegmentKind::Line)
    }

    pub fn bezier(start: PointId, control1: PointId, control2: PointId, end: PointId) -> Self {
        Self::with_kind(start, end, SegmentKind::Bezier { control1, control2 })
    }

    /// Closing move from `start`; `end` is where the next sub-path begins.
    /// The sub-path start is resolved once the segment is placed in a path.
    pub fn closing_move(start: PointId, end: PointId) -> Self {
        Self::with_kind(start, end, SegmentKind::ClosingMove(ClosingMove::default()))
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn start(&self) -> PointId {
        self.start
    }

    pub fn end(&self) -> PointId {
        self.end
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub(crate) fn set_start(&mut self, start: PointId) {
        self.start = start;
    }

    /// Only moves are gaps
    pub fn is_gap(&self) -> bool {
        matches!(self.kind, SegmentKind::Move)
    }

    pub fn is_closing_move(&self) -> bool {
        matches!(self.kind, SegmentKind::ClosingMove(_))
    }

    /// Whether a new sub-path begins after this segment
    pub fn ends_sub_path(&self) -> bool {
        matches!(self.kind, SegmentKind::Move | SegmentKind::ClosingMove(_))
    }

    pub fn closing(&self) -> Option<&ClosingMove> {
        match &self.kind {
            SegmentKind::ClosingMove(closing) => Some(closing),
            _ => None,
        }
    }

    pub(crate) fn closing_mut(&mut self) -> Option<&mut ClosingMove> {
        match &mut self.kind {
            SegmentKind::ClosingMove(closing) => Some(closing),
            _ => None,
        }
    }

    /// Number of intermediate control points
    pub fn control_count(&self) -> usize {
        match self.kind {
            SegmentKind::Bezier { .. } => 2,
            _ => 0,
        }
    }

    pub fn control(&self, index: usize) -> Option<PointId> {
        self.controls().get(index).copied()
    }

    pub fn controls(&self) -> SmallVec<[PointId; 2]> {
        match self.kind {
            SegmentKind::Bezier { control1, control2 } => smallvec![control1, control2],
            _ => SmallVec::new(),
        }
    }

    /// Start, intermediate controls, then end
    pub fn point_ids(&self) -> SmallVec<[PointId; 4]> {
        let mut ids: SmallVec<[PointId; 4]> = smallvec![self.start];
        ids.extend(self.controls());
        ids.push(self.end);
        ids
    }

    pub fn references(&self, id: PointId) -> bool {
        self.point_ids().contains(&id)
    }

    pub fn geometry(&self, store: &PointStore) -> Result<Geometry, PathError> {
        let from = store.position(self.start)?;
        let to = store.position(self.end)?;
        Ok(match &self.kind {
            SegmentKind::Move => Geometry::Move { from, to },
            SegmentKind::Line => Geometry::Line { from, to },
            SegmentKind::Bezier { control1, control2 } => Geometry::Cubic {
                from,
                ctrl1: store.position(*control1)?,
                ctrl2: store.position(*control2)?,
                to,
            },
            SegmentKind::ClosingMove(closing) => Geometry::Close {
                from,
                sub_path_start: match closing.sub_path_start {
                    Some(id) => Some(store.position(id)?),
                    None => None,
                },
                to,
            },
        })
    }

    /// Bisect at t = 0.5.
    ///
    /// This segment is shortened to end at a new midpoint and the trailing
    /// half is returned; the caller must insert it directly after this one.
    /// Closing moves cannot be split and return `None`.
    pub fn split(&mut self, store: &mut PointStore) -> Result<Option<PathSegment>, PathError> {
        let old_end = self.end;
        match self.kind {
            SegmentKind::Move | SegmentKind::Line => {
                let mid = store.position(self.start)?.midpoint(&store.position(old_end)?);
                let mid = store.add(mid);
                self.end = mid;
                let kind = self.kind.clone();
                Ok(Some(Self::with_kind(mid, old_end, kind)))
            }
            SegmentKind::Bezier { control1, control2 } => {
                let curve = CubicBezierSegment {
                    from: store.position(self.start)?.to_lyon(),
                    ctrl1: store.position(control1)?.to_lyon(),
                    ctrl2: store.position(control2)?.to_lyon(),
                    to: store.position(old_end)?.to_lyon(),
                };
                let (head, tail) = curve.split(0.5);
                store.set_position(control1, head.ctrl1.into())?;
                store.set_position(control2, head.ctrl2.into())?;
                let mid = store.add(head.to.into());
                let c1 = store.add(tail.ctrl1.into());
                let c2 = store.add(tail.ctrl2.into());
                self.end = mid;
                Ok(Some(Self::bezier(mid, c1, c2, old_end)))
            }
            SegmentKind::ClosingMove(_) => Ok(None),
        }
    }

    /// New segment mirrored in `line`, with fresh points added to `target`
    pub fn reflection(
        &self,
        line: &Line,
        source: &PointStore,
        target: &mut PointStore,
    ) -> Result<PathSegment, PathError> {
        let mut mirror = |id: PointId| -> Result<PointId, PathError> {
            let mut point: ControlPoint = source.get(id)?.duplicate();
            point.reflect(line);
            Ok(target.insert(point))
        };
        let start = mirror(self.start)?;
        let kind = match &self.kind {
            SegmentKind::Bezier { control1, control2 } => SegmentKind::Bezier {
                control1: mirror(*control1)?,
                control2: mirror(*control2)?,
            },
            SegmentKind::ClosingMove(_) => SegmentKind::ClosingMove(ClosingMove::default()),
            other => other.clone(),
        };
        let end = mirror(self.end)?;
        Ok(Self::with_kind(start, end, kind))
    }

    /// New segment running from end to start over the same points.
    ///
    /// A reversed closing move comes back detached; it resolves its
    /// sub-path start again once placed in a path.
    pub fn reverse(&self) -> PathSegment {
        let kind = match &self.kind {
            SegmentKind::Bezier { control1, control2 } => SegmentKind::Bezier {
                control1: *control2,
                control2: *control1,
            },
            SegmentKind::ClosingMove(_) => SegmentKind::ClosingMove(ClosingMove::default()),
            other => other.clone(),
        };
        Self::with_kind(self.end, self.start, kind)
    }
}

/// Resolve the sub-path start for a closing move at `index`.
///
/// Scans backwards for the previous sub-path break and answers the start of
/// the segment after it. Without a break the sub-path begins at segment 0.
pub fn resolve_sub_path_start(segments: &[PathSegment], index: usize) -> Result<PointId, ClosingMoveError> {
    if index == 0 {
        return Err(ClosingMoveError::NoPrecedingSegment { index });
    }
    let upper = index.min(segments.len());
    for j in (0..upper).rev() {
        if segments[j].ends_sub_path() {
            if j + 1 >= index {
                return Err(ClosingMoveError::EmptySubPath { index });
            }
            return Ok(segments[j + 1].start());
        }
    }
    segments
        .first()
        .map(PathSegment::start)
        .ok_or(ClosingMoveError::NoPrecedingSegment { index })
}

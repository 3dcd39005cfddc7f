//! The editable path
//!
//! A [`Path`] owns its points and an ordered list of segments. Every
//! structural edit (add, insert, remove, replace) emits a [`PathEvent`].
//! Closing moves held by the path react to the event first, keeping their
//! cached index and sub-path start in step with the segment list; external
//! subscribers are notified afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use jdrkit_core::{BoundingBox, Point, Transform2D};

use crate::error::{ClosingMoveError, PathError};
use crate::events::{ListenerId, PathEvent, PathEventKind, PathListener};
use crate::point::{ControlPoint, PointId, PointStore};
use crate::segment::{resolve_sub_path_start, Geometry, PathSegment, Reaction};
use crate::stroke::PathStyle;

pub struct Path {
    points: PointStore,
    segments: Vec<PathSegment>,
    closed: bool,
    pub style: PathStyle,
    listeners: Vec<(ListenerId, PathListener)>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("points", &self.points)
            .field("segments", &self.segments)
            .field("closed", &self.closed)
            .field("style", &self.style)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    pub fn new() -> Self {
        Self::with_style(PathStyle::default())
    }

    pub fn with_style(style: PathStyle) -> Self {
        Self {
            points: PointStore::new(),
            segments: Vec::new(),
            closed: false,
            style,
            listeners: Vec::new(),
        }
    }

    /// Start a path at `start`
    pub fn builder(start: Point) -> PathBuilder {
        PathBuilder::new(start)
    }

    pub fn points(&self) -> &PointStore {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut PointStore {
        &mut self.points
    }

    pub fn add_point(&mut self, pos: Point) -> PointId {
        self.points.add(pos)
    }

    pub fn add_control_point(&mut self, point: ControlPoint) -> PointId {
        self.points.insert(point)
    }

    pub fn point(&self, id: PointId) -> Result<&ControlPoint, PathError> {
        self.points.get(id)
    }

    pub fn point_mut(&mut self, id: PointId) -> Result<&mut ControlPoint, PathError> {
        self.points.get_mut(id)
    }

    pub fn position(&self, id: PointId) -> Result<Point, PathError> {
        self.points.position(id)
    }

    pub fn set_position(&mut self, id: PointId, pos: Point) -> Result<(), PathError> {
        self.points.set_position(id, pos)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PathSegment> {
        self.segments.get(index)
    }

    pub fn segment(&self, index: usize) -> Result<&PathSegment, PathError> {
        self.segments.get(index).ok_or(PathError::IndexOutOfBounds {
            index,
            len: self.segments.len(),
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn geometry(&self, index: usize) -> Result<Geometry, PathError> {
        self.segment(index)?.geometry(&self.points)
    }

    /// Index of the segment with id `segment`
    pub fn position_of(&self, segment: crate::segment::SegmentId) -> Option<usize> {
        self.segments.iter().position(|s| s.id() == segment)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) -> Result<(), PathError> {
        self.closed = true;
        self.dispatch(PathEvent::whole_path(PathEventKind::PathClosed), None)
    }

    pub fn open(&mut self) -> Result<(), PathError> {
        self.closed = false;
        self.dispatch(PathEvent::whole_path(PathEventKind::PathOpened), None)
    }

    fn check_points(&self, segment: &PathSegment) -> Result<(), PathError> {
        for id in segment.point_ids() {
            if !self.points.contains(id) {
                return Err(PathError::UnknownPoint { id });
            }
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), PathError> {
        if index < self.segments.len() {
            Ok(())
        } else {
            Err(PathError::IndexOutOfBounds {
                index,
                len: self.segments.len(),
            })
        }
    }

    /// Append a segment.
    ///
    /// An error from a closing move leaves the segment in place with the
    /// closing move unresolved.
    pub fn add(&mut self, segment: PathSegment) -> Result<(), PathError> {
        self.check_points(&segment)?;
        let index = self.segments.len();
        let id = segment.id();
        self.segments.push(segment);
        debug!("Added segment {} at index {}", id, index);
        self.dispatch(PathEvent::added(index, id), None)
    }

    /// Insert a segment before `index`; `index == len()` appends
    pub fn insert(&mut self, index: usize, segment: PathSegment) -> Result<(), PathError> {
        if index > self.segments.len() {
            return Err(PathError::IndexOutOfBounds {
                index,
                len: self.segments.len(),
            });
        }
        self.check_points(&segment)?;
        let id = segment.id();
        self.segments.insert(index, segment);
        debug!("Inserted segment {} at index {}", id, index);
        self.dispatch(PathEvent::inserted(index, id), None)
    }

    /// Remove and return the segment at `index`.
    ///
    /// The removed segment's points stay in the store so the segment can be
    /// put back; use [`Path::compact`] to drop them. If a closing move
    /// cannot resolve afterwards, the removal stands and the error is
    /// returned instead of the segment.
    pub fn remove(&mut self, index: usize) -> Result<PathSegment, PathError> {
        self.check_index(index)?;
        let mut removed = self.segments.remove(index);
        debug!("Removed segment {} from index {}", removed.id(), index);
        let event = PathEvent::removed(index, removed.id());
        self.dispatch(event, Some(&mut removed))?;
        Ok(removed)
    }

    /// Replace the segment at `index`, returning the old one
    pub fn replace(&mut self, index: usize, segment: PathSegment) -> Result<PathSegment, PathError> {
        self.check_index(index)?;
        self.check_points(&segment)?;
        let new_id = segment.id();
        let mut old = std::mem::replace(&mut self.segments[index], segment);
        debug!("Replaced segment {} with {} at index {}", old.id(), new_id, index);
        let event = PathEvent::changed(index, old.id(), new_id);
        self.dispatch(event, Some(&mut old))?;
        Ok(old)
    }

    /// Bisect the segment at `index` and insert the trailing half after it
    pub fn split_segment(&mut self, index: usize) -> Result<(), PathError> {
        self.check_index(index)?;
        let tail = self.segments[index].split(&mut self.points)?;
        match tail {
            Some(tail) => self.insert(index + 1, tail),
            None => Err(PathError::Unsplittable { index }),
        }
    }

    /// Tell every listener the path changed wholesale
    pub fn notify_path_changed(&mut self) -> Result<(), PathError> {
        self.dispatch(PathEvent::whole_path(PathEventKind::PathChanged), None)
    }

    /// Register an external listener, called after the path's own closing
    /// moves have reacted to each event
    pub fn subscribe(&mut self, listener: impl Fn(&PathEvent) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.push((id, Arc::new(listener)));
        debug!("Subscription {} added", id);
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        let removed = self.listeners.len() != before;
        if removed {
            debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn dispatch(&mut self, event: PathEvent, detached: Option<&mut PathSegment>) -> Result<(), PathError> {
        trace!("Dispatching {:?}", event);
        let mut first_error: Option<ClosingMoveError> = None;

        let closing_positions: Vec<usize> = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_closing_move())
            .map(|(i, _)| i)
            .collect();
        for position in closing_positions {
            if let Err(err) = self.react(position, &event) {
                first_error.get_or_insert(err);
            }
        }

        if let Some(segment) = detached {
            let id = segment.id();
            if let Some(closing) = segment.closing_mut() {
                if closing.reaction(id, &event) == Reaction::Detach {
                    trace!("Closing move {} detached", id);
                    closing.detach();
                }
            }
        }

        let listeners: Vec<PathListener> = self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(&event);
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn react(&mut self, position: usize, event: &PathEvent) -> Result<(), ClosingMoveError> {
        let segment = &self.segments[position];
        let Some(closing) = segment.closing() else {
            return Ok(());
        };
        let reaction = closing.reaction(segment.id(), event);
        let index = match reaction {
            Reaction::Ignore => return Ok(()),
            Reaction::Detach => {
                if let Some(closing) = self.segments[position].closing_mut() {
                    closing.detach();
                }
                return Ok(());
            }
            Reaction::Adopt(index) => index,
            Reaction::Recompute => closing.index().unwrap_or(position),
            Reaction::Shift(delta) => closing
                .index()
                .map_or(position, |i| i.saturating_add_signed(delta)),
            Reaction::Relocate => position,
        };
        debug_assert_eq!(index, position, "closing move index out of step");
        trace!("Closing move {} reacts with {:?}", segment.id(), reaction);

        let resolved = resolve_sub_path_start(&self.segments, index);
        let id = segment.id();
        if let Some(closing) = self.segments[position].closing_mut() {
            closing.set(index, resolved.as_ref().ok().copied());
        }
        if let Err(err) = &resolved {
            warn!("Closing move {} left unresolved: {}", id, err);
        }
        resolved.map(|_| ())
    }

    /// Recompute the sub-path start a closing move at `index` should have
    pub fn resolve_sub_path_start(&self, index: usize) -> Result<PointId, ClosingMoveError> {
        resolve_sub_path_start(&self.segments, index)
    }

    /// First control point of the path, used to bootstrap iteration
    pub fn first_control(&self) -> Option<PointId> {
        self.segments.first().map(PathSegment::start)
    }

    pub fn last_control(&self) -> Option<PointId> {
        self.segments.last().map(PathSegment::end)
    }

    /// Bounds of all segments' control polygons in storage units
    pub fn storage_bbox(&self) -> Result<Option<BoundingBox>, PathError> {
        let mut bbox = None;
        self.merge_storage_bbox(&mut bbox)?;
        Ok(bbox)
    }

    pub fn merge_storage_bbox(&self, bbox: &mut Option<BoundingBox>) -> Result<(), PathError> {
        for segment in &self.segments {
            let seg_box = segment.geometry(&self.points)?.bbox();
            match bbox {
                Some(b) => b.merge(&seg_box),
                None => *bbox = Some(seg_box),
            }
        }
        Ok(())
    }

    /// Resolved geometry of every segment, in order
    pub fn geometries(&self) -> Result<Vec<Geometry>, PathError> {
        self.segments.iter().map(|s| s.geometry(&self.points)).collect()
    }

    /// Ids of every point a segment refers to
    pub fn referenced_points(&self) -> BTreeSet<PointId> {
        let mut ids = BTreeSet::new();
        for segment in &self.segments {
            ids.extend(segment.point_ids());
            if let Some(start) = segment.closing().and_then(|c| c.sub_path_start()) {
                ids.insert(start);
            }
        }
        ids
    }

    /// Drop points no segment refers to
    pub fn compact(&mut self) {
        let keep = self.referenced_points();
        self.points.retain(|id| keep.contains(&id));
    }

    pub fn transform(&mut self, t: &Transform2D<f64>) {
        self.points.transform_all(t);
    }

    /// Point with id `id` if this path owns it
    pub fn find_point(&self, id: PointId) -> Option<&ControlPoint> {
        self.points.get(id).ok()
    }
}

/// Fluent construction of a path whose segments share their vertices
#[derive(Debug)]
pub struct PathBuilder {
    path: Path,
    current: PointId,
    sub_path_start: Point,
    error: Option<PathError>,
}

impl PathBuilder {
    pub fn new(start: Point) -> Self {
        let mut path = Path::new();
        let current = path.add_point(start);
        Self {
            path,
            current,
            sub_path_start: start,
            error: None,
        }
    }

    pub fn style(mut self, style: PathStyle) -> Self {
        self.path.style = style;
        self
    }

    fn push(&mut self, segment: PathSegment) {
        self.current = segment.end();
        if let Err(err) = self.path.add(segment) {
            self.error.get_or_insert(err);
        }
    }

    pub fn line_to(mut self, to: Point) -> Self {
        let end = self.path.add_point(to);
        self.push(PathSegment::line(self.current, end));
        self
    }

    pub fn curve_to(mut self, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        let c1 = self.path.add_point(ctrl1);
        let c2 = self.path.add_point(ctrl2);
        let end = self.path.add_point(to);
        self.push(PathSegment::bezier(self.current, c1, c2, end));
        self
    }

    pub fn move_to(mut self, to: Point) -> Self {
        let end = self.path.add_point(to);
        self.push(PathSegment::move_to(self.current, end));
        self.sub_path_start = to;
        self
    }

    /// Close the current sub-path; the next one starts where this one did
    pub fn close_sub_path(self) -> Self {
        let next = self.sub_path_start;
        self.close_sub_path_to(next)
    }

    /// Close the current sub-path and begin the next one at `next`
    pub fn close_sub_path_to(mut self, next: Point) -> Self {
        let end = self.path.add_point(next);
        self.push(PathSegment::closing_move(self.current, end));
        self.sub_path_start = next;
        self
    }

    /// Mark the whole path closed
    pub fn closed(mut self) -> Self {
        self.path.closed = true;
        self
    }

    pub fn build(self) -> Result<Path, PathError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.path),
        }
    }
}

//! Identified control points
//!
//! Segments and compound shapes refer to points by [`PointId`], so two
//! segments that share a vertex share the id and "the same control" is an id
//! comparison rather than a coordinate comparison.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use jdrkit_core::{BoundingBox, Line, Point, Transform2D};

use crate::error::PathError;

static NEXT_POINT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a control point, unique for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(u64);

impl PointId {
    pub fn next() -> Self {
        Self(NEXT_POINT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// What a control point is for; decides how an editor draws its handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    #[default]
    Regular,
    Anchored,
    SymmetryLine,
    PatternAnchor,
    PatternAdjust,
}

impl PointKind {
    /// Control flag bit reported to the editor
    pub fn flag(self) -> u8 {
        match self {
            PointKind::Regular => 0,
            PointKind::Anchored => 1 << 0,
            PointKind::SymmetryLine => 1 << 1,
            PointKind::PatternAnchor => 1 << 2,
            PointKind::PatternAdjust => 1 << 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    id: PointId,
    pub pos: Point,
    pub kind: PointKind,
    pub anchored: bool,
}

impl ControlPoint {
    pub fn new(pos: Point) -> Self {
        Self::with_kind(pos, PointKind::Regular)
    }

    pub fn with_kind(pos: Point, kind: PointKind) -> Self {
        Self {
            id: PointId::next(),
            pos,
            kind,
            anchored: kind == PointKind::Anchored,
        }
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// Control flags: the kind bit, plus the anchored bit when set
    pub fn flags(&self) -> u8 {
        let anchored = if self.anchored { PointKind::Anchored.flag() } else { 0 };
        self.kind.flag() | anchored
    }

    /// Copy with the same position and kind but a fresh identity
    pub fn duplicate(&self) -> Self {
        Self {
            id: PointId::next(),
            ..self.clone()
        }
    }

    pub fn transform(&mut self, t: &Transform2D<f64>) {
        self.pos.transform(t);
    }

    pub fn reflect(&mut self, line: &Line) {
        self.pos = line.reflect(&self.pos);
    }
}

/// The points owned by one path, keyed by id.
///
/// A `BTreeMap` keeps iteration deterministic, which in turn keeps
/// transforms and serialisation reproducible.
#[derive(Debug, Default)]
pub struct PointStore {
    points: BTreeMap<PointId, ControlPoint>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Create a regular point and return its id
    pub fn add(&mut self, pos: Point) -> PointId {
        self.insert(ControlPoint::new(pos))
    }

    pub fn insert(&mut self, point: ControlPoint) -> PointId {
        let id = point.id();
        self.points.insert(id, point);
        id
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    pub fn get(&self, id: PointId) -> Result<&ControlPoint, PathError> {
        self.points.get(&id).ok_or(PathError::UnknownPoint { id })
    }

    pub fn get_mut(&mut self, id: PointId) -> Result<&mut ControlPoint, PathError> {
        self.points.get_mut(&id).ok_or(PathError::UnknownPoint { id })
    }

    pub fn position(&self, id: PointId) -> Result<Point, PathError> {
        self.get(id).map(|p| p.pos)
    }

    pub fn set_position(&mut self, id: PointId, pos: Point) -> Result<(), PathError> {
        self.get_mut(id)?.pos = pos;
        Ok(())
    }

    pub fn remove(&mut self, id: PointId) -> Option<ControlPoint> {
        self.points.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlPoint> {
        self.points.values()
    }

    /// Drop every point not named in `keep`
    pub fn retain(&mut self, keep: impl Fn(PointId) -> bool) {
        self.points.retain(|id, _| keep(*id));
    }

    /// Apply `t` to every owned point once
    pub fn transform_all(&mut self, t: &Transform2D<f64>) {
        for point in self.points.values_mut() {
            point.transform(t);
        }
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.values().map(|p| p.pos))
    }
}

//! # Pattern Module
//!
//! Replicates an underlying shape by a per-replica affine transform.
//!
//! Supports:
//! - Rotational patterns (copies turned about the anchor)
//! - Scaled patterns (copies scaled about the anchor, optionally shifted
//!   along the scaling axis by the adjust point)
//! - Spiral patterns (copies placed along an Archimedean spiral)
//!
//! Replica 0 is the original; replicas `1..=replicas` are the copies.

use std::f64::consts::PI;

use lyon::geom::euclid::Angle as EAngle;
use lyon::geom::vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use jdrkit_core::{Angle, ParameterError, Point, Transform2D};

use crate::error::ShapeError;
use crate::path::Path;
use crate::point::{ControlPoint, PointKind};
use crate::segment::Geometry;
use crate::shape::{Shape, ShapeGeometry};

/// Whether replicas are emitted as one compound path or one path each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    #[default]
    Single,
    Multi,
}

/// Pattern-specific parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PatternKind {
    /// Replica `i` is turned by `i * angle` about the anchor
    Rotational { angle: Angle },
    /// Replica `i` is scaled by `i * (scale_x, scale_y)` about the anchor
    Scaled { scale_x: f64, scale_y: f64 },
    /// Replica `i` sits `i * angle` further round an Archimedean spiral
    /// whose radius grows by `distance` per full turn
    Spiral { angle: Angle, distance: f64 },
}

impl PatternKind {
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Rotational { .. } => "rotational",
            PatternKind::Scaled { .. } => "scaled",
            PatternKind::Spiral { .. } => "spiral",
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        if let PatternKind::Scaled { scale_x, scale_y } = *self {
            if scale_x == 0.0 {
                return Err(ParameterError::ZeroScaleFactor { axis: "x" });
            }
            if scale_y == 0.0 {
                return Err(ParameterError::ZeroScaleFactor { axis: "y" });
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Pattern {
    underlying: Box<Shape>,
    kind: PatternKind,
    anchor: ControlPoint,
    adjust: Option<ControlPoint>,
    replicas: usize,
    mode: PatternMode,
    show_original: bool,
}

fn check_replicas(replicas: usize) -> Result<usize, ParameterError> {
    if replicas == 0 {
        return Err(ParameterError::InvalidValue {
            param: "replicas",
            reason: "at least one replica is required".to_string(),
        });
    }
    Ok(replicas)
}

impl Pattern {
    pub fn new(
        underlying: Shape,
        kind: PatternKind,
        anchor: Point,
        adjust: Option<Point>,
        replicas: usize,
    ) -> Result<Self, ShapeError> {
        if let Err(err) = kind.validate() {
            warn!("Rejected {} pattern: {}", kind.name(), err);
            return Err(err.into());
        }
        if matches!(kind, PatternKind::Spiral { .. }) && adjust.is_none() {
            return Err(ShapeError::MissingPoint {
                role: "pattern adjust",
            });
        }
        Ok(Self {
            underlying: Box::new(underlying),
            kind,
            anchor: ControlPoint::with_kind(anchor, PointKind::PatternAnchor),
            adjust: adjust.map(|p| ControlPoint::with_kind(p, PointKind::PatternAdjust)),
            replicas: check_replicas(replicas)?,
            mode: PatternMode::default(),
            show_original: true,
        })
    }

    pub fn rotational(underlying: Shape, anchor: Point, angle: Angle, replicas: usize) -> Result<Self, ShapeError> {
        Self::new(underlying, PatternKind::Rotational { angle }, anchor, None, replicas)
    }

    pub fn scaled(
        underlying: Shape,
        anchor: Point,
        scale_x: f64,
        scale_y: f64,
        adjust: Option<Point>,
        replicas: usize,
    ) -> Result<Self, ShapeError> {
        Self::new(underlying, PatternKind::Scaled { scale_x, scale_y }, anchor, adjust, replicas)
    }

    pub fn spiral(
        underlying: Shape,
        anchor: Point,
        adjust: Point,
        angle: Angle,
        distance: f64,
        replicas: usize,
    ) -> Result<Self, ShapeError> {
        Self::new(underlying, PatternKind::Spiral { angle, distance }, anchor, Some(adjust), replicas)
    }

    pub fn underlying(&self) -> &Shape {
        &self.underlying
    }

    pub fn underlying_mut(&mut self) -> &mut Shape {
        &mut self.underlying
    }

    pub fn into_underlying(self) -> Shape {
        *self.underlying
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: PatternKind) -> Result<(), ShapeError> {
        kind.validate()?;
        if matches!(kind, PatternKind::Spiral { .. }) && self.adjust.is_none() {
            return Err(ShapeError::MissingPoint {
                role: "pattern adjust",
            });
        }
        self.kind = kind;
        Ok(())
    }

    pub fn anchor(&self) -> &ControlPoint {
        &self.anchor
    }

    pub fn anchor_mut(&mut self) -> &mut ControlPoint {
        &mut self.anchor
    }

    pub fn adjust(&self) -> Option<&ControlPoint> {
        self.adjust.as_ref()
    }

    pub fn adjust_mut(&mut self) -> Option<&mut ControlPoint> {
        self.adjust.as_mut()
    }

    /// Add, move or remove the adjust point; spirals cannot lose it
    pub fn set_adjust(&mut self, adjust: Option<Point>) -> Result<(), ShapeError> {
        match adjust {
            Some(pos) => match self.adjust.as_mut() {
                Some(point) => point.pos = pos,
                None => self.adjust = Some(ControlPoint::with_kind(pos, PointKind::PatternAdjust)),
            },
            None => {
                if matches!(self.kind, PatternKind::Spiral { .. }) {
                    return Err(ShapeError::MissingPoint {
                        role: "pattern adjust",
                    });
                }
                self.adjust = None;
            }
        }
        Ok(())
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn set_replicas(&mut self, replicas: usize) -> Result<(), ShapeError> {
        self.replicas = check_replicas(replicas)?;
        Ok(())
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PatternMode) {
        self.mode = mode;
    }

    pub fn show_original(&self) -> bool {
        self.show_original
    }

    pub fn set_show_original(&mut self, show: bool) {
        self.show_original = show;
    }

    fn own_copies(&self) -> usize {
        self.replicas + usize::from(self.show_original)
    }

    /// Affine placement of replica `index`; replica 0 is the identity
    pub fn replica_transform(&self, index: usize) -> Result<Transform2D<f64>, ShapeError> {
        if index > self.replicas {
            return Err(ShapeError::ReplicaOutOfRange {
                index,
                count: self.replicas,
            });
        }
        if index == 0 {
            return Ok(Transform2D::identity());
        }
        let i = index as f64;
        let a = self.anchor.pos;

        let t = match self.kind {
            PatternKind::Rotational { angle } => Transform2D::translation(-a.x, -a.y)
                .then_rotate(EAngle::radians(i * angle.to_radians()))
                .then_translate(vector(a.x, a.y)),
            PatternKind::Scaled { scale_x, scale_y } => {
                let shift = match (&self.adjust, self.underlying.first_control()) {
                    (Some(adjust), Some(first)) => {
                        let f = first.pos;
                        let p = adjust.pos;
                        vector(
                            p.x - scale_x * f.x + a.x * (scale_x - 1.0),
                            p.y - scale_y * f.y + a.y * (scale_y - 1.0),
                        )
                    }
                    _ => vector(0.0, 0.0),
                };
                Transform2D::translation(-a.x, -a.y)
                    .then_scale(i * scale_x, i * scale_y)
                    .then_translate(vector(a.x, a.y))
                    .then_translate(shift * (i - 1.0))
            }
            PatternKind::Spiral { angle, distance } => {
                let adjust = self
                    .adjust
                    .as_ref()
                    .ok_or(ShapeError::MissingPoint {
                        role: "pattern adjust",
                    })?
                    .pos;
                let b = distance / (2.0 * PI);
                let start_radius = a.distance_to(&adjust);
                let bearing = a.bearing_to(&adjust);
                let turn = i * angle.to_radians();
                let radius = start_radius + b * turn;
                let target = Point::new(
                    a.x + radius * (bearing + turn).cos(),
                    a.y + radius * (bearing + turn).sin(),
                );
                Transform2D::translation(-adjust.x, -adjust.y)
                    .then_rotate(EAngle::radians(turn))
                    .then_translate(vector(target.x, target.y))
            }
        };
        Ok(t)
    }
}

impl ShapeGeometry for Pattern {
    fn base_path(&self) -> &Path {
        self.underlying.base_path()
    }

    fn base_path_mut(&mut self) -> &mut Path {
        self.underlying.base_path_mut()
    }

    fn extra_points(&self) -> Vec<&ControlPoint> {
        let mut points = self.underlying.extra_points();
        points.extend(self.adjust.as_ref());
        points.push(&self.anchor);
        points
    }

    fn extra_points_mut(&mut self) -> Vec<&mut ControlPoint> {
        let mut points = self.underlying.extra_points_mut();
        points.extend(self.adjust.as_mut());
        points.push(&mut self.anchor);
        points
    }

    fn segment_count(&self) -> usize {
        self.underlying.segment_count()
    }

    fn segment_geometry(&self, index: usize) -> Result<Geometry, ShapeError> {
        self.underlying.segment_geometry(index)
    }

    fn copies(&self) -> usize {
        self.own_copies() * self.underlying.copies()
    }

    /// Inner copies vary fastest; the inner placement is applied first
    fn copy_transform(&self, copy: usize) -> Result<Transform2D<f64>, ShapeError> {
        let inner_copies = self.underlying.copies();
        let inner = self.underlying.copy_transform(copy % inner_copies)?;
        let own = copy / inner_copies;
        let replica = if self.show_original { own } else { own + 1 };
        Ok(inner.then(&self.replica_transform(replica)?))
    }

    fn pattern_mode(&self) -> PatternMode {
        self.mode
    }

    fn is_closed(&self) -> bool {
        self.underlying.is_closed()
    }

    fn transform(&mut self, t: &Transform2D<f64>) {
        debug!("Transforming {} pattern", self.kind.name());
        self.underlying.transform(t);
        if let Some(adjust) = self.adjust.as_mut() {
            adjust.transform(t);
        }
        self.anchor.transform(t);
    }
}

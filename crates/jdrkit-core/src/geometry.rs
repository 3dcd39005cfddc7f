//! Geometric primitives
//!
//! Plain value types used throughout the object model. Points here carry no
//! identity; the designer wraps them in identified control points when
//! identity matters.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use lyon::geom::euclid::default::Transform2D;

use crate::error::{FormatError, ParameterError};
use crate::io::{FormatVersion, JdrReader, JdrWriter, Persist};

/// Tolerance used for on-line and coincidence tests
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Rotate about `centre` by `angle` radians
    pub fn rotate_about(&mut self, centre: Point, angle: f64) {
        let (s, c) = angle.sin_cos();
        let dx = self.x - centre.x;
        let dy = self.y - centre.y;
        self.x = centre.x + dx * c - dy * s;
        self.y = centre.y + dx * s + dy * c;
    }

    /// Scale relative to `centre`
    pub fn scale_about(&mut self, centre: Point, sx: f64, sy: f64) {
        self.x = centre.x + (self.x - centre.x) * sx;
        self.y = centre.y + (self.y - centre.y) * sy;
    }

    /// Shear relative to `centre`
    pub fn shear_about(&mut self, centre: Point, shx: f64, shy: f64) {
        let dx = self.x - centre.x;
        let dy = self.y - centre.y;
        self.x = centre.x + dx + shx * dy;
        self.y = centre.y + shy * dx + dy;
    }

    pub fn transform(&mut self, t: &Transform2D<f64>) {
        *self = self.transformed(t);
    }

    pub fn transformed(&self, t: &Transform2D<f64>) -> Point {
        let p = t.transform_point(lyon::geom::point(self.x, self.y));
        Point::new(p.x, p.y)
    }

    /// Bearing from `self` to `other`, in radians
    pub fn bearing_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn to_lyon(self) -> lyon::geom::Point<f64> {
        lyon::geom::point(self.x, self.y)
    }
}

impl From<lyon::geom::Point<f64>> for Point {
    fn from(p: lyon::geom::Point<f64>) -> Self {
        Point::new(p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Angle unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    Radian,
    Degree,
}

impl AngleUnit {
    pub fn id(self) -> u8 {
        match self {
            AngleUnit::Radian => 0,
            AngleUnit::Degree => 1,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, FormatError> {
        match id {
            0 => Ok(AngleUnit::Radian),
            1 => Ok(AngleUnit::Degree),
            _ => Err(FormatError::InvalidId {
                field: "angle unit",
                value: i64::from(id),
            }),
        }
    }
}

impl FromStr for AngleUnit {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rad" | "radian" | "radians" => Ok(AngleUnit::Radian),
            "deg" | "degree" | "degrees" => Ok(AngleUnit::Degree),
            other => Err(ParameterError::InvalidAngleUnit {
                unit: other.to_string(),
            }),
        }
    }
}

/// An angle remembers the unit it was entered in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    pub value: f64,
    pub unit: AngleUnit,
}

impl Angle {
    pub fn new(value: f64, unit: AngleUnit) -> Self {
        Self { value, unit }
    }

    pub fn radians(value: f64) -> Self {
        Self::new(value, AngleUnit::Radian)
    }

    pub fn degrees(value: f64) -> Self {
        Self::new(value, AngleUnit::Degree)
    }

    pub fn zero() -> Self {
        Self::radians(0.0)
    }

    pub fn to_radians(&self) -> f64 {
        match self.unit {
            AngleUnit::Radian => self.value,
            AngleUnit::Degree => self.value.to_radians(),
        }
    }

    pub fn to_degrees(&self) -> f64 {
        match self.unit {
            AngleUnit::Radian => self.value.to_degrees(),
            AngleUnit::Degree => self.value,
        }
    }

    /// Same angle expressed in `unit`
    pub fn to_unit(&self, unit: AngleUnit) -> Angle {
        match unit {
            AngleUnit::Radian => Angle::radians(self.to_radians()),
            AngleUnit::Degree => Angle::degrees(self.to_degrees()),
        }
    }

    pub fn full_turn(unit: AngleUnit) -> Angle {
        match unit {
            AngleUnit::Radian => Angle::radians(2.0 * PI),
            AngleUnit::Degree => Angle::degrees(360.0),
        }
    }
}

impl Default for Angle {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            AngleUnit::Radian => write!(f, "{}rad", self.value),
            AngleUnit::Degree => write!(f, "{}deg", self.value),
        }
    }
}

// Before 1.8 the unit is a trailing "is degrees" flag.
impl Persist for Angle {
    fn save<W: Write>(&self, out: &mut JdrWriter<W>, version: FormatVersion) -> Result<(), FormatError> {
        if version < FormatVersion::V1_8 {
            out.write_f64(self.value)?;
            out.write_bool(self.unit == AngleUnit::Degree)
        } else {
            out.write_u8(self.unit.id())?;
            out.write_f64(self.value)
        }
    }

    fn read<R: Read>(input: &mut JdrReader<R>, version: FormatVersion) -> Result<Self, FormatError> {
        if version < FormatVersion::V1_8 {
            let value = input.read_f64()?;
            let unit = if input.read_bool()? {
                AngleUnit::Degree
            } else {
                AngleUnit::Radian
            };
            Ok(Angle::new(value, unit))
        } else {
            let unit = AngleUnit::from_id(input.read_u8()?)?;
            Ok(Angle::new(input.read_f64()?, unit))
        }
    }
}

/// Infinite line through two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn dx(&self) -> f64 {
        self.p2.x - self.p1.x
    }

    pub fn dy(&self) -> f64 {
        self.p2.y - self.p1.y
    }

    pub fn is_degenerate(&self) -> bool {
        self.dx().abs() < EPSILON && self.dy().abs() < EPSILON
    }

    /// Foot of the perpendicular from `p` onto this line
    pub fn project(&self, p: &Point) -> Point {
        let (dx, dy) = (self.dx(), self.dy());
        let len2 = dx * dx + dy * dy;
        if len2 < EPSILON * EPSILON {
            return self.p1;
        }
        let t = ((p.x - self.p1.x) * dx + (p.y - self.p1.y) * dy) / len2;
        Point::new(self.p1.x + t * dx, self.p1.y + t * dy)
    }

    /// Mirror image of `p` across this line
    pub fn reflect(&self, p: &Point) -> Point {
        let foot = self.project(p);
        Point::new(2.0 * foot.x - p.x, 2.0 * foot.y - p.y)
    }

    pub fn contains(&self, p: &Point, tolerance: f64) -> bool {
        self.project(p).distance_to(p) <= tolerance
    }

    /// Affine matrix performing the reflection
    pub fn reflection_transform(&self) -> Transform2D<f64> {
        let (dx, dy) = (self.dx(), self.dy());
        let len2 = dx * dx + dy * dy;
        if len2 < EPSILON * EPSILON {
            return Transform2D::identity();
        }
        let c = (dx * dx - dy * dy) / len2;
        let s = 2.0 * dx * dy / len2;
        // x' = c x + s y + tx, y' = s x - c y + ty, fixing p1
        let tx = self.p1.x - c * self.p1.x - s * self.p1.y;
        let ty = self.p1.y - s * self.p1.x + c * self.p1.y;
        Transform2D::new(c, s, s, -c, tx, ty)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Point::new(min_x.min(max_x), min_y.min(max_y)),
            max: Point::new(min_x.max(max_x), min_y.max(max_y)),
        }
    }

    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, or `None` for an empty input
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bbox = BoundingBox::from_point(iter.next()?);
        for p in iter {
            bbox.encompass(p);
        }
        Some(bbox)
    }

    pub fn encompass(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn merge(&mut self, other: &BoundingBox) {
        self.encompass(other.min);
        self.encompass(other.max);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut bbox = *self;
        bbox.merge(other);
        bbox
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn centre(&self) -> Point {
        self.min.midpoint(&self.max)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Bounds of the transformed corners
    pub fn transformed(&self, t: &Transform2D<f64>) -> BoundingBox {
        let corners = self.corners().map(|c| c.transformed(t));
        let mut bbox = BoundingBox::from_point(corners[0]);
        for c in &corners[1..] {
            bbox.encompass(*c);
        }
        bbox
    }

    /// Multiply every coordinate by `factor`
    pub fn scaled(&self, factor: f64) -> BoundingBox {
        BoundingBox::new(
            self.min.x * factor,
            self.min.y * factor,
            self.max.x * factor,
            self.max.y * factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_rotate_about() {
        let mut p = Point::new(1.0, 0.0);
        p.rotate_about(Point::ORIGIN, PI / 2.0);
        assert!(p.approx_eq(&Point::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_point_scale_and_shear() {
        let mut p = Point::new(3.0, 2.0);
        p.scale_about(Point::new(1.0, 1.0), 2.0, 3.0);
        assert_eq!(p, Point::new(5.0, 4.0));

        let mut q = Point::new(0.0, 2.0);
        q.shear_about(Point::ORIGIN, 0.5, 0.0);
        assert_eq!(q, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_line_reflect_vertical() {
        let line = Line::new(Point::new(5.0, 0.0), Point::new(5.0, 10.0));
        assert!(line
            .reflect(&Point::new(2.0, 3.0))
            .approx_eq(&Point::new(8.0, 3.0), 1e-12));
    }

    #[test]
    fn test_line_reflect_diagonal_matches_transform() {
        let line = Line::new(Point::new(0.0, 1.0), Point::new(2.0, 3.0));
        let p = Point::new(4.0, -1.0);
        let expected = line.reflect(&p);
        let actual = p.transformed(&line.reflection_transform());
        assert!(expected.approx_eq(&actual, 1e-12));
        assert!(line.contains(&line.project(&p), 1e-12));
    }

    #[test]
    fn test_angle_conversion() {
        let a = Angle::degrees(180.0);
        assert!((a.to_radians() - PI).abs() < 1e-12);
        assert_eq!(a.to_unit(AngleUnit::Degree), a);
        assert!("grad".parse::<AngleUnit>().is_err());
        assert_eq!("deg".parse::<AngleUnit>().unwrap(), AngleUnit::Degree);
    }

    #[test]
    fn test_angle_invalid_unit_id() {
        let bytes = [5u8, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Angle::from_bytes(&bytes, FormatVersion::V1_8),
            Err(FormatError::InvalidId { field: "angle unit", value: 5 })
        ));
    }

    #[test]
    fn test_bbox_merge() {
        let mut a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        a.merge(&BoundingBox::new(-1.0, 0.5, 0.5, 3.0));
        assert_eq!(a, BoundingBox::new(-1.0, 0.0, 1.0, 3.0));
        assert_eq!(a.width(), 2.0);
        assert_eq!(a.height(), 3.0);
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }
}

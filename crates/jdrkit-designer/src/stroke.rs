//! Stroke attributes and line markers

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use jdrkit_core::{DashPattern, Length, ParameterError, Point};

use crate::paint::Paint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cap {
    #[default]
    Butt,
    Round,
    Square,
}

impl Cap {
    pub fn svg(self) -> &'static str {
        match self {
            Cap::Butt => "butt",
            Cap::Round => "round",
            Cap::Square => "square",
        }
    }

    /// PostScript / PDF cap code
    pub fn code(self) -> u8 {
        match self {
            Cap::Butt => 0,
            Cap::Round => 1,
            Cap::Square => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    Miter(f64),
    Round,
    Bevel,
}

impl Default for Join {
    fn default() -> Self {
        Join::Miter(10.0)
    }
}

impl Join {
    pub fn miter(limit: f64) -> Result<Self, ParameterError> {
        if !(limit >= 1.0) {
            return Err(ParameterError::InvalidValue {
                param: "miter limit",
                reason: format!("must be at least 1, got {}", limit),
            });
        }
        Ok(Join::Miter(limit))
    }

    pub fn svg(self) -> &'static str {
        match self {
            Join::Miter(_) => "miter",
            Join::Round => "round",
            Join::Bevel => "bevel",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Join::Miter(_) => 0,
            Join::Round => 1,
            Join::Bevel => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Arrow,
    ReverseArrow,
    Bar,
    Dot,
    Square,
}

/// Arrowhead or other decoration drawn at a vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Size in bp
    pub size: f64,
}

impl Marker {
    pub fn new(kind: MarkerKind, size: f64) -> Result<Self, ParameterError> {
        if !(size > 0.0) || !size.is_finite() {
            return Err(ParameterError::InvalidValue {
                param: "marker size",
                reason: format!("must be positive, got {}", size),
            });
        }
        Ok(Self { kind, size })
    }

    /// Closed outline of the marker placed at `at`, pointing along `angle`
    pub fn outline(&self, at: Point, angle: f64) -> Vec<Point> {
        let s = self.size;
        let local: Vec<Point> = match self.kind {
            MarkerKind::Arrow => vec![
                Point::new(0.0, 0.0),
                Point::new(-s, s / 2.0),
                Point::new(-s, -s / 2.0),
            ],
            MarkerKind::ReverseArrow => vec![
                Point::new(-s, 0.0),
                Point::new(0.0, s / 2.0),
                Point::new(0.0, -s / 2.0),
            ],
            MarkerKind::Bar => vec![
                Point::new(-s / 10.0, -s / 2.0),
                Point::new(s / 10.0, -s / 2.0),
                Point::new(s / 10.0, s / 2.0),
                Point::new(-s / 10.0, s / 2.0),
            ],
            MarkerKind::Square => vec![
                Point::new(-s / 2.0, -s / 2.0),
                Point::new(s / 2.0, -s / 2.0),
                Point::new(s / 2.0, s / 2.0),
                Point::new(-s / 2.0, s / 2.0),
            ],
            MarkerKind::Dot => (0..12)
                .map(|i| {
                    let theta = f64::from(i) * PI / 6.0;
                    Point::new(s / 2.0 * theta.cos(), s / 2.0 * theta.sin())
                })
                .collect(),
        };
        local
            .into_iter()
            .map(|mut p| {
                p.rotate_about(Point::ORIGIN, angle);
                p.translate(at.x, at.y);
                p
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: Length,
    #[serde(default)]
    pub dash: DashPattern,
    #[serde(default)]
    pub cap: Cap,
    #[serde(default)]
    pub join: Join,
    #[serde(default)]
    pub start_marker: Option<Marker>,
    #[serde(default)]
    pub mid_marker: Option<Marker>,
    #[serde(default)]
    pub end_marker: Option<Marker>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: Length::bp(1.0),
            dash: DashPattern::solid(),
            cap: Cap::default(),
            join: Join::default(),
            start_marker: None,
            mid_marker: None,
            end_marker: None,
        }
    }
}

impl Stroke {
    pub fn with_width(width: Length) -> Result<Self, ParameterError> {
        if width.value < 0.0 {
            return Err(ParameterError::InvalidValue {
                param: "line width",
                reason: format!("must not be negative, got {}", width),
            });
        }
        Ok(Self {
            width,
            ..Self::default()
        })
    }

    pub fn has_markers(&self) -> bool {
        self.start_marker.is_some() || self.mid_marker.is_some() || self.end_marker.is_some()
    }
}

/// Stroke and the two paint slots of a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    #[serde(default)]
    pub stroke: Stroke,
    #[serde(default = "Paint::black")]
    pub line_paint: Paint,
    #[serde(default)]
    pub fill_paint: Paint,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::default(),
            line_paint: Paint::black(),
            fill_paint: Paint::Transparent,
        }
    }
}

impl PathStyle {
    /// Style used to fill a marker: solid line paint, no outline
    pub fn marker_style(&self) -> PathStyle {
        PathStyle {
            stroke: Stroke {
                width: Length::bp(0.0),
                ..Stroke::default()
            },
            line_paint: Paint::Transparent,
            fill_paint: self.line_paint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miter_limit_validation() {
        assert!(Join::miter(4.0).is_ok());
        assert!(Join::miter(0.5).is_err());
        assert!(Join::miter(f64::NAN).is_err());
    }

    #[test]
    fn test_marker_outline_is_rotated() {
        let marker = Marker::new(MarkerKind::Arrow, 4.0).unwrap();
        let outline = marker.outline(Point::new(10.0, 0.0), PI / 2.0);
        assert_eq!(outline[0], Point::new(10.0, 0.0));
        assert!(outline[1].approx_eq(&Point::new(8.0, -4.0), 1e-12));
        assert!(Marker::new(MarkerKind::Dot, 0.0).is_err());
    }

    #[test]
    fn test_marker_style_fills_with_line_paint() {
        let style = PathStyle::default();
        let marker = style.marker_style();
        assert_eq!(marker.fill_paint, Paint::black());
        assert!(marker.line_paint.is_transparent());
    }
}

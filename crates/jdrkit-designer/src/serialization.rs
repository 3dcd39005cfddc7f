//! Serialization and deserialization for drawing files.
//!
//! Drawings are stored as JSON. Point identity does not survive the round
//! trip as ids; segments refer to points by their position in the path's
//! point list and the shared-vertex graph is rebuilt on load.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use jdrkit_core::{FormatError, Line, Point, Unit};

use crate::context::DrawContext;
use crate::error::{DesignerError, PathError};
use crate::path::Path;
use crate::pattern::{Pattern, PatternKind, PatternMode};
use crate::point::{ControlPoint, PointId, PointKind};
use crate::segment::{PathSegment, SegmentKind};
use crate::shape::{Shape, ShapeGeometry};
use crate::stroke::PathStyle;
use crate::symmetric::{JoinKind, PartialSegment, SymmetricPath};

/// Drawing file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete drawing file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingFile {
    pub version: String,
    pub metadata: DrawingMetadata,
    #[serde(default)]
    pub storage_unit: Unit,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
}

/// Drawing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

impl DrawingMetadata {
    fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
            author: String::new(),
            description: String::new(),
        }
    }
}

/// Serialized control point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub kind: PointKind,
    #[serde(default)]
    pub anchored: bool,
}

impl PointData {
    fn from_point(point: &ControlPoint) -> Self {
        Self {
            x: point.x(),
            y: point.y(),
            kind: point.kind,
            anchored: point.anchored,
        }
    }

    fn to_point(&self) -> ControlPoint {
        let mut point = ControlPoint::with_kind(Point::new(self.x, self.y), self.kind);
        point.anchored = self.anchored;
        point
    }

    fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Serialized segment; fields are indices into [`PathData::points`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentData {
    Move {
        start: usize,
        end: usize,
    },
    Line {
        start: usize,
        end: usize,
    },
    Bezier {
        start: usize,
        control1: usize,
        control2: usize,
        end: usize,
    },
    ClosingMove {
        start: usize,
        end: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub points: Vec<PointData>,
    pub segments: Vec<SegmentData>,
    #[serde(default)]
    pub closed: bool,
}

/// Serialized join or closing segment of a symmetric path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialData {
    pub kind: JoinKind,
    #[serde(default)]
    pub control: Option<PointData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeData {
    Path {
        path: PathData,
    },
    Symmetric {
        path: PathData,
        line: (PointData, PointData),
        #[serde(default)]
        join: Option<PartialData>,
        #[serde(default)]
        closing: Option<PartialData>,
    },
    Pattern {
        underlying: Box<ShapeData>,
        pattern: PatternKind,
        anchor: PointData,
        #[serde(default)]
        adjust: Option<PointData>,
        replicas: usize,
        #[serde(default)]
        mode: PatternMode,
        #[serde(default = "default_show_original")]
        show_original: bool,
    },
}

fn default_show_original() -> bool {
    true
}

/// Serialized drawing object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub style: PathStyle,
    #[serde(flatten)]
    pub shape: ShapeData,
}

/// A named shape on the drawing
#[derive(Debug)]
pub struct DrawObject {
    pub name: String,
    pub shape: Shape,
}

impl DrawObject {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
        }
    }
}

/// In-memory drawing
#[derive(Debug)]
pub struct Drawing {
    pub metadata: DrawingMetadata,
    pub storage_unit: Unit,
    pub objects: Vec<DrawObject>,
}

fn path_data(path: &Path) -> Result<PathData, DesignerError> {
    let mut index: HashMap<PointId, usize> = HashMap::new();
    let mut points = Vec::with_capacity(path.points().len());
    for point in path.points().iter() {
        index.insert(point.id(), points.len());
        points.push(PointData::from_point(point));
    }
    let at = |id: PointId| -> Result<usize, DesignerError> {
        index
            .get(&id)
            .copied()
            .ok_or_else(|| PathError::UnknownPoint { id }.into())
    };

    let mut segments = Vec::with_capacity(path.len());
    for segment in path.segments() {
        let (start, end) = (at(segment.start())?, at(segment.end())?);
        segments.push(match segment.kind() {
            SegmentKind::Move => SegmentData::Move { start, end },
            SegmentKind::Line => SegmentData::Line { start, end },
            SegmentKind::Bezier { control1, control2 } => SegmentData::Bezier {
                start,
                control1: at(*control1)?,
                control2: at(*control2)?,
                end,
            },
            SegmentKind::ClosingMove(_) => SegmentData::ClosingMove { start, end },
        });
    }
    Ok(PathData {
        points,
        segments,
        closed: path.is_closed(),
    })
}

fn build_path(data: &PathData, style: &PathStyle) -> Result<Path, DesignerError> {
    let mut path = Path::with_style(style.clone());
    let ids: Vec<PointId> = data
        .points
        .iter()
        .map(|p| path.add_control_point(p.to_point()))
        .collect();
    let id = |i: usize| -> Result<PointId, DesignerError> {
        ids.get(i).copied().ok_or_else(|| {
            FormatError::InvalidId {
                field: "point index",
                value: i as i64,
            }
            .into()
        })
    };

    for segment in &data.segments {
        let segment = match *segment {
            SegmentData::Move { start, end } => PathSegment::move_to(id(start)?, id(end)?),
            SegmentData::Line { start, end } => PathSegment::line(id(start)?, id(end)?),
            SegmentData::Bezier {
                start,
                control1,
                control2,
                end,
            } => PathSegment::bezier(id(start)?, id(control1)?, id(control2)?, id(end)?),
            SegmentData::ClosingMove { start, end } => PathSegment::closing_move(id(start)?, id(end)?),
        };
        path.add(segment)?;
    }
    if data.closed {
        path.close()?;
    }
    Ok(path)
}

fn partial_data(partial: &PartialSegment) -> PartialData {
    PartialData {
        kind: partial.kind(),
        control: partial.control().map(PointData::from_point),
    }
}

fn restore_control(partial: Option<&mut PartialSegment>, data: &PartialData) {
    if let (Some(control), Some(saved)) = (partial.and_then(PartialSegment::control_mut), &data.control) {
        control.pos = saved.pos();
    }
}

fn shape_data(shape: &Shape) -> Result<ShapeData, DesignerError> {
    Ok(match shape {
        Shape::Path(path) => ShapeData::Path { path: path_data(path)? },
        Shape::Symmetric(sym) => {
            let (start, end) = sym.line_points();
            ShapeData::Symmetric {
                path: path_data(sym.path())?,
                line: (PointData::from_point(start), PointData::from_point(end)),
                join: sym.join().map(partial_data),
                closing: sym.closing().map(partial_data),
            }
        }
        Shape::Pattern(pattern) => ShapeData::Pattern {
            underlying: Box::new(shape_data(pattern.underlying())?),
            pattern: *pattern.kind(),
            anchor: PointData::from_point(pattern.anchor()),
            adjust: pattern.adjust().map(PointData::from_point),
            replicas: pattern.replicas(),
            mode: pattern.mode(),
            show_original: pattern.show_original(),
        },
    })
}

fn build_shape(data: &ShapeData, style: &PathStyle) -> Result<Shape, DesignerError> {
    Ok(match data {
        ShapeData::Path { path } => Shape::Path(build_path(path, style)?),
        ShapeData::Symmetric {
            path,
            line,
            join,
            closing,
        } => {
            let path = build_path(path, style)?;
            let mut sym = SymmetricPath::new(path, Line::new(line.0.pos(), line.1.pos()))?;
            match join {
                Some(join) => {
                    sym.set_join(join.kind)?;
                    restore_control(sym.join_mut(), join);
                }
                None => sym.set_anchored(true)?,
            }
            if let Some(closing) = closing {
                sym.set_closed(Some(closing.kind))?;
                restore_control(sym.closing_mut(), closing);
            }
            Shape::Symmetric(sym)
        }
        ShapeData::Pattern {
            underlying,
            pattern,
            anchor,
            adjust,
            replicas,
            mode,
            show_original,
        } => {
            let underlying = build_shape(underlying, style)?;
            let mut p = Pattern::new(
                underlying,
                *pattern,
                anchor.pos(),
                adjust.as_ref().map(PointData::pos),
                *replicas,
            )?;
            p.set_mode(*mode);
            p.set_show_original(*show_original);
            Shape::Pattern(p)
        }
    })
}

impl DrawingFile {
    /// Serialise `drawing` into its file form
    pub fn from_drawing(drawing: &Drawing) -> Result<Self, DesignerError> {
        let objects = drawing
            .objects
            .iter()
            .map(|obj| {
                Ok(ObjectData {
                    name: obj.name.clone(),
                    style: obj.shape.base_path().style.clone(),
                    shape: shape_data(&obj.shape)?,
                })
            })
            .collect::<Result<Vec<_>, DesignerError>>()?;
        Ok(Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: drawing.metadata.clone(),
            storage_unit: drawing.storage_unit,
            objects,
        })
    }

    /// Rebuild the live object graph
    pub fn to_drawing(&self) -> Result<Drawing, DesignerError> {
        let objects = self
            .objects
            .iter()
            .map(|obj| {
                Ok(DrawObject {
                    name: obj.name.clone(),
                    shape: build_shape(&obj.shape, &obj.style)?,
                })
            })
            .collect::<Result<Vec<_>, DesignerError>>()?;
        Ok(Drawing {
            metadata: self.metadata.clone(),
            storage_unit: self.storage_unit,
            objects,
        })
    }
}

impl Drawing {
    pub fn new(name: impl Into<String>, storage_unit: Unit) -> Self {
        Self {
            metadata: DrawingMetadata::new(name),
            storage_unit,
            objects: Vec::new(),
        }
    }

    pub fn add(&mut self, object: DrawObject) {
        debug!("Added {} '{}' to drawing", object.shape.kind_name(), object.name);
        self.objects.push(object);
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + Clone {
        self.objects.iter().map(|obj| &obj.shape)
    }

    /// Context for this drawing's storage unit at default magnification
    pub fn context(&self) -> DrawContext {
        DrawContext::new(self.storage_unit)
    }

    /// Save drawing to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = DrawingFile::from_drawing(self).context("Failed to serialize drawing")?;
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize drawing")?;

        std::fs::write(path.as_ref(), json).context("Failed to write drawing file")?;

        Ok(())
    }

    /// Load drawing from file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).context("Failed to read drawing file")?;

        let file: DrawingFile = serde_json::from_str(&content).context("Failed to parse drawing file")?;
        let mut drawing = file.to_drawing().context("Failed to rebuild drawing")?;

        drawing.metadata.modified = Utc::now();

        Ok(drawing)
    }
}

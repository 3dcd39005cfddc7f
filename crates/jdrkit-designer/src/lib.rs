//! # JDRKit Designer
//!
//! The object model of the drawing editor: editable paths, the shapes
//! derived from them, and their export.
//!
//! ## Core Components
//!
//! ### Paths
//! - **Points**: control points with stable identity, shared by neighbouring segments
//! - **Segments**: moves, lines, cubic Béziers and closing moves
//! - **Path**: ordered segment list that notifies closing moves and subscribers of every edit
//!
//! ### Compound Shapes
//! - **Symmetric paths**: a path mirrored about a line, joined and optionally closed
//! - **Patterns**: rotational, scaled and spiral replicas of an underlying shape
//!
//! ### Traversal and Output
//! - **Iterators**: control points in canonical order, outline segments with markers
//! - **Export**: SVG, EPS and PGF writers
//! - **Drawing files**: JSON persistence of whole drawings
//!
//! ## Architecture
//!
//! ```text
//! Shape
//!   ├── Path (points + segments + style)
//!   ├── SymmetricPath (Path + line + join/closing)
//!   └── Pattern (Shape + anchor/adjust + replica parameters)
//!
//! ShapeGeometry (bbox, transforms, iteration)
//!   └── OutlineSink (SVG / EPS / PGF)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jdrkit_designer::{Path, Pattern, Shape, ShapeGeometry};
//! use jdrkit_core::{Angle, Point};
//!
//! let petal = Path::builder(Point::new(0.0, 0.0))
//!     .curve_to(Point::new(5.0, 10.0), Point::new(-5.0, 10.0), Point::new(0.0, 0.0))
//!     .build()?;
//! let flower = Pattern::rotational(petal.into(), Point::new(0.0, 0.0), Angle::degrees(60.0), 5)?;
//! let bbox = flower.storage_bbox()?;
//! ```

pub mod context;
pub mod error;
pub mod events;
pub mod export;
pub mod iter;
pub mod paint;
pub mod path;
pub mod pattern;
pub mod point;
pub mod segment;
pub mod serialization;
pub mod shape;
pub mod stroke;
pub mod symmetric;

pub use context::DrawContext;
pub use error::{ClosingMoveError, DesignerError, PathError, Result, ShapeError};
pub use events::{ListenerId, PathEvent, PathEventKind, PathListener};
pub use export::{emit_eps, emit_pgf, emit_shape, emit_svg, EpsWriter, OutlineSink, PgfWriter, SvgWriter};
pub use iter::{OutlineIter, OutlineSegment, PointIter, PointRef};
pub use paint::{Cmyk, Grey, Paint, RadialCentre, Rgb, SolidColour};
pub use path::{Path, PathBuilder};
pub use pattern::{Pattern, PatternKind, PatternMode};
pub use point::{ControlPoint, PointId, PointKind, PointStore};
pub use segment::{ClosingMove, Geometry, PathSegment, SegmentId, SegmentKind};
pub use serialization::{DrawObject, Drawing, DrawingFile, DrawingMetadata};
pub use shape::{Shape, ShapeGeometry};
pub use stroke::{Cap, Join, Marker, MarkerKind, PathStyle, Stroke};
pub use symmetric::{JoinKind, PartialSegment, SymmetricPath};

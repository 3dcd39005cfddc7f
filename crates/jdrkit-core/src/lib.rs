//! # JDRKit Core
//!
//! Value types shared by every JDRKit crate: units and lengths, geometric
//! primitives, fonts, dash patterns, the error taxonomy and the versioned
//! binary codec.

pub mod dash;
pub mod error;
pub mod font;
pub mod geometry;
pub mod io;
pub mod units;

pub use dash::DashPattern;
pub use error::{check_component, Error, FormatError, ParameterError, Result};
pub use font::{Font, FontSeries, FontShape};
pub use geometry::{Angle, AngleUnit, BoundingBox, Line, Point, EPSILON};
pub use io::{FormatVersion, JdrReader, JdrWriter, Persist};
pub use units::{Length, Unit};

// Affine matrices are euclid transforms, re-exported so downstream crates
// name a single type.
pub use lyon::geom::euclid::default::Transform2D;

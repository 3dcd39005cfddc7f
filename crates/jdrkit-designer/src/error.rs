//! Error types for the designer
//!
//! Structural-consistency failures raised while editing paths and compound
//! shapes. Running out of points or segments during iteration is not an
//! error; iterators simply return `None`.

use jdrkit_core::{FormatError, ParameterError};
use thiserror::Error;

use crate::point::PointId;

/// A closing move could not resolve the start of its sub-path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClosingMoveError {
    /// There is no segment before the closing move at all
    #[error("Closing move at index {index} has no preceding segment")]
    NoPrecedingSegment {
        /// Position of the closing move in its path.
        index: usize,
    },

    /// The closing move directly follows a gap, so its sub-path is empty
    #[error("Closing move at index {index} closes an empty sub-path")]
    EmptySubPath {
        /// Position of the closing move in its path.
        index: usize,
    },

    /// The closing move is not part of any path
    #[error("Closing move is not attached to a path")]
    Detached,
}

/// Path editing error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Segment index outside the path
    #[error("Segment index {index} out of bounds for path of {len} segments")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of segments in the path.
        len: usize,
    },

    /// A segment refers to a point the path does not own
    #[error("Unknown control point {id}")]
    UnknownPoint {
        /// The missing point.
        id: PointId,
    },

    /// The segment kind cannot be bisected
    #[error("Segment at index {index} cannot be split")]
    Unsplittable {
        /// Position of the segment.
        index: usize,
    },

    /// Operation needs at least one segment
    #[error("Path has no segments")]
    Empty,

    /// Closing move maintenance failed
    #[error(transparent)]
    ClosingMove(#[from] ClosingMoveError),
}

/// Compound shape error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A point required by the shape's parameters is absent
    #[error("Shape is missing its {role} point")]
    MissingPoint {
        /// Role of the missing point, e.g. "pattern adjust".
        role: &'static str,
    },

    /// Replica index outside 1..=replicas
    #[error("Replica index {index} out of range 1..={count}")]
    ReplicaOutOfRange {
        /// The requested replica.
        index: usize,
        /// Number of replicas.
        count: usize,
    },

    /// Rejected shape parameter
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Failure in the underlying path
    #[error(transparent)]
    Path(#[from] PathError),
}

impl From<ClosingMoveError> for ShapeError {
    fn from(err: ClosingMoveError) -> Self {
        ShapeError::Path(err.into())
    }
}

/// Main error type for the designer crate
#[derive(Error, Debug)]
pub enum DesignerError {
    /// Path error
    #[error(transparent)]
    Path(#[from] PathError),

    /// Shape error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Parameter error
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Format error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl DesignerError {
    pub fn other(msg: impl Into<String>) -> Self {
        DesignerError::Other(msg.into())
    }

    /// True for failures that leave a closing move without a sub-path start
    pub fn is_closing_move_error(&self) -> bool {
        matches!(
            self,
            DesignerError::Path(PathError::ClosingMove(_))
                | DesignerError::Shape(ShapeError::Path(PathError::ClosingMove(_)))
        )
    }
}

impl From<ClosingMoveError> for DesignerError {
    fn from(err: ClosingMoveError) -> Self {
        DesignerError::Path(err.into())
    }
}

pub type Result<T> = std::result::Result<T, DesignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_move_error_nests() {
        let err: DesignerError = ClosingMoveError::EmptySubPath { index: 3 }.into();
        assert!(err.is_closing_move_error());
        assert_eq!(err.to_string(), "Closing move at index 3 closes an empty sub-path");

        let shape: ShapeError = ClosingMoveError::Detached.into();
        let err: DesignerError = shape.into();
        assert!(err.is_closing_move_error());
    }

    #[test]
    fn test_shape_error_display() {
        let err = ShapeError::MissingPoint { role: "pattern adjust" };
        assert_eq!(err.to_string(), "Shape is missing its pattern adjust point");
        let err: ShapeError = ParameterError::ZeroScaleFactor { axis: "y" }.into();
        assert_eq!(err.to_string(), "Scale factor for y must be non-zero");
    }
}

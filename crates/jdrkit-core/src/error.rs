//! Error handling for JDRKit
//!
//! Provides the error types shared by every layer of the object model:
//! - Parameter errors (values rejected at the mutating call)
//! - Format errors (stored fields that cannot be decoded)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Invalid-parameter error type
///
/// Raised immediately by the call that tried to apply the value. The core
/// never recovers from these; the editor reports them or rejects the edit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A scale factor of exactly zero would collapse the geometry
    #[error("Scale factor for {axis} must be non-zero")]
    ZeroScaleFactor {
        /// The axis the factor applies to ("x" or "y").
        axis: &'static str,
    },

    /// Angle unit identifier is neither radian nor degree
    #[error("Unknown angle unit: {unit}")]
    InvalidAngleUnit {
        /// The rejected unit label or identifier.
        unit: String,
    },

    /// Colour or paint component outside of [0, 1]
    #[error("Colour component '{component}' out of range [0,1]: {value}")]
    ComponentOutOfRange {
        /// The component name.
        component: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Grid subdivisions must be at least one
    #[error("Grid subdivisions must be positive, got {value}")]
    InvalidSubdivisions {
        /// The rejected subdivision count.
        value: i64,
    },

    /// Generic invalid parameter value
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidValue {
        /// The parameter name.
        param: &'static str,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Format error type
///
/// Returned by the `read` side of the binary codec when a stored field
/// cannot be turned back into a value. Fatal to the load operation.
#[derive(Error, Debug)]
pub enum FormatError {
    /// An enumeration identifier is out of range
    #[error("Invalid {field} identifier: {value}")]
    InvalidId {
        /// The field being decoded.
        field: &'static str,
        /// The identifier that was read.
        value: i64,
    },

    /// A decoded value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field being decoded.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A string field did not contain valid UTF-8
    #[error("Invalid UTF-8 in {field}")]
    InvalidString {
        /// The field being decoded.
        field: &'static str,
    },

    /// Underlying I/O error, including truncated input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for JDRKit core
///
/// A unified error type that can represent any error raised by this crate.
#[derive(Error, Debug)]
pub enum Error {
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

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a parameter error
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Error::Parameter(_))
    }

    /// Check if this is a format error
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Check that a colour component lies in [0, 1].
pub fn check_component(component: &'static str, value: f64) -> std::result::Result<f64, ParameterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ParameterError::ComponentOutOfRange { component, value })
    }
}

//! Error handling for Flexcut
//!
//! Provides the error types shared by every crate in the workspace:
//! - Geometry errors (malformed points and polylines)
//! - Polypath file errors (I/O and JSON)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Represents input geometry that cannot be measured or traversed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate is NaN or infinite
    #[error("Non-finite coordinate in polyline {polyline} at point {index}")]
    NonFiniteCoordinate {
        /// Index of the polyline within the polypath.
        polyline: usize,
        /// Index of the offending point.
        index: usize,
    },

    /// Generic geometry error
    #[error("Geometry error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Main error type for Flexcut
///
/// A unified error type used by the public file and geometry APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polypath (de)serialization error
    #[error("Polypath format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

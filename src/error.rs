//! Error types for the scene engine
//!
//! Geometry and format errors are local and recoverable: the scene already
//! in memory is never left half-mutated when one of these is returned.

use crate::shapes::ShapeKind;
use thiserror::Error;

/// A shape's point list does not satisfy its variant's arity contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("{kind} needs at least {expected} points, got {found}")]
    InsufficientPoints {
        kind: ShapeKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} needs exactly {expected} points, got {found}")]
    ArityMismatch {
        kind: ShapeKind,
        expected: usize,
        found: usize,
    },
}

/// A persisted scene record could not be turned into a shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected 6 fields, found {0}")]
    MissingFields(usize),

    #[error("unknown shape type '{0}'")]
    UnknownShapeType(String),

    #[error("invalid z-buffer position '{0}'")]
    InvalidDepth(String),

    #[error("invalid fill flag '{0}' (expected true or false)")]
    InvalidFlag(String),

    #[error("invalid color '{0}' (expected #rrggbb)")]
    InvalidColor(String),

    #[error("invalid point '{0}' (expected (x,y))")]
    InvalidPoint(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// A line of the text command language could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' is missing its {argument} argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{command}': invalid argument '{value}'")]
    InvalidArgument { command: &'static str, value: String },
}

/// Top-level error for file, command and presentation operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image export error: {0}")]
    Image(#[from] image::ImageError),

    #[error("record {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("display error: {0}")]
    Display(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display() {
        let err = ShapeError::InsufficientPoints {
            kind: ShapeKind::Polygon,
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "Polygon needs at least 3 points, got 2");
    }

    #[test]
    fn test_record_error_wraps_shape_error() {
        let shape_err = ShapeError::ArityMismatch {
            kind: ShapeKind::Line,
            expected: 2,
            found: 3,
        };
        let err: RecordError = shape_err.clone().into();
        assert_eq!(err, RecordError::Shape(shape_err));
        assert_eq!(err.to_string(), "Line needs exactly 2 points, got 3");
    }

    #[test]
    fn test_error_record_line_prefix() {
        let err = Error::Record {
            line: 4,
            source: RecordError::InvalidColor("blue".to_string()),
        };
        assert_eq!(err.to_string(), "record 4: invalid color 'blue' (expected #rrggbb)");
    }
}

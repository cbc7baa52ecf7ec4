//! Error kinds shared by the codec and the triangulation engine.
//!
//! Every failure that crosses the crate boundary is one of four kinds:
//! - `TruncatedBuffer`: fewer bytes than the header (or declared count) needs.
//! - `InvalidValue`: a value that decodes but is not acceptable (see [`InvalidValue`]).
//! - `IndexOutOfRange`: a triangle index outside `[0, point_count)`.
//! - `AlgorithmInvariantViolation`: internal engine failure; a defect, not bad input.
//!
//! Callers map kinds to transport outcomes through [`Error::kind`].

use thiserror::Error;

/// Coordinate axis, used to point at the offending component of a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Reason attached to [`Error::InvalidValue`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InvalidValue {
    #[error("point {index} has non-finite {axis} coordinate ({value})")]
    NonFiniteCoordinate { index: usize, axis: Axis, value: f64 },
    #[error("triangle {triangle} repeats index {index}")]
    RepeatedIndex { triangle: usize, index: usize },
    #[error("buffer holds {actual} bytes but the declared count requires {expected}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("{count} items do not fit a u32 count header")]
    CountOverflow { count: usize },
}

/// Crate-wide error.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("truncated buffer: need {needed} bytes, have {available}")]
    TruncatedBuffer { needed: usize, available: usize },
    #[error("invalid value: {0}")]
    InvalidValue(#[from] InvalidValue),
    #[error("triangle {triangle} references index {index}, point count is {point_count}")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        point_count: usize,
    },
    #[error("triangulation invariant violated: {0}")]
    AlgorithmInvariantViolation(String),
}

/// Fieldless discriminant of [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TruncatedBuffer,
    InvalidValue,
    IndexOutOfRange,
    AlgorithmInvariantViolation,
}

impl Error {
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TruncatedBuffer { .. } => ErrorKind::TruncatedBuffer,
            Error::InvalidValue(_) => ErrorKind::InvalidValue,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Error::AlgorithmInvariantViolation(_) => ErrorKind::AlgorithmInvariantViolation,
        }
    }

    /// True for kinds caused by the caller's input (as opposed to engine defects).
    #[inline]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::AlgorithmInvariantViolation(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

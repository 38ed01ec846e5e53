//! Error types for stratus.
//!
//! Every loader returns [`StratusError`]. A missing backing file is reported
//! through its own variants so callers can tell "no such station" apart from
//! a file that exists but contains bad data.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stratus operations.
#[derive(Error, Debug)]
pub enum StratusError {
    /// No backing file exists (or it cannot be read) for a station
    #[error("station \"{station}\" does not exist (no readable file at {})", path.display())]
    StationNotFound {
        station: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Gridded dataset file is missing
    #[error("dataset not found: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    /// A cell could not be parsed and its field has no substitution policy
    #[error("parse error in {} line {line}, field '{field}': {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        field: String,
        message: String,
    },

    /// Nearest-timestamp lookup against an empty series
    #[error("cannot align against an empty time series")]
    EmptySeries,

    /// Parallel sequences of one series disagree in length
    #[error("inconsistent series: field '{field}' has {actual} values, expected {expected}")]
    InconsistentSeries {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Variable missing from a gridded dataset
    #[error("variable not found: {name}")]
    VariableNotFound { name: String },

    /// Variable has a different number of dimensions than expected
    #[error("variable '{name}' has {actual} dimensions, expected {expected}")]
    UnexpectedRank {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Time coordinate units that cannot be decoded
    #[error("invalid time units '{units}': {message}")]
    InvalidTimeUnits { units: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Array shape errors
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with StratusError
pub type Result<T> = std::result::Result<T, StratusError>;

//! Loaders for station files and gridded datasets.
//!
//! A [`DataLoader`] is bound to one data directory. Each call opens its own
//! backing file, aligns the requested time against the file's timestamps and
//! returns a freshly built value; nothing is cached between calls.

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, StratusError};
use crate::policy::{CellError, DEFAULT_MISSING_MARKER};

#[cfg(feature = "netcdf")]
pub mod gridded;
pub mod sounding;
pub mod surface;

/// Default gridded reanalysis file name
pub const DEFAULT_REANALYSIS_FILE: &str = "narr_oct2010.nc";

/// Reads station and gridded files from a fixed data directory
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_dir: PathBuf,
    missing_marker: String,
    reanalysis_file: String,
}

impl DataLoader {
    /// Create a loader with default settings for `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            missing_marker: DEFAULT_MISSING_MARKER.to_string(),
            reanalysis_file: DEFAULT_REANALYSIS_FILE.to_string(),
        }
    }

    /// Create a loader from the data section of a configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            data_dir: config.data.data_dir.clone(),
            missing_marker: config.data.missing_marker.clone(),
            reanalysis_file: config.data.reanalysis_file.clone(),
        }
    }

    /// Use a different missing-value token
    pub fn with_missing_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_marker = marker.into();
        self
    }

    /// Use a different default gridded dataset
    pub fn with_reanalysis_file(mut self, file: impl Into<String>) -> Self {
        self.reanalysis_file = file.into();
        self
    }

    /// The directory backing files are read from
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The missing-value token
    pub fn missing_marker(&self) -> &str {
        &self.missing_marker
    }

    /// Path of a station file: `<data_dir>/<prefix>_<station>.txt`
    pub fn station_path(&self, prefix: &str, station: &str) -> PathBuf {
        self.data_dir.join(format!("{}_{}.txt", prefix, station))
    }
}

/// One raw data row and the line it came from
#[derive(Debug, Clone)]
pub(crate) struct StationRow {
    pub line: u64,
    pub record: StringRecord,
}

/// All data rows of a station file with their parsed timestamps
#[derive(Debug)]
pub(crate) struct StationRecords {
    pub path: PathBuf,
    pub rows: Vec<StationRow>,
    pub dates: Vec<NaiveDateTime>,
}

impl StationRecords {
    /// Turn a cell failure on `row` into a located parse error
    pub fn cell_error(&self, row: &StationRow, err: CellError) -> StratusError {
        StratusError::Parse {
            path: self.path.clone(),
            line: row.line,
            field: err.field,
            message: err.message,
        }
    }
}

/// Parses the raw text of a timestamp cell
pub(crate) type TimeParser = fn(&str) -> std::result::Result<NaiveDateTime, String>;

/// Read a comma-delimited station file, skipping its header line.
///
/// Only the timestamp column is parsed here; numeric columns are left raw so
/// the caller can parse just the rows it selects.
pub(crate) fn read_station_file(
    path: &Path,
    station: &str,
    time_column: usize,
    parse_time: TimeParser,
) -> Result<StationRecords> {
    let unreadable = |source: std::io::Error| StratusError::StationNotFound {
        station: station.to_string(),
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    let mut dates = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|err| {
            if !err.is_io_error() {
                return StratusError::Csv(err);
            }
            match err.into_kind() {
                csv::ErrorKind::Io(source) => unreadable(source),
                kind => unreadable(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("{:?}", kind),
                )),
            }
        })?;
        let line = record.position().map_or(0, |p| p.line());

        let raw = record.get(time_column).ok_or_else(|| StratusError::Parse {
            path: path.to_path_buf(),
            line,
            field: "date".to_string(),
            message: format!("record has no column {}", time_column),
        })?;
        let date = parse_time(raw).map_err(|message| StratusError::Parse {
            path: path.to_path_buf(),
            line,
            field: "date".to_string(),
            message,
        })?;

        dates.push(date);
        rows.push(StationRow { line, record });
    }

    debug!(
        path = %path.display(),
        rows = rows.len(),
        "Read station file"
    );

    Ok(StationRecords {
        path: path.to_path_buf(),
        rows,
        dates,
    })
}

/// Log how far the aligned observation is from the requested time
pub(crate) fn log_alignment(label: &str, requested: NaiveDateTime, matched: NaiveDateTime) {
    let offset_minutes = (matched - requested).num_minutes();
    debug!(
        label = label,
        requested = %requested,
        matched = %matched,
        offset_minutes = offset_minutes,
        "Aligned to nearest timestamp"
    );
}

//! Result types returned by the loaders.
//!
//! Every structure here is a plain value built fresh for each call. Field
//! sequences of one series always share the same length and index order.

use chrono::NaiveDateTime;
use ndarray::{Array2, Array3};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Result, StratusError};
use crate::humidity::relative_humidity;

/// Parallel field sequences sharing one timestamp sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSeries {
    /// Station identifier the series was loaded for
    pub station: String,
    /// Timestamp of each observation
    pub dates: Vec<NaiveDateTime>,
    /// Field name to values, index-aligned with `dates`
    pub fields: BTreeMap<String, Vec<f64>>,
}

impl ObservationSeries {
    /// Create an empty series for a station
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            dates: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Get a field's values
    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Get a field's values with error handling
    pub fn field_checked(&self, name: &str) -> Result<&[f64]> {
        self.field(name).ok_or_else(|| StratusError::VariableNotFound {
            name: name.to_string(),
        })
    }

    /// Names of all fields, sorted
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Relative humidity (%) computed from the `t` and `td` fields
    pub fn relative_humidity(&self) -> Result<Vec<f64>> {
        let t = self.field_checked("t")?;
        let td = self.field_checked("td")?;
        Ok(t.iter()
            .zip(td)
            .map(|(&t, &td)| relative_humidity(t, td))
            .collect())
    }

    /// Check that every field has one value per timestamp
    pub fn validate(&self) -> Result<()> {
        for (name, values) in &self.fields {
            if values.len() != self.dates.len() {
                return Err(StratusError::InconsistentSeries {
                    field: name.clone(),
                    expected: self.dates.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }
}

/// One vertical profile from a single radiosonde launch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundingProfile {
    /// Station identifier
    pub station: String,
    /// Launch time of the selected profile
    pub date: NaiveDateTime,
    /// Pressure (hPa)
    pub p: Vec<f64>,
    /// Height (m), ascending
    pub z: Vec<f64>,
    /// Temperature (°C), NaN where missing
    pub t: Vec<f64>,
    /// Dewpoint (°C), NaN where missing
    pub td: Vec<f64>,
}

/// A single level of a sounding before it is split into columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundingLevel {
    pub p: f64,
    pub z: f64,
    pub t: f64,
    pub td: f64,
}

impl SoundingProfile {
    /// Build a profile from unordered levels.
    ///
    /// Levels are sorted by ascending height; a level with neither
    /// temperature nor dewpoint is dropped.
    pub fn from_levels(
        station: impl Into<String>,
        date: NaiveDateTime,
        mut levels: Vec<SoundingLevel>,
    ) -> Self {
        levels.retain(|lvl| !(lvl.t.is_nan() && lvl.td.is_nan()));
        levels.sort_by(|a, b| a.z.total_cmp(&b.z));

        Self {
            station: station.into(),
            date,
            p: levels.iter().map(|l| l.p).collect(),
            z: levels.iter().map(|l| l.z).collect(),
            t: levels.iter().map(|l| l.t).collect(),
            td: levels.iter().map(|l| l.td).collect(),
        }
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.z.len()
    }

    /// Whether the profile has no levels
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// Field name to values, in the same shape as [`ObservationSeries::fields`]
    pub fn fields(&self) -> BTreeMap<&'static str, &[f64]> {
        BTreeMap::from([
            ("p", self.p.as_slice()),
            ("z", self.z.as_slice()),
            ("t", self.t.as_slice()),
            ("td", self.td.as_slice()),
        ])
    }
}

/// Time-windowed fields from a gridded reanalysis dataset
///
/// Grids are `y × x`; fields are `time × y × x` with one time step per entry
/// of `dates`. Values are in whatever units the dataset stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReanalysisFields {
    /// Decoded time coordinate of the window
    pub dates: Vec<NaiveDateTime>,
    /// Latitude of each grid cell
    pub lats: Array2<f32>,
    /// Longitude of each grid cell
    pub lons: Array2<f32>,
    /// 2-metre temperature
    pub t2m: Array3<f32>,
    /// Mean sea-level pressure
    pub mslp: Array3<f32>,
    /// 10-metre zonal wind
    pub u10m: Array3<f32>,
    /// 10-metre meridional wind
    pub v10m: Array3<f32>,
    /// Outgoing longwave radiation
    pub olr: Array3<f32>,
}

impl ReanalysisFields {
    /// Number of time steps
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the window holds no time steps
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Field name to time-indexed array
    pub fn fields(&self) -> BTreeMap<&'static str, &Array3<f32>> {
        BTreeMap::from([
            ("t2m", &self.t2m),
            ("mslp", &self.mslp),
            ("u10m", &self.u10m),
            ("v10m", &self.v10m),
            ("olr", &self.olr),
        ])
    }

    /// Check that every field matches the grid and the time axis
    pub fn validate(&self) -> Result<()> {
        let grid = self.lats.dim();
        if self.lons.dim() != grid {
            return Err(StratusError::InconsistentSeries {
                field: "lon".to_string(),
                expected: grid.0 * grid.1,
                actual: self.lons.len(),
            });
        }

        for (name, field) in self.fields() {
            let (nt, ny, nx) = field.dim();
            if nt != self.dates.len() {
                return Err(StratusError::InconsistentSeries {
                    field: name.to_string(),
                    expected: self.dates.len(),
                    actual: nt,
                });
            }
            if (ny, nx) != grid {
                return Err(StratusError::InconsistentSeries {
                    field: name.to_string(),
                    expected: grid.0 * grid.1,
                    actual: ny * nx,
                });
            }
        }
        Ok(())
    }
}

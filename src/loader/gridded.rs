//! Gridded reanalysis (NARR) fields from NetCDF.
//!
//! The dataset is expected to hold a `time` coordinate with a CF `units`
//! attribute, 2-D `lat`/`lon` grids and `time × y × x` fields. Only the time
//! window is subset; values come back exactly as stored, except that cells
//! equal to a variable's fill value become NaN.

use chrono::NaiveDateTime;
use ndarray::{Array, Array2, Array3};
use netcdf::{AttributeValue, Extent, Variable as NetCDFVariable};
use std::ops::Range;
use tracing::{debug, info};

use super::{log_alignment, DataLoader};
use crate::align::nearest_range;
use crate::error::{Result, StratusError};
use crate::logging::log_timed_operation;
use crate::series::ReanalysisFields;
use crate::time_units::{check_calendar, TimeUnits};

/// Name of the time coordinate variable
pub const TIME_VARIABLE: &str = "time";
/// Names of the latitude and longitude grid variables
pub const GRID_VARIABLES: [&str; 2] = ["lat", "lon"];
/// Time-indexed fields returned for every window
pub const FIELD_VARIABLES: [&str; 5] = ["t2m", "mslp", "u10m", "v10m", "olr"];

impl DataLoader {
    /// Load all reanalysis fields between `start` and `end`.
    ///
    /// `file` names a dataset inside the data directory; `None` uses the
    /// loader's default dataset.
    pub fn reanalysis(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        file: Option<&str>,
    ) -> Result<ReanalysisFields> {
        let file = file.unwrap_or(self.reanalysis_file.as_str());
        log_timed_operation("reanalysis", || self.load_reanalysis(start, end, file))
    }

    fn load_reanalysis(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        file: &str,
    ) -> Result<ReanalysisFields> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Err(StratusError::DatasetNotFound { path });
        }

        let nc = netcdf::open(&path)?;
        info!("Opened NetCDF file: {}", path.display());

        let all_dates = read_time_coordinate(&nc)?;
        let window = nearest_range(&all_dates, start, end)?;
        log_alignment("start", start, all_dates[window.start]);
        if !window.is_empty() {
            log_alignment("end", end, all_dates[window.end - 1]);
        }

        let fields = ReanalysisFields {
            dates: all_dates[window.clone()].to_vec(),
            lats: read_grid(&nc, GRID_VARIABLES[0])?,
            lons: read_grid(&nc, GRID_VARIABLES[1])?,
            t2m: read_time_slab(&nc, FIELD_VARIABLES[0], window.clone())?,
            mslp: read_time_slab(&nc, FIELD_VARIABLES[1], window.clone())?,
            u10m: read_time_slab(&nc, FIELD_VARIABLES[2], window.clone())?,
            v10m: read_time_slab(&nc, FIELD_VARIABLES[3], window.clone())?,
            olr: read_time_slab(&nc, FIELD_VARIABLES[4], window)?,
        };
        fields.validate()?;

        info!(
            file = %path.display(),
            time_steps = fields.len(),
            grid = ?fields.lats.dim(),
            "Loaded reanalysis window"
        );

        Ok(fields)
    }
}

/// Look up a variable by name
fn variable<'f>(file: &'f netcdf::File, name: &str) -> Result<NetCDFVariable<'f>> {
    file.variable(name)
        .ok_or_else(|| StratusError::VariableNotFound {
            name: name.to_string(),
        })
}

/// Dimension lengths of a variable, checked against the expected rank
fn shape_of(var: &NetCDFVariable, rank: usize) -> Result<Vec<usize>> {
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    if shape.len() != rank {
        return Err(StratusError::UnexpectedRank {
            name: var.name(),
            expected: rank,
            actual: shape.len(),
        });
    }
    Ok(shape)
}

/// Read the time coordinate and decode it with its `units` attribute
fn read_time_coordinate(file: &netcdf::File) -> Result<Vec<NaiveDateTime>> {
    let var = variable(file, TIME_VARIABLE)?;
    let units = match var.attribute("units").map(|a| a.value()).transpose()? {
        Some(AttributeValue::Str(units)) => units,
        _ => {
            return Err(StratusError::InvalidTimeUnits {
                units: String::new(),
                message: "time variable has no text 'units' attribute".to_string(),
            })
        }
    };

    let calendar = match var.attribute("calendar").map(|a| a.value()).transpose()? {
        Some(AttributeValue::Str(calendar)) => Some(calendar),
        _ => None,
    };
    check_calendar(calendar.as_deref())?;

    let raw: Vec<f64> = var.get_values::<f64, _>(..)?;
    let units = TimeUnits::parse(&units)?;
    debug!(steps = raw.len(), units = ?units, "Decoding time coordinate");
    units.decode_all(&raw)
}

/// Numeric value of an attribute, if it has one
fn numeric_attribute(var: &NetCDFVariable, name: &str) -> Result<Option<f32>> {
    let Some(attr) = var.attribute(name) else {
        return Ok(None);
    };

    let value = match attr.value()? {
        AttributeValue::Schar(v) => v as f32,
        AttributeValue::Uchar(v) => v as f32,
        AttributeValue::Short(v) => v as f32,
        AttributeValue::Ushort(v) => v as f32,
        AttributeValue::Int(v) => v as f32,
        AttributeValue::Uint(v) => v as f32,
        AttributeValue::Float(v) => v,
        AttributeValue::Double(v) => v as f32,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Replace fill and missing values with NaN
fn mask_fill_values(var: &NetCDFVariable, data: &mut [f32]) -> Result<()> {
    for name in ["_FillValue", "missing_value"] {
        if let Some(fill) = numeric_attribute(var, name)? {
            data.iter_mut()
                .filter(|v| **v == fill)
                .for_each(|v| *v = f32::NAN);
        }
    }
    Ok(())
}

/// Apply the packing attributes: `value * scale_factor + add_offset`.
///
/// Runs after fill masking, since fill values are stored packed. NaN cells
/// stay NaN.
fn unpack_values(var: &NetCDFVariable, data: &mut [f32]) -> Result<()> {
    let scale_factor = numeric_attribute(var, "scale_factor")?;
    let add_offset = numeric_attribute(var, "add_offset")?;
    if scale_factor.is_none() && add_offset.is_none() {
        return Ok(());
    }

    let scale_factor = scale_factor.unwrap_or(1.0);
    let add_offset = add_offset.unwrap_or(0.0);
    for value in data.iter_mut() {
        *value = *value * scale_factor + add_offset;
    }
    Ok(())
}

/// Read a whole 2-D grid variable
fn read_grid(file: &netcdf::File, name: &str) -> Result<Array2<f32>> {
    let var = variable(file, name)?;
    let shape = shape_of(&var, 2)?;

    let mut data: Vec<f32> = var.get_values::<f32, _>(..)?;
    mask_fill_values(&var, &mut data)?;
    unpack_values(&var, &mut data)?;

    Ok(Array::from_shape_vec((shape[0], shape[1]), data)?)
}

/// Read a `time × y × x` variable restricted to `window` along time
fn read_time_slab(file: &netcdf::File, name: &str, window: Range<usize>) -> Result<Array3<f32>> {
    let var = variable(file, name)?;
    let shape = shape_of(&var, 3)?;
    let steps = window.len();

    let mut data: Vec<f32> = if steps == 0 {
        Vec::new()
    } else {
        let extents: [Extent; 3] = [window.into(), (0..shape[1]).into(), (0..shape[2]).into()];
        var.get_values::<f32, _>(&extents[..])?
    };
    mask_fill_values(&var, &mut data)?;
    unpack_values(&var, &mut data)?;

    debug!(variable = name, steps = steps, "Read time slab");
    Ok(Array::from_shape_vec((steps, shape[1], shape[2]), data)?)
}

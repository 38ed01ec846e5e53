//! ASOS surface station timeseries.

use chrono::NaiveDateTime;
use tracing::info;

use super::{log_alignment, read_station_file, DataLoader};
use crate::align::nearest_range;
use crate::error::Result;
use crate::logging::log_timed_operation;
use crate::policy::PolicyTable;
use crate::series::ObservationSeries;

/// File name prefix of surface station files
pub const SURFACE_PREFIX: &str = "asos";
/// Column holding the observation time
pub const SURFACE_TIME_COLUMN: usize = 1;
/// Timestamp layout of surface station files
pub const SURFACE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn parse_observation_time(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, SURFACE_TIME_FORMAT)
        .map_err(|e| format!("'{}' does not match '{}' ({})", raw, SURFACE_TIME_FORMAT, e))
}

impl DataLoader {
    /// Load surface observations for `station` between `start` and `end`.
    ///
    /// Both ends snap to the nearest available observation and the window is
    /// inclusive of the end match, so the result may start before `start` or
    /// finish after `end`.
    pub fn meteogram(
        &self,
        station: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<ObservationSeries> {
        log_timed_operation("meteogram", || self.load_meteogram(station, start, end))
    }

    fn load_meteogram(
        &self,
        station: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<ObservationSeries> {
        let path = self.station_path(SURFACE_PREFIX, station);
        let records =
            read_station_file(&path, station, SURFACE_TIME_COLUMN, parse_observation_time)?;

        let window = nearest_range(&records.dates, start, end)?;
        log_alignment("start", start, records.dates[window.start]);
        if !window.is_empty() {
            log_alignment("end", end, records.dates[window.end - 1]);
        }

        let table = PolicyTable::surface(&self.missing_marker);
        let mut columns = vec![Vec::with_capacity(window.len()); table.fields().len()];

        for row in &records.rows[window.clone()] {
            let values = table
                .parse_record(&row.record)
                .map_err(|e| records.cell_error(row, e))?;
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }

        let mut series = ObservationSeries::new(station);
        series.dates = records.dates[window].to_vec();
        for (spec, values) in table.fields().iter().zip(columns) {
            series.fields.insert(spec.name.clone(), values);
        }
        series.validate()?;

        info!(
            station = station,
            file_rows = records.rows.len(),
            selected = series.len(),
            "Loaded surface observations"
        );

        Ok(series)
    }
}

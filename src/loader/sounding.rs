//! Radiosonde sounding profiles.

use chrono::{NaiveDateTime, Timelike};
use tracing::info;

use super::{log_alignment, read_station_file, DataLoader};
use crate::align::nearest_matches_earliest;
use crate::error::Result;
use crate::logging::log_timed_operation;
use crate::policy::PolicyTable;
use crate::series::{SoundingLevel, SoundingProfile};

/// File name prefix of sounding files
pub const SOUNDING_PREFIX: &str = "soundings";
/// Column holding the launch time
pub const SOUNDING_TIME_COLUMN: usize = 1;
/// Timestamp layout of sounding files
pub const SOUNDING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Launch times are recorded on the hour (`HH:00:00`)
fn parse_launch_time(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    let date = NaiveDateTime::parse_from_str(raw, SOUNDING_TIME_FORMAT)
        .map_err(|e| format!("'{}' does not match '{}' ({})", raw, SOUNDING_TIME_FORMAT, e))?;
    if date.minute() != 0 || date.second() != 0 {
        return Err(format!("'{}' is not on the hour", raw));
    }
    Ok(date)
}

impl DataLoader {
    /// Load the sounding launched closest to `date` at `station`.
    ///
    /// Every row stamped with the closest launch time becomes one level of the
    /// returned profile. If two launches are equally close, the earlier one is
    /// used.
    pub fn sounding(&self, station: &str, date: NaiveDateTime) -> Result<SoundingProfile> {
        log_timed_operation("sounding", || self.load_sounding(station, date))
    }

    fn load_sounding(&self, station: &str, date: NaiveDateTime) -> Result<SoundingProfile> {
        let path = self.station_path(SOUNDING_PREFIX, station);
        let records =
            read_station_file(&path, station, SOUNDING_TIME_COLUMN, parse_launch_time)?;

        let matches = nearest_matches_earliest(&records.dates, date)?;
        let launch = records.dates[matches[0]];
        log_alignment("launch", date, launch);

        let table = PolicyTable::sounding(&self.missing_marker);
        let mut levels = Vec::with_capacity(matches.len());
        for &i in &matches {
            let row = &records.rows[i];
            let values = table
                .parse_record(&row.record)
                .map_err(|e| records.cell_error(row, e))?;
            levels.push(SoundingLevel {
                p: values[0],
                z: values[1],
                t: values[2],
                td: values[3],
            });
        }

        let profile = SoundingProfile::from_levels(station, launch, levels);

        info!(
            station = station,
            launch = %launch,
            rows = matches.len(),
            levels = profile.len(),
            "Loaded sounding"
        );

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StratusError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::tempdir;

    const HEADER: &str = "idx,date,pres,hght_flag,hght,temp,dwpt";

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2010, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn write_soundings(dir: &Path, station: &str, rows: &[&str]) {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        std::fs::write(dir.join(format!("soundings_{}.txt", station)), content).unwrap();
    }

    #[test]
    fn test_selects_all_rows_of_closest_launch() {
        let dir = tempdir().unwrap();
        write_soundings(
            dir.path(),
            "KILX",
            &[
                "0,2010-10-26 00:00:00,1000,x,120,15.0,10.0",
                "1,2010-10-26 12:00:00,850,x,1500,8.0,2.0",
                "2,2010-10-26 12:00:00,1000,x,110,16.0,11.0",
                "3,2010-10-27 00:00:00,500,x,5600,-20.0,-30.0",
            ],
        );

        let profile = DataLoader::new(dir.path())
            .sounding("KILX", at(26, 13))
            .unwrap();

        assert_eq!(profile.date, at(26, 12));
        assert_eq!(profile.z, vec![110.0, 1500.0]);
        assert_eq!(profile.p, vec![1000.0, 850.0]);
        assert_eq!(profile.t, vec![16.0, 8.0]);
        assert_eq!(profile.td, vec![11.0, 2.0]);
    }

    #[test]
    fn test_missing_levels_filtered() {
        let dir = tempdir().unwrap();
        write_soundings(
            dir.path(),
            "KILX",
            &[
                "0,2010-10-26 12:00:00,300,x,9000,M,M",
                "1,2010-10-26 12:00:00,500,x,5500,-18.0,M",
                "2,2010-10-26 12:00:00,1000,x,100,15.0,9.0",
            ],
        );

        let profile = DataLoader::new(dir.path())
            .sounding("KILX", at(26, 12))
            .unwrap();

        assert_eq!(profile.len(), 2);
        assert_eq!(profile.z, vec![100.0, 5500.0]);
        assert!(profile.td[1].is_nan());
        assert_eq!(profile.t[1], -18.0);
    }

    #[test]
    fn test_equidistant_launches_pick_earlier() {
        let dir = tempdir().unwrap();
        write_soundings(
            dir.path(),
            "KILX",
            &[
                "0,2010-10-27 00:00:00,1000,x,100,10.0,5.0",
                "1,2010-10-26 12:00:00,1000,x,100,12.0,6.0",
            ],
        );

        let profile = DataLoader::new(dir.path())
            .sounding("KILX", at(26, 18))
            .unwrap();
        assert_eq!(profile.date, at(26, 12));
        assert_eq!(profile.t, vec![12.0]);
    }

    #[test]
    fn test_malformed_height_propagates() {
        let dir = tempdir().unwrap();
        write_soundings(
            dir.path(),
            "KILX",
            &["0,2010-10-26 12:00:00,1000,x,M,15.0,9.0"],
        );

        match DataLoader::new(dir.path()).sounding("KILX", at(26, 12)) {
            Err(StratusError::Parse { field, .. }) => assert_eq!(field, "z"),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_station() {
        let dir = tempdir().unwrap();
        let err = DataLoader::new(dir.path())
            .sounding("ZZZZ", at(26, 12))
            .unwrap_err();
        assert!(err.to_string().contains("ZZZZ"));
    }

    #[test]
    fn test_minutes_must_be_zero() {
        let dir = tempdir().unwrap();
        write_soundings(
            dir.path(),
            "KILX",
            &["0,2010-10-26 12:30:00,1000,x,100,15.0,9.0"],
        );

        let result = DataLoader::new(dir.path()).sounding("KILX", at(26, 12));
        assert!(matches!(result, Err(StratusError::Parse { .. })));
    }
}

//! Test data generation utilities.
//!
//! Functions that write station files and NetCDF datasets with known contents
//! into a fixture directory.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::fmt::Write as _;
use std::path::Path;

/// Header line of a surface station file
pub const SURFACE_HEADER: &str = "idx,valid,tmpc,dwpc,drct,sknt,mslp,p01m";

/// Header line of a sounding file
pub const SOUNDING_HEADER: &str = "idx,date,pres,hght_flag,hght,temp,dwpt";

/// Midnight UTC on the given October 2010 day, plus `hours`
pub fn oct2010(day: u32, hours: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 10, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(hours)
}

/// Write `asos_<station>.txt` with the given data rows.
pub fn write_surface_file(dir: &Path, station: &str, rows: &[String]) -> std::io::Result<()> {
    let mut content = String::from(SURFACE_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(dir.join(format!("asos_{}.txt", station)), content)
}

/// Write `soundings_<station>.txt` with the given data rows.
pub fn write_sounding_file(dir: &Path, station: &str, rows: &[String]) -> std::io::Result<()> {
    let mut content = String::from(SOUNDING_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(dir.join(format!("soundings_{}.txt", station)), content)
}

/// One surface row with a sensible pattern of values.
///
/// Temperature is `10 + hour`, dewpoint `5 + hour/2`; pressure and
/// precipitation are written as given so tests can place markers.
pub fn surface_row(idx: usize, time: NaiveDateTime, pres: &str, prec: &str) -> String {
    let hour = time.hour() as f64;
    let mut row = String::new();
    write!(
        row,
        "{},{},{:.1},{:.1},{},{},{},{}",
        idx,
        time.format("%Y-%m-%d %H:%M"),
        10.0 + hour,
        5.0 + hour / 2.0,
        180 + idx * 10,
        10 + idx,
        pres,
        prec
    )
    .unwrap();
    row
}

/// Hourly surface rows covering `hours` hours from 26 Oct 2010 00Z.
pub fn hourly_surface_rows(hours: usize) -> Vec<String> {
    (0..hours)
        .map(|h| {
            let pres = if h % 5 == 4 {
                "M".to_string()
            } else {
                format!("{:.1}", 1010.0 - h as f64 * 0.5)
            };
            let prec = if h % 3 == 2 { "M" } else { "0.2" };
            surface_row(h, oct2010(26, h as i64), &pres, prec)
        })
        .collect()
}

/// One sounding level row.
pub fn sounding_row(
    idx: usize,
    time: NaiveDateTime,
    p: f64,
    z: f64,
    t: &str,
    td: &str,
) -> String {
    format!(
        "{},{},{},,{},{},{}",
        idx,
        time.format("%Y-%m-%d %H:%M:%S"),
        p,
        z,
        t,
        td
    )
}

/// Two launches (26 Oct 00Z and 12Z) with levels written out of height order.
pub fn two_launch_sounding_rows() -> Vec<String> {
    let first = oct2010(26, 0);
    let second = oct2010(26, 12);
    vec![
        sounding_row(0, first, 1000.0, 110.0, "14.0", "9.0"),
        sounding_row(1, first, 850.0, 1450.0, "6.0", "1.0"),
        sounding_row(2, second, 500.0, 5600.0, "-19.0", "M"),
        sounding_row(3, second, 1000.0, 120.0, "16.0", "11.0"),
        sounding_row(4, second, 300.0, 9300.0, "M", "M"),
        sounding_row(5, second, 850.0, 1500.0, "M", "2.0"),
        sounding_row(6, second, 700.0, 3050.0, "1.5", "-4.0"),
    ]
}

/// Create a NARR-like NetCDF file with 8 three-hourly steps on a 3 × 4 grid.
///
/// Field `k` (in `t2m, mslp, u10m, v10m, olr` order) holds
/// `k * 1000 + flat_index` at each cell.
#[cfg(feature = "netcdf")]
pub fn create_narr_nc(path: &Path) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", 8)?;
    file.add_dimension("y", 3)?;
    file.add_dimension("x", 4)?;
    file.add_attribute("title", "NARR Test Data")?;
    file.add_attribute("institution", "stratus test suite")?;

    // Add and configure the time variable
    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 2010-10-01 00:00:00")?;
        // 25 Oct 00Z onwards, every 3 hours
        let days: Vec<f64> = (0..8).map(|i| 24.0 + i as f64 * 0.125).collect();
        time_var.put_values(&days, ..)?;
    }

    // Add the 2-D coordinate grids
    {
        let mut lat_var = file.add_variable::<f32>("lat", &["y", "x"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        let lats: Vec<f32> = (0..12).map(|i| 30.0 + (i / 4) as f32 * 5.0).collect();
        lat_var.put_values(&lats, ..)?;

        let mut lon_var = file.add_variable::<f32>("lon", &["y", "x"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        let lons: Vec<f32> = (0..12).map(|i| -120.0 + (i % 4) as f32 * 10.0).collect();
        lon_var.put_values(&lons, ..)?;
    }

    // Add the time-indexed fields
    for (k, name) in ["t2m", "mslp", "u10m", "v10m", "olr"].iter().enumerate() {
        let mut var = file.add_variable::<f32>(name, &["time", "y", "x"])?;
        var.put_attribute("long_name", format!("test field {}", name).as_str())?;
        let values: Vec<f32> = (0..8 * 12).map(|i| (k * 1000 + i) as f32).collect();
        var.put_values(&values, ..)?;
    }

    Ok(())
}

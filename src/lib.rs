//! # stratus
//!
//! Loads atmospheric observation and reanalysis data and aligns it to
//! requested times, ready to hand to a plotting front-end.
//!
//! ## Key Features
//!
//! - **Surface timeseries**: ASOS station files sliced to a time window
//! - **Soundings**: the full vertical profile closest to a requested launch time
//! - **Reanalysis grids**: NetCDF fields sliced along their time axis
//! - **Explicit missing-value policy**: one marker token, handled per field
//!
//! ## Architecture
//!
//! - **Aligner** (`align`): nearest-timestamp lookup and window selection
//! - **Loaders** (`loader`): read a backing file, align, and build a result
//! - **Results** (`series`): plain values with index-aligned fields

pub mod align;
pub mod config;
pub mod error;
pub mod humidity;
pub mod loader;
pub mod logging;
pub mod policy;
pub mod series;
pub mod time_units;

pub use align::{nearest_index, nearest_matches, nearest_range};
pub use config::Config;
pub use error::{Result, StratusError};
pub use loader::DataLoader;
pub use logging::{
    init_tracing, log_error, log_load_stats, log_operation_end, log_operation_start,
    log_timed_operation,
};
pub use policy::{MissingPolicy, PolicyTable};
pub use series::{ObservationSeries, ReanalysisFields, SoundingProfile};

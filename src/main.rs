//! stratus - load and time-align atmospheric data
//!
//! This is the command-line entry point. It resolves configuration, runs one
//! loader, and prints (or saves) the result as JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

use stratus::config::Command;
use stratus::{
    init_tracing, log_error, log_load_stats, log_operation_end, log_operation_start, Config,
    DataLoader, ObservationSeries,
};

/// Surface series plus derived relative humidity
#[derive(Serialize)]
struct MeteogramOutput<'a> {
    #[serde(flatten)]
    series: &'a ObservationSeries,
    rh: Vec<f64>,
}

fn main() -> Result<()> {
    // Load configuration
    let (config, command) = Config::load().context("failed to load configuration")?;

    init_tracing(&config.log_level);
    info!("Starting stratus v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        log_error(&e, "configuration");
        e
    })?;

    let loader = DataLoader::from_config(&config);
    info!(data_dir = %loader.data_dir().display(), "Using data directory");

    let operation = operation_name(&command);
    let details = format!("{:?}", command);
    let start = Instant::now();
    log_operation_start(operation, Some(&details));

    let result = run(&loader, &command);
    log_operation_end(operation, start, result.is_ok());
    let (name, value) = result?;

    emit(&config, &name, &value)
}

fn operation_name(command: &Command) -> &'static str {
    match command {
        Command::Meteogram { .. } => "meteogram",
        Command::Sounding { .. } => "sounding",
        Command::Reanalysis { .. } => "reanalysis",
    }
}

/// Run the requested loader, returning an output name and the JSON result
fn run(loader: &DataLoader, command: &Command) -> Result<(String, serde_json::Value)> {
    match command {
        Command::Meteogram {
            station,
            start,
            end,
        } => {
            let series = loader
                .meteogram(station, *start, *end)
                .with_context(|| format!("failed to load meteogram for {}", station))?;
            log_load_stats("surface", station, series.len(), &series.field_names());

            let output = MeteogramOutput {
                rh: series.relative_humidity()?,
                series: &series,
            };
            let name = format!("meteogram_{}_{}", station, start.format("%Y%m%d%H"));
            Ok((name, serde_json::to_value(output)?))
        }
        Command::Sounding { station, time } => {
            let profile = loader
                .sounding(station, *time)
                .with_context(|| format!("failed to load sounding for {}", station))?;
            let fields: Vec<&str> = profile.fields().into_keys().collect();
            log_load_stats("sounding", station, profile.len(), &fields);

            let name = format!("sounding_{}_{}", station, profile.date.format("%Y%m%d%H"));
            Ok((name, serde_json::to_value(&profile)?))
        }
        Command::Reanalysis { start, end, file } => {
            #[cfg(feature = "netcdf")]
            {
                let narr = loader
                    .reanalysis(*start, *end, file.as_deref())
                    .context("failed to load reanalysis fields")?;
                let fields: Vec<&str> = narr.fields().into_keys().collect();
                let source = file.as_deref().unwrap_or("default dataset");
                log_load_stats("reanalysis", source, narr.len(), &fields);

                let name = format!("reanalysis_{}", start.format("%Y%m%d%H"));
                Ok((name, serde_json::to_value(&narr)?))
            }
            #[cfg(not(feature = "netcdf"))]
            {
                let _ = (start, end, file);
                anyhow::bail!("stratus was built without NetCDF support")
            }
        }
    }
}

/// Print the result, or write it into the figure directory with --save
fn emit(config: &Config, name: &str, value: &serde_json::Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if config.output.save {
        let dir = config.ensure_figure_dir()?;
        let path = dir.join(format!("{}.json", name));
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Saved result");
    } else {
        println!("{}", json);
    }

    Ok(())
}

//! Configuration management for stratus.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StratusError};
use crate::loader::DEFAULT_REANALYSIS_FILE;
use crate::policy::DEFAULT_MISSING_MARKER;

/// Timestamp layouts accepted on the command line
const CLI_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a timestamp given on the command line
pub fn parse_timestamp(text: &str) -> std::result::Result<NaiveDateTime, String> {
    CLI_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
        .ok_or_else(|| {
            format!(
                "invalid timestamp '{}', expected one of: {}",
                text,
                CLI_TIME_FORMATS.join(", ")
            )
        })
}

/// Command-line arguments for stratus
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding station files and gridded datasets
    #[arg(short, long, global = true, env = "STRATUS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory results are saved to with --save
    #[arg(short, long, global = true, env = "STRATUS_FIGURE_DIR")]
    pub figure_dir: Option<PathBuf>,

    /// Token marking a missing value in station files
    #[arg(short, long, global = true, env = "STRATUS_MISSING_MARKER")]
    pub missing_marker: Option<String>,

    /// Path to JSON configuration file
    #[arg(short, long, global = true, env = "STRATUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "STRATUS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Write the result as JSON into the figure directory instead of stdout
    #[arg(long, global = true)]
    pub save: bool,
}

/// What to load
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Surface station timeseries over a time window
    Meteogram {
        /// Station identifier, e.g. ORD
        station: String,
        /// Window start
        #[arg(value_parser = parse_timestamp)]
        start: NaiveDateTime,
        /// Window end (inclusive of its nearest observation)
        #[arg(value_parser = parse_timestamp)]
        end: NaiveDateTime,
    },
    /// Sounding profile closest to a time
    Sounding {
        /// Radiosonde station identifier, e.g. KILX
        station: String,
        /// Requested launch time
        #[arg(value_parser = parse_timestamp)]
        time: NaiveDateTime,
    },
    /// Gridded reanalysis fields over a time window
    Reanalysis {
        /// Window start
        #[arg(value_parser = parse_timestamp)]
        start: NaiveDateTime,
        /// Window end
        #[arg(value_parser = parse_timestamp)]
        end: NaiveDateTime,
        /// Dataset file name inside the data directory
        #[arg(long)]
        file: Option<String>,
    },
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the backing files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Missing-value token in station files
    #[serde(default = "default_missing_marker")]
    pub missing_marker: String,

    /// Default gridded dataset file name
    #[serde(default = "default_reanalysis_file")]
    pub reanalysis_file: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory saved results are written to
    #[serde(default = "default_figure_dir")]
    pub figure_dir: PathBuf,

    /// Save results instead of printing them
    #[serde(default)]
    pub save: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already-parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            config = Self::load_from_file(config_path)?;
        }

        // Override with command-line arguments (or their environment fallbacks)
        if let Some(data_dir) = args.data_dir {
            config.data.data_dir = data_dir;
        }
        if let Some(marker) = args.missing_marker {
            config.data.missing_marker = marker;
        }
        if let Some(figure_dir) = args.figure_dir {
            config.output.figure_dir = figure_dir;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        config.output.save |= args.save;

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StratusError::Config {
            message: format!("cannot read config file {}: {}", path.display(), e),
        })?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Return the figure directory, creating it if it does not exist
    pub fn ensure_figure_dir(&self) -> Result<PathBuf> {
        let dir = &self.output.figure_dir;
        if !dir.is_dir() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(dir.clone())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.data.data_dir.as_os_str().is_empty() {
            return Err(StratusError::Config {
                message: "Data directory cannot be empty".to_string(),
            });
        }

        let marker = self.data.missing_marker.trim();
        if marker.is_empty() {
            return Err(StratusError::Config {
                message: "Missing-value marker cannot be empty".to_string(),
            });
        }

        if self.data.reanalysis_file.is_empty() {
            return Err(StratusError::Config {
                message: "Reanalysis file name cannot be empty".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(StratusError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            missing_marker: default_missing_marker(),
            reanalysis_file: default_reanalysis_file(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            figure_dir: default_figure_dir(),
            save: false,
        }
    }
}

// Default value functions for serde
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_figure_dir() -> PathBuf {
    PathBuf::from("figures")
}

fn default_missing_marker() -> String {
    DEFAULT_MISSING_MARKER.to_string()
}

fn default_reanalysis_file() -> String {
    DEFAULT_REANALYSIS_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

use std::path::PathBuf;

use thiserror::Error;

use crate::chart::animation::{DEFAULT_SAMPLE_CAP, DEFAULT_SAMPLE_SEED};

pub const DEFAULT_DATASET: &str = "vehicles_us.csv";
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

const ENV_DATA: &str = "VEHICLE_DASH_DATA";
const ENV_SAMPLE_CAP: &str = "VEHICLE_DASH_SAMPLE_CAP";
const ENV_SEED: &str = "VEHICLE_DASH_SEED";
const ENV_BINS: &str = "VEHICLE_DASH_BINS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid number")]
    InvalidNumber { var: &'static str, value: String },
}

/// Runtime settings. Defaults reproduce the stock dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    /// Maximum rows in the animated scatter.
    pub sample_cap: usize,
    pub sample_seed: u64,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            sample_cap: DEFAULT_SAMPLE_CAP,
            sample_seed: DEFAULT_SAMPLE_SEED,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl AppConfig {
    /// Read overrides from the process environment and command line.
    /// The first positional argument, if any, is the dataset path.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|var| std::env::var(var).ok())?;
        if let Some(path) = std::env::args_os().nth(1) {
            config.dataset_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Apply overrides from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_DATA).filter(|p| !p.trim().is_empty()) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(cap) = parse_var(&lookup, ENV_SAMPLE_CAP)? {
            config.sample_cap = cap;
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            config.sample_seed = seed;
        }
        if let Some(bins) = parse_var::<usize>(&lookup, ENV_BINS)? {
            config.histogram_bins = bins.max(1);
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use common::types::Instrument;

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    pub start_vertex: Instrument,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    pub buffer_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub snapshots: usize,
    pub interval_ms: u64,
    pub rate_fluctuation_bps: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub precision: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub detector: DetectorConfig,
    pub pipeline: PipelineConfig,
    pub simulator: SimulatorConfig,
    pub report: ReportConfig,
}

impl Config {
    fn validate(&self) -> Result<(), Error> {
        if self.pipeline.buffer_size == 0 {
            return Err(Error::ConfigLoadError(
                "pipeline.buffer_size must be at least 1".to_string(),
            ));
        }

        let bps = self.simulator.rate_fluctuation_bps;
        if !(0.0..10_000.0).contains(&bps) {
            return Err(Error::ConfigLoadError(format!(
                "simulator.rate_fluctuation_bps must be in [0, 10000), got {}",
                bps
            )));
        }

        Ok(())
    }
}

/// Default location, relative to the workspace root.
fn default_config_path() -> Result<PathBuf, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    Ok(base_path.join("crates").join("scanner").join("Config.toml"))
}

/// Loads configuration from a file and `SCANNER_*` environment variables.
///
/// Nested keys use `__`, e.g. `SCANNER_DETECTOR__START_VERTEX=2`.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let config_file_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("SCANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    app_config.validate()?;

    Ok(app_config)
}

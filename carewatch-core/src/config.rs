use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::CarewatchResult;
use crate::grid::{MAX_GRID_SIZE, MIN_GRID_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CarewatchConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_grid_size")]
    pub default_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_size: default_grid_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl CarewatchConfig {
    /// Load configuration from an optional `carewatch.toml` in the working
    /// directory plus a `CAREWATCH_`-prefixed environment overlay
    /// (e.g. `CAREWATCH_API__BASE_URL`).
    pub fn load() -> CarewatchResult<Self> {
        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("carewatch").required(false))
            .add_source(Environment::with_prefix("CAREWATCH").separator("__"))
            .build()?;

        let mut loaded: CarewatchConfig = builder.try_deserialize()?;
        loaded.grid.default_size = loaded.grid.default_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        Ok(loaded)
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_grid_size() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

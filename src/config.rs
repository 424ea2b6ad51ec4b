use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// First date requested from the data source. The end date is always today.
pub const START_DATE: &str = "2020-01-01";
pub const ROLLING_CORRELATION_WINDOW: usize = 60;
pub const ROLLING_VOLATILITY_WINDOW: usize = 30;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub const HEAD_ROWS: usize = 5;
pub const ROLLING_CORRELATION_TAIL: usize = 10;
pub const ROLLING_VOLATILITY_TAIL: usize = 5;

pub const VISUALS_DIR: &str = "visuals";
pub const DATA_DIR: &str = "data";
pub const GOLD_PRICE_CHART: &str = "gold_price.png";
pub const ROLLING_CORRELATION_CHART: &str = "rolling_correlation.png";
pub const ROLLING_VOLATILITY_CHART: &str = "rolling_volatility.png";
pub const PRICES_CSV: &str = "prices.csv";
pub const RETURNS_CSV: &str = "returns.csv";
pub const CONFIG_FILE: &str = "config.json";

/// Directory of the crate; config and outputs are both resolved from here.
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Location of the optional runtime config, independent of the working directory.
pub fn config_path() -> PathBuf {
    project_root().join(CONFIG_FILE)
}

/// Runtime settings. Instruments, dates and windows are constants above.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_root: PathBuf,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_root: project_root(),
            request_timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) GoldMacroAnalysis/0.1".to_string(),
        }
    }
}

impl AppConfig {
    pub fn visuals_dir(&self) -> PathBuf {
        self.output_root.join(VISUALS_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.output_root.join(DATA_DIR)
    }
}

/// Loads `path` if it exists, otherwise falls back to defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

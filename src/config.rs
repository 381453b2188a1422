//! Configuration loading and validation.
//!
//! Configuration is a single TOML file (default `./config/krishi.toml`).
//! Relative dataset paths are resolved against the directory containing the
//! config file, so a config can travel with its data.
//!
//! ```toml
//! [data]
//! crops_csv = "data/crops.csv"
//! schemes_csv = "data/schemes.csv"
//!
//! [advisory]
//! state = "Uttarakhand"
//! top_crops = 10
//!
//! [retrieval]
//! max_results = 5
//!
//! [web]
//! instance_url = "http://localhost:8080"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use krishi_context_core::rank::DEFAULT_TOP_CROPS;
use krishi_context_core::schemes::DEFAULT_STATE;
use krishi_context_core::search::DEFAULT_MAX_RESULTS;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub web: Option<WebConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub crops_csv: PathBuf,
    pub schemes_csv: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisoryConfig {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_top_crops")]
    pub top_crops: usize,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            state: default_state(),
            top_crops: default_top_crops(),
        }
    }
}

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}
fn default_top_crops() -> usize {
    DEFAULT_TOP_CROPS
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// SearXNG instance used for market and cultivation-pattern lookups.
#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub instance_url: String,
    #[serde(default = "default_web_max_results")]
    pub max_results: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between consecutive queries, to stay under instance rate limits.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_web_max_results() -> usize {
    10
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_delay_ms() -> u64 {
    500
}
fn default_region() -> String {
    DEFAULT_STATE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.advisory.top_crops == 0 {
        bail!("advisory.top_crops must be >= 1");
    }
    if config.advisory.state.trim().is_empty() {
        bail!("advisory.state must not be empty");
    }
    if config.retrieval.max_results == 0 {
        bail!("retrieval.max_results must be >= 1");
    }
    if let Some(web) = &config.web {
        if web.instance_url.trim().is_empty() {
            bail!("web.instance_url must not be empty");
        }
        if web.max_results == 0 {
            bail!("web.max_results must be >= 1");
        }
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.data.crops_csv = resolve(base, &config.data.crops_csv);
    config.data.schemes_csv = resolve(base, &config.data.schemes_csv);

    Ok(config)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

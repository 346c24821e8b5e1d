use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub enable_tracing: bool,
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Replay driver paths (input operation stream, output snapshot dir)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReplayConfig {
    pub input: String,
    pub output_dir: String,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: "fixtures/trades.csv".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", config_path))
    }
}

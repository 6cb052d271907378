use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GuardError;

/// Default file consulted before `BIORISK_*` environment variables
pub const DEFAULT_CONFIG_FILE: &str = "biorisk.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub node_id: String,
    pub server_host: String,
    pub server_port: u16,
    pub alert_threshold: f64,
    pub signatories: Vec<String>,
    pub assessor: AssessorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessorConfig {
    /// Remote assessment endpoint; the mock assessor alone is used when unset
    pub remote_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Fixed seed for reproducible mock scores
    pub mock_seed: Option<u64>,
}

impl AssessorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: "guard-01".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            alert_threshold: 7.0,
            signatories: vec![
                "Risk Analyst Agent".to_string(),
                "Compliance Agent".to_string(),
            ],
            assessor: AssessorConfig {
                remote_url: None,
                api_key: None,
                timeout_secs: 15,
                mock_seed: None,
            },
        }
    }
}

impl AppConfig {
    /// Load `biorisk.toml` (optional) overlaid by the environment
    pub fn load() -> Result<Self, GuardError> {
        let path = std::env::var("BIORISK_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Nested keys use a double underscore, e.g. `BIORISK_ASSESSOR__REMOTE_URL`
    pub fn load_from(path: &str) -> Result<Self, GuardError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;

        let config: AppConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("BIORISK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("signatories")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        info!("Configuration loaded for node {}", config.node_id);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GuardError> {
        if self.node_id.trim().is_empty() {
            return Err(GuardError::ConfigError("node_id cannot be empty".to_string()));
        }

        if !(0.0..=10.0).contains(&self.alert_threshold) {
            return Err(GuardError::ConfigError(format!(
                "alert_threshold ({}) must be between 0.0 and 10.0",
                self.alert_threshold
            )));
        }

        if self.assessor.timeout_secs == 0 {
            return Err(GuardError::ConfigError(
                "assessor.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(url) = &self.assessor.remote_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(GuardError::ConfigError(format!(
                    "assessor.remote_url ({}) must be an http(s) URL",
                    url
                )));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

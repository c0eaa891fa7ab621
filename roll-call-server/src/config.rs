use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::error::{Result, RollCallError};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the TrueNAS API, read once at startup.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| RollCallError::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Config =
            serde_json::from_str(&content).map_err(|source| RollCallError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(RollCallError::InvalidConfig("api_url must not be empty".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(RollCallError::InvalidConfig("api_key must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(RollCallError::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

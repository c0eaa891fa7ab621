use reqwest::Client;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{Result, RollCallError};
use crate::jail::{decode_jails, Jail};

/// Client for the TrueNAS jail listing endpoint.
#[derive(Clone)]
pub struct TrueNasClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl TrueNasClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches every jail on the host. Addresses come back with the
    /// interface prefix already stripped.
    pub async fn fetch_jails(&self) -> Result<Vec<Jail>> {
        debug!("Fetching jails: {}", self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", self.api_url, e);
                RollCallError::Network(e)
            })?;

        if !response.status().is_success() {
            error!("TrueNAS API returned {}", response.status());
            return Err(RollCallError::UpstreamStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response from {}: {}", self.api_url, e);
            RollCallError::Network(e)
        })?;
        let jails = decode_jails(&body).map_err(|e| {
            error!("Failed to decode jail list: {}", e);
            RollCallError::Decode(e)
        })?;

        debug!("Fetched {} jails", jails.len());
        Ok(jails)
    }
}

//! HTTP client for BMRB and PDBe resources

use crate::config::BmrbHttpConfig;
use bmrb_common::types::{PdbCode, RecordId};
use bmrb_common::{BmrbError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over a configured `reqwest::Client`
///
/// Every fetch returns the response body as text. Transport failures and
/// non-success statuses both surface as [`BmrbError::Network`].
#[derive(Debug, Clone)]
pub struct BmrbClient {
    client: Client,
    config: BmrbHttpConfig,
}

impl BmrbClient {
    pub fn new(config: BmrbHttpConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BmrbError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BmrbHttpConfig {
        &self.config
    }

    /// GET `url` and return the body as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BmrbError::network(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BmrbError::network(url, format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BmrbError::network(url, e.to_string()))?;

        debug!(url = %url, bytes = body.len(), "Fetched");
        Ok(body)
    }

    pub async fn fetch_avs_report(&self, id: &RecordId) -> Result<String> {
        self.fetch_text(&self.config.avs_report_url(id)).await
    }

    pub async fn fetch_summary_page(&self, id: &RecordId) -> Result<String> {
        self.fetch_text(&self.config.summary_url(id)).await
    }

    pub async fn fetch_pdb_entry(&self, code: &PdbCode) -> Result<String> {
        self.fetch_text(&self.config.pdb_entry_url(code)).await
    }
}

//! HTTP configuration for BMRB and PDBe endpoints

use bmrb_common::types::{PdbCode, RecordId};
use bmrb_common::{BmrbError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Defaults
// ============================================================================

/// BMRB query grid: entries with carbon shifts on polypeptide(L) chains
pub const DEFAULT_SEARCH_URL: &str = "https://bmrb.io/search/query_grid/?data_types%5B%5D=carbon_shifts&polymers%5B%5D=polypeptide%28L%29&polymer_join_type=OR";

pub const DEFAULT_BMRB_BASE_URL: &str = "https://bmrb.io";

pub const DEFAULT_PDBE_BASE_URL: &str = "https://www.ebi.ac.uk";

/// Per-request timeout. Can be overridden via BMRB_TIMEOUT_SECS.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for BMRB / PDBe HTTP access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrbHttpConfig {
    /// Base URL for BMRB entry directories and summary pages
    pub bmrb_base_url: String,

    /// Base URL for PDBe coordinate files
    pub pdbe_base_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for BmrbHttpConfig {
    fn default() -> Self {
        Self {
            bmrb_base_url: DEFAULT_BMRB_BASE_URL.to_string(),
            pdbe_base_url: DEFAULT_PDBE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("bmrb-ingest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BmrbHttpConfig {
    pub fn builder() -> BmrbHttpConfigBuilder {
        BmrbHttpConfigBuilder::default()
    }

    /// Load config from environment variables
    ///
    /// - `BMRB_BASE_URL`
    /// - `PDBE_BASE_URL`
    /// - `BMRB_TIMEOUT_SECS`
    /// - `BMRB_USER_AGENT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("BMRB_BASE_URL") {
            config.bmrb_base_url = url;
        }

        if let Ok(url) = std::env::var("PDBE_BASE_URL") {
            config.pdbe_base_url = url;
        }

        if let Ok(secs) = std::env::var("BMRB_TIMEOUT_SECS") {
            config.timeout_secs = secs.parse().map_err(|_| {
                BmrbError::config(format!("BMRB_TIMEOUT_SECS must be an integer, got '{}'", secs))
            })?;
        }

        if let Ok(agent) = std::env::var("BMRB_USER_AGENT") {
            config.user_agent = agent;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bmrb_base_url.trim().is_empty() {
            return Err(BmrbError::config("BMRB base URL cannot be empty"));
        }

        if self.pdbe_base_url.trim().is_empty() {
            return Err(BmrbError::config("PDBe base URL cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(BmrbError::config("Timeout must be greater than 0"));
        }

        Ok(())
    }

    /// AVS validation report for an entry
    pub fn avs_report_url(&self, id: &RecordId) -> String {
        format!(
            "{}/ftp/pub/bmrb/entry_directories/bmr{}/validation/AVS_full.txt",
            self.bmrb_base_url.trim_end_matches('/'),
            id
        )
    }

    /// Entry summary page listing related PDB structures
    pub fn summary_url(&self, id: &RecordId) -> String {
        format!(
            "{}/data_library/summary/index.php?bmrbId={}",
            self.bmrb_base_url.trim_end_matches('/'),
            id
        )
    }

    /// PDB-format coordinate file, e.g. `pdb1abc.ent`
    pub fn pdb_entry_url(&self, code: &PdbCode) -> String {
        format!(
            "{}/pdbe/entry-files/pdb{}.ent",
            self.pdbe_base_url.trim_end_matches('/'),
            code.as_str().to_lowercase()
        )
    }
}

/// Builder for BmrbHttpConfig
#[derive(Default)]
pub struct BmrbHttpConfigBuilder {
    config: BmrbHttpConfig,
}

impl BmrbHttpConfigBuilder {
    pub fn bmrb_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.bmrb_base_url = url.into();
        self
    }

    pub fn pdbe_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.pdbe_base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> BmrbHttpConfig {
        self.config
    }
}

//! DNS Records Configuration
//!
//! Settings for building and publishing DNS record snapshots.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::encoder::AzIndex;
use crate::types::DEFAULT_DOMAIN;

/// Main configuration for the snapshot publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecordsConfig {
    /// Domain for placements that do not name one
    pub default_domain: String,

    /// Publish an extra `<index>.<group>...` name per placement
    pub include_index_records: bool,

    /// Known AZ names; position determines the encoded id (from 1)
    pub az_names: Vec<String>,

    /// Where the snapshot file is written
    pub output_path: PathBuf,

    /// Interval between publications in watch mode (seconds)
    pub publish_interval_secs: u64,
}

impl Default for DnsRecordsConfig {
    fn default() -> Self {
        Self {
            default_domain: DEFAULT_DOMAIN.to_string(),
            include_index_records: false,
            az_names: vec![],
            output_path: PathBuf::from("./data/records.json"),
            publish_interval_secs: 30,
        }
    }
}

impl DnsRecordsConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // Builder-style methods for CLI overrides

    pub fn with_output_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.output_path = path;
        }
        self
    }

    pub fn with_include_index_records(mut self, include: bool) -> Self {
        self.include_index_records |= include;
        self
    }

    pub fn with_default_domain(mut self, domain: Option<String>) -> Self {
        if let Some(domain) = domain {
            self.default_domain = domain;
        }
        self
    }

    /// AZ encoder table for this configuration
    pub fn az_index(&self) -> AzIndex {
        AzIndex::new(self.az_names.iter().cloned())
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_domain.is_empty() {
            anyhow::bail!("default_domain must not be empty");
        }

        let mut seen = HashSet::new();
        for az in &self.az_names {
            if az.is_empty() {
                anyhow::bail!("az_names must not contain empty names");
            }
            if !seen.insert(az.as_str()) {
                anyhow::bail!("az_names contains duplicate AZ {:?}", az);
            }
        }

        if self.publish_interval_secs == 0 {
            anyhow::bail!("publish_interval_secs must be greater than 0");
        }

        Ok(())
    }
}

use crate::app::chains;
use crate::cache::SweepConfig;
use crate::rpc::ClientSettings;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Client configuration, loaded from TOML. Every key is optional.
///
/// ```toml
/// chain = "xdc"
/// endpoint = "https://rpc.example.org"   # overrides the chain preset
/// timeout_ms = 30000
/// cache_ttl_ms = 300000
/// sweep_interval_ms = 60000
/// log_filter = "launchpad_rpc=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub endpoint: Option<String>,
    pub chain: String,
    pub timeout_ms: u64,
    pub cache_ttl_ms: u64,
    pub sweep_interval_ms: u64,
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            endpoint: None,
            chain: chains::XDC.key.to_string(),
            timeout_ms: settings.timeout.as_millis() as u64,
            cache_ttl_ms: settings.cache_ttl.as_millis() as u64,
            sweep_interval_ms: settings.sweep.every.as_millis() as u64,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("reading {}: {}", path.as_ref().display(), e))?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ClientConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(anyhow!("timeout_ms must be positive"));
        }
        if self.sweep_interval_ms == 0 {
            return Err(anyhow!("sweep_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Explicit endpoint, else the RPC URL of the configured chain.
    pub fn resolve_endpoint(&self) -> Result<String> {
        if let Some(url) = self.endpoint.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }
        chains::lookup(&self.chain)
            .map(|c| c.rpc_url.to_string())
            .ok_or_else(|| anyhow!("unknown chain '{}' and no endpoint configured", self.chain))
    }

    pub fn settings(&self) -> ClientSettings {
        // the sweep applies the same default ttl that cacheable calls fall back to
        let cache_ttl = Duration::from_millis(self.cache_ttl_ms);
        ClientSettings {
            timeout: Duration::from_millis(self.timeout_ms),
            cache_ttl,
            sweep: SweepConfig { every: Duration::from_millis(self.sweep_interval_ms), default_ttl: cache_ttl },
        }
    }
}

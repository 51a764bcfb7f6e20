//! Endpoint configuration for the external visualization services.
//!
//! The wizard talks to four services: a TiTiler instance for COGs, an
//! xarray-backed TiTiler for multidimensional data, the CMR search API and a
//! titiler-cmr deployment. Their base URLs and the request timeout are kept
//! in a small JSON file, with environment variables layered on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Environment variable names for overrides, applied in this order
pub const ENV_TITILER_URL: &str = "GEOVIZ_TITILER_URL";
pub const ENV_XARRAY_URL: &str = "GEOVIZ_XARRAY_URL";
pub const ENV_CMR_URL: &str = "GEOVIZ_CMR_URL";
pub const ENV_TITILER_CMR_URL: &str = "GEOVIZ_TITILER_CMR_URL";
pub const ENV_TIMEOUT_SECS: &str = "GEOVIZ_TIMEOUT_SECS";

const MAX_TIMEOUT_SECS: u64 = 300;

/// Service endpoints and HTTP settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// TiTiler base URL serving `/cog/*`
    pub titiler_url: String,
    /// TiTiler base URL serving `/md/*` (xarray reader)
    pub xarray_url: String,
    /// CMR base URL serving `/search/*`
    pub cmr_url: String,
    /// titiler-cmr base URL
    pub titiler_cmr_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            titiler_url: "https://titiler.xyz".to_string(),
            xarray_url: "https://titiler.xyz".to_string(),
            cmr_url: "https://cmr.earthdata.nasa.gov".to_string(),
            titiler_cmr_url: "https://staging.openveda.cloud/api/titiler-cmr".to_string(),
            timeout_secs: 15,
        }
    }
}

impl WizardConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Resolve the effective configuration: optional file, then environment
    /// overrides, then validation.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_TITILER_URL) {
            self.titiler_url = v;
        }
        if let Some(v) = lookup(ENV_XARRAY_URL) {
            self.xarray_url = v;
        }
        if let Some(v) = lookup(ENV_CMR_URL) {
            self.cmr_url = v;
        }
        if let Some(v) = lookup(ENV_TITILER_CMR_URL) {
            self.titiler_cmr_url = v;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number, got '{}'", ENV_TIMEOUT_SECS, v))?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.endpoints() {
            validate_base_url(name, value)?;
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            anyhow::bail!(
                "timeout_secs must be between 1 and {} (got {})",
                MAX_TIMEOUT_SECS,
                self.timeout_secs
            );
        }

        Ok(())
    }

    /// All configured base URLs with their field names
    pub fn endpoints(&self) -> [(&'static str, &str); 4] {
        [
            ("titiler_url", self.titiler_url.as_str()),
            ("xarray_url", self.xarray_url.as_str()),
            ("cmr_url", self.cmr_url.as_str()),
            ("titiler_cmr_url", self.titiler_cmr_url.as_str()),
        ]
    }

    pub fn titiler_base(&self) -> &str {
        self.titiler_url.trim().trim_end_matches('/')
    }

    pub fn xarray_base(&self) -> &str {
        self.xarray_url.trim().trim_end_matches('/')
    }

    pub fn cmr_base(&self) -> &str {
        self.cmr_url.trim().trim_end_matches('/')
    }

    pub fn titiler_cmr_base(&self) -> &str {
        self.titiler_cmr_url.trim().trim_end_matches('/')
    }
}

fn validate_base_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value.trim())
        .with_context(|| format!("{} is not a valid URL: '{}'", name, value))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        anyhow::bail!("{} must use http or https (got '{}')", name, url.scheme());
    }
    if url.host_str().is_none_or(str::is_empty) {
        anyhow::bail!("{} has no host: '{}'", name, value);
    }
    Ok(())
}

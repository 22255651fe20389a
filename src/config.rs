//! Gateway configuration helpers.
//!
//! The backend location is resolved from, in priority order:
//! 1. `--api-base-url` CLI flag
//! 2. `QUICKCRATE_API_BASE_URL` environment variable
//! 3. `api_base_url` in the config file (`--config`, or the user config dir)
//! 4. the built-in development default
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current schema version for `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:7270/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const API_BASE_URL_ENV: &str = "QUICKCRATE_API_BASE_URL";

pub const ADD_MERCHANT_PATH: &str = "/Merchant/AddMerchant";
pub const UPLOAD_DOCUMENT_PATH: &str = "/Upload/Document";

fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        default_config()
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }
}

pub fn default_config() -> GatewayConfig {
    GatewayConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        api_base_url: default_api_base_url(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
}

/// Render a pretty JSON config stub.
pub fn config_stub() -> String {
    let config = default_config();
    serde_json::to_string_pretty(&config).expect("serialize config stub")
}

/// `config.json` under the user's config directory, if one exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quickcrate").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<GatewayConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: GatewayConfig =
        serde_json::from_slice(&bytes).context("parse gateway config JSON")?;
    Ok(config)
}

/// Persist a config to disk in a stable JSON format.
pub fn write_config(path: &Path, config: &GatewayConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create config dir")?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize gateway config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &GatewayConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    let base = config.api_base_url.trim();
    if base.is_empty() {
        return Err(anyhow!("api_base_url must be non-empty"));
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(anyhow!(
            "api_base_url must start with http:// or https:// (got {base:?})"
        ));
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be greater than zero"));
    }
    Ok(())
}

/// Resolve the effective config, reading the environment for overrides.
pub fn resolve_config(
    config_path: Option<&Path>,
    base_url_flag: Option<&str>,
) -> Result<GatewayConfig> {
    let env_base_url = std::env::var(API_BASE_URL_ENV).ok();
    resolve_config_from(config_path, base_url_flag, env_base_url.as_deref())
}

/// Resolve the effective config from explicit sources.
///
/// An explicit `config_path` must exist; the default location is optional.
pub fn resolve_config_from(
    config_path: Option<&Path>,
    base_url_flag: Option<&str>,
    env_base_url: Option<&str>,
) -> Result<GatewayConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => load_config(&path)?,
            None => default_config(),
        },
    };

    let override_url = base_url_flag
        .or(env_base_url)
        .map(str::trim)
        .filter(|url| !url.is_empty());
    if let Some(url) = override_url {
        config.api_base_url = url.to_string();
    }
    config.api_base_url = config.api_base_url.trim().trim_end_matches('/').to_string();

    validate_config(&config)?;
    tracing::debug!(api_base_url = %config.api_base_url, "resolved gateway config");
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

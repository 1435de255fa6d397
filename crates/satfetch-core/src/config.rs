use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry and timeout parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Per-request connect/idle timeout in seconds.
    pub request_timeout_secs: u64,
    /// Wait after a non-success HTTP status before the next attempt.
    pub cooldown_secs: u64,
    /// Hard wall-clock cap on one product transfer.
    pub download_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout_secs: 5,
            cooldown_secs: 1800,
            download_timeout_secs: 900,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            cooldown: Duration::from_secs(self.cooldown_secs),
        }
    }
}

/// Username/password pair for one hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

/// Global configuration loaded from `~/.config/satfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatfetchConfig {
    /// Results with a cloud cover above this percentage are not downloaded.
    pub max_cloud_cover: f64,
    /// Rows requested per search page (the hub serves at most 100).
    pub page_size: u32,
    /// Prefix length used to match processed outputs against product names.
    pub cropped_prefix_len: usize,
    /// Products whose name contains this marker produce two processed outputs.
    pub dual_output_marker: String,
    /// Candidates whose name contains any of these substrings are skipped.
    #[serde(default)]
    pub excluded_patterns: Vec<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Per-platform credentials, keyed by platform name (e.g. "Sentinel-2").
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialsConfig>,
}

impl Default for SatfetchConfig {
    fn default() -> Self {
        Self {
            max_cloud_cover: 90.0,
            page_size: 100,
            cropped_prefix_len: 31,
            dual_output_marker: "_SL_".to_string(),
            excluded_patterns: Vec::new(),
            retry: None,
            credentials: BTreeMap::new(),
        }
    }
}

impl SatfetchConfig {
    pub fn retry_or_default(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("satfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SatfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SatfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SatfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SatfetchConfig::default();
        assert_eq!(cfg.max_cloud_cover, 90.0);
        assert_eq!(cfg.page_size, 100);
        assert_eq!(cfg.cropped_prefix_len, 31);
        assert_eq!(cfg.dual_output_marker, "_SL_");
        assert!(cfg.excluded_patterns.is_empty());
        let retry = cfg.retry_or_default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.request_timeout_secs, 5);
        assert_eq!(retry.cooldown_secs, 1800);
        assert_eq!(retry.download_timeout_secs, 900);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SatfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SatfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.page_size, cfg.page_size);
        assert_eq!(parsed.cropped_prefix_len, cfg.cropped_prefix_len);
        assert_eq!(parsed.dual_output_marker, cfg.dual_output_marker);
    }

    #[test]
    fn config_toml_retry_and_credentials() {
        let toml = r#"
            max_cloud_cover = 40.0
            page_size = 50
            cropped_prefix_len = 20
            dual_output_marker = "_SL_"
            excluded_patterns = ["_T29TQE_"]

            [retry]
            max_attempts = 5
            request_timeout_secs = 10
            cooldown_secs = 60
            download_timeout_secs = 300

            [credentials.Sentinel-2]
            username = "alice"
            password = "secret"
        "#;
        let cfg: SatfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_cloud_cover, 40.0);
        assert_eq!(cfg.excluded_patterns, vec!["_T29TQE_".to_string()]);
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.policy().cooldown, Duration::from_secs(60));
        let creds = cfg.credentials.get("Sentinel-2").unwrap();
        assert_eq!(creds.username, "alice");
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        let retry = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(retry.policy().max_attempts, 1);
    }
}

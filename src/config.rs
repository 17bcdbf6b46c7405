//! Configuration file handling.
//!
//! Settings live in `<config_dir>/calcdeck/config.toml`. Every key is
//! optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which compute service the calculator talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The JSON service at `api_url`.
    #[default]
    Http,
    /// The in-process service.
    Local,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend: Backend,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_path) else {
            info!("no config directory, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(path = %path.display(), backend = ?config.backend, "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML configuration.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.api_url = config.api_url.trim().trim_end_matches('/').to_string();

        if config.api_url.is_empty() {
            bail!("api_url must not be empty");
        }
        if config.timeout_secs == 0 {
            bail!("timeout_secs must be greater than 0");
        }
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, api_url: Option<&str>, local: bool) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.trim_end_matches('/').to_string();
            self.backend = Backend::Http;
        }
        if local {
            self.backend = Backend::Local;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `<config_dir>/calcdeck/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("calcdeck").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_all_keys() {
        let config = Config::parse(
            r#"
            backend = "local"
            api_url = "https://calc.example.com/"
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.api_url, "https://calc.example.com");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Config::parse("timeout_secs = 0").is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Config::parse(r#"backend = "grpc""#).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("colour = true").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some("http://10.0.0.2:9000/"), false);
        assert_eq!(config.api_url, "http://10.0.0.2:9000");
        assert_eq!(config.backend, Backend::Http);

        let config = Config::parse(r#"backend = "http""#)
            .unwrap()
            .with_overrides(None, true);
        assert_eq!(config.backend, Backend::Local);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend = \"local\"\ntimeout_secs = 2\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}

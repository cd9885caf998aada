use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ENV_API_URL: &str = "SHOPDASH_API_URL";
pub const ENV_DATA_DIR: &str = "SHOPDASH_DATA_DIR";
pub const ENV_TOKEN: &str = "SHOPDASH_TOKEN";

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_DATA_DIR: &str = ".shopdash";

/// Runtime settings, read from an optional TOML file and then overridden by
/// `SHOPDASH_*` environment variables.
///
/// ```toml
/// api_base_url = "https://shop.example.com/api"
/// data_dir = "/var/lib/shopdash"
/// persist_key = "root"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub persist_key: String,
    pub bearer_token: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            persist_key: crate::app_store::DEFAULT_PERSIST_KEY.to_string(),
            bearer_token: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()
    }

    /// Loads `path` when it exists, otherwise starts from defaults. Environment
    /// overrides are applied in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) if path.exists() => {
                debug!(path = ?path, "reading config file");
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| DashboardError::Config(format!("{}: {e}", path.display())))?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                info!(path = ?path, "config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config
            .with_overrides(|key| std::env::var(key).ok())
            .validate()
    }

    /// Applies overrides from `lookup`, which maps an environment variable name
    /// to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            info!(url = %url, "api url overridden from environment");
            self.api_base_url = url;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            info!(dir = %dir, "data dir overridden from environment");
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|token| !token.is_empty()) {
            self.bearer_token = Some(token);
        }
        self
    }

    fn validate(self) -> Result<Self> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashboardError::Config(format!(
                "api_base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.persist_key.trim().is_empty() {
            return Err(DashboardError::Config("persist_key must not be empty".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default().validate().unwrap();
        assert_eq!(config.persist_key, "root");
        assert_eq!(config.bearer_token, None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml_str(r#"api_base_url = "https://shop.example.com/api""#)
            .unwrap();
        assert_eq!(config.api_base_url, "https://shop.example.com/api");
        assert_eq!(config.data_dir, PathBuf::from(".shopdash"));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = DashboardConfig::from_toml_str(r#"api_base_url = "ftp://x""#).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));

        let err = DashboardConfig::from_toml_str("api_base_url = [").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://10.0.0.2:9000"),
            (ENV_DATA_DIR, "/tmp/dash"),
            (ENV_TOKEN, ""),
        ]);
        let config = DashboardConfig::default()
            .with_overrides(|key| env.get(key).map(|value| value.to_string()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dash"));
        assert_eq!(config.bearer_token, None);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.persist_key, "root");
    }
}

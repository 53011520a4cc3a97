use crate::domain::model::WatchUrl;
use crate::domain::ports::ConfigProvider;
use crate::drivers::DriverKind;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_nickname, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_refresh_interval() -> u64 {
    30
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_worker_addr() -> String {
    // matches the worker's default listen address
    "127.0.0.1:3080".to_string()
}

/// Resolved runtime configuration, loadable from a TOML file or built from
/// command-line arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub urls: Vec<WatchUrl>,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub driver: DriverKind,

    #[serde(default)]
    pub worker: WorkerConfig,

    /// External command for the browser driver, invoked as
    /// `<cmd> <url> <html_file> <png_file>`.
    pub scrape_cmd: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_worker_addr")]
    pub addr: String,

    /// Command used to launch the background fetch worker. When set together
    /// with the remote driver, the worker is spawned and supervised.
    pub command: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            addr: default_worker_addr(),
            command: None,
        }
    }
}

impl WatchConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WatchConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<()> {
        if self.urls.is_empty() {
            return Err(crate::utils::error::WatchError::MissingConfigError {
                field: "urls".to_string(),
            });
        }

        for watch_url in &self.urls {
            validate_url("urls", &watch_url.url)?;
            validate_nickname("nickname", &watch_url.nickname)?;
        }

        validate_path("data_dir", &self.data_dir)?;
        validate_positive_number("refresh_interval", self.refresh_interval, 1)?;
        validate_non_empty_string("worker.addr", &self.worker.addr)?;

        if self.driver == DriverKind::Browser && self.scrape_cmd.is_none() {
            return Err(crate::utils::error::WatchError::MissingConfigError {
                field: "scrape_cmd".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for WatchConfig {
    fn watch_urls(&self) -> &[WatchUrl] {
        &self.urls
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            refresh_interval = 60
            data_dir = "snapshots"
            driver = "remote"
            scrape_cmd = "/usr/local/bin/scrape.js"

            [worker]
            addr = "127.0.0.1:4000"
            command = "fetch-worker"

            [[urls]]
            url = "https://shop.example.com/item/42"
            nickname = "gpu"
        "#;

        let config: WatchConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.refresh_interval, 60);
        assert_eq!(config.data_dir, "snapshots");
        assert_eq!(config.driver, DriverKind::Remote);
        assert_eq!(config.worker.addr, "127.0.0.1:4000");
        assert_eq!(config.worker.command.as_deref(), Some("fetch-worker"));
        assert_eq!(config.urls.len(), 1);
        assert_eq!(config.urls[0].nickname, "gpu");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let raw = r#"
            [[urls]]
            url = "https://example.com/"
            nickname = "home"
        "#;

        let config: WatchConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.refresh_interval, 30);
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.driver, DriverKind::Http);
        assert_eq!(config.worker.addr, "127.0.0.1:3080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_urls() {
        let config = WatchConfig {
            urls: vec![],
            refresh_interval: 30,
            data_dir: "data".to_string(),
            driver: DriverKind::Http,
            worker: WorkerConfig::default(),
            scrape_cmd: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_browser_requires_scrape_cmd() {
        let config = WatchConfig {
            urls: vec![WatchUrl::new("https://example.com/", "home")],
            refresh_interval: 30,
            data_dir: "data".to_string(),
            driver: DriverKind::Browser,
            worker: WorkerConfig::default(),
            scrape_cmd: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_traversal_nickname() {
        // TOML nicknames arrive verbatim; a path-shaped one must never
        // reach the snapshot store
        let raw = r#"
            [[urls]]
            url = "https://example.com/"
            nickname = "../escape"
        "#;

        let config: WatchConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());

        let raw = r#"
            [[urls]]
            url = "https://example.com/"
            nickname = "nested/name"
        "#;

        let config: WatchConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = WatchConfig {
            urls: vec![WatchUrl::new("ftp://example.com/", "home")],
            refresh_interval: 30,
            data_dir: "data".to_string(),
            driver: DriverKind::Http,
            worker: WorkerConfig::default(),
            scrape_cmd: None,
        };
        assert!(config.validate().is_err());
    }
}

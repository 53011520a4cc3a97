pub mod browser;
pub mod http;
pub mod remote;

pub use browser::BrowserDriver;
pub use http::HttpDriver;
pub use remote::RemoteDriver;

use crate::config::WatchConfig;
use crate::domain::ports::Driver;
use crate::utils::error::{Result, WatchError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// page loads on slow storefronts routinely take this long
const MIN_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Http,
    Browser,
    Remote,
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverKind::Http => write!(f, "http"),
            DriverKind::Browser => write!(f, "browser"),
            DriverKind::Remote => write!(f, "remote"),
        }
    }
}

/// Every driver the config allows, constructed once up front.
pub struct DriverRepo {
    pub http: Arc<HttpDriver>,
    pub browser: Option<Arc<BrowserDriver>>,
    pub remote: Arc<RemoteDriver>,
}

impl DriverRepo {
    pub fn select(&self, kind: DriverKind) -> Result<Arc<dyn Driver>> {
        match kind {
            DriverKind::Http => Ok(self.http.clone()),
            DriverKind::Remote => Ok(self.remote.clone()),
            DriverKind::Browser => match &self.browser {
                Some(driver) => Ok(driver.clone()),
                None => Err(WatchError::MissingConfigError {
                    field: "scrape_cmd".to_string(),
                }),
            },
        }
    }
}

/// Build the driver repo: create the snapshot directory and share one fetch
/// timeout across drivers, never shorter than the refresh interval.
pub fn init_drivers(config: &WatchConfig) -> Result<DriverRepo> {
    std::fs::create_dir_all(&config.data_dir)?;

    let timeout = fetch_timeout(config.refresh_interval);

    let browser = match &config.scrape_cmd {
        Some(cmd) => Some(Arc::new(BrowserDriver::new(cmd, &config.data_dir)?)),
        None => None,
    };

    Ok(DriverRepo {
        http: Arc::new(HttpDriver::new(timeout)?),
        browser,
        remote: Arc::new(RemoteDriver::new(config.worker.addr.clone(), timeout)),
    })
}

fn fetch_timeout(refresh_interval_secs: u64) -> Duration {
    Duration::from_secs(refresh_interval_secs.max(MIN_FETCH_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkerConfig;
    use crate::domain::model::WatchUrl;

    fn config_in(dir: &std::path::Path) -> WatchConfig {
        WatchConfig {
            urls: vec![WatchUrl::new("https://example.com/", "home")],
            refresh_interval: 5,
            data_dir: dir.join("data").to_string_lossy().into_owned(),
            driver: DriverKind::Http,
            worker: WorkerConfig::default(),
            scrape_cmd: None,
        }
    }

    #[test]
    fn test_fetch_timeout_floor() {
        // short refresh intervals must not starve slow page loads
        assert_eq!(fetch_timeout(5), Duration::from_secs(15));
        assert_eq!(fetch_timeout(15), Duration::from_secs(15));
        assert_eq!(fetch_timeout(60), Duration::from_secs(60));
    }

    #[test]
    fn test_init_creates_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = config_in(tmp.path());

        let repo = init_drivers(&config).unwrap();
        assert!(std::path::Path::new(&config.data_dir).is_dir());
        assert!(repo.browser.is_none());
    }

    #[test]
    fn test_select_browser_without_scrape_cmd_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let repo = init_drivers(&config_in(tmp.path())).unwrap();

        assert!(repo.select(DriverKind::Http).is_ok());
        assert!(repo.select(DriverKind::Remote).is_ok());
        assert!(matches!(
            repo.select(DriverKind::Browser),
            Err(WatchError::MissingConfigError { .. })
        ));
    }
}

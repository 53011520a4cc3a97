pub mod toml_config;

pub use toml_config::{WatchConfig, WorkerConfig};

use crate::domain::model::WatchUrl;
use crate::drivers::DriverKind;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "pagewatch")]
#[command(about = "Fetch and snapshot web pages through pluggable drivers")]
pub struct CliConfig {
    /// Pages to watch, as `nickname=URL` or bare URLs. Ignored when --config is given.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Path to a TOML configuration file (takes precedence over other flags)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Fetch driver to use
    #[arg(long, value_enum, default_value_t = DriverKind::Http)]
    pub driver: DriverKind,

    /// Directory for page snapshots
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Seconds between fetch rounds
    #[arg(long, default_value = "30")]
    pub refresh_interval: u64,

    /// Address of the fetch worker (remote driver)
    #[arg(long, default_value = "127.0.0.1:3080")]
    pub worker_addr: String,

    /// Command used to launch and supervise the fetch worker (remote driver)
    #[arg(long)]
    pub worker_cmd: Option<String>,

    /// External scrape command for the browser driver
    #[arg(long)]
    pub scrape_cmd: Option<String>,

    /// Fetch every page once and exit
    #[arg(long)]
    pub once: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolve into a `WatchConfig`: load the TOML file when given, otherwise
    /// build one from the flags and positional URLs.
    pub fn into_watch_config(self) -> Result<WatchConfig> {
        if let Some(path) = &self.config {
            return WatchConfig::from_file(path);
        }

        let urls = self
            .urls
            .iter()
            .map(|spec| WatchUrl::from_spec(spec))
            .collect::<Result<Vec<_>>>()?;

        Ok(WatchConfig {
            urls,
            refresh_interval: self.refresh_interval,
            data_dir: self.data_dir,
            driver: self.driver,
            worker: WorkerConfig {
                addr: self.worker_addr,
                command: self.worker_cmd,
            },
            scrape_cmd: self.scrape_cmd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli(urls: Vec<&str>) -> CliConfig {
        CliConfig {
            urls: urls.into_iter().map(String::from).collect(),
            config: None,
            driver: DriverKind::Http,
            data_dir: "data".to_string(),
            refresh_interval: 30,
            worker_addr: "127.0.0.1:3080".to_string(),
            worker_cmd: None,
            scrape_cmd: None,
            once: false,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_urls_resolve() {
        let cli = base_cli(vec!["gpu=https://shop.example.com/item/42"]);
        let config = cli.into_watch_config().unwrap();
        assert_eq!(config.urls.len(), 1);
        assert_eq!(config.urls[0].nickname, "gpu");
    }

    #[test]
    fn test_cli_invalid_url_fails() {
        let cli = base_cli(vec!["nonsense"]);
        assert!(cli.into_watch_config().is_err());
    }
}

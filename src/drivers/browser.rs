use crate::domain::model::{HttpGetResponse, WatchUrl};
use crate::domain::ports::Driver;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Fetches through an external headless-browser script, invoked per page as
/// `<cmd> <url> <html_file> <png_file>`. The script writes both artifacts;
/// the HTML one is read back as the response body.
pub struct BrowserDriver {
    script_path: PathBuf,
    data_dir: PathBuf,
}

impl BrowserDriver {
    pub fn new(script_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let script_path = script_path.into();
        if !script_path.exists() {
            return Err(WatchError::DriverError {
                message: format!("scrape command does not exist: {}", script_path.display()),
            });
        }
        Ok(Self {
            script_path,
            data_dir: data_dir.into(),
        })
    }
}

#[async_trait]
impl Driver for BrowserDriver {
    async fn get(&self, url: &WatchUrl) -> Result<HttpGetResponse> {
        let html_file = self.data_dir.join(format!("{}.html", url.nickname));
        let png_file = self.data_dir.join(format!("{}.png", url.nickname));

        let output = Command::new(&self.script_path)
            .arg(&url.url)
            .arg(&html_file)
            .arg(&png_file)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| WatchError::SpawnError {
                message: format!("{}: {}", self.script_path.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WatchError::DriverError {
                message: format!("scrape of {} failed: {}", url, stderr.trim()),
            });
        }

        let content =
            tokio::fs::read_to_string(&html_file)
                .await
                .map_err(|e| WatchError::DriverError {
                    message: format!("scrape artifact unreadable: {}: {}", html_file.display(), e),
                })?;

        // the script drives a real browser; status codes are not observable
        Ok(HttpGetResponse::new(content, url.url.clone(), None))
    }
}

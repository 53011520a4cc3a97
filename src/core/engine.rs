use crate::domain::ports::{ConfigProvider, Driver, SnapshotStore};
use crate::utils::error::{Result, WatchError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Default, Clone, Copy)]
pub struct FetchSummary {
    pub fetched: usize,
    pub failed: usize,
}

/// Drives fetch rounds: every configured page through the active driver,
/// snapshot on success, repeat on the refresh interval.
pub struct WatchEngine<S: SnapshotStore, C: ConfigProvider> {
    store: S,
    config: C,
    driver: Arc<dyn Driver>,
}

impl<S: SnapshotStore, C: ConfigProvider> WatchEngine<S, C> {
    pub fn new(store: S, config: C, driver: Arc<dyn Driver>) -> Self {
        Self {
            store,
            config,
            driver,
        }
    }

    pub async fn run_once(&self) -> Result<FetchSummary> {
        let mut summary = FetchSummary::default();

        for url in self.config.watch_urls() {
            match self.driver.get(url).await {
                Ok(response) => {
                    match response.status_code {
                        Some(code) => tracing::info!(
                            "fetched {} ({} bytes, status {})",
                            url.nickname,
                            response.text.len(),
                            code
                        ),
                        None => tracing::info!(
                            "fetched {} ({} bytes)",
                            url.nickname,
                            response.text.len()
                        ),
                    }
                    if !response.ok() {
                        tracing::warn!("{} answered with an error page", url);
                    }

                    let filename = format!("{}.html", url.nickname);
                    self.store
                        .write_file(&filename, response.text.as_bytes())
                        .await?;
                    summary.fetched += 1;
                }
                Err(e) => {
                    tracing::warn!("unable to fetch {}: {}", url, e);
                    summary.failed += 1;
                }
            }
        }

        if summary.fetched == 0 && summary.failed > 0 {
            return Err(WatchError::ProcessingError {
                message: format!("all {} pages failed to fetch", summary.failed),
            });
        }

        Ok(summary)
    }

    /// Run rounds until shutdown. In once mode a single round is run and its
    /// summary returned.
    pub async fn run(
        &self,
        once: bool,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<FetchSummary> {
        let interval = Duration::from_secs(self.config.refresh_interval_secs());
        let mut last = FetchSummary::default();

        loop {
            match self.run_once().await {
                Ok(summary) => {
                    tracing::info!(
                        "round complete: {} fetched, {} failed",
                        summary.fetched,
                        summary.failed
                    );
                    if once {
                        return Ok(summary);
                    }
                    last = summary;
                }
                Err(e) => {
                    if once {
                        return Err(e);
                    }
                    // a watcher rides out bad rounds; the next one may recover
                    tracing::error!("fetch round failed: {}", e);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => {
                    tracing::info!("stopping watch loop");
                    return Ok(last);
                }
            }
        }
    }
}

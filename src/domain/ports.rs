use crate::domain::model::{HttpGetResponse, WatchUrl};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A page-fetch backend. Object-safe so the engine can hold whichever driver
/// the config selected.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn get(&self, url: &WatchUrl) -> Result<HttpGetResponse>;
}

pub trait SnapshotStore: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn watch_urls(&self) -> &[WatchUrl];
    fn data_dir(&self) -> &str;
    fn refresh_interval_secs(&self) -> u64;
}

use crate::domain::model::{HttpGetResponse, WatchUrl};
use crate::domain::ports::Driver;
use crate::utils::error::{Result, WatchError};
use crate::worker::proto::{FetchRequest, FetchResponse};
use async_trait::async_trait;
use prost::Message;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

// extra room on top of the worker-side fetch timeout
const EXCHANGE_SLACK: Duration = Duration::from_secs(5);

/// Delegates fetching to the background worker over TCP. One connection per
/// request: write an encoded `FetchRequest`, half-close, read the
/// `FetchResponse` until EOF.
pub struct RemoteDriver {
    addr: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RemoteDriver {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            next_id: AtomicU64::new(1337),
        }
    }

    async fn exchange(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let mut stream =
            TcpStream::connect(&self.addr)
                .await
                .map_err(|e| WatchError::WorkerError {
                    message: format!("connect to {} failed: {}", self.addr, e),
                })?;

        stream.write_all(&request.encode_to_vec()).await?;
        // half-close signals end-of-request; the read side stays open
        stream.shutdown().await?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;

        let response = FetchResponse::decode(buf.as_slice())?;
        Ok(response)
    }
}

#[async_trait]
impl Driver for RemoteDriver {
    async fn get(&self, url: &WatchUrl) -> Result<HttpGetResponse> {
        let request = FetchRequest {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            url: url.url.clone(),
            timeout_secs: self.timeout.as_secs() as u32,
        };

        let response = tokio::time::timeout(self.timeout + EXCHANGE_SLACK, self.exchange(&request))
            .await
            .map_err(|_| WatchError::WorkerError {
                message: format!("worker at {} did not answer in time", self.addr),
            })??;

        if response.id != request.id {
            tracing::warn!(
                "worker answered request {} with id {}",
                request.id,
                response.id
            );
        }

        tracing::debug!(
            "got response with id {}, status_code: {}, data: <{} bytes>",
            response.id,
            response.status_code,
            response.data.len()
        );

        let status_code = match response.status_code {
            0 => None, // worker could not reach the page
            code => Some(code as u16),
        };

        if status_code.is_none() {
            return Err(WatchError::WorkerError {
                message: format!("worker could not fetch {}", url),
            });
        }

        Ok(HttpGetResponse::new(
            response.data,
            url.url.clone(),
            status_code,
        ))
    }
}

/// Poll until the worker's socket accepts connections, so a freshly spawned
/// worker is not raced by the first fetch round.
pub async fn wait_until_ready(addr: &str, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

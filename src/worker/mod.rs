//! The background fetch worker: a TCP server that fetches one URL per
//! connection on behalf of the remote driver.

pub mod proto;

use crate::drivers::http::USER_AGENT;
use crate::utils::error::Result;
use proto::{FetchRequest, FetchResponse};
use prost::Message;
use reqwest::Client;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;

pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

pub struct WorkerServer {
    listener: TcpListener,
    client: Client,
}

impl WorkerServer {
    /// Bind the listen socket up front so callers (and tests, via port 0)
    /// can read the bound address before serving.
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { listener, client })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("fetch worker listening on {}", self.listener.local_addr()?);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            // transient (EMFILE and friends); keep accepting
                            warn!("accept failed: {}", e);
                            continue;
                        }
                    };
                    let client = self.client.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(client, stream).await {
                            warn!("request from {} failed: {}", peer, e);
                        }
                    });
                }
                _ = shutdown.changed() => {
                    info!("fetch worker shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn handle_connection(client: Client, mut stream: TcpStream) -> Result<()> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;

    let request = FetchRequest::decode(buf.as_slice())?;
    debug!(
        "fetching {} for request {} (timeout {}s)",
        request.url, request.id, request.timeout_secs
    );

    let timeout = request_timeout(request.timeout_secs);

    let response = match client.get(&request.url).timeout(timeout).send().await {
        Ok(upstream) => {
            let status_code = upstream.status().as_u16() as u32;
            match upstream.text().await {
                Ok(data) => FetchResponse {
                    id: request.id,
                    status_code,
                    data,
                },
                // body cut short mid-transfer is still a failed fetch
                Err(e) => {
                    warn!("fetch of {} failed reading body: {}", request.url, e);
                    fetch_failed(request.id)
                }
            }
        }
        Err(e) => {
            warn!("fetch of {} failed: {}", request.url, e);
            fetch_failed(request.id)
        }
    };

    stream.write_all(&response.encode_to_vec()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn fetch_failed(id: u64) -> FetchResponse {
    FetchResponse {
        id,
        status_code: 0,
        data: String::new(),
    }
}

fn request_timeout(timeout_secs: u32) -> Duration {
    Duration::from_secs(
        (timeout_secs as u64).clamp(MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS),
    )
}

#[cfg(test)]
mod tests {
    use super::proto::{FetchRequest, FetchResponse};
    use super::request_timeout;
    use prost::Message;
    use std::time::Duration;

    #[test]
    fn test_request_timeout_is_clamped() {
        assert_eq!(request_timeout(0), Duration::from_secs(1));
        assert_eq!(request_timeout(30), Duration::from_secs(30));
        assert_eq!(request_timeout(600), Duration::from_secs(120));
    }

    #[test]
    fn test_zero_status_is_wire_default() {
        // an all-default response must still round-trip as "fetch failed"
        let response = FetchResponse::default();
        let decoded = FetchResponse::decode(response.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.status_code, 0);
    }

    #[test]
    fn test_request_decode_rejects_garbage() {
        assert!(FetchRequest::decode(&b"\xff\xff\xff\xff"[..]).is_err());
    }
}

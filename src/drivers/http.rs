use crate::domain::model::{HttpGetResponse, WatchUrl};
use crate::domain::ports::Driver;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::Client;
use std::time::Duration;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/90.0.4427.0 Safari/537.36";

/// Plain HTTP fetches. Cheapest driver; some storefronts block it.
pub struct HttpDriver {
    client: Client,
}

impl HttpDriver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Driver for HttpDriver {
    async fn get(&self, url: &WatchUrl) -> Result<HttpGetResponse> {
        let response = self
            .client
            .get(&url.url)
            .header(REFERER, "https://google.com")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("got response with status code {} for {}", status, url);
        }

        let final_url = response.url().to_string();
        let text = response.text().await?;

        Ok(HttpGetResponse::new(text, final_url, Some(status.as_u16())))
    }
}

//! reqwest-backed fetcher with a persistent cookie store.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{FetchError, Fetcher, UserAgent};

/// HTTP fetcher shared by every request of one crawl.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    request_delay: Duration,
}

impl HttpFetcher {
    /// Create a fetcher.
    /// - `user_agent_config`: see [`UserAgent::from_setting`]
    /// - `request_delay`: pause after every request
    pub fn new(
        timeout: Duration,
        request_delay: Duration,
        user_agent_config: Option<&str>,
    ) -> Result<Self, FetchError> {
        let user_agent = UserAgent::from_setting(user_agent_config);
        debug!("user agent: {}", user_agent.as_str());
        let client = Client::builder()
            .user_agent(user_agent.as_str())
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            request_delay,
        })
    }

    async fn pace(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(
            "GET {} -> {} ({} ms)",
            url,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            self.pace().await;
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        self.pace().await;
        Ok(text)
    }

    async fn post_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, FetchError> {
        let request_url =
            Url::parse_with_params(url, params).map_err(|source| FetchError::InvalidUrl {
                url: url.to_string(),
                source,
            })?;

        let start = Instant::now();
        let response = self.client.post(request_url).json(body).send().await?;
        let status = response.status();
        debug!(
            "POST {} -> {} ({} ms)",
            url,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        let text = response.text().await?;
        self.pace().await;

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            // Non-JSON error pages.
            Err(_) if !status.is_success() => Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(source) => Err(FetchError::InvalidJson {
                url: url.to_string(),
                source,
            }),
        }
    }
}

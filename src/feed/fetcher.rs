use crate::error::{IndexadaError, Result};
use crate::logging::{StructuredLogger, get_logger};
use std::time::Duration;

/// Source of raw feed text.
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Retrieve the full feed body from `url`
    async fn fetch(&self, url: &str) -> Result<String>;
}

const USER_AGENT: &str = "Mozilla/5.0";

/// HTTP feed fetcher with a bounded request time
pub struct HttpFeedFetcher {
    http: reqwest::Client,
    logger: StructuredLogger,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IndexadaError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            logger: get_logger("fetcher"),
        })
    }
}

#[async_trait::async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.logger.debug(&format!("Downloading feed from {}", url));
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexadaError::transport(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        self.logger
            .debug(&format!("Feed download complete ({} bytes)", body.len()));
        Ok(body)
    }
}

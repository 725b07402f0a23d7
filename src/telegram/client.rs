use crate::config::TelegramConfig;
use crate::error::{IndexadaError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::notifier::{DeliveryReport, Notifier, deliver_sequentially, resolve_recipients};
use crate::poller::UpdateSource;
use crate::telegram::types::{ApiResponse, Update};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Extra time the HTTP client allows beyond the long-poll timeout
const POLL_GRACE_SECONDS: u64 = 10;

/// Bot API client
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    default_recipients: Vec<String>,
    logger: StructuredLogger,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig, poll_timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_seconds + POLL_GRACE_SECONDS))
            .build()
            .map_err(|e| IndexadaError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.trim().to_string(),
            default_recipients: config.chat_ids.clone(),
            logger: get_logger("telegram"),
        })
    }

    /// Whether a bot token is available
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn default_recipients(&self) -> &[String] {
        &self.default_recipients
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .form(&[("chat_id", chat_id), ("text", text), ("parse_mode", "HTML")])
            .send()
            .await?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }

    pub async fn fetch_updates(&self, offset: i64, timeout_seconds: u64) -> Result<Vec<Update>> {
        let response = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", timeout_seconds.to_string()),
            ])
            .send()
            .await?;
        decode(response).await
    }
}

/// Unwrap the `{ok, result, description}` envelope
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
        if status.is_success() {
            IndexadaError::api(format!("Malformed response: {}", e))
        } else {
            IndexadaError::transport(format!("HTTP {}", status))
        }
    })?;

    if !envelope.ok {
        return Err(IndexadaError::api(
            envelope
                .description
                .unwrap_or_else(|| format!("request failed with HTTP {}", status)),
        ));
    }
    envelope
        .result
        .ok_or_else(|| IndexadaError::api("Response has no result"))
}

#[async_trait::async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, text: &str, recipients: Option<&[String]>) -> DeliveryReport {
        if !self.is_configured() {
            self.logger.warn("No bot token configured; message dropped");
            return DeliveryReport::default();
        }
        let targets = resolve_recipients(recipients, &self.default_recipients);
        if targets.is_empty() {
            self.logger.warn("No recipients configured; message dropped");
            return DeliveryReport::default();
        }

        let report = deliver_sequentially(targets, |chat_id| async move {
            self.send_message(&chat_id, text).await
        })
        .await;

        for (chat_id, reason) in &report.failed {
            self.logger
                .for_chat(chat_id)
                .error(&format!("Failed to send message: {}", reason));
        }
        self.logger.debug(&format!(
            "Delivered message to {}/{} chats",
            report.delivered.len(),
            report.attempted()
        ));
        report
    }
}

#[async_trait::async_trait]
impl UpdateSource for TelegramClient {
    async fn get_updates(&self, offset: i64, timeout_seconds: u64) -> Result<Vec<Update>> {
        if !self.is_configured() {
            return Err(IndexadaError::config("No bot token configured"));
        }
        self.fetch_updates(offset, timeout_seconds).await
    }

    fn is_available(&self) -> bool {
        self.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> TelegramConfig {
        TelegramConfig {
            token: token.to_string(),
            chat_ids: vec!["1".to_string()],
            api_base_url: "https://api.telegram.org/".to_string(),
        }
    }

    #[test]
    fn method_url_embeds_token() {
        let client = TelegramClient::new(&config("abc:123"), 30).unwrap();
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/botabc:123/getUpdates"
        );
    }

    #[tokio::test]
    async fn send_without_token_is_a_no_op() {
        let client = TelegramClient::new(&config(""), 30).unwrap();
        assert!(!client.is_configured());
        let report = client.send("hello", None).await;
        assert_eq!(report.attempted(), 0);
    }

    #[test]
    fn update_source_requires_token() {
        let without = TelegramClient::new(&config(""), 30).unwrap();
        assert!(!UpdateSource::is_available(&without));
        let with = TelegramClient::new(&config("abc:123"), 30).unwrap();
        assert!(UpdateSource::is_available(&with));
    }
}

//! Long-poll loop for inbound chat commands

use crate::config::PollerConfig;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::telegram::Update;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Provider of inbound updates
#[async_trait::async_trait]
pub trait UpdateSource: Send + Sync {
    /// Wait up to `timeout_seconds` for updates with id >= `offset`
    async fn get_updates(&self, offset: i64, timeout_seconds: u64) -> Result<Vec<Update>>;

    /// Whether the source can be polled at all; unavailable sources are never started
    fn is_available(&self) -> bool {
        true
    }
}

/// Consumer of inbound command text
#[async_trait::async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, text: &str, chat_id: &str);
}

/// Cursor-tracking poller; every update is delivered to the handler at most once
pub struct CommandPoller {
    source: Arc<dyn UpdateSource>,
    handler: Arc<dyn CommandHandler>,
    offset: i64,
    timeout_seconds: u64,
    retry_delay: Duration,
    logger: StructuredLogger,
}

impl CommandPoller {
    pub fn new(
        source: Arc<dyn UpdateSource>,
        handler: Arc<dyn CommandHandler>,
        config: &PollerConfig,
    ) -> Self {
        Self {
            source,
            handler,
            offset: 0,
            timeout_seconds: config.timeout_seconds,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
            logger: get_logger("poller"),
        }
    }

    /// Next update id to request
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Fetch one batch and hand each text message to the handler.
    ///
    /// Updates without text or chat still advance the cursor. Returns the
    /// number of updates in the batch.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self
            .source
            .get_updates(self.offset, self.timeout_seconds)
            .await?;

        for update in &updates {
            self.offset = self.offset.max(update.update_id + 1);
            if let Some((text, chat_id)) = update.text_and_chat() {
                self.handler.handle(text, &chat_id).await;
            }
        }

        if !updates.is_empty() {
            self.logger.debug(&format!(
                "Processed {} updates, next offset {}",
                updates.len(),
                self.offset
            ));
        }
        Ok(updates.len())
    }

    /// Start [`run`](Self::run) on a new task.
    ///
    /// Returns `None` without polling when the source is unavailable.
    pub fn spawn(self) -> Option<JoinHandle<()>> {
        if !self.source.is_available() {
            self.logger
                .warn("Update source unavailable; command polling disabled");
            return None;
        }
        Some(tokio::spawn(self.run()))
    }

    /// Poll forever, backing off after each failure
    pub async fn run(mut self) {
        self.logger.info("Command polling started");
        loop {
            if let Err(e) = self.poll_once().await {
                self.logger.warn(&format!(
                    "Polling failed: {}; retrying in {}s",
                    e,
                    self.retry_delay.as_secs()
                ));
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }
}

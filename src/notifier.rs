//! Outbound message delivery

use crate::error::Result;
use std::future::Future;

/// Delivers chat text to a set of recipients.
///
/// `None` recipients means the configured default chats.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str, recipients: Option<&[String]>) -> DeliveryReport;
}

/// Per-recipient outcome of one send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    /// Recipient and the reason delivery failed
    pub failed: Vec<(String, String)>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pick explicit recipients when given, else the defaults
pub fn resolve_recipients<'a>(explicit: Option<&'a [String]>, defaults: &'a [String]) -> &'a [String] {
    explicit.unwrap_or(defaults)
}

/// Send to each recipient in order; a failure never stops the remaining sends
pub async fn deliver_sequentially<F, Fut>(recipients: &[String], mut send_one: F) -> DeliveryReport
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut report = DeliveryReport::default();
    for recipient in recipients {
        match send_one(recipient.clone()).await {
            Ok(()) => report.delivered.push(recipient.clone()),
            Err(e) => report.failed.push((recipient.clone(), e.to_string())),
        }
    }
    report
}

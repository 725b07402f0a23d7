use std::collections::BTreeMap;
use tracing::{debug, error, info, trace, warn};

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "extractor", "scheduler", "poller")
    pub component: String,
    /// Chat the current action was triggered from, if any
    pub chat_id: Option<String>,
    /// Additional context fields, rendered in key order
    pub extra_fields: BTreeMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            chat_id: None,
            extra_fields: BTreeMap::new(),
        }
    }

    /// Set originating chat
    pub fn with_chat_id(mut self, chat_id: &str) -> Self {
        self.chat_id = Some(chat_id.to_string());
        self
    }

    /// Add extra field
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    /// Derive a logger for work done on behalf of a chat
    pub fn for_chat(&self, chat_id: &str) -> Self {
        Self::new(self.context.clone().with_chat_id(chat_id))
    }

    /// Log an info message with context
    pub fn info(&self, message: &str) {
        let fields = self.format_fields();
        info!(%fields, "{}", message);
    }
    /// Log a warning message with context
    pub fn warn(&self, message: &str) {
        let fields = self.format_fields();
        warn!(%fields, "{}", message);
    }
    /// Log an error message with context
    pub fn error(&self, message: &str) {
        let fields = self.format_fields();
        error!(%fields, "{}", message);
    }
    /// Log a debug message with context
    pub fn debug(&self, message: &str) {
        let fields = self.format_fields();
        debug!(%fields, "{}", message);
    }
    /// Log a trace message with context
    pub fn trace(&self, message: &str) {
        let fields = self.format_fields();
        trace!(%fields, "{}", message);
    }

    /// Format context fields for logging
    fn format_fields(&self) -> String {
        let mut fields = vec![format!("component={}", self.context.component)];
        if let Some(ref chat_id) = self.context.chat_id {
            fields.push(format!("chat_id={}", chat_id));
        }
        for (key, value) in &self.context.extra_fields {
            fields.push(format!("{}={}", key, value));
        }
        fields.join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context() {
        let context = LogContext::new("test")
            .with_chat_id("42")
            .with_field("hour", "7".to_string());

        assert_eq!(context.component, "test");
        assert_eq!(context.chat_id.as_deref(), Some("42"));
        assert_eq!(context.extra_fields.get("hour"), Some(&"7".to_string()));
    }

    #[test]
    fn test_format_fields() {
        let logger = get_logger_with_context(
            LogContext::new("poller")
                .with_field("offset", "10".to_string())
                .with_field("batch", "2".to_string()),
        )
        .for_chat("-100");
        assert_eq!(
            logger.format_fields(),
            "component=poller,chat_id=-100,batch=2,offset=10"
        );
    }

    #[test]
    fn test_get_logger() {
        let logger = get_logger("test_component");
        assert_eq!(logger.context.component, "test_component");
        // Must not panic without a subscriber
        logger.info("Test info message");
        logger.debug("Test debug message");
    }
}

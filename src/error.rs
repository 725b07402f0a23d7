//! Error types and handling for Indexada
//!
//! Every fallible operation in the crate returns [`IndexadaError`]. Scheduled
//! jobs and command handlers catch these at their own boundary and turn them
//! into an error notification, so nothing here is ever fatal to the process.

use thiserror::Error;

/// Result type alias for Indexada operations
pub type Result<T> = std::result::Result<T, IndexadaError>;

/// Main error type for Indexada
#[derive(Debug, Error)]
pub enum IndexadaError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed feed: empty, unreadable or missing required columns
    #[error("Feed format error: {message}")]
    FeedFormat { message: String },

    /// Feed download or message delivery failed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A network call exceeded its deadline
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// The messaging provider rejected a request
    #[error("API error: {message}")]
    Api { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl IndexadaError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        IndexadaError::Config {
            message: message.into(),
        }
    }

    /// Create a new feed format error
    pub fn feed_format<S: Into<String>>(message: S) -> Self {
        IndexadaError::FeedFormat {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        IndexadaError::Transport {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        IndexadaError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        IndexadaError::Api {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        IndexadaError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        IndexadaError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Message text without the category prefix, as shown to chat users
    pub fn user_message(&self) -> String {
        match self {
            IndexadaError::Config { message }
            | IndexadaError::FeedFormat { message }
            | IndexadaError::Transport { message }
            | IndexadaError::Timeout { message }
            | IndexadaError::Api { message }
            | IndexadaError::Io { message }
            | IndexadaError::Serialization { message } => message.clone(),
            IndexadaError::Validation { field, message } => format!("{}: {}", field, message),
        }
    }
}

impl From<std::io::Error> for IndexadaError {
    fn from(err: std::io::Error) -> Self {
        IndexadaError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for IndexadaError {
    fn from(err: serde_yaml::Error) -> Self {
        IndexadaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for IndexadaError {
    fn from(err: serde_json::Error) -> Self {
        IndexadaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for IndexadaError {
    fn from(err: csv::Error) -> Self {
        IndexadaError::feed_format(err.to_string())
    }
}

impl From<reqwest::Error> for IndexadaError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs embed the bot token
        let err = err.without_url();
        if err.is_timeout() {
            IndexadaError::timeout(err.to_string())
        } else {
            IndexadaError::transport(err.to_string())
        }
    }
}

impl From<chrono::ParseError> for IndexadaError {
    fn from(err: chrono::ParseError) -> Self {
        IndexadaError::validation("datetime", err.to_string())
    }
}

//! # Indexada - hourly electricity tariff notifier for Telegram
//!
//! Downloads a day-ahead price feed for an indexed electricity tariff, keeps
//! the latest copy on disk and tells a set of Telegram chats what power costs
//! right now, what it will cost tomorrow and what that means for common
//! household appliances.
//!
//! ## Architecture
//!
//! - `config`: YAML configuration, environment overrides and validation
//! - `logging`: Structured logging and tracing
//! - `feed`: Feed download and delimited-text parsing
//! - `persistence`: On-disk snapshot of the last downloaded feed
//! - `pricing`: Hourly price extraction, price bands and device costs
//! - `message`: Chat message composition
//! - `notifier`: Delivery of messages to chat recipients
//! - `telegram`: Bot API client
//! - `scheduler`: Daily refresh, hourly check and on-demand queries
//! - `commands`: Chat command parsing and routing
//! - `poller`: Long-poll loop for inbound commands

pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod message;
pub mod notifier;
pub mod persistence;
pub mod poller;
pub mod pricing;
pub mod scheduler;
pub mod telegram;

// Re-export commonly used types
pub use config::Config;
pub use error::{IndexadaError, Result};
pub use scheduler::ScheduleCoordinator;

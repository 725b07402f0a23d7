//! Telegram Bot API integration
//!
//! Outbound text goes through `sendMessage`; inbound commands arrive via
//! long-polled `getUpdates`.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{ApiResponse, Chat, Message, Update};

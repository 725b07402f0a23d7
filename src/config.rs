//! Configuration management for Indexada
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files with support for environment variable overrides.
//! The configuration is read once at startup and then shared read-only.

use crate::error::{IndexadaError, Result};
use crate::pricing::{Device, PriceThresholds, TariffSelector};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod defaults;

pub use defaults::default_devices;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "INDEXADA_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Messaging provider credentials and recipients
    pub telegram: TelegramConfig,

    /// Price feed source and snapshot location
    pub feed: FeedConfig,

    /// Tariff/option pair selecting the feed rows
    pub tariff: TariffConfig,

    /// IANA time zone anchoring the tariff day and hour
    pub timezone: String,

    /// Price band thresholds
    pub pricing: PricingConfig,

    /// Appliances used for the hourly cost projection
    pub devices: Vec<Device>,

    /// Periodic job configuration
    pub schedule: ScheduleConfig,

    /// Reply scoping for chat commands
    pub commands: CommandsConfig,

    /// Command long-poll configuration
    pub poller: PollerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token; notifications are skipped when empty
    pub token: String,

    /// Default recipients for broadcast messages
    pub chat_ids: Vec<String>,

    /// Bot API base URL
    pub api_base_url: String,
}

/// Feed source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL of the delimited price feed
    pub source_url: String,

    /// Where the last fetched feed is persisted
    pub snapshot_path: PathBuf,

    /// Header of the column holding the price
    pub price_column: String,

    /// Field delimiter; auto-detected from the header when unset
    pub delimiter: Option<char>,

    /// Timeout for the feed download in seconds
    pub fetch_timeout_seconds: u64,
}

/// Tariff selector configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TariffConfig {
    /// Value matched against the `tarifario` column
    pub name: String,

    /// Value matched against the `opcao` column
    pub option: String,
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Prices strictly below this are "low"
    pub low_price: f64,

    /// Prices at or above this are "high"
    pub high_price: f64,

    /// Currency symbol appended to rendered amounts
    pub currency_symbol: String,
}

/// Which tariff day the daily refresh announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyDay {
    Today,
    Tomorrow,
}

impl NotifyDay {
    /// Offset in days from the refresh date
    pub fn offset_days(self) -> i64 {
        match self {
            NotifyDay::Today => 0,
            NotifyDay::Tomorrow => 1,
        }
    }
}

/// Schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily refresh, HH:MM
    pub daily_refresh_time: String,

    /// Day whose prices are announced after a refresh
    pub notify_day: NotifyDay,
}

/// Recipients of a command reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyScope {
    /// Only the chat that sent the command
    Origin,
    /// All configured recipients
    Broadcast,
}

/// Command reply policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Scope of the `/preco` reply
    pub price_reply: ReplyScope,

    /// Scope of the `/atualizar` reply
    pub update_reply: ReplyScope,
}

/// Long-poll configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Server-side long-poll timeout in seconds
    pub timeout_seconds: u64,

    /// Fixed back-off after a polling failure, in seconds
    pub retry_delay_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file; empty disables file logging
    pub file: String,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,

    /// Number of rotated files to keep
    pub backup_count: u32,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from an explicit path or the default locations
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_paths = ["indexada.yaml", "/etc/indexada/config.yaml"];
        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    ///
    /// Returns the names of variables that were present but could not be
    /// parsed; those keep the file/default value.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        if let Some(token) = lookup("TELEGRAM_TOKEN") {
            self.telegram.token = token.trim().to_string();
        }
        if let Some(ids) = lookup("TELEGRAM_CHAT_ID") {
            self.telegram.chat_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(url) = lookup("CSV_URL") {
            self.feed.source_url = url;
        }
        if let Some(path) = lookup("CACHE_PATH") {
            self.feed.snapshot_path = PathBuf::from(path);
        }
        if let Some(name) = lookup("TARIFF") {
            self.tariff.name = name;
        }
        if let Some(option) = lookup("OPTION") {
            self.tariff.option = option;
        }
        if let Some(tz) = lookup("TIMEZONE") {
            self.timezone = tz;
        }
        if let Some(raw) = lookup("LOW_PRICE") {
            match raw.trim().parse::<f64>() {
                Ok(v) => self.pricing.low_price = v,
                Err(_) => ignored.push("LOW_PRICE".to_string()),
            }
        }
        if let Some(raw) = lookup("HIGH_PRICE") {
            match raw.trim().parse::<f64>() {
                Ok(v) => self.pricing.high_price = v,
                Err(_) => ignored.push("HIGH_PRICE".to_string()),
            }
        }
        if let Some(raw) = lookup("DEVICES") {
            match serde_json::from_str::<Vec<Device>>(&raw) {
                Ok(devices) => self.devices = devices,
                Err(_) => ignored.push("DEVICES".to_string()),
            }
        }

        ignored
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.feed.source_url.trim().is_empty() {
            return Err(IndexadaError::validation(
                "feed.source_url",
                "Feed URL cannot be empty",
            ));
        }

        if self.feed.price_column.trim().is_empty() {
            return Err(IndexadaError::validation(
                "feed.price_column",
                "Price column cannot be empty",
            ));
        }

        if let Some(c) = self.feed.delimiter.filter(|c| !c.is_ascii()) {
            return Err(IndexadaError::validation(
                "feed.delimiter",
                format!("Delimiter must be a single ASCII character, got {:?}", c),
            ));
        }

        if self.tariff.name.trim().is_empty() {
            return Err(IndexadaError::validation(
                "tariff.name",
                "Tariff name cannot be empty",
            ));
        }

        if self.tariff.option.trim().is_empty() {
            return Err(IndexadaError::validation(
                "tariff.option",
                "Tariff option cannot be empty",
            ));
        }

        self.time_zone()?;
        self.daily_refresh_time()?;

        let (low, high) = (self.pricing.low_price, self.pricing.high_price);
        if !low.is_finite() || !high.is_finite() {
            return Err(IndexadaError::validation(
                "pricing",
                "Thresholds must be finite numbers",
            ));
        }
        if low < 0.0 || low >= high {
            return Err(IndexadaError::validation(
                "pricing",
                "Thresholds must satisfy 0 <= low_price < high_price",
            ));
        }

        if self.poller.timeout_seconds == 0 {
            return Err(IndexadaError::validation(
                "poller.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        if let Some(device) = self
            .devices
            .iter()
            .find(|d| !d.power_watts.is_finite() || d.power_watts < 0.0)
        {
            return Err(IndexadaError::validation(
                "devices",
                format!("Invalid power rating for {}", device.name),
            ));
        }

        Ok(())
    }

    /// Parsed time zone
    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone.trim().parse::<Tz>().map_err(|_| {
            IndexadaError::validation("timezone", format!("Unknown time zone: {}", self.timezone))
        })
    }

    /// Parsed local time of the daily refresh
    pub fn daily_refresh_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.schedule.daily_refresh_time.trim(), "%H:%M").map_err(|_| {
            IndexadaError::validation(
                "schedule.daily_refresh_time",
                format!(
                    "Expected HH:MM, got {}",
                    self.schedule.daily_refresh_time
                ),
            )
        })
    }

    /// Tariff selector used by every extraction
    pub fn selector(&self) -> TariffSelector {
        TariffSelector::new(&self.tariff.name, &self.tariff.option)
    }

    /// Price band thresholds
    pub fn thresholds(&self) -> PriceThresholds {
        PriceThresholds {
            low: self.pricing.low_price,
            high: self.pricing.high_price,
        }
    }
}

use super::*;

/// Household appliances announced with every price when none are configured
pub fn default_devices() -> Vec<Device> {
    vec![
        Device::new("🌡️ Aquecedor", 500.0),
        Device::new("❄️ Ar Condicionado", 1200.0),
        Device::new("💽 Máquina Lavar Roupa", 800.0),
        Device::new("💽 Máquina Secar Roupa", 650.0),
        Device::new("🍽️ Máquina Lavar Loiça", 1000.0),
    ]
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_ids: Vec::new(),
            api_base_url: "https://api.telegram.org".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            snapshot_path: PathBuf::from("data/prices.csv"),
            price_column: "col".to_string(),
            delimiter: None,
            fetch_timeout_seconds: 15,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            low_price: 0.1,
            high_price: 0.1599,
            currency_symbol: "€".to_string(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_refresh_time: "16:00".to_string(),
            notify_day: NotifyDay::Tomorrow,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            price_reply: ReplyScope::Origin,
            update_reply: ReplyScope::Broadcast,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry_delay_seconds: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            console_output: true,
            json_format: false,
            backup_count: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            feed: FeedConfig::default(),
            tariff: TariffConfig::default(),
            timezone: "Europe/Lisbon".to_string(),
            pricing: PricingConfig::default(),
            devices: default_devices(),
            schedule: ScheduleConfig::default(),
            commands: CommandsConfig::default(),
            poller: PollerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

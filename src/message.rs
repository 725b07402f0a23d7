//! Chat message composition
//!
//! Every outbound text is built here. Messages use Telegram's HTML parse mode,
//! so any text that did not originate in this module is escaped.

use crate::commands::Command;
use crate::config::Config;
use crate::pricing::{Device, HourlyPrices, PriceThresholds, project_costs};

/// Something worth telling the chat about
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Current price for an hour
    PriceFound { hour: u32, price: f64 },
    /// No usable feed rows for the requested slot
    PriceNotFound { day: String, hour: u32 },
    /// Per-hour listing for a day
    DayPrices { day: String, prices: HourlyPrices },
    /// A fresh feed was stored
    FeedUpdated { day: String, prices: HourlyPrices },
    /// Generic failure while serving a request
    Error { message: String },
    /// The feed download failed
    CsvDownloadError { message: String },
    /// Command overview
    Help,
}

/// Renders [`Notification`]s into chat text
#[derive(Debug, Clone)]
pub struct MessageComposer {
    thresholds: PriceThresholds,
    devices: Vec<Device>,
    currency: String,
}

impl MessageComposer {
    pub fn new(thresholds: PriceThresholds, devices: Vec<Device>, currency: &str) -> Self {
        Self {
            thresholds,
            devices,
            currency: currency.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.thresholds(),
            config.devices.clone(),
            &config.pricing.currency_symbol,
        )
    }

    pub fn compose(&self, notification: &Notification) -> String {
        match notification {
            Notification::PriceFound { hour, price } => self.price_found(*hour, *price),
            Notification::PriceNotFound { day, hour } => self.price_not_found(day, *hour),
            Notification::DayPrices { day, prices } => self.day_prices(day, prices),
            Notification::FeedUpdated { day, prices } => self.feed_updated(day, prices),
            Notification::Error { message } => self.error(message),
            Notification::CsvDownloadError { message } => self.csv_download_error(message),
            Notification::Help => self.help(),
        }
    }

    pub fn price_found(&self, hour: u32, price: f64) -> String {
        let band = self.thresholds.classify(price);
        let mut text = format!(
            "{}\n⚡ Preço agora {}:00 - <b>{:.5}</b> {}/kWh",
            band.headline(),
            hour,
            price,
            self.currency
        );

        let costs = project_costs(price, &self.devices).unwrap_or_default();
        if !costs.is_empty() {
            text.push_str("\n\n💡 Custo por hora:");
            for cost in costs {
                text.push_str(&format!(
                    "\n{}: {:.4} {}",
                    escape_html(&cost.name),
                    cost.cost,
                    self.currency
                ));
            }
        }
        text
    }

    pub fn price_not_found(&self, day: &str, hour: u32) -> String {
        format!(
            "⚠️ Preço não encontrado para {} {}:00",
            escape_html(day),
            hour
        )
    }

    pub fn day_prices(&self, day: &str, prices: &HourlyPrices) -> String {
        let mut text = format!("📅 Preços para {}:", escape_html(day));

        if !prices.has_prices() {
            text.push_str("\nSem preços disponíveis para este dia.");
            return text;
        }

        // Hours without a price are left out
        for (hour, price) in prices.available() {
            text.push_str(&format!(
                "\n{} {:02}:00 - <b>{:.5}</b> {}/kWh",
                self.thresholds.classify(price).marker(),
                hour,
                price,
                self.currency
            ));
        }

        if let Some((hour, price)) = prices.cheapest() {
            text.push_str(&format!(
                "\n\n⬇️ Mais barato: {:02}:00 ({:.5} {}/kWh)",
                hour, price, self.currency
            ));
        }
        if let Some((hour, price)) = prices.most_expensive() {
            text.push_str(&format!(
                "\n⬆️ Mais caro: {:02}:00 ({:.5} {}/kWh)",
                hour, price, self.currency
            ));
        }
        text
    }

    pub fn feed_updated(&self, day: &str, prices: &HourlyPrices) -> String {
        format!(
            "📥 O ficheiro CSV foi atualizado com sucesso.\n\n{}",
            self.day_prices(day, prices)
        )
    }

    pub fn error(&self, message: &str) -> String {
        format!("❌ Erro: {}", escape_html(message))
    }

    pub fn csv_download_error(&self, message: &str) -> String {
        format!(
            "❌ Erro ao descarregar o ficheiro CSV: {}",
            escape_html(message)
        )
    }

    pub fn help(&self) -> String {
        let mut text = String::from("ℹ️ Comandos disponíveis:");
        for command in Command::ALL {
            let (primary, alias) = command.names();
            text.push_str(&format!(
                "\n/{} ou /{} - {}",
                primary,
                alias,
                command.description()
            ));
        }
        text
    }
}

/// Escape the characters Telegram's HTML mode treats as markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> MessageComposer {
        MessageComposer::new(
            PriceThresholds {
                low: 0.1,
                high: 0.1599,
            },
            vec![Device::new("Forno", 2000.0)],
            "€",
        )
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn price_found_includes_band_and_costs() {
        let text = composer().price_found(8, 0.2);
        assert!(text.starts_with("⚠️ Preço alto!"));
        assert!(text.contains("8:00 - <b>0.20000</b> €/kWh"));
        assert!(text.contains("Forno: 0.4000 €"));
    }

    #[test]
    fn error_text_is_escaped() {
        assert_eq!(composer().error("<boom>"), "❌ Erro: &lt;boom&gt;");
    }

    #[test]
    fn empty_day_gets_neutral_line() {
        let text = composer().day_prices("01/01/2024", &HourlyPrices::default());
        assert!(text.contains("Sem preços disponíveis"));
        assert!(!text.contains("Mais barato"));
    }

    #[test]
    fn day_listing_skips_unpriced_hours() {
        let mut slots = [None; 24];
        slots[7] = Some(0.12);
        let text = composer().day_prices("01/01/2024", &HourlyPrices::from(slots));
        let hour_lines: Vec<&str> = text.lines().filter(|l| l.contains(":00 - ")).collect();
        assert_eq!(hour_lines, vec!["🟡 07:00 - <b>0.12000</b> €/kWh"]);
        assert!(!text.contains("08:00"));
    }

    #[test]
    fn help_lists_every_command() {
        let text = composer().help();
        for command in Command::ALL {
            assert!(text.contains(&format!("/{}", command.names().0)));
        }
    }
}

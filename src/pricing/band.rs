/// Classification of a price against the configured thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    Low,
    Normal,
    High,
}

/// Band boundaries in currency per kWh; `low < high`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceThresholds {
    pub low: f64,
    pub high: f64,
}

impl PriceThresholds {
    pub fn classify(&self, price: f64) -> PriceBand {
        if price < self.low {
            PriceBand::Low
        } else if price < self.high {
            PriceBand::Normal
        } else {
            PriceBand::High
        }
    }
}

impl PriceBand {
    /// Headline used in hourly announcements
    pub fn headline(self) -> &'static str {
        match self {
            PriceBand::Low => "✅ Preço baixo!",
            PriceBand::Normal => "🆗 Preço normal.",
            PriceBand::High => "⚠️ Preço alto!",
        }
    }

    /// Marker used in per-hour listings
    pub fn marker(self) -> &'static str {
        match self {
            PriceBand::Low => "🟢",
            PriceBand::Normal => "🟡",
            PriceBand::High => "🔴",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: PriceThresholds = PriceThresholds {
        low: 0.1,
        high: 0.1599,
    };

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(THRESHOLDS.classify(0.05), PriceBand::Low);
        assert_eq!(THRESHOLDS.classify(0.1), PriceBand::Normal);
        assert_eq!(THRESHOLDS.classify(0.15989), PriceBand::Normal);
        assert_eq!(THRESHOLDS.classify(0.1599), PriceBand::High);
        assert_eq!(THRESHOLDS.classify(0.3), PriceBand::High);
    }

    #[test]
    fn negative_prices_are_low() {
        assert_eq!(THRESHOLDS.classify(-0.01), PriceBand::Low);
    }
}

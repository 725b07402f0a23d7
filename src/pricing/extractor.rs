//! Hourly price extraction
//!
//! A price for an hour is the mean of every feed row that matches the tariff
//! selector and day and whose interval starts in that hour, rounded to five
//! decimal places. Rows with unparsable prices are skipped.

use crate::feed::{FeedRow, PriceTable};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};

pub const HOURS_PER_DAY: usize = 24;

/// Tariff name and option identifying the rows of interest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffSelector {
    pub tariff: String,
    pub option: String,
}

impl TariffSelector {
    pub fn new(tariff: &str, option: &str) -> Self {
        Self {
            tariff: tariff.to_string(),
            option: option.to_string(),
        }
    }

    pub fn matches(&self, row: &FeedRow) -> bool {
        row.tariff == self.tariff && row.option == self.option
    }
}

/// Prices for each hour of a day; `None` where the feed has no usable rows
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourlyPrices([Option<f64>; HOURS_PER_DAY]);

impl HourlyPrices {
    pub fn get(&self, hour: u32) -> Option<f64> {
        self.0.get(hour as usize).copied().flatten()
    }

    /// Always 24
    pub fn len(&self) -> usize {
        HOURS_PER_DAY
    }

    /// Whether any hour has a price
    pub fn has_prices(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<f64>)> + '_ {
        self.0.iter().enumerate().map(|(h, p)| (h as u32, *p))
    }

    /// Hours with a price, in order
    pub fn available(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.iter().filter_map(|(h, p)| p.map(|p| (h, p)))
    }

    /// Earliest hour with the lowest price
    pub fn cheapest(&self) -> Option<(u32, f64)> {
        self.available()
            .fold(None, |best, (h, p)| match best {
                Some((_, bp)) if bp <= p => best,
                _ => Some((h, p)),
            })
    }

    /// Earliest hour with the highest price
    pub fn most_expensive(&self) -> Option<(u32, f64)> {
        self.available()
            .fold(None, |best, (h, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((h, p)),
            })
    }
}

impl From<[Option<f64>; HOURS_PER_DAY]> for HourlyPrices {
    fn from(slots: [Option<f64>; HOURS_PER_DAY]) -> Self {
        Self(slots)
    }
}

/// Extracts hourly prices for one tariff selector
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    selector: TariffSelector,
    logger: StructuredLogger,
}

impl PriceExtractor {
    pub fn new(selector: TariffSelector) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("extractor")
                .with_field("tariff", selector.tariff.clone())
                .with_field("option", selector.option.clone()),
        );
        Self { selector, logger }
    }

    pub fn selector(&self) -> &TariffSelector {
        &self.selector
    }

    /// Mean price of `day` at `hour`, or `None` when no usable row matches
    pub fn extract_price(&self, table: &PriceTable, day: &str, hour: u32) -> Option<f64> {
        let day_rows = self.day_rows(table, day);
        let hour_rows: Vec<&FeedRow> = day_rows
            .into_iter()
            .filter(|r| r.starts_in_hour(hour))
            .collect();
        self.logger.debug(&format!(
            "{} rows for {} hour {:02}",
            hour_rows.len(),
            day,
            hour
        ));
        average_price(hour_rows)
    }

    /// Prices for all 24 hours of `day`
    pub fn extract_day_prices(&self, table: &PriceTable, day: &str) -> HourlyPrices {
        let day_rows = self.day_rows(table, day);
        let mut prices = [None; HOURS_PER_DAY];
        for (hour, slot) in prices.iter_mut().enumerate() {
            *slot = average_price(
                day_rows
                    .iter()
                    .copied()
                    .filter(|r| r.starts_in_hour(hour as u32)),
            );
        }
        let prices = HourlyPrices(prices);
        self.logger.debug(&format!(
            "{} of {} hours priced for {}",
            prices.available().count(),
            HOURS_PER_DAY,
            day
        ));
        prices
    }

    fn day_rows<'a>(&self, table: &'a PriceTable, day: &str) -> Vec<&'a FeedRow> {
        let selected: Vec<&FeedRow> = table.iter().filter(|r| self.selector.matches(r)).collect();
        let selected_count = selected.len();
        let on_day: Vec<&FeedRow> = selected.into_iter().filter(|r| r.day == day).collect();
        self.logger.debug(&format!(
            "{} rows total, {} match selector, {} on {}",
            table.len(),
            selected_count,
            on_day.len(),
            day
        ));
        on_day
    }
}

/// Mean of the parsable prices in `rows`, rounded to five decimals
pub fn average_price<'a>(rows: impl IntoIterator<Item = &'a FeedRow>) -> Option<f64> {
    let (sum, count) = rows
        .into_iter()
        .filter_map(|r| parse_price(&r.price))
        .fold((0.0, 0u32), |(sum, count), p| (sum + p, count + 1));
    if count == 0 {
        return None;
    }
    Some(round_price(sum / f64::from(count)))
}

/// Parse a decimal-comma price; non-finite values are rejected
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
}

/// Round half away from zero to five decimal places
pub fn round_price(price: f64) -> f64 {
    (price * 100_000.0).round() / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: &str, interval: &str, price: &str) -> FeedRow {
        FeedRow {
            tariff: "X".into(),
            option: "Y".into(),
            day: day.into(),
            interval: interval.into(),
            price: price.into(),
        }
    }

    #[test]
    fn parse_price_accepts_decimal_comma() {
        assert_eq!(parse_price("0,12"), Some(0.12));
        assert_eq!(parse_price(" 0.5 "), Some(0.5));
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn rounding_to_five_decimals() {
        assert_eq!(round_price(0.123456), 0.12346);
        assert_eq!(round_price(0.12), 0.12);
    }

    #[test]
    fn unparsable_rows_are_skipped_in_mean() {
        let rows = [
            row("01/01/2024", "[07:00-07:15[", "0,10"),
            row("01/01/2024", "[07:15-07:30[", "n/a"),
            row("01/01/2024", "[07:30-07:45[", "0,20"),
        ];
        assert_eq!(average_price(rows.iter()), Some(0.15));
        assert_eq!(average_price(rows[1..2].iter()), None);
    }

    #[test]
    fn cheapest_and_most_expensive_prefer_earliest_hour() {
        let mut slots = [None; HOURS_PER_DAY];
        slots[3] = Some(0.2);
        slots[5] = Some(0.1);
        slots[9] = Some(0.1);
        slots[20] = Some(0.3);
        slots[22] = Some(0.3);
        let prices = HourlyPrices(slots);
        assert_eq!(prices.cheapest(), Some((5, 0.1)));
        assert_eq!(prices.most_expensive(), Some((20, 0.3)));
        assert_eq!(prices.available().count(), 5);
        assert!(prices.has_prices());
        assert_eq!(prices.get(24), None);
    }

    #[test]
    fn empty_day_has_no_extremes() {
        let prices = HourlyPrices::default();
        assert_eq!(prices.len(), 24);
        assert!(!prices.has_prices());
        assert_eq!(prices.cheapest(), None);
        assert_eq!(prices.most_expensive(), None);
    }
}

use indexada::feed::{FeedRow, PriceTable};
use indexada::pricing::{PriceBand, PriceExtractor, PriceThresholds, TariffSelector};

fn row(tariff: &str, option: &str, day: &str, interval: &str, price: &str) -> FeedRow {
    FeedRow {
        tariff: tariff.into(),
        option: option.into(),
        day: day.into(),
        interval: interval.into(),
        price: price.into(),
    }
}

fn extractor() -> PriceExtractor {
    PriceExtractor::new(TariffSelector::new("X", "Y"))
}

#[test]
fn single_row_hour_price() {
    let table = PriceTable::new(vec![row("X", "Y", "01/01/2024", "[07:00-07:15[", "0,12")]);
    assert_eq!(extractor().extract_price(&table, "01/01/2024", 7), Some(0.12));
}

#[test]
fn hour_without_rows_is_none() {
    let table = PriceTable::new(vec![row("X", "Y", "01/01/2024", "[07:00-07:15[", "0,12")]);
    assert_eq!(extractor().extract_price(&table, "01/01/2024", 8), None);
}

#[test]
fn hour_price_is_mean_of_rows() {
    let table = PriceTable::new(vec![
        row("X", "Y", "01/01/2024", "[07:00-07:15[", "0,10"),
        row("X", "Y", "01/01/2024", "[07:15-07:30[", "0,20"),
    ]);
    assert_eq!(extractor().extract_price(&table, "01/01/2024", 7), Some(0.15));
}

#[test]
fn filters_on_tariff_option_and_day() {
    let table = PriceTable::new(vec![
        row("X", "Y", "01/01/2024", "[07:00-07:15[", "0,10"),
        row("Z", "Y", "01/01/2024", "[07:00-07:15[", "9,00"),
        row("X", "W", "01/01/2024", "[07:00-07:15[", "9,00"),
        row("X", "Y", "02/01/2024", "[07:00-07:15[", "9,00"),
        row("X", "Y", "01/01/2024", "[17:00-17:15[", "9,00"),
    ]);
    assert_eq!(extractor().extract_price(&table, "01/01/2024", 7), Some(0.1));
}

#[test]
fn mean_is_rounded_to_five_decimals() {
    let table = PriceTable::new(vec![
        row("X", "Y", "01/01/2024", "[03:00-03:15[", "0,1"),
        row("X", "Y", "01/01/2024", "[03:15-03:30[", "0,1"),
        row("X", "Y", "01/01/2024", "[03:30-03:45[", "0,2"),
    ]);
    assert_eq!(extractor().extract_price(&table, "01/01/2024", 3), Some(0.13333));
}

#[test]
fn day_prices_cover_all_hours() {
    let mut rows = Vec::new();
    for hour in (0..24).step_by(2) {
        rows.push(row(
            "X",
            "Y",
            "01/01/2024",
            &format!("[{:02}:00-{:02}:15[", hour, hour),
            &format!("0,{:02}", hour + 10),
        ));
    }
    let table = PriceTable::new(rows);
    let prices = extractor().extract_day_prices(&table, "01/01/2024");

    assert_eq!(prices.len(), 24);
    assert_eq!(prices.iter().count(), 24);
    for (hour, price) in prices.iter() {
        if hour % 2 == 0 {
            let p = price.unwrap();
            assert!(p.is_finite());
            assert_eq!(p, (p * 100_000.0).round() / 100_000.0);
        } else {
            assert_eq!(price, None);
        }
    }
    assert_eq!(prices.cheapest(), Some((0, 0.1)));
    assert_eq!(prices.most_expensive(), Some((22, 0.32)));
}

#[test]
fn day_prices_for_unknown_day_are_empty() {
    let table = PriceTable::new(vec![row("X", "Y", "01/01/2024", "[07:00-07:15[", "0,12")]);
    let prices = extractor().extract_day_prices(&table, "05/05/2025");
    assert!(!prices.has_prices());
    assert_eq!(prices.len(), 24);
}

#[test]
fn bands_follow_thresholds() {
    let thresholds = PriceThresholds {
        low: 0.10,
        high: 0.16,
    };
    assert_eq!(thresholds.classify(0.08), PriceBand::Low);
    assert_eq!(thresholds.classify(0.10), PriceBand::Normal);
    assert_eq!(thresholds.classify(0.16), PriceBand::High);
}

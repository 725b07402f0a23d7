#![no_main]

use indexada::feed::FeedParser;
use indexada::pricing::{PriceExtractor, TariffSelector};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = FeedParser::default().parse(text) else {
        return;
    };
    for row in table.iter().take(4) {
        let extractor = PriceExtractor::new(TariffSelector::new(&row.tariff, &row.option));
        let prices = extractor.extract_day_prices(&table, &row.day);
        assert_eq!(prices.len(), 24);
        for (_, price) in prices.available() {
            assert!(price.is_finite());
        }
    }
});

//! Delimited-text parser for the price feed
//!
//! Numeric fields are deliberately left as strings: the feed uses a decimal
//! comma and the extractor owns its interpretation.

use crate::config::FeedConfig;
use crate::error::{IndexadaError, Result};
use crate::feed::table::{FeedRow, PriceTable};
use crate::logging::get_logger;
use csv::{ReaderBuilder, StringRecord, Trim};

pub const TARIFF_COLUMN: &str = "tarifario";
pub const OPTION_COLUMN: &str = "opcao";
pub const DAY_COLUMN: &str = "dia";
pub const INTERVAL_COLUMN: &str = "intervalo";
pub const DEFAULT_PRICE_COLUMN: &str = "col";

/// Feed parser bound to a price column and an optional fixed delimiter
#[derive(Debug, Clone)]
pub struct FeedParser {
    price_column: String,
    delimiter: Option<char>,
}

struct ColumnIndex {
    tariff: usize,
    option: usize,
    day: usize,
    interval: usize,
    price: usize,
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_COLUMN)
    }
}

impl FeedParser {
    pub fn new(price_column: &str) -> Self {
        Self {
            price_column: price_column.trim().to_string(),
            delimiter: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: Option<char>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(&config.price_column).with_delimiter(config.delimiter)
    }

    /// Parse raw feed text into a [`PriceTable`].
    ///
    /// Fails with a feed format error when the text has no data rows or lacks
    /// one of the required columns.
    pub fn parse(&self, raw: &str) -> Result<PriceTable> {
        let logger = get_logger("parser");
        let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let Some(header_line) = text.lines().find(|l| !l.trim().is_empty()) else {
            return Err(IndexadaError::feed_format("feed is empty"));
        };
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => c as u8,
            Some(c) => {
                return Err(IndexadaError::feed_format(format!(
                    "unsupported delimiter {:?}",
                    c
                )));
            }
            None => detect_delimiter(header_line),
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = self.locate_columns(&headers)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or_default().to_string();
            rows.push(FeedRow {
                tariff: cell(columns.tariff),
                option: cell(columns.option),
                day: cell(columns.day),
                interval: cell(columns.interval),
                price: cell(columns.price),
            });
        }

        if rows.is_empty() {
            return Err(IndexadaError::feed_format("feed has no data rows"));
        }

        logger.debug(&format!(
            "Parsed {} rows ({} bytes, delimiter {:?})",
            rows.len(),
            raw.len(),
            delimiter as char
        ));
        Ok(PriceTable::new(rows))
    }

    fn locate_columns(&self, headers: &StringRecord) -> Result<ColumnIndex> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let required = [
            TARIFF_COLUMN,
            OPTION_COLUMN,
            DAY_COLUMN,
            INTERVAL_COLUMN,
            self.price_column.as_str(),
        ];

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(IndexadaError::feed_format(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        // All present per the check above
        let idx = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnIndex {
            tariff: idx(TARIFF_COLUMN),
            option: idx(OPTION_COLUMN),
            day: idx(DAY_COLUMN),
            interval: idx(INTERVAL_COLUMN),
            price: idx(&self.price_column),
        })
    }
}

/// Pick the field delimiter from the header line
pub fn detect_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') {
        b';'
    } else if header_line.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "tarifario;opcao;dia;intervalo;col\n\
                        X;Y;01/01/2024;[07:00-07:15[;0,12\n\
                        X;Y;01/01/2024;[07:15-07:30[;0,14\n";

    #[test]
    fn parses_semicolon_feed() {
        let table = FeedParser::default().parse(FEED).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.tariff, "X");
        assert_eq!(first.option, "Y");
        assert_eq!(first.day, "01/01/2024");
        assert_eq!(first.interval, "[07:00-07:15[");
        assert_eq!(first.price, "0,12");
    }

    #[test]
    fn parses_quoted_comma_feed_with_bom() {
        let raw = "\u{feff}tarifario,opcao,dia,intervalo,col\nX,Y,01/01/2024,[07:00-07:15[,\"0,12\"\n";
        let table = FeedParser::default().parse(raw).unwrap();
        assert_eq!(table.rows()[0].tariff, "X");
        assert_eq!(table.rows()[0].price, "0,12");
    }

    #[test]
    fn missing_day_column_is_rejected() {
        let raw = "tarifario;opcao;intervalo;col\nX;Y;[07:00-07:15[;0,12\n";
        let err = FeedParser::default().parse(raw).unwrap_err();
        assert!(matches!(err, IndexadaError::FeedFormat { .. }));
        assert!(err.to_string().contains("dia"));
    }

    #[test]
    fn header_only_is_rejected() {
        let err = FeedParser::default()
            .parse("tarifario;opcao;dia;intervalo;col\n")
            .unwrap_err();
        assert!(matches!(err, IndexadaError::FeedFormat { .. }));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(FeedParser::default().parse("  \n\n").is_err());
        assert!(FeedParser::default().parse("").is_err());
    }

    #[test]
    fn custom_price_column_and_short_rows() {
        let raw = "tarifario;opcao;dia;intervalo;preco\nX;Y;01/01/2024\n";
        let table = FeedParser::new("preco").parse(raw).unwrap();
        assert_eq!(table.rows()[0].interval, "");
        assert_eq!(table.rows()[0].price, "");
    }

    #[test]
    fn detects_delimiters() {
        assert_eq!(detect_delimiter("a;b,c"), b';');
        assert_eq!(detect_delimiter("a\tb"), b'\t');
        assert_eq!(detect_delimiter("a,b"), b',');
    }
}

//! Price feed ingestion
//!
//! The feed is a delimited text table published by the tariff provider, one
//! row per sub-hour interval. It is downloaded by a [`FeedFetcher`], persisted
//! verbatim, and parsed into a [`PriceTable`] whenever a query needs it.

pub mod fetcher;
pub mod parser;
pub mod table;

pub use fetcher::{FeedFetcher, HttpFeedFetcher};
pub use parser::FeedParser;
pub use table::{FeedRow, PriceTable};

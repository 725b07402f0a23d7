//! Price interpretation: extraction from the feed, banding and cost projection

pub mod band;
pub mod cost;
pub mod extractor;

pub use band::{PriceBand, PriceThresholds};
pub use cost::{Device, DeviceCost, project_costs};
pub use extractor::{HOURS_PER_DAY, HourlyPrices, PriceExtractor, TariffSelector};

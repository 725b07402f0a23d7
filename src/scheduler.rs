//! Scheduled jobs and on-demand price queries
//!
//! The [`ScheduleCoordinator`] owns every price-facing operation: refreshing
//! the feed, announcing the current hour and listing a day's prices. The
//! daily and hourly loops call into it on their timers and the command router
//! calls into it on demand.

use crate::config::Config;
use crate::error::Result;
use crate::feed::{FeedFetcher, FeedParser, PriceTable};
use crate::logging::{StructuredLogger, get_logger};
use crate::message::{MessageComposer, Notification};
use crate::notifier::{DeliveryReport, Notifier};
use crate::persistence::SnapshotStore;
use crate::pricing::PriceExtractor;
use chrono::{DateTime, NaiveTime, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;

pub mod clock;

pub use clock::{day_label, next_daily_run, next_hour_start, resolve_local};

/// Shared service behind the scheduled loops and chat commands
pub struct ScheduleCoordinator {
    config: Arc<Config>,
    tz: Tz,
    refresh_at: NaiveTime,
    fetcher: Arc<dyn FeedFetcher>,
    notifier: Arc<dyn Notifier>,
    snapshot: SnapshotStore,
    parser: FeedParser,
    extractor: PriceExtractor,
    composer: MessageComposer,
    logger: StructuredLogger,
}

impl ScheduleCoordinator {
    pub fn new(
        config: Arc<Config>,
        fetcher: Arc<dyn FeedFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let tz = config.time_zone()?;
        let refresh_at = config.daily_refresh_time()?;
        Ok(Self {
            tz,
            refresh_at,
            fetcher,
            notifier,
            snapshot: SnapshotStore::new(config.feed.snapshot_path.clone()),
            parser: FeedParser::from_config(&config.feed),
            extractor: PriceExtractor::new(config.selector()),
            composer: MessageComposer::from_config(&config),
            logger: get_logger("scheduler"),
            config,
        })
    }

    /// Current instant in the configured zone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    pub fn snapshot(&self) -> &SnapshotStore {
        &self.snapshot
    }

    /// Startup sequence: refresh the feed, then announce the current hour.
    ///
    /// The hourly check runs even when the refresh fails, using whatever
    /// snapshot is already on disk.
    pub async fn startup(&self) {
        let now = self.now();
        self.logger.info("Running startup refresh");
        self.daily_refresh_at(now, None).await;
        self.hourly_check_at(now, None).await;
    }

    /// Download, persist and parse the feed.
    ///
    /// The text is persisted before parsing, so a malformed download still
    /// replaces the snapshot.
    pub async fn refresh_feed(&self) -> Result<PriceTable> {
        let text = self.fetcher.fetch(&self.config.feed.source_url).await?;
        self.snapshot.save(&text).await?;
        self.parser.parse(&text)
    }

    pub async fn daily_refresh(&self, recipients: Option<&[String]>) {
        self.daily_refresh_at(self.now(), recipients).await;
    }

    /// Refresh the feed and announce the prices of the configured day
    pub async fn daily_refresh_at(&self, now: DateTime<Tz>, recipients: Option<&[String]>) {
        let table = match self.refresh_feed().await {
            Ok(table) => table,
            Err(e) => {
                self.logger.error(&format!("Feed refresh failed: {}", e));
                self.notify(
                    &Notification::CsvDownloadError {
                        message: e.user_message(),
                    },
                    recipients,
                )
                .await;
                return;
            }
        };

        let date = now.date_naive() + TimeDelta::days(self.config.schedule.notify_day.offset_days());
        let day = day_label(date);
        let prices = self.extractor.extract_day_prices(&table, &day);
        self.logger.info(&format!(
            "Feed refreshed: {} rows, {} hours priced for {}",
            table.len(),
            prices.available().count(),
            day
        ));
        self.notify(&Notification::FeedUpdated { day, prices }, recipients)
            .await;
    }

    pub async fn hourly_check(&self, recipients: Option<&[String]>) {
        self.hourly_check_at(self.now(), recipients).await;
    }

    /// Announce the price of the hour containing `now`
    pub async fn hourly_check_at(&self, now: DateTime<Tz>, recipients: Option<&[String]>) {
        let day = day_label(now.date_naive());
        let hour = now.hour();

        let table = match self.snapshot.load_table(&self.parser).await {
            Ok(table) => table,
            Err(e) => {
                self.logger
                    .error(&format!("Hourly check for {} {:02}:00 failed: {}", day, hour, e));
                self.notify(
                    &Notification::Error {
                        message: e.user_message(),
                    },
                    recipients,
                )
                .await;
                return;
            }
        };

        let notification = match self.extractor.extract_price(&table, &day, hour) {
            Some(price) => Notification::PriceFound { hour, price },
            None => {
                self.logger
                    .warn(&format!("No price for {} {:02}:00", day, hour));
                Notification::PriceNotFound { day, hour }
            }
        };
        self.notify(&notification, recipients).await;
    }

    pub async fn send_day_prices(&self, offset_days: i64, recipients: Option<&[String]>) {
        self.send_day_prices_at(self.now(), offset_days, recipients)
            .await;
    }

    /// List the prices of the day `offset_days` after `now`
    pub async fn send_day_prices_at(
        &self,
        now: DateTime<Tz>,
        offset_days: i64,
        recipients: Option<&[String]>,
    ) {
        let day = day_label(now.date_naive() + TimeDelta::days(offset_days));
        let notification = match self.snapshot.load_table(&self.parser).await {
            Ok(table) => Notification::DayPrices {
                prices: self.extractor.extract_day_prices(&table, &day),
                day,
            },
            Err(e) => {
                self.logger
                    .error(&format!("Listing prices for {} failed: {}", day, e));
                Notification::Error {
                    message: e.user_message(),
                }
            }
        };
        self.notify(&notification, recipients).await;
    }

    pub async fn send_help(&self, recipients: Option<&[String]>) {
        self.notify(&Notification::Help, recipients).await;
    }

    /// Run the daily refresh at the configured local time, forever
    pub async fn run_daily(self: Arc<Self>) {
        let mut last_fired: Option<DateTime<Tz>> = None;
        loop {
            let from = floor_after(self.now(), last_fired);
            let target = next_daily_run(from, self.refresh_at);
            self.logger
                .info(&format!("Next feed refresh at {}", target.to_rfc3339()));
            sleep_until(self.now(), target).await;

            self.daily_refresh_at(target, None).await;
            last_fired = Some(target);
        }
    }

    /// Run the hourly check at the top of every local hour, forever
    pub async fn run_hourly(self: Arc<Self>) {
        let mut last_fired: Option<DateTime<Tz>> = None;
        loop {
            let from = floor_after(self.now(), last_fired);
            let target = next_hour_start(from);
            self.logger
                .debug(&format!("Next hourly check at {}", target.to_rfc3339()));
            sleep_until(self.now(), target).await;

            self.hourly_check_at(target, None).await;
            last_fired = Some(target);
        }
    }

    async fn notify(
        &self,
        notification: &Notification,
        recipients: Option<&[String]>,
    ) -> DeliveryReport {
        let text = self.composer.compose(notification);
        let report = self.notifier.send(&text, recipients).await;
        if !report.is_complete() {
            self.logger.warn(&format!(
                "Delivery failed for {} of {} chats",
                report.failed.len(),
                report.attempted()
            ));
        }
        report
    }
}

/// Never schedule at or before a slot that already fired
fn floor_after(now: DateTime<Tz>, last_fired: Option<DateTime<Tz>>) -> DateTime<Tz> {
    match last_fired {
        Some(last) if last >= now => last,
        _ => now,
    }
}

async fn sleep_until(now: DateTime<Tz>, target: DateTime<Tz>) {
    let wait = (target - now).to_std().unwrap_or(Duration::ZERO);
    tokio::time::sleep(wait).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Lisbon;

    #[test]
    fn floor_after_skips_fired_slot() {
        let fired = resolve_local(
            &Lisbon,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        let early_wake = fired - TimeDelta::milliseconds(3);
        let from = floor_after(early_wake, Some(fired));
        assert_eq!(from, fired);
        assert_eq!(next_hour_start(from).hour(), 9);
        assert_eq!(floor_after(early_wake, None), early_wake);
    }
}

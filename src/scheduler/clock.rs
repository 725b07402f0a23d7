//! Wall-clock arithmetic in the configured time zone

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;

/// Upper bound on a DST gap, in minutes
const MAX_GAP_MINUTES: u32 = 180;

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous times (DST fold) take the earlier instant; nonexistent times
/// (DST gap) move forward to the first valid minute after the gap.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(instant) = tz.from_local_datetime(&candidate).earliest() {
            return instant;
        }
        candidate += TimeDelta::minutes(1);
    }
    tz.from_utc_datetime(&naive)
}

/// Next occurrence of `at` strictly after `now`
pub fn next_daily_run(now: DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = resolve_local(&tz, now.date_naive().and_time(at));
    if today > now {
        return today;
    }
    let tomorrow = now.date_naive() + TimeDelta::days(1);
    resolve_local(&tz, tomorrow.and_time(at))
}

/// Start of the next local hour strictly after `now`
pub fn next_hour_start(now: DateTime<Tz>) -> DateTime<Tz> {
    let into_hour = TimeDelta::seconds(i64::from(now.minute() * 60 + now.second()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond() % 1_000_000_000));
    now - into_hour + TimeDelta::hours(1)
}

/// Day label in the feed's `dd/mm/yyyy` form
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Lisbon;

    fn lisbon(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        resolve_local(
            &Lisbon,
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        )
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn daily_run_later_today() {
        let now = lisbon(2024, 1, 1, 15, 59);
        assert_eq!(next_daily_run(now, at(16, 0)), lisbon(2024, 1, 1, 16, 0));
    }

    #[test]
    fn daily_run_at_exact_time_moves_to_tomorrow() {
        let now = lisbon(2024, 1, 1, 16, 0);
        assert_eq!(next_daily_run(now, at(16, 0)), lisbon(2024, 1, 2, 16, 0));
    }

    #[test]
    fn daily_run_in_dst_gap_moves_past_gap() {
        // Lisbon skips 01:00-02:00 on 2024-03-31
        let now = lisbon(2024, 3, 30, 12, 0);
        let next = next_daily_run(now, at(1, 30));
        assert_eq!(next, lisbon(2024, 3, 31, 1, 30));
        assert_eq!((next.hour(), next.minute()), (2, 0));
    }

    #[test]
    fn fold_takes_earlier_instant() {
        // Lisbon repeats 01:00-02:00 on 2024-10-27
        let first = lisbon(2024, 10, 27, 1, 30);
        let later = first + TimeDelta::hours(1);
        assert_eq!((later.hour(), later.minute()), (1, 30));
        assert!(first < later);
    }

    #[test]
    fn next_hour_is_top_of_hour() {
        let now = lisbon(2024, 1, 1, 7, 59) + TimeDelta::seconds(59);
        assert_eq!(next_hour_start(now), lisbon(2024, 1, 1, 8, 0));
        let on_the_hour = lisbon(2024, 1, 1, 8, 0);
        assert_eq!(next_hour_start(on_the_hour), lisbon(2024, 1, 1, 9, 0));
    }

    #[test]
    fn next_hour_across_spring_forward() {
        let now = lisbon(2024, 3, 31, 0, 30);
        let next = next_hour_start(now);
        assert_eq!((next.hour(), next.minute()), (2, 0));
    }

    #[test]
    fn day_label_is_zero_padded() {
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            "01/01/2024"
        );
    }
}

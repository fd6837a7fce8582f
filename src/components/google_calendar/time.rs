use super::models::DayWindow;
use crate::error::{google_calendar_error, BotResult};
use chrono::{DateTime, NaiveTime, SecondsFormat, TimeDelta, TimeZone};
use std::fmt::Display;

/// Longest DST jump searched across when a boundary time is skipped
const MAX_GAP_MINUTES: i32 = 180;

/// Get the [00:00:00, 23:59:59] window of the day `now` falls on, in `now`'s zone
pub fn day_window<Tz>(now: &DateTime<Tz>) -> BotResult<DayWindow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();
    let date = now.date_naive();

    // A skipped midnight starts the day at the first minute that exists
    let midnight = date.and_time(NaiveTime::MIN);
    let start = (0..=MAX_GAP_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(midnight + TimeDelta::minutes(m.into())))
                .earliest()
        })
        .ok_or_else(|| google_calendar_error("No local start of day found today"))?;

    // A skipped 23:59:59 ends it at the last second that exists
    let last_second = midnight + TimeDelta::seconds(86_399);
    let end = (0..=MAX_GAP_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(last_second - TimeDelta::minutes(m.into())))
                .latest()
        })
        .ok_or_else(|| google_calendar_error("No local end of day found today"))?;

    Ok(DayWindow {
        time_min: start.to_rfc3339_opts(SecondsFormat::Secs, true),
        time_max: end.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_day_window_fixed_offset() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = jst.with_ymd_and_hms(2024, 1, 9, 12, 34, 56).unwrap();

        let window = day_window(&now).unwrap();
        assert_eq!(window.time_min, "2024-01-09T00:00:00+09:00");
        assert_eq!(window.time_max, "2024-01-09T23:59:59+09:00");
    }

    #[test]
    fn test_day_window_just_after_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 1).unwrap();

        let window = day_window(&now).unwrap();
        assert_eq!(window.time_min, "2024-03-01T00:00:00Z");
        assert_eq!(window.time_max, "2024-03-01T23:59:59Z");
    }

    #[test]
    fn test_day_window_named_zone() {
        let now = chrono_tz::Asia::Tokyo
            .with_ymd_and_hms(2024, 12, 31, 23, 0, 0)
            .unwrap();

        let window = day_window(&now).unwrap();
        assert_eq!(window.time_min, "2024-12-31T00:00:00+09:00");
        assert_eq!(window.time_max, "2024-12-31T23:59:59+09:00");
    }

    #[test]
    fn test_day_window_on_dst_change() {
        // Clocks go forward at 02:00 in New York; the window keeps both offsets
        let now = chrono_tz::America::New_York
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .unwrap();

        let window = day_window(&now).unwrap();
        assert_eq!(window.time_min, "2024-03-10T00:00:00-05:00");
        assert_eq!(window.time_max, "2024-03-10T23:59:59-04:00");
    }

    #[test]
    fn test_day_window_midnight_gap() {
        // Santiago skips from 00:00 straight to 01:00 on this day
        let now = chrono_tz::America::Santiago
            .with_ymd_and_hms(2024, 9, 8, 12, 0, 0)
            .unwrap();

        let window = day_window(&now).unwrap();
        assert_eq!(window.time_min, "2024-09-08T01:00:00-03:00");
        assert_eq!(window.time_max, "2024-09-08T23:59:59-03:00");
    }

    #[test]
    fn test_day_window_midnight_overlap() {
        // Santiago repeats 23:00-24:00 on 2024-04-06; the 7th starts at the second midnight
        let now = chrono_tz::America::Santiago
            .with_ymd_and_hms(2024, 4, 7, 12, 0, 0)
            .unwrap();

        let window = day_window(&now).unwrap();
        assert_eq!(window.time_min, "2024-04-07T00:00:00-04:00");
        assert_eq!(window.time_max, "2024-04-07T23:59:59-04:00");
    }
}

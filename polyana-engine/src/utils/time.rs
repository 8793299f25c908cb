//! Time helpers pinned to the venue timezone
//!
//! Persisted instants are `i64` Unix millis. Bookable windows are
//! minutes from local midnight on a venue-local `NaiveDate`; conversion
//! between the two always goes through the configured `Tz`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

// ========== Clock Seam ==========

/// Clock abstraction so hold expiry and the scheduler can be driven by
/// a settable clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ========== Conversions ==========

/// Parse an HH:MM string, falling back to 00:00
pub fn parse_hhmm(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!("Failed to parse time '{}': {}, falling back to 00:00", s, e);
        NaiveTime::MIN
    })
}

/// Minutes from midnight -> wall-clock time (clamped to the day)
pub fn minute_to_time(minute: u16) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(u32::from(minute) * 60, 0)
        .unwrap_or(NaiveTime::MIN)
}

/// Local date + wall-clock time -> Unix millis
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn local_datetime_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Window start on a local date -> Unix millis
pub fn window_start_millis(date: NaiveDate, start_min: u16, tz: Tz) -> i64 {
    local_datetime_millis(date, minute_to_time(start_min), tz)
}

/// Current date in the venue timezone
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Unix millis -> venue-local date
pub fn millis_to_local_date(millis: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// Most recent occurrence of `time` at or before `now` (venue local)
///
/// Used by shift reconciliation: a shift opened before this instant has
/// crossed a mandated closure boundary.
pub fn last_occurrence_millis(time: NaiveTime, tz: Tz, now: DateTime<Utc>) -> i64 {
    let local = now.with_timezone(&tz);
    let date = if local.time() >= time {
        local.date_naive()
    } else {
        local.date_naive() - Duration::days(1)
    };
    local_datetime_millis(date, time, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: Tz = chrono_tz::Europe::Moscow;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("23:00"), NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        assert_eq!(parse_hhmm("garbage"), NaiveTime::MIN);
    }

    #[test]
    fn test_minute_to_time() {
        assert_eq!(minute_to_time(600), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(minute_to_time(0), NaiveTime::MIN);
        // Out of range clamps instead of panicking
        assert_eq!(minute_to_time(u16::MAX), NaiveTime::MIN);
    }

    #[test]
    fn test_window_start_millis_round_trips_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let millis = window_start_millis(date, 600, TZ);
        assert_eq!(millis_to_local_date(millis, TZ), Some(date));
    }

    #[test]
    fn test_last_occurrence_before_and_after() {
        let boundary = NaiveTime::from_hms_opt(23, 0, 0).unwrap();

        // 2025-06-02 10:00 Moscow (UTC+3): last 23:00 was yesterday
        let now = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
            .and_utc();
        let last = last_occurrence_millis(boundary, TZ, now);
        assert_eq!(
            millis_to_local_date(last, TZ),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );

        // 2025-06-02 23:30 Moscow: last 23:00 was today
        let now = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(20, 30, 0)
            .unwrap()
            .and_utc();
        let last = last_occurrence_millis(boundary, TZ, now);
        assert_eq!(
            millis_to_local_date(last, TZ),
            NaiveDate::from_ymd_opt(2025, 6, 2)
        );
        assert!(last <= now.timestamp_millis());
    }
}

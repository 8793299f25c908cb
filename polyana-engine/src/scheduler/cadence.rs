//! Cadence math
//!
//! Pure helpers mapping a venue-local wall-clock time to the wait
//! until its next occurrence. `now` is injected so tests can pin the
//! instant; loops pass the engine clock through.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Wait until the next venue-local occurrence of `time`
///
/// DST edge cases fall through a ladder: a nonexistent local instant
/// retries one minute later, an unresolvable one falls back to an
/// hour. Never returns zero; a non-positive result clamps to 60s.
pub fn duration_until_next(time: NaiveTime, tz: Tz, now: DateTime<Utc>) -> std::time::Duration {
    let local_now = now.with_timezone(&tz);
    let today = local_now.date_naive();

    let target_date = if local_now.time() >= time {
        // Today's occurrence is gone, wait for tomorrow
        today + chrono::Duration::days(1)
    } else {
        today
    };

    let target_datetime = target_date
        .and_time(time)
        .and_local_timezone(tz)
        .single()
        .unwrap_or_else(|| {
            // DST edge case: fallback to +1 min
            (target_date.and_time(time) + chrono::Duration::minutes(1))
                .and_local_timezone(tz)
                .latest()
                .unwrap_or_else(|| {
                    tracing::error!("Cannot resolve local time for cadence, using fallback");
                    local_now + chrono::Duration::hours(1)
                })
        });

    let duration = target_datetime.signed_duration_since(local_now);
    if duration.num_seconds() <= 0 {
        std::time::Duration::from_secs(60)
    } else {
        duration
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }
}

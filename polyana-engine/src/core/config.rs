use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::utils::time::parse_hhmm;

/// Engine configuration - every knob of the venue
///
/// # Environment variables
///
/// All values can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | VENUE_TZ | Europe/Moscow | Venue timezone for all calendar math |
/// | OPEN_HOUR | 9 | First bookable hour of the day |
/// | CLOSE_HOUR | 23 | Hour the venue closes, windows must end by it |
/// | SHIFT_CLOSE_TIME | 23:00 | Mandated daily cash shift closure |
/// | RUNAWAY_SHIFT_HOURS | 24 | Open shift older than this is force-closed |
/// | QUAD_POOL_SIZE | 4 | Quad machines in the shared fleet |
/// | PROXIMITY_DISCOUNT_PERCENT | 5 | Discount for joining an existing quad slot |
/// | HOLD_PENDING_MINUTES | 360 | Hold for bookings awaiting a call |
/// | HOLD_PREPAYMENT_MINUTES | 2880 | Hold for bookings awaiting prepayment |
/// | HOLD_SWEEP_MINUTES | 15 | Cadence of the lapsed-hold sweep |
/// | TASK_SEED_TIME | 08:00 | Daily recurring-task materialization |
/// | NOTIFY_SHIFT_START | 08:45 | Staff reminder before opening |
/// | NOTIFY_DAY_SUMMARY | 09:00 | Morning booking summary |
/// | NOTIFY_CLIMATE_ON | 18:00 | Evening climate-on reminder |
/// | NOTIFY_CLIMATE_OFF | 10:00 | Morning climate-off reminder |
/// | NOTIFY_LAUNDRY | 11:00 | Laundry handover reminder |
/// | FROST_CHECK_TIME | 18:30 | Daily frost forecast check |
/// | FROST_THRESHOLD_C | 0.0 | Alert when forecast minimum drops below |
/// | FORECAST_DAYS | 3 | Forecast horizon for the frost check |
/// | VENUE_LAT | 55.71 | Venue latitude |
/// | VENUE_LON | 37.62 | Venue longitude |
/// | STAFF_CHANNEL | staff | Messenger channel for staff notifications |
/// | WEATHER_TIMEOUT_MS | 10000 | HTTP timeout for the weather feed |
/// | LOG_DIR | (unset) | Daily-rotated log files when set |
/// | LOG_LEVEL | info | Log filter when RUST_LOG is unset |
///
/// # Example
///
/// ```ignore
/// VENUE_TZ=Europe/Samara QUAD_POOL_SIZE=6 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Venue timezone, all dates and cutoffs are local to it
    pub venue_tz: Tz,
    /// First bookable hour
    pub open_hour: u16,
    /// Closing hour, exclusive end of the bookable day
    pub close_hour: u16,

    // === Cash shift policy ===
    /// Local time of the mandated daily closure
    pub shift_close_time: NaiveTime,
    /// Age after which an open shift counts as runaway
    pub runaway_shift_hours: i64,

    // === Quad fleet ===
    /// Fallback fleet size when the resource row carries none
    pub quad_pool_size: i32,
    /// Percent granted to bookings joining a pooled slot
    pub proximity_discount_percent: u32,

    // === Booking holds ===
    /// Minutes a PendingCall booking keeps its window
    pub hold_pending_minutes: i64,
    /// Minutes an AwaitingPrepayment booking keeps its window
    pub hold_prepayment_minutes: i64,
    /// Sweep cadence for flipping lapsed holds to Expired
    pub hold_sweep_minutes: u64,

    // === Recurring tasks and notifications ===
    /// Local time the task catalogue materializes for the day
    pub task_seed_time: NaiveTime,
    pub notify_shift_start: NaiveTime,
    pub notify_day_summary: NaiveTime,
    pub notify_climate_on: NaiveTime,
    pub notify_climate_off: NaiveTime,
    pub notify_laundry: NaiveTime,
    /// Messenger channel staff notifications go to
    pub staff_channel: String,

    // === Weather ===
    /// Local time of the daily frost check
    pub frost_check_time: NaiveTime,
    /// Alert threshold in degrees Celsius
    pub frost_threshold_c: f64,
    /// Days of forecast inspected by the frost check
    pub forecast_days: u8,
    pub venue_lat: f64,
    pub venue_lon: f64,
    /// HTTP timeout for the weather feed in milliseconds
    pub weather_timeout_ms: u64,

    // === Logging ===
    /// Directory for daily-rotated log files, stdout only when unset
    pub log_dir: Option<String>,
    /// Filter directives for the tracing subscriber
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            venue_tz: std::env::var("VENUE_TZ")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::Europe::Moscow),
            open_hour: std::env::var("OPEN_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9),
            close_hour: std::env::var("CLOSE_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(23),
            shift_close_time: env_time("SHIFT_CLOSE_TIME", "23:00"),
            runaway_shift_hours: std::env::var("RUNAWAY_SHIFT_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            quad_pool_size: std::env::var("QUAD_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            proximity_discount_percent: std::env::var("PROXIMITY_DISCOUNT_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            hold_pending_minutes: std::env::var("HOLD_PENDING_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(360),
            hold_prepayment_minutes: std::env::var("HOLD_PREPAYMENT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2880),
            hold_sweep_minutes: std::env::var("HOLD_SWEEP_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            task_seed_time: env_time("TASK_SEED_TIME", "08:00"),
            notify_shift_start: env_time("NOTIFY_SHIFT_START", "08:45"),
            notify_day_summary: env_time("NOTIFY_DAY_SUMMARY", "09:00"),
            notify_climate_on: env_time("NOTIFY_CLIMATE_ON", "18:00"),
            notify_climate_off: env_time("NOTIFY_CLIMATE_OFF", "10:00"),
            notify_laundry: env_time("NOTIFY_LAUNDRY", "11:00"),
            staff_channel: std::env::var("STAFF_CHANNEL").unwrap_or_else(|_| "staff".into()),
            frost_check_time: env_time("FROST_CHECK_TIME", "18:30"),
            frost_threshold_c: std::env::var("FROST_THRESHOLD_C")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0),
            forecast_days: std::env::var("FORECAST_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            venue_lat: std::env::var("VENUE_LAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(55.71),
            venue_lon: std::env::var("VENUE_LON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(37.62),
            weather_timeout_ms: std::env::var("WEATHER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
            log_dir: std::env::var("LOG_DIR").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Opening minute of the bookable day
    pub fn open_min(&self) -> u16 {
        self.open_hour * 60
    }

    /// Closing minute, exclusive
    pub fn close_min(&self) -> u16 {
        self.close_hour * 60
    }

    pub fn hold_pending_millis(&self) -> i64 {
        self.hold_pending_minutes * 60_000
    }

    pub fn hold_prepayment_millis(&self) -> i64 {
        self.hold_prepayment_minutes * 60_000
    }

    pub fn runaway_shift_millis(&self) -> i64 {
        self.runaway_shift_hours * 3_600_000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_time(key: &str, default: &str) -> NaiveTime {
    std::env::var(key)
        .ok()
        .map(|v| parse_hhmm(&v))
        .unwrap_or_else(|| parse_hhmm(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_minutes() {
        let mut config = Config::from_env();
        config.open_hour = 9;
        config.close_hour = 23;
        assert_eq!(config.open_min(), 540);
        assert_eq!(config.close_min(), 1380);
    }

    #[test]
    fn test_hold_millis() {
        let mut config = Config::from_env();
        config.hold_pending_minutes = 360;
        config.hold_prepayment_minutes = 2880;
        assert_eq!(config.hold_pending_millis(), 21_600_000);
        assert_eq!(config.hold_prepayment_millis(), 172_800_000);
    }
}

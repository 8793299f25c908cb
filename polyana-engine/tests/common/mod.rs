//! Shared fixtures: a settable clock, a recording messenger and a
//! scripted weather feed, wired into a real `EngineState`.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;

use polyana_engine::services::{DayForecast, Messenger, WeatherFeed};
use polyana_engine::{Clock, Config, EngineState, EventBus, MemoryStore};
use shared::models::{BookingCreate, BookingType, Operator, Role};

// ========== Test Clock ==========

/// Clock frozen at a chosen instant; tests move it explicitly.
pub struct TestClock {
    millis: AtomicI64,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.millis.fetch_add(minutes * 60_000, Ordering::SeqCst);
    }

    pub fn advance_hours(&self, hours: i64) {
        self.advance_minutes(hours * 60);
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap()
    }
}

/// Wall-clock instant in the venue timezone (Moscow, UTC+3 year round)
pub fn moscow(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    chrono_tz::Europe::Moscow
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

// ========== Recording Messenger ==========

/// Captures every notification; can be switched to fail deliveries.
pub struct RecordingMessenger {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn channels(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(c, _)| c.clone()).collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("messenger offline");
        }
        self.sent.lock().push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

// ========== Scripted Weather ==========

/// Serves a preset forecast, or errors when scripted to.
pub struct ScriptedWeather {
    forecast: Mutex<Vec<DayForecast>>,
    failing: AtomicBool,
}

impl ScriptedWeather {
    pub fn with(rows: Vec<DayForecast>) -> Arc<Self> {
        Arc::new(Self {
            forecast: Mutex::new(rows),
            failing: AtomicBool::new(false),
        })
    }

    pub fn set_forecast(&self, rows: Vec<DayForecast>) {
        *self.forecast.lock() = rows;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl WeatherFeed for ScriptedWeather {
    async fn forecast(&self, _lat: f64, _lon: f64, _days: u8) -> anyhow::Result<Vec<DayForecast>> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("weather feed offline");
        }
        Ok(self.forecast.lock().clone())
    }
}

// ========== Harness ==========

pub struct Harness {
    pub state: EngineState,
    pub clock: Arc<TestClock>,
    pub messenger: Arc<RecordingMessenger>,
    pub weather: Arc<ScriptedWeather>,
}

/// Deterministic configuration decoupled from the host environment
pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.venue_tz = chrono_tz::Europe::Moscow;
    config.open_hour = 9;
    config.close_hour = 23;
    config.shift_close_time = chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap();
    config.runaway_shift_hours = 24;
    config.quad_pool_size = 4;
    config.proximity_discount_percent = 5;
    config.hold_pending_minutes = 360;
    config.hold_prepayment_minutes = 2880;
    config.frost_threshold_c = 0.0;
    config.forecast_days = 3;
    config.staff_channel = "staff".into();
    config
}

/// Engine wired with test doubles and seeded venue defaults
pub async fn harness_at(now: DateTime<Utc>) -> Harness {
    harness_with(test_config(), now).await
}

/// Same harness with a caller-tweaked configuration
pub async fn harness_with(config: Config, now: DateTime<Utc>) -> Harness {
    let clock = TestClock::at(now);
    let messenger = RecordingMessenger::new();
    let weather = ScriptedWeather::with(Vec::new());
    let state = EngineState::new(
        config,
        Arc::new(MemoryStore::new()),
        clock.clone(),
        EventBus::new(),
        messenger.clone(),
        weather.clone(),
    );
    state.seed_defaults().await.unwrap();
    Harness {
        state,
        clock,
        messenger,
        weather,
    }
}

// ========== Actors and Payloads ==========

pub fn staff() -> Operator {
    Operator::new(1, "Dasha", Role::Staff)
}

pub fn admin() -> Operator {
    Operator::new(2, "Olga", Role::Admin)
}

pub fn bath_request(date: NaiveDate, start_min: u16, end_min: u16) -> BookingCreate {
    BookingCreate {
        resource_code: "B1".into(),
        booking_type: BookingType::Bath,
        date,
        start_min,
        end_min,
        guest_count: 4,
        customer_name: "Ivan Petrov".into(),
        customer_phone: "+7 900 000-00-01".into(),
        discount_percent: None,
        prepayment: 0,
        note: None,
        instant_confirm: false,
    }
}

pub fn quad_request(date: NaiveDate, start_min: u16, end_min: u16, machines: i32) -> BookingCreate {
    BookingCreate {
        resource_code: "QUAD".into(),
        booking_type: BookingType::QuadShort,
        date,
        start_min,
        end_min,
        guest_count: machines,
        customer_name: "Anna Sokolova".into(),
        customer_phone: "+7 900 000-00-02".into(),
        discount_percent: None,
        prepayment: 0,
        note: None,
        instant_confirm: true,
    }
}

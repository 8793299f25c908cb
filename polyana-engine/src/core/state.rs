//! Engine state - shared wiring of managers and collaborators
//!
//! [`EngineState`] holds every long-lived component behind an Arc, so
//! cloning it is cheap and the scheduler, binary and tests all see the
//! same graph.
//!
//! # Components
//!
//! | Field | Type | Role |
//! |-------|------|------|
//! | config | Config | immutable configuration |
//! | store | Arc\<dyn Store\> | persistence seam |
//! | clock | Arc\<dyn Clock\> | time source, swappable in tests |
//! | events | EventBus | change notifications |
//! | booking | Arc\<BookingManager\> | booking lifecycle |
//! | ledger | Arc\<CashLedger\> | cash shifts and transactions |
//! | messenger | Arc\<dyn Messenger\> | staff notifications |
//! | weather | Arc\<dyn WeatherFeed\> | frost check forecasts |

use std::sync::Arc;

use shared::models::{BookingType, Resource, ResourceKind, Tariff, Task};
use shared::util::snowflake_id;

use crate::booking::BookingManager;
use crate::core::{Config, EventBus};
use crate::ledger::CashLedger;
use crate::services::{LogMessenger, Messenger, OpenMeteoFeed, WeatherFeed};
use crate::store::{MemoryStore, Store};
use crate::utils::{AppResult, Clock, SystemClock};

/// Shared engine state
#[derive(Clone)]
pub struct EngineState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub events: EventBus,
    pub booking: Arc<BookingManager>,
    pub ledger: Arc<CashLedger>,
    pub messenger: Arc<dyn Messenger>,
    pub weather: Arc<dyn WeatherFeed>,
    /// Engine instance epoch - unique ID generated on startup, lets
    /// observers detect restarts
    epoch: String,
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineState")
            .field("epoch", &self.epoch)
            .field("venue_tz", &self.config.venue_tz)
            .finish()
    }
}

impl EngineState {
    /// Wire a state from explicit collaborators
    ///
    /// Tests use this to inject a scripted clock, messenger or feed;
    /// production wiring goes through [`EngineState::initialize`].
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        events: EventBus,
        messenger: Arc<dyn Messenger>,
        weather: Arc<dyn WeatherFeed>,
    ) -> Self {
        let booking = Arc::new(BookingManager::new(
            store.clone(),
            clock.clone(),
            config.clone(),
            events.clone(),
        ));
        let ledger = Arc::new(CashLedger::new(
            store.clone(),
            clock.clone(),
            events.clone(),
        ));
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "Engine state created");
        Self {
            config,
            store,
            clock,
            events,
            booking,
            ledger,
            messenger,
            weather,
            epoch,
        }
    }

    /// Build the production graph and seed the venue defaults
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = Self::new(
            config.clone(),
            store,
            Arc::new(SystemClock),
            EventBus::new(),
            Arc::new(LogMessenger),
            Arc::new(OpenMeteoFeed::new(config.weather_timeout_ms)),
        );
        state.seed_defaults().await?;
        Ok(state)
    }

    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    // ========== Task board ==========

    /// Tasks dated `date`, scheduler-seeded and manual alike
    pub async fn tasks_for(&self, date: chrono::NaiveDate) -> AppResult<Vec<Task>> {
        Ok(self.store.tasks_for_date(date).await?)
    }

    /// Mark a task done; completing a done task is a no-op
    pub async fn complete_task(&self, id: i64) -> AppResult<Task> {
        let task = self
            .store
            .complete_task(id, self.clock.now_millis())
            .await?;
        self.events
            .publish("task", "updated", &task.id.to_string(), Some(&task));
        Ok(task)
    }

    /// Seed the venue's resources and price list
    ///
    /// Idempotent: existing resource codes are skipped, tariff rows
    /// upsert by (type, date).
    pub async fn seed_defaults(&self) -> AppResult<()> {
        let now = self.clock.now_millis();
        let resources = [
            ("B1", ResourceKind::Bath, "Bath house 1", None),
            ("B2", ResourceKind::Bath, "Bath house 2", None),
            ("SPA1", ResourceKind::SpaRoom, "Spa room 1", None),
            ("SPA2", ResourceKind::SpaRoom, "Spa room 2", None),
            (
                "QUAD",
                ResourceKind::QuadUnit,
                "Quad fleet",
                Some(self.config.quad_pool_size),
            ),
        ];
        let mut seeded = 0;
        for (code, kind, name, pool_size) in resources {
            if self.store.find_resource(code).await?.is_some() {
                continue;
            }
            self.store
                .create_resource(Resource {
                    id: snowflake_id(),
                    code: code.to_string(),
                    kind,
                    name: name.to_string(),
                    pool_size,
                    active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            seeded += 1;
        }

        // (type, base, guest threshold, base over threshold, per guest)
        let tariffs = [
            (BookingType::Bath, 5000, None, None, false),
            (BookingType::TubOnly, 150, Some(4), Some(180), false),
            (BookingType::Spa, 2500, None, None, false),
            (BookingType::QuadShort, 3500, None, None, true),
            (BookingType::QuadLong, 5000, None, None, true),
        ];
        for (booking_type, base, threshold_guests, base_over_threshold, per_guest) in tariffs {
            self.store
                .upsert_tariff(Tariff {
                    id: snowflake_id(),
                    booking_type,
                    date: None,
                    base,
                    threshold_guests,
                    base_over_threshold,
                    per_guest,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }

        tracing::info!(resources = seeded, "Venue defaults seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_seeds_defaults() {
        let state = EngineState::initialize(&Config::from_env()).await.unwrap();

        let quad = state.store.find_resource("QUAD").await.unwrap().unwrap();
        assert_eq!(quad.kind, ResourceKind::QuadUnit);
        assert!(quad.pool_size.is_some());

        let rows = state.store.tariffs_for(BookingType::TubOnly).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].base_for(4), 150);
        assert_eq!(rows[0].base_for(5), 180);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let state = EngineState::initialize(&Config::from_env()).await.unwrap();
        state.seed_defaults().await.unwrap();

        let resources = state.store.list_resources().await.unwrap();
        assert_eq!(resources.len(), 5);
    }
}

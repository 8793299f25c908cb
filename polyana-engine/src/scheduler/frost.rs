//! Frost watch
//!
//! Once a day the forecast is pulled and scanned for nights below the
//! frost threshold; a hit alerts staff to drain exposed water lines.
//! A broken or unreachable feed is logged and skipped, never alerted
//! on and never fatal.

use tokio_util::sync::CancellationToken;

use crate::core::EngineState;
use crate::scheduler::cadence;

/// Daily frost check scheduler
pub struct FrostScheduler {
    state: EngineState,
    shutdown: CancellationToken,
}

impl FrostScheduler {
    pub fn new(state: EngineState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    /// Main loop: fire at the frost check hour every day
    pub async fn run(self) {
        tracing::info!("Frost watch started");
        loop {
            let config = &self.state.config;
            let wait = cadence::duration_until_next(
                config.frost_check_time,
                config.venue_tz,
                self.state.clock.now(),
            );
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    self.check_frost().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Frost watch received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Pull the forecast and alert on sub-threshold nights
    pub async fn check_frost(&self) {
        let config = &self.state.config;
        let rows = match self
            .state
            .weather
            .forecast(config.venue_lat, config.venue_lon, config.forecast_days)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Weather feed unavailable, frost check skipped: {}", e);
                return;
            }
        };

        let cold: Vec<_> = rows
            .iter()
            .filter(|day| day.temp_min < config.frost_threshold_c)
            .collect();
        if cold.is_empty() {
            tracing::debug!(days = rows.len(), "No frost in the forecast");
            return;
        }
        let Some(coldest) = cold.iter().min_by(|a, b| a.temp_min.total_cmp(&b.temp_min)) else {
            return;
        };

        let text = format!(
            "Frost warning: {} of the next {} nights drop below {:.0}C \
             (coldest {:.1}C on {}). Drain exposed water lines and cover the tubs.",
            cold.len(),
            rows.len(),
            config.frost_threshold_c,
            coldest.temp_min,
            coldest.date
        );
        tracing::warn!(
            nights = cold.len(),
            coldest = coldest.temp_min,
            "Frost expected, alerting staff"
        );
        if let Err(e) = self
            .state
            .messenger
            .send(&config.staff_channel, &text)
            .await
        {
            tracing::warn!("Frost alert delivery failed: {}", e);
        }
    }
}

//! Mandated shift closure
//!
//! Closes every open cash shift at the mandated local hour, and on
//! startup force-closes shifts that should not have survived: runaway
//! shifts older than the configured limit and shifts opened before the
//! most recent mandated boundary (the engine was down when it passed).

use tokio_util::sync::CancellationToken;

use crate::core::EngineState;
use crate::scheduler::cadence;
use crate::utils::time;

/// Daily shift closure scheduler
///
/// Registered as `TaskKind::Periodic`; reconciliation runs first as
/// `TaskKind::Warmup`.
pub struct ShiftCloseScheduler {
    state: EngineState,
    shutdown: CancellationToken,
}

impl ShiftCloseScheduler {
    pub fn new(state: EngineState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    /// Main loop: fire at the mandated hour every day
    pub async fn run(self) {
        tracing::info!("Shift closure scheduler started");
        loop {
            let config = &self.state.config;
            let wait = cadence::duration_until_next(
                config.shift_close_time,
                config.venue_tz,
                self.state.clock.now(),
            );
            tracing::info!(
                "Next mandated shift closure in {} minutes (at {})",
                wait.as_secs() / 60,
                config.shift_close_time.format("%H:%M")
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    self.close_for_the_day().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Shift closure scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Close every open shift across all boxes (mandated closure)
    pub async fn close_for_the_day(&self) -> usize {
        match self.state.ledger.close_all_open(true).await {
            Ok(0) => {
                tracing::debug!("No open shifts at mandated closure");
                0
            }
            Ok(closed) => {
                tracing::info!(closed, "Mandated daily shift closure");
                closed
            }
            Err(e) => {
                tracing::error!("Mandated shift closure failed: {}", e);
                0
            }
        }
    }

    /// Startup reconciliation
    ///
    /// Two independent reasons force a close:
    /// - runaway: the shift has been open longer than the limit
    /// - boundary: it was opened before the most recent mandated hour,
    ///   which the engine slept through
    ///
    /// `closed_at` is the reconciliation instant, not the boundary.
    pub async fn reconcile_on_start(&self) -> usize {
        let config = &self.state.config;
        let now = self.state.clock.now();
        let now_millis = self.state.clock.now_millis();
        let boundary =
            time::last_occurrence_millis(config.shift_close_time, config.venue_tz, now);
        let runaway_limit = config.runaway_shift_millis();

        let shifts = match self.state.store.open_shifts().await {
            Ok(shifts) => shifts,
            Err(e) => {
                tracing::error!("Failed to scan open shifts for reconciliation: {}", e);
                return 0;
            }
        };

        let mut closed = 0;
        for shift in shifts {
            let crossed_boundary = shift.opened_at < boundary;
            let runaway = now_millis - shift.opened_at >= runaway_limit;
            if !crossed_boundary && !runaway {
                continue;
            }
            match self.state.ledger.close_shift(shift.id, true).await {
                Ok(_) => {
                    closed += 1;
                    tracing::warn!(
                        shift_id = shift.id,
                        box_code = %shift.box_code,
                        crossed_boundary,
                        runaway,
                        "Shift closed by startup reconciliation"
                    );
                }
                Err(e) => {
                    tracing::error!(shift_id = shift.id, "Reconciliation close failed: {}", e);
                }
            }
        }

        if closed == 0 {
            tracing::debug!("No shifts needed reconciliation");
        }
        closed
    }
}

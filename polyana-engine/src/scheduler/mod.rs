//! Scheduler
//!
//! The venue's background cadences, registered on [`BackgroundTasks`]
//! so each runs panic-isolated and watches the shared shutdown token:
//!
//! - [`ShiftCloseScheduler`] - mandated daily closure + startup
//!   reconciliation
//! - [`TaskSeedScheduler`] - recurring task materialization
//! - [`NotifyScheduler`] - staff reminders
//! - [`FrostScheduler`] - daily forecast check
//! - hold sweep - lapsed holds flipped to Expired on a fixed interval

pub mod cadence;
pub mod frost;
pub mod notify;
pub mod shift_close;
pub mod task_seed;

pub use frost::FrostScheduler;
pub use notify::{NotifyScheduler, Reminder};
pub use shift_close::ShiftCloseScheduler;
pub use task_seed::{CATALOGUE, Cadence, TaskDef, TaskSeedScheduler};

use std::time::Duration;

use crate::core::{BackgroundTasks, EngineState, TaskKind};

/// Scheduler driver: builds every cadence and registers it
pub struct Scheduler {
    state: EngineState,
}

impl Scheduler {
    pub fn new(state: EngineState) -> Self {
        Self { state }
    }

    /// Register all background cadences
    pub fn spawn_all(self, tasks: &mut BackgroundTasks) {
        // One-shot startup reconciliation for cash shifts
        let warmup = ShiftCloseScheduler::new(self.state.clone(), tasks.shutdown_token());
        tasks.spawn("startup_reconcile", TaskKind::Warmup, async move {
            warmup.reconcile_on_start().await;
        });

        let shift_close = ShiftCloseScheduler::new(self.state.clone(), tasks.shutdown_token());
        tasks.spawn("shift_close", TaskKind::Periodic, shift_close.run());

        let task_seed = TaskSeedScheduler::new(self.state.clone(), tasks.shutdown_token());
        tasks.spawn("task_seed", TaskKind::Periodic, task_seed.run());

        let notify = NotifyScheduler::new(self.state.clone(), tasks.shutdown_token());
        tasks.spawn("staff_notify", TaskKind::Periodic, notify.run());

        let frost = FrostScheduler::new(self.state.clone(), tasks.shutdown_token());
        tasks.spawn("frost_watch", TaskKind::Periodic, frost.run());

        let sweep_state = self.state.clone();
        let sweep_token = tasks.shutdown_token();
        let sweep_every = Duration::from_secs(self.state.config.hold_sweep_minutes.max(1) * 60);
        tasks.spawn("hold_sweep", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(sweep_every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match sweep_state.booking.expire_lapsed_holds().await {
                            Ok(0) => {}
                            Ok(expired) => {
                                tracing::info!(expired, "Hold sweep pass finished");
                            }
                            Err(e) => {
                                tracing::error!("Hold sweep failed: {}", e);
                            }
                        }
                    }
                    _ = sweep_token.cancelled() => {
                        tracing::info!("Hold sweep received shutdown signal");
                        return;
                    }
                }
            }
        });
    }
}

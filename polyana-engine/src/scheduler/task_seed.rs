//! Recurring task materialization
//!
//! A fixed in-code catalogue of housekeeping duties becomes concrete
//! [`Task`] rows once per day at the seed hour. Dedupe by (title, date)
//! makes the seeding idempotent, so the startup catch-up and a restart
//! right after the hour never double-create.

use chrono::{Datelike, NaiveDate, Weekday};
use tokio_util::sync::CancellationToken;

use shared::models::Task;
use shared::util::snowflake_id;

use crate::core::EngineState;
use crate::scheduler::cadence;
use crate::utils::time;

/// When a catalogue entry falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly(Weekday),
    /// Day of month; short months clamp to their last day
    Monthly(u32),
}

impl Cadence {
    pub fn due_on(&self, date: NaiveDate) -> bool {
        match self {
            Cadence::Daily => true,
            Cadence::Weekly(weekday) => date.weekday() == *weekday,
            Cadence::Monthly(day) => {
                let last = last_day_of_month(date);
                date.day() == (*day).min(last)
            }
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    (28..=31)
        .rev()
        .find(|&d| NaiveDate::from_ymd_opt(date.year(), date.month(), d).is_some())
        .unwrap_or(28)
}

/// One catalogue entry
#[derive(Debug, Clone, Copy)]
pub struct TaskDef {
    pub title: &'static str,
    pub cadence: Cadence,
    pub checklist: &'static [&'static str],
}

/// The venue's recurring duties
pub const CATALOGUE: &[TaskDef] = &[
    TaskDef {
        title: "Walk the grounds and check hot tubs",
        cadence: Cadence::Daily,
        checklist: &["Water level", "Water temperature", "Cover condition"],
    },
    TaskDef {
        title: "Sauna stove check",
        cadence: Cadence::Daily,
        checklist: &["Firewood stock", "Flue damper", "Stones intact"],
    },
    TaskDef {
        title: "Deep-clean spa rooms",
        cadence: Cadence::Weekly(Weekday::Mon),
        checklist: &["Floors and drains", "Towel restock", "Aroma oils"],
    },
    TaskDef {
        title: "Quad fleet maintenance",
        cadence: Cadence::Weekly(Weekday::Fri),
        checklist: &["Tire pressure", "Oil level", "Brakes", "Fuel top-up"],
    },
    TaskDef {
        title: "Consumables inventory",
        cadence: Cadence::Monthly(1),
        checklist: &["Firewood", "Towels and robes", "Cleaning supplies"],
    },
    TaskDef {
        title: "Fire safety inspection",
        cadence: Cadence::Monthly(15),
        checklist: &["Extinguishers", "Alarm test", "Escape routes clear"],
    },
];

/// Daily task seeding scheduler
pub struct TaskSeedScheduler {
    state: EngineState,
    shutdown: CancellationToken,
}

impl TaskSeedScheduler {
    pub fn new(state: EngineState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    /// Main loop: catch up for today, then fire at the seed hour daily
    pub async fn run(self) {
        tracing::info!("Task seed scheduler started");
        self.seed_today().await;

        loop {
            let config = &self.state.config;
            let wait = cadence::duration_until_next(
                config.task_seed_time,
                config.venue_tz,
                self.state.clock.now(),
            );
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    self.seed_today().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Task seed scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Seed for the current venue-local date
    pub async fn seed_today(&self) -> usize {
        let today = time::local_date(self.state.clock.now(), self.state.config.venue_tz);
        self.seed_for(today).await
    }

    /// Materialize every catalogue entry due on `date`
    ///
    /// Idempotent via the (title, date) dedupe check.
    pub async fn seed_for(&self, date: NaiveDate) -> usize {
        let now = self.state.clock.now_millis();
        let mut created = 0;

        for def in CATALOGUE {
            if !def.cadence.due_on(date) {
                continue;
            }
            match self.state.store.system_task_exists(def.title, date).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(title = def.title, "Task dedupe check failed: {}", e);
                    continue;
                }
            }
            let task = Task {
                id: snowflake_id(),
                title: def.title.to_string(),
                date,
                checklist: def.checklist.iter().map(|s| s.to_string()).collect(),
                done: false,
                system_created: true,
                created_at: now,
                done_at: None,
            };
            match self.state.store.create_task(task).await {
                Ok(task) => {
                    created += 1;
                    self.state
                        .events
                        .publish("task", "created", &task.id.to_string(), Some(&task));
                }
                Err(e) => {
                    tracing::error!(title = def.title, "Task creation failed: {}", e);
                }
            }
        }

        if created > 0 {
            tracing::info!(created, date = %date, "Recurring tasks materialized");
        }
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_always_due() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(Cadence::Daily.due_on(date));
    }

    #[test]
    fn test_weekly_due_on_weekday() {
        // 2025-06-02 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(Cadence::Weekly(Weekday::Mon).due_on(monday));
        assert!(!Cadence::Weekly(Weekday::Fri).due_on(monday));
    }

    #[test]
    fn test_monthly_clamps_short_months() {
        let day_31 = Cadence::Monthly(31);
        assert!(day_31.due_on(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
        // April has 30 days: day 31 clamps to the 30th
        assert!(day_31.due_on(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()));
        assert!(!day_31.due_on(NaiveDate::from_ymd_opt(2025, 4, 29).unwrap()));
        // February in a non-leap year
        assert!(day_31.due_on(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
    }

    #[test]
    fn test_catalogue_titles_unique() {
        let mut titles: Vec<_> = CATALOGUE.iter().map(|d| d.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), CATALOGUE.len());
    }
}

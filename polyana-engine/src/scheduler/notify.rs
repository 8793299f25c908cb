//! Staff reminders
//!
//! A fixed table of venue-local times and reminder texts. Each send is
//! fire-and-forget through the [`Messenger`]: a failed delivery is
//! logged and never retried, and never stops the other reminders.
//!
//! [`Messenger`]: crate::services::Messenger

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveTime;
use tokio_util::sync::CancellationToken;

use shared::models::BookingType;

use crate::core::EngineState;
use crate::scheduler::cadence;
use crate::utils::time;
use crate::utils::AppResult;

/// The reminders the venue runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reminder {
    /// Open the cash shift, walk the grounds
    ShiftStart,
    /// Booking counts for the day
    DaySummary,
    /// Evening climate control on
    ClimateOn,
    /// Morning climate control off
    ClimateOff,
    /// Laundry handover
    Laundry,
}

/// Staff notification scheduler
pub struct NotifyScheduler {
    state: EngineState,
    shutdown: CancellationToken,
}

impl NotifyScheduler {
    pub fn new(state: EngineState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    fn entries(&self) -> [(Reminder, NaiveTime); 5] {
        let config = &self.state.config;
        [
            (Reminder::ShiftStart, config.notify_shift_start),
            (Reminder::DaySummary, config.notify_day_summary),
            (Reminder::ClimateOff, config.notify_climate_off),
            (Reminder::Laundry, config.notify_laundry),
            (Reminder::ClimateOn, config.notify_climate_on),
        ]
    }

    /// Main loop: sleep to the nearest reminder, fire everything due
    /// at that instant, repeat
    pub async fn run(self) {
        tracing::info!("Staff notify scheduler started");
        loop {
            let now = self.state.clock.now();
            let tz = self.state.config.venue_tz;
            let waits: Vec<(Reminder, Duration)> = self
                .entries()
                .iter()
                .map(|(reminder, at)| (*reminder, cadence::duration_until_next(*at, tz, now)))
                .collect();
            let Some(min_wait) = waits.iter().map(|(_, wait)| *wait).min() else {
                return;
            };
            // Entries configured to the same minute fire together
            let due: Vec<Reminder> = waits
                .iter()
                .filter(|(_, wait)| *wait == min_wait)
                .map(|(reminder, _)| *reminder)
                .collect();

            tokio::select! {
                _ = tokio::time::sleep(min_wait) => {
                    for reminder in due {
                        self.fire(reminder).await;
                    }
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Staff notify scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Send one reminder now
    pub async fn fire(&self, reminder: Reminder) {
        let text = match reminder {
            Reminder::ShiftStart => {
                "The venue opens soon: open the cash shift and walk the grounds".to_string()
            }
            Reminder::DaySummary => match self.day_summary().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Day summary build failed: {}", e);
                    return;
                }
            },
            Reminder::ClimateOn => {
                "Evening: turn on climate control in the spa building".to_string()
            }
            Reminder::ClimateOff => {
                "Morning: turn off climate control in the spa building".to_string()
            }
            Reminder::Laundry => "Laundry handover: collect used towels and robes".to_string(),
        };

        if let Err(e) = self
            .state
            .messenger
            .send(&self.state.config.staff_channel, &text)
            .await
        {
            tracing::warn!(reminder = ?reminder, "Staff notification failed: {}", e);
        }
    }

    /// Booking counts for today, per type
    pub async fn day_summary(&self) -> AppResult<String> {
        let today = time::local_date(self.state.clock.now(), self.state.config.venue_tz);
        let rows = self.state.store.bookings_on_date(today).await?;
        let live: Vec<_> = rows.iter().filter(|b| !b.status.is_terminal()).collect();
        if live.is_empty() {
            return Ok(format!("No bookings today ({today})"));
        }

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for booking in &live {
            *counts.entry(type_label(booking.booking_type)).or_insert(0) += 1;
        }
        let parts: Vec<String> = counts
            .iter()
            .map(|(label, count)| format!("{count} {label}"))
            .collect();
        let guests: i32 = live.iter().map(|b| b.guest_count).sum();
        Ok(format!(
            "Today {today}: {} ({} guests total)",
            parts.join(", "),
            guests
        ))
    }
}

fn type_label(booking_type: BookingType) -> &'static str {
    match booking_type {
        BookingType::Bath => "bath",
        BookingType::TubOnly => "tub",
        BookingType::Spa => "spa",
        BookingType::QuadShort => "quad (short)",
        BookingType::QuadLong => "quad (long)",
    }
}

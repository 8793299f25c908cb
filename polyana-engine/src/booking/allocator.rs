//! Slot allocation math
//!
//! Pure calculations over in-memory booking lists; all IO stays in the
//! manager. Windows are half-open minute intervals `[start, end)` on
//! one venue-local date, so adjacent windows never conflict.

use serde::Serialize;

use shared::models::{Booking, ResourceKind};

use crate::utils::{AppError, AppResult};

/// Half-open interval overlap test
pub fn windows_overlap(a_start: u16, a_end: u16, b_start: u16, b_end: u16) -> bool {
    a_start < b_end && b_start < a_end
}

/// Minutes from midnight as HH:MM (messages and logs)
pub fn fmt_min(min: u16) -> String {
    format!("{:02}:{:02}", min / 60, min % 60)
}

/// One window in a resource's fixed grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowSlot {
    pub start_min: u16,
    pub end_min: u16,
    pub available: bool,
}

/// Per-day calendar flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOccupancy {
    None,
    Partial,
    Full,
}

/// Enumerated grid windows per resource kind
///
/// Baths run 3h sessions, spa rooms hourly sessions, quads 2h rides.
/// Off-grid reservations are allowed; the grid drives availability
/// listings and the month calendar.
pub fn grid_windows(kind: ResourceKind) -> Vec<(u16, u16)> {
    match kind {
        ResourceKind::Bath => vec![(600, 780), (780, 960), (960, 1140), (1140, 1320)],
        ResourceKind::SpaRoom => (10u16..22).map(|h| (h * 60, (h + 1) * 60)).collect(),
        ResourceKind::QuadUnit => vec![(600, 720), (720, 840), (840, 960), (960, 1080)],
    }
}

/// Validate a requested window against operating hours
pub fn validate_window(start: u16, end: u16, open_min: u16, close_min: u16) -> AppResult<()> {
    if end <= start {
        return Err(AppError::invalid_window(format!(
            "End {} is not after start {}",
            fmt_min(end),
            fmt_min(start)
        )));
    }
    if start < open_min || end > close_min {
        return Err(AppError::invalid_window(format!(
            "Window {}-{} is outside operating hours {}-{}",
            fmt_min(start),
            fmt_min(end),
            fmt_min(open_min),
            fmt_min(close_min)
        )));
    }
    Ok(())
}

fn occupying<'a>(
    bookings: &'a [Booking],
    start: u16,
    end: u16,
    now_millis: i64,
) -> impl Iterator<Item = &'a Booking> {
    bookings.iter().filter(move |b| {
        b.occupies(now_millis) && windows_overlap(start, end, b.start_min, b.end_min)
    })
}

/// Whether a single-occupancy window is free of occupying bookings
pub fn window_free(bookings: &[Booking], start: u16, end: u16, now_millis: i64) -> bool {
    occupying(bookings, start, end, now_millis).next().is_none()
}

/// Remaining quad machines in a window
///
/// Machines are shared across routes: every occupying quad booking that
/// overlaps the window holds `guest_count` machines regardless of its
/// route.
pub fn quads_remaining(
    pool_size: i32,
    bookings: &[Booking],
    start: u16,
    end: u16,
    now_millis: i64,
) -> i32 {
    let held: i32 = occupying(bookings, start, end, now_millis)
        .map(|b| b.guest_count)
        .sum();
    (pool_size - held).max(0)
}

/// Availability of one resource's grid given its bookings for the day
pub fn availability(
    kind: ResourceKind,
    pool_size: i32,
    bookings: &[Booking],
    now_millis: i64,
) -> Vec<WindowSlot> {
    grid_windows(kind)
        .into_iter()
        .map(|(start, end)| {
            let available = match kind {
                ResourceKind::QuadUnit => {
                    quads_remaining(pool_size, bookings, start, end, now_millis) > 0
                }
                _ => window_free(bookings, start, end, now_millis),
            };
            WindowSlot {
                start_min: start,
                end_min: end,
                available,
            }
        })
        .collect()
}

/// Collapse per-resource window lists into one day's calendar flag
///
/// Full requires every resource of the kind to have all of its grid
/// windows unavailable; Partial means some occupying booking touches
/// the day.
pub fn day_occupancy(per_resource: &[Vec<WindowSlot>], has_occupying: bool) -> DayOccupancy {
    let full = !per_resource.is_empty()
        && per_resource
            .iter()
            .all(|windows| !windows.is_empty() && windows.iter().all(|w| !w.available));
    if full {
        DayOccupancy::Full
    } else if has_occupying {
        DayOccupancy::Partial
    } else {
        DayOccupancy::None
    }
}

//! Quad Slot Model
//!
//! A departure slot shared by the quad fleet. Bookings of the same
//! route and window join an existing slot instead of opening a new
//! one; capacity counts machines, not windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::RouteType;

/// Shared quad departure slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,

    pub date: NaiveDate,

    /// Window start, minutes from local midnight
    pub start_min: u16,
    /// Window end, minutes from local midnight (half-open)
    pub end_min: u16,

    pub route: RouteType,

    /// Fleet size at slot creation
    pub total_quads: i32,

    /// Machines held by live bookings
    pub booked_quads: i32,

    /// A joiner already received the proximity discount here
    #[serde(default)]
    pub discount_applied: bool,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Slot {
    /// Machines still free in this slot
    pub fn remaining(&self) -> i32 {
        self.total_quads - self.booked_quads
    }
}

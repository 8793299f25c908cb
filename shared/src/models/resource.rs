//! Resource Model
//!
//! A bookable physical asset: a bath house, a spa room, or the quad
//! fleet. Rows are seeded/edited administratively; the booking flow
//! never creates or deletes them.

use serde::{Deserialize, Serialize};

/// Resource kind, drives the capacity model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// Bath house: single occupancy per window
    Bath,
    /// Spa room: single occupancy per window
    SpaRoom,
    /// Quad fleet: pooled, N machines per window
    QuadUnit,
}

/// Resource entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,

    /// Stable code shown to staff ("B1", "SPA2", "QUAD")
    pub code: String,

    pub kind: ResourceKind,

    /// Display name
    pub name: String,

    /// Pool capacity for pooled kinds; None for single-occupancy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<i32>,

    /// Inactive resources are hidden from booking
    #[serde(default = "default_active")]
    pub active: bool,

    /// Creation time (Unix millis)
    pub created_at: i64,

    /// Last update time (Unix millis)
    pub updated_at: i64,
}

fn default_active() -> bool {
    true
}

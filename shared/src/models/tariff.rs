//! Tariff Model
//!
//! Price list rows. A row either applies every day (`date: None`) or
//! overrides the default on one specific date. Tiered rows carry a
//! guest threshold and an over-threshold base.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::BookingType;

/// One price list row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    pub id: i64,

    pub booking_type: BookingType,

    /// None = default row; Some = single-date override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Base price in whole currency units
    pub base: i64,

    /// Guest count at or below which `base` applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_guests: Option<i32>,

    /// Base price when guests exceed the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_over_threshold: Option<i64>,

    /// Price is per machine/guest rather than per window
    #[serde(default)]
    pub per_guest: bool,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Tariff {
    /// Base charge for `guests` under this row's tier rule
    pub fn base_for(&self, guests: i32) -> i64 {
        let tiered = match (self.threshold_guests, self.base_over_threshold) {
            (Some(threshold), Some(over)) if guests > threshold => over,
            _ => self.base,
        };
        if self.per_guest {
            tiered * guests as i64
        } else {
            tiered
        }
    }
}

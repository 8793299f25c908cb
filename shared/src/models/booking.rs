//! Booking Model
//!
//! One reservation against one resource for one {date, start, end}
//! window. The pricing snapshot is frozen at creation and never
//! recomputed; bookings are never deleted, only status-transitioned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cash_transaction::PaymentMethod;
use super::operator::Operator;

/// Booking type, drives pricing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    /// Whole bath house rental
    Bath,
    /// Hot tub only (no steam room)
    TubOnly,
    /// Spa program in a spa room
    Spa,
    /// Quad ride, short route
    QuadShort,
    /// Quad ride, long route
    QuadLong,
}

impl BookingType {
    /// Route for quad ride types; None for everything else
    pub fn route(&self) -> Option<RouteType> {
        match self {
            BookingType::QuadShort => Some(RouteType::Short),
            BookingType::QuadLong => Some(RouteType::Long),
            _ => None,
        }
    }
}

/// Quad ride route
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    Short,
    Long,
}

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created from a guest request, awaiting a staff callback
    #[default]
    PendingCall,
    /// Confirmed by staff, awaiting prepayment
    AwaitingPrepayment,
    Confirmed,
    Cancelled,
    /// Hold lapsed before confirmation/prepayment
    Expired,
    Completed,
    NoShow,
}

impl BookingStatus {
    /// Terminal statuses never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled
                | BookingStatus::Expired
                | BookingStatus::Completed
                | BookingStatus::NoShow
        )
    }

    /// One-directional transition table
    pub fn can_transition(&self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (PendingCall, AwaitingPrepayment)
                | (PendingCall, Confirmed)
                | (PendingCall, Cancelled)
                | (PendingCall, Expired)
                | (AwaitingPrepayment, Confirmed)
                | (AwaitingPrepayment, Cancelled)
                | (AwaitingPrepayment, Expired)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }

    /// Statuses that carry a hold-expiry timestamp
    pub fn holds(&self) -> bool {
        matches!(
            self,
            BookingStatus::PendingCall | BookingStatus::AwaitingPrepayment
        )
    }
}

/// Pricing snapshot, frozen at booking creation
///
/// Whole currency units; `total = base - discount_amount`,
/// `discount_amount = round(base * discount_percent / 100)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PriceQuote {
    pub base: i64,
    pub discount_percent: u32,
    pub discount_amount: i64,
    pub total: i64,
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,

    /// Resource code this booking occupies
    pub resource_code: String,

    pub booking_type: BookingType,

    /// Venue-local date of the window
    pub date: NaiveDate,

    /// Window start, minutes from local midnight
    pub start_min: u16,

    /// Window end, minutes from local midnight (half-open)
    pub end_min: u16,

    /// Guests; for quad rides this is the number of machines
    pub guest_count: i32,

    pub customer_name: String,
    pub customer_phone: String,

    pub status: BookingStatus,

    /// Frozen at creation; never recomputed
    pub price: PriceQuote,

    /// Proximity discount was granted on slot join
    #[serde(default)]
    pub proximity_discount: bool,

    /// Prepayment recorded at creation
    #[serde(default)]
    pub prepayment: i64,

    /// Running cash payments total
    #[serde(default)]
    pub paid_cash: i64,

    /// Running electronic payments total
    #[serde(default)]
    pub paid_electronic: i64,

    /// Hold expiry (Unix millis) while PendingCall/AwaitingPrepayment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_until: Option<i64>,

    /// Quad slot this booking belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Operator ID snapshot
    pub created_by_id: i64,
    /// Operator name snapshot
    pub created_by_name: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Booking {
    /// Whether this booking still occupies capacity at `now_millis`.
    ///
    /// Terminal bookings never occupy; a held booking stops occupying
    /// the instant its hold lapses, even before a sweep flips it to
    /// Expired.
    pub fn occupies(&self, now_millis: i64) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match self.hold_until {
            Some(t) if self.status.holds() => now_millis < t,
            _ => true,
        }
    }
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub resource_code: String,
    pub booking_type: BookingType,
    pub date: NaiveDate,
    pub start_min: u16,
    pub end_min: u16,
    pub guest_count: i32,
    pub customer_name: String,
    pub customer_phone: String,
    /// Operator-granted discount percent (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u32>,
    /// Prepayment taken at creation
    #[serde(default)]
    pub prepayment: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Staff-created bookings skip the callback hold
    #[serde(default)]
    pub instant_confirm: bool,
}

/// Payment recorded against a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPayment {
    pub method: PaymentMethod,
    pub amount: i64,
    pub operator: Operator,
}

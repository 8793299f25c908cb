//! Booking domain
//!
//! - [`allocator`] - pure window math: overlap, grid enumeration,
//!   pool capacity, calendar flags
//! - [`manager`] - the booking lifecycle state machine and the only
//!   writer of bookings and quad slots

pub mod allocator;
pub mod manager;

pub use allocator::{DayOccupancy, WindowSlot};
pub use manager::BookingManager;

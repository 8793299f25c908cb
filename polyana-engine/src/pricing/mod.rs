//! Pricing
//!
//! Pure quote computation from the tariff list. No state, no IO; the
//! result is snapshotted into the booking at creation and never
//! recomputed, even if tariffs change later.

pub mod calculator;

pub use calculator::{quote, resolve_tariff};

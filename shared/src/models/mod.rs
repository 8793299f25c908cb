//! Data models
//!
//! Shared between the engine and the staff-facing API/UI layers.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]).
//! All persisted instants are Unix millis; bookable windows are a
//! venue-local date plus minutes from midnight.

pub mod booking;
pub mod cash_transaction;
pub mod incasation;
pub mod operator;
pub mod resource;
pub mod shift;
pub mod slot;
pub mod tariff;
pub mod task;

// Re-exports
pub use booking::*;
pub use cash_transaction::*;
pub use incasation::*;
pub use operator::*;
pub use resource::*;
pub use shift::*;
pub use slot::*;
pub use tariff::*;
pub use task::*;

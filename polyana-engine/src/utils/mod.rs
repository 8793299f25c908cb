//! Utility module
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResult`] - engine error taxonomy
//! - [`time`] - venue-timezone conversions and the [`Clock`] seam
//! - [`validation`] - input validation helpers
//! - [`logger`] - tracing bootstrap

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult};
pub use time::{Clock, SystemClock};

//! Shared types for the Polyana venue engine
//!
//! Domain models and small utilities used by the engine crate and by the
//! HTTP/UI layers that sit on top of it. Keeping the types in their own
//! crate lets those layers depend on the data shapes without pulling in
//! the engine itself.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

//! Core module
//!
//! # Module structure
//!
//! - [`Config`] - engine configuration
//! - [`EngineState`] - shared state wiring the managers together
//! - [`EventBus`] - in-process change notifications
//! - [`BackgroundTasks`] - panic-isolated task supervisor

pub mod config;
pub mod events;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use events::{EngineEvent, EventBus, ResourceVersions};
pub use state::EngineState;
pub use tasks::{BackgroundTasks, TaskKind};

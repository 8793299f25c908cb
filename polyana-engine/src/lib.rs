//! Polyana Engine
//!
//! Booking and cash-shift engine for a small countryside leisure venue:
//! two wood-fired baths, two spa rooms and a shared pool of quad bikes.
//!
//! # Core Responsibilities
//!
//! - **Pricing**: tiered tariffs, date overrides, discounts, frozen quotes
//! - **Booking**: window allocation, quad slot pooling, lifecycle state machine
//! - **Cash ledger**: one open shift per cash box, append-only transactions,
//!   admin incasation
//! - **Scheduler**: mandated shift closure, recurring task seeding, staff
//!   reminders, frost watch
//!
//! # Module Structure
//!
//! ```text
//! polyana-engine/
//! ├── core/            # Config, engine state, events, background tasks
//! ├── pricing/         # Tariff resolution and price quotes
//! ├── booking/         # Availability grid + booking lifecycle manager
//! ├── ledger/          # Cash shifts, transactions, incasation
//! ├── scheduler/       # Background cadences
//! ├── services/        # Staff messenger, weather feed
//! ├── store/           # Persistence seam + in-memory store
//! └── utils/           # Errors, clock, validation, logging
//! ```

pub mod booking;
pub mod core;
pub mod ledger;
pub mod pricing;
pub mod scheduler;
pub mod services;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use booking::{BookingManager, DayOccupancy, WindowSlot};
pub use core::{BackgroundTasks, Config, EngineState, EventBus, TaskKind};
pub use ledger::CashLedger;
pub use scheduler::Scheduler;
pub use services::{LogMessenger, Messenger, OpenMeteoFeed, WeatherFeed};
pub use store::{MemoryStore, Store, StoreError};
pub use utils::{AppError, AppResult, Clock, SystemClock};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Print the startup banner
pub fn print_banner() {
    println!(
        r#"
    ____        __
   / __ \____  / /_  ______ _____  ____ _
  / /_/ / __ \/ / / / / __ `/ __ \/ __ `/
 / ____/ /_/ / / /_/ / /_/ / / / / /_/ /
/_/    \____/_/\__, /\__,_/_/ /_/\__,_/
              /____/            Engine
"#
    );
}

//! External collaborators
//!
//! - [`Messenger`] - outbound staff notification channel
//! - [`WeatherFeed`] - daily forecast source for the frost check
//!
//! Both are traits so tests and deployments can swap the transport;
//! their failures are logged and swallowed by the scheduler, never
//! surfaced as engine errors.

pub mod messenger;
pub mod weather;

pub use messenger::{LogMessenger, Messenger};
pub use weather::{DayForecast, OpenMeteoFeed, WeatherFeed};

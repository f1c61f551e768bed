#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod time;

pub use config::{ConfigError, SessionConfig, SrsConfig};
pub use error::Error;
pub use scheduler::{Scheduler, SchedulerConfig, review_card};
pub use time::Clock;

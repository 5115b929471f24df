//! Logging infrastructure for console output.

mod subscriber;

pub use subscriber::{init_subscriber, level_for};
pub use tracing_subscriber::filter::LevelFilter;

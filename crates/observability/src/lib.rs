//! Logging setup shared by every binary and test harness.

pub mod subscriber;

pub use subscriber::{LOG_FORMAT_ENV, LogFormat, init, init_with};

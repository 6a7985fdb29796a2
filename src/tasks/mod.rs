//! Background tasks module
//!
//! This module contains the tokio tasks that drive the mode timer.

pub mod countdown;

// Re-export main types
pub use countdown::{countdown_task, TokioCountdown, DEFAULT_TICK_INTERVAL, DEFAULT_TICK_INTERVAL_MS};

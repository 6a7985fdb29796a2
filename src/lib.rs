//! Caffeine - keep the display awake for a chosen duration
//!
//! Repeated activation cycles through 15, 30, 60 and 120 minutes and then an
//! indefinite mode; the next activation, the countdown running out, or an
//! interruption (phone call, screen off) switches it off again.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Mode, ModeTimerController};
pub use api::create_router;
pub use utils::signals::shutdown_signal;

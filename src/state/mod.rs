//! State management module
//!
//! This module contains the mode timer controller, the values it manages and
//! the application state that composes it with its collaborators.

pub mod app_state;
pub mod controller;
pub mod mode;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use controller::{Countdown, CountdownSink, ModeListener, ModeTimerController, TimerListener};
pub use mode::{Mode, ModeDuration};
pub use timer_state::{TickProgress, TimerState};

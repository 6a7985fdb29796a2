//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::{Interruption, TileView},
    state::{Mode, ModeTimerController, TimerState},
};

/// Countdown details for the active mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatus {
    /// `None` for the unbounded mode
    pub total_seconds: Option<u64>,
    pub remaining_seconds: Option<u64>,
    pub percentage_remaining: Option<f32>,
}

impl From<&TimerState> for TimerStatus {
    fn from(timer: &TimerState) -> Self {
        Self {
            total_seconds: timer.total().as_secs(),
            remaining_seconds: timer.remaining().map(|r| r.as_secs()),
            percentage_remaining: timer.percentage_remaining(),
        }
    }
}

/// Mode and countdown as seen at the time of the response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeStatus {
    pub mode: Mode,
    pub label: String,
    pub timer: Option<TimerStatus>,
}

impl ModeStatus {
    pub fn capture(controller: &ModeTimerController) -> Self {
        let mode = controller.current_mode();
        let timer = controller.timer_state();
        let label = timer
            .as_ref()
            .and_then(|t| t.tick_progress())
            .map(|tick| tick.label)
            .unwrap_or_else(|| mode.label().to_string());

        Self {
            mode,
            label,
            timer: timer.as_ref().map(TimerStatus::from),
        }
    }
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub mode: ModeStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, mode: ModeStatus) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            mode,
        }
    }

    /// Response reflecting whether the controller ended up running
    pub fn for_mode(message: String, mode: ModeStatus) -> Self {
        if mode.mode.is_running() {
            Self::new("active".to_string(), message, mode)
        } else {
            Self::new("inactive".to_string(), message, mode)
        }
    }
}

/// Response to an interruption signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptResponse {
    pub interruption: Interruption,
    pub reset: bool,
    pub timestamp: DateTime<Utc>,
    pub mode: ModeStatus,
}

/// Full status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub mode: ModeStatus,
    pub tile: TileView,
    pub notification: Option<String>,
    pub wake_lock_held: bool,
    pub interruptions_armed: bool,
    pub errors: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

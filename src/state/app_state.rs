//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{Mode, ModeTimerController};
use crate::services::{Interruption, KeepAwakeService, TilePresenter, WakeLock};

/// Composes the mode timer with the sinks that observe it
#[derive(Debug)]
pub struct AppState {
    /// The mode timer shared by every activation source
    pub controller: ModeTimerController,
    /// Presentation sinks, registered with the controller for as long as
    /// this state is alive
    pub tile: Arc<TilePresenter>,
    pub keep_awake: Arc<KeepAwakeService>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the state and register the tile and keep-awake service with
    /// the controller
    pub fn new(port: u16, host: String, controller: ModeTimerController, wake_lock: Box<dyn WakeLock>) -> Self {
        let tile = Arc::new(TilePresenter::new());
        let keep_awake = Arc::new(KeepAwakeService::new(wake_lock));

        controller.add_timer_listener(&tile);
        controller.add_timer_listener(&keep_awake);
        controller.set_mode_listener(Some(&keep_awake));

        Self {
            controller,
            tile,
            keep_awake,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Advance to the next mode and return the mode now active
    pub fn advance(&self) -> Mode {
        self.record_action("advance");
        self.controller.advance_mode();
        let mode = self.controller.current_mode();
        info!("Advance requested, mode is now {}", mode);
        mode
    }

    /// Deactivate manually
    pub fn reset(&self) -> Mode {
        self.record_action("reset");
        self.controller.reset();
        self.tile.show_idle();
        info!("Reset requested");
        self.controller.current_mode()
    }

    /// Apply an external interruption. Returns whether it reset the controller.
    pub fn interrupt(&self, interruption: Interruption) -> bool {
        match interruption {
            Interruption::PhoneCall => {
                if !self.keep_awake.interruptions_armed() {
                    debug!("Ignoring {} while no mode is running", interruption);
                    return false;
                }
                info!("Received {}, resetting", interruption);
                self.record_action(&format!("interrupt:{}", interruption));
                self.controller.reset();
                self.tile.show_idle();
                true
            }
            Interruption::ScreenOff => {
                info!("Received {}, resetting", interruption);
                self.record_action(&format!("interrupt:{}", interruption));
                self.tile.set_unavailable();
                self.controller.reset();
                true
            }
            Interruption::ScreenOn => {
                if !self.controller.current_mode().is_running() {
                    self.record_action(&format!("interrupt:{}", interruption));
                    self.tile.show_idle();
                }
                false
            }
        }
    }

    /// Reset the controller and unregister the presentation sinks
    pub fn detach(&self) {
        info!("Detaching presentation sinks");
        self.controller.reset();
        self.tile.show_idle();
        self.controller.remove_timer_listener(&self.tile);
        self.controller.remove_timer_listener(&self.keep_awake);
        self.controller.clear_mode_listener();
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

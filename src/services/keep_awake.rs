//! Keep-awake service: holds the wake lock and the persistent notification
//! while a mode is running

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

use super::WakeLock;
use crate::state::{Mode, ModeListener, TimerListener};

/// Notification title shown until the first countdown tick arrives
pub const RUNNING_NOTIFICATION: &str = "Caffeine is running";

const WAKE_LOCK_SUBJECT: &str = "wake lock";

/// Observable state of the service
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeepAwakeStatus {
    pub running: bool,
    pub interruptions_armed: bool,
    pub notification: Option<String>,
    pub errors: Vec<String>,
}

pub struct KeepAwakeService {
    wake_lock: Mutex<Box<dyn WakeLock>>,
    status: Mutex<KeepAwakeStatus>,
}

impl KeepAwakeService {
    pub fn new(wake_lock: Box<dyn WakeLock>) -> Self {
        Self {
            wake_lock: Mutex::new(wake_lock),
            status: Mutex::new(KeepAwakeStatus::default()),
        }
    }

    pub fn status(&self) -> KeepAwakeStatus {
        self.lock_status().clone()
    }

    pub fn wake_lock_held(&self) -> bool {
        self.lock_wake_lock().is_held()
    }

    /// Whether call interruptions should currently reset the controller
    pub fn interruptions_armed(&self) -> bool {
        self.lock_status().interruptions_armed
    }

    fn lock_status(&self) -> MutexGuard<'_, KeepAwakeStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_wake_lock(&self) -> MutexGuard<'_, Box<dyn WakeLock>> {
        self.wake_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop recorded errors whose message mentions `subject`
    fn clear_errors_for(&self, subject: &str) {
        let subject = subject.to_lowercase();
        self.lock_status()
            .errors
            .retain(|e| !e.to_lowercase().contains(&subject));
    }

    fn start(&self, mode: Mode) {
        if let Some(duration) = mode.duration() {
            match self.lock_wake_lock().acquire(duration) {
                Ok(()) => self.clear_errors_for(WAKE_LOCK_SUBJECT),
                Err(e) => {
                    warn!("Failed to acquire wake lock for {} mode: {}", mode, e);
                    self.lock_status().errors.push(format!("Wake lock acquisition failed: {}", e));
                }
            }
        }

        let mut status = self.lock_status();
        if !status.interruptions_armed {
            info!("Interruption listeners armed");
            status.interruptions_armed = true;
        }
        status.running = true;
        if status.notification.is_none() {
            status.notification = Some(RUNNING_NOTIFICATION.to_string());
        }
    }

    fn stop(&self) {
        {
            let mut status = self.lock_status();
            if status.interruptions_armed {
                info!("Interruption listeners disarmed");
                status.interruptions_armed = false;
            }
            status.running = false;
            status.notification = None;
        }

        let released = self.lock_wake_lock().release();
        match released {
            Ok(()) => self.clear_errors_for(WAKE_LOCK_SUBJECT),
            Err(e) => {
                warn!("Failed to release wake lock: {}", e);
                self.lock_status().errors.push(format!("Wake lock release failed: {}", e));
            }
        }
    }
}

impl ModeListener for KeepAwakeService {
    fn on_mode_changed(&self, mode: Mode) {
        if mode.is_running() {
            self.start(mode);
        } else {
            self.stop();
        }
    }
}

impl TimerListener for KeepAwakeService {
    fn on_tick(&self, label: &str, _percentage: f32) {
        self.lock_status().notification = Some(label.to_string());
    }

    fn on_finish(&self) {}
}

impl std::fmt::Debug for KeepAwakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeepAwakeService")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

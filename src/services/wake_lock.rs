//! Wake locks that keep the system from idling or sleeping

use std::io;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::state::ModeDuration;

const INHIBIT_COMMAND: &str = "systemd-inhibit";

#[derive(Error, Debug)]
pub enum WakeLockError {
    #[error("failed to spawn systemd-inhibit: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to release wake lock: {0}")]
    Release(#[source] io::Error),
}

/// A resource that keeps the display awake while held
pub trait WakeLock: Send {
    /// Hold the lock for `duration`, replacing any lock still held
    fn acquire(&mut self, duration: ModeDuration) -> Result<(), WakeLockError>;

    /// Release the lock if held
    fn release(&mut self) -> Result<(), WakeLockError>;

    fn is_held(&mut self) -> bool;
}

/// Holds an idle/sleep inhibitor through `systemd-inhibit` wrapping a `sleep`
/// of the requested length. Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct SystemdInhibitor {
    child: Option<Child>,
}

impl SystemdInhibitor {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Arguments for `systemd-inhibit`: block idle and sleep for as long as a
/// `sleep` of the requested length runs
fn inhibit_args(duration: ModeDuration) -> Vec<String> {
    let length = match duration.as_secs() {
        Some(secs) => secs.to_string(),
        None => "infinity".to_string(),
    };
    [
        "--what=idle:sleep",
        "--who=caffeine",
        "--why=Keeping the display awake",
        "--mode=block",
        "sleep",
    ]
    .into_iter()
    .map(String::from)
    .chain(std::iter::once(length))
    .collect()
}

impl WakeLock for SystemdInhibitor {
    fn acquire(&mut self, duration: ModeDuration) -> Result<(), WakeLockError> {
        self.release()?;

        let args = inhibit_args(duration);
        info!("Acquiring wake lock for {:?}", duration);

        let child = Command::new(INHIBIT_COMMAND)
            .args(&args)
            .kill_on_drop(true)
            .spawn()
            .map_err(WakeLockError::Spawn)?;

        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        info!("Releasing wake lock");
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Inhibitor already exited with {}", status);
                Ok(())
            }
            _ => child.start_kill().map_err(WakeLockError::Release),
        }
    }

    fn is_held(&mut self) -> bool {
        match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(_) => {
                self.child = None;
                false
            }
            None => false,
        }
    }
}

/// Wake lock that only tracks and logs requests
#[derive(Debug, Default)]
pub struct NoopWakeLock {
    held: bool,
}

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self, duration: ModeDuration) -> Result<(), WakeLockError> {
        debug!("Wake lock requested for {:?} (inhibitor disabled)", duration);
        self.held = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        if self.held {
            debug!("Wake lock released (inhibitor disabled)");
        }
        self.held = false;
        Ok(())
    }

    fn is_held(&mut self) -> bool {
        self.held
    }
}

/// Check if systemd-inhibit is available on the system
pub async fn check_inhibit_available() -> Result<(), String> {
    Command::new(INHIBIT_COMMAND)
        .arg("--version")
        .output()
        .await
        .map_err(|_| format!("{} is not available, wake locks are disabled", INHIBIT_COMMAND))?;

    info!("{} is available", INHIBIT_COMMAND);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_lock_tracks_held_state() {
        let mut lock = NoopWakeLock::default();
        assert!(!lock.is_held());

        lock.acquire(ModeDuration::minutes(15)).unwrap();
        assert!(lock.is_held());
        lock.acquire(ModeDuration::Unbounded).unwrap();
        assert!(lock.is_held());

        lock.release().unwrap();
        lock.release().unwrap();
        assert!(!lock.is_held());
    }

    #[test]
    fn inhibitor_release_without_child_is_a_noop() {
        let mut inhibitor = SystemdInhibitor::new();
        assert!(inhibitor.release().is_ok());
        assert!(!inhibitor.is_held());
    }

    #[test]
    fn inhibitor_sleeps_for_the_mode_length() {
        let finite = inhibit_args(ModeDuration::minutes(15));
        assert_eq!(finite[0], "--what=idle:sleep");
        assert!(finite.contains(&"--mode=block".to_string()));
        assert_eq!(finite[finite.len() - 2..], ["sleep", "900"]);

        let unbounded = inhibit_args(ModeDuration::Unbounded);
        assert_eq!(unbounded[unbounded.len() - 2..], ["sleep", "infinity"]);
    }
}

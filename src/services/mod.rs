//! Presentation sinks and platform collaborators
//!
//! These observe the mode timer (tile, keep-awake service) or feed it
//! (interruptions), and own the system side effects such as wake locks.

pub mod interruption;
pub mod keep_awake;
pub mod tile;
pub mod wake_lock;

// Re-export main types
pub use interruption::Interruption;
pub use keep_awake::{KeepAwakeService, KeepAwakeStatus};
pub use tile::{TileIcon, TilePresenter, TileState, TileView};
pub use wake_lock::{check_inhibit_available, NoopWakeLock, SystemdInhibitor, WakeLock, WakeLockError};

//! Signal handling for graceful shutdown and signal-driven activation

use std::sync::Arc;

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook_tokio::Signals;
use tracing::{error, info};

use crate::state::AppState;

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create shutdown signal handler: {}", e);
            return std::future::pending().await;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Background task mapping SIGUSR1 to advance and SIGUSR2 to reset
pub async fn activation_signal_task(state: Arc<AppState>) {
    let mut signals = match Signals::new([SIGUSR1, SIGUSR2]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create activation signal handler: {}", e);
            return;
        }
    };

    info!("Listening for SIGUSR1 (advance) and SIGUSR2 (reset)");
    while let Some(signal) = signals.next().await {
        match signal {
            SIGUSR1 => {
                info!("Received SIGUSR1, advancing mode");
                state.advance();
            }
            SIGUSR2 => {
                info!("Received SIGUSR2, resetting");
                state.reset();
            }
            _ => {}
        }
    }
}

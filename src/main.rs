//! Caffeine - keep the display awake for a chosen duration
//!
//! This is the main entry point for the caffeine daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use caffeine::{
    api::create_router,
    config::Config,
    services::{check_inhibit_available, NoopWakeLock, SystemdInhibitor, WakeLock},
    state::{AppState, ModeTimerController},
    tasks::TokioCountdown,
    utils::{activation_signal_task, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("caffeine={},tower_http=info", config.log_level()))
        .init();

    info!("Starting caffeine v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick_interval={}ms, inhibit={}",
        config.host, config.port, config.tick_interval_ms, !config.no_inhibit
    );

    // Fall back to a no-op wake lock when systemd-inhibit is unavailable
    let wake_lock: Box<dyn WakeLock> = if config.no_inhibit {
        Box::new(NoopWakeLock::default())
    } else if let Err(e) = check_inhibit_available().await {
        warn!("{}", e);
        Box::new(NoopWakeLock::default())
    } else {
        Box::new(SystemdInhibitor::new())
    };

    // The controller is owned here and injected into everything that drives it
    let controller = ModeTimerController::new(Box::new(TokioCountdown::new(config.tick_interval())));
    let state = Arc::new(AppState::new(config.port, config.host.clone(), controller, wake_lock));

    let signal_state = Arc::clone(&state);
    tokio::spawn(async move {
        activation_signal_task(signal_state).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /advance          - Advance to the next mode");
    info!("  POST /reset            - Deactivate");
    info!("  POST /interrupt/:kind  - phone-call, screen-off or screen-on");
    info!("  GET  /status           - Current mode, countdown and presentation");
    info!("  GET  /health           - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Release the wake lock before exiting
    state.detach();

    info!("Server shutdown complete");
    Ok(())
}

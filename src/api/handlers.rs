//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::{services::Interruption, state::AppState};
use super::responses::{ApiResponse, HealthResponse, InterruptResponse, ModeStatus, StatusResponse};

/// Handle POST /advance - Move to the next mode
pub async fn advance_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let mode = state.advance();
    info!("Advance endpoint called - mode is now {}", mode);

    let message = if mode.is_running() {
        format!("Caffeine running in {} mode", mode)
    } else {
        "Caffeine deactivated".to_string()
    };
    Json(ApiResponse::for_mode(message, ModeStatus::capture(&state.controller)))
}

/// Handle POST /reset - Deactivate manually
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.reset();
    info!("Reset endpoint called - caffeine deactivated");

    Json(ApiResponse::for_mode(
        "Caffeine deactivated".to_string(),
        ModeStatus::capture(&state.controller),
    ))
}

/// Handle POST /interrupt/:kind - Feed an interruption signal
pub async fn interrupt_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<InterruptResponse>, StatusCode> {
    let interruption = match kind.parse::<Interruption>() {
        Ok(interruption) => interruption,
        Err(e) => {
            warn!("Rejected interruption: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let reset = state.interrupt(interruption);
    Ok(Json(InterruptResponse {
        interruption,
        reset,
        timestamp: Utc::now(),
        mode: ModeStatus::capture(&state.controller),
    }))
}

/// Handle GET /status - Return current mode, presentation and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let keep_awake = state.keep_awake.status();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        mode: ModeStatus::capture(&state.controller),
        tile: state.tile.view(),
        notification: keep_awake.notification,
        wake_lock_held: state.keep_awake.wake_lock_held(),
        interruptions_armed: keep_awake.interruptions_armed,
        errors: keep_awake.errors,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

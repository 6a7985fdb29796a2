use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use caffeine::{
    api::create_router,
    services::NoopWakeLock,
    state::{AppState, Mode, ModeTimerController},
    tasks::{TokioCountdown, DEFAULT_TICK_INTERVAL},
};

fn app() -> (Router, Arc<AppState>) {
    let controller = ModeTimerController::new(Box::new(TokioCountdown::new(DEFAULT_TICK_INTERVAL)));
    let state = Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        controller,
        Box::new(NoopWakeLock::default()),
    ));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test(start_paused = true)]
async fn advance_cycles_and_wraps_to_inactive() {
    let (app, state) = app();
    let expected = ["15min", "30min", "60min", "120min", "infinite", "inactive"];

    for name in expected {
        let (status, body) = send(&app, "POST", "/advance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"]["mode"], name);
    }
    assert_eq!(state.controller.current_mode(), Mode::Inactive);

    let (_, body) = send(&app, "GET", "/status").await;
    assert_eq!(body["tile"]["state"], "inactive");
    assert_eq!(body["last_action"], "advance");
}

#[tokio::test(start_paused = true)]
async fn status_reflects_running_countdown() {
    let (app, _) = app();
    let (_, body) = send(&app, "POST", "/advance").await;
    assert_eq!(body["status"], "active");

    tokio::time::sleep(Duration::from_secs(60)).await;

    let (status, body) = send(&app, "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "15min");
    assert_eq!(body["label"], "14:00");
    assert_eq!(body["timer"]["total_seconds"], 900);
    assert_eq!(body["timer"]["remaining_seconds"], 840);
    assert_eq!(body["tile"]["state"], "active");
    assert_eq!(body["tile"]["icon"], "full");
    assert_eq!(body["notification"], "14:00");
    assert_eq!(body["wake_lock_held"], true);
    assert_eq!(body["interruptions_armed"], true);
}

#[tokio::test(start_paused = true)]
async fn reset_deactivates() {
    let (app, state) = app();
    send(&app, "POST", "/advance").await;

    let (status, body) = send(&app, "POST", "/reset").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["mode"]["timer"], Value::Null);
    assert!(!state.keep_awake.wake_lock_held());
}

#[tokio::test(start_paused = true)]
async fn interruptions() {
    let (app, _) = app();

    let (status, body) = send(&app, "POST", "/interrupt/phone-call").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reset"], false);

    send(&app, "POST", "/advance").await;
    let (_, body) = send(&app, "POST", "/interrupt/phone-call").await;
    assert_eq!(body["reset"], true);
    assert_eq!(body["mode"]["mode"], "inactive");

    send(&app, "POST", "/advance").await;
    let (_, body) = send(&app, "POST", "/interrupt/screen-off").await;
    assert_eq!(body["interruption"], "screen-off");
    assert_eq!(body["reset"], true);
    let (_, body) = send(&app, "GET", "/status").await;
    assert_eq!(body["tile"]["state"], "unavailable");

    send(&app, "POST", "/interrupt/screen-on").await;
    let (_, body) = send(&app, "GET", "/status").await;
    assert_eq!(body["tile"]["state"], "inactive");

    let (status, _) = send(&app, "POST", "/interrupt/doorbell").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

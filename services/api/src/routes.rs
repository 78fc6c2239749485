use crate::infra::AppState;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use panel_rating::config::RuntimeConfig;
use panel_rating::error::AppError;
use serde::Deserialize;
use serde_json::json;

pub(crate) const SESSION_HEADER: &str = "x-session-id";

pub(crate) fn app_router() -> Router {
    Router::new()
        .route("/config", get(config_endpoint))
        .route("/login", post(login_endpoint))
        .route("/check-session", get(check_session_endpoint))
        .route("/logout", post(logout_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

/// Serve the stored runtime configuration. Parsing happens per request so a
/// document corrupted after startup still answers with a 500.
pub(crate) async fn config_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<RuntimeConfig>, AppError> {
    let config = RuntimeConfig::from_json(&state.runtime_config_raw)?;
    Ok(Json(config))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
}

pub(crate) async fn login_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = payload.email.trim();
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "email is required" })),
        )
            .into_response();
    }

    let session_id = state.sessions.login(email);
    (StatusCode::OK, Json(json!({ "session_id": session_id }))).into_response()
}

pub(crate) async fn check_session_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let session = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|session_id| state.sessions.check(session_id));

    match session {
        Some(identity) => Json(json!({ "signed_in": true, "email": identity.email })),
        None => Json(json!({ "signed_in": false })),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogoutRequest {
    pub(crate) session_id: String,
}

pub(crate) async fn logout_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Json<serde_json::Value> {
    let signed_out = state.sessions.logout(&payload.session_id);
    Json(json!({ "signed_out": signed_out }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the control API.
//!
//! Only the login endpoints surface errors, as 400 with `{detail}`. Engine
//! failures are visible through `/status` logs instead.

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use enlist_core::{EngineStats, SignInOutcome};
use enlist_engine::{RunRequest, StartOutcome};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::server::GatewayState;

/// Number of log trail entries returned by `/status`.
pub const STATUS_LOG_LINES: usize = 20;

/// Response body for GET /status.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub authorized: bool,
    pub is_running: bool,
    pub stats: EngineStats,
    /// Most recent log trail entries, oldest first.
    pub logs: Vec<String>,
}

/// Response body for GET /history.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<String>,
}

/// Request body for POST /login/send-code.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

/// Response body for POST /login/send-code.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendCodeResponse {
    /// Challenge handle to echo back to /login/verify.
    pub hash: String,
}

/// Request body for POST /login/verify.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub phone: String,
    #[serde(default)]
    pub code: Option<String>,
    pub hash: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for POST /start.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub source_group: String,
    pub target_group: String,
    /// Seconds to pause after each successful invite.
    #[serde(default)]
    pub delay: Option<u64>,
}

/// Status strings returned by the mutating endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "2FA_REQUIRED")]
    TwoFactorRequired,
    #[serde(rename = "STARTED")]
    Started,
    #[serde(rename = "ALREADY_RUNNING")]
    AlreadyRunning,
    #[serde(rename = "STOPPING")]
    Stopping,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ControlResponse {
    pub status: ControlStatus,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

fn control(status: ControlStatus) -> Json<ControlResponse> {
    Json(ControlResponse { status })
}

fn bad_request(detail: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

/// GET /status
pub async fn get_status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    let authorized = match state.service.auth.is_authorized().await {
        Ok(authorized) => authorized,
        Err(e) => {
            warn!(error = %e, "authorization check failed");
            false
        }
    };

    Json(StatusResponse {
        authorized,
        is_running: state.service.engine.is_running(),
        stats: state.service.engine.stats().await,
        logs: state.service.trail().recent(STATUS_LOG_LINES),
    })
}

/// GET /history
pub async fn get_history(State(state): State<GatewayState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.service.engine.history().await,
    })
}

/// POST /login/send-code
pub async fn post_send_code(
    State(state): State<GatewayState>,
    Json(body): Json<SendCodeRequest>,
) -> Response {
    match state.service.auth.send_code(&body.phone).await {
        Ok(hash) => Json(SendCodeResponse { hash }).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

/// POST /login/verify
pub async fn post_verify(
    State(state): State<GatewayState>,
    Json(body): Json<VerifyRequest>,
) -> Response {
    let outcome = state
        .service
        .auth
        .sign_in(
            &body.phone,
            body.code.as_deref(),
            &body.hash,
            body.password.as_deref(),
        )
        .await;

    match outcome {
        SignInOutcome::Success => control(ControlStatus::Success).into_response(),
        SignInOutcome::TwoFactorRequired => {
            control(ControlStatus::TwoFactorRequired).into_response()
        }
        SignInOutcome::Failure(reason) => bad_request(reason),
    }
}

/// POST /start
///
/// Returns as soon as the run is spawned; progress is reported by /status.
pub async fn post_start(
    State(state): State<GatewayState>,
    Json(body): Json<StartRequest>,
) -> Json<ControlResponse> {
    let delay = body
        .delay
        .map(Duration::from_secs)
        .unwrap_or(state.default_delay);
    let request = RunRequest::new(&body.source_group, &body.target_group, delay);

    match state.service.engine.start(request).await {
        StartOutcome::Started(_) => control(ControlStatus::Started),
        StartOutcome::AlreadyRunning => control(ControlStatus::AlreadyRunning),
    }
}

/// POST /stop
pub async fn post_stop(State(state): State<GatewayState>) -> Json<ControlResponse> {
    state.service.engine.stop().await;
    control(ControlStatus::Stopping)
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_status_strings() {
        let json = serde_json::to_string(&ControlResponse {
            status: ControlStatus::TwoFactorRequired,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"2FA_REQUIRED"}"#);

        let json = serde_json::to_string(&ControlResponse {
            status: ControlStatus::AlreadyRunning,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"ALREADY_RUNNING"}"#);
    }

    #[test]
    fn start_request_delay_is_optional() {
        let body: StartRequest =
            serde_json::from_str(r#"{"source_group":"@a","target_group":"@b"}"#).unwrap();
        assert_eq!(body.delay, None);

        let body: StartRequest =
            serde_json::from_str(r#"{"source_group":"@a","target_group":"@b","delay":5}"#)
                .unwrap();
        assert_eq!(body.delay, Some(5));
    }

    #[test]
    fn verify_request_accepts_password_without_code() {
        let body: VerifyRequest =
            serde_json::from_str(r#"{"phone":"+1","hash":"h","password":"pw"}"#).unwrap();
        assert!(body.code.is_none());
        assert_eq!(body.password.as_deref(), Some("pw"));
    }

    #[test]
    fn error_response_uses_detail() {
        let json = serde_json::to_string(&ErrorResponse {
            detail: "login failed".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"detail":"login failed"}"#);
    }
}

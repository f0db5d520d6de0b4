//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::AppState;
use super::requests::DurationRequest;
use super::responses::{ApiResponse, StatusResponse, HealthResponse};

/// Handle POST /set - Configure the countdown duration
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(reason) = request.validate() {
        warn!("Rejected duration for /set: {}", reason);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.set_duration(request.hours, request.minutes, request.seconds) {
        Ok((snapshot, honored)) => {
            info!("Set endpoint called");
            let message = if honored {
                "Countdown duration configured".to_string()
            } else {
                "Duration kept; countdown in use, reset to change it".to_string()
            };
            Ok(Json(ApiResponse::new(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to configure duration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(snapshot) => {
            info!("Start endpoint called");
            let message = if snapshot.is_started {
                "Countdown running".to_string()
            } else {
                "Nothing to start".to_string()
            };
            Ok(Json(ApiResponse::new(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop the countdown, freezing the remaining span
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(snapshot) => {
            info!("Stop endpoint called");
            let message = if snapshot.is_stopped {
                "Countdown stopped".to_string()
            } else {
                "Nothing to stop".to_string()
            };
            Ok(Json(ApiResponse::new(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Clear the countdown and load a new duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(reason) = request.validate() {
        warn!("Rejected duration for /reset: {}", reason);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.reset(request.hours, request.minutes, request.seconds) {
        Ok(snapshot) => {
            info!("Reset endpoint called");
            Ok(Json(ApiResponse::new("Countdown reset".to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to reset countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the countdown and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.update() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to refresh timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (remaining_seconds, configured_seconds) = match state.durations() {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to read timer durations: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: snapshot,
        remaining_seconds,
        configured_seconds,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

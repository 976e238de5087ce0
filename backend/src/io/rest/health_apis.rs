//! Liveness and, in development, environment diagnostics.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use shared::{EnvConfigSummary, EnvStatusResponse, HealthResponse, RuntimeInfo};
use std::thread;
use tracing::{debug, info};

use crate::config::Environment;
use crate::AppState;

fn runtime_info(state: &AppState) -> RuntimeInfo {
    RuntimeInfo {
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        process_id: std::process::id(),
        available_parallelism: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        uptime: state.started_at.elapsed().as_secs_f64(),
    }
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("GET /api/health");

    let runtime = match state.environment {
        Environment::Development => Some(runtime_info(&state)),
        _ => None,
    };

    let body = HealthResponse {
        status: "OK".to_string(),
        message: "Finance Tracker API is running".to_string(),
        environment: state.environment.as_str().to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        runtime,
    };
    (StatusCode::OK, Json(body))
}

/// Only routed when the server runs in development
pub async fn env_status(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /env-status");

    let config = &state.config;
    let body = EnvStatusResponse {
        environment: state.environment.as_str().to_string(),
        config: EnvConfigSummary {
            host: config.host.to_string(),
            port: config.port,
            data_dir: config.data_dir.display().to_string(),
            cors_origins: config.cors_origins.clone(),
            log_level: config.log_level.clone(),
        },
        runtime: runtime_info(&state),
    };
    (StatusCode::OK, Json(body))
}

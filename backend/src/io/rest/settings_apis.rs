//! # REST API for Settings

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use shared::{CurrencyInfoResponse, SettingsRequest};
use tracing::info;

use super::error::json_rejection;
use super::mappers::SettingsMapper;
use crate::AppState;

/// Create a router for settings related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).post(create_settings).put(update_settings))
        .route("/currency", get(get_currency_info))
}

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");

    match state.settings_service.get_or_create_default().await {
        Ok(settings) => (StatusCode::OK, Json(SettingsMapper::to_dto(settings))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

/// POST always answers 201, even when the document already existed
pub async fn create_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("POST /api/settings");
    apply_settings(state, payload, StatusCode::CREATED).await
}

pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("PUT /api/settings");
    apply_settings(state, payload, StatusCode::OK).await
}

async fn apply_settings(
    state: AppState,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
    success: StatusCode,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_rejection(rejection),
    };
    info!("Applying settings update: {:?}", request);

    match state.settings_service.update_settings(request).await {
        Ok(settings) => (success, Json(SettingsMapper::to_dto(settings))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn get_currency_info(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings/currency");

    match state.settings_service.currency_info().await {
        Ok((current, available, settings)) => {
            let body = CurrencyInfoResponse {
                current,
                available,
                settings: SettingsMapper::to_dto(settings),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => state.api_error(e).into_response(),
    }
}

//! # REST API for Categories
//!
//! CRUD over categories plus the guarded bulk delete.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use shared::{CategoryRequest, ClearAllResponse, MessageResponse};
use tracing::info;

use super::error::json_rejection;
use super::mappers::CategoryMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// Create a router for category related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/clear-all", delete(clear_all_categories))
        .route("/:id", get(get_category).put(update_category).delete(delete_category))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> impl IntoResponse {
    info!("GET /api/categories - query: {:?}", query);

    match state.category_service.list_categories(query.category_type.as_deref()).await {
        Ok(categories) => (StatusCode::OK, Json(CategoryMapper::to_dto_list(categories))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn get_category(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/categories/{}", id);

    match state.category_service.get_category(&id).await {
        Ok(category) => (StatusCode::OK, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_rejection(rejection),
    };
    info!("POST /api/categories - request: {:?}", request);

    match state.category_service.create_category(request).await {
        Ok(category) => (StatusCode::CREATED, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_rejection(rejection),
    };
    info!("PUT /api/categories/{} - request: {:?}", id, request);

    match state.category_service.update_category(&id, request).await {
        Ok(category) => (StatusCode::OK, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/categories/{}", id);

    match state.category_service.delete_category(&id).await {
        Ok(()) => {
            let body = MessageResponse {
                message: "Category deleted successfully".to_string(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn clear_all_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/categories/clear-all");

    match state.category_service.clear_all_categories().await {
        Ok(deleted_count) => {
            let body = ClearAllResponse {
                message: "All categories cleared".to_string(),
                deleted_count,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => state.api_error(e).into_response(),
    }
}

//! # REST API for Expenses and Deposits
//!
//! Both collections expose the same routes. [`router`] is mounted once per
//! kind and tags its requests with the [`TransactionKind`] through an
//! `Extension`, which the handlers use to pick the matching service.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Extension, Router,
};
use serde::Deserialize;
use shared::{ClearAllResponse, MessageResponse, TransactionKind, TransactionRequest};
use tracing::info;

use super::error::json_rejection;
use super::mappers::TransactionMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Create a router for one transaction collection
pub fn router(kind: TransactionKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/summary", get(get_summary))
        .route("/date-range", get(list_by_date_range))
        .route("/category/:category_id", get(list_by_category))
        .route("/clear-all", delete(clear_all))
        .route(
            "/:id",
            get(get_transaction).put(update_transaction).delete(delete_transaction),
        )
        .layer(Extension(kind))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
) -> impl IntoResponse {
    info!("GET /api/{}", kind.collection());

    match state.transactions(kind).list().await {
        Ok(records) => (StatusCode::OK, Json(TransactionMapper::to_dto_list(records))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/{}/{}", kind.collection(), id);

    match state.transactions(kind).get(&id).await {
        Ok(record) => (StatusCode::OK, Json(TransactionMapper::to_dto(record))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/{}/category/{}", kind.collection(), category_id);

    match state.transactions(kind).list_by_category(&category_id).await {
        Ok(records) => (StatusCode::OK, Json(TransactionMapper::to_dto_list(records))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn list_by_date_range(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
    Query(query): Query<DateRangeQuery>,
) -> impl IntoResponse {
    info!("GET /api/{}/date-range - query: {:?}", kind.collection(), query);

    let result = state
        .transactions(kind)
        .list_by_date_range(query.start_date.as_deref(), query.end_date.as_deref())
        .await;
    match result {
        Ok(records) => (StatusCode::OK, Json(TransactionMapper::to_dto_list(records))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
) -> impl IntoResponse {
    info!("GET /api/{}/summary", kind.collection());

    match state.transactions(kind).summary().await {
        Ok(summary) => (StatusCode::OK, Json(TransactionMapper::to_summary_dto(summary))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_rejection(rejection),
    };
    info!("POST /api/{} - request: {:?}", kind.collection(), request);

    match state.transactions(kind).create(request).await {
        Ok(record) => (StatusCode::CREATED, Json(TransactionMapper::to_dto(record))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return json_rejection(rejection),
    };
    info!("PUT /api/{}/{} - request: {:?}", kind.collection(), id, request);

    match state.transactions(kind).update(&id, request).await {
        Ok(record) => (StatusCode::OK, Json(TransactionMapper::to_dto(record))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/{}/{}", kind.collection(), id);

    match state.transactions(kind).delete(&id).await {
        Ok(()) => {
            let body = MessageResponse {
                message: format!("{} deleted successfully", kind.label()),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn clear_all(
    State(state): State<AppState>,
    Extension(kind): Extension<TransactionKind>,
) -> impl IntoResponse {
    info!("DELETE /api/{}/clear-all", kind.collection());

    match state.transactions(kind).clear_all().await {
        Ok(deleted_count) => {
            let body = ClearAllResponse {
                message: format!("All {} cleared", kind.collection()),
                deleted_count,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => state.api_error(e).into_response(),
    }
}

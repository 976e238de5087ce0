//! # REST API for Analytics
//!
//! Every endpoint accepts the same window selectors: `month=YYYY-MM`,
//! `startDate` + `endDate`, or `period=week|month|quarter|year`.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::error::query_rejection;
use crate::domain::analytics::WindowQuery;
use crate::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQuery {
    pub month: Option<String>,
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Length of the monthly trend series
    pub months: Option<u32>,
}

impl OverviewQuery {
    fn window(&self) -> WindowQuery {
        WindowQuery {
            month: self.month.clone(),
            period: self.period.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

/// Create a router for analytics related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/overview", get(get_overview))
        .route("/budget-status", get(get_budget_status))
}

pub async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection(rejection),
    };
    info!("GET /api/analytics/summary - query: {:?}", query);

    match state.analytics_service.summary(&query, Utc::now()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn get_overview(
    State(state): State<AppState>,
    query: Result<Query<OverviewQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection(rejection),
    };
    info!("GET /api/analytics/overview - query: {:?}", query);

    match state
        .analytics_service
        .overview(&query.window(), query.months, Utc::now())
        .await
    {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

pub async fn get_budget_status(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection(rejection),
    };
    info!("GET /api/analytics/budget-status - query: {:?}", query);

    match state.analytics_service.budget_status(&query, Utc::now()).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

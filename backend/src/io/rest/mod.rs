//! # REST API Interface Layer
//!
//! HTTP endpoints of the finance tracker. This layer only translates:
//! requests into service calls, domain results into DTOs, and domain errors
//! into status codes (see [`error`]). No business rules live here.
//!
//! ## Routes
//!
//! ```text
//! /health                       liveness (also under /api/health)
//! /env-status                   effective configuration, development only
//! /api/categories               category CRUD, ?type= filter, /clear-all
//! /api/expenses, /api/deposits  transaction CRUD, /summary, /date-range,
//!                               /category/:id, /clear-all
//! /api/settings                 singleton settings, /currency
//! /api/analytics                /summary, /overview, /budget-status
//! ```

pub mod analytics_apis;
pub mod category_apis;
pub mod error;
pub mod health_apis;
pub mod mappers;
pub mod settings_apis;
pub mod transaction_apis;

use axum::{
    http::{HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{ErrorResponse, TransactionKind};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Environment;
use crate::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_apis::health_check))
        .nest("/categories", category_apis::router())
        .nest("/expenses", transaction_apis::router(TransactionKind::Expense))
        .nest("/deposits", transaction_apis::router(TransactionKind::Deposit))
        .nest("/settings", settings_apis::router())
        .nest("/analytics", analytics_apis::router());

    let mut router = Router::new().route("/health", get(health_apis::health_check));
    if app_state.environment == Environment::Development {
        router = router.route("/env-status", get(health_apis::env_status));
    }

    router
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

async fn route_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    warn!("404 - Route not found: {} {}", method, uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Route not found".to_string(),
            expense_count: None,
        }),
    )
}

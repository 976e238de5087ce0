//! Translation of domain failures into HTTP responses.
//!
//! Every non-2xx body has the shape `{ "error": "<message>" }`; a delete
//! blocked by expenses adds `expenseCount`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::errors::DomainError;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug)]
pub struct ApiError {
    error: DomainError,
    expose_details: bool,
}

impl ApiError {
    /// `expose_details` controls whether unexpected failures carry their
    /// message or the generic one
    pub fn new(error: DomainError, expose_details: bool) -> Self {
        Self { error, expose_details }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            DomainError::Validation(_) | DomainError::Referential { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.error {
            DomainError::Validation(message) | DomainError::NotFound(message) => {
                warn!("Request rejected ({}): {}", status, message);
                ErrorResponse { error: message, expense_count: None }
            }
            DomainError::Referential { message, expense_count } => {
                warn!("Request rejected ({}): {}", status, message);
                ErrorResponse { error: message, expense_count }
            }
            DomainError::Unexpected(e) => {
                error!("Unexpected failure: {:#}", e);
                let message = if self.expose_details {
                    format!("{:#}", e)
                } else {
                    GENERIC_ERROR_MESSAGE.to_string()
                };
                ErrorResponse { error: message, expense_count: None }
            }
        };
        (status, Json(body)).into_response()
    }
}

/// 400 with the standard body
pub fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    warn!("Bad request: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message, expense_count: None }),
    )
        .into_response()
}

pub fn json_rejection(rejection: JsonRejection) -> Response {
    bad_request(rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> Response {
    bad_request(rejection.body_text())
}

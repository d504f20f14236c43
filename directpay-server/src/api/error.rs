//! API Error Handling
//!
//! Unified error types and conversion for API responses. Every error body
//! is `{"msg": "..."}`.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use directpay_core::dto::Message;

use crate::service::{charge_service::ChargeError, order_service::OrderError};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    /// Unauthenticated; carries the login URL to redirect to
    LoginRequired(String),
    DatabaseError(sqlx::Error),
    InternalError(String),
}

impl ApiError {
    /// The catch-all rejection for malformed or wrong-method requests
    pub fn bad_request() -> Self {
        ApiError::BadRequest("Bad Request".to_string())
    }

    pub fn missing_parameters() -> Self {
        ApiError::BadRequest("Missing parameters".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::LoginRequired(location) => {
                return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
            }
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(Message::new(message))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<ChargeError> for ApiError {
    fn from(err: ChargeError) -> Self {
        match err {
            ChargeError::NotFound(id) => {
                tracing::debug!("Charge {} not found", id);
                ApiError::NotFound("Charge not found".to_string())
            }
            ChargeError::Forbidden(id) => {
                tracing::debug!("Access to charge {} denied", id);
                ApiError::Forbidden("Forbidden".to_string())
            }
            ChargeError::UnsupportedStatus(status) => {
                tracing::debug!("Unsupported charge status {:?}", status);
                ApiError::BadRequest("Not supported".to_string())
            }
            ChargeError::ValidationError(msg) => ApiError::BadRequest(msg),
            ChargeError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => {
                tracing::debug!("Order {} not found", id);
                ApiError::NotFound("Wrong order".to_string())
            }
            OrderError::Forbidden(id) => {
                tracing::debug!("Access to order {} denied", id);
                ApiError::Forbidden("Forbidden".to_string())
            }
            OrderError::InvalidState(msg) => ApiError::BadRequest(msg),
            OrderError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

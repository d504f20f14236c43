//! API Module
//!
//! HTTP API layer for the direct payments server.
//! Each submodule handles endpoints for a specific domain.

pub mod auth;
pub mod charge;
pub mod error;
pub mod form;
pub mod health;
pub mod order;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::attachments::AttachmentStore;
use crate::config::ServerConfig;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub attachments: AttachmentStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: ServerConfig) -> Self {
        let attachments = AttachmentStore::new(config.attachment_dir.clone());
        Self {
            pool,
            config: Arc::new(config),
            attachments,
        }
    }
}

/// Create the main API router with all endpoints
///
/// Requests using a method a route does not serve get the generic
/// 400 "Bad Request" rather than 405.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_attachment_bytes;

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Charge pages and lifecycle
        .route(
            "/direct_payments/",
            get(charge::index).fallback(reject_method),
        )
        .route(
            "/direct_payments/new_charge",
            post(charge::new_charge)
                .fallback(reject_method)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/direct_payments/remove_charge_entry",
            post(charge::remove_charge_entry).fallback(reject_method),
        )
        .route(
            "/direct_payments/update_charge_amount",
            post(charge::update_charge_amount).fallback(reject_method),
        )
        .route(
            "/direct_payments/update_charge_status",
            post(charge::update_charge_status).fallback(reject_method),
        )
        .route(
            "/direct_payments/add_charge_comment",
            post(charge::add_charge_comment).fallback(reject_method),
        )
        // Settlement
        .route(
            "/direct_payments/direct_purchase_order",
            post(order::direct_purchase_order).fallback(reject_method),
        )
        // JSON reads
        .route(
            "/direct_payments/charges",
            get(charge::list_charges).fallback(reject_method),
        )
        .route(
            "/direct_payments/charge/{id}",
            get(charge::get_charge).fallback(reject_method),
        )
        .route(
            "/direct_payments/balance",
            get(charge::get_balance).fallback(reject_method),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn reject_method() -> ApiError {
    ApiError::bad_request()
}

/// 302 redirect, the status browsers follow with a GET
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

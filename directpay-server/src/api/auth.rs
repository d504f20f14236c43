//! Request authentication
//!
//! Resolves the caller of every direct payments endpoint into an explicit
//! [`RequestContext`]. Callers present `Authorization: Bearer <token>`; the
//! SHA-256 of the token is matched against the users table. Requests without
//! a known token are redirected to the login page.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use directpay_core::domain::context::RequestContext;
use sha2::{Digest, Sha256};

use crate::api::{AppState, error::ApiError};
use crate::repository::user_repository;

/// Extractor yielding the authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let login = || ApiError::LoginRequired(state.config.login_url_for(parts.uri.path()));

        let Some(token) = bearer_token(&parts.headers) else {
            return Err(login());
        };

        match user_repository::find_by_token_hash(&state.pool, &hash_token(token)).await? {
            Some(ctx) => Ok(CurrentUser(ctx)),
            None => {
                tracing::debug!("Rejected unknown API token for {}", parts.uri.path());
                Err(login())
            }
        }
    }
}

/// Token from an `Authorization: Bearer` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Hex SHA-256 of a token, as stored in `users.api_token_hash`
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

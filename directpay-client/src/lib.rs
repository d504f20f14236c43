//! Direct Payments HTTP Client
//!
//! A typed HTTP client for the direct payments server, used by the CLI and
//! by any service that needs to submit or review charges.
//!
//! # Example
//!
//! ```no_run
//! use directpay_client::DirectPayClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DirectPayClient::new("http://localhost:8080", "my-api-token")?;
//!
//!     for charge in client.list_charges().await? {
//!         println!("{} {} {}", charge.id, charge.amount, charge.status);
//!     }
//!     Ok(())
//! }
//! ```

mod charges;
pub mod error;
mod orders;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use orders::SettlementResult;

use directpay_core::dto::Message;
use reqwest::{Client, RequestBuilder, header, redirect};
use serde::de::DeserializeOwned;

/// HTTP client for the direct payments API
///
/// Redirects are never followed: the server answers some calls with a
/// redirect (login, dashboard, receipt) that the client interprets itself.
#[derive(Debug, Clone)]
pub struct DirectPayClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// API token sent as a bearer credential
    token: String,
    /// HTTP client instance
    client: Client,
}

impl DirectPayClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server (e.g., "http://localhost:8080")
    /// * `token` - The caller's API token
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self::with_client(base_url, token, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// The given client should not follow redirects, or login and receipt
    /// redirects cannot be told apart.
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/direct_payments/{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&self.token)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = check_status(response).await?;

        if response.status().is_redirection() {
            return Err(redirect_error(&response));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle a `{"msg": ...}` response and return the message
    async fn handle_message(&self, response: reqwest::Response) -> Result<String> {
        let message: Message = self.handle_response(response).await?;
        Ok(message.msg)
    }

    /// Handle a response that must redirect somewhere other than the login page
    async fn handle_redirect(&self, response: reqwest::Response) -> Result<String> {
        let response = check_status(response).await?;

        match redirect_target(&response) {
            Some(location) if !is_login_redirect(&location) => Ok(location),
            Some(_) => Err(ClientError::Unauthenticated),
            None => Err(ClientError::ParseError(format!(
                "Expected a redirect, got status {}",
                response.status()
            ))),
        }
    }
}

/// Turn 4xx/5xx responses into errors, passing everything else through
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_message(&body)));
    }

    Ok(response)
}

fn redirect_target(response: &reqwest::Response) -> Option<String> {
    if !response.status().is_redirection() {
        return None;
    }
    response
        .headers()
        .get(header::LOCATION)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

fn redirect_error(response: &reqwest::Response) -> ClientError {
    match redirect_target(response) {
        Some(location) if is_login_redirect(&location) => ClientError::Unauthenticated,
        Some(location) => ClientError::UnexpectedRedirect(location),
        None => ClientError::UnexpectedRedirect(String::new()),
    }
}

/// The server sends unauthenticated callers to `<login>?next=<path>`
fn is_login_redirect(location: &str) -> bool {
    location.contains("?next=") || location.contains("&next=")
}

/// The `msg` of an error body, or the body itself when it is not JSON
fn error_message(body: &str) -> String {
    serde_json::from_str::<Message>(body)
        .map(|m| m.msg)
        .unwrap_or_else(|_| body.to_string())
}

//! Configuration module
//!
//! Connection settings shared by every command.

use anyhow::{Context, Result};
use directpay_client::DirectPayClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the direct payments server
    pub server_url: String,

    /// API token of the caller
    pub token: String,
}

impl Config {
    /// Build a client for the configured server
    pub fn client(&self) -> Result<DirectPayClient> {
        DirectPayClient::new(&self.server_url, &self.token).context("Failed to create HTTP client")
    }
}

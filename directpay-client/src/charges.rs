//! Charge-related API endpoints

use std::path::Path;

use directpay_core::domain::balance::UserBalance;
use directpay_core::domain::charge::{Charge, ChargeStatus};
use directpay_core::dto::charge::ChargeDetail;
use reqwest::multipart;

use crate::DirectPayClient;
use crate::error::{ClientError, Result};

impl DirectPayClient {
    // =============================================================================
    // Reads
    // =============================================================================

    /// List the caller's visible charges, newest first
    pub async fn list_charges(&self) -> Result<Vec<Charge>> {
        let response = self.get("charges").send().await?;
        self.handle_response(response).await
    }

    /// Get a charge and its comment log
    ///
    /// # Arguments
    /// * `charge_id` - The charge ID
    pub async fn get_charge(&self, charge_id: i64) -> Result<ChargeDetail> {
        let response = self.get(&format!("charge/{}", charge_id)).send().await?;
        self.handle_response(response).await
    }

    /// Get the caller's balance
    pub async fn get_balance(&self) -> Result<UserBalance> {
        let response = self.get("balance").send().await?;
        self.handle_response(response).await
    }

    // =============================================================================
    // Charge Lifecycle
    // =============================================================================

    /// Submit a new charge with a proof-of-payment file
    ///
    /// # Arguments
    /// * `amount` - Amount claimed, in minor units
    /// * `user_notes` - Free-text notes for the reviewer
    /// * `attachment` - Local file to upload
    ///
    /// # Returns
    /// The URL the server redirected to (its dashboard)
    ///
    /// # Example
    /// ```no_run
    /// # use directpay_client::DirectPayClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = DirectPayClient::new("http://localhost:8080", "my-api-token")?;
    /// client
    ///     .new_charge(2500, "Bank transfer, ref 88213", std::path::Path::new("slip.pdf"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_charge(
        &self,
        amount: i64,
        user_notes: &str,
        attachment: &Path,
    ) -> Result<String> {
        let bytes = tokio::fs::read(attachment)
            .await
            .map_err(|source| ClientError::Io {
                path: attachment.display().to_string(),
                source,
            })?;

        let file_name = attachment
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let form = multipart::Form::new()
            .text("amount", amount.to_string())
            .text("user_notes", user_notes.to_string())
            .part("attachment", multipart::Part::bytes(bytes).file_name(file_name));

        tracing::debug!("Submitting charge for {} with {}", amount, attachment.display());

        let response = self.post("new_charge").multipart(form).send().await?;
        self.handle_redirect(response).await
    }

    /// Hide a charge from the owner's listing
    pub async fn remove_charge(&self, charge_id: i64) -> Result<String> {
        let id = charge_id.to_string();
        let response = self
            .post("remove_charge_entry")
            .form(&[("charge", id.as_str())])
            .send()
            .await?;

        self.handle_message(response).await
    }

    /// Change the amount claimed by a charge
    pub async fn update_charge_amount(&self, charge_id: i64, new_amount: i64) -> Result<String> {
        let id = charge_id.to_string();
        let amount = new_amount.to_string();
        let response = self
            .post("update_charge_amount")
            .form(&[("charge", id.as_str()), ("new_amount", amount.as_str())])
            .send()
            .await?;

        self.handle_message(response).await
    }

    /// Move a charge to a new review status
    pub async fn update_charge_status(&self, charge_id: i64, status: ChargeStatus) -> Result<String> {
        let id = charge_id.to_string();
        let response = self
            .post("update_charge_status")
            .form(&[("charge", id.as_str()), ("status", status.as_str())])
            .send()
            .await?;

        self.handle_message(response).await
    }

    /// Append a comment to a charge
    pub async fn add_charge_comment(&self, charge_id: i64, content: &str) -> Result<String> {
        let id = charge_id.to_string();
        let response = self
            .post("add_charge_comment")
            .form(&[("charge", id.as_str()), ("content", content)])
            .send()
            .await?;

        self.handle_message(response).await
    }
}

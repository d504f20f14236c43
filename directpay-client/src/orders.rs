//! Order settlement endpoint

use crate::DirectPayClient;
use crate::error::Result;

/// How the server answered a settlement request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementResult {
    /// The order was put (partly) on hold or purchased item by item
    Message(String),
    /// The balance paid for the whole order; the receipt lives here
    Receipt(String),
}

impl DirectPayClient {
    /// Pay for an order out of the caller's balance
    ///
    /// # Arguments
    /// * `order_id` - The order's reference number
    pub async fn settle_order(&self, order_id: i64) -> Result<SettlementResult> {
        let id = order_id.to_string();
        let response = self
            .post("direct_purchase_order")
            .form(&[("reference_number", id.as_str())])
            .send()
            .await?;

        if response.status().is_redirection() {
            let location = self.handle_redirect(response).await?;
            return Ok(SettlementResult::Receipt(location));
        }

        let msg = self.handle_message(response).await?;
        Ok(SettlementResult::Message(msg))
    }
}

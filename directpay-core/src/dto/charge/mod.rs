//! Charge DTOs

use serde::{Deserialize, Serialize};

use crate::domain::charge::{Charge, ChargeComment};

/// A charge together with its comment log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeDetail {
    pub charge: Charge,
    pub comments: Vec<ChargeComment>,
}

/// Validated fields of a new charge submission
///
/// The attachment bytes travel separately; `attachment` here is the stored path.
#[derive(Debug, Clone)]
pub struct CreateCharge {
    pub amount: i64,
    pub user_notes: String,
    pub attachment: String,
}

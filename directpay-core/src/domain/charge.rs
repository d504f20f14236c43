//! Charge domain types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A manual payment claim submitted by a user
///
/// Charges are never physically deleted; removal clears `is_shown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub user_notes: String,
    /// Path of the uploaded attachment, relative to the attachment store
    pub attachment: String,
    pub status: ChargeStatus,
    pub is_shown: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review status of a charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Pending,
    Rejected,
    Canceled,
    Approved,
}

impl ChargeStatus {
    pub const ALL: [ChargeStatus; 4] = [
        ChargeStatus::Pending,
        ChargeStatus::Rejected,
        ChargeStatus::Canceled,
        ChargeStatus::Approved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeStatus::Pending => "pending",
            ChargeStatus::Rejected => "rejected",
            ChargeStatus::Canceled => "canceled",
            ChargeStatus::Approved => "approved",
        }
    }
}

impl std::fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the supported values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported charge status: {0:?}")]
pub struct UnsupportedStatus(pub String);

impl FromStr for ChargeStatus {
    type Err = UnsupportedStatus;

    /// Matching is exact: `"Approved"` or `" approved"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChargeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnsupportedStatus(s.to_string()))
    }
}

/// One entry of a charge's comment log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeComment {
    pub id: i64,
    pub charge_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment text recorded when a charge moves between statuses
pub fn status_change_note(from: ChargeStatus, to: ChargeStatus) -> String {
    format!("Status changed from {} to {}", from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_statuses() {
        assert_eq!("pending".parse::<ChargeStatus>(), Ok(ChargeStatus::Pending));
        assert_eq!("rejected".parse::<ChargeStatus>(), Ok(ChargeStatus::Rejected));
        assert_eq!("canceled".parse::<ChargeStatus>(), Ok(ChargeStatus::Canceled));
        assert_eq!("approved".parse::<ChargeStatus>(), Ok(ChargeStatus::Approved));
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        for raw in ["", "Approved", "cancelled", "refunded", " pending", "approved\n"] {
            assert_eq!(
                raw.parse::<ChargeStatus>(),
                Err(UnsupportedStatus(raw.to_string()))
            );
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ChargeStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");

        let status: ChargeStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, ChargeStatus::Approved);
    }

    #[test]
    fn test_status_change_note() {
        assert_eq!(
            status_change_note(ChargeStatus::Pending, ChargeStatus::Approved),
            "Status changed from pending to approved"
        );
    }
}

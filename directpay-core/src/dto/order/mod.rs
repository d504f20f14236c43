//! Order settlement DTOs

use serde::{Deserialize, Serialize};

use crate::domain::balance::UserBalance;
use crate::domain::settlement::{SettlementOutcome, SettlementPlan};

/// What a settlement did, as reported by the service layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub order_id: i64,
    pub outcome: SettlementOutcome,
    pub purchased_items: Vec<i64>,
    pub held_items: Vec<i64>,
    pub charged: i64,
    pub remaining_balance: i64,
}

impl SettlementReport {
    /// Build the report once `balance` reflects the plan's deduction
    pub fn from_plan(order_id: i64, plan: &SettlementPlan, balance: &UserBalance) -> Self {
        Self {
            order_id,
            outcome: plan.outcome,
            purchased_items: plan.purchase.clone(),
            held_items: plan.hold.clone(),
            charged: plan.charged,
            remaining_balance: balance.current_balance(),
        }
    }

    /// Whether any line item was left on hold
    pub fn has_held_items(&self) -> bool {
        !self.held_items.is_empty()
    }
}

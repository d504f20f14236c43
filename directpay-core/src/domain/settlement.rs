//! Settlement planning
//!
//! Decides how a user's balance is allocated against an order. Planning is
//! pure; the server applies the resulting plan inside one transaction.
//!
//! Rules:
//! - a balance of exactly zero puts every outstanding item on hold, even
//!   items that cost nothing
//! - a balance covering the outstanding cost purchases the whole order
//! - otherwise items are visited in listing order and each one is purchased
//!   if the remaining balance covers it, or put on hold if not (first fit,
//!   no reordering, no rollback)

use serde::{Deserialize, Serialize};

use super::order::{Order, OrderStatus};

/// Which branch of the allocation rules applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// Balance was zero; everything outstanding went on hold
    NoBalance,
    /// Balance covered the whole outstanding cost
    FullyPurchased,
    /// Items were allocated one by one
    Partial,
}

/// The changes a settlement will make
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementPlan {
    pub outcome: SettlementOutcome,
    /// Item ids to mark purchased, in listing order
    pub purchase: Vec<i64>,
    /// Item ids to put on hold, in listing order
    pub hold: Vec<i64>,
    /// Amount to deduct from the balance
    pub charged: i64,
    pub order_status: OrderStatus,
}

impl SettlementPlan {
    /// Whether the order ends up fully paid (and needs a purchase time)
    pub fn completes_order(&self) -> bool {
        self.order_status == OrderStatus::Purchased
    }
}

/// Plan the allocation of `balance` against `order`
///
/// Items already purchased are left untouched and not charged again.
pub fn plan(balance: i64, order: &Order) -> SettlementPlan {
    if balance == 0 {
        return SettlementPlan {
            outcome: SettlementOutcome::NoBalance,
            purchase: Vec::new(),
            hold: order.outstanding_items().map(|item| item.id).collect(),
            charged: 0,
            order_status: OrderStatus::OnHold,
        };
    }

    let outstanding = order.outstanding_cost();
    if balance >= outstanding {
        return SettlementPlan {
            outcome: SettlementOutcome::FullyPurchased,
            purchase: order.outstanding_items().map(|item| item.id).collect(),
            hold: Vec::new(),
            charged: outstanding,
            order_status: OrderStatus::Purchased,
        };
    }

    let mut remaining = balance;
    let mut purchase = Vec::new();
    let mut hold = Vec::new();

    for item in order.outstanding_items() {
        if remaining >= item.line_cost {
            remaining -= item.line_cost;
            purchase.push(item.id);
        } else {
            hold.push(item.id);
        }
    }

    let order_status = if hold.is_empty() {
        OrderStatus::Purchased
    } else {
        OrderStatus::OnHold
    };

    SettlementPlan {
        outcome: SettlementOutcome::Partial,
        purchase,
        hold,
        charged: balance - remaining,
        order_status,
    }
}

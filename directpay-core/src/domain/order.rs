//! Order domain types
//!
//! Orders and their line items belong to the shopping cart. Direct payments
//! only read them and move them between `cart`, `onhold` and `purchased`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shopping-cart order with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub purchase_time: Option<DateTime<Utc>>,
    /// Line items in listing order
    pub items: Vec<OrderItem>,
}

/// A purchasable component of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    pub line_cost: i64,
    pub description: String,
}

/// Purchase lifecycle shared by orders and line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Cart,
    #[serde(rename = "onhold")]
    OnHold,
    Purchased,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Cart => "cart",
            OrderStatus::OnHold => "onhold",
            OrderStatus::Purchased => "purchased",
        }
    }

    /// Unknown values fall back to `Cart`, the state nothing has been paid for.
    pub fn from_db(s: &str) -> Self {
        match s {
            "onhold" => OrderStatus::OnHold,
            "purchased" => OrderStatus::Purchased,
            _ => OrderStatus::Cart,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Order {
    /// Sum of line costs still to be paid
    pub fn outstanding_cost(&self) -> i64 {
        self.outstanding_items().map(|item| item.line_cost).sum()
    }

    pub fn outstanding_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|item| !item.is_purchased())
    }

    pub fn is_purchased(&self) -> bool {
        self.status == OrderStatus::Purchased
    }
}

impl OrderItem {
    pub fn is_purchased(&self) -> bool {
        self.status == OrderStatus::Purchased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, line_cost: i64, status: OrderStatus) -> OrderItem {
        OrderItem {
            id,
            order_id: 1,
            status,
            line_cost,
            description: format!("item {}", id),
        }
    }

    #[test]
    fn test_costs_skip_purchased_items() {
        let order = Order {
            id: 1,
            user_id: 1,
            status: OrderStatus::OnHold,
            purchase_time: None,
            items: vec![
                item(1, 100, OrderStatus::Purchased),
                item(2, 40, OrderStatus::OnHold),
                item(3, 10, OrderStatus::Cart),
            ],
        };

        assert_eq!(order.outstanding_cost(), 50);
        assert_eq!(
            order.outstanding_items().map(|i| i.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_status_round_trips_through_db_strings() {
        for status in [OrderStatus::Cart, OrderStatus::OnHold, OrderStatus::Purchased] {
            assert_eq!(OrderStatus::from_db(status.as_str()), status);
        }
        assert_eq!(OrderStatus::from_db("refunded"), OrderStatus::Cart);
    }

    #[test]
    fn test_onhold_serializes_without_separator() {
        let json = serde_json::to_string(&OrderStatus::OnHold).unwrap();
        assert_eq!(json, "\"onhold\"");
    }
}

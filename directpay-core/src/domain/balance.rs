//! Balance domain types

use serde::{Deserialize, Serialize};

/// Per-user balance derived from approved charges
///
/// The balance is never stored directly: it is the approved total minus
/// everything already deducted by order settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: i64,
    pub approved_total: i64,
    pub spent_total: i64,
}

impl UserBalance {
    pub fn current_balance(&self) -> i64 {
        self.approved_total - self.spent_total
    }

    /// Record a deduction against this balance
    pub fn deduct_amount(&mut self, amount: i64) {
        self.spent_total += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_balance() {
        let mut balance = UserBalance {
            user_id: 1,
            approved_total: 500,
            spent_total: 120,
        };
        assert_eq!(balance.current_balance(), 380);

        balance.deduct_amount(80);
        assert_eq!(balance.current_balance(), 300);
        assert_eq!(balance.spent_total, 200);
    }
}

//! Order Service
//!
//! Settles shopping-cart orders against the caller's direct payment balance.

use directpay_core::domain::context::RequestContext;
use directpay_core::domain::order::{Order, OrderStatus};
use directpay_core::domain::settlement;
use directpay_core::dto::order::SettlementReport;
use sqlx::PgPool;

use crate::repository::{balance_repository, order_repository};

/// Service error type
#[derive(Debug)]
pub enum OrderError {
    NotFound(i64),
    Forbidden(i64),
    InvalidState(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;

/// Pay for an order out of the caller's balance, fully or partially
///
/// Runs in one transaction: the order row and the caller's balance stay
/// locked from the balance read until the deduction is committed.
pub async fn direct_purchase_order(
    pool: &PgPool,
    ctx: &RequestContext,
    order_id: i64,
) -> Result<SettlementReport> {
    let mut tx = pool.begin().await?;

    let order = order_repository::find_by_id_for_update(&mut *tx, order_id)
        .await?
        .ok_or(OrderError::NotFound(order_id))?;

    check_settleable(ctx, &order)?;

    balance_repository::lock_for_user(&mut *tx, ctx.user_id).await?;
    let mut balance = balance_repository::get_for_user(&mut *tx, ctx.user_id).await?;
    let available = balance.current_balance();

    let plan = settlement::plan(available, &order);

    order_repository::update_items_status(&mut *tx, &plan.purchase, OrderStatus::Purchased)
        .await?;
    order_repository::update_items_status(&mut *tx, &plan.hold, OrderStatus::OnHold).await?;

    if plan.charged > 0 {
        balance_repository::deduct(&mut *tx, ctx.user_id, order.id, plan.charged).await?;
        balance.deduct_amount(plan.charged);
    }

    let purchase_time = plan.completes_order().then(chrono::Utc::now);
    order_repository::update_status(&mut *tx, order.id, plan.order_status, purchase_time).await?;

    tx.commit().await?;

    tracing::info!(
        "Order {} settled for {}: {:?}, {} purchased, {} on hold, charged {} of {}",
        order.id,
        ctx.username,
        plan.outcome,
        plan.purchase.len(),
        plan.hold.len(),
        plan.charged,
        available
    );

    Ok(SettlementReport::from_plan(order.id, &plan, &balance))
}

// =============================================================================
// Validation
// =============================================================================

fn check_settleable(ctx: &RequestContext, order: &Order) -> Result<()> {
    // Settlement spends the caller's balance: owner only
    if order.user_id != ctx.user_id {
        tracing::warn!(
            "{} tried to settle order {} owned by user {}",
            ctx.username,
            order.id,
            order.user_id
        );
        return Err(OrderError::Forbidden(order.id));
    }

    if order.is_purchased() {
        return Err(OrderError::InvalidState(
            "Order already purchased".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(user_id: i64, status: OrderStatus) -> Order {
        Order {
            id: 12,
            user_id,
            status,
            purchase_time: None,
            items: Vec::new(),
        }
    }

    fn ctx(user_id: i64, is_superuser: bool) -> RequestContext {
        RequestContext {
            user_id,
            username: "buyer".to_string(),
            is_superuser,
        }
    }

    #[test]
    fn test_owner_can_settle_open_orders() {
        assert!(check_settleable(&ctx(1, false), &order(1, OrderStatus::Cart)).is_ok());
        assert!(check_settleable(&ctx(1, false), &order(1, OrderStatus::OnHold)).is_ok());
    }

    #[test]
    fn test_other_users_cannot_settle() {
        assert!(matches!(
            check_settleable(&ctx(2, false), &order(1, OrderStatus::Cart)),
            Err(OrderError::Forbidden(12))
        ));
        // Superusers have no balance claim on someone else's order either
        assert!(matches!(
            check_settleable(&ctx(2, true), &order(1, OrderStatus::Cart)),
            Err(OrderError::Forbidden(12))
        ));
    }

    #[test]
    fn test_purchased_orders_are_final() {
        assert!(matches!(
            check_settleable(&ctx(1, false), &order(1, OrderStatus::Purchased)),
            Err(OrderError::InvalidState(_))
        ));
    }

    mod with_database {
        use super::super::*;
        use crate::test_support;
        use directpay_core::domain::charge::ChargeStatus;
        use directpay_core::domain::settlement::SettlementOutcome;

        async fn deductions(pool: &PgPool, order_id: i64) -> Vec<i64> {
            sqlx::query_scalar("SELECT amount FROM balance_deductions WHERE order_id = $1 ORDER BY id")
                .bind(order_id)
                .fetch_all(pool)
                .await
                .unwrap()
        }

        async fn order_state(
            pool: &PgPool,
            order_id: i64,
        ) -> (String, Option<chrono::DateTime<chrono::Utc>>) {
            sqlx::query_as("SELECT status, purchase_time FROM orders WHERE id = $1")
                .bind(order_id)
                .fetch_one(pool)
                .await
                .unwrap()
        }

        #[sqlx::test(migrations = false)]
        #[ignore = "Requires Postgres at DATABASE_URL"]
        async fn test_partial_settlement_is_applied(pool: PgPool) {
            test_support::migrate(&pool).await;
            let buyer = test_support::user(&pool, "buyer", false).await;
            test_support::charge(&pool, buyer.user_id, 100, ChargeStatus::Approved).await;
            let (order_id, items) = test_support::order(&pool, buyer.user_id, &[60, 80, 30]).await;

            let report = direct_purchase_order(&pool, &buyer, order_id).await.unwrap();

            assert_eq!(report.outcome, SettlementOutcome::Partial);
            assert_eq!(report.purchased_items, vec![items[0], items[2]]);
            assert_eq!(report.held_items, vec![items[1]]);
            assert_eq!(report.charged, 90);
            assert_eq!(report.remaining_balance, 10);

            assert_eq!(
                test_support::item_statuses(&pool, order_id).await,
                vec![OrderStatus::Purchased, OrderStatus::OnHold, OrderStatus::Purchased]
            );
            assert_eq!(deductions(&pool, order_id).await, vec![90]);

            let (status, purchase_time) = order_state(&pool, order_id).await;
            assert_eq!(status, "onhold");
            assert!(purchase_time.is_none());

            let balance = balance_repository::get_for_user(&pool, buyer.user_id).await.unwrap();
            assert_eq!(balance.current_balance(), 10);
        }

        #[sqlx::test(migrations = false)]
        #[ignore = "Requires Postgres at DATABASE_URL"]
        async fn test_full_settlement_stamps_purchase_time(pool: PgPool) {
            test_support::migrate(&pool).await;
            let buyer = test_support::user(&pool, "buyer", false).await;
            test_support::charge(&pool, buyer.user_id, 200, ChargeStatus::Approved).await;
            let (order_id, _) = test_support::order(&pool, buyer.user_id, &[60, 80]).await;

            let report = direct_purchase_order(&pool, &buyer, order_id).await.unwrap();

            assert_eq!(report.outcome, SettlementOutcome::FullyPurchased);
            assert_eq!(report.remaining_balance, 60);
            assert_eq!(
                test_support::item_statuses(&pool, order_id).await,
                vec![OrderStatus::Purchased, OrderStatus::Purchased]
            );
            assert_eq!(deductions(&pool, order_id).await, vec![140]);

            let (status, purchase_time) = order_state(&pool, order_id).await;
            assert_eq!(status, "purchased");
            assert!(purchase_time.is_some());

            assert!(matches!(
                direct_purchase_order(&pool, &buyer, order_id).await,
                Err(OrderError::InvalidState(_))
            ));
            assert_eq!(deductions(&pool, order_id).await, vec![140]);
        }

        #[sqlx::test(migrations = false)]
        #[ignore = "Requires Postgres at DATABASE_URL"]
        async fn test_zero_balance_holds_everything(pool: PgPool) {
            test_support::migrate(&pool).await;
            let buyer = test_support::user(&pool, "buyer", false).await;
            let (order_id, _) = test_support::order(&pool, buyer.user_id, &[0, 25]).await;

            let report = direct_purchase_order(&pool, &buyer, order_id).await.unwrap();

            assert_eq!(report.outcome, SettlementOutcome::NoBalance);
            assert_eq!(
                test_support::item_statuses(&pool, order_id).await,
                vec![OrderStatus::OnHold, OrderStatus::OnHold]
            );
            assert!(deductions(&pool, order_id).await.is_empty());
            assert_eq!(order_state(&pool, order_id).await.0, "onhold");
        }

        #[sqlx::test(migrations = false)]
        #[ignore = "Requires Postgres at DATABASE_URL"]
        async fn test_unknown_and_foreign_orders_are_rejected(pool: PgPool) {
            test_support::migrate(&pool).await;
            let buyer = test_support::user(&pool, "buyer", false).await;
            let staff = test_support::user(&pool, "staff", true).await;
            test_support::charge(&pool, staff.user_id, 500, ChargeStatus::Approved).await;
            let (order_id, _) = test_support::order(&pool, buyer.user_id, &[40]).await;

            assert!(matches!(
                direct_purchase_order(&pool, &buyer, 9999).await,
                Err(OrderError::NotFound(9999))
            ));
            assert!(matches!(
                direct_purchase_order(&pool, &staff, order_id).await,
                Err(OrderError::Forbidden(_))
            ));
            assert_eq!(
                test_support::item_statuses(&pool, order_id).await,
                vec![OrderStatus::Cart]
            );
        }
    }
}

//! Balance Repository
//!
//! Balances are computed from approved charges minus recorded deductions.

use directpay_core::domain::balance::UserBalance;
use sqlx::PgExecutor;

/// Compute a user's current balance
pub async fn get_for_user<'e, E>(executor: E, user_id: i64) -> Result<UserBalance, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let (approved_total, spent_total) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE((SELECT SUM(amount) FROM charges
                      WHERE user_id = $1 AND status = 'approved'), 0)::BIGINT,
            COALESCE((SELECT SUM(amount) FROM balance_deductions
                      WHERE user_id = $1), 0)::BIGINT
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(UserBalance {
        user_id,
        approved_total,
        spent_total,
    })
}

/// Record a deduction made while settling an order
pub async fn deduct<'e, E>(
    executor: E,
    user_id: i64,
    order_id: i64,
    amount: i64,
) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO balance_deductions (user_id, order_id, amount, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(order_id)
    .bind(amount)
    .bind(chrono::Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

/// Serialize balance changes for one user until the transaction ends
pub async fn lock_for_user<'e, E>(executor: E, user_id: i64) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(())
}

//! Charge Repository
//!
//! Handles all database operations related to charges.

use directpay_core::domain::charge::{Charge, ChargeStatus};
use directpay_core::dto::charge::CreateCharge;
use sqlx::{PgExecutor, PgPool};

/// Create a new pending charge in the database
pub async fn create(pool: &PgPool, user_id: i64, req: CreateCharge) -> Result<Charge, sqlx::Error> {
    let now = chrono::Utc::now();

    let row = sqlx::query_as::<_, ChargeRow>(
        r#"
        INSERT INTO charges (user_id, amount, user_notes, attachment, status, is_shown, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
        RETURNING id, user_id, amount, user_notes, attachment, status, is_shown, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(req.amount)
    .bind(&req.user_notes)
    .bind(&req.attachment)
    .bind(ChargeStatus::Pending.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Find a charge by ID, hidden or not
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Charge>, sqlx::Error> {
    let row = sqlx::query_as::<_, ChargeRow>(
        r#"
        SELECT id, user_id, amount, user_notes, attachment, status, is_shown, created_at, updated_at
        FROM charges
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List a user's visible charges, newest first
pub async fn list_visible_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Charge>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChargeRow>(
        r#"
        SELECT id, user_id, amount, user_notes, attachment, status, is_shown, created_at, updated_at
        FROM charges
        WHERE user_id = $1 AND is_shown
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Soft-delete a charge
pub async fn hide(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE charges SET is_shown = FALSE, updated_at = $1 WHERE id = $2")
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Replace the claimed amount
pub async fn update_amount(pool: &PgPool, id: i64, amount: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE charges SET amount = $1, updated_at = $2 WHERE id = $3")
        .bind(amount)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Set the review status
pub async fn update_status<'e, E>(executor: E, id: i64, status: ChargeStatus) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE charges SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_str())
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ChargeRow {
    id: i64,
    user_id: i64,
    amount: i64,
    user_notes: String,
    attachment: String,
    status: String,
    is_shown: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChargeRow> for Charge {
    fn from(row: ChargeRow) -> Self {
        // Rows are only written through ChargeStatus::as_str
        let status = row.status.parse().unwrap_or(ChargeStatus::Pending);

        Charge {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            user_notes: row.user_notes,
            attachment: row.attachment,
            status,
            is_shown: row.is_shown,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

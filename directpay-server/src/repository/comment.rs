//! Comment Repository
//!
//! Handles the comment log attached to each charge.

use directpay_core::domain::charge::ChargeComment;
use sqlx::{PgExecutor, PgPool};

/// Append a comment to a charge's log
pub async fn create<'e, E>(
    executor: E,
    charge_id: i64,
    author_id: i64,
    content: &str,
) -> Result<ChargeComment, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO charge_comments (charge_id, author_id, content, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, charge_id, author_id, content, created_at
        "#,
    )
    .bind(charge_id)
    .bind(author_id)
    .bind(content)
    .bind(chrono::Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}

/// Get all comments for a charge, oldest first
pub async fn list_by_charge(pool: &PgPool, charge_id: i64) -> Result<Vec<ChargeComment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, charge_id, author_id, content, created_at
        FROM charge_comments
        WHERE charge_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(charge_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    charge_id: i64,
    author_id: i64,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommentRow> for ChargeComment {
    fn from(row: CommentRow) -> Self {
        ChargeComment {
            id: row.id,
            charge_id: row.charge_id,
            author_id: row.author_id,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

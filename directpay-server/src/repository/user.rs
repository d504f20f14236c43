//! User Repository
//!
//! Resolves API tokens to the users the platform provisioned.

use directpay_core::domain::context::RequestContext;
use sqlx::PgPool;

/// Find the user owning a token hash
pub async fn find_by_token_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<RequestContext>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, is_superuser
        FROM users
        WHERE api_token_hash = $1
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| RequestContext {
        user_id: r.id,
        username: r.username,
        is_superuser: r.is_superuser,
    }))
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    is_superuser: bool,
}

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Users are provisioned by the platform; only read here
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(150) NOT NULL UNIQUE,
            is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
            api_token_hash VARCHAR(64) UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create charges table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS charges (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount BIGINT NOT NULL DEFAULT 0 CHECK (amount >= 0),
            user_notes TEXT NOT NULL DEFAULT '',
            attachment VARCHAR(512) NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            is_shown BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create comment log table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS charge_comments (
            id BIGSERIAL PRIMARY KEY,
            charge_id BIGINT NOT NULL REFERENCES charges(id) ON DELETE CASCADE,
            author_id BIGINT NOT NULL REFERENCES users(id),
            content TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Shopping cart tables
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            status VARCHAR(20) NOT NULL DEFAULT 'cart',
            purchase_time TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id BIGSERIAL PRIMARY KEY,
            order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            status VARCHAR(20) NOT NULL DEFAULT 'cart',
            line_cost BIGINT NOT NULL DEFAULT 0,
            description TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Deductions made from a user's balance by settlements
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS balance_deductions (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            order_id BIGINT REFERENCES orders(id) ON DELETE SET NULL,
            amount BIGINT NOT NULL CHECK (amount > 0),
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for better query performance
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_charges_user_id ON charges(user_id, created_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_charges_status ON charges(user_id, status)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_charge_comments_charge_id ON charge_comments(charge_id, created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id, id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_balance_deductions_user_id ON balance_deductions(user_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

//! Fixtures for tests that run against a scratch Postgres database.
//!
//! Those tests use `#[sqlx::test]`, which creates a fresh database per test
//! from `DATABASE_URL`, and are ignored by default. Run them with
//! `cargo test -- --ignored` against a reachable server.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use directpay_core::domain::charge::ChargeStatus;
use directpay_core::domain::context::RequestContext;
use directpay_core::domain::order::OrderStatus;
use directpay_core::dto::Message;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::api::auth::hash_token;
use crate::api::{AppState, create_router};
use crate::config::ServerConfig;
use crate::db;

pub async fn migrate(pool: &PgPool) {
    db::run_migrations(pool).await.unwrap();
}

/// Insert a user whose bearer token is `<username>-token`
pub async fn user(pool: &PgPool, username: &str, is_superuser: bool) -> RequestContext {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, is_superuser, api_token_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(is_superuser)
    .bind(hash_token(&token_of(username)))
    .fetch_one(pool)
    .await
    .unwrap();

    RequestContext {
        user_id,
        username: username.to_string(),
        is_superuser,
    }
}

pub fn token_of(username: &str) -> String {
    format!("{}-token", username)
}

pub async fn charge(pool: &PgPool, user_id: i64, amount: i64, status: ChargeStatus) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO charges (user_id, amount, attachment, status, created_at, updated_at)
        VALUES ($1, $2, 'charges/test.png', $3, NOW(), NOW())
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .bind(status.as_str())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn charge_status(pool: &PgPool, id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM charges WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn charge_amount(pool: &PgPool, id: i64) -> i64 {
    sqlx::query_scalar("SELECT amount FROM charges WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn comment_count(pool: &PgPool, charge_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM charge_comments WHERE charge_id = $1")
        .bind(charge_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Insert a cart order with one cart item per line cost, in listing order
pub async fn order(pool: &PgPool, user_id: i64, line_costs: &[i64]) -> (i64, Vec<i64>) {
    let order_id: i64 =
        sqlx::query_scalar("INSERT INTO orders (user_id, status) VALUES ($1, 'cart') RETURNING id")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();

    let mut item_ids = Vec::new();
    for (n, cost) in line_costs.iter().enumerate() {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_items (order_id, status, line_cost, description)
            VALUES ($1, 'cart', $2, $3)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(cost)
        .bind(format!("item {}", n + 1))
        .fetch_one(pool)
        .await
        .unwrap();
        item_ids.push(id);
    }

    (order_id, item_ids)
}

pub async fn item_statuses(pool: &PgPool, order_id: i64) -> Vec<OrderStatus> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT status FROM order_items WHERE order_id = $1 ORDER BY id")
            .bind(order_id)
            .fetch_all(pool)
            .await
            .unwrap();
    rows.iter().map(|s| OrderStatus::from_db(s)).collect()
}

pub fn router(pool: PgPool) -> Router {
    create_router(AppState::new(pool, ServerConfig::default()))
}

/// POST an urlencoded form as `username`
pub async fn post_form(pool: &PgPool, username: &str, uri: &str, body: &str) -> Response {
    router(pool.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token_of(username)))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// GET `uri` as `username`
pub async fn get(pool: &PgPool, username: &str, uri: &str) -> Response {
    router(pool.clone())
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token_of(username)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn message_of(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice::<Message>(&bytes).unwrap().msg
}

//! Order Repository
//!
//! Reads and updates shopping-cart orders during settlement. Every function
//! runs on the caller's connection so settlement can hold one transaction.

use chrono::{DateTime, Utc};
use directpay_core::domain::order::{Order, OrderItem, OrderStatus};
use sqlx::PgConnection;

/// Load an order and its items, locking the order row until commit
pub async fn find_by_id_for_update(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    let row = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, user_id, status, purchase_time
        FROM orders
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItemRow>(
        r#"
        SELECT id, order_id, status, line_cost, description
        FROM order_items
        WHERE order_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(Order {
        id: row.id,
        user_id: row.user_id,
        status: OrderStatus::from_db(&row.status),
        purchase_time: row.purchase_time,
        items: items.into_iter().map(|r| r.into()).collect(),
    }))
}

/// Move a set of line items to a new status
pub async fn update_items_status(
    conn: &mut PgConnection,
    item_ids: &[i64],
    status: OrderStatus,
) -> Result<(), sqlx::Error> {
    if item_ids.is_empty() {
        return Ok(());
    }

    sqlx::query("UPDATE order_items SET status = $1 WHERE id = ANY($2)")
        .bind(status.as_str())
        .bind(item_ids)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Set the order status, stamping the purchase time when given
pub async fn update_status(
    conn: &mut PgConnection,
    id: i64,
    status: OrderStatus,
    purchase_time: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE orders
        SET status = $1, purchase_time = COALESCE($2, purchase_time)
        WHERE id = $3
        "#,
    )
    .bind(status.as_str())
    .bind(purchase_time)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    status: String,
    purchase_time: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    status: String,
    line_cost: i64,
    description: String,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            status: OrderStatus::from_db(&row.status),
            line_cost: row.line_cost,
            description: row.description,
        }
    }
}

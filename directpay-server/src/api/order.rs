//! Order API Handlers
//!
//! Paying shopping-cart orders out of the direct payments balance.

use axum::{
    Json,
    extract::{Form, State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use directpay_core::domain::settlement::SettlementOutcome;
use directpay_core::dto::Message;
use directpay_core::dto::order::SettlementReport;
use serde::Deserialize;

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, ApiResult};
use crate::api::{AppState, form, found};
use crate::config::ServerConfig;
use crate::service::order_service;

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseForm {
    pub reference_number: Option<String>,
}

/// POST /direct_payments/direct_purchase_order
/// Settle an order with the caller's balance
///
/// Responds with a message for zero-balance and partial settlements, and
/// redirects to the receipt when the balance paid for the whole order.
pub async fn direct_purchase_order(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    body: Result<Form<PurchaseForm>, FormRejection>,
) -> ApiResult<Response> {
    let Form(fields) = body.map_err(|_| ApiError::bad_request())?;

    let order_id = form::id_field(fields.reference_number.as_deref(), "reference_number")?
        .ok_or_else(ApiError::missing_parameters)?;

    tracing::info!("Settling order {} for {}", order_id, ctx.username);

    let report = order_service::direct_purchase_order(&state.pool, &ctx, order_id).await?;

    Ok(settlement_response(&state.config, &report))
}

fn settlement_response(config: &ServerConfig, report: &SettlementReport) -> Response {
    let msg = match report.outcome {
        SettlementOutcome::NoBalance => "No balance, all onhold",
        SettlementOutcome::FullyPurchased => {
            return found(&config.receipt_url_for(report.order_id));
        }
        SettlementOutcome::Partial if report.has_held_items() => {
            "Order still has onhold registration/s"
        }
        SettlementOutcome::Partial => "Order purchased",
    };

    Json(Message::new(msg)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};

    fn report(outcome: SettlementOutcome, held_items: Vec<i64>) -> SettlementReport {
        SettlementReport {
            order_id: 31,
            outcome,
            purchased_items: Vec::new(),
            held_items,
            charged: 0,
            remaining_balance: 0,
        }
    }

    async fn message_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice::<Message>(&bytes).unwrap().msg
    }

    #[tokio::test]
    async fn test_no_balance_message() {
        let response = settlement_response(
            &ServerConfig::default(),
            &report(SettlementOutcome::NoBalance, vec![1, 2]),
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(message_of(response).await, "No balance, all onhold");
    }

    #[test]
    fn test_full_purchase_redirects_to_receipt() {
        let response = settlement_response(
            &ServerConfig::default(),
            &report(SettlementOutcome::FullyPurchased, Vec::new()),
        );
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/shoppingcart/receipt/31/"
        );
    }

    #[tokio::test]
    async fn test_partial_messages() {
        let config = ServerConfig::default();

        let held = settlement_response(&config, &report(SettlementOutcome::Partial, vec![4]));
        assert_eq!(held.status(), StatusCode::OK);
        assert_eq!(
            message_of(held).await,
            "Order still has onhold registration/s"
        );

        let done = settlement_response(&config, &report(SettlementOutcome::Partial, Vec::new()));
        assert_eq!(message_of(done).await, "Order purchased");
    }

    mod with_database {
        use axum::http::{StatusCode, header};
        use directpay_core::domain::charge::ChargeStatus;
        use sqlx::PgPool;

        use crate::test_support::{self, message_of, post_form};

        #[sqlx::test(migrations = false)]
        #[ignore = "Requires Postgres at DATABASE_URL"]
        async fn test_settlement_responses(pool: PgPool) {
            test_support::migrate(&pool).await;
            let buyer = test_support::user(&pool, "buyer", false).await;
            test_support::charge(&pool, buyer.user_id, 100, ChargeStatus::Approved).await;
            let (partial, _) = test_support::order(&pool, buyer.user_id, &[70, 50]).await;
            let (full, _) = test_support::order(&pool, buyer.user_id, &[30]).await;
            let (empty_handed, _) = test_support::order(&pool, buyer.user_id, &[5]).await;

            let response = post_form(
                &pool,
                "buyer",
                "/direct_payments/direct_purchase_order",
                &format!("reference_number={}", partial),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                message_of(response).await,
                "Order still has onhold registration/s"
            );

            let response = post_form(
                &pool,
                "buyer",
                "/direct_payments/direct_purchase_order",
                &format!("reference_number={}", full),
            )
            .await;
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                format!("/shoppingcart/receipt/{}/", full).as_str()
            );

            let response = post_form(
                &pool,
                "buyer",
                "/direct_payments/direct_purchase_order",
                &format!("reference_number={}", empty_handed),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(message_of(response).await, "No balance, all onhold");

            let response = post_form(
                &pool,
                "buyer",
                "/direct_payments/direct_purchase_order",
                "reference_number=9999",
            )
            .await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(message_of(response).await, "Wrong order");
        }
    }
}

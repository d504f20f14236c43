//! Charge Service
//!
//! Business logic for charge submission and review.
//!
//! Every operation on an existing charge follows the same order: look the
//! charge up, validate the request, check the caller may manage it, mutate.

use directpay_core::domain::balance::UserBalance;
use directpay_core::domain::charge::{Charge, ChargeStatus, status_change_note};
use directpay_core::domain::context::RequestContext;
use directpay_core::dto::charge::{ChargeDetail, CreateCharge};
use sqlx::PgPool;

use crate::repository::{balance_repository, charge_repository, comment_repository};

/// Service error type
#[derive(Debug)]
pub enum ChargeError {
    NotFound(i64),
    Forbidden(i64),
    UnsupportedStatus(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ChargeError {
    fn from(err: sqlx::Error) -> Self {
        ChargeError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, ChargeError>;

/// Whether a status update changes anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Changed { from: ChargeStatus, to: ChargeStatus },
    Unchanged,
}

/// List the caller's visible charges
pub async fn list_charges(pool: &PgPool, ctx: &RequestContext) -> Result<Vec<Charge>> {
    let charges = charge_repository::list_visible_by_user(pool, ctx.user_id).await?;
    Ok(charges)
}

/// Current balance of the caller
pub async fn get_balance(pool: &PgPool, ctx: &RequestContext) -> Result<UserBalance> {
    let balance = balance_repository::get_for_user(pool, ctx.user_id).await?;
    Ok(balance)
}

/// Create a new pending charge owned by the caller
pub async fn create_charge(
    pool: &PgPool,
    ctx: &RequestContext,
    req: CreateCharge,
) -> Result<Charge> {
    validate_amount(req.amount)?;

    let charge = charge_repository::create(pool, ctx.user_id, req).await?;

    tracing::info!(
        "Charge {} submitted by {} for {}",
        charge.id,
        ctx.username,
        charge.amount
    );

    Ok(charge)
}

/// Get a charge with its comment log
pub async fn get_charge_detail(
    pool: &PgPool,
    ctx: &RequestContext,
    id: i64,
) -> Result<ChargeDetail> {
    let charge = find_charge(pool, id).await?;
    authorize(ctx, &charge)?;

    let comments = comment_repository::list_by_charge(pool, id).await?;

    Ok(ChargeDetail { charge, comments })
}

/// Hide a charge from its owner's listing
pub async fn remove_charge(pool: &PgPool, ctx: &RequestContext, id: i64) -> Result<()> {
    let charge = find_charge(pool, id).await?;
    authorize(ctx, &charge)?;

    charge_repository::hide(pool, id).await?;

    tracing::info!("Charge {} removed by {}", id, ctx.username);

    Ok(())
}

/// Replace the amount claimed by a charge
pub async fn update_amount(
    pool: &PgPool,
    ctx: &RequestContext,
    id: i64,
    amount: i64,
) -> Result<()> {
    let charge = find_charge(pool, id).await?;
    validate_amount(amount)?;
    authorize(ctx, &charge)?;

    charge_repository::update_amount(pool, id, amount).await?;

    tracing::info!(
        "Charge {} amount changed from {} to {} by {}",
        id,
        charge.amount,
        amount,
        ctx.username
    );

    Ok(())
}

/// Move a charge to a new review status
///
/// The status string must be one of the supported values. Re-applying the
/// current status writes nothing.
pub async fn update_status(
    pool: &PgPool,
    ctx: &RequestContext,
    id: i64,
    status: &str,
) -> Result<StatusUpdate> {
    let charge = find_charge(pool, id).await?;

    let status: ChargeStatus = status
        .parse()
        .map_err(|_| ChargeError::UnsupportedStatus(status.to_string()))?;

    authorize(ctx, &charge)?;

    let update = plan_status_update(charge.status, status);
    if let StatusUpdate::Changed { from, to } = update {
        let mut tx = pool.begin().await?;
        charge_repository::update_status(&mut *tx, id, to).await?;
        comment_repository::create(&mut *tx, id, ctx.user_id, &status_change_note(from, to))
            .await?;
        tx.commit().await?;

        tracing::info!("Charge {} moved from {} to {} by {}", id, from, to, ctx.username);
    } else {
        tracing::debug!("Charge {} already {}", id, status);
    }

    Ok(update)
}

/// Append a comment to a charge
pub async fn add_comment(
    pool: &PgPool,
    ctx: &RequestContext,
    id: i64,
    content: &str,
) -> Result<()> {
    let charge = find_charge(pool, id).await?;
    validate_comment(content)?;
    authorize(ctx, &charge)?;

    comment_repository::create(pool, id, ctx.user_id, content).await?;

    tracing::info!("Comment added to charge {} by {}", id, ctx.username);

    Ok(())
}

async fn find_charge(pool: &PgPool, id: i64) -> Result<Charge> {
    charge_repository::find_by_id(pool, id)
        .await?
        .ok_or(ChargeError::NotFound(id))
}

// =============================================================================
// Validation
// =============================================================================

/// Amounts are whole, non-negative minor units
pub fn validate_amount(amount: i64) -> Result<()> {
    if amount < 0 {
        return Err(ChargeError::ValidationError(
            "Amount cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_comment(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ChargeError::ValidationError("provide comment".to_string()));
    }
    Ok(())
}

fn authorize(ctx: &RequestContext, charge: &Charge) -> Result<()> {
    if ctx.can_manage(charge.user_id) {
        Ok(())
    } else {
        tracing::warn!(
            "{} may not manage charge {} owned by user {}",
            ctx.username,
            charge.id,
            charge.user_id
        );
        Err(ChargeError::Forbidden(charge.id))
    }
}

fn plan_status_update(current: ChargeStatus, requested: ChargeStatus) -> StatusUpdate {
    if current == requested {
        StatusUpdate::Unchanged
    } else {
        StatusUpdate::Changed {
            from: current,
            to: requested,
        }
    }
}

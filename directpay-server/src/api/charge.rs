//! Charge API Handlers
//!
//! HTTP endpoints for submitting and reviewing direct payment charges.

use askama::Template;
use axum::{
    Json,
    extract::{
        Form, Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, PathRejection},
    },
    response::{Html, Response},
};
use directpay_core::domain::balance::UserBalance;
use directpay_core::domain::charge::Charge;
use directpay_core::dto::Message;
use directpay_core::dto::charge::{ChargeDetail, CreateCharge};
use serde::Deserialize;

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, ApiResult};
use crate::api::{AppState, form, found};
use crate::service::charge_service;

/// Fields posted to the charge review endpoints; each uses a subset
#[derive(Debug, Default, Deserialize)]
pub struct ChargeForm {
    pub charge: Option<String>,
    pub new_amount: Option<String>,
    pub status: Option<String>,
    pub content: Option<String>,
}

impl ChargeForm {
    /// The `charge` id, required
    fn charge_id(&self) -> ApiResult<i64> {
        form::id_field(self.charge.as_deref(), "charge")?.ok_or_else(ApiError::missing_parameters)
    }

    /// `charge` and `new_amount`, both required
    fn amount_update(&self) -> ApiResult<(i64, i64)> {
        let id = form::id_field(self.charge.as_deref(), "charge")?;
        let amount = form::amount_field(self.new_amount.as_deref(), "new_amount")?;
        match (id, amount) {
            (Some(id), Some(amount)) => Ok((id, amount)),
            _ => Err(ApiError::missing_parameters()),
        }
    }

    /// `charge` and `status`, both required
    fn status_update(&self) -> ApiResult<(i64, &str)> {
        let id = form::id_field(self.charge.as_deref(), "charge")?;
        match (id, form::text_field(self.status.as_deref())) {
            (Some(id), Some(status)) => Ok((id, status)),
            _ => Err(ApiError::missing_parameters()),
        }
    }

    /// `charge` and `content`, both required
    fn comment(&self) -> ApiResult<(i64, &str)> {
        let id = form::id_field(self.charge.as_deref(), "charge")?;
        match (id, form::text_field(self.content.as_deref())) {
            (Some(id), Some(content)) => Ok((id, content)),
            _ => Err(ApiError::missing_parameters()),
        }
    }
}

#[derive(Template)]
#[template(path = "charges/index.html")]
struct ChargesPage<'a> {
    username: &'a str,
    balance: i64,
    charges: &'a [Charge],
}

// =============================================================================
// Pages
// =============================================================================

/// GET /direct_payments/
/// Page listing the caller's charges with a submission form
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Html<String>> {
    tracing::debug!("Rendering charges page for {}", ctx.username);

    let charges = charge_service::list_charges(&state.pool, &ctx).await?;
    let balance = charge_service::get_balance(&state.pool, &ctx).await?;

    let page = ChargesPage {
        username: &ctx.username,
        balance: balance.current_balance(),
        charges: &charges,
    };

    let body = page
        .render()
        .map_err(|e| ApiError::InternalError(format!("Failed to render charges page: {}", e)))?;

    Ok(Html(body))
}

// =============================================================================
// Charge Lifecycle Endpoints
// =============================================================================

/// POST /direct_payments/new_charge
/// Submit a charge: multipart with a required `attachment` file and optional
/// `amount` and `user_notes` fields
pub async fn new_charge(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let mut multipart = multipart.map_err(|_| ApiError::bad_request())?;

    let mut upload = None;
    let mut amount = None;
    let mut user_notes = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("attachment") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(upload_error)?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    upload = Some((file_name, bytes));
                }
            }
            Some("amount") => amount = Some(field.text().await.map_err(upload_error)?),
            Some("user_notes") => user_notes = Some(field.text().await.map_err(upload_error)?),
            _ => {}
        }
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::BadRequest("No files attached".to_string()));
    };

    let amount = form::amount_field(amount.as_deref(), "amount")?.unwrap_or(0);
    charge_service::validate_amount(amount)?;

    let attachment = state
        .attachments
        .save(ctx.user_id, &file_name, &bytes)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to store attachment: {}", e)))?;

    let req = CreateCharge {
        amount,
        user_notes: user_notes.unwrap_or_default(),
        attachment: attachment.clone(),
    };

    if let Err(err) = charge_service::create_charge(&state.pool, &ctx, req).await {
        if let Err(io_err) = state.attachments.discard(&attachment).await {
            tracing::warn!("Failed to discard orphaned attachment {}: {}", attachment, io_err);
        }
        return Err(err.into());
    }

    Ok(found(&state.config.dashboard_url))
}

/// POST /direct_payments/remove_charge_entry
/// Hide a charge (it is kept for auditing)
pub async fn remove_charge_entry(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    body: Result<Form<ChargeForm>, FormRejection>,
) -> ApiResult<Json<Message>> {
    let Form(fields) = body.map_err(|_| ApiError::bad_request())?;

    let id = fields.charge_id()?;

    charge_service::remove_charge(&state.pool, &ctx, id).await?;

    Ok(Json(Message::new("Removed")))
}

/// POST /direct_payments/update_charge_amount
/// Change the amount claimed by a charge
pub async fn update_charge_amount(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    body: Result<Form<ChargeForm>, FormRejection>,
) -> ApiResult<Json<Message>> {
    let Form(fields) = body.map_err(|_| ApiError::bad_request())?;

    let (id, amount) = fields.amount_update()?;

    charge_service::update_amount(&state.pool, &ctx, id, amount).await?;

    Ok(Json(Message::new("Updated")))
}

/// POST /direct_payments/update_charge_status
/// Move a charge to pending, rejected, canceled or approved
pub async fn update_charge_status(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    body: Result<Form<ChargeForm>, FormRejection>,
) -> ApiResult<Json<Message>> {
    let Form(fields) = body.map_err(|_| ApiError::bad_request())?;

    let (id, status) = fields.status_update()?;

    charge_service::update_status(&state.pool, &ctx, id, status).await?;

    Ok(Json(Message::new("Updated")))
}

/// POST /direct_payments/add_charge_comment
/// Append to a charge's comment log
pub async fn add_charge_comment(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    body: Result<Form<ChargeForm>, FormRejection>,
) -> ApiResult<Json<Message>> {
    let Form(fields) = body.map_err(|_| ApiError::bad_request())?;

    let (id, content) = fields.comment()?;

    charge_service::add_comment(&state.pool, &ctx, id, content).await?;

    Ok(Json(Message::new("Comment added")))
}

// =============================================================================
// JSON Read Endpoints
// =============================================================================

/// GET /direct_payments/charges
pub async fn list_charges(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<Vec<Charge>>> {
    tracing::debug!("Listing charges for {}", ctx.username);

    let charges = charge_service::list_charges(&state.pool, &ctx).await?;
    Ok(Json(charges))
}

/// GET /direct_payments/charge/{id}
pub async fn get_charge(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ChargeDetail>> {
    let Path(id) = id.map_err(|_| ApiError::bad_request())?;
    tracing::debug!("Getting charge {} for {}", id, ctx.username);

    let detail = charge_service::get_charge_detail(&state.pool, &ctx, id).await?;
    Ok(Json(detail))
}

/// GET /direct_payments/balance
pub async fn get_balance(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<UserBalance>> {
    let balance = charge_service::get_balance(&state.pool, &ctx).await?;
    Ok(Json(balance))
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid upload: {}", err.body_text()))
}

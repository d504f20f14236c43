//! Form field parsing
//!
//! Direct payments endpoints take classic urlencoded form posts where every
//! field is optional text. A field counts as missing when it is absent,
//! empty, or, for numbers, zero.

use crate::api::error::{ApiError, ApiResult};

/// Non-empty text field
pub fn text_field(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

/// Positive record id; `Ok(None)` when missing
pub fn id_field(raw: Option<&str>, name: &str) -> ApiResult<Option<i64>> {
    match number_field(raw, name)? {
        Some(id) if id < 0 => Err(invalid(name)),
        id => Ok(id),
    }
}

/// Amount in minor units; `Ok(None)` when missing
///
/// Negative values parse here and are rejected by the charge service.
pub fn amount_field(raw: Option<&str>, name: &str) -> ApiResult<Option<i64>> {
    number_field(raw, name)
}

fn number_field(raw: Option<&str>, name: &str) -> ApiResult<Option<i64>> {
    let Some(raw) = text_field(raw.map(str::trim)) else {
        return Ok(None);
    };

    let value = raw
        .parse::<i64>()
        .map_err(|_| invalid(name))?;

    Ok((value != 0).then_some(value))
}

fn invalid(name: &str) -> ApiError {
    ApiError::BadRequest(format!("Invalid {}", name))
}

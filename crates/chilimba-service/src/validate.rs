//! Input validation applied before any persistence call.
//!
//! Invalid input never reaches a store, and it is never silently coerced:
//! rejecting beats guessing.

use rust_decimal::Decimal;

use chilimba_core::error::{CoreError, CoreResult};

/// ## Summary
/// Requires a non-blank group name; surrounding whitespace is trimmed.
///
/// ## Errors
/// Returns `ValidationError` for a blank name.
pub fn group_name(name: &str) -> CoreResult<&str> {
    non_blank(name, "group name")
}

/// ## Summary
/// Requires a non-blank member name.
///
/// ## Errors
/// Returns `ValidationError` for a blank name.
pub fn member_name(name: &str) -> CoreResult<&str> {
    non_blank(name, "member name")
}

/// ## Summary
/// Requires a non-blank phone number.
///
/// ## Errors
/// Returns `ValidationError` for a blank phone number.
pub fn phone(phone: &str) -> CoreResult<&str> {
    non_blank(phone, "phone number")
}

/// ## Summary
/// Requires a non-negative transaction amount.
///
/// ## Errors
/// Returns `ValidationError` for a negative amount.
pub fn amount(amount: Decimal) -> CoreResult<Decimal> {
    if amount.is_sign_negative() {
        return Err(CoreError::ValidationError(format!(
            "amount must not be negative: {amount}"
        )));
    }
    Ok(amount)
}

fn non_blank<'a>(value: &'a str, what: &str) -> CoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(format!("{what} must not be blank")));
    }
    Ok(trimmed)
}

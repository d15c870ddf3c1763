//! Amount parsing and display formatting.

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Parses a user-entered amount into an exact decimal.
///
/// Non-numeric input is rejected outright; it is never coerced to zero.
/// Negative amounts are rejected as well, since transactions are append-only
/// and carry their direction in the kind tag.
///
/// ## Errors
/// Returns `ParseError` for non-numeric input and `ValidationError` for
/// negative amounts.
pub fn parse_amount(input: &str) -> CoreResult<Decimal> {
    let trimmed = input.trim();
    let amount = trimmed
        .parse::<Decimal>()
        .map_err(|_| CoreError::ParseError(format!("not a numeric amount: {trimmed:?}")))?;

    if amount.is_sign_negative() {
        return Err(CoreError::ValidationError(format!(
            "amount must not be negative: {amount}"
        )));
    }

    Ok(amount)
}

/// Formats an amount for display with two decimal places.
///
/// Formatting is the only place rounding happens; stored and aggregated
/// values keep full precision.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

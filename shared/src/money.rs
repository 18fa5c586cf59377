//! Money and weight arithmetic using rust_decimal for precision
//!
//! Internal arithmetic may carry more precision, but every value that
//! leaves the engine (displayed, compared, or sent to the platform) goes
//! through [`round2`] first.

use rust_decimal::prelude::*;

/// Fraction digits for every externally visible money/weight value
pub const DECIMAL_PLACES: u32 = 2;

/// Round to 2 decimal places (half away from zero) and pin the scale to 2,
/// so `20` renders as `20.00`
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

/// Render with exactly 2 fraction digits
#[inline]
pub fn fmt2(value: Decimal) -> String {
    round2(value).to_string()
}

/// Textual equality after normalizing both sides to 2 decimal places
#[inline]
pub fn same_amount(a: Decimal, b: Decimal) -> bool {
    fmt2(a) == fmt2(b)
}

/// Parse a decimal from free text, tolerating surrounding whitespace
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Convert f64 to Decimal
///
/// Non-finite input logs an error and returns ZERO rather than poisoning
/// downstream money arithmetic.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

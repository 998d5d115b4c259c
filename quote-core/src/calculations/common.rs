//! Shared helpers for quotation arithmetic.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (0.005 goes away from zero). Used only at display boundaries;
/// the totals pipeline itself keeps full precision.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(40.4325)), dec!(40.43));
/// assert_eq!(round_half_up(dec!(40.435)), dec!(40.44));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a user-supplied amount to zero or above. Malformed numeric input
/// never raises; it has already been coerced to zero upstream, and negative
/// values are treated the same way here.
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Clamps a discount percentage into [0, 100].
pub fn clamp_percent(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

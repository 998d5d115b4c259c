//! Input coercion and display formatting for quotation amounts.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Permissively coerces user input to a decimal amount.
///
/// Blank input is zero; commas are accepted as thousands separators;
/// anything unparseable is coerced to zero with a warning rather than an
/// error. Negative amounts are allowed through — the calculator clamps
/// them where it matters.
pub fn coerce_decimal(s: &str) -> Decimal {
    let normalized = s.trim().replace(',', "");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized.parse().unwrap_or_else(|e| {
        tracing::warn!(input = %s, "invalid amount coerced to zero: {}", e);
        Decimal::ZERO
    })
}

/// Like [`coerce_decimal`], but blank stays blank. Used for the optional
/// time-in-days field.
pub fn coerce_optional_decimal(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', "");
    if normalized.is_empty() {
        None
    } else {
        Some(coerce_decimal(&normalized))
    }
}

/// Formats an amount as Canadian-dollar currency: two decimals, half-up
/// rounding, thousands separators. The only place display rounding
/// happens.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int, frac)) => (int.to_string(), format!("{frac:0<2}")),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// Percentage display for a fractional rate: `0.14975` → `"14.975%"`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Formats an optional date for display, using "—" when blank.
pub fn format_date_opt(date: &Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "—".to_string())
}
